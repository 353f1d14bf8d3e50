//! Domain types and scheduling rules for CoachSync.
//!
//! Everything here is storage- and transport-agnostic: the database crate
//! implements [`store::SlotStore`] and the API crate projects the models to JSON.

pub mod errors;
pub mod models;
pub mod store;
pub mod visibility;
