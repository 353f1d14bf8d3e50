pub mod person;
pub mod slot;
