pub mod health;
pub mod person;
pub mod slot;
