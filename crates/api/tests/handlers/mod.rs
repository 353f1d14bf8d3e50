mod person_test;
mod slot_test;
