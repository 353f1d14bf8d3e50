//! # Slot Store
//!
//! The persistence seam of the service. Handlers and the visibility filter only
//! talk to a [`SlotStore`]; the database crate provides the PostgreSQL and
//! in-memory implementations.

use async_trait::async_trait;

use crate::errors::CoachResult;
use crate::models::{
    person::{NewPerson, Person},
    slot::{Feedback, NewSlot, Slot, SlotFilter},
};

#[async_trait]
pub trait SlotStore: Send + Sync {
    /// All persons, ordered by id.
    async fn list_persons(&self) -> CoachResult<Vec<Person>>;

    /// Persons whose id is in `ids`. Unknown ids are skipped.
    async fn get_persons(&self, ids: &[i32]) -> CoachResult<Vec<Person>>;

    async fn create_person(&self, person: NewPerson) -> CoachResult<Person>;

    async fn create_slot(&self, slot: NewSlot) -> CoachResult<Slot>;

    async fn get_slot(&self, id: i32) -> CoachResult<Option<Slot>>;

    /// Slots matching `filter`, ordered by date, start time and id.
    async fn find_slots(&self, filter: &SlotFilter) -> CoachResult<Vec<Slot>>;

    /// Every booked slot owned by `coach_id` or booked by `student_id`, on any date.
    async fn find_conflicts(&self, coach_id: Option<i32>, student_id: i32)
    -> CoachResult<Vec<Slot>>;

    /// Assigns the slot to `student_id` only if it is still available.
    ///
    /// Returns `None` when the slot does not exist or is already booked; the
    /// check and the write happen as one step.
    async fn book_slot(&self, id: i32, student_id: i32) -> CoachResult<Option<Slot>>;

    /// Overwrites rating and notes. Returns `None` when the slot does not exist.
    async fn record_feedback(&self, id: i32, feedback: Feedback) -> CoachResult<Option<Slot>>;
}
