//! In-process [`SlotStore`] with the same semantics as the PostgreSQL store.
//!
//! Used by the HTTP tests; also handy for running the API without a database.

use async_trait::async_trait;
use coachsync_core::{
    errors::{CoachError, CoachResult},
    models::{
        person::{NewPerson, Person},
        slot::{Feedback, NewSlot, Slot, SlotFilter},
    },
    store::SlotStore,
};
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct Tables {
    persons: Vec<Person>,
    slots: Vec<Slot>,
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SlotStore for MemoryStore {
    async fn list_persons(&self) -> CoachResult<Vec<Person>> {
        Ok(self.tables.read().await.persons.clone())
    }

    async fn get_persons(&self, ids: &[i32]) -> CoachResult<Vec<Person>> {
        let tables = self.tables.read().await;
        Ok(tables
            .persons
            .iter()
            .filter(|p| ids.contains(&p.id))
            .cloned()
            .collect())
    }

    async fn create_person(&self, new_person: NewPerson) -> CoachResult<Person> {
        let mut tables = self.tables.write().await;
        let person = Person {
            id: next_id(tables.persons.iter().map(|p| p.id)),
            name: new_person.name,
            phone_number: new_person.phone_number,
            role: new_person.role,
        };
        tables.persons.push(person.clone());
        Ok(person)
    }

    async fn create_slot(&self, new_slot: NewSlot) -> CoachResult<Slot> {
        if new_slot.time_start >= new_slot.time_end {
            return Err(CoachError::Validation(
                "time_start must be before time_end".to_string(),
            ));
        }

        let mut tables = self.tables.write().await;
        if !tables.persons.iter().any(|p| p.id == new_slot.coach_id) {
            return Err(CoachError::NotFound(format!(
                "Person with ID {} not found",
                new_slot.coach_id
            )));
        }

        let slot = Slot {
            id: next_id(tables.slots.iter().map(|s| s.id)),
            coach_id: new_slot.coach_id,
            date: new_slot.date,
            time_start: new_slot.time_start,
            time_end: new_slot.time_end,
            booked_by: None,
            rating: None,
            notes: None,
        };
        tables.slots.push(slot.clone());
        Ok(slot)
    }

    async fn get_slot(&self, id: i32) -> CoachResult<Option<Slot>> {
        let tables = self.tables.read().await;
        Ok(tables.slots.iter().find(|s| s.id == id).cloned())
    }

    async fn find_slots(&self, filter: &SlotFilter) -> CoachResult<Vec<Slot>> {
        let tables = self.tables.read().await;
        let mut slots: Vec<Slot> = tables
            .slots
            .iter()
            .filter(|s| filter.matches(s))
            .cloned()
            .collect();
        slots.sort_by_key(|s| (s.date, s.time_start, s.id));
        Ok(slots)
    }

    async fn find_conflicts(
        &self,
        coach_id: Option<i32>,
        student_id: i32,
    ) -> CoachResult<Vec<Slot>> {
        let tables = self.tables.read().await;
        Ok(tables
            .slots
            .iter()
            .filter(|s| s.is_booked())
            .filter(|s| Some(s.coach_id) == coach_id || s.booked_by == Some(student_id))
            .cloned()
            .collect())
    }

    async fn book_slot(&self, id: i32, student_id: i32) -> CoachResult<Option<Slot>> {
        let mut tables = self.tables.write().await;
        let booked = tables
            .slots
            .iter_mut()
            .find(|s| s.id == id && s.is_available())
            .map(|slot| {
                slot.booked_by = Some(student_id);
                slot.clone()
            });
        Ok(booked)
    }

    async fn record_feedback(&self, id: i32, feedback: Feedback) -> CoachResult<Option<Slot>> {
        let mut tables = self.tables.write().await;
        let updated = tables.slots.iter_mut().find(|s| s.id == id).map(|slot| {
            slot.rating = Some(feedback.rating);
            slot.notes = feedback.notes;
            slot.clone()
        });
        Ok(updated)
    }
}

fn next_id(existing: impl Iterator<Item = i32>) -> i32 {
    existing.max().unwrap_or(0) + 1
}
