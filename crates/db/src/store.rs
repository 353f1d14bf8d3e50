use async_trait::async_trait;
use coachsync_core::{
    errors::{CoachError, CoachResult},
    models::{
        person::{NewPerson, Person},
        slot::{Feedback, NewSlot, Slot, SlotFilter},
    },
    store::SlotStore,
};

use crate::{
    DbPool,
    repositories::{person, slot},
};

/// [`SlotStore`] backed by PostgreSQL.
#[derive(Clone)]
pub struct PgSlotStore {
    pool: DbPool,
}

impl PgSlotStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SlotStore for PgSlotStore {
    async fn list_persons(&self) -> CoachResult<Vec<Person>> {
        person::list_persons(&self.pool)
            .await?
            .into_iter()
            .map(Person::try_from)
            .collect()
    }

    async fn get_persons(&self, ids: &[i32]) -> CoachResult<Vec<Person>> {
        person::get_persons_by_ids(&self.pool, ids)
            .await?
            .into_iter()
            .map(Person::try_from)
            .collect()
    }

    async fn create_person(&self, new_person: NewPerson) -> CoachResult<Person> {
        let row = person::create_person(
            &self.pool,
            &new_person.name,
            &new_person.phone_number,
            new_person.role.as_str(),
        )
        .await?;
        Person::try_from(row)
    }

    async fn create_slot(&self, new_slot: NewSlot) -> CoachResult<Slot> {
        let row = slot::create_slot(
            &self.pool,
            new_slot.coach_id,
            new_slot.date,
            new_slot.time_start,
            new_slot.time_end,
        )
        .await
        .map_err(|err| {
            if is_foreign_key_violation(&err) {
                CoachError::NotFound(format!("Person with ID {} not found", new_slot.coach_id))
            } else {
                CoachError::Database(err)
            }
        })?;
        Ok(row.into())
    }

    async fn get_slot(&self, id: i32) -> CoachResult<Option<Slot>> {
        Ok(slot::get_slot_by_id(&self.pool, id).await?.map(Slot::from))
    }

    async fn find_slots(&self, filter: &SlotFilter) -> CoachResult<Vec<Slot>> {
        let rows = slot::find_slots(&self.pool, filter).await?;
        Ok(rows.into_iter().map(Slot::from).collect())
    }

    async fn find_conflicts(
        &self,
        coach_id: Option<i32>,
        student_id: i32,
    ) -> CoachResult<Vec<Slot>> {
        let rows = slot::find_booked_slots_involving(&self.pool, coach_id, student_id).await?;
        Ok(rows.into_iter().map(Slot::from).collect())
    }

    async fn book_slot(&self, id: i32, student_id: i32) -> CoachResult<Option<Slot>> {
        Ok(slot::book_slot(&self.pool, id, student_id)
            .await?
            .map(Slot::from))
    }

    async fn record_feedback(&self, id: i32, feedback: Feedback) -> CoachResult<Option<Slot>> {
        Ok(
            slot::update_feedback(&self.pool, id, feedback.rating, feedback.notes.as_deref())
                .await?
                .map(Slot::from),
        )
    }
}

/// True when the report wraps a PostgreSQL foreign-key violation.
fn is_foreign_key_violation(err: &eyre::Report) -> bool {
    err.downcast_ref::<sqlx::Error>()
        .and_then(sqlx::Error::as_database_error)
        .is_some_and(|db_err| db_err.is_foreign_key_violation())
}
