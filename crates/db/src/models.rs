use chrono::{NaiveDate, NaiveTime};
use coachsync_core::{
    errors::CoachError,
    models::{person::Person, slot::Slot},
};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbPerson {
    pub id: i32,
    pub name: String,
    pub phone_number: String,
    pub role: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbSlot {
    pub id: i32,
    pub coach_id: i32,
    pub date: NaiveDate,
    pub time_start: NaiveTime,
    pub time_end: NaiveTime,
    pub booked_by: Option<i32>,
    pub rating: Option<i32>,
    pub notes: Option<String>,
}

impl TryFrom<DbPerson> for Person {
    type Error = CoachError;

    fn try_from(row: DbPerson) -> Result<Self, Self::Error> {
        Ok(Person {
            id: row.id,
            role: row.role.parse()?,
            name: row.name,
            phone_number: row.phone_number,
        })
    }
}

impl From<DbSlot> for Slot {
    fn from(row: DbSlot) -> Self {
        Slot {
            id: row.id,
            coach_id: row.coach_id,
            date: row.date,
            time_start: row.time_start,
            time_end: row.time_end,
            booked_by: row.booked_by,
            rating: row.rating,
            notes: row.notes,
        }
    }
}
