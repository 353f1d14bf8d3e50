use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Deserializer, Serialize, de::Error as _};

use crate::errors::{CoachError, CoachResult};
use crate::models::person::Person;

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const TIME_FORMAT: &str = "%H:%M:%S";
const SHORT_TIME_FORMAT: &str = "%H:%M";

pub const MIN_RATING: i32 = 1;
pub const MAX_RATING: i32 = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    pub id: i32,
    pub coach_id: i32,
    pub date: NaiveDate,
    pub time_start: NaiveTime,
    pub time_end: NaiveTime,
    pub booked_by: Option<i32>,
    pub rating: Option<i32>,
    pub notes: Option<String>,
}

impl Slot {
    pub fn is_booked(&self) -> bool {
        self.booked_by.is_some()
    }

    pub fn is_available(&self) -> bool {
        self.booked_by.is_none()
    }
}

/// A validated slot ready to be stored; always starts out available.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSlot {
    pub coach_id: i32,
    pub date: NaiveDate,
    pub time_start: NaiveTime,
    pub time_end: NaiveTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSlotRequest {
    pub coach_id: i32,
    pub date: String,
    pub time_start: String,
    pub time_end: String,
}

impl CreateSlotRequest {
    pub fn validate(&self) -> CoachResult<NewSlot> {
        let date = NaiveDate::parse_from_str(self.date.trim(), DATE_FORMAT).map_err(|_| {
            CoachError::Validation(format!(
                "Invalid date '{}', expected YYYY-MM-DD",
                self.date
            ))
        })?;
        let time_start = parse_clock_time("time_start", &self.time_start)?;
        let time_end = parse_clock_time("time_end", &self.time_end)?;

        if time_start >= time_end {
            return Err(CoachError::Validation(format!(
                "time_start ({}) must be before time_end ({})",
                time_start.format(TIME_FORMAT),
                time_end.format(TIME_FORMAT)
            )));
        }

        Ok(NewSlot {
            coach_id: self.coach_id,
            date,
            time_start,
            time_end,
        })
    }
}

fn parse_clock_time(field: &str, value: &str) -> CoachResult<NaiveTime> {
    let value = value.trim();
    NaiveTime::parse_from_str(value, TIME_FORMAT)
        .or_else(|_| NaiveTime::parse_from_str(value, SHORT_TIME_FORMAT))
        .map_err(|_| {
            CoachError::Validation(format!(
                "Invalid {} '{}', expected HH:MM or HH:MM:SS",
                field, value
            ))
        })
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookSlotRequest {
    pub student_id: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackRequest {
    pub rating: i32,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feedback {
    pub rating: i32,
    pub notes: Option<String>,
}

impl FeedbackRequest {
    pub fn validate(self) -> CoachResult<Feedback> {
        if !(MIN_RATING..=MAX_RATING).contains(&self.rating) {
            return Err(CoachError::Validation(format!(
                "rating must be between {} and {}, got {}",
                MIN_RATING, MAX_RATING, self.rating
            )));
        }
        Ok(Feedback {
            rating: self.rating,
            notes: self.notes,
        })
    }
}

/// Query string of `GET /slots`. A blank value (`coach_id=`) counts as absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SlotQuery {
    #[serde(default, deserialize_with = "blank_as_none")]
    pub coach_id: Option<i32>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub student_id: Option<i32>,
}

fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(value) if !value.trim().is_empty() => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| D::Error::custom(format!("invalid id '{}', expected an integer", value))),
        _ => Ok(None),
    }
}

/// How a slot listing is restricted by booking state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingScope {
    Any,
    BookedBy(i32),
    AvailableOrBookedBy(i32),
}

/// Coarse predicate for slot listings, composed from the optional coach and
/// student selected by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotFilter {
    pub coach_id: Option<i32>,
    pub booking: BookingScope,
    pub not_before: Option<NaiveDate>,
}

impl SlotFilter {
    pub fn all() -> Self {
        Self {
            coach_id: None,
            booking: BookingScope::Any,
            not_before: None,
        }
    }

    /// Builds the listing predicate for a coach/student selection.
    ///
    /// A student only ever sees slots from `today` onwards. With a coach as
    /// well, they see that coach's open slots plus their own bookings with them.
    pub fn for_request(coach_id: Option<i32>, student_id: Option<i32>, today: NaiveDate) -> Self {
        let booking = match (coach_id, student_id) {
            (_, None) => BookingScope::Any,
            (None, Some(student_id)) => BookingScope::BookedBy(student_id),
            (Some(_), Some(student_id)) => BookingScope::AvailableOrBookedBy(student_id),
        };

        Self {
            coach_id,
            booking,
            not_before: student_id.map(|_| today),
        }
    }

    pub fn matches(&self, slot: &Slot) -> bool {
        if self.coach_id.is_some_and(|coach_id| slot.coach_id != coach_id) {
            return false;
        }
        if self.not_before.is_some_and(|today| slot.date < today) {
            return false;
        }
        match self.booking {
            BookingScope::Any => true,
            BookingScope::BookedBy(student_id) => slot.booked_by == Some(student_id),
            BookingScope::AvailableOrBookedBy(student_id) => {
                slot.booked_by.is_none() || slot.booked_by == Some(student_id)
            }
        }
    }
}

/// JSON projection of a slot with its coach and (optional) booking student.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotView {
    pub id: i32,
    pub start: String,
    pub end: String,
    pub coach_id: i32,
    pub coach_name: String,
    pub coach_phone: String,
    pub student_id: Option<i32>,
    pub student_name: Option<String>,
    pub student_phone: Option<String>,
    pub rating: Option<i32>,
    pub notes: Option<String>,
}

impl SlotView {
    pub fn new(slot: Slot, coach: &Person, student: Option<&Person>) -> Self {
        Self {
            id: slot.id,
            start: format_instant(slot.date, slot.time_start),
            end: format_instant(slot.date, slot.time_end),
            coach_id: coach.id,
            coach_name: coach.name.clone(),
            coach_phone: coach.phone_number.clone(),
            student_id: slot.booked_by,
            student_name: student.map(|s| s.name.clone()),
            student_phone: student.map(|s| s.phone_number.clone()),
            rating: slot.rating,
            notes: slot.notes,
        }
    }
}

fn format_instant(date: NaiveDate, time: NaiveTime) -> String {
    format!("{}T{}", date.format(DATE_FORMAT), time.format(TIME_FORMAT))
}
