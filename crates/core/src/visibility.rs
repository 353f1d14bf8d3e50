//! # Slot Visibility
//!
//! Decides which slots a student is shown when browsing a coach's calendar.
//!
//! Booked candidates are always kept. An available candidate is hidden when its
//! time range overlaps any booked slot that involves either party: a slot the
//! coach is already teaching, or a slot the student has already booked with
//! anyone. The conflict pool is global and ignores the date range of the
//! listing.
//!
//! Ranges are half-open, so a slot ending at 10:00 does not clash with one
//! starting at 10:00.

use chrono::NaiveDateTime;
use tracing::debug;

use crate::errors::{CoachError, CoachResult};
use crate::models::slot::{Slot, TIME_FORMAT};
use crate::store::SlotStore;

/// `[start, end)` of a slot on the calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotInterval {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl SlotInterval {
    /// Fails with a validation error if the slot does not end after it starts.
    pub fn of(slot: &Slot) -> CoachResult<Self> {
        if slot.time_start >= slot.time_end {
            return Err(CoachError::Validation(format!(
                "Slot {} has an empty or inverted time range ({} - {})",
                slot.id,
                slot.time_start.format(TIME_FORMAT),
                slot.time_end.format(TIME_FORMAT)
            )));
        }

        Ok(Self {
            start: slot.date.and_time(slot.time_start),
            end: slot.date.and_time(slot.time_end),
        })
    }

    pub fn overlaps(&self, other: &SlotInterval) -> bool {
        self.start < other.end && self.end > other.start
    }
}

/// Keeps every booked candidate and the available candidates that do not
/// overlap any slot in `conflicts`.
///
/// Output order is booked candidates first, then surviving available ones,
/// each in input order.
///
/// # Time Complexity
///
/// O(A × C) for A available candidates and C conflicts.
pub fn filter_visible_slots(candidates: Vec<Slot>, conflicts: &[Slot]) -> CoachResult<Vec<Slot>> {
    let conflict_intervals = conflicts
        .iter()
        .map(SlotInterval::of)
        .collect::<CoachResult<Vec<_>>>()?;

    let (mut visible, available): (Vec<Slot>, Vec<Slot>) =
        candidates.into_iter().partition(Slot::is_booked);

    for slot in available {
        let interval = SlotInterval::of(&slot)?;
        if conflict_intervals.iter().any(|busy| interval.overlaps(busy)) {
            debug!("Hiding slot {}: overlaps an existing booking", slot.id);
            continue;
        }
        visible.push(slot);
    }

    Ok(visible)
}

/// Loads the conflict pool for a coach/student pair from `store` and applies
/// [`filter_visible_slots`] to `candidates`.
pub async fn visible_slots(
    store: &dyn SlotStore,
    coach_id: Option<i32>,
    student_id: i32,
    candidates: Vec<Slot>,
) -> CoachResult<Vec<Slot>> {
    let conflicts = store.find_conflicts(coach_id, student_id).await?;
    debug!(
        "Filtering {} candidate slots against {} bookings (coach={:?}, student={})",
        candidates.len(),
        conflicts.len(),
        coach_id,
        student_id
    );
    filter_visible_slots(candidates, &conflicts)
}
