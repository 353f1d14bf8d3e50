//! # Slot Handlers
//!
//! Coaches publish availability, students browse and book it, and coaches
//! record feedback once a session has happened.
//!
//! Listings for a student go through [`visible_slots`], which hides open slots
//! that would clash with a booking the coach or the student already holds.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use chrono::Local;
use coachsync_core::{
    errors::CoachError,
    models::{
        person::{Person, Role},
        slot::{
            BookSlotRequest, CreateSlotRequest, FeedbackRequest, Slot, SlotFilter, SlotQuery,
            SlotView,
        },
        MessageResponse,
    },
    store::SlotStore,
    visibility::visible_slots,
};
use std::{collections::HashMap, sync::Arc};
use tracing::{info, warn};

use crate::{middleware::error_handling::AppError, ApiState};

/// `POST /slots/add`
#[axum::debug_handler]
pub async fn add_slot(
    State(state): State<Arc<ApiState>>,
    payload: Result<Json<CreateSlotRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<MessageResponse>), AppError> {
    let Json(payload) = payload?;
    let new_slot = payload.validate()?;

    require_role(state.store.as_ref(), new_slot.coach_id, Role::Coach).await?;

    let slot = state.store.create_slot(new_slot).await?;
    info!(
        "Slot {} added for coach {} on {} ({} - {})",
        slot.id, slot.coach_id, slot.date, slot.time_start, slot.time_end
    );

    Ok((StatusCode::CREATED, Json(MessageResponse::new("Slot added"))))
}

/// `GET /slots?coach_id=&student_id=`
///
/// Without a student the listing is returned as stored. With a student, past
/// slots are dropped and open slots overlapping an existing booking of either
/// party are hidden.
#[axum::debug_handler]
pub async fn list_slots(
    State(state): State<Arc<ApiState>>,
    query: Result<Query<SlotQuery>, QueryRejection>,
) -> Result<Json<Vec<SlotView>>, AppError> {
    let Query(query) = query?;
    let today = Local::now().date_naive();

    let filter = SlotFilter::for_request(query.coach_id, query.student_id, today);
    let mut slots = state.store.find_slots(&filter).await?;

    if let Some(student_id) = query.student_id {
        slots = visible_slots(state.store.as_ref(), query.coach_id, student_id, slots).await?;
    }

    let views = project_slots(state.store.as_ref(), slots).await?;
    Ok(Json(views))
}

/// `PUT /slots/book/:slot_id`
#[axum::debug_handler]
pub async fn book_slot(
    State(state): State<Arc<ApiState>>,
    slot_id: Result<Path<i32>, PathRejection>,
    payload: Result<Json<BookSlotRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, AppError> {
    let Path(slot_id) = slot_id?;
    let Json(payload) = payload?;

    require_role(state.store.as_ref(), payload.student_id, Role::Student).await?;

    match state.store.book_slot(slot_id, payload.student_id).await? {
        Some(slot) => {
            info!("Slot {} booked by student {}", slot.id, payload.student_id);
            Ok(Json(MessageResponse::new("Slot booked")))
        }
        None => {
            warn!(
                "Student {} could not book slot {}: missing or already booked",
                payload.student_id, slot_id
            );
            Err(AppError(CoachError::SlotUnavailable))
        }
    }
}

/// `POST /slots/feedback/:slot_id`
#[axum::debug_handler]
pub async fn record_feedback(
    State(state): State<Arc<ApiState>>,
    slot_id: Result<Path<i32>, PathRejection>,
    payload: Result<Json<FeedbackRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<MessageResponse>), AppError> {
    let Path(slot_id) = slot_id?;
    let Json(payload) = payload?;
    let feedback = payload.validate()?;

    let slot = state
        .store
        .record_feedback(slot_id, feedback)
        .await?
        .ok_or_else(|| CoachError::NotFound(format!("Slot with ID {} not found", slot_id)))?;
    info!("Feedback recorded for slot {}", slot.id);

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("Feedback recorded")),
    ))
}

async fn require_role(store: &dyn SlotStore, person_id: i32, role: Role) -> Result<Person, AppError> {
    let person = store
        .get_persons(&[person_id])
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| CoachError::NotFound(format!("Person with ID {} not found", person_id)))?;

    if person.role != role {
        return Err(AppError(CoachError::Validation(format!(
            "Person {} is a {}, not a {}",
            person.id, person.role, role
        ))));
    }

    Ok(person)
}

/// Attaches coach and student details to each slot, loading every referenced
/// person in one store call.
async fn project_slots(store: &dyn SlotStore, slots: Vec<Slot>) -> Result<Vec<SlotView>, AppError> {
    let mut ids: Vec<i32> = slots
        .iter()
        .flat_map(|slot| std::iter::once(slot.coach_id).chain(slot.booked_by))
        .collect();
    ids.sort_unstable();
    ids.dedup();

    let persons: HashMap<i32, Person> = store
        .get_persons(&ids)
        .await?
        .into_iter()
        .map(|person| (person.id, person))
        .collect();

    let lookup = |id: i32| {
        persons
            .get(&id)
            .ok_or_else(|| CoachError::NotFound(format!("Person with ID {} not found", id)))
    };

    slots
        .into_iter()
        .map(|slot| {
            let coach = lookup(slot.coach_id)?;
            let student = slot.booked_by.map(lookup).transpose()?;
            Ok(SlotView::new(slot, coach, student))
        })
        .collect()
}
