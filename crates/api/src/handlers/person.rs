use axum::{extract::State, Json};
use coachsync_core::models::person::PersonResponse;
use std::sync::Arc;

use crate::{middleware::error_handling::AppError, ApiState};

#[axum::debug_handler]
pub async fn list_persons(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<Vec<PersonResponse>>, AppError> {
    let persons = state.store.list_persons().await?;

    Ok(Json(persons.into_iter().map(PersonResponse::from).collect()))
}
