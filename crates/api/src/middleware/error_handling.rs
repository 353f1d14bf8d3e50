//! # Error Handling Middleware
//!
//! Maps domain errors to HTTP status codes and a `{"error": "..."}` JSON body,
//! so every failure the API reports has the same shape.
//!
//! Extractor rejections (malformed JSON bodies, query strings or path segments)
//! are folded into [`CoachError::Validation`] instead of axum's plain-text
//! defaults.

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use coachsync_core::errors::CoachError;
use serde_json::json;
use tracing::error;

/// Application error wrapper that provides HTTP status code mapping
///
/// # Example
///
/// ```
/// use axum::Json;
/// use coachsync_api::middleware::error_handling::AppError;
/// use coachsync_core::errors::CoachError;
///
/// async fn handler(rating: i32) -> Result<Json<i32>, AppError> {
///     if rating > 5 {
///         return Err(AppError(CoachError::Validation("rating too high".to_string())));
///     }
///     Ok(Json(rating))
/// }
/// # fn main() {}
/// ```
#[derive(Debug)]
pub struct AppError(pub CoachError);

impl AppError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            CoachError::NotFound(_) => StatusCode::NOT_FOUND,
            CoachError::Validation(_) => StatusCode::BAD_REQUEST,
            CoachError::SlotUnavailable => StatusCode::BAD_REQUEST,
            CoachError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            CoachError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            error!("Request failed: {:?}", self.0);
        }

        let message = self.0.to_string();
        let body = Json(json!({ "error": message }));

        (status, body).into_response()
    }
}

impl From<CoachError> for AppError {
    fn from(err: CoachError) -> Self {
        AppError(err)
    }
}

/// Wraps the eyre error in a `CoachError::Database` variant.
impl From<eyre::Report> for AppError {
    fn from(err: eyre::Report) -> Self {
        AppError(CoachError::Database(err))
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError(CoachError::Validation(rejection.body_text()))
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError(CoachError::Validation(rejection.body_text()))
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError(CoachError::Validation(rejection.body_text()))
    }
}

/// Maps a CoachError to an HTTP response
pub fn map_error(err: CoachError) -> Response {
    AppError(err).into_response()
}
