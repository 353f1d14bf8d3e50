use axum::{
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/slots", get(handlers::slot::list_slots))
        .route("/slots/add", post(handlers::slot::add_slot))
        .route("/slots/book/:slot_id", put(handlers::slot::book_slot))
        .route(
            "/slots/feedback/:slot_id",
            post(handlers::slot::record_feedback),
        )
}
