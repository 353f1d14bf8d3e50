use std::sync::Arc;

use axum::http::StatusCode;
use coachsync_core::{errors::CoachError, models::person::{PersonResponse, Role}};
use coachsync_db::mock::MockStore;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use crate::test_utils::{server_for, TestContext};

#[tokio::test]
async fn test_list_persons_returns_directory_without_phone_numbers() {
    let ctx = TestContext::new().await;

    let response = ctx.server.get("/persons").await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let body = response.json::<Value>();
    assert_eq!(
        body[0],
        json!({ "id": ctx.coach_id, "name": "Anna Gunn", "role": "coach" })
    );

    let persons = response.json::<Vec<PersonResponse>>();
    let roles: Vec<Role> = persons.iter().map(|p| p.role).collect();
    assert_eq!(roles, vec![Role::Coach, Role::Student, Role::Student]);
}

#[tokio::test]
async fn test_list_persons_store_failure() {
    let mut store = MockStore::new();
    store
        .expect_list_persons()
        .times(1)
        .returning(|| Err(CoachError::Database(eyre::eyre!("pool timed out"))));

    let server = server_for(Arc::new(store));
    let response = server.get("/persons").expect_failure().await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_health_and_version() {
    let ctx = TestContext::new().await;

    let health = ctx.server.get("/health").await;
    assert_eq!(health.json::<Value>(), json!({ "status": "ok" }));

    let version = ctx.server.get("/version").await.json::<Value>();
    assert_eq!(version["name"], "coachsync-api");
}
