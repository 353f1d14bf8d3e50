use std::sync::Arc;

use axum::http::StatusCode;
use coachsync_core::{
    errors::CoachError,
    models::{
        person::{Person, Role},
        slot::SlotView,
    },
    store::SlotStore,
};
use coachsync_db::mock::MockStore;
use mockall::predicate;
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::{json, Value};

use crate::test_utils::{server_for, TestContext};

fn ids(views: &[SlotView]) -> Vec<i32> {
    views.iter().map(|v| v.id).collect()
}

#[tokio::test]
async fn test_add_slot_creates_available_slot() {
    let ctx = TestContext::new().await;

    let response = ctx
        .server
        .post("/slots/add")
        .json(&json!({
            "coach_id": ctx.coach_id,
            "date": "2099-01-01",
            "time_start": "09:00:00",
            "time_end": "10:00:00",
        }))
        .await;

    assert_eq!(response.status_code(), StatusCode::CREATED);
    assert_eq!(response.json::<Value>(), json!({ "message": "Slot added" }));

    let slots = ctx
        .server
        .get("/slots")
        .add_query_param("coach_id", ctx.coach_id)
        .await
        .json::<Vec<SlotView>>();
    assert_eq!(slots.len(), 1);
    assert_eq!(slots[0].start, "2099-01-01T09:00:00");
    assert_eq!(slots[0].end, "2099-01-01T10:00:00");
    assert_eq!(slots[0].coach_name, "Anna Gunn");
    assert_eq!(slots[0].coach_phone, "555-666-7777");
    assert_eq!(slots[0].student_id, None);
}

#[rstest]
#[case(json!({ "coach_id": 1, "date": "2099-01-01", "time_start": "10:00", "time_end": "09:00" }))]
#[case(json!({ "coach_id": 1, "date": "2099-01-01", "time_start": "10:00", "time_end": "10:00" }))]
#[case(json!({ "coach_id": 1, "date": "01/01/2099", "time_start": "09:00", "time_end": "10:00" }))]
#[case(json!({ "coach_id": 1, "date": "2099-01-01", "time_start": "nine", "time_end": "10:00" }))]
#[case(json!({ "coach_id": 1, "date": "2099-01-01", "time_start": "09:00" }))]
#[case(json!({ "coach_id": "one", "date": "2099-01-01", "time_start": "09:00", "time_end": "10:00" }))]
#[tokio::test]
async fn test_add_slot_rejects_malformed_payload(#[case] payload: Value) {
    let ctx = TestContext::new().await;

    let response = ctx.server.post("/slots/add").json(&payload).expect_failure().await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert!(response.json::<Value>()["error"].is_string());
}

#[tokio::test]
async fn test_add_slot_requires_a_coach() {
    let ctx = TestContext::new().await;

    let missing = ctx
        .server
        .post("/slots/add")
        .json(&json!({
            "coach_id": 999,
            "date": "2099-01-01",
            "time_start": "09:00",
            "time_end": "10:00",
        }))
        .expect_failure()
        .await;
    assert_eq!(missing.status_code(), StatusCode::NOT_FOUND);

    let student = ctx
        .server
        .post("/slots/add")
        .json(&json!({
            "coach_id": ctx.student_id,
            "date": "2099-01-01",
            "time_start": "09:00",
            "time_end": "10:00",
        }))
        .expect_failure()
        .await;
    assert_eq!(student.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_booking_then_second_booking_is_unavailable() {
    let ctx = TestContext::new().await;
    let slot_id = ctx.add_slot("2099-01-01", "09:00", "10:00").await;

    let first = ctx
        .server
        .put(&format!("/slots/book/{}", slot_id))
        .json(&json!({ "student_id": ctx.student_id }))
        .await;
    assert_eq!(first.status_code(), StatusCode::OK);
    assert_eq!(first.json::<Value>(), json!({ "message": "Slot booked" }));

    let second = ctx
        .server
        .put(&format!("/slots/book/{}", slot_id))
        .json(&json!({ "student_id": ctx.other_student_id }))
        .expect_failure()
        .await;
    assert_eq!(second.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(second.json::<Value>(), json!({ "error": "Slot unavailable" }));

    let stored = ctx.store.get_slot(slot_id).await.unwrap().unwrap();
    assert_eq!(stored.booked_by, Some(ctx.student_id));
}

#[tokio::test]
async fn test_booking_missing_slot_is_unavailable() {
    let ctx = TestContext::new().await;

    let response = ctx
        .server
        .put("/slots/book/404")
        .json(&json!({ "student_id": ctx.student_id }))
        .expect_failure()
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>(), json!({ "error": "Slot unavailable" }));
}

#[tokio::test]
async fn test_booking_requires_a_student() {
    let ctx = TestContext::new().await;
    let slot_id = ctx.add_slot("2099-01-01", "09:00", "10:00").await;

    let response = ctx
        .server
        .put(&format!("/slots/book/{}", slot_id))
        .json(&json!({ "student_id": ctx.coach_id }))
        .expect_failure()
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    let stored = ctx.store.get_slot(slot_id).await.unwrap().unwrap();
    assert_eq!(stored.booked_by, None);
}

#[tokio::test]
async fn test_student_view_hides_overlapping_and_keeps_touching_slots() {
    let ctx = TestContext::new().await;
    let s1 = ctx.add_slot("2099-01-01", "09:00", "10:00").await;
    let s2 = ctx.add_slot("2099-01-01", "09:30", "10:30").await;
    let s3 = ctx.add_slot("2099-01-01", "11:00", "12:00").await;
    let s4 = ctx.add_slot("2099-01-01", "10:00", "11:00").await;

    ctx.server
        .put(&format!("/slots/book/{}", s1))
        .json(&json!({ "student_id": ctx.student_id }))
        .await;

    let views = ctx
        .server
        .get("/slots")
        .add_query_param("coach_id", ctx.coach_id)
        .add_query_param("student_id", ctx.student_id)
        .await
        .json::<Vec<SlotView>>();

    assert_eq!(ids(&views), vec![s1, s4, s3]);
    assert!(!ids(&views).contains(&s2));

    let booked = &views[0];
    assert_eq!(booked.student_id, Some(ctx.student_id));
    assert_eq!(booked.student_name.as_deref(), Some("Betsy Brandt"));
    assert_eq!(booked.student_phone.as_deref(), Some("222-333-4444"));
}

#[tokio::test]
async fn test_coach_bookings_with_other_students_suppress_overlaps() {
    let ctx = TestContext::new().await;
    let taken = ctx.add_slot("2099-01-02", "14:00", "15:00").await;
    let clash = ctx.add_slot("2099-01-02", "14:30", "15:30").await;

    ctx.server
        .put(&format!("/slots/book/{}", taken))
        .json(&json!({ "student_id": ctx.other_student_id }))
        .await;

    let views = ctx
        .server
        .get("/slots")
        .add_query_param("coach_id", ctx.coach_id)
        .add_query_param("student_id", ctx.student_id)
        .await
        .json::<Vec<SlotView>>();

    // Another student's booking is not listed, and still blocks the overlap.
    assert!(!ids(&views).contains(&taken));
    assert!(!ids(&views).contains(&clash));
}

#[tokio::test]
async fn test_student_only_view_lists_their_upcoming_bookings() {
    let ctx = TestContext::new().await;
    let past = ctx.add_slot("2000-01-01", "09:00", "10:00").await;
    let upcoming = ctx.add_slot("2099-01-01", "09:00", "10:00").await;
    let open = ctx.add_slot("2099-01-01", "13:00", "14:00").await;

    for slot_id in [past, upcoming] {
        ctx.server
            .put(&format!("/slots/book/{}", slot_id))
            .json(&json!({ "student_id": ctx.student_id }))
            .await;
    }

    let views = ctx
        .server
        .get("/slots")
        .add_query_param("student_id", ctx.student_id)
        .await
        .json::<Vec<SlotView>>();

    assert_eq!(ids(&views), vec![upcoming]);
    assert!(!ids(&views).contains(&open));
}

#[tokio::test]
async fn test_listing_without_selection_returns_everything() {
    let ctx = TestContext::new().await;
    let past = ctx.add_slot("2000-01-01", "09:00", "10:00").await;
    let future = ctx.add_slot("2099-01-01", "09:00", "10:00").await;

    let views = ctx.server.get("/slots").await.json::<Vec<SlotView>>();

    assert_eq!(ids(&views), vec![past, future]);
}

#[tokio::test]
async fn test_blank_student_id_lists_like_coach_only() {
    let ctx = TestContext::new().await;
    let past = ctx.add_slot("2000-01-01", "09:00", "10:00").await;
    let booked = ctx.add_slot("2099-01-01", "09:00", "10:00").await;
    let overlapping = ctx.add_slot("2099-01-01", "09:30", "10:30").await;

    ctx.server
        .put(&format!("/slots/book/{}", booked))
        .json(&json!({ "student_id": ctx.other_student_id }))
        .await;

    let views = ctx
        .server
        .get("/slots")
        .add_query_param("coach_id", ctx.coach_id)
        .add_query_param("student_id", "")
        .await
        .json::<Vec<SlotView>>();

    assert_eq!(ids(&views), vec![past, booked, overlapping]);

    let everything = ctx
        .server
        .get("/slots")
        .add_query_param("coach_id", "")
        .add_query_param("student_id", "")
        .await
        .json::<Vec<SlotView>>();
    assert_eq!(ids(&everything), vec![past, booked, overlapping]);
}

#[tokio::test]
async fn test_listing_rejects_non_numeric_ids() {
    let ctx = TestContext::new().await;

    let response = ctx
        .server
        .get("/slots")
        .add_query_param("coach_id", "anna")
        .expect_failure()
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_feedback_is_overwritten_by_latest_call() {
    let ctx = TestContext::new().await;
    let slot_id = ctx.add_slot("2099-01-01", "09:00", "10:00").await;

    let first = ctx
        .server
        .post(&format!("/slots/feedback/{}", slot_id))
        .json(&json!({ "rating": 3, "notes": "Needs practice" }))
        .await;
    assert_eq!(first.status_code(), StatusCode::CREATED);
    assert_eq!(first.json::<Value>(), json!({ "message": "Feedback recorded" }));

    ctx.server
        .post(&format!("/slots/feedback/{}", slot_id))
        .json(&json!({ "rating": 5, "notes": "Great progress" }))
        .await;

    let views = ctx
        .server
        .get("/slots")
        .add_query_param("coach_id", ctx.coach_id)
        .await
        .json::<Vec<SlotView>>();
    assert_eq!(views[0].rating, Some(5));
    assert_eq!(views[0].notes.as_deref(), Some("Great progress"));
}

#[tokio::test]
async fn test_feedback_validation_and_missing_slot() {
    let ctx = TestContext::new().await;
    let slot_id = ctx.add_slot("2099-01-01", "09:00", "10:00").await;

    let out_of_range = ctx
        .server
        .post(&format!("/slots/feedback/{}", slot_id))
        .json(&json!({ "rating": 9, "notes": "" }))
        .expect_failure()
        .await;
    assert_eq!(out_of_range.status_code(), StatusCode::BAD_REQUEST);

    let missing = ctx
        .server
        .post("/slots/feedback/999")
        .json(&json!({ "rating": 4, "notes": "ok" }))
        .expect_failure()
        .await;
    assert_eq!(missing.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_store_failure_maps_to_internal_error() {
    let mut store = MockStore::new();
    store
        .expect_find_slots()
        .returning(|_| Err(CoachError::Database(eyre::eyre!("connection refused"))));

    let server = server_for(Arc::new(store));
    let response = server.get("/slots").expect_failure().await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = response.json::<Value>();
    assert!(body["error"].as_str().unwrap().contains("connection refused"));
}

#[tokio::test]
async fn test_lost_booking_race_reports_unavailable() {
    let mut store = MockStore::new();
    store.expect_get_persons().returning(|ids| {
        Ok(ids
            .iter()
            .map(|&id| Person {
                id,
                name: "Betsy Brandt".to_string(),
                phone_number: "222-333-4444".to_string(),
                role: Role::Student,
            })
            .collect())
    });
    // The conditional update found the slot already taken.
    store
        .expect_book_slot()
        .with(predicate::eq(7), predicate::eq(2))
        .times(1)
        .returning(|_, _| Ok(None));

    let server = server_for(Arc::new(store));
    let response = server
        .put("/slots/book/7")
        .json(&json!({ "student_id": 2 }))
        .expect_failure()
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>(), json!({ "error": "Slot unavailable" }));
}
