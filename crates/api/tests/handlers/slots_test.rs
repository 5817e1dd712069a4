use axum::http::StatusCode;
use coachcal_core::mock::repositories::{MockMailer, MockMeetingApi};
use coachcal_core::models::meeting::Meeting;
use coachcal_core::models::slot::PublicSlot;
use coachcal_core::store::SlotStore;
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::{json, Value};

use crate::test_utils::{utc, TestContext};

fn booking_body(slot_time: &str) -> Value {
    json!({
        "slot_time": slot_time,
        "name": "Olena Kovalenko",
        "email": "olena@example.com",
    })
}

#[tokio::test]
async fn test_get_slots_lists_future_candidates() {
    let server = TestContext::new().server();

    let response = server.get("/api/slots").await;

    response.assert_status_ok();
    let slots: Vec<PublicSlot> = response.json();
    // 20 slots remain today after 10:00, plus 29 full days of 23.
    assert_eq!(slots.len(), 20 + 29 * 23);
    assert_eq!(slots[0].slot_time, "2025-06-01T10:30:00+02:00");
    assert!(slots.iter().all(|slot| slot.available));
}

#[tokio::test]
async fn test_get_slots_is_idempotent() {
    let ctx = TestContext::new();
    ctx.store.insert_blocked_slot(utc("2025-06-02T10:00:00Z")).await.unwrap();
    let server = ctx.server();

    let first: Value = server.get("/api/slots").await.json();
    let second: Value = server.get("/api/slots").await.json();

    assert_eq!(first, second);
}

#[tokio::test]
async fn test_booking_then_duplicate() {
    let server = TestContext::new().server();

    let response = server
        .post("/api/bookings")
        .json(&booking_body("2025-06-02T11:30:00+02:00"))
        .await;
    response.assert_status(StatusCode::CREATED);
    assert_eq!(
        response.json::<Value>(),
        json!({
            "message": "Booking created successfully",
            "slot_time": "2025-06-02T11:30:00+02:00",
        })
    );

    let duplicate = server
        .post("/api/bookings")
        .json(&booking_body("2025-06-02T11:30:00+02:00"))
        .await;
    duplicate.assert_status(StatusCode::CONFLICT);
    assert_eq!(
        duplicate.json::<Value>(),
        json!({"error": "Slot already booked", "code": "already_booked"})
    );
}

#[tokio::test]
async fn test_booked_slot_becomes_unavailable() {
    let server = TestContext::new().server();

    server
        .post("/api/bookings")
        .json(&booking_body("2025-06-02T09:30:00Z"))
        .await
        .assert_status(StatusCode::CREATED);

    let slots: Vec<PublicSlot> = server.get("/api/slots").await.json();
    let slot = slots
        .iter()
        .find(|slot| slot.slot_time == "2025-06-02T11:30:00+02:00")
        .expect("slot should be listed");
    assert!(!slot.available);
}

#[rstest]
#[case(json!({"slot_time": "2025-06-02T11:30:00+02:00", "name": "", "email": "olena@example.com"}))]
#[case(json!({"slot_time": "2025-06-02T11:30:00+02:00", "name": "Olena"}))]
#[case(json!({"name": "Olena", "email": "olena@example.com"}))]
#[case(json!({"slot_time": "tomorrow at noon", "name": "Olena", "email": "olena@example.com"}))]
#[case(json!({"slot_time": "2025-05-30T11:30:00+02:00", "name": "Olena", "email": "olena@example.com"}))]
#[tokio::test]
async fn test_booking_rejects_invalid_requests(#[case] body: Value) {
    let ctx = TestContext::new();
    let store = ctx.store.clone();
    let server = ctx.server();

    let response = server.post("/api/bookings").json(&body).await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["code"], "invalid_request");
    assert!(store.list_bookings().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_booking_rejects_malformed_json() {
    let server = TestContext::new().server();

    let response = server
        .post("/api/bookings")
        .text("{\"slot_time\": ")
        .content_type("application/json")
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_booking_past_slot_message() {
    let server = TestContext::new().server();

    let response = server
        .post("/api/bookings")
        .json(&booking_body("2025-06-01T07:30:00Z"))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json::<Value>()["error"],
        "Validation error: Cannot book past slots"
    );
}

#[tokio::test]
async fn test_booking_blocked_slot() {
    let ctx = TestContext::new();
    ctx.store.insert_blocked_slot(utc("2025-06-02T09:30:00Z")).await.unwrap();
    let server = ctx.server();

    let response = server
        .post("/api/bookings")
        .json(&booking_body("2025-06-02T11:30:00+02:00"))
        .await;

    response.assert_status(StatusCode::CONFLICT);
    assert_eq!(
        response.json::<Value>(),
        json!({"error": "Cannot book a blocked slot", "code": "slot_blocked"})
    );
}

#[tokio::test]
async fn test_booking_returns_meeting_link_and_sends_confirmation() {
    let mut meetings = MockMeetingApi::new();
    meetings.expect_create_meeting().times(1).returning(|_| {
        Ok(Meeting {
            id: "84120593311".to_string(),
            join_url: "https://zoom.us/j/84120593311".to_string(),
        })
    });
    let mut mailer = MockMailer::new();
    mailer
        .expect_send_confirmation()
        .withf(|confirmation| confirmation.email == "olena@example.com")
        .times(1)
        .returning(|_| Ok(()));

    let server = TestContext::new()
        .with_meetings(meetings)
        .with_mailer(mailer)
        .server();

    let response = server
        .post("/api/bookings")
        .json(&booking_body("2025-06-02T11:30:00+02:00"))
        .await;

    response.assert_status(StatusCode::CREATED);
    assert_eq!(
        response.json::<Value>()["meeting_url"],
        "https://zoom.us/j/84120593311"
    );
}

#[tokio::test]
async fn test_confirmation_failure_still_books() {
    let mut mailer = MockMailer::new();
    mailer
        .expect_send_confirmation()
        .times(1)
        .returning(|_| Err(eyre::eyre!("mail relay down")));

    let ctx = TestContext::new().with_mailer(mailer);
    let store = ctx.store.clone();
    let server = ctx.server();

    server
        .post("/api/bookings")
        .json(&booking_body("2025-06-02T11:30:00+02:00"))
        .await
        .assert_status(StatusCode::CREATED);

    assert_eq!(store.list_bookings().await.unwrap().len(), 1);
}
