use axum::http::StatusCode;
use coachcal_core::mock::repositories::MockMeetingApi;
use coachcal_core::models::booking::NewBooking;
use coachcal_core::models::slot::{AdminSlot, BlockedSlotView, SlotStatus};
use coachcal_core::store::SlotStore;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use crate::test_utils::{utc, TestContext};

fn slot(slot_time: &str) -> Value {
    json!({ "slot_time": slot_time })
}

fn new_booking(slot_time: &str, meeting_ref: Option<&str>) -> NewBooking {
    NewBooking {
        slot_time: utc(slot_time),
        name: "Olena Kovalenko".to_string(),
        email: "olena@example.com".to_string(),
        meeting_ref: meeting_ref.map(str::to_string),
        meeting_url: meeting_ref.map(|id| format!("https://zoom.us/j/{}", id)),
    }
}

#[tokio::test]
async fn test_block_then_block_again() {
    let server = TestContext::new().server();

    let response = server
        .post("/api/admin/block")
        .json(&slot("2025-06-02T12:00:00+02:00"))
        .await;
    response.assert_status(StatusCode::CREATED);
    assert_eq!(
        response.json::<Value>(),
        json!({"message": "Slot blocked successfully"})
    );

    let again = server
        .post("/api/admin/block")
        .json(&slot("2025-06-02T10:00:00Z"))
        .await;
    again.assert_status(StatusCode::CONFLICT);
    assert_eq!(again.json::<Value>()["code"], "already_blocked");
}

#[tokio::test]
async fn test_block_booked_slot_has_distinct_reason() {
    let ctx = TestContext::new();
    ctx.store
        .insert_booking(new_booking("2025-06-02T09:30:00Z", None))
        .await
        .unwrap();
    let server = ctx.server();

    let response = server
        .post("/api/admin/block")
        .json(&slot("2025-06-02T11:30:00+02:00"))
        .await;

    response.assert_status(StatusCode::CONFLICT);
    assert_eq!(
        response.json::<Value>(),
        json!({
            "error": "Cannot block a slot that is already booked",
            "code": "slot_booked",
        })
    );
}

#[tokio::test]
async fn test_block_rejects_bad_input() {
    let server = TestContext::new().server();

    server
        .post("/api/admin/block")
        .json(&slot("not a time"))
        .await
        .assert_status(StatusCode::BAD_REQUEST);
    server
        .post("/api/admin/block")
        .json(&json!({}))
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unblock_round_trip() {
    let server = TestContext::new().server();

    server
        .post("/api/admin/unblock")
        .json(&slot("2025-06-02T12:00:00+02:00"))
        .await
        .assert_status(StatusCode::NOT_FOUND);

    server
        .post("/api/admin/block")
        .json(&slot("2025-06-02T12:00:00+02:00"))
        .await
        .assert_status(StatusCode::CREATED);

    let response = server
        .post("/api/admin/unblock")
        .json(&slot("2025-06-02T10:00:00Z"))
        .await;
    response.assert_status_ok();
    assert_eq!(
        response.json::<Value>(),
        json!({"message": "Slot unblocked successfully"})
    );
}

#[tokio::test]
async fn test_cancel_booking_deletes_meeting() {
    let mut meetings = MockMeetingApi::new();
    meetings
        .expect_delete_meeting()
        .withf(|meeting_ref| meeting_ref == "84120593311")
        .times(1)
        .returning(|_| Err(eyre::eyre!("meeting API returned 500")));

    let ctx = TestContext::new().with_meetings(meetings);
    ctx.store
        .insert_booking(new_booking("2025-06-02T09:30:00Z", Some("84120593311")))
        .await
        .unwrap();
    let store = ctx.store.clone();
    let server = ctx.server();

    let response = server
        .post("/api/admin/cancel")
        .json(&slot("2025-06-02T11:30:00+02:00"))
        .await;

    response.assert_status_ok();
    assert!(store.list_bookings().await.unwrap().is_empty());

    server
        .post("/api/admin/cancel")
        .json(&slot("2025-06-02T11:30:00+02:00"))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_admin_slots_show_holders_and_blocks() {
    let ctx = TestContext::new();
    ctx.store
        .insert_booking(new_booking("2025-06-02T09:30:00Z", None))
        .await
        .unwrap();
    ctx.store
        .insert_blocked_slot(utc("2025-06-02T10:00:00Z"))
        .await
        .unwrap();
    let server = ctx.server();

    let slots: Vec<AdminSlot> = server.get("/api/admin/slots").await.json();

    let booked = slots
        .iter()
        .find(|slot| slot.slot_time == "2025-06-02T11:30:00+02:00")
        .expect("booked slot should be listed");
    assert_eq!(booked.status, SlotStatus::Booked);
    assert_eq!(booked.name.as_deref(), Some("Olena Kovalenko"));
    assert_eq!(booked.email.as_deref(), Some("olena@example.com"));

    let blocked = slots
        .iter()
        .find(|slot| slot.slot_time == "2025-06-02T12:00:00+02:00")
        .expect("blocked slot should be listed");
    assert_eq!(blocked.status, SlotStatus::Blocked);
    assert_eq!(blocked.name, None);
}

#[tokio::test]
async fn test_blocked_diagnostics() {
    let ctx = TestContext::new();
    ctx.store
        .insert_blocked_slot(utc("2025-06-02T10:00:00Z"))
        .await
        .unwrap();
    let server = ctx.server();

    let blocked: Vec<BlockedSlotView> = server.get("/api/admin/blocked").await.json();

    assert_eq!(
        blocked,
        vec![BlockedSlotView {
            slot_time_utc: "2025-06-02T10:00:00Z".to_string(),
            slot_time_local: "2025-06-02T12:00:00+02:00".to_string(),
            slot_key: 1_748_858_400,
        }]
    );
}

#[tokio::test]
async fn test_clear_all_blocked() {
    let server = TestContext::new().server();

    let empty = server.post("/api/admin/clear-all-blocked").await;
    empty.assert_status_ok();
    assert_eq!(empty.json::<Value>()["rows_affected"], 0);

    for slot_time in ["2025-06-02T12:00:00+02:00", "2025-06-03T12:00:00+02:00"] {
        server
            .post("/api/admin/block")
            .json(&slot(slot_time))
            .await
            .assert_status(StatusCode::CREATED);
    }

    let cleared = server.post("/api/admin/clear-all-blocked").await;
    cleared.assert_status_ok();
    assert_eq!(
        cleared.json::<Value>(),
        json!({"message": "All blocked slots cleared", "rows_affected": 2})
    );
}
