use axum::http::StatusCode;
use axum::response::IntoResponse;
use coachcal_api::middleware::error_handling::AppError;
use coachcal_core::errors::{BookingError, Conflict};
use coachcal_core::mock::repositories::MockSlotRepo;
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::{json, Value};

use crate::test_utils::server_with_repo;

async fn body_json(error: BookingError) -> (StatusCode, Value) {
    let response = AppError(error).into_response();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body should be readable");
    (status, serde_json::from_slice(&bytes).expect("body should be JSON"))
}

#[rstest]
#[case(BookingError::Validation("Invalid slot_time format".to_string()), StatusCode::BAD_REQUEST)]
#[case(BookingError::NotFound("Booking not found".to_string()), StatusCode::NOT_FOUND)]
#[case(BookingError::Conflict(Conflict::AlreadyBooked), StatusCode::CONFLICT)]
#[case(BookingError::Conflict(Conflict::SlotBlocked), StatusCode::CONFLICT)]
#[case(BookingError::Database(eyre::eyre!("pool timed out")), StatusCode::INTERNAL_SERVER_ERROR)]
#[case(BookingError::Dependency("meeting API down".to_string()), StatusCode::INTERNAL_SERVER_ERROR)]
fn test_error_status_mapping(#[case] error: BookingError, #[case] expected: StatusCode) {
    assert_eq!(AppError(error).status(), expected);
}

#[tokio::test]
async fn test_client_errors_carry_message_and_code() {
    let (status, body) =
        body_json(BookingError::NotFound("Slot not found in blocked list".to_string())).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        body,
        json!({
            "error": "Resource not found: Slot not found in blocked list",
            "code": "not_found",
        })
    );
}

#[tokio::test]
async fn test_server_errors_hide_details() {
    let (status, body) = body_json(BookingError::Database(eyre::eyre!(
        "password authentication failed for user coachcal"
    )))
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body,
        json!({"error": "Internal server error", "code": "storage_unavailable"})
    );
}

#[tokio::test]
async fn test_storage_failure_surfaces_as_500() {
    let mut repo = MockSlotRepo::new();
    repo.expect_list_bookings()
        .returning(|| Err(BookingError::Database(eyre::eyre!("connection refused"))));
    repo.expect_clear_blocked_slots()
        .returning(|| Err(BookingError::Database(eyre::eyre!("connection refused"))));
    let server = server_with_repo(repo);

    server
        .get("/api/slots")
        .await
        .assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    server
        .get("/api/admin/slots")
        .await
        .assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    server
        .post("/api/admin/clear-all-blocked")
        .await
        .assert_status(StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_health_and_version() {
    let server = server_with_repo(MockSlotRepo::new());

    let health = server.get("/health").await;
    health.assert_status_ok();
    assert_eq!(health.json::<Value>(), json!({"status": "ok"}));

    let version = server.get("/version").await;
    version.assert_status_ok();
    assert_eq!(version.json::<Value>()["version"], env!("CARGO_PKG_VERSION"));
}
