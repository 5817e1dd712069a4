//! Public booking endpoints: the availability list clients pick from and the
//! booking form submission.

use axum::{extract::rejection::JsonRejection, extract::State, http::StatusCode, Json};
use coachcal_core::{
    models::{
        booking::{CreateBookingRequest, CreateBookingResponse},
        slot::PublicSlot,
    },
    normalize::format_in_zone,
};
use std::sync::Arc;

use crate::{middleware::error_handling::AppError, ApiState};

#[axum::debug_handler]
pub async fn get_slots(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<Vec<PublicSlot>>, AppError> {
    let slots = state.service.public_slots(state.now()).await?;
    Ok(Json(slots))
}

/// Books one slot. The meeting link, when one was provisioned, is returned so
/// the client can show it right away.
#[axum::debug_handler]
pub async fn create_booking(
    State(state): State<Arc<ApiState>>,
    payload: Result<Json<CreateBookingRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CreateBookingResponse>), AppError> {
    let Json(payload) = payload?;

    let booking = state.service.create_booking(&payload, state.now()).await?;

    let response = CreateBookingResponse {
        message: "Booking created successfully".to_string(),
        slot_time: format_in_zone(&booking.slot_time, state.service.schedule().timezone()),
        meeting_url: booking.meeting_url,
    };
    Ok((StatusCode::CREATED, Json(response)))
}
