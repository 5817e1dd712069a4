use axum::{extract::rejection::JsonRejection, extract::State, http::StatusCode, Json};
use coachcal_core::models::{
    booking::{ClearBlockedResponse, MessageResponse, SlotTimeRequest},
    slot::{AdminSlot, BlockedSlotView},
};
use std::sync::Arc;
use tracing::info;

use crate::{middleware::error_handling::AppError, ApiState};

#[axum::debug_handler]
pub async fn get_admin_slots(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<Vec<AdminSlot>>, AppError> {
    let slots = state.service.admin_slots(state.now()).await?;
    Ok(Json(slots))
}

/// Every stored blocked slot, with the forms it compares under.
#[axum::debug_handler]
pub async fn get_blocked_slots(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<Vec<BlockedSlotView>>, AppError> {
    let blocked = state.service.blocked_slots().await?;
    Ok(Json(blocked))
}

#[axum::debug_handler]
pub async fn block_slot(
    State(state): State<Arc<ApiState>>,
    payload: Result<Json<SlotTimeRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<MessageResponse>), AppError> {
    let Json(payload) = payload?;

    state.service.block_slot(&payload.slot_time).await?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("Slot blocked successfully")),
    ))
}

#[axum::debug_handler]
pub async fn unblock_slot(
    State(state): State<Arc<ApiState>>,
    payload: Result<Json<SlotTimeRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, AppError> {
    let Json(payload) = payload?;

    state.service.unblock_slot(&payload.slot_time).await?;

    Ok(Json(MessageResponse::new("Slot unblocked successfully")))
}

#[axum::debug_handler]
pub async fn cancel_booking(
    State(state): State<Arc<ApiState>>,
    payload: Result<Json<SlotTimeRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, AppError> {
    let Json(payload) = payload?;

    state.service.cancel_booking(&payload.slot_time).await?;

    Ok(Json(MessageResponse::new("Booking cancelled successfully")))
}

#[axum::debug_handler]
pub async fn clear_all_blocked(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<ClearBlockedResponse>, AppError> {
    let rows_affected = state.service.clear_blocked_slots().await?;
    info!("Admin cleared all blocked slots ({} rows)", rows_affected);

    Ok(Json(ClearBlockedResponse {
        message: "All blocked slots cleared".to_string(),
        rows_affected,
    }))
}
