use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/api/admin/slots", get(handlers::admin::get_admin_slots))
        .route("/api/admin/blocked", get(handlers::admin::get_blocked_slots))
        .route("/api/admin/block", post(handlers::admin::block_slot))
        .route("/api/admin/unblock", post(handlers::admin::unblock_slot))
        .route("/api/admin/cancel", post(handlers::admin::cancel_booking))
        .route(
            "/api/admin/clear-all-blocked",
            post(handlers::admin::clear_all_blocked),
        )
}
