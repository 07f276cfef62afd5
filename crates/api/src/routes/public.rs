use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

use crate::{ApiState, handlers};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/public/shared-schedules/:token",
            get(handlers::public::get_public_schedule),
        )
        .route(
            "/api/public/shared-schedules/:token/slots/:slot_id/select",
            post(handlers::public::select_slot),
        )
}
