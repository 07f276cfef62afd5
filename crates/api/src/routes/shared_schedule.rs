use axum::{
    Router,
    routing::{delete, get, post},
};
use std::sync::Arc;

use crate::{ApiState, handlers};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/shared-schedules",
            post(handlers::shared_schedule::create_shared_schedule)
                .get(handlers::shared_schedule::list_shared_schedules),
        )
        .route(
            "/api/shared-schedules/:id",
            get(handlers::shared_schedule::get_shared_schedule)
                .put(handlers::shared_schedule::update_shared_schedule),
        )
        .route(
            "/api/shared-schedules/:id/slots",
            post(handlers::shared_schedule::add_slots),
        )
        .route(
            "/api/shared-schedules/:id/slots/:slot_id",
            delete(handlers::shared_schedule::remove_slot),
        )
}
