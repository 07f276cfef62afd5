use axum::{Router, routing::get};
use std::sync::Arc;

use crate::{ApiState, handlers};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/api/conflicts", get(handlers::conflicts::check_conflict))
        .route(
            "/api/tokens/:token/availability",
            get(handlers::conflicts::token_availability),
        )
}
