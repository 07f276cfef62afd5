use axum::{Router, routing::get};
use std::sync::Arc;

use crate::{ApiState, handlers};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/api/options", get(handlers::options::get_options))
        .route("/api/options/services", get(handlers::options::list_services))
        .route("/api/options/locations", get(handlers::options::list_locations))
        .route("/api/options/companies", get(handlers::options::list_companies))
}
