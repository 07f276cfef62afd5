//! # Error Handling Middleware
//!
//! Maps [`ScheduleError`] to HTTP status codes and a JSON body of the form
//! `{"error": "<message>"}`, so every endpoint fails the same way.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use slotshare_core::errors::{ScheduleError, TokenInUse};

/// Application error wrapper that provides HTTP status code mapping
///
/// # Example
///
/// ```
/// use axum::Json;
/// use slotshare_api::middleware::error_handling::AppError;
/// use slotshare_core::errors::ScheduleError;
///
/// async fn handler(found: bool) -> Result<Json<&'static str>, AppError> {
///     if !found {
///         return Err(ScheduleError::NotFound("Shared schedule not found".to_string()).into());
///     }
///     Ok(Json("ok"))
/// }
/// # fn main() {}
/// ```
#[derive(Debug)]
pub struct AppError(pub ScheduleError);

impl AppError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            ScheduleError::NotFound(_) => StatusCode::NOT_FOUND,
            ScheduleError::Validation(_) => StatusCode::BAD_REQUEST,
            ScheduleError::Conflict(_) => StatusCode::CONFLICT,
            ScheduleError::TokenExhausted { .. } => StatusCode::SERVICE_UNAVAILABLE,
            ScheduleError::Authentication(_) => StatusCode::UNAUTHORIZED,
            ScheduleError::Authorization(_) => StatusCode::FORBIDDEN,
            ScheduleError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ScheduleError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            tracing::error!("Request failed: {:?}", self.0);
        } else {
            tracing::debug!("Request rejected with {}: {}", status, self.0);
        }

        let body = Json(json!({ "error": self.0.to_string() }));
        (status, body).into_response()
    }
}

impl From<ScheduleError> for AppError {
    fn from(err: ScheduleError) -> Self {
        AppError(err)
    }
}

/// Store failures become `Database` errors, except a share token collision,
/// which is reported as a conflict.
impl From<eyre::Report> for AppError {
    fn from(err: eyre::Report) -> Self {
        if let Some(taken) = err.downcast_ref::<TokenInUse>() {
            return AppError(ScheduleError::Conflict(taken.to_string()));
        }
        AppError(ScheduleError::Database(err))
    }
}

/// Maps a ScheduleError to an HTTP response
pub fn map_error(err: ScheduleError) -> Response {
    AppError(err).into_response()
}

/// Turns a failure of the timeout layer into a response.
pub async fn handle_timeout(err: tower::BoxError) -> Response {
    if err.is::<tower::timeout::error::Elapsed>() {
        return (
            StatusCode::REQUEST_TIMEOUT,
            Json(json!({ "error": "Request timed out" })),
        )
            .into_response();
    }
    map_error(ScheduleError::Internal(err))
}
