//! # Operator Identification
//!
//! Operator endpoints act on behalf of the professional named in the
//! `x-professional-id` header. The header is trusted as-is: session handling
//! belongs to the clinic application in front of this service.

use async_trait::async_trait;
use axum::{extract::FromRequestParts, http::request::Parts};
use slotshare_core::{errors::ScheduleError, models::shared_schedule::SharedSchedule};
use uuid::Uuid;

use crate::middleware::error_handling::AppError;

pub use slotshare_core::models::PROFESSIONAL_ID_HEADER;

/// The professional making an operator request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProfessionalId(pub Uuid);

#[async_trait]
impl<S> FromRequestParts<S> for ProfessionalId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let value = parts.headers.get(PROFESSIONAL_ID_HEADER).ok_or_else(|| {
            ScheduleError::Authentication(format!("Missing {} header", PROFESSIONAL_ID_HEADER))
        })?;

        let id = value
            .to_str()
            .ok()
            .and_then(|text| Uuid::parse_str(text.trim()).ok())
            .ok_or_else(|| {
                ScheduleError::Authentication(format!("Invalid {} header", PROFESSIONAL_ID_HEADER))
            })?;

        Ok(ProfessionalId(id))
    }
}

/// Only the professional who created a schedule may read or change it
/// through the operator endpoints.
pub fn ensure_owner(schedule: &SharedSchedule, professional: ProfessionalId) -> Result<(), ScheduleError> {
    if schedule.created_by != professional.0 {
        return Err(ScheduleError::Authorization(
            "Shared schedule belongs to another professional".to_string(),
        ));
    }
    Ok(())
}
