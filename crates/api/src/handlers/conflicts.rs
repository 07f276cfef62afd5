use axum::{
    Json,
    extract::{Path, Query, State},
};
use slotshare_core::{
    errors::ScheduleError,
    models::{
        appointment::{ConflictQuery, ConflictResponse},
        shared_schedule::TokenAvailabilityResponse,
    },
    token::is_well_formed,
};
use std::sync::Arc;

use crate::{
    ApiState,
    middleware::{auth::ProfessionalId, error_handling::AppError},
};

/// Reports the calling professional's appointment at exactly `slot`, if any.
#[axum::debug_handler]
pub async fn check_conflict(
    State(state): State<Arc<ApiState>>,
    professional: ProfessionalId,
    Query(query): Query<ConflictQuery>,
) -> Result<Json<ConflictResponse>, AppError> {
    let conflict = state.store.find_conflict(professional.0, query.slot).await?;

    if let Some(record) = &conflict {
        tracing::debug!(
            "Slot {} conflicts with appointment {} for professional {}",
            query.slot,
            record.appointment_id,
            professional.0
        );
    }

    Ok(Json(ConflictResponse {
        slot: query.slot,
        conflict,
    }))
}

#[axum::debug_handler]
pub async fn token_availability(
    State(state): State<Arc<ApiState>>,
    Path(token): Path<String>,
) -> Result<Json<TokenAvailabilityResponse>, AppError> {
    if !is_well_formed(&token) {
        return Err(ScheduleError::Validation(format!("Malformed share token: {}", token)).into());
    }

    let available = state.store.is_token_available(&token).await?;
    Ok(Json(TokenAvailabilityResponse { token, available }))
}
