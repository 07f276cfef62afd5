//! Endpoints reached through a share link. No operator header is needed;
//! the token is the credential.

use axum::{
    Json,
    extract::{Path, State},
};
use slotshare_core::{
    errors::ScheduleError,
    wizard::MAX_TEXT_LENGTH,
    models::shared_schedule::{SelectSlotRequest, SharedScheduleDetail, SharedScheduleSlot},
};
use std::sync::Arc;
use uuid::Uuid;

use crate::{ApiState, middleware::error_handling::AppError};

/// Inactive schedules are indistinguishable from missing ones.
async fn load_active(state: &ApiState, token: &str) -> Result<SharedScheduleDetail, AppError> {
    state
        .store
        .get_shared_schedule_by_token(token)
        .await?
        .filter(|detail| detail.schedule.is_active)
        .ok_or_else(|| ScheduleError::NotFound("Shared schedule not found".to_string()).into())
}

#[axum::debug_handler]
pub async fn get_public_schedule(
    State(state): State<Arc<ApiState>>,
    Path(token): Path<String>,
) -> Result<Json<SharedScheduleDetail>, AppError> {
    let detail = load_active(&state, &token).await?;
    Ok(Json(detail.redacted()))
}

#[axum::debug_handler]
pub async fn select_slot(
    State(state): State<Arc<ApiState>>,
    Path((token, slot_id)): Path<(String, Uuid)>,
    Json(payload): Json<SelectSlotRequest>,
) -> Result<Json<SharedScheduleSlot>, AppError> {
    let selected_by = payload.selected_by.trim();
    if selected_by.is_empty() {
        return Err(ScheduleError::Validation("Name is required to pick a slot".to_string()).into());
    }
    if selected_by.chars().count() > MAX_TEXT_LENGTH {
        return Err(ScheduleError::Validation(format!("Name must be at most {} characters", MAX_TEXT_LENGTH)).into());
    }

    let detail = load_active(&state, &token).await?;
    if !detail.slots.iter().any(|s| s.id == slot_id) {
        return Err(ScheduleError::NotFound(format!("Slot with ID {} not found", slot_id)).into());
    }

    match state.store.select_slot(&token, slot_id, selected_by).await? {
        Some(slot) => {
            tracing::info!("Slot {} of shared schedule {} picked", slot_id, detail.schedule.id);
            Ok(Json(slot))
        }
        None => Err(ScheduleError::Conflict(format!("Slot with ID {} is no longer available", slot_id)).into()),
    }
}
