use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use slotshare_core::{
    editor::{ScheduleEditor, ensure_offered},
    errors::ScheduleError,
    models::shared_schedule::{
        AddSlotsRequest, AddSlotsResponse, CreateSharedScheduleRequest, CreateSharedScheduleResponse,
        ListSharedSchedulesQuery, RemoveSlotResponse, SharedSchedule, SharedScheduleDetail,
        SharedScheduleSummary, UpdateSharedScheduleRequest, share_link,
    },
    token::is_well_formed,
    wizard::validate_request,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    ApiState,
    middleware::{
        auth::{ProfessionalId, ensure_owner},
        error_handling::AppError,
    },
};

/// Loads a schedule for editing on behalf of its owner.
async fn open_owned(state: &ApiState, id: Uuid, professional: ProfessionalId) -> Result<ScheduleEditor, AppError> {
    let editor = ScheduleEditor::open(Arc::clone(&state.store), id).await?;
    ensure_owner(&editor.detail().schedule, professional)?;
    Ok(editor)
}

#[axum::debug_handler]
pub async fn create_shared_schedule(
    State(state): State<Arc<ApiState>>,
    professional: ProfessionalId,
    Json(payload): Json<CreateSharedScheduleRequest>,
) -> Result<(StatusCode, Json<CreateSharedScheduleResponse>), AppError> {
    if !is_well_formed(&payload.token) {
        return Err(ScheduleError::Validation(format!("Malformed share token: {}", payload.token)).into());
    }
    validate_request(&payload).map_err(ScheduleError::from)?;
    ensure_offered(
        state.store.as_ref(),
        Some(payload.service_ids.as_slice()),
        Some(payload.location_ids.as_slice()),
        Some(payload.company_ids.as_slice()),
    )
    .await?;

    let schedule = state.store.create_shared_schedule(professional.0, &payload).await?;
    tracing::info!(
        "Created shared schedule {} with {} slots for professional {}",
        schedule.id,
        payload.slots.len(),
        professional.0
    );

    let link = share_link(&state.public_base_url, &schedule.token);
    Ok((StatusCode::CREATED, Json(CreateSharedScheduleResponse { schedule, link })))
}

#[axum::debug_handler]
pub async fn list_shared_schedules(
    State(state): State<Arc<ApiState>>,
    professional: ProfessionalId,
    Query(query): Query<ListSharedSchedulesQuery>,
) -> Result<Json<Vec<SharedScheduleSummary>>, AppError> {
    let schedules = state
        .store
        .list_shared_schedules(professional.0, query.status)
        .await?;

    Ok(Json(schedules))
}

#[axum::debug_handler]
pub async fn get_shared_schedule(
    State(state): State<Arc<ApiState>>,
    professional: ProfessionalId,
    Path(id): Path<Uuid>,
) -> Result<Json<SharedScheduleDetail>, AppError> {
    let editor = open_owned(&state, id, professional).await?;
    Ok(Json(editor.into_detail()))
}

#[axum::debug_handler]
pub async fn update_shared_schedule(
    State(state): State<Arc<ApiState>>,
    professional: ProfessionalId,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateSharedScheduleRequest>,
) -> Result<Json<SharedSchedule>, AppError> {
    let mut editor = open_owned(&state, id, professional).await?;
    let updated = editor.update(&payload).await?.clone();
    Ok(Json(updated))
}

#[axum::debug_handler]
pub async fn add_slots(
    State(state): State<Arc<ApiState>>,
    professional: ProfessionalId,
    Path(id): Path<Uuid>,
    Json(payload): Json<AddSlotsRequest>,
) -> Result<Json<AddSlotsResponse>, AppError> {
    let mut editor = open_owned(&state, id, professional).await?;
    let added = editor.add_slots(&payload.slots).await?;
    Ok(Json(AddSlotsResponse { added }))
}

#[axum::debug_handler]
pub async fn remove_slot(
    State(state): State<Arc<ApiState>>,
    professional: ProfessionalId,
    Path((id, slot_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<RemoveSlotResponse>, AppError> {
    let mut editor = open_owned(&state, id, professional).await?;
    editor.remove_slot(slot_id).await?;
    Ok(Json(RemoveSlotResponse { removed: 1 }))
}
