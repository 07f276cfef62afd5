use axum::{Json, extract::State};
use slotshare_core::{
    models::options::{ScheduleOptions, SelectOption},
    store::load_options,
};
use std::sync::Arc;

use crate::{ApiState, middleware::error_handling::AppError};

#[axum::debug_handler]
pub async fn list_services(State(state): State<Arc<ApiState>>) -> Result<Json<Vec<SelectOption>>, AppError> {
    Ok(Json(state.store.list_services().await?))
}

#[axum::debug_handler]
pub async fn list_locations(State(state): State<Arc<ApiState>>) -> Result<Json<Vec<SelectOption>>, AppError> {
    Ok(Json(state.store.list_locations().await?))
}

#[axum::debug_handler]
pub async fn list_companies(State(state): State<Arc<ApiState>>) -> Result<Json<Vec<SelectOption>>, AppError> {
    Ok(Json(state.store.list_companies().await?))
}

/// All three picker lists in one round trip.
#[axum::debug_handler]
pub async fn get_options(State(state): State<Arc<ApiState>>) -> Result<Json<ScheduleOptions>, AppError> {
    Ok(Json(load_options(state.store.as_ref()).await?))
}
