use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::{json, Value};
use shiftdesk_core::types::{NewShift, Shift, ShiftId};
use shiftdesk_store::ShiftStore;

use super::ApiError;
use crate::app::AppState;

/// POST /shifts
pub async fn create_shift(
    State(state): State<Arc<AppState>>,
    Json(body): Json<NewShift>,
) -> Result<Json<Shift>, ApiError> {
    if body.name.trim().is_empty() {
        return Err(ApiError::bad_request("Shift name must not be empty"));
    }
    let shift = state
        .db
        .with_transaction(|s| s.create_shift(&body).map_err(ApiError::from))?;
    Ok(Json(shift))
}

/// GET /shifts, ordered by date then start time.
pub async fn list_shifts(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Shift>>, ApiError> {
    let shifts = state
        .db
        .with_transaction(|s| s.list_shifts_chronological().map_err(ApiError::from))?;
    Ok(Json(shifts))
}

pub async fn get_shift(
    State(state): State<Arc<AppState>>,
    Path(id): Path<ShiftId>,
) -> Result<Json<Shift>, ApiError> {
    state
        .db
        .with_transaction(|s| s.get_shift(id).map_err(ApiError::from))?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Shift"))
}

/// DELETE /shifts/{id}; assignments to the shift go with it.
pub async fn delete_shift(
    State(state): State<Arc<AppState>>,
    Path(id): Path<ShiftId>,
) -> Result<Json<Value>, ApiError> {
    let deleted = state
        .db
        .with_transaction(|s| s.delete_shift(id).map_err(ApiError::from))?;
    if !deleted {
        return Err(ApiError::not_found("Shift"));
    }
    Ok(Json(json!({ "deleted": true })))
}
