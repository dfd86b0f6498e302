use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use shiftdesk_core::types::{Assignment, AssignmentId};
use shiftdesk_scheduler::{
    assignments, auto_balance as balance, AssignmentError, AssignmentPatch, AssignmentRequest,
    BalanceReport,
};

use super::ApiError;
use crate::app::AppState;

pub async fn create_assignment(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AssignmentRequest>,
) -> Result<Json<Assignment>, ApiError> {
    let assignment = state
        .db
        .with_transaction(|s| assignments::assign_employee(s, req))?;
    Ok(Json(assignment))
}

pub async fn list_assignments(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Assignment>>, ApiError> {
    let all = state
        .db
        .with_transaction(|s| assignments::list_assignments(s))?;
    Ok(Json(all))
}

pub async fn update_assignment(
    State(state): State<Arc<AppState>>,
    Path(id): Path<AssignmentId>,
    Json(patch): Json<AssignmentPatch>,
) -> Result<Json<Assignment>, ApiError> {
    let updated = state
        .db
        .with_transaction(|s| assignments::update_assignment(s, id, patch))?;
    Ok(Json(updated))
}

pub async fn delete_assignment(
    State(state): State<Arc<AppState>>,
    Path(id): Path<AssignmentId>,
) -> Result<Json<Value>, ApiError> {
    let deleted = state
        .db
        .with_transaction(|s| assignments::delete_assignment(s, id))?;
    if !deleted {
        return Err(AssignmentError::AssignmentNotFound(id).into());
    }
    Ok(Json(json!({ "deleted": true })))
}

#[derive(Debug, Deserialize)]
pub struct BalanceParams {
    pub strict: Option<bool>,
}

/// POST /assignments/auto-balance
pub async fn auto_balance(
    State(state): State<Arc<AppState>>,
    Query(params): Query<BalanceParams>,
) -> Result<Json<BalanceReport>, ApiError> {
    let mode = state.balance_mode(params.strict);
    let report = state.db.with_transaction(|s| balance(s, mode))?;
    Ok(Json(report))
}
