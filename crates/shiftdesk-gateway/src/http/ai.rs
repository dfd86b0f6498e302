//! AI-assisted scheduling and advisory endpoints.
//!
//! Store reads happen inside a transaction that is closed before the
//! provider is called. Provider failures are reported in the response body,
//! never as an error status.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use shiftdesk_core::types::{EmployeeId, ShiftId};
use shiftdesk_scheduler::advisor::{
    chat_request, optimize_schedule_request, shift_insights_request, suggest_assignment_request,
};
use shiftdesk_scheduler::{prepare_snapshot, AdvisorReply, ScheduleProposal, ScheduleRequest};

use super::ApiError;
use crate::app::AppState;

/// POST /ai/generate-schedule
pub async fn generate_schedule(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ScheduleRequest>,
) -> Result<Json<ScheduleProposal>, ApiError> {
    let today = chrono::Local::now().date_naive();
    let snapshot = state
        .db
        .with_transaction(|s| prepare_snapshot(s, &req, today).map_err(ApiError::from))?;
    Ok(Json(state.proposals.propose(&snapshot).await))
}

pub async fn optimize_schedule(
    State(state): State<Arc<AppState>>,
) -> Result<Json<AdvisorReply>, ApiError> {
    let req = state
        .db
        .with_transaction(|s| optimize_schedule_request(s))?;
    Ok(Json(state.advisor.run(req).await))
}

#[derive(Debug, Deserialize)]
pub struct SuggestParams {
    pub employee_id: EmployeeId,
    pub shift_id: ShiftId,
}

/// POST /ai/suggest-assignment?employee_id=..&shift_id=..
pub async fn suggest_assignment(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SuggestParams>,
) -> Result<Json<AdvisorReply>, ApiError> {
    let req = state.db.with_transaction(|s| {
        suggest_assignment_request(s, params.employee_id, params.shift_id)
    })?;
    Ok(Json(state.advisor.run(req).await))
}

pub async fn insights(
    State(state): State<Arc<AppState>>,
) -> Result<Json<AdvisorReply>, ApiError> {
    let req = state.db.with_transaction(|s| shift_insights_request(s))?;
    Ok(Json(state.advisor.run(req).await))
}

#[derive(Debug, Deserialize)]
pub struct ChatBody {
    pub query: String,
}

/// POST /ai/chat
pub async fn chat(
    State(state): State<Arc<AppState>>,
    Json(body): Json<ChatBody>,
) -> Result<Json<AdvisorReply>, ApiError> {
    if body.query.trim().is_empty() {
        return Err(ApiError::bad_request("query must not be empty"));
    }
    let req = state
        .db
        .with_transaction(|s| chat_request(s, &body.query))?;
    Ok(Json(state.advisor.run(req).await))
}
