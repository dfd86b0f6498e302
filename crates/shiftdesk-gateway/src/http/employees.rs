//! Employee and department directory.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use shiftdesk_core::types::{Department, Employee, EmployeeId, EmployeePatch, NewEmployee};
use shiftdesk_store::EmployeeStore;

use super::ApiError;
use crate::app::AppState;

pub async fn create_employee(
    State(state): State<Arc<AppState>>,
    Json(body): Json<NewEmployee>,
) -> Result<Json<Employee>, ApiError> {
    let employee = state
        .db
        .with_transaction(|s| s.create_employee(&body).map_err(ApiError::from))?;
    Ok(Json(employee))
}

pub async fn list_employees(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Employee>>, ApiError> {
    let employees = state
        .db
        .with_transaction(|s| s.list_employees().map_err(ApiError::from))?;
    Ok(Json(employees))
}

pub async fn get_employee(
    State(state): State<Arc<AppState>>,
    Path(id): Path<EmployeeId>,
) -> Result<Json<Employee>, ApiError> {
    state
        .db
        .with_transaction(|s| s.get_employee(id).map_err(ApiError::from))?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Employee"))
}

pub async fn update_employee(
    State(state): State<Arc<AppState>>,
    Path(id): Path<EmployeeId>,
    Json(patch): Json<EmployeePatch>,
) -> Result<Json<Employee>, ApiError> {
    state
        .db
        .with_transaction(|s| s.update_employee(id, &patch).map_err(ApiError::from))?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Employee"))
}

pub async fn delete_employee(
    State(state): State<Arc<AppState>>,
    Path(id): Path<EmployeeId>,
) -> Result<Json<Value>, ApiError> {
    let deleted = state
        .db
        .with_transaction(|s| s.delete_employee(id).map_err(ApiError::from))?;
    if !deleted {
        return Err(ApiError::not_found("Employee"));
    }
    Ok(Json(json!({ "deleted": true })))
}

#[derive(Deserialize)]
pub struct NewDepartment {
    pub name: String,
}

pub async fn create_department(
    State(state): State<Arc<AppState>>,
    Json(body): Json<NewDepartment>,
) -> Result<Json<Department>, ApiError> {
    let name = body.name.trim();
    if name.is_empty() {
        return Err(ApiError::bad_request("Department name must not be empty"));
    }
    let department = state
        .db
        .with_transaction(|s| s.create_department(name).map_err(ApiError::from))?;
    Ok(Json(department))
}

pub async fn list_departments(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Department>>, ApiError> {
    let departments = state
        .db
        .with_transaction(|s| s.list_departments().map_err(ApiError::from))?;
    Ok(Json(departments))
}
