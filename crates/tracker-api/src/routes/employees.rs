//! # Employee API
//!
//! Listing, single creation, bulk import, and deletion of employees.
//! Every account created here gets the `employee` role.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tracker_core::{BulkFailure, Employee, EmployeeDraft, EmployeeId};
use utoipa::ToSchema;

use crate::error::{AppError, ErrorBody};
use crate::extractors::{extract_json, extract_path};
use crate::state::AppState;

/// Bulk import request.
#[derive(Debug, Deserialize, ToSchema)]
pub struct BulkImportRequest {
    pub employees: Vec<EmployeeDraft>,
}

/// Bulk import outcome: `count` equals `added.len()`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BulkImportResponse {
    pub added: Vec<Employee>,
    pub errors: Vec<BulkFailure>,
    pub count: usize,
}

/// Deletion acknowledgement.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DeleteResponse {
    pub success: bool,
}

/// Build the employees router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/employees", get(list_employees).post(create_employee))
        .route("/api/employees/bulk", post(bulk_import))
        .route("/api/employees/:id", delete(delete_employee))
}

/// GET /api/employees: all employees ordered by name.
#[utoipa::path(
    get,
    path = "/api/employees",
    responses(
        (status = 200, description = "Employees ordered by name", body = [Employee]),
        (status = 500, description = "Store failure", body = ErrorBody),
    ),
    tag = "employees"
)]
async fn list_employees(State(state): State<AppState>) -> Result<Json<Vec<Employee>>, AppError> {
    Ok(Json(state.store.list_employees().await?))
}

/// POST /api/employees: create one employee.
#[utoipa::path(
    post,
    path = "/api/employees",
    request_body = EmployeeDraft,
    responses(
        (status = 200, description = "Employee created", body = Employee),
        (status = 400, description = "Missing field or username taken", body = ErrorBody),
        (status = 500, description = "Store failure", body = ErrorBody),
    ),
    tag = "employees"
)]
async fn create_employee(
    State(state): State<AppState>,
    body: Result<Json<EmployeeDraft>, JsonRejection>,
) -> Result<Json<Employee>, AppError> {
    let draft = extract_json(body)?;
    let new = draft.into_new_employee()?;
    Ok(Json(state.store.create_employee(new).await?))
}

/// POST /api/employees/bulk: create many employees, best effort.
///
/// Failed items are reported in `errors` and never abort the batch; items
/// added before a failure stay added.
#[utoipa::path(
    post,
    path = "/api/employees/bulk",
    request_body = BulkImportRequest,
    responses(
        (status = 200, description = "Import finished", body = BulkImportResponse),
        (status = 400, description = "Malformed request body", body = ErrorBody),
    ),
    tag = "employees"
)]
async fn bulk_import(
    State(state): State<AppState>,
    body: Result<Json<BulkImportRequest>, JsonRejection>,
) -> Result<Json<BulkImportResponse>, AppError> {
    let req = extract_json(body)?;
    let (added, errors) = state.store.import_employees(req.employees).await.into_parts();
    Ok(Json(BulkImportResponse {
        count: added.len(),
        added,
        errors,
    }))
}

/// DELETE /api/employees/:id: delete an employee with its logs and session.
///
/// Deleting an id that does not exist still succeeds.
#[utoipa::path(
    delete,
    path = "/api/employees/{id}",
    params(("id" = i32, Path, description = "Employee ID")),
    responses(
        (status = 200, description = "Deleted", body = DeleteResponse),
        (status = 400, description = "Non-numeric id", body = ErrorBody),
        (status = 500, description = "Store failure", body = ErrorBody),
    ),
    tag = "employees"
)]
async fn delete_employee(
    State(state): State<AppState>,
    path: Result<Path<EmployeeId>, PathRejection>,
) -> Result<Json<DeleteResponse>, AppError> {
    let id = extract_path(path)?;
    state.store.delete_employee(id).await?;
    Ok(Json(DeleteResponse { success: true }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bulk_request_requires_employees_array() {
        let parsed: Result<BulkImportRequest, _> = serde_json::from_str("{}");
        assert!(parsed.is_err());
    }

    #[test]
    fn bulk_request_accepts_sparse_items() {
        let req: BulkImportRequest = serde_json::from_str(
            r#"{"employees":[{"name":"Ada"},{"username":"bob","workType":"Remote"}]}"#,
        )
        .unwrap();
        assert_eq!(req.employees.len(), 2);
        assert_eq!(req.employees[1].work_type.as_deref(), Some("Remote"));
    }
}
