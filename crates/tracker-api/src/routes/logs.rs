//! # Clock Log API
//!
//! Read-only views of the clock log, newest first.

use axum::extract::rejection::PathRejection;
use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use tracker_core::{ClockLogEntry, EmployeeId};

use crate::error::{AppError, ErrorBody};
use crate::extractors::extract_path;
use crate::state::AppState;

/// Build the logs router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/logs", get(all_logs))
        .route("/api/logs/:user_id", get(employee_logs))
}

/// GET /api/logs: every employee's clock events.
#[utoipa::path(
    get,
    path = "/api/logs",
    responses(
        (status = 200, description = "Log entries, newest first", body = [ClockLogEntry]),
        (status = 500, description = "Store failure", body = ErrorBody),
    ),
    tag = "logs"
)]
async fn all_logs(State(state): State<AppState>) -> Result<Json<Vec<ClockLogEntry>>, AppError> {
    Ok(Json(state.store.logs(None).await?))
}

/// GET /api/logs/:user_id: one employee's clock events.
#[utoipa::path(
    get,
    path = "/api/logs/{user_id}",
    params(("user_id" = i32, Path, description = "Employee ID")),
    responses(
        (status = 200, description = "Log entries, newest first", body = [ClockLogEntry]),
        (status = 400, description = "Non-numeric id", body = ErrorBody),
        (status = 500, description = "Store failure", body = ErrorBody),
    ),
    tag = "logs"
)]
async fn employee_logs(
    State(state): State<AppState>,
    path: Result<Path<EmployeeId>, PathRejection>,
) -> Result<Json<Vec<ClockLogEntry>>, AppError> {
    let id = extract_path(path)?;
    Ok(Json(state.store.logs(Some(id)).await?))
}
