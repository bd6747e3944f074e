//! # Clock API
//!
//! Clock-in, clock-out, and the active session query. The server clock is
//! the only time source: clients never send timestamps.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use tracker_core::{ActiveSession, EmployeeId, Punch};
use utoipa::ToSchema;

use crate::error::{AppError, ErrorBody};
use crate::extractors::{extract_path, extract_validated_json, Validate};
use crate::state::AppState;

/// Body of a clock-in or clock-out request.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ClockRequest {
    pub user_id: EmployeeId,
    /// Name recorded in the log entry.
    #[serde(default)]
    pub user_name: String,
    #[serde(default)]
    pub work_type: Option<String>,
    /// Client-reported IP address.
    #[serde(default)]
    pub ip: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    /// Browser geolocation payload, stored as-is.
    #[serde(default)]
    #[schema(value_type = Option<Object>)]
    pub geolocation: Option<serde_json::Value>,
}

impl Validate for ClockRequest {
    fn validate(&self) -> Result<(), String> {
        if self.user_name.trim().is_empty() {
            return Err("user_name is required".to_string());
        }
        Ok(())
    }
}

impl ClockRequest {
    fn into_punch(self) -> Punch {
        Punch {
            employee_id: self.user_id,
            employee_name: self.user_name,
            work_type: self.work_type,
            ip_address: self.ip,
            location: self.location,
            geolocation: self.geolocation,
        }
    }
}

/// Accepted clock-in.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ClockInResponse {
    pub success: bool,
    pub time: DateTime<Utc>,
}

/// Accepted clock-out.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ClockOutResponse {
    pub success: bool,
    /// Time worked, `"{h}h {m}m"`.
    pub duration: String,
    pub time: DateTime<Utc>,
}

/// Current server time at the microsecond precision `TIMESTAMPTZ` keeps.
fn server_now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

/// Build the clock router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/clock-in", post(clock_in))
        .route("/api/clock-out", post(clock_out))
        .route("/api/active-session/:user_id", get(active_session))
}

/// POST /api/clock-in: open a session at the current server time.
#[utoipa::path(
    post,
    path = "/api/clock-in",
    request_body = ClockRequest,
    responses(
        (status = 200, description = "Clocked in", body = ClockInResponse),
        (status = 400, description = "Already clocked in", body = ErrorBody),
        (status = 500, description = "Store failure", body = ErrorBody),
    ),
    tag = "clock"
)]
async fn clock_in(
    State(state): State<AppState>,
    body: Result<Json<ClockRequest>, JsonRejection>,
) -> Result<Json<ClockInResponse>, AppError> {
    let punch = extract_validated_json(body)?.into_punch();
    let accepted = state.store.clock_in(&punch, server_now()).await?;
    Ok(Json(ClockInResponse {
        success: true,
        time: accepted.time(),
    }))
}

/// POST /api/clock-out: close the open session and report time worked.
#[utoipa::path(
    post,
    path = "/api/clock-out",
    request_body = ClockRequest,
    responses(
        (status = 200, description = "Clocked out", body = ClockOutResponse),
        (status = 400, description = "Not clocked in", body = ErrorBody),
        (status = 500, description = "Store failure", body = ErrorBody),
    ),
    tag = "clock"
)]
async fn clock_out(
    State(state): State<AppState>,
    body: Result<Json<ClockRequest>, JsonRejection>,
) -> Result<Json<ClockOutResponse>, AppError> {
    let punch = extract_validated_json(body)?.into_punch();
    let accepted = state.store.clock_out(&punch, server_now()).await?;
    Ok(Json(ClockOutResponse {
        success: true,
        duration: accepted.duration.to_string(),
        time: accepted.time(),
    }))
}

/// GET /api/active-session/:user_id: the open session, or `null`.
#[utoipa::path(
    get,
    path = "/api/active-session/{user_id}",
    params(("user_id" = i32, Path, description = "Employee ID")),
    responses(
        (status = 200, description = "Open session, or null when clocked out", body = ActiveSession),
        (status = 400, description = "Non-numeric id", body = ErrorBody),
        (status = 500, description = "Store failure", body = ErrorBody),
    ),
    tag = "clock"
)]
async fn active_session(
    State(state): State<AppState>,
    path: Result<Path<EmployeeId>, PathRejection>,
) -> Result<Json<Option<ActiveSession>>, AppError> {
    let id = extract_path(path)?;
    Ok(Json(state.store.active_session(id).await?))
}
