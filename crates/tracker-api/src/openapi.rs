//! # OpenAPI Specification Assembly
//!
//! Assembles all utoipa-documented routes into a single OpenAPI spec,
//! served at `/openapi.json`.

use axum::routing::get;
use axum::{Json, Router};
use utoipa::OpenApi;

use crate::state::AppState;

/// Assembled OpenAPI spec for the API surface.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Employee Tracker API",
        version = "0.1.0",
        description = "Employee records, login, clock-in/clock-out with one open session per employee, bulk import, and the clock log.",
        license(name = "MIT")
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server"),
    ),
    paths(
        // Employees
        crate::routes::employees::list_employees,
        crate::routes::employees::create_employee,
        crate::routes::employees::bulk_import,
        crate::routes::employees::delete_employee,
        // Login
        crate::routes::auth::login,
        // Clock
        crate::routes::clock::clock_in,
        crate::routes::clock::clock_out,
        crate::routes::clock::active_session,
        // Logs
        crate::routes::logs::all_logs,
        crate::routes::logs::employee_logs,
    ),
    components(
        schemas(
            tracker_core::EmployeeId,
            tracker_core::Employee,
            tracker_core::EmployeeDraft,
            tracker_core::Role,
            tracker_core::ActiveSession,
            tracker_core::ClockAction,
            tracker_core::ClockLogEntry,
            tracker_core::BulkFailure,
            crate::error::ErrorBody,
            crate::routes::employees::BulkImportRequest,
            crate::routes::employees::BulkImportResponse,
            crate::routes::employees::DeleteResponse,
            crate::routes::auth::LoginRequest,
            crate::routes::clock::ClockRequest,
            crate::routes::clock::ClockInResponse,
            crate::routes::clock::ClockOutResponse,
        ),
    ),
    tags(
        (name = "employees", description = "Employee records and bulk import"),
        (name = "auth", description = "Credential check"),
        (name = "clock", description = "Clock-in, clock-out, and active sessions"),
        (name = "logs", description = "Clock event log"),
    )
)]
pub struct ApiDoc;

/// Build the OpenAPI router.
pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(openapi_json))
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
