//! # Login
//!
//! Verifies a username and password and returns the employee record. There
//! is no token: the front-end keeps the returned record for the session.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde::Deserialize;
use tracker_core::{authenticate, Employee};
use utoipa::ToSchema;

use crate::error::{AppError, ErrorBody};
use crate::extractors::extract_json;
use crate::state::AppState;

/// Login request. Absent fields are treated as empty and fail verification.
#[derive(Deserialize, ToSchema)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Build the login router.
pub fn router() -> Router<AppState> {
    Router::new().route("/api/login", post(login))
}

/// POST /api/login: verify credentials.
#[utoipa::path(
    post,
    path = "/api/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Credentials match", body = Employee),
        (status = 401, description = "Invalid credentials", body = ErrorBody),
        (status = 500, description = "Store failure", body = ErrorBody),
    ),
    tag = "auth"
)]
async fn login(
    State(state): State<AppState>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<Employee>, AppError> {
    let req = extract_json(body)?;
    let found = state.store.find_credentials(&req.username).await?;
    match authenticate(found, &req.password) {
        Ok(employee) => {
            tracing::info!(
                employee_id = %employee.id,
                username = %employee.username,
                "login succeeded"
            );
            Ok(Json(employee))
        }
        Err(err) => {
            tracing::warn!(username = %req.username, "login rejected");
            Err(err.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_default_to_empty() {
        let req: LoginRequest = serde_json::from_str("{}").unwrap();
        assert!(req.username.is_empty());
        assert!(req.password.is_empty());
    }

    #[test]
    fn debug_hides_password() {
        let req = LoginRequest {
            username: "ada".into(),
            password: "hunter2".into(),
        };
        assert!(!format!("{req:?}").contains("hunter2"));
    }
}
