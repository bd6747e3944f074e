//! # Route Modules
//!
//! | Prefix | Module |
//! |---|---|
//! | `/api/employees*` | [`employees`] |
//! | `/api/login` | [`auth`] |
//! | `/api/clock-in`, `/api/clock-out`, `/api/active-session/*` | [`clock`] |
//! | `/api/logs*` | [`logs`] |

pub mod auth;
pub mod clock;
pub mod employees;
pub mod logs;

use axum::Router;

use crate::state::AppState;

/// All `/api` routes.
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(employees::router())
        .merge(auth::router())
        .merge(clock::router())
        .merge(logs::router())
}
