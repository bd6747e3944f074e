//! # Database Persistence Layer
//!
//! PostgreSQL persistence via SQLx. Query functions are free functions taking
//! a `&PgPool`, grouped by table:
//!
//! - [`employees`]: the `employees` table, plus the cascading delete.
//! - [`clock`]: `active_sessions` and `clock_logs`.
//!
//! The schema lives in `migrations/` and is applied at connect time.

pub mod clock;
pub mod employees;

use std::time::Duration;

use chrono::{DateTime, Utc};
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};

use crate::store::StoreError;

/// Open the pool, apply migrations, and confirm the server answers.
pub async fn connect(
    options: PgConnectOptions,
    max_connections: u32,
) -> Result<PgPool, StoreError> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(Duration::from_secs(5))
        .connect_with(options)
        .await?;

    let now = server_time(&pool).await?;
    tracing::info!(server_time = %now, "connected to PostgreSQL");

    sqlx::migrate!("./migrations").run(&pool).await?;
    tracing::info!("database migrations applied");

    Ok(pool)
}

/// `SELECT NOW()` on the server.
pub async fn server_time(pool: &PgPool) -> Result<DateTime<Utc>, StoreError> {
    let now: DateTime<Utc> = sqlx::query_scalar("SELECT NOW()").fetch_one(pool).await?;
    Ok(now)
}
