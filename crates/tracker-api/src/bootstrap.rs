//! # Startup Bootstrap
//!
//! ## Bootstrap Sequence
//!
//! 1. **Open the store.** Connect to PostgreSQL and apply migrations, or fall
//!    back to the in-memory store when no database is configured.
//! 2. **Seed the administrator.** If `ADMIN_USERNAME` and `ADMIN_PASSWORD`
//!    are set and no employee has that username, create it with the `admin`
//!    role. This is the only path that creates a non-employee role.
//! 3. **Build the state** handed to the router.

use tracker_core::{EmployeeDraft, Role, TrackerError, ValidationError};

use crate::config::{AdminSeed, AppConfig, DatabaseConfig};
use crate::state::AppState;
use crate::store::{RecordStore, StoreError};

/// Open the configured store, seed the administrator, and build the state.
pub async fn bootstrap(config: AppConfig) -> Result<AppState, StoreError> {
    let store = open_store(&config.database).await?;

    if let Some(admin) = &config.admin {
        seed_admin(&store, admin).await?;
    }

    tracing::info!(
        port = config.port,
        backend = store.backend(),
        static_dir = %config.static_dir.display(),
        "bootstrap complete"
    );
    Ok(AppState::with_store(config, store))
}

async fn open_store(database: &DatabaseConfig) -> Result<RecordStore, StoreError> {
    match database {
        DatabaseConfig::Postgres {
            options,
            max_connections,
        } => {
            let pool = crate::db::connect(options.clone(), *max_connections).await?;
            Ok(RecordStore::Postgres(pool))
        }
        DatabaseConfig::InMemory => {
            tracing::warn!(
                "no database configured, running with the in-memory store. \
                 State will not survive restarts."
            );
            Ok(RecordStore::in_memory())
        }
    }
}

/// Create the administrator account unless the username already exists.
///
/// Returns whether an account was created.
pub async fn seed_admin(store: &RecordStore, seed: &AdminSeed) -> Result<bool, StoreError> {
    if store.find_credentials(&seed.username).await?.is_some() {
        tracing::info!(username = %seed.username, "administrator account already present");
        return Ok(false);
    }

    let draft = EmployeeDraft {
        name: Some(seed.name.clone()),
        username: Some(seed.username.clone()),
        password: Some(seed.password.clone()),
        ..Default::default()
    };
    let new = draft.into_new_employee()?.with_role(Role::Admin);

    match store.create_employee(new).await {
        Ok(_) => Ok(true),
        // Another instance seeded it between the lookup and the insert.
        Err(StoreError::Domain(TrackerError::Validation(ValidationError::DuplicateUsername(
            _,
        )))) => Ok(false),
        Err(err) => Err(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracker_core::authenticate;

    fn seed() -> AdminSeed {
        AdminSeed {
            username: "root".into(),
            password: "s3cret".into(),
            name: "Administrator".into(),
        }
    }

    #[tokio::test]
    async fn seeds_admin_once() {
        let store = RecordStore::in_memory();
        assert!(seed_admin(&store, &seed()).await.unwrap());
        assert!(!seed_admin(&store, &seed()).await.unwrap());

        let employees = store.list_employees().await.unwrap();
        assert_eq!(employees.len(), 1);
        assert_eq!(employees[0].role, Role::Admin);

        let found = store.find_credentials("root").await.unwrap();
        assert!(authenticate(found, "s3cret").is_ok());
    }

    #[tokio::test]
    async fn bootstrap_in_memory_with_admin() {
        let config = AppConfig {
            admin: Some(seed()),
            ..AppConfig::default()
        };
        let state = bootstrap(config).await.unwrap();
        assert_eq!(state.store.backend(), "memory");
        assert_eq!(state.store.list_employees().await.unwrap().len(), 1);
    }
}
