//! # Record Store
//!
//! The one handle through which handlers reach persisted state. It is
//! constructed once at startup and carried in [`AppState`](crate::state::AppState).
//!
//! ## Backends
//!
//! - **Postgres**: the production backend (see [`crate::db`]). Multi-statement
//!   operations run in a transaction; uniqueness of usernames and of active
//!   sessions is enforced by table constraints.
//! - **Memory**: all three tables behind one `parking_lot::RwLock`. Used when
//!   no database is configured, and by the test suites. Each operation takes
//!   the write lock once, so check and write are atomic.
//!
//! Both backends run the same domain transitions from `tracker_core::session`.

pub mod memory;

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use thiserror::Error;
use tracker_core::{
    ActiveSession, AuthError, BulkImport, ClockIn, ClockLogEntry, ClockOut, Employee,
    EmployeeDraft, EmployeeId, NewEmployee, Punch, SessionError, StoredEmployee, TrackerError,
    ValidationError,
};

pub use memory::MemoryStore;

/// Failures from store operations.
///
/// Domain rejections (duplicate username, session conflicts) travel as
/// [`StoreError::Domain`]; everything else is an infrastructure failure.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The operation was refused by a domain rule.
    #[error(transparent)]
    Domain(#[from] TrackerError),

    /// Query, connection, or constraint failure in PostgreSQL.
    #[error(transparent)]
    Database(#[from] sqlx::Error),

    /// Embedded migrations failed to apply.
    #[error(transparent)]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Referential constraint violated in the in-memory store.
    #[error("{0}")]
    Constraint(String),
}

impl From<ValidationError> for StoreError {
    fn from(err: ValidationError) -> Self {
        Self::Domain(err.into())
    }
}

impl From<SessionError> for StoreError {
    fn from(err: SessionError) -> Self {
        Self::Domain(err.into())
    }
}

impl From<AuthError> for StoreError {
    fn from(err: AuthError) -> Self {
        Self::Domain(err.into())
    }
}

/// Handle to the configured backend. Cheap to clone.
#[derive(Debug, Clone)]
pub enum RecordStore {
    /// PostgreSQL connection pool.
    Postgres(PgPool),
    /// Process-local tables.
    Memory(MemoryStore),
}

impl RecordStore {
    /// A fresh, empty in-memory store.
    pub fn in_memory() -> Self {
        Self::Memory(MemoryStore::new())
    }

    /// Backend name for logs.
    pub fn backend(&self) -> &'static str {
        match self {
            Self::Postgres(_) => "postgres",
            Self::Memory(_) => "memory",
        }
    }

    /// Check the backend answers.
    pub async fn ping(&self) -> Result<(), StoreError> {
        match self {
            Self::Postgres(pool) => crate::db::server_time(pool).await.map(|_| ()),
            Self::Memory(_) => Ok(()),
        }
    }

    /// All employees, ordered by name.
    pub async fn list_employees(&self) -> Result<Vec<Employee>, StoreError> {
        match self {
            Self::Postgres(pool) => Ok(crate::db::employees::list(pool).await?),
            Self::Memory(mem) => Ok(mem.list_employees()),
        }
    }

    /// Look up an employee and its password hash for login.
    pub async fn find_credentials(
        &self,
        username: &str,
    ) -> Result<Option<StoredEmployee>, StoreError> {
        match self {
            Self::Postgres(pool) => {
                Ok(crate::db::employees::find_by_username(pool, username).await?)
            }
            Self::Memory(mem) => Ok(mem.find_by_username(username)),
        }
    }

    /// Insert a validated employee.
    ///
    /// # Errors
    ///
    /// `DuplicateUsername` if the username is taken, whether caught by the
    /// pre-check or by the store's uniqueness constraint.
    pub async fn create_employee(&self, new: NewEmployee) -> Result<Employee, StoreError> {
        let username = new.username.clone();
        let created = match self {
            Self::Postgres(pool) => crate::db::employees::insert(pool, new).await?,
            Self::Memory(mem) => mem.insert_employee(new)?,
        };
        tracing::info!(
            employee_id = %created.id,
            username = %username,
            role = %created.role,
            "employee created"
        );
        Ok(created)
    }

    /// Create each draft independently, collecting successes and failures.
    ///
    /// Never fails as a whole: a store error on one item is recorded against
    /// that item and the next item is still attempted.
    pub async fn import_employees(&self, drafts: Vec<EmployeeDraft>) -> BulkImport<Employee> {
        let mut import = BulkImport::new();
        for draft in drafts {
            let label = draft.label();
            let outcome = match draft.into_new_employee() {
                Ok(new) => self.create_employee(new).await,
                Err(err) => Err(StoreError::from(err)),
            };
            if let Err(err) = &outcome {
                tracing::warn!(employee = %label, error = %err, "bulk import item rejected");
            }
            import = import.record(label, outcome);
        }
        tracing::info!(
            added = import.count(),
            failed = import.errors().len(),
            "bulk import finished"
        );
        import
    }

    /// Delete an employee with its clock logs and active session.
    ///
    /// Returns whether an employee row was removed.
    pub async fn delete_employee(&self, id: EmployeeId) -> Result<bool, StoreError> {
        let deleted = match self {
            Self::Postgres(pool) => crate::db::employees::delete(pool, id).await?,
            Self::Memory(mem) => mem.delete_employee(id),
        };
        tracing::info!(employee_id = %id, deleted, "employee delete requested");
        Ok(deleted)
    }

    /// Open a session for the punch's employee at `at`.
    pub async fn clock_in(&self, punch: &Punch, at: DateTime<Utc>) -> Result<ClockIn, StoreError> {
        let accepted = match self {
            Self::Postgres(pool) => crate::db::clock::clock_in(pool, punch, at).await?,
            Self::Memory(mem) => mem.clock_in(punch, at)?,
        };
        tracing::info!(user_id = %punch.employee_id, time = %accepted.time(), "clocked in");
        Ok(accepted)
    }

    /// Close the punch's employee's session at `at`.
    pub async fn clock_out(
        &self,
        punch: &Punch,
        at: DateTime<Utc>,
    ) -> Result<ClockOut, StoreError> {
        let accepted = match self {
            Self::Postgres(pool) => crate::db::clock::clock_out(pool, punch, at).await?,
            Self::Memory(mem) => mem.clock_out(punch, at)?,
        };
        tracing::info!(
            user_id = %punch.employee_id,
            duration = %accepted.duration,
            "clocked out"
        );
        Ok(accepted)
    }

    /// The employee's open session, if any.
    pub async fn active_session(
        &self,
        id: EmployeeId,
    ) -> Result<Option<ActiveSession>, StoreError> {
        match self {
            Self::Postgres(pool) => Ok(crate::db::clock::active_session(pool, id).await?),
            Self::Memory(mem) => Ok(mem.active_session(id)),
        }
    }

    /// Clock log entries, newest first. `None` lists every employee's.
    pub async fn logs(
        &self,
        employee: Option<EmployeeId>,
    ) -> Result<Vec<ClockLogEntry>, StoreError> {
        match self {
            Self::Postgres(pool) => Ok(crate::db::clock::logs(pool, employee).await?),
            Self::Memory(mem) => Ok(mem.logs(employee)),
        }
    }
}
