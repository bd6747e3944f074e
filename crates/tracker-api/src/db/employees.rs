//! Employee persistence operations.
//!
//! All functions take a `&PgPool` and operate on the `employees` table.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracker_core::{
    Employee, EmployeeId, NewEmployee, PasswordHash, Role, StoredEmployee, ValidationError,
};

use crate::store::StoreError;

const COLUMNS: &str =
    "id, name, username, password_hash, role, company, manager, work_type, created_at";

/// All employees ordered by name, then id.
pub async fn list(pool: &PgPool) -> Result<Vec<Employee>, sqlx::Error> {
    let rows = sqlx::query_as::<_, EmployeeRow>(&format!(
        "SELECT {COLUMNS} FROM employees ORDER BY name, id"
    ))
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(|r| r.into_record().employee).collect())
}

/// Fetch an employee with its password hash by exact username.
pub async fn find_by_username(
    pool: &PgPool,
    username: &str,
) -> Result<Option<StoredEmployee>, sqlx::Error> {
    let row = sqlx::query_as::<_, EmployeeRow>(&format!(
        "SELECT {COLUMNS} FROM employees WHERE username = $1"
    ))
    .bind(username)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(EmployeeRow::into_record))
}

/// Insert an employee.
///
/// The username pre-check gives the common case a clean error; the `UNIQUE`
/// constraint catches the race where two inserts pass the check together.
pub async fn insert(pool: &PgPool, new: NewEmployee) -> Result<Employee, StoreError> {
    let taken: bool =
        sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM employees WHERE username = $1)")
            .bind(&new.username)
            .fetch_one(pool)
            .await?;
    if taken {
        return Err(ValidationError::DuplicateUsername(new.username).into());
    }

    let inserted = sqlx::query_as::<_, EmployeeRow>(&format!(
        "INSERT INTO employees (name, username, password_hash, role, company, manager, work_type)
         VALUES ($1, $2, $3, $4, $5, $6, $7)
         RETURNING {COLUMNS}"
    ))
    .bind(&new.name)
    .bind(&new.username)
    .bind(new.password_hash.as_str())
    .bind(new.role.as_str())
    .bind(&new.company)
    .bind(&new.manager)
    .bind(&new.work_type)
    .fetch_one(pool)
    .await;

    match inserted {
        Ok(row) => Ok(row.into_record().employee),
        Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
            Err(ValidationError::DuplicateUsername(new.username).into())
        }
        Err(err) => Err(err.into()),
    }
}

/// Delete an employee together with its clock logs and active session.
///
/// Runs in one transaction with the employee row locked first, so a
/// concurrent clock-in either commits before the delete sees it or fails on
/// the foreign key afterwards. Returns whether the employee existed.
pub async fn delete(pool: &PgPool, id: EmployeeId) -> Result<bool, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let existing: Option<i32> =
        sqlx::query_scalar("SELECT id FROM employees WHERE id = $1 FOR UPDATE")
            .bind(id.get())
            .fetch_optional(&mut *tx)
            .await?;

    sqlx::query("DELETE FROM clock_logs WHERE user_id = $1")
        .bind(id.get())
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM active_sessions WHERE user_id = $1")
        .bind(id.get())
        .execute(&mut *tx)
        .await?;
    let result = sqlx::query("DELETE FROM employees WHERE id = $1")
        .bind(id.get())
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(existing.is_some() && result.rows_affected() > 0)
}

#[derive(sqlx::FromRow)]
struct EmployeeRow {
    id: i32,
    name: String,
    username: String,
    password_hash: String,
    role: String,
    company: String,
    manager: String,
    work_type: Option<String>,
    created_at: DateTime<Utc>,
}

impl EmployeeRow {
    fn into_record(self) -> StoredEmployee {
        let role = Role::parse(&self.role).unwrap_or_else(|| {
            tracing::warn!(
                employee_id = self.id,
                role = %self.role,
                "unknown role in employees row, treating as employee"
            );
            Role::Employee
        });
        StoredEmployee {
            employee: Employee {
                id: EmployeeId::new(self.id),
                name: self.name,
                username: self.username,
                role,
                company: self.company,
                manager: self.manager,
                work_type: self.work_type,
                created_at: self.created_at,
            },
            password_hash: PasswordHash::from_stored(self.password_hash),
        }
    }
}
