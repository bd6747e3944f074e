//! Clock session and clock log persistence.
//!
//! Clock-in and clock-out each run in one transaction: the session row and
//! the log row are written together or not at all.

use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool};
use tracker_core::{
    session, ActiveSession, ClockAction, ClockIn, ClockLogEntry, ClockOut, EmployeeId,
    NewClockLog, Punch, SessionError,
};

use crate::store::StoreError;

/// Open a session and append the "Clock In" log entry.
///
/// The primary key on `active_sessions.user_id` decides races: the insert is
/// conditional, and zero affected rows means another clock-in got there first.
pub async fn clock_in(
    pool: &PgPool,
    punch: &Punch,
    at: DateTime<Utc>,
) -> Result<ClockIn, StoreError> {
    let mut tx = pool.begin().await?;

    let current = fetch_session(&mut tx, punch.employee_id).await?;
    let accepted = session::clock_in(current.as_ref(), punch, at)?;

    let inserted = sqlx::query(
        "INSERT INTO active_sessions (user_id, clock_in_time) VALUES ($1, $2)
         ON CONFLICT (user_id) DO NOTHING",
    )
    .bind(accepted.session.user_id.get())
    .bind(accepted.session.clock_in_time)
    .execute(&mut *tx)
    .await?;
    if inserted.rows_affected() == 0 {
        return Err(SessionError::AlreadyClockedIn.into());
    }

    insert_log(&mut tx, &accepted.log).await?;
    tx.commit().await?;
    Ok(accepted)
}

/// Close the open session and append the "Clock Out" log entry.
///
/// The session row is removed with `DELETE ... RETURNING`, so two racing
/// clock-outs cannot both read it. If the transition is rejected the
/// transaction rolls back and the session stays open.
pub async fn clock_out(
    pool: &PgPool,
    punch: &Punch,
    at: DateTime<Utc>,
) -> Result<ClockOut, StoreError> {
    let mut tx = pool.begin().await?;

    let removed = sqlx::query_as::<_, SessionRow>(
        "DELETE FROM active_sessions WHERE user_id = $1 RETURNING user_id, clock_in_time",
    )
    .bind(punch.employee_id.get())
    .fetch_optional(&mut *tx)
    .await?
    .map(SessionRow::into_record);

    let accepted = session::clock_out(removed.as_ref(), punch, at)?;

    insert_log(&mut tx, &accepted.log).await?;
    tx.commit().await?;
    Ok(accepted)
}

/// The employee's open session, if any.
pub async fn active_session(
    pool: &PgPool,
    id: EmployeeId,
) -> Result<Option<ActiveSession>, sqlx::Error> {
    let row = sqlx::query_as::<_, SessionRow>(
        "SELECT user_id, clock_in_time FROM active_sessions WHERE user_id = $1",
    )
    .bind(id.get())
    .fetch_optional(pool)
    .await?;

    Ok(row.map(SessionRow::into_record))
}

/// Clock log entries, newest first with id as tiebreak. `None` selects all.
pub async fn logs(
    pool: &PgPool,
    employee: Option<EmployeeId>,
) -> Result<Vec<ClockLogEntry>, sqlx::Error> {
    let rows = sqlx::query_as::<_, ClockLogRow>(
        "SELECT id, user_id, user_name, action, time, work_type, ip_address,
         location, geolocation, duration
         FROM clock_logs
         WHERE ($1::INTEGER IS NULL OR user_id = $1)
         ORDER BY time DESC, id DESC",
    )
    .bind(employee.map(EmployeeId::get))
    .fetch_all(pool)
    .await?;

    let mut entries = Vec::with_capacity(rows.len());
    for row in rows {
        match row.into_record() {
            Some(entry) => entries.push(entry),
            None => tracing::error!("skipping clock log row with unknown action"),
        }
    }
    Ok(entries)
}

async fn fetch_session(
    conn: &mut PgConnection,
    id: EmployeeId,
) -> Result<Option<ActiveSession>, sqlx::Error> {
    let row = sqlx::query_as::<_, SessionRow>(
        "SELECT user_id, clock_in_time FROM active_sessions WHERE user_id = $1",
    )
    .bind(id.get())
    .fetch_optional(conn)
    .await?;

    Ok(row.map(SessionRow::into_record))
}

async fn insert_log(conn: &mut PgConnection, log: &NewClockLog) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar(
        "INSERT INTO clock_logs (user_id, user_name, action, time, work_type, ip_address,
         location, geolocation, duration)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
         RETURNING id",
    )
    .bind(log.user_id.get())
    .bind(&log.user_name)
    .bind(log.action.as_str())
    .bind(log.time)
    .bind(&log.work_type)
    .bind(&log.ip_address)
    .bind(&log.location)
    .bind(&log.geolocation)
    .bind(&log.duration)
    .fetch_one(conn)
    .await
}

#[derive(sqlx::FromRow)]
struct SessionRow {
    user_id: i32,
    clock_in_time: DateTime<Utc>,
}

impl SessionRow {
    fn into_record(self) -> ActiveSession {
        ActiveSession {
            user_id: EmployeeId::new(self.user_id),
            clock_in_time: self.clock_in_time,
        }
    }
}

#[derive(sqlx::FromRow)]
struct ClockLogRow {
    id: i64,
    user_id: i32,
    user_name: String,
    action: String,
    time: DateTime<Utc>,
    work_type: Option<String>,
    ip_address: Option<String>,
    location: Option<String>,
    geolocation: Option<serde_json::Value>,
    duration: Option<String>,
}

impl ClockLogRow {
    fn into_record(self) -> Option<ClockLogEntry> {
        let Some(action) = ClockAction::parse(&self.action) else {
            tracing::warn!(log_id = self.id, action = %self.action, "unknown clock action");
            return None;
        };
        Some(ClockLogEntry {
            id: self.id,
            user_id: EmployeeId::new(self.user_id),
            user_name: self.user_name,
            action,
            time: self.time,
            work_type: self.work_type,
            ip_address: self.ip_address,
            location: self.location,
            geolocation: self.geolocation,
            duration: self.duration,
        })
    }
}
