//! # Clock Log Entries
//!
//! The append-only event log written by every clock-in and clock-out.
//! The employee name is a snapshot taken when the event happens, so renames
//! do not rewrite history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::identity::EmployeeId;
use crate::session::WorkDuration;

/// The kind of clock event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum ClockAction {
    /// Session opened.
    #[serde(rename = "Clock In")]
    ClockIn,
    /// Session closed.
    #[serde(rename = "Clock Out")]
    ClockOut,
}

impl ClockAction {
    /// The string stored in the `action` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ClockIn => "Clock In",
            Self::ClockOut => "Clock Out",
        }
    }

    /// Parse a stored action.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Clock In" => Some(Self::ClockIn),
            "Clock Out" => Some(Self::ClockOut),
            _ => None,
        }
    }
}

impl std::fmt::Display for ClockAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The context a client sends with a clock-in or clock-out: who, how, and
/// from where.
#[derive(Debug, Clone, PartialEq)]
pub struct Punch {
    /// Employee being clocked.
    pub employee_id: EmployeeId,
    /// Name snapshot recorded in the log.
    pub employee_name: String,
    /// Work arrangement for this session.
    pub work_type: Option<String>,
    /// Originating IP address as reported by the client.
    pub ip_address: Option<String>,
    /// Human-readable location label.
    pub location: Option<String>,
    /// Raw geolocation payload from the browser.
    pub geolocation: Option<serde_json::Value>,
}

impl Punch {
    /// Build the log row for this punch.
    pub(crate) fn log(
        &self,
        action: ClockAction,
        time: DateTime<Utc>,
        duration: Option<WorkDuration>,
    ) -> NewClockLog {
        NewClockLog {
            user_id: self.employee_id,
            user_name: self.employee_name.clone(),
            action,
            time,
            work_type: self.work_type.clone(),
            ip_address: self.ip_address.clone(),
            location: self.location.clone(),
            geolocation: self.geolocation.clone().filter(|g| !g.is_null()),
            duration: duration.map(|d| d.to_string()),
        }
    }
}

/// A log row before the store assigns its id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewClockLog {
    /// Employee the event belongs to.
    pub user_id: EmployeeId,
    /// Name snapshot.
    pub user_name: String,
    /// Clock in or out.
    pub action: ClockAction,
    /// Event time.
    pub time: DateTime<Utc>,
    /// Work arrangement.
    pub work_type: Option<String>,
    /// Originating IP address.
    pub ip_address: Option<String>,
    /// Location label.
    pub location: Option<String>,
    /// Geolocation payload. JSON `null` is normalized to `None`.
    pub geolocation: Option<serde_json::Value>,
    /// Formatted duration, only on clock-out.
    pub duration: Option<String>,
}

impl NewClockLog {
    /// Attach the store-assigned id.
    pub fn into_entry(self, id: i64) -> ClockLogEntry {
        ClockLogEntry {
            id,
            user_id: self.user_id,
            user_name: self.user_name,
            action: self.action,
            time: self.time,
            work_type: self.work_type,
            ip_address: self.ip_address,
            location: self.location,
            geolocation: self.geolocation,
            duration: self.duration,
        }
    }
}

/// A persisted clock event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ClockLogEntry {
    /// Store-assigned id.
    pub id: i64,
    /// Employee the event belongs to.
    pub user_id: EmployeeId,
    /// Name snapshot at event time.
    pub user_name: String,
    /// Clock in or out.
    pub action: ClockAction,
    /// Event time.
    pub time: DateTime<Utc>,
    /// Work arrangement.
    pub work_type: Option<String>,
    /// Originating IP address.
    pub ip_address: Option<String>,
    /// Location label.
    pub location: Option<String>,
    /// Geolocation payload.
    #[schema(value_type = Option<Object>)]
    pub geolocation: Option<serde_json::Value>,
    /// `"{h}h {m}m"`, present only on clock-out entries.
    pub duration: Option<String>,
}
