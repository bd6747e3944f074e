//! # Clock Session State Machine
//!
//! Each employee is either clocked out (no [`ActiveSession`]) or clocked in
//! (exactly one). The state is never stored as a flag: it is read off the
//! presence of the session row.
//!
//! ```text
//!              clock_in                 clock_out
//! ClockedOut ───────────▶ ClockedIn ───────────▶ ClockedOut
//!     │                       │
//!     └─ clock_out: NotClockedIn   └─ clock_in: AlreadyClockedIn
//! ```
//!
//! [`clock_in`] and [`clock_out`] are pure: they take the current session
//! and the event time, and return the rows the store must write. The store
//! runs them inside the same transaction (or lock) that reads the session,
//! and its uniqueness constraint on the session table is what actually
//! prevents two racing clock-ins from both landing.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};
use utoipa::ToSchema;

use crate::clock::{ClockAction, NewClockLog, Punch};
use crate::error::SessionError;
use crate::identity::EmployeeId;

/// An open clock session. At most one exists per employee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ActiveSession {
    /// Employee who is on the clock.
    pub user_id: EmployeeId,
    /// When the session was opened.
    pub clock_in_time: DateTime<Utc>,
}

/// Clock state of one employee.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No open session.
    ClockedOut,
    /// Open session since the given time.
    ClockedIn {
        /// Clock-in time of the open session.
        since: DateTime<Utc>,
    },
}

impl SessionState {
    /// Derive the state from the (possibly absent) session row.
    pub fn of(session: Option<&ActiveSession>) -> Self {
        match session {
            Some(s) => Self::ClockedIn {
                since: s.clock_in_time,
            },
            None => Self::ClockedOut,
        }
    }

    /// Whether the employee is on the clock.
    pub fn is_clocked_in(&self) -> bool {
        matches!(self, Self::ClockedIn { .. })
    }
}

/// Rows to write for an accepted clock-in.
#[derive(Debug, Clone, PartialEq)]
pub struct ClockIn {
    /// The session to insert.
    pub session: ActiveSession,
    /// The "Clock In" log entry to append.
    pub log: NewClockLog,
}

impl ClockIn {
    /// The timestamp shared by the session and its log entry.
    pub fn time(&self) -> DateTime<Utc> {
        self.session.clock_in_time
    }
}

/// Rows to write for an accepted clock-out. The session row is deleted.
#[derive(Debug, Clone, PartialEq)]
pub struct ClockOut {
    /// The "Clock Out" log entry to append.
    pub log: NewClockLog,
    /// Time worked in the closed session.
    pub duration: WorkDuration,
}

impl ClockOut {
    /// The clock-out timestamp.
    pub fn time(&self) -> DateTime<Utc> {
        self.log.time
    }
}

/// Open a session at `at`.
///
/// # Errors
///
/// [`SessionError::AlreadyClockedIn`] if `current` is an open session.
pub fn clock_in(
    current: Option<&ActiveSession>,
    punch: &Punch,
    at: DateTime<Utc>,
) -> Result<ClockIn, SessionError> {
    if SessionState::of(current).is_clocked_in() {
        return Err(SessionError::AlreadyClockedIn);
    }
    Ok(ClockIn {
        session: ActiveSession {
            user_id: punch.employee_id,
            clock_in_time: at,
        },
        log: punch.log(ClockAction::ClockIn, at, None),
    })
}

/// Close the session at `at` and compute the time worked.
///
/// # Errors
///
/// - [`SessionError::NotClockedIn`] if there is no open session.
/// - [`SessionError::ClockSkew`] if `at` is earlier than the clock-in time.
///   The caller must leave the session in place.
pub fn clock_out(
    current: Option<&ActiveSession>,
    punch: &Punch,
    at: DateTime<Utc>,
) -> Result<ClockOut, SessionError> {
    let SessionState::ClockedIn { since } = SessionState::of(current) else {
        return Err(SessionError::NotClockedIn);
    };
    let duration = WorkDuration::between(since, at)?;
    Ok(ClockOut {
        log: punch.log(ClockAction::ClockOut, at, Some(duration)),
        duration,
    })
}

/// Whole minutes worked in a session, rendered as `"{h}h {m}m"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct WorkDuration {
    minutes: i64,
}

impl WorkDuration {
    /// Elapsed whole minutes from `clock_in` to `clock_out`, rounded down.
    ///
    /// # Errors
    ///
    /// [`SessionError::ClockSkew`] if `clock_out` precedes `clock_in`.
    pub fn between(
        clock_in: DateTime<Utc>,
        clock_out: DateTime<Utc>,
    ) -> Result<Self, SessionError> {
        if clock_out < clock_in {
            return Err(SessionError::ClockSkew {
                clock_in,
                now: clock_out,
            });
        }
        // Non-negative, so truncation equals floor.
        Ok(Self {
            minutes: (clock_out - clock_in).num_minutes(),
        })
    }

    /// Build from a known minute count. `None` for a negative count.
    pub fn from_minutes(minutes: i64) -> Option<Self> {
        (minutes >= 0).then_some(Self { minutes })
    }

    /// Total whole minutes.
    pub fn minutes(&self) -> i64 {
        self.minutes
    }

    /// Whole hours.
    pub fn hours(&self) -> i64 {
        self.minutes / 60
    }

    /// Minutes past the last whole hour, in `0..=59`.
    pub fn remaining_minutes(&self) -> i64 {
        self.minutes % 60
    }
}

impl std::fmt::Display for WorkDuration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}h {}m", self.hours(), self.remaining_minutes())
    }
}

impl Serialize for WorkDuration {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use proptest::prelude::*;

    fn t0() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2026-03-02T08:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    fn punch() -> Punch {
        Punch {
            employee_id: EmployeeId::new(1),
            employee_name: "Ada".into(),
            work_type: Some("Office".into()),
            ip_address: None,
            location: None,
            geolocation: None,
        }
    }

    #[test]
    fn initial_state_is_clocked_out() {
        assert_eq!(SessionState::of(None), SessionState::ClockedOut);
        assert!(!SessionState::of(None).is_clocked_in());
    }

    #[test]
    fn clock_in_from_clocked_out_opens_session() {
        let out = clock_in(None, &punch(), t0()).unwrap();
        assert_eq!(out.session.user_id, EmployeeId::new(1));
        assert_eq!(out.session.clock_in_time, t0());
        assert_eq!(out.log.action, ClockAction::ClockIn);
        assert_eq!(out.log.time, t0());
        assert_eq!(out.time(), t0());
        assert!(out.log.duration.is_none());
    }

    #[test]
    fn second_clock_in_is_rejected() {
        let open = clock_in(None, &punch(), t0()).unwrap().session;
        let err = clock_in(Some(&open), &punch(), t0() + Duration::minutes(5)).unwrap_err();
        assert_eq!(err, SessionError::AlreadyClockedIn);
        assert!(SessionState::of(Some(&open)).is_clocked_in());
    }

    #[test]
    fn clock_out_without_session_is_rejected() {
        let err = clock_out(None, &punch(), t0()).unwrap_err();
        assert_eq!(err, SessionError::NotClockedIn);
    }

    #[test]
    fn clock_out_after_ninety_minutes() {
        let open = clock_in(None, &punch(), t0()).unwrap().session;
        let closed = clock_out(Some(&open), &punch(), t0() + Duration::minutes(90)).unwrap();
        assert_eq!(closed.duration.to_string(), "1h 30m");
        assert_eq!(closed.log.action, ClockAction::ClockOut);
        assert_eq!(closed.log.duration.as_deref(), Some("1h 30m"));
        assert_eq!(closed.time(), t0() + Duration::minutes(90));
    }

    #[test]
    fn clock_out_after_forty_five_minutes() {
        let open = clock_in(None, &punch(), t0()).unwrap().session;
        let closed = clock_out(Some(&open), &punch(), t0() + Duration::minutes(45)).unwrap();
        assert_eq!(closed.duration.to_string(), "0h 45m");
    }

    #[test]
    fn partial_minutes_round_down() {
        let d = WorkDuration::between(t0(), t0() + Duration::seconds(59 * 60 + 59)).unwrap();
        assert_eq!(d.to_string(), "0h 59m");
        let d = WorkDuration::between(t0(), t0() + Duration::seconds(30)).unwrap();
        assert_eq!(d.to_string(), "0h 0m");
    }

    #[test]
    fn clock_skew_is_an_error_not_zero() {
        let open = ActiveSession {
            user_id: EmployeeId::new(1),
            clock_in_time: t0(),
        };
        let err = clock_out(Some(&open), &punch(), t0() - Duration::minutes(2)).unwrap_err();
        assert_eq!(
            err,
            SessionError::ClockSkew {
                clock_in: t0(),
                now: t0() - Duration::minutes(2),
            }
        );
    }

    #[test]
    fn duration_serializes_as_string() {
        let json = serde_json::to_string(&WorkDuration::from_minutes(125).unwrap()).unwrap();
        assert_eq!(json, "\"2h 5m\"");
    }

    #[test]
    fn negative_minutes_are_rejected_not_clamped() {
        assert_eq!(WorkDuration::from_minutes(-1), None);
        assert_eq!(WorkDuration::from_minutes(0).unwrap().to_string(), "0h 0m");
    }

    #[test]
    fn multi_day_session() {
        let d = WorkDuration::between(t0(), t0() + Duration::hours(26) + Duration::minutes(3))
            .unwrap();
        assert_eq!(d.to_string(), "26h 3m");
    }

    proptest! {
        #[test]
        fn format_is_hours_and_bounded_minutes(minutes in 0i64..1_000_000) {
            let d = WorkDuration::between(t0(), t0() + Duration::minutes(minutes)).unwrap();
            prop_assert_eq!(d.minutes(), minutes);
            prop_assert!((0..=59).contains(&d.remaining_minutes()));
            prop_assert_eq!(d.hours() * 60 + d.remaining_minutes(), minutes);
            prop_assert_eq!(d.to_string(), format!("{}h {}m", minutes / 60, minutes % 60));
        }

        #[test]
        fn seconds_never_round_up(minutes in 0i64..10_000, extra_secs in 0i64..60) {
            let end = t0() + Duration::minutes(minutes) + Duration::seconds(extra_secs);
            let d = WorkDuration::between(t0(), end).unwrap();
            prop_assert_eq!(d.minutes(), minutes);
        }
    }
}
