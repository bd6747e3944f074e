//! # Error Hierarchy
//!
//! Structured error types for the tracker domain, built with `thiserror`.
//!
//! The display strings of the leaf variants are the messages clients see in
//! the `{"error": ...}` response body, so they are kept short and stable.

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Top-level error type for domain operations.
#[derive(Error, Debug)]
pub enum TrackerError {
    /// Input failed validation or violates a uniqueness rule.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A clock-in/clock-out transition was rejected.
    #[error(transparent)]
    Session(#[from] SessionError),

    /// Credentials did not match.
    #[error(transparent)]
    Auth(#[from] AuthError),
}

/// Input validation failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field was absent or blank.
    #[error("{0} is required")]
    MissingField(&'static str),

    /// Another employee already uses this username.
    #[error("Username already exists")]
    DuplicateUsername(String),
}

/// Rejected session transitions.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// Clock-in requested while a session is already open.
    #[error("Already clocked in")]
    AlreadyClockedIn,

    /// Clock-out requested with no open session.
    #[error("Not clocked in")]
    NotClockedIn,

    /// The clock-out time precedes the stored clock-in time.
    #[error("Clock-out time {now} precedes clock-in time {clock_in}")]
    ClockSkew {
        /// Stored clock-in time of the open session.
        clock_in: DateTime<Utc>,
        /// Time the clock-out was attempted.
        now: DateTime<Utc>,
    },
}

/// Authentication failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Unknown username or wrong password. The two cases are deliberately
    /// indistinguishable.
    #[error("Invalid credentials")]
    InvalidCredentials,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_messages_match_wire_contract() {
        assert_eq!(SessionError::AlreadyClockedIn.to_string(), "Already clocked in");
        assert_eq!(SessionError::NotClockedIn.to_string(), "Not clocked in");
    }

    #[test]
    fn duplicate_username_message() {
        let err = ValidationError::DuplicateUsername("alice".into());
        assert_eq!(err.to_string(), "Username already exists");
    }

    #[test]
    fn missing_field_names_the_field() {
        assert_eq!(
            ValidationError::MissingField("username").to_string(),
            "username is required"
        );
    }

    #[test]
    fn tracker_error_is_transparent() {
        let err = TrackerError::from(AuthError::InvalidCredentials);
        assert_eq!(err.to_string(), "Invalid credentials");
    }

    #[test]
    fn clock_skew_reports_both_times() {
        let clock_in = DateTime::parse_from_rfc3339("2026-03-01T10:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let now = DateTime::parse_from_rfc3339("2026-03-01T09:58:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let msg = SessionError::ClockSkew { clock_in, now }.to_string();
        assert!(msg.contains("2026-03-01 10:00:00"), "got: {msg}");
        assert!(msg.contains("2026-03-01 09:58:00"), "got: {msg}");
    }
}
