#![deny(missing_docs)]

//! # tracker-core: Domain Types for the Employee Tracker
//!
//! This crate holds everything about employee time tracking that does not
//! touch the network or the database. The API crate owns persistence and
//! HTTP; this crate owns the rules.
//!
//! ## Design Principles
//!
//! 1. **The active session is the clock state.** An employee is clocked in
//!    exactly when an [`ActiveSession`] exists for them. The transitions in
//!    [`session`] take the current session (if any) and produce the rows to
//!    write, or a [`SessionError`].
//!
//! 2. **Newtype identifiers.** [`EmployeeId`] wraps the store-assigned
//!    integer so it cannot be confused with a log entry id.
//!
//! 3. **Passwords never leave as plain text.** [`PasswordHash`] stores a
//!    salted SHA-256 digest and compares in constant time. [`Employee`] has
//!    no password field at all, so it can be serialized freely.
//!
//! 4. **Bulk import is a fold.** [`BulkImport`] accumulates successes and
//!    failures in order and never stops early.

pub mod bulk;
pub mod clock;
pub mod employee;
pub mod error;
pub mod identity;
pub mod password;
pub mod session;

pub use bulk::{BulkFailure, BulkImport};
pub use clock::{ClockAction, ClockLogEntry, NewClockLog, Punch};
pub use employee::{
    authenticate, Employee, EmployeeDraft, NewEmployee, Role, StoredEmployee, DEFAULT_AFFILIATION,
};
pub use error::{AuthError, SessionError, TrackerError, ValidationError};
pub use identity::EmployeeId;
pub use password::PasswordHash;
pub use session::{ActiveSession, ClockIn, ClockOut, SessionState, WorkDuration};
