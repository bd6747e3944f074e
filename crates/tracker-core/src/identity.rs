//! # Identity Newtypes
//!
//! Store-assigned identifiers. Employees are keyed by a 32-bit `SERIAL`
//! column; the newtype keeps them apart from log entry ids (`i64`).

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Identifier of an employee, assigned by the record store on insert.
///
/// Serializes as a bare integer so the JSON contract stays `"user_id": 7`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(transparent)]
#[schema(value_type = i32)]
pub struct EmployeeId(i32);

impl EmployeeId {
    /// Wrap a raw store identifier.
    pub fn new(id: i32) -> Self {
        Self(id)
    }

    /// The raw integer, for binding into queries.
    pub fn get(self) -> i32 {
        self.0
    }
}

impl std::fmt::Display for EmployeeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i32> for EmployeeId {
    fn from(id: i32) -> Self {
        Self(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_as_bare_integer() {
        let json = serde_json::to_string(&EmployeeId::new(42)).unwrap();
        assert_eq!(json, "42");
        let back: EmployeeId = serde_json::from_str("42").unwrap();
        assert_eq!(back, EmployeeId::new(42));
    }

    #[test]
    fn display_is_the_number() {
        assert_eq!(EmployeeId::from(7).to_string(), "7");
    }
}
