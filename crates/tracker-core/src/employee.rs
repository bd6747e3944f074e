//! # Employee Records
//!
//! The employee entity, the creation draft accepted from clients, and
//! credential verification.
//!
//! Creation goes through [`EmployeeDraft::into_new_employee`], which is the
//! one place the creation rules live: required fields are checked, the role
//! is forced to [`Role::Employee`], and blank company/manager fall back to
//! [`DEFAULT_AFFILIATION`]. Both single-add and bulk import use it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::{AuthError, ValidationError};
use crate::identity::EmployeeId;
use crate::password::PasswordHash;

/// Placeholder stored when company or manager is absent.
pub const DEFAULT_AFFILIATION: &str = "N/A";

/// Access role of an employee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Regular employee. Every account created through the API has this role.
    Employee,
    /// Administrator, only created by startup seeding.
    Admin,
}

impl Role {
    /// The string stored in the `role` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Employee => "employee",
            Self::Admin => "admin",
        }
    }

    /// Parse a stored role. Unknown values read as `None`.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "employee" => Some(Self::Employee),
            "admin" => Some(Self::Admin),
            _ => None,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An employee as returned by the API. Carries no credential material.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Employee {
    /// Store-assigned identifier.
    pub id: EmployeeId,
    /// Display name.
    pub name: String,
    /// Login name, unique across all employees.
    pub username: String,
    /// Access role.
    pub role: Role,
    /// Employing company, `"N/A"` when not given.
    pub company: String,
    /// Reporting manager, `"N/A"` when not given.
    pub manager: String,
    /// Default work arrangement (e.g. "Office", "Remote").
    pub work_type: Option<String>,
    /// When the record was inserted.
    pub created_at: DateTime<Utc>,
}

/// An employee together with its stored password hash, as loaded for login.
#[derive(Debug, Clone)]
pub struct StoredEmployee {
    /// The public record.
    pub employee: Employee,
    /// Salted digest of the password.
    pub password_hash: PasswordHash,
}

/// Verify a login attempt against the record found for the username.
///
/// `None` (unknown username) and a wrong password fail identically.
pub fn authenticate(found: Option<StoredEmployee>, password: &str) -> Result<Employee, AuthError> {
    match found {
        Some(stored) if stored.password_hash.verify(password) => Ok(stored.employee),
        _ => Err(AuthError::InvalidCredentials),
    }
}

/// Employee creation request as sent by clients.
///
/// Every field is optional at the deserialization layer so that a bulk
/// import item with a missing field becomes a per-item error rather than a
/// rejected batch. The bulk CSV importer sends `workType`; the single-add
/// form sends `work_type`. Both are accepted.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct EmployeeDraft {
    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
    /// Login name.
    #[serde(default)]
    pub username: Option<String>,
    /// Plain-text password, hashed before storage.
    #[serde(default)]
    pub password: Option<String>,
    /// Employing company.
    #[serde(default)]
    pub company: Option<String>,
    /// Reporting manager.
    #[serde(default)]
    pub manager: Option<String>,
    /// Default work arrangement.
    #[serde(default, alias = "workType")]
    pub work_type: Option<String>,
}

impl EmployeeDraft {
    /// How this item is named in bulk import error reports: the name, or the
    /// username when the name is blank.
    pub fn label(&self) -> String {
        non_blank(&self.name)
            .or_else(|| non_blank(&self.username))
            .unwrap_or_default()
            .to_string()
    }

    /// Apply the creation rules and hash the password.
    pub fn into_new_employee(self) -> Result<NewEmployee, ValidationError> {
        let name = non_blank(&self.name)
            .ok_or(ValidationError::MissingField("name"))?
            .to_string();
        let username = non_blank(&self.username)
            .ok_or(ValidationError::MissingField("username"))?
            .to_string();
        let password = self
            .password
            .as_deref()
            .filter(|p| !p.trim().is_empty())
            .ok_or(ValidationError::MissingField("password"))?;

        Ok(NewEmployee {
            name,
            username,
            password_hash: PasswordHash::generate(password),
            role: Role::Employee,
            company: non_blank(&self.company)
                .unwrap_or(DEFAULT_AFFILIATION)
                .to_string(),
            manager: non_blank(&self.manager)
                .unwrap_or(DEFAULT_AFFILIATION)
                .to_string(),
            work_type: non_blank(&self.work_type).map(str::to_string),
        })
    }
}

/// A validated employee ready for insertion.
#[derive(Debug, Clone)]
pub struct NewEmployee {
    /// Display name.
    pub name: String,
    /// Trimmed login name.
    pub username: String,
    /// Salted digest of the password.
    pub password_hash: PasswordHash,
    /// Access role.
    pub role: Role,
    /// Employing company or `"N/A"`.
    pub company: String,
    /// Reporting manager or `"N/A"`.
    pub manager: String,
    /// Default work arrangement.
    pub work_type: Option<String>,
}

impl NewEmployee {
    /// Override the role. Used only for seeding the administrator account.
    pub fn with_role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }

    /// Attach the store-assigned id and insertion time.
    pub fn into_employee(self, id: EmployeeId, created_at: DateTime<Utc>) -> StoredEmployee {
        StoredEmployee {
            employee: Employee {
                id,
                name: self.name,
                username: self.username,
                role: self.role,
                company: self.company,
                manager: self.manager,
                work_type: self.work_type,
                created_at,
            },
            password_hash: self.password_hash,
        }
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}
