//! In-memory tables.
//!
//! Same rules as the PostgreSQL schema: usernames are unique, one session per
//! employee, and logs and sessions must reference an existing employee.
//! The lock is never held across an `.await`.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use tracker_core::{
    session, ActiveSession, ClockIn, ClockLogEntry, ClockOut, Employee, EmployeeId, NewClockLog,
    NewEmployee, Punch, StoredEmployee, ValidationError,
};

use super::StoreError;

#[derive(Debug, Default)]
struct Tables {
    employees: BTreeMap<EmployeeId, StoredEmployee>,
    logs: Vec<ClockLogEntry>,
    sessions: HashMap<EmployeeId, ActiveSession>,
    last_employee_id: i32,
    last_log_id: i64,
}

impl Tables {
    fn require_employee(&self, id: EmployeeId) -> Result<(), StoreError> {
        if self.employees.contains_key(&id) {
            Ok(())
        } else {
            Err(StoreError::Constraint(format!("employee {id} does not exist")))
        }
    }

    fn append_log(&mut self, log: NewClockLog) {
        self.last_log_id += 1;
        let entry = log.into_entry(self.last_log_id);
        self.logs.push(entry);
    }
}

/// Process-local store. Clones share the same tables.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    /// Empty tables.
    pub fn new() -> Self {
        Self::default()
    }

    pub(super) fn list_employees(&self) -> Vec<Employee> {
        let mut all: Vec<Employee> = self
            .tables
            .read()
            .employees
            .values()
            .map(|s| s.employee.clone())
            .collect();
        all.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        all
    }

    pub(super) fn find_by_username(&self, username: &str) -> Option<StoredEmployee> {
        self.tables
            .read()
            .employees
            .values()
            .find(|s| s.employee.username == username)
            .cloned()
    }

    pub(super) fn insert_employee(&self, new: NewEmployee) -> Result<Employee, StoreError> {
        let mut tables = self.tables.write();
        if tables
            .employees
            .values()
            .any(|s| s.employee.username == new.username)
        {
            return Err(ValidationError::DuplicateUsername(new.username).into());
        }
        tables.last_employee_id += 1;
        let id = EmployeeId::new(tables.last_employee_id);
        let stored = new.into_employee(id, Utc::now());
        let employee = stored.employee.clone();
        tables.employees.insert(id, stored);
        Ok(employee)
    }

    pub(super) fn delete_employee(&self, id: EmployeeId) -> bool {
        let mut tables = self.tables.write();
        tables.logs.retain(|log| log.user_id != id);
        tables.sessions.remove(&id);
        tables.employees.remove(&id).is_some()
    }

    pub(super) fn clock_in(&self, punch: &Punch, at: DateTime<Utc>) -> Result<ClockIn, StoreError> {
        let mut tables = self.tables.write();
        tables.require_employee(punch.employee_id)?;
        let accepted = session::clock_in(tables.sessions.get(&punch.employee_id), punch, at)?;
        tables
            .sessions
            .insert(punch.employee_id, accepted.session.clone());
        tables.append_log(accepted.log.clone());
        Ok(accepted)
    }

    pub(super) fn clock_out(
        &self,
        punch: &Punch,
        at: DateTime<Utc>,
    ) -> Result<ClockOut, StoreError> {
        let mut tables = self.tables.write();
        let accepted = session::clock_out(tables.sessions.get(&punch.employee_id), punch, at)?;
        tables.require_employee(punch.employee_id)?;
        tables.sessions.remove(&punch.employee_id);
        tables.append_log(accepted.log.clone());
        Ok(accepted)
    }

    pub(super) fn active_session(&self, id: EmployeeId) -> Option<ActiveSession> {
        self.tables.read().sessions.get(&id).cloned()
    }

    pub(super) fn logs(&self, employee: Option<EmployeeId>) -> Vec<ClockLogEntry> {
        let mut selected: Vec<ClockLogEntry> = self
            .tables
            .read()
            .logs
            .iter()
            .filter(|log| employee.map_or(true, |id| log.user_id == id))
            .cloned()
            .collect();
        selected.sort_by(|a, b| b.time.cmp(&a.time).then(b.id.cmp(&a.id)));
        selected
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use tracker_core::{EmployeeDraft, SessionError, TrackerError};

    fn hire(store: &MemoryStore, name: &str, username: &str) -> Employee {
        let draft = EmployeeDraft {
            name: Some(name.into()),
            username: Some(username.into()),
            password: Some("pw".into()),
            ..Default::default()
        };
        store
            .insert_employee(draft.into_new_employee().unwrap())
            .unwrap()
    }

    fn punch(id: EmployeeId) -> Punch {
        Punch {
            employee_id: id,
            employee_name: "Someone".into(),
            work_type: None,
            ip_address: None,
            location: None,
            geolocation: None,
        }
    }

    #[test]
    fn ids_are_assigned_in_sequence() {
        let store = MemoryStore::new();
        let a = hire(&store, "A", "a");
        let b = hire(&store, "B", "b");
        assert_eq!(a.id.get() + 1, b.id.get());
    }

    #[test]
    fn ids_are_not_reused_after_delete() {
        let store = MemoryStore::new();
        let a = hire(&store, "A", "a");
        assert!(store.delete_employee(a.id));
        let b = hire(&store, "B", "b");
        assert!(b.id.get() > a.id.get());
    }

    #[test]
    fn listing_is_ordered_by_name() {
        let store = MemoryStore::new();
        hire(&store, "Zoe", "z");
        hire(&store, "Ada", "a");
        hire(&store, "Mia", "m");
        let names: Vec<String> = store.list_employees().into_iter().map(|e| e.name).collect();
        assert_eq!(names, vec!["Ada", "Mia", "Zoe"]);
    }

    #[test]
    fn deleting_unknown_id_reports_false() {
        let store = MemoryStore::new();
        assert!(!store.delete_employee(EmployeeId::new(42)));
    }

    #[test]
    fn clock_in_for_unknown_employee_is_a_constraint_error() {
        let store = MemoryStore::new();
        let err = store
            .clock_in(&punch(EmployeeId::new(9)), Utc::now())
            .unwrap_err();
        assert!(matches!(err, StoreError::Constraint(_)));
        assert!(store.active_session(EmployeeId::new(9)).is_none());
    }

    #[test]
    fn clock_out_without_session_is_not_clocked_in() {
        let store = MemoryStore::new();
        let ada = hire(&store, "Ada", "ada");
        let err = store.clock_out(&punch(ada.id), Utc::now()).unwrap_err();
        assert!(matches!(
            err,
            StoreError::Domain(TrackerError::Session(SessionError::NotClockedIn))
        ));
    }

    #[test]
    fn logs_are_newest_first_with_id_tiebreak() {
        let store = MemoryStore::new();
        let ada = hire(&store, "Ada", "ada");
        let bob = hire(&store, "Bob", "bob");
        let t = Utc::now();
        store.clock_in(&punch(ada.id), t).unwrap();
        store.clock_in(&punch(bob.id), t).unwrap();
        store
            .clock_out(&punch(ada.id), t + Duration::minutes(5))
            .unwrap();

        let logs = store.logs(None);
        let ids: Vec<i64> = logs.iter().map(|l| l.id).collect();
        assert_eq!(ids, vec![3, 2, 1]);

        let bobs = store.logs(Some(bob.id));
        assert_eq!(bobs.len(), 1);
        assert_eq!(bobs[0].user_id, bob.id);
    }
}
