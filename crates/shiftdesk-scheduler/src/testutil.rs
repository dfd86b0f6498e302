//! Fixtures shared by the unit tests in this crate.

use chrono::{NaiveDate, NaiveTime};
use shiftdesk_core::types::{NewEmployee, NewShift, Shift, ShiftType};
use shiftdesk_store::{Database, ShiftStore, SqliteStore, StoreError};

use crate::error::AssignmentError;

pub struct TestDb(Database);

impl TestDb {
    pub fn new() -> Self {
        Self(Database::open_in_memory().unwrap())
    }

    /// Run `f` in a transaction and unwrap the result.
    pub fn run<T>(&self, f: impl FnOnce(&SqliteStore<'_>) -> Result<T, AssignmentError>) -> T {
        self.0.with_transaction(f).unwrap()
    }

    /// Run `f` in a transaction with any error type the store converts into.
    pub fn with<T, E: From<StoreError>>(
        &self,
        f: impl FnOnce(&SqliteStore<'_>) -> Result<T, E>,
    ) -> Result<T, E> {
        self.0.with_transaction(f)
    }

    pub fn try_run<T>(
        &self,
        f: impl FnOnce(&SqliteStore<'_>) -> Result<T, AssignmentError>,
    ) -> Result<T, AssignmentError> {
        self.0.with_transaction(f)
    }
}

/// Employee `n` gets email `e{n}@example.com`.
pub fn employee(n: u32) -> NewEmployee {
    NewEmployee {
        first_name: format!("Emp{n}"),
        last_name: "Test".into(),
        email: format!("e{n}@example.com"),
        phone: None,
        start_date: NaiveDate::from_ymd_opt(2024, 1, 1),
        department_id: None,
        avatar_url: None,
    }
}

pub fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, day).unwrap()
}

pub fn new_shift(name: &str, day: u32, (from, to): (u32, u32)) -> NewShift {
    NewShift {
        name: name.into(),
        date: date(day),
        start_time: NaiveTime::from_hms_opt(from, 0, 0).unwrap(),
        end_time: NaiveTime::from_hms_opt(to, 0, 0).unwrap(),
        shift_type: if from < 12 {
            ShiftType::Morning
        } else {
            ShiftType::Afternoon
        },
    }
}

/// A shift on 2025-03-`day` from `hours.0`:00 to `hours.1`:00.
pub fn seed_shift(
    store: &SqliteStore<'_>,
    name: &str,
    day: u32,
    hours: (u32, u32),
) -> Result<Shift, StoreError> {
    store.create_shift(&new_shift(name, day, hours))
}
