use std::path::Path;
use std::sync::{Mutex, PoisonError};

use rusqlite::Connection;
use tracing::{info, warn};

use crate::error::{Result, StoreError};
use crate::store::SqliteStore;

/// Initialise all tables. Safe to call on every startup: CREATE IF NOT
/// EXISTS means it's idempotent.
pub fn init_db(conn: &Connection) -> rusqlite::Result<()> {
    create_departments_table(conn)?;
    create_employees_table(conn)?;
    create_shifts_table(conn)?;
    create_assignments_table(conn)?;
    Ok(())
}

fn create_departments_table(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS departments (
            id      INTEGER PRIMARY KEY AUTOINCREMENT,
            name    TEXT NOT NULL UNIQUE
        );",
    )
}

fn create_employees_table(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS employees (
            id              INTEGER PRIMARY KEY AUTOINCREMENT,
            first_name      TEXT NOT NULL,
            last_name       TEXT NOT NULL,
            email           TEXT NOT NULL UNIQUE,
            phone           TEXT,
            start_date      TEXT NOT NULL,          -- YYYY-MM-DD
            department_id   INTEGER REFERENCES departments(id),
            avatar_url      TEXT
        );",
    )
}

fn create_shifts_table(conn: &Connection) -> rusqlite::Result<()> {
    // UNIQUE(date, name): one "Morning" per day; the week-ensure routine
    // relies on it never cloning into a populated window.
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS shifts (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            name        TEXT NOT NULL,
            date        TEXT NOT NULL,              -- YYYY-MM-DD
            start_time  TEXT NOT NULL,              -- HH:MM:SS
            end_time    TEXT NOT NULL,              -- HH:MM:SS
            shift_type  TEXT NOT NULL,              -- MORNING | AFTERNOON | NIGHT
            UNIQUE(date, name)
        );
        CREATE INDEX IF NOT EXISTS idx_shifts_date ON shifts (date);",
    )
}

fn create_assignments_table(conn: &Connection) -> rusqlite::Result<()> {
    // Overlap rules are enforced by the scheduler; the storage layer only
    // guarantees the (employee, shift) pair is unique and cascades deletes.
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS shift_assignments (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            employee_id INTEGER NOT NULL REFERENCES employees(id) ON DELETE CASCADE,
            shift_id    INTEGER NOT NULL REFERENCES shifts(id) ON DELETE CASCADE,
            UNIQUE(employee_id, shift_id)
        );
        CREATE INDEX IF NOT EXISTS idx_assignments_shift
            ON shift_assignments (shift_id);",
    )
}

/// Owns the single SQLite connection and hands out transaction-scoped
/// [`SqliteStore`] views.
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Open (or create) the database file and run schema initialisation.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path.as_ref())?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;
        init_db(&conn)?;
        info!(path = %path.as_ref().display(), "database ready");
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        init_db(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Run `f` inside one transaction.
    ///
    /// The transaction commits only when `f` returns `Ok`; any `Err` (a
    /// validator rejection included) drops it, which rolls back every write
    /// made through the store.
    pub fn with_transaction<T, E, F>(&self, f: F) -> std::result::Result<T, E>
    where
        F: FnOnce(&SqliteStore<'_>) -> std::result::Result<T, E>,
        E: From<StoreError>,
    {
        // A panic mid-transaction drops the `Transaction`, which rolls it
        // back, so the connection behind a poisoned lock is still clean.
        let mut conn = self.conn.lock().unwrap_or_else(|poisoned| {
            warn!("database lock was poisoned by a panicked request; recovering");
            self.conn.clear_poison();
            PoisonError::into_inner(poisoned)
        });
        let tx = conn.transaction().map_err(StoreError::from)?;
        let out = f(&SqliteStore::new(&tx))?;
        tx.commit().map_err(StoreError::from)?;
        Ok(out)
    }
}
