//! SQLite persistence for the shiftdesk directory and roster.
//!
//! [`Database`] owns the connection; every read or write goes through a
//! [`SqliteStore`] scoped to one transaction.

pub mod assignments;
pub mod db;
pub mod error;
pub mod shifts;
pub mod store;
pub mod stores;

pub use db::{init_db, Database};
pub use error::{Result, StoreError};
pub use store::SqliteStore;
pub use stores::{AssignmentStore, EmployeeStore, ShiftStore};
