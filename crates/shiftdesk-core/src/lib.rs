//! `shiftdesk-core`: domain model, configuration and shared error type.
//!
//! Every other crate in the workspace depends on this one; it has no
//! knowledge of storage, HTTP or LLM providers.

pub mod config;
pub mod error;
pub mod types;

pub use config::ShiftdeskConfig;
pub use error::{Result, ShiftdeskError};
pub use types::{
    Assignment, AssignmentId, Department, DepartmentId, Employee, EmployeeId, EmployeePatch,
    NewEmployee, NewShift, Shift, ShiftId, ShiftType, TimeSlot,
};
