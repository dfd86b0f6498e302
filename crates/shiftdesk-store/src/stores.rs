//! Read/write contracts the scheduling engine is written against.
//!
//! All list operations return rows ordered by id unless stated otherwise, so
//! every algorithm built on top of them is deterministic.

use shiftdesk_core::types::{
    Assignment, AssignmentId, Employee, EmployeeId, NewShift, Shift, ShiftId,
};

use crate::error::Result;

pub trait EmployeeStore {
    fn list_employees(&self) -> Result<Vec<Employee>>;
    fn get_employee(&self, id: EmployeeId) -> Result<Option<Employee>>;
}

pub trait ShiftStore {
    fn list_shifts(&self) -> Result<Vec<Shift>>;
    fn get_shift(&self, id: ShiftId) -> Result<Option<Shift>>;
    fn create_shift(&self, shift: &NewShift) -> Result<Shift>;
    /// Deletes the shift and, by cascade, its assignments.
    /// Returns `false` when no such shift exists.
    fn delete_shift(&self, id: ShiftId) -> Result<bool>;
}

pub trait AssignmentStore {
    fn list_assignments(&self) -> Result<Vec<Assignment>>;
    fn list_assignments_by_shift(&self, shift_id: ShiftId) -> Result<Vec<Assignment>>;
    fn list_assignments_by_employee(&self, employee_id: EmployeeId) -> Result<Vec<Assignment>>;
    fn get_assignment(&self, id: AssignmentId) -> Result<Option<Assignment>>;
    fn create_assignment(&self, employee_id: EmployeeId, shift_id: ShiftId) -> Result<Assignment>;
    /// Returns `None` when no such assignment exists.
    fn update_assignment(
        &self,
        id: AssignmentId,
        employee_id: EmployeeId,
        shift_id: ShiftId,
    ) -> Result<Option<Assignment>>;
    fn delete_assignment(&self, id: AssignmentId) -> Result<bool>;
}
