//! Conflict validator: the rules deciding whether an employee may hold a
//! shift.

use shiftdesk_core::types::{AssignmentId, EmployeeId, Shift, ShiftId};
use shiftdesk_store::{AssignmentStore, ShiftStore};
use tracing::debug;

use crate::error::AssignmentError;

/// Check that `employee_id` may be placed on `shift_id`.
///
/// Rules, in order:
/// 1. the shift must exist;
/// 2. the exact `(employee, shift)` pair must not already be assigned;
/// 3. none of the employee's other shifts may overlap it on the same date.
///
/// The assignment `ignore` (the one being updated) is invisible to rules 2
/// and 3. Returns the resolved shift. Reads only.
pub fn validate_assignment<S>(
    store: &S,
    employee_id: EmployeeId,
    shift_id: ShiftId,
    ignore: Option<AssignmentId>,
) -> Result<Shift, AssignmentError>
where
    S: ShiftStore + AssignmentStore + ?Sized,
{
    let shift = store
        .get_shift(shift_id)?
        .ok_or(AssignmentError::ShiftNotFound(shift_id))?;

    let held: Vec<_> = store
        .list_assignments_by_employee(employee_id)?
        .into_iter()
        .filter(|a| Some(a.id) != ignore)
        .collect();

    if held.iter().any(|a| a.shift_id == shift_id) {
        debug!(employee_id, shift_id, "rejected: duplicate assignment");
        return Err(AssignmentError::DuplicateAssignment);
    }

    for assignment in &held {
        let Some(other) = store.get_shift(assignment.shift_id)? else {
            continue;
        };
        if other.overlaps(&shift) {
            debug!(
                employee_id,
                shift_id,
                conflicting_shift_id = other.id,
                "rejected: overlapping assignment"
            );
            return Err(AssignmentError::OverlapConflict {
                conflicting_shift_id: other.id,
            });
        }
    }

    Ok(shift)
}
