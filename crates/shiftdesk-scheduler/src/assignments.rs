use shiftdesk_core::types::{Assignment, AssignmentId};
use shiftdesk_store::{AssignmentStore, ShiftStore};
use tracing::info;

use crate::error::AssignmentError;
use crate::types::{AssignmentPatch, AssignmentRequest};
use crate::validator::validate_assignment;

/// Validate and persist a new assignment.
pub fn assign_employee<S>(store: &S, req: AssignmentRequest) -> Result<Assignment, AssignmentError>
where
    S: ShiftStore + AssignmentStore + ?Sized,
{
    validate_assignment(store, req.employee_id, req.shift_id, None)?;
    let assignment = store.create_assignment(req.employee_id, req.shift_id)?;
    Ok(assignment)
}

/// Move an existing assignment to another employee and/or shift.
///
/// Fields missing from `patch` keep their current value; the result is
/// re-validated with the assignment itself ignored, so re-saving an
/// unchanged pair succeeds.
pub fn update_assignment<S>(
    store: &S,
    id: AssignmentId,
    patch: AssignmentPatch,
) -> Result<Assignment, AssignmentError>
where
    S: ShiftStore + AssignmentStore + ?Sized,
{
    let existing = store
        .get_assignment(id)?
        .ok_or(AssignmentError::AssignmentNotFound(id))?;

    let employee_id = patch.employee_id.unwrap_or(existing.employee_id);
    let shift_id = patch.shift_id.unwrap_or(existing.shift_id);

    validate_assignment(store, employee_id, shift_id, Some(id))?;

    let updated = store
        .update_assignment(id, employee_id, shift_id)?
        .ok_or(AssignmentError::AssignmentNotFound(id))?;
    info!(assignment_id = id, employee_id, shift_id, "assignment reassigned");
    Ok(updated)
}

/// Returns `false` for an unknown id; never an error for that case.
pub fn delete_assignment<S>(store: &S, id: AssignmentId) -> Result<bool, AssignmentError>
where
    S: AssignmentStore + ?Sized,
{
    Ok(store.delete_assignment(id)?)
}

pub fn list_assignments<S>(store: &S) -> Result<Vec<Assignment>, AssignmentError>
where
    S: AssignmentStore + ?Sized,
{
    Ok(store.list_assignments()?)
}
