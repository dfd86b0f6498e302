use shiftdesk_core::types::{AssignmentId, ShiftId};
use shiftdesk_store::StoreError;
use thiserror::Error;

/// Outcomes of the conflict validator and the assignment mutations.
#[derive(Debug, Error)]
pub enum AssignmentError {
    #[error("Shift not found")]
    ShiftNotFound(ShiftId),

    #[error("This employee is already assigned to this shift")]
    DuplicateAssignment,

    #[error("Employee already assigned to an overlapping shift")]
    OverlapConflict { conflicting_shift_id: ShiftId },

    #[error("Assignment not found")]
    AssignmentNotFound(AssignmentId),

    #[error(transparent)]
    Store(StoreError),
}

impl AssignmentError {
    /// True for failures the caller can correct by changing the request.
    pub fn is_client_error(&self) -> bool {
        match self {
            AssignmentError::Store(StoreError::ForeignKeyViolation(_)) => true,
            AssignmentError::Store(_) => false,
            _ => true,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AssignmentError::ShiftNotFound(_) => "SHIFT_NOT_FOUND",
            AssignmentError::DuplicateAssignment => "DUPLICATE_ASSIGNMENT",
            AssignmentError::OverlapConflict { .. } => "OVERLAP_CONFLICT",
            AssignmentError::AssignmentNotFound(_) => "ASSIGNMENT_NOT_FOUND",
            AssignmentError::Store(StoreError::ForeignKeyViolation(_)) => "UNKNOWN_REFERENCE",
            AssignmentError::Store(_) => "DATABASE_ERROR",
        }
    }
}

// Inside an assignment transaction the only unique key that can fire is
// (employee_id, shift_id): the insert lost a race with the duplicate check.
impl From<StoreError> for AssignmentError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::UniqueViolation(_) => AssignmentError::DuplicateAssignment,
            other => AssignmentError::Store(other),
        }
    }
}

/// Lookup failures outside the assignment path (advisory calls, planning).
#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: i64 },

    #[error("Invalid schedule window: {0}")]
    InvalidWindow(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type Result<T> = std::result::Result<T, SchedulerError>;
