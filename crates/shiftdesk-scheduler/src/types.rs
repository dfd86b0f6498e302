use std::collections::BTreeMap;

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use shiftdesk_core::types::{EmployeeId, ShiftId};

/// Body of `POST /assignments`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AssignmentRequest {
    pub employee_id: EmployeeId,
    pub shift_id: ShiftId,
}

/// Body of `PATCH /assignments/{id}`; absent fields keep their value.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct AssignmentPatch {
    #[serde(default)]
    pub employee_id: Option<EmployeeId>,
    #[serde(default)]
    pub shift_id: Option<ShiftId>,
}

/// How the auto-balancer treats overlapping shifts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BalanceMode {
    /// Pick purely by workload; overlaps are not checked.
    #[default]
    Lenient,
    /// Skip candidates whose schedule overlaps the shift being filled.
    Strict,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceReport {
    pub created: usize,
}

fn default_weeks() -> i64 {
    1
}

/// Body of `POST /ai/generate-schedule`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleRequest {
    #[serde(default = "default_weeks")]
    pub weeks: i64,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
}

impl Default for ScheduleRequest {
    fn default() -> Self {
        Self {
            weeks: default_weeks(),
            start_date: None,
        }
    }
}

/// Inclusive date range a proposal covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl ScheduleWindow {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// The same window moved `days` earlier.
    pub fn shifted_back(&self, days: u64) -> Option<ScheduleWindow> {
        Some(ScheduleWindow {
            start: self.start.checked_sub_days(Days::new(days))?,
            end: self.end.checked_sub_days(Days::new(days))?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposedAssignment {
    pub shift_id: ShiftId,
    pub employee_id: EmployeeId,
    pub reason: String,
}

/// Which path produced the proposed assignments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProposalSource {
    Ai,
    Fallback,
    CopyForward,
    None,
}

/// Advisory schedule. Nothing in it has been persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleProposal {
    pub success: bool,
    pub summary: String,
    pub proposed_assignments: Vec<ProposedAssignment>,
    pub raw_response: Option<String>,
    pub ai_error: Option<String>,
    pub window: ScheduleWindow,
    pub source: ProposalSource,
    pub warnings: Vec<String>,
    /// New shift id -> the prior-week shift it was cloned from.
    pub cloned_shifts: BTreeMap<ShiftId, ShiftId>,
}

/// Result of an advisory AI call. Provider failures land in `error`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvisorReply {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AdvisorReply {
    pub fn ok(content: String) -> Self {
        Self {
            success: true,
            content: Some(content),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            content: None,
            error: Some(error.into()),
        }
    }
}
