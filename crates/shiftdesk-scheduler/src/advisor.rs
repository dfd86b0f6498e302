//! Advisory AI calls. Each one gathers context from the store, then asks the
//! provider; the reply is returned verbatim and never persisted.
//!
//! Like schedule proposals these are split: the `*_request` functions run
//! inside a transaction and return an [`AdvisorRequest`], and
//! [`Advisor::run`] performs the call outside it.

use serde_json::{json, Value};
use shiftdesk_core::types::{EmployeeId, ShiftId};
use shiftdesk_store::{AssignmentStore, EmployeeStore, ShiftStore};

use crate::client::AiClient;
use crate::error::{Result, SchedulerError};
use crate::prompt;
use crate::types::AdvisorReply;

/// A fully built prompt waiting to be sent.
#[derive(Debug, Clone)]
pub struct AdvisorRequest {
    pub prompt: String,
}

pub struct Advisor {
    client: AiClient,
}

impl Advisor {
    pub fn new(client: AiClient) -> Self {
        Self { client }
    }

    pub async fn run(&self, req: AdvisorRequest) -> AdvisorReply {
        match self.client.ask(prompt::ADVISOR_SYSTEM, req.prompt).await {
            Ok(c) => AdvisorReply::ok(c.content),
            Err(e) => AdvisorReply::failed(e),
        }
    }
}

/// Workload balance, coverage gaps and optimizations over the whole roster.
pub fn optimize_schedule_request<S>(store: &S) -> Result<AdvisorRequest>
where
    S: EmployeeStore + ShiftStore + AssignmentStore + ?Sized,
{
    Ok(AdvisorRequest {
        prompt: prompt::optimize_prompt(
            &store.list_employees()?,
            &store.list_shifts()?,
            &store.list_assignments()?,
        ),
    })
}

/// Suitability of one employee for one shift.
pub fn suggest_assignment_request<S>(
    store: &S,
    employee_id: EmployeeId,
    shift_id: ShiftId,
) -> Result<AdvisorRequest>
where
    S: EmployeeStore + ShiftStore + ?Sized,
{
    let employee = store.get_employee(employee_id)?.ok_or(SchedulerError::NotFound {
        kind: "Employee",
        id: employee_id,
    })?;
    let shift = store.get_shift(shift_id)?.ok_or(SchedulerError::NotFound {
        kind: "Shift",
        id: shift_id,
    })?;
    Ok(AdvisorRequest {
        prompt: prompt::suggestion_prompt(&employee, &shift),
    })
}

/// Patterns across assignment history, each row joined with its shift.
pub fn shift_insights_request<S>(store: &S) -> Result<AdvisorRequest>
where
    S: ShiftStore + AssignmentStore + ?Sized,
{
    let mut history = Vec::new();
    for a in store.list_assignments()? {
        let Some(shift) = store.get_shift(a.shift_id)? else {
            continue;
        };
        history.push(json!({
            "assignment_id": a.id,
            "employee_id": a.employee_id,
            "shift_date": shift.date,
            "shift_type": shift.shift_type,
            "start_time": shift.start_time,
            "end_time": shift.end_time,
        }));
    }
    Ok(AdvisorRequest {
        prompt: prompt::insights_prompt(&history),
    })
}

/// Free-form question answered with headline counts as context.
pub fn chat_request<S>(store: &S, query: &str) -> Result<AdvisorRequest>
where
    S: EmployeeStore + ShiftStore + AssignmentStore + ?Sized,
{
    let context: Value = json!({
        "total_employees": store.list_employees()?.len(),
        "total_shifts": store.list_shifts()?.len(),
        "total_assignments": store.list_assignments()?.len(),
    });
    Ok(AdvisorRequest {
        prompt: prompt::chat_prompt(query, &context),
    })
}
