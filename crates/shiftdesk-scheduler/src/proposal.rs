//! Schedule proposal generation.
//!
//! Runs in two phases so the store lock is never held across the AI call:
//! [`prepare_snapshot`] resolves the window, fills an empty window from the
//! previous week and loads everything the planners need inside one
//! transaction; [`ProposalGenerator::propose`] then works on that snapshot
//! alone. AI first, then the balancing heuristic, then copy-forward.

use std::collections::{BTreeMap, HashSet};

use chrono::NaiveDate;
use shiftdesk_core::types::{Assignment, Employee, Shift, ShiftId};
use shiftdesk_store::{AssignmentStore, EmployeeStore, ShiftStore};
use tracing::{info, warn};

use crate::ai_response::parse_suggestions;
use crate::client::AiClient;
use crate::error::Result;
use crate::fallback::{balanced_fallback, copy_forward};
use crate::prompt::{schedule_prompt, SCHEDULE_SYSTEM};
use crate::types::{ProposalSource, ProposedAssignment, ScheduleProposal, ScheduleRequest, ScheduleWindow};
use crate::window::{ensure_week_shifts, resolve_window};

pub const COPY_FORWARD_NOTE: &str =
    "Shift templates copied from the previous week to build the requested window.";

/// Everything a proposal is computed from, captured in one transaction.
#[derive(Debug, Clone)]
pub struct PlanningSnapshot {
    pub window: ScheduleWindow,
    pub employees: Vec<Employee>,
    /// All shifts, including any clones created for the window.
    pub shifts: Vec<Shift>,
    /// Shifts inside the window in `(date, start_time, id)` order.
    pub window_shifts: Vec<Shift>,
    pub assignments: Vec<Assignment>,
    pub clone_map: BTreeMap<ShiftId, ShiftId>,
}

/// Resolve the window and load the snapshot. Clones created for an empty
/// window are persisted with the surrounding transaction.
pub fn prepare_snapshot<S>(
    store: &S,
    req: &ScheduleRequest,
    today: NaiveDate,
) -> Result<PlanningSnapshot>
where
    S: EmployeeStore + ShiftStore + AssignmentStore + ?Sized,
{
    let window = resolve_window(req.weeks, req.start_date, today)?;
    let (window_shifts, clone_map) = ensure_week_shifts(store, window)?;
    Ok(PlanningSnapshot {
        window,
        employees: store.list_employees()?,
        shifts: store.list_shifts()?,
        window_shifts,
        assignments: store.list_assignments()?,
        clone_map,
    })
}

pub struct ProposalGenerator {
    client: AiClient,
}

impl ProposalGenerator {
    pub fn new(client: AiClient) -> Self {
        Self { client }
    }

    pub fn is_configured(&self) -> bool {
        self.client.is_configured()
    }

    pub async fn propose(&self, snap: &PlanningSnapshot) -> ScheduleProposal {
        let mut proposal = ScheduleProposal {
            success: false,
            summary: String::new(),
            proposed_assignments: Vec::new(),
            raw_response: None,
            ai_error: None,
            window: snap.window,
            source: ProposalSource::None,
            warnings: Vec::new(),
            cloned_shifts: snap.clone_map.clone(),
        };

        if snap.window_shifts.is_empty() {
            proposal.summary = "No shifts exist in the requested window.".to_string();
            return proposal;
        }

        let ai_summary = self.try_ai(snap, &mut proposal).await;
        if !proposal.proposed_assignments.is_empty() {
            let n = proposal.proposed_assignments.len();
            proposal.success = true;
            proposal.source = ProposalSource::Ai;
            proposal.summary = ai_summary.unwrap_or_else(|| format!("AI proposed {n} assignment(s)."));
            return finish(proposal);
        }

        let fallback = balanced_fallback(
            &snap.employees,
            &snap.shifts,
            &snap.assignments,
            snap.window,
        );
        if !fallback.is_empty() {
            proposal.summary = format!(
                "Proposed {} assignment(s) with the built-in workload balancer.",
                fallback.len()
            );
            return finish(accept(proposal, fallback, ProposalSource::Fallback));
        }

        if !snap.clone_map.is_empty() {
            let copied = copy_forward(&snap.shifts, &snap.assignments, snap.window, &snap.clone_map);
            if !copied.is_empty() {
                proposal.summary = match ai_summary {
                    Some(s) => format!("{s} {COPY_FORWARD_NOTE}"),
                    None => COPY_FORWARD_NOTE.to_string(),
                };
                return finish(accept(proposal, copied, ProposalSource::CopyForward));
            }
        }

        proposal.summary = "No assignments could be proposed for the requested window.".to_string();
        finish(proposal)
    }

    /// Ask the provider and keep whatever valid suggestions come back.
    /// Returns the model's summary, if it gave one.
    async fn try_ai(&self, snap: &PlanningSnapshot, out: &mut ScheduleProposal) -> Option<String> {
        let prompt = schedule_prompt(
            snap.window,
            &snap.employees,
            &snap.window_shifts,
            &snap.assignments,
        );
        let completion = match self.client.ask(SCHEDULE_SYSTEM, prompt).await {
            Ok(c) => c,
            Err(e) => {
                out.ai_error = Some(e);
                return None;
            }
        };

        let window_ids: HashSet<ShiftId> = snap.window_shifts.iter().map(|s| s.id).collect();
        let employee_ids: HashSet<_> = snap.employees.iter().map(|e| e.id).collect();
        let parsed = parse_suggestions(&completion.content, &window_ids, &employee_ids);
        out.raw_response = Some(completion.content);

        match parsed {
            Ok(parsed) => {
                for w in &parsed.warnings {
                    warn!(warning = %w, "AI suggestions filtered");
                }
                out.warnings.extend(parsed.warnings);
                out.proposed_assignments = parsed.assignments;
                parsed.summary
            }
            Err(e) => {
                warn!(err = %e, "AI response unusable");
                out.ai_error = Some(e);
                None
            }
        }
    }
}

fn accept(
    mut proposal: ScheduleProposal,
    assignments: Vec<ProposedAssignment>,
    source: ProposalSource,
) -> ScheduleProposal {
    proposal.success = true;
    proposal.source = source;
    proposal.proposed_assignments = assignments;
    proposal
}

fn finish(proposal: ScheduleProposal) -> ScheduleProposal {
    info!(
        source = ?proposal.source,
        proposed = proposal.proposed_assignments.len(),
        start = %proposal.window.start,
        end = %proposal.window.end,
        "schedule proposal ready"
    );
    proposal
}
