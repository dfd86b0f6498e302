//! Prompt text for every AI call the scheduler makes.

use serde_json::{json, Value};
use shiftdesk_core::types::{Assignment, Employee, Shift};

use crate::types::ScheduleWindow;

pub const SCHEDULE_SYSTEM: &str = "You are a workforce scheduling assistant. \
Reply with a single JSON object and nothing else.";

pub const ADVISOR_SYSTEM: &str = "You are an expert workforce management assistant \
helping a shift manager.";

pub fn employee_json(e: &Employee) -> Value {
    json!({
        "id": e.id,
        "name": e.full_name(),
        "email": e.email,
        "phone": e.phone,
        "department_id": e.department_id,
    })
}

pub fn shift_json(s: &Shift) -> Value {
    json!({
        "id": s.id,
        "name": s.name,
        "date": s.date,
        "start_time": s.start_time,
        "end_time": s.end_time,
        "shift_type": s.shift_type,
    })
}

pub fn assignment_json(a: &Assignment) -> Value {
    json!({
        "id": a.id,
        "employee_id": a.employee_id,
        "shift_id": a.shift_id,
    })
}

fn list<T>(items: &[T], f: impl Fn(&T) -> Value) -> String {
    Value::Array(items.iter().map(f).collect()).to_string()
}

pub fn schedule_prompt(
    window: ScheduleWindow,
    employees: &[Employee],
    window_shifts: &[Shift],
    assignments: &[Assignment],
) -> String {
    format!(
        "Build a staffing plan for {start} through {end}.\n\n\
         Employees: {employees}\n\
         Shifts to staff: {shifts}\n\
         Existing assignments: {assignments}\n\n\
         Rules:\n\
         - Only use the shift ids and employee ids listed above.\n\
         - Never give one employee two shifts that overlap on the same date.\n\
         - Spread the work evenly, counting existing assignments.\n\n\
         Respond with JSON of the form \
         {{\"summary\": string, \"assignments\": \
         [{{\"shift_id\": int, \"employee_id\": int, \"reason\": string}}]}}.",
        start = window.start,
        end = window.end,
        employees = list(employees, employee_json),
        shifts = list(window_shifts, shift_json),
        assignments = list(assignments, assignment_json),
    )
}

pub fn optimize_prompt(employees: &[Employee], shifts: &[Shift], assignments: &[Assignment]) -> String {
    format!(
        "Analyze this shift schedule and recommend improvements.\n\n\
         Employees: {}\nShifts: {}\nCurrent assignments: {}\n\n\
         Cover workload balance, coverage gaps, concrete optimizations and \
         fairness. Format the answer as JSON with keys: workload_analysis, \
         coverage_gaps, optimizations, fairness_score.",
        list(employees, employee_json),
        list(shifts, shift_json),
        list(assignments, assignment_json),
    )
}

pub fn suggestion_prompt(employee: &Employee, shift: &Shift) -> String {
    format!(
        "Assess whether this employee suits this shift.\n\n\
         Employee: {}\nShift: {}\n\n\
         Give a suitability score (1-10), recommended shift types, potential \
         conflicts or concerns, and alternatives. Format the answer as JSON \
         with keys: suitability_score, recommended_shifts, concerns, alternatives.",
        employee_json(employee),
        shift_json(shift),
    )
}

pub fn insights_prompt(history: &[Value]) -> String {
    format!(
        "Analyze this shift assignment history and provide business insights.\n\n\
         History: {}\n\n\
         Cover peak periods, staffing patterns, cost optimization and \
         predictions. Format the answer as JSON with keys: peak_analysis, \
         performance_patterns, cost_optimization, predictions.",
        Value::Array(history.to_vec()),
    )
}

pub fn chat_prompt(query: &str, context: &Value) -> String {
    format!(
        "Answer the manager's question using the system context.\n\n\
         Question: {query}\nSystem context: {context}\n\n\
         Keep the answer about shift management, scheduling or workforce \
         planning."
    )
}
