//! Validation of the free-form text an LLM returns for a schedule request.
//!
//! The reply is treated as untyped JSON and checked field by field; nothing
//! the model says is trusted until it has been matched against the window's
//! shifts and the known employees.

use std::collections::HashSet;

use serde_json::Value;
use shiftdesk_core::types::{EmployeeId, ShiftId};

use crate::types::ProposedAssignment;

const DEFAULT_REASON: &str = "Suggested by AI";

#[derive(Debug, Default)]
pub struct ParsedSuggestions {
    pub summary: Option<String>,
    pub assignments: Vec<ProposedAssignment>,
    pub warnings: Vec<String>,
}

/// Pull the first JSON object out of `text`, tolerating markdown code fences
/// and prose around it.
pub fn extract_json_object(text: &str) -> Option<Value> {
    let trimmed = text.trim();
    if let Ok(v @ Value::Object(_)) = serde_json::from_str::<Value>(trimmed) {
        return Some(v);
    }
    let start = trimmed.find('{')?;
    let end = trimmed.rfind('}')?;
    if end <= start {
        return None;
    }
    match serde_json::from_str::<Value>(&trimmed[start..=end]) {
        Ok(v @ Value::Object(_)) => Some(v),
        _ => None,
    }
}

/// Integer ids may arrive as numbers (`12`, `12.0`) or numeric strings.
pub fn coerce_id(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && f.is_finite())
                .map(|f| f as i64)
        }),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Parse the model's reply into proposals.
///
/// Entries missing either id are dropped silently; entries for shifts
/// outside `window_shifts` or for employees not in `employees` are dropped
/// and counted in a warning. Errors only when no JSON object can be found.
pub fn parse_suggestions(
    text: &str,
    window_shifts: &HashSet<ShiftId>,
    employees: &HashSet<EmployeeId>,
) -> Result<ParsedSuggestions, String> {
    let root = extract_json_object(text)
        .ok_or_else(|| "AI response did not contain a JSON object".to_string())?;

    let summary = root
        .get("summary")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from);

    let entries = root
        .get("assignments")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();

    let mut seen = HashSet::new();
    let mut assignments = Vec::new();
    let mut outside_window = 0usize;
    let mut unknown_employee = 0usize;

    for entry in entries {
        let (Some(shift_id), Some(employee_id)) = (
            entry.get("shift_id").and_then(coerce_id),
            entry.get("employee_id").and_then(coerce_id),
        ) else {
            continue;
        };
        if !window_shifts.contains(&shift_id) {
            outside_window += 1;
            continue;
        }
        if !employees.contains(&employee_id) {
            unknown_employee += 1;
            continue;
        }
        if !seen.insert((shift_id, employee_id)) {
            continue;
        }
        let reason = entry
            .get("reason")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_REASON)
            .to_string();
        assignments.push(ProposedAssignment {
            shift_id,
            employee_id,
            reason,
        });
    }

    let mut warnings = Vec::new();
    if outside_window > 0 {
        warnings.push(format!(
            "Ignored {outside_window} AI suggestion(s) for shifts outside the requested window."
        ));
    }
    if unknown_employee > 0 {
        warnings.push(format!(
            "Ignored {unknown_employee} AI suggestion(s) naming unknown employees."
        ));
    }

    Ok(ParsedSuggestions {
        summary,
        assignments,
        warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ids(v: &[i64]) -> HashSet<i64> {
        v.iter().copied().collect()
    }

    #[test]
    fn fenced_reply_is_accepted() {
        let text = "Here you go:\n```json\n{\"summary\": \"ok\", \"assignments\": []}\n```";
        let v = extract_json_object(text).unwrap();
        assert_eq!(v["summary"], "ok");
    }

    #[test]
    fn prose_without_json_is_rejected() {
        assert!(extract_json_object("I cannot help with that.").is_none());
        assert!(parse_suggestions("[1, 2]", &ids(&[]), &ids(&[])).is_err());
    }

    #[test]
    fn ids_are_coerced() {
        assert_eq!(coerce_id(&json!(7)), Some(7));
        assert_eq!(coerce_id(&json!(7.0)), Some(7));
        assert_eq!(coerce_id(&json!(" 12 ")), Some(12));
        assert_eq!(coerce_id(&json!(7.5)), None);
        assert_eq!(coerce_id(&json!("seven")), None);
        assert_eq!(coerce_id(&json!(null)), None);
    }

    #[test]
    fn invalid_entries_are_filtered_with_warnings() {
        let text = json!({
            "summary": "Balanced week",
            "assignments": [
                { "shift_id": "10", "employee_id": 1, "reason": "fresh" },
                { "shift_id": 10, "employee_id": 1 },
                { "shift_id": 99, "employee_id": 1 },
                { "shift_id": 11, "employee_id": 42 },
                { "shift_id": 11 },
                { "employee_id": 2 },
                { "shift_id": 11, "employee_id": "2" }
            ]
        })
        .to_string();

        let parsed = parse_suggestions(&text, &ids(&[10, 11]), &ids(&[1, 2])).unwrap();
        assert_eq!(parsed.summary.as_deref(), Some("Balanced week"));
        assert_eq!(
            parsed.assignments,
            vec![
                ProposedAssignment {
                    shift_id: 10,
                    employee_id: 1,
                    reason: "fresh".into()
                },
                ProposedAssignment {
                    shift_id: 11,
                    employee_id: 2,
                    reason: DEFAULT_REASON.into()
                },
            ]
        );
        assert_eq!(parsed.warnings.len(), 2);
        assert!(parsed.warnings[0].contains("outside the requested window"));
    }
}
