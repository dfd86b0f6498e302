//! Deterministic schedulers used when the AI path yields nothing usable.

use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::Days;
use shiftdesk_core::types::{Assignment, Employee, EmployeeId, Shift, ShiftId, TimeSlot};

use crate::types::{ProposedAssignment, ScheduleWindow};

/// Greedy, conflict-free fill of the window's unassigned shifts.
///
/// Pending shifts are taken in `(date, start_time, id)` order; each goes to
/// the first employee by `(workload, id)` whose schedule has no overlapping
/// slot. A shift nobody can take is skipped. Workload and schedules start
/// from `assignments` and are updated after every pick.
pub fn balanced_fallback(
    employees: &[Employee],
    shifts: &[Shift],
    assignments: &[Assignment],
    window: ScheduleWindow,
) -> Vec<ProposedAssignment> {
    let slots: HashMap<ShiftId, TimeSlot> = shifts.iter().map(|s| (s.id, s.slot())).collect();

    let mut workload: BTreeMap<EmployeeId, usize> =
        employees.iter().map(|e| (e.id, 0)).collect();
    let mut schedules: HashMap<EmployeeId, Vec<TimeSlot>> = HashMap::new();
    let mut assigned: HashSet<ShiftId> = HashSet::new();

    for a in assignments {
        assigned.insert(a.shift_id);
        if let Some(load) = workload.get_mut(&a.employee_id) {
            *load += 1;
        }
        if let Some(slot) = slots.get(&a.shift_id) {
            schedules.entry(a.employee_id).or_default().push(*slot);
        }
    }

    let mut pending: Vec<&Shift> = shifts
        .iter()
        .filter(|s| window.contains(s.date) && !assigned.contains(&s.id))
        .collect();
    pending.sort_by_key(|s| (s.date, s.start_time, s.id));

    let mut proposals = Vec::new();
    for shift in pending {
        let slot = shift.slot();
        let mut candidates: Vec<(usize, EmployeeId)> =
            workload.iter().map(|(id, load)| (*load, *id)).collect();
        candidates.sort_unstable();

        let pick = candidates.into_iter().map(|(_, id)| id).find(|id| {
            !schedules
                .get(id)
                .is_some_and(|held| held.iter().any(|h| h.overlaps(&slot)))
        });
        let Some(employee_id) = pick else {
            continue;
        };

        *workload.entry(employee_id).or_default() += 1;
        schedules.entry(employee_id).or_default().push(slot);
        proposals.push(ProposedAssignment {
            shift_id: shift.id,
            employee_id,
            reason: format!(
                "Lowest workload without overlapping shifts ({} assigned)",
                workload[&employee_id]
            ),
        });
    }
    proposals
}

/// Reuse last week's staffing for the window's shifts.
///
/// The source of a target shift is its clone-map entry, or failing that the
/// shift with the same name exactly seven days earlier (before the window).
/// Each target gets the employee holding the source's lowest-id assignment,
/// unless that employee already holds the target.
pub fn copy_forward(
    shifts: &[Shift],
    assignments: &[Assignment],
    window: ScheduleWindow,
    clone_map: &BTreeMap<ShiftId, ShiftId>,
) -> Vec<ProposedAssignment> {
    let by_id: HashMap<ShiftId, &Shift> = shifts.iter().map(|s| (s.id, s)).collect();
    let by_key: HashMap<(chrono::NaiveDate, &str), &Shift> = shifts
        .iter()
        .filter(|s| s.date < window.start)
        .map(|s| ((s.date, s.name.as_str()), s))
        .collect();

    let mut holder: HashMap<ShiftId, EmployeeId> = HashMap::new();
    let mut existing: HashSet<(EmployeeId, ShiftId)> = HashSet::new();
    let mut ordered: Vec<&Assignment> = assignments.iter().collect();
    ordered.sort_by_key(|a| a.id);
    for a in ordered {
        holder.entry(a.shift_id).or_insert(a.employee_id);
        existing.insert((a.employee_id, a.shift_id));
    }

    let mut targets: Vec<&Shift> = shifts.iter().filter(|s| window.contains(s.date)).collect();
    targets.sort_by_key(|s| (s.date, s.start_time, s.id));

    let mut proposals = Vec::new();
    for target in targets {
        let source = clone_map
            .get(&target.id)
            .and_then(|id| by_id.get(id).copied())
            .or_else(|| {
                let prev = target.date.checked_sub_days(Days::new(7))?;
                by_key.get(&(prev, target.name.as_str())).copied()
            });
        let Some(source) = source else {
            continue;
        };
        let Some(&employee_id) = holder.get(&source.id) else {
            continue;
        };
        if existing.contains(&(employee_id, target.id)) {
            continue;
        }
        proposals.push(ProposedAssignment {
            shift_id: target.id,
            employee_id,
            reason: format!("Copied from {} on {}", source.name, source.date),
        });
    }
    proposals
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};
    use shiftdesk_core::types::ShiftType;

    fn emp(id: i64) -> Employee {
        Employee {
            id,
            first_name: format!("E{id}"),
            last_name: "Test".into(),
            email: format!("e{id}@example.com"),
            phone: None,
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            department_id: None,
            avatar_url: None,
        }
    }

    fn shift(id: i64, name: &str, day: u32, from: u32, to: u32) -> Shift {
        Shift {
            id,
            name: name.into(),
            date: NaiveDate::from_ymd_opt(2025, 3, day).unwrap(),
            start_time: NaiveTime::from_hms_opt(from, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(to, 0, 0).unwrap(),
            shift_type: ShiftType::Morning,
        }
    }

    fn week_of(day: u32) -> ScheduleWindow {
        let start = NaiveDate::from_ymd_opt(2025, 3, day).unwrap();
        ScheduleWindow {
            start,
            end: start + Days::new(6),
        }
    }

    #[test]
    fn fallback_skips_assigned_and_out_of_window_shifts() {
        let shifts = vec![
            shift(1, "Mon", 10, 9, 17),
            shift(2, "Tue", 11, 9, 17),
            shift(3, "Old", 3, 9, 17),
        ];
        let assignments = vec![Assignment {
            id: 1,
            employee_id: 1,
            shift_id: 1,
        }];
        let out = balanced_fallback(&[emp(1), emp(2)], &shifts, &assignments, week_of(10));
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].shift_id, 2);
        assert_eq!(out[0].employee_id, 2);
    }

    #[test]
    fn fallback_routes_around_overlaps() {
        // same employee would be lowest load for both, but they overlap
        let shifts = vec![shift(1, "Early", 10, 9, 17), shift(2, "Mid", 10, 12, 20)];
        let out = balanced_fallback(&[emp(1)], &shifts, &[], week_of(10));
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].shift_id, 1);

        let out = balanced_fallback(&[emp(1), emp(2)], &shifts, &[], week_of(10));
        assert_eq!(
            out.iter().map(|p| p.employee_id).collect::<Vec<_>>(),
            vec![1, 2]
        );
    }

    #[test]
    fn fallback_processes_shifts_chronologically() {
        let shifts = vec![shift(5, "Late", 12, 9, 17), shift(9, "Early", 10, 9, 17)];
        let out = balanced_fallback(&[emp(1), emp(2)], &shifts, &[], week_of(10));
        assert_eq!(out[0].shift_id, 9);
        assert_eq!(out[0].employee_id, 1);
        assert_eq!(out[1].employee_id, 2);
    }

    #[test]
    fn copy_forward_uses_clone_map_then_name_and_date() {
        let shifts = vec![
            shift(1, "Morning", 3, 9, 17),
            shift(2, "Evening", 4, 17, 23),
            shift(10, "Morning", 10, 9, 17),
            shift(11, "Evening", 11, 17, 23),
        ];
        let assignments = vec![
            Assignment {
                id: 1,
                employee_id: 7,
                shift_id: 1,
            },
            Assignment {
                id: 2,
                employee_id: 8,
                shift_id: 2,
            },
        ];
        let clone_map = BTreeMap::from([(10, 1)]);
        let out = copy_forward(&shifts, &assignments, week_of(10), &clone_map);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].employee_id, 7);
        assert_eq!(out[0].reason, "Copied from Morning on 2025-03-03");
        assert_eq!(out[1].shift_id, 11);
        assert_eq!(out[1].employee_id, 8);
    }

    #[test]
    fn copy_forward_without_source_staff_is_empty() {
        let shifts = vec![shift(1, "Morning", 3, 9, 17), shift(10, "Morning", 10, 9, 17)];
        let out = copy_forward(&shifts, &[], week_of(10), &BTreeMap::from([(10, 1)]));
        assert!(out.is_empty());
    }
}
