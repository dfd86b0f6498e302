//! Auto-balancer: fills every shift that has no assignment, always giving
//! the next shift to the least-loaded employee.

use std::collections::{BTreeMap, HashMap, HashSet};

use shiftdesk_core::types::{EmployeeId, ShiftId, TimeSlot};
use shiftdesk_store::{AssignmentStore, EmployeeStore, ShiftStore};
use tracing::{debug, info};

use crate::error::AssignmentError;
use crate::types::{BalanceMode, BalanceReport};

/// Assign every unfilled shift, in shift id order, to the employee with the
/// lowest workload (ties broken by lowest employee id).
///
/// In [`BalanceMode::Strict`] candidates whose schedule (existing or built
/// earlier in this pass) overlaps the shift are skipped, and a shift nobody
/// can take stays unfilled.
pub fn auto_balance<S>(store: &S, mode: BalanceMode) -> Result<BalanceReport, AssignmentError>
where
    S: EmployeeStore + ShiftStore + AssignmentStore + ?Sized,
{
    let employees = store.list_employees()?;
    let shifts = store.list_shifts()?;
    if employees.is_empty() || shifts.is_empty() {
        return Ok(BalanceReport { created: 0 });
    }

    let slots: HashMap<ShiftId, TimeSlot> = shifts.iter().map(|s| (s.id, s.slot())).collect();

    let mut workload: BTreeMap<EmployeeId, usize> =
        employees.iter().map(|e| (e.id, 0)).collect();
    let mut schedules: HashMap<EmployeeId, Vec<TimeSlot>> = HashMap::new();
    let mut filled: HashSet<ShiftId> = HashSet::new();

    for a in store.list_assignments()? {
        filled.insert(a.shift_id);
        if let Some(load) = workload.get_mut(&a.employee_id) {
            *load += 1;
        }
        if let Some(slot) = slots.get(&a.shift_id) {
            schedules.entry(a.employee_id).or_default().push(*slot);
        }
    }

    let mut created = 0;
    for shift in shifts.iter().filter(|s| !filled.contains(&s.id)) {
        let slot = shift.slot();
        let pick = workload
            .iter()
            .filter(|(id, _)| {
                mode == BalanceMode::Lenient
                    || !schedules
                        .get(*id)
                        .is_some_and(|held| held.iter().any(|h| h.overlaps(&slot)))
            })
            .min_by_key(|(id, load)| (**load, **id))
            .map(|(id, _)| *id);

        let Some(employee_id) = pick else {
            debug!(shift_id = shift.id, "no conflict-free employee, shift left unfilled");
            continue;
        };

        store.create_assignment(employee_id, shift.id)?;
        *workload.entry(employee_id).or_default() += 1;
        schedules.entry(employee_id).or_default().push(slot);
        created += 1;
    }

    info!(created, ?mode, "auto-balance complete");
    Ok(BalanceReport { created })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{employee, seed_shift, TestDb};

    #[test]
    fn three_employees_three_shifts_one_each() {
        let db = TestDb::new();
        let report = db.run(|s| {
            for n in 1..=3 {
                s.create_employee(&employee(n))?;
            }
            seed_shift(s, "A", 3, (9, 17))?;
            seed_shift(s, "B", 4, (9, 17))?;
            seed_shift(s, "C", 5, (9, 17))?;
            auto_balance(s, BalanceMode::Lenient)
        });
        assert_eq!(report.created, 3);

        let owners: Vec<_> = db
            .run(|s| Ok(s.list_assignments()?))
            .into_iter()
            .map(|a| a.employee_id)
            .collect();
        assert_eq!(owners, vec![1, 2, 3]);
    }

    #[test]
    fn nothing_to_do_without_employees_or_shifts() {
        let db = TestDb::new();
        let report = db.run(|s| {
            seed_shift(s, "A", 3, (9, 17))?;
            auto_balance(s, BalanceMode::Lenient)
        });
        assert_eq!(report.created, 0);

        let db = TestDb::new();
        let report = db.run(|s| {
            s.create_employee(&employee(1))?;
            auto_balance(s, BalanceMode::Strict)
        });
        assert_eq!(report.created, 0);
    }

    #[test]
    fn workload_spread_is_at_most_one() {
        let db = TestDb::new();
        db.run(|s| {
            for n in 1..=3 {
                s.create_employee(&employee(n))?;
            }
            for day in 1..=8 {
                seed_shift(s, "Day", day, (9, 17))?;
            }
            auto_balance(s, BalanceMode::Lenient)
        });
        let assignments = db.run(|s| Ok(s.list_assignments()?));
        let mut counts: BTreeMap<EmployeeId, usize> = BTreeMap::new();
        for a in &assignments {
            *counts.entry(a.employee_id).or_default() += 1;
        }
        let max = counts.values().max().copied().unwrap_or(0);
        let min = counts.values().min().copied().unwrap_or(0);
        assert_eq!(assignments.len(), 8);
        assert!(max - min <= 1, "{counts:?}");
    }

    #[test]
    fn existing_load_is_respected() {
        let db = TestDb::new();
        let report = db.run(|s| {
            let busy = s.create_employee(&employee(1))?;
            s.create_employee(&employee(2))?;
            let taken = seed_shift(s, "A", 3, (9, 17))?;
            s.create_assignment(busy.id, taken.id)?;
            seed_shift(s, "B", 4, (9, 17))?;
            auto_balance(s, BalanceMode::Lenient)
        });
        assert_eq!(report.created, 1);
        let last = db.run(|s| Ok(s.list_assignments()?)).pop().unwrap();
        assert_eq!(last.employee_id, 2);
    }

    #[test]
    fn lenient_mode_ignores_overlap_but_strict_does_not() {
        let seed = |s: &shiftdesk_store::SqliteStore<'_>| -> Result<(), AssignmentError> {
            s.create_employee(&employee(1))?;
            seed_shift(s, "Early", 3, (9, 17))?;
            seed_shift(s, "Late", 3, (12, 20))?;
            Ok(())
        };

        let lenient = TestDb::new();
        let report = lenient.run(|s| {
            seed(s)?;
            auto_balance(s, BalanceMode::Lenient)
        });
        assert_eq!(report.created, 2);

        let strict = TestDb::new();
        let report = strict.run(|s| {
            seed(s)?;
            auto_balance(s, BalanceMode::Strict)
        });
        assert_eq!(report.created, 1);
    }
}
