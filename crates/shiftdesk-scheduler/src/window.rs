use std::collections::BTreeMap;

use chrono::{Datelike, Days, NaiveDate};
use shiftdesk_core::types::{NewShift, Shift, ShiftId};
use shiftdesk_store::{ShiftStore, StoreError};
use tracing::info;

use crate::error::{Result, SchedulerError};
use crate::types::ScheduleWindow;

pub const MIN_WEEKS: i64 = 1;
pub const MAX_WEEKS: i64 = 4;

pub fn clamp_weeks(weeks: i64) -> i64 {
    weeks.clamp(MIN_WEEKS, MAX_WEEKS)
}

/// The first Monday strictly after `today` (a Monday maps to the next one).
pub fn next_monday(today: NaiveDate) -> Option<NaiveDate> {
    let ahead = 7 - u64::from(today.weekday().num_days_from_monday());
    today.checked_add_days(Days::new(ahead))
}

/// Resolve the planning window: `start` (or the next Monday) through
/// `start + weeks*7 - 1`, with `weeks` clamped to `[1, 4]`. Fails when the
/// window would run past the last representable date.
pub fn resolve_window(
    weeks: i64,
    start: Option<NaiveDate>,
    today: NaiveDate,
) -> Result<ScheduleWindow> {
    let weeks = clamp_weeks(weeks) as u64;
    let start = match start {
        Some(start) => start,
        None => next_monday(today).ok_or_else(|| out_of_range(today))?,
    };
    let end = start
        .checked_add_days(Days::new(weeks * 7 - 1))
        .ok_or_else(|| out_of_range(start))?;
    Ok(ScheduleWindow { start, end })
}

fn out_of_range(date: NaiveDate) -> SchedulerError {
    SchedulerError::InvalidWindow(format!("a schedule starting {date} runs past the calendar"))
}

/// Make sure the window has shifts to plan against.
///
/// When the window already holds shifts they are returned untouched with an
/// empty clone map. Otherwise every shift of the previous period
/// (`window - 7 days`) is recreated seven days later; the returned map goes
/// from each new shift id to the id it was copied from.
pub fn ensure_week_shifts<S>(
    store: &S,
    window: ScheduleWindow,
) -> std::result::Result<(Vec<Shift>, BTreeMap<ShiftId, ShiftId>), StoreError>
where
    S: ShiftStore + ?Sized,
{
    let all = store.list_shifts()?;
    let mut target: Vec<Shift> = all
        .iter()
        .filter(|s| window.contains(s.date))
        .cloned()
        .collect();
    let mut clone_map = BTreeMap::new();
    if !target.is_empty() {
        sort_chronologically(&mut target);
        return Ok((target, clone_map));
    }

    let Some(source_window) = window.shifted_back(7) else {
        return Ok((target, clone_map));
    };

    let mut sources: Vec<&Shift> = all
        .iter()
        .filter(|s| source_window.contains(s.date))
        .collect();
    sources.sort_by_key(|s| (s.date, s.start_time, s.id));

    for source in sources {
        let date = source.date + Days::new(7);
        let clone = store.create_shift(&NewShift::cloned_from(source, date))?;
        clone_map.insert(clone.id, source.id);
        target.push(clone);
    }

    if !clone_map.is_empty() {
        info!(
            cloned = clone_map.len(),
            start = %window.start,
            end = %window.end,
            "copied previous week's shifts into empty window"
        );
    }
    sort_chronologically(&mut target);
    Ok((target, clone_map))
}

pub(crate) fn sort_chronologically(shifts: &mut [Shift]) {
    shifts.sort_by_key(|s| (s.date, s.start_time, s.id));
}
