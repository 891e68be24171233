use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};

use crate::model::record::TaskRecord;

/// Records indexed by the day they were logged, days ascending
pub type CalendarIndex<'a> = BTreeMap<NaiveDate, Vec<&'a TaskRecord>>;

/// Group records by `occurred_on`. Dateless records are left out; within a
/// day, input order is kept.
pub fn group_by_date<'a>(records: impl IntoIterator<Item = &'a TaskRecord>) -> CalendarIndex<'a> {
    let mut index: CalendarIndex<'a> = BTreeMap::new();
    for record in records {
        if let Some(date) = record.occurred_on {
            index.entry(date).or_default().push(record);
        }
    }
    index
}

/// One calendar month laid out in Sunday-first weeks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthGrid {
    pub year: i32,
    pub month: u32,
    /// Day-of-month numbers; `None` pads the first and last week
    pub weeks: Vec<[Option<u32>; 7]>,
}

impl MonthGrid {
    pub fn date(&self, day: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, day)
    }
}

/// Number of days in the given month, or `None` for an invalid month.
pub fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    u32::try_from((next - first).num_days()).ok()
}

/// Build the grid for a month. Returns `None` for an invalid month.
pub fn month_grid(year: i32, month: u32) -> Option<MonthGrid> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let total = days_in_month(year, month)?;
    let lead = first.weekday().num_days_from_sunday() as usize;

    let mut weeks = Vec::new();
    let mut week = [None; 7];
    let mut slot = lead;
    for day in 1..=total {
        week[slot] = Some(day);
        slot += 1;
        if slot == 7 {
            weeks.push(week);
            week = [None; 7];
            slot = 0;
        }
    }
    if slot > 0 {
        weeks.push(week);
    }

    Some(MonthGrid { year, month, weeks })
}
