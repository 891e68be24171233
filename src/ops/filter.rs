use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDateTime, NaiveTime, TimeDelta};

use crate::model::record::{Classification, Stage, TaskRecord};

/// Default archive window in days
pub const ARCHIVE_DAYS: i64 = 7;

/// A selector that either passes everything or one exact value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Select<T> {
    All,
    Only(T),
}

impl<T: PartialEq> Select<T> {
    pub fn matches(&self, value: &T) -> bool {
        match self {
            Select::All => true,
            Select::Only(wanted) => wanted == value,
        }
    }
}

impl<T: FromStr<Err = String>> FromStr for Select<T> {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "all" {
            Ok(Select::All)
        } else {
            s.parse().map(Select::Only)
        }
    }
}

impl<T: fmt::Display> fmt::Display for Select<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Select::All => f.write_str("all"),
            Select::Only(v) => write!(f, "{}", v),
        }
    }
}

/// Parameters of the board's search/filter bar
#[derive(Debug, Clone)]
pub struct FilterParams {
    /// Case-insensitive substring of title or description; empty matches all
    pub search: String,
    pub stage: Select<Stage>,
    pub classification: Select<Classification>,
    pub show_archived: bool,
    pub archive_days: i64,
}

impl Default for FilterParams {
    fn default() -> Self {
        FilterParams {
            search: String::new(),
            stage: Select::All,
            classification: Select::All,
            show_archived: false,
            archive_days: ARCHIVE_DAYS,
        }
    }
}

/// Whether a done record has aged out of the default view. The record's own
/// date is the reference point; dateless records never archive.
pub fn is_archived(record: &TaskRecord, now: NaiveDateTime, archive_days: i64) -> bool {
    if record.stage != Stage::Done {
        return false;
    }
    let Some(date) = record.occurred_on else {
        return false;
    };
    // A window too wide to represent reaches past any date: never archived
    let Some(cutoff) = TimeDelta::try_days(archive_days).and_then(|d| now.checked_sub_signed(d)) else {
        return false;
    };
    date.and_time(NaiveTime::MIN) < cutoff
}

fn matches_search(record: &TaskRecord, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    record.title.to_lowercase().contains(needle)
        || record
            .description
            .as_deref()
            .is_some_and(|d| d.to_lowercase().contains(needle))
}

/// Return the records passing every active filter, in input order.
pub fn filter_records<'a>(
    records: &'a [TaskRecord],
    params: &FilterParams,
    now: NaiveDateTime,
) -> Vec<&'a TaskRecord> {
    let needle = params.search.to_lowercase();
    records
        .iter()
        .filter(|r| matches_search(r, &needle))
        .filter(|r| params.stage.matches(&r.stage))
        .filter(|r| params.classification.matches(&r.classification))
        .filter(|r| params.show_archived || !is_archived(r, now, params.archive_days))
        .collect()
}
