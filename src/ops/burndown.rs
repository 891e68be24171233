use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::model::record::{Stage, TaskRecord};

/// Cumulative counts up to and including `date`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BurndownPoint {
    pub date: NaiveDate,
    pub total: usize,
    pub done: usize,
    pub remaining: usize,
}

/// Build the cumulative completion series, one point per distinct date,
/// ascending. Dateless records are not counted.
pub fn burndown(records: &[TaskRecord]) -> Vec<BurndownPoint> {
    let mut per_day: BTreeMap<NaiveDate, (usize, usize)> = BTreeMap::new();
    for record in records {
        if let Some(date) = record.occurred_on {
            let bucket = per_day.entry(date).or_default();
            bucket.0 += 1;
            if record.is_done() {
                bucket.1 += 1;
            }
        }
    }

    let mut total = 0;
    let mut done = 0;
    per_day
        .into_iter()
        .map(|(date, (day_total, day_done))| {
            total += day_total;
            done += day_done;
            BurndownPoint {
                date,
                total,
                done,
                remaining: total - done,
            }
        })
        .collect()
}

/// Board-wide counts by stage
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BoardStats {
    pub total: usize,
    pub backlog: usize,
    pub in_progress: usize,
    pub done: usize,
}

impl BoardStats {
    /// Done share of the board, rounded. An empty board reports 0.
    pub fn completion_percent(&self) -> u32 {
        if self.total == 0 {
            return 0;
        }
        ((self.done as f64 / self.total as f64) * 100.0).round() as u32
    }
}

pub fn board_stats(records: &[TaskRecord]) -> BoardStats {
    let mut stats = BoardStats::default();
    for record in records {
        stats.total += 1;
        match record.stage {
            Stage::Backlog => stats.backlog += 1,
            Stage::InProgress => stats.in_progress += 1,
            Stage::Done => stats.done += 1,
        }
    }
    stats
}
