//! Urgency score for a task that passed filtering.
//!
//! Three additive, independent contributions:
//! - flagged: +100
//! - due-date proximity: overdue +200, within 1 day +150, within 2 days +100,
//!   within 8 days +50 (first matching band only)
//! - estimated duration: <=15 min +30, <=30 min +20, <=60 min +10
//!
//! No other field affects the score. The result depends only on the record and
//! the `now` passed in.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::record::TaskRecord;

pub type UrgencyScore = u32;

const FLAGGED_POINTS: u32 = 100;
const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Due bands as (upper bound in days, points), earliest cutoff first.
const DUE_BANDS: [(f64, u32); 3] = [(1.0, 150), (2.0, 100), (8.0, 50)];
const OVERDUE_POINTS: u32 = 200;

/// Duration bands as (upper bound in minutes, points).
const DURATION_BANDS: [(u32, u32); 3] = [(15, 30), (30, 20), (60, 10)];

/// Per-factor contributions to a score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UrgencyBreakdown {
    pub flagged: u32,
    pub due: u32,
    pub duration: u32,
}

impl UrgencyBreakdown {
    pub fn total(&self) -> UrgencyScore {
        self.flagged + self.due + self.duration
    }
}

/// Score a task against a fixed clock reading.
pub fn score(task: &TaskRecord, now: DateTime<Utc>) -> UrgencyScore {
    breakdown(task, now).total()
}

/// Score a task and keep the individual contributions.
pub fn breakdown(task: &TaskRecord, now: DateTime<Utc>) -> UrgencyBreakdown {
    UrgencyBreakdown {
        flagged: if task.flagged { FLAGGED_POINTS } else { 0 },
        due: task.due.map_or(0, |due| due_points(due, now)),
        duration: task.estimated_minutes.map_or(0, duration_points),
    }
}

fn due_points(due: DateTime<Utc>, now: DateTime<Utc>) -> u32 {
    let days = due.signed_duration_since(now).num_milliseconds() as f64 / MILLIS_PER_DAY;
    if days < 0.0 {
        return OVERDUE_POINTS;
    }
    DUE_BANDS
        .iter()
        .find(|(limit, _)| days <= *limit)
        .map_or(0, |(_, points)| *points)
}

fn duration_points(minutes: u32) -> u32 {
    DURATION_BANDS
        .iter()
        .find(|(limit, _)| minutes <= *limit)
        .map_or(0, |(_, points)| *points)
}
