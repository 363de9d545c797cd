//! Grouped practice totals and percentage breakdowns

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::Serialize;

use super::{
    format::format_duration,
    range::{date_range_for, filter_by_range, DateRange, RangeKind},
};
use crate::models::PracticeSession;

/// Summed seconds for one label
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupTotal {
    pub label: String,
    pub seconds: u64,
}

/// One row of a breakdown: a group total and its share of the grand total
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BreakdownEntry {
    pub label: String,
    pub seconds: u64,
    /// Percent of the grand total, one decimal place
    pub percentage: f64,
    pub formatted: String,
}

/// Totals for a set of sessions along every reported dimension
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregationResult {
    pub total_seconds: u64,
    pub by_instrument: Vec<GroupTotal>,
    pub by_category: Vec<GroupTotal>,
    /// Keyed by `YYYY-MM-DD`, ascending
    pub by_date: Vec<GroupTotal>,
}

/// Sum durations per key, keeping the order in which keys first appear
pub fn group_sum<'a, I, F, K>(sessions: I, key_fn: F) -> Vec<GroupTotal>
where
    I: IntoIterator<Item = &'a PracticeSession>,
    F: Fn(&'a PracticeSession) -> K,
    K: Into<String>,
{
    let mut totals: IndexMap<String, u64> = IndexMap::new();
    for session in sessions {
        let total = totals.entry(key_fn(session).into()).or_insert(0);
        *total = total.saturating_add(session.duration);
    }
    totals
        .into_iter()
        .map(|(label, seconds)| GroupTotal { label, seconds })
        .collect()
}

/// Attach percentages to group totals. A zero grand total gives 0% everywhere.
pub fn percentage_breakdown(groups: &[GroupTotal]) -> Vec<BreakdownEntry> {
    let total = saturating_total(groups.iter().map(|g| g.seconds));
    groups
        .iter()
        .map(|g| {
            let percentage = if total == 0 {
                0.0
            } else {
                (1000.0 * g.seconds as f64 / total as f64).round() / 10.0
            };
            BreakdownEntry {
                label: g.label.clone(),
                seconds: g.seconds,
                percentage,
                formatted: format_duration(g.seconds),
            }
        })
        .collect()
}

/// Sum of seconds that clamps at `u64::MAX` instead of overflowing
fn saturating_total(seconds: impl IntoIterator<Item = u64>) -> u64 {
    seconds.into_iter().fold(0, u64::saturating_add)
}

/// Day bucket label for a session date
pub fn day_bucket(date: DateTime<Utc>) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Group already-filtered sessions by instrument, category and day
pub fn summarize<'a, I>(sessions: I) -> AggregationResult
where
    I: IntoIterator<Item = &'a PracticeSession>,
    I::IntoIter: Clone,
{
    let sessions = sessions.into_iter();
    let mut by_date = group_sum(sessions.clone(), |s| day_bucket(s.date));
    by_date.sort_by(|a, b| a.label.cmp(&b.label));

    AggregationResult {
        total_seconds: saturating_total(sessions.clone().map(|s| s.duration)),
        by_instrument: group_sum(sessions.clone(), |s| s.instrument.as_str()),
        by_category: group_sum(sessions, |s| s.category.as_str()),
        by_date,
    }
}

/// Filter `sessions` to the `kind` window ending at `now` and summarize them
pub fn aggregate(sessions: &[PracticeSession], kind: RangeKind, now: DateTime<Utc>) -> Report {
    let range = date_range_for(kind, now);
    let in_range = filter_by_range(sessions, &range);
    let all_time = saturating_total(sessions.iter().map(|s| s.duration));
    Report::new(kind, range, summarize(in_range.iter().copied())).with_all_time(all_time)
}

/// Per-day point of the practice time series
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyTotal {
    pub date: String,
    pub seconds: u64,
    /// Rounded to the nearest minute, as charted
    pub minutes: u64,
}

/// Everything a report view needs for one range
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub range: RangeKind,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub total_seconds: u64,
    pub total_formatted: String,
    pub by_instrument: Vec<BreakdownEntry>,
    pub by_category: Vec<BreakdownEntry>,
    pub by_date: Vec<DailyTotal>,
    /// Every stored session, regardless of range
    pub all_time_seconds: u64,
    pub all_time_formatted: String,
}

impl Report {
    pub fn new(kind: RangeKind, range: DateRange, result: AggregationResult) -> Self {
        Self {
            range: kind,
            start: range.start,
            end: range.end,
            total_seconds: result.total_seconds,
            total_formatted: format_duration(result.total_seconds),
            by_instrument: percentage_breakdown(&result.by_instrument),
            by_category: percentage_breakdown(&result.by_category),
            by_date: result
                .by_date
                .into_iter()
                .map(|g| DailyTotal {
                    minutes: g.seconds.saturating_add(30) / 60,
                    date: g.label,
                    seconds: g.seconds,
                })
                .collect(),
            all_time_seconds: result.total_seconds,
            all_time_formatted: format_duration(result.total_seconds),
        }
    }

    pub fn with_all_time(mut self, seconds: u64) -> Self {
        self.all_time_seconds = seconds;
        self.all_time_formatted = format_duration(seconds);
        self
    }
}
