//! Report time windows

use std::{fmt, str::FromStr};

use chrono::{DateTime, Duration, Months, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{error::TrackerError, models::PracticeSession};

/// Size of the report window ending now
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RangeKind {
    #[default]
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl fmt::Display for RangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RangeKind::Daily => "daily",
            RangeKind::Weekly => "weekly",
            RangeKind::Monthly => "monthly",
            RangeKind::Yearly => "yearly",
        };
        f.write_str(name)
    }
}

impl FromStr for RangeKind {
    type Err = TrackerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "daily" => Ok(RangeKind::Daily),
            "weekly" => Ok(RangeKind::Weekly),
            "monthly" => Ok(RangeKind::Monthly),
            "yearly" => Ok(RangeKind::Yearly),
            other => Err(TrackerError::validation(format!(
                "Unknown report range: {}",
                other
            ))),
        }
    }
}

/// Inclusive time window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DateRange {
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.start <= at && at <= self.end
    }
}

/// Window for `kind` ending at `now`.
///
/// Daily starts at UTC midnight. Monthly and yearly subtract calendar
/// units, clamping to the last day of a shorter month.
pub fn date_range_for(kind: RangeKind, now: DateTime<Utc>) -> DateRange {
    let start = match kind {
        RangeKind::Daily => now.date_naive().and_time(NaiveTime::MIN).and_utc(),
        RangeKind::Weekly => now - Duration::days(7),
        RangeKind::Monthly => now
            .checked_sub_months(Months::new(1))
            .unwrap_or(DateTime::<Utc>::MIN_UTC),
        RangeKind::Yearly => now
            .checked_sub_months(Months::new(12))
            .unwrap_or(DateTime::<Utc>::MIN_UTC),
    };
    DateRange { start, end: now }
}

/// Sessions dated inside `range`, in their original order
pub fn filter_by_range<'a>(
    sessions: &'a [PracticeSession],
    range: &DateRange,
) -> Vec<&'a PracticeSession> {
    sessions.iter().filter(|s| range.contains(s.date)).collect()
}
