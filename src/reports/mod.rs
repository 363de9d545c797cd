//! Practice reports
//!
//! Pure functions over a user's practice sessions: time windows, grouped
//! totals, percentage breakdowns, history listing and duration formatting.

pub mod aggregate;
pub mod format;
pub mod history;
pub mod range;

pub use aggregate::{
    aggregate, group_sum, percentage_breakdown, summarize, AggregationResult, BreakdownEntry,
    DailyTotal, GroupTotal, Report,
};
pub use format::{format_clock, format_duration};
pub use history::{history, HistoryFilter};
pub use range::{date_range_for, filter_by_range, DateRange, RangeKind};
