//! Stopwatch / manual-entry timer that stages one practice session

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::clock::Clock;
use crate::{
    error::{Result, TrackerError},
    models::{ensure_owned, NewPracticeSession},
};

/// How the duration of the next session is measured
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerMode {
    Stopwatch,
    Manual,
}

/// Where the stopwatch is in its start/stop cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerPhase {
    /// Not started since creation or the last reset
    Idle,
    /// Running; `since` is the start instant shifted back by time already accumulated
    Running { since: DateTime<Utc> },
    /// Stopped with `elapsed` frozen
    Stopped,
}

/// Point-in-time view of a timer for clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerSnapshot {
    pub mode: TimerMode,
    pub is_running: bool,
    pub elapsed_seconds: u64,
    /// `MM:SS`, minutes are not wrapped at an hour
    pub display: String,
}

/// Timer state for one user.
///
/// All elapsed-time values are wall-clock deltas taken from the injected
/// [`Clock`], so nothing depends on how often the timer is polled.
#[derive(Debug, Clone)]
pub struct SessionTimer {
    clock: Arc<dyn Clock>,
    mode: TimerMode,
    phase: TimerPhase,
    elapsed: Duration,
}

impl SessionTimer {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            mode: TimerMode::Stopwatch,
            phase: TimerPhase::Idle,
            elapsed: Duration::zero(),
        }
    }

    pub fn mode(&self) -> TimerMode {
        self.mode
    }

    pub fn phase(&self) -> TimerPhase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        matches!(self.phase, TimerPhase::Running { .. })
    }

    /// Accumulated time, sampled live while running
    pub fn elapsed(&self) -> Duration {
        self.elapsed_at(self.clock.now())
    }

    fn elapsed_at(&self, now: DateTime<Utc>) -> Duration {
        match self.phase {
            TimerPhase::Running { since } => (now - since).max(Duration::zero()),
            TimerPhase::Idle | TimerPhase::Stopped => self.elapsed,
        }
    }

    /// Enter manual mode or go back to the stopwatch.
    ///
    /// Entering manual mode stops a running stopwatch and clears its time, so a
    /// manual save only records what was entered.
    pub fn switch_mode(&mut self, manual: bool) {
        if manual {
            if self.mode == TimerMode::Stopwatch {
                self.reset();
            }
            self.mode = TimerMode::Manual;
        } else {
            self.mode = TimerMode::Stopwatch;
        }
        debug!("Timer mode switched to {:?}", self.mode);
    }

    /// Start or resume the stopwatch. Returns false when nothing changed.
    pub fn start(&mut self) -> bool {
        if self.mode != TimerMode::Stopwatch || self.is_running() {
            return false;
        }
        let since = self.clock.now() - self.elapsed;
        self.phase = TimerPhase::Running { since };
        debug!("Timer started, resuming from {}ms", self.elapsed.num_milliseconds());
        true
    }

    /// Freeze the elapsed time. Returns false when the timer was not running.
    pub fn stop(&mut self) -> bool {
        let TimerPhase::Running { since } = self.phase else {
            return false;
        };
        self.elapsed = (self.clock.now() - since).max(Duration::zero());
        self.phase = TimerPhase::Stopped;
        debug!("Timer stopped at {}ms", self.elapsed.num_milliseconds());
        true
    }

    pub fn reset(&mut self) {
        self.stop();
        self.elapsed = Duration::zero();
        self.phase = TimerPhase::Idle;
    }

    /// Overwrite the elapsed time with a manually entered value
    pub fn set_manual_time(&mut self, minutes: u64, seconds: u64) -> Result<()> {
        if self.mode != TimerMode::Manual {
            return Err(TrackerError::precondition(
                "Switch to manual mode before entering a time",
            ));
        }
        if seconds >= 60 {
            return Err(TrackerError::validation("Seconds must be less than 60"));
        }
        let total = minutes
            .checked_mul(60)
            .and_then(|s| s.checked_add(seconds))
            .and_then(|s| i64::try_from(s).ok())
            .and_then(Duration::try_seconds)
            .ok_or_else(|| TrackerError::validation("Manual time is too large"))?;

        self.elapsed = total;
        Ok(())
    }

    /// Duration in whole seconds that a save right now would record
    pub fn compute_duration(&self) -> Result<u64> {
        self.duration_at(self.clock.now())
    }

    fn duration_at(&self, now: DateTime<Utc>) -> Result<u64> {
        if self.mode == TimerMode::Stopwatch && self.phase == TimerPhase::Idle {
            return Err(TrackerError::precondition(
                "Start the timer before saving a session",
            ));
        }
        Ok(whole_seconds(self.elapsed_at(now)))
    }

    /// Build the session to be stored. The timer itself is left untouched;
    /// callers reset it once the session has been persisted.
    pub fn save(
        &self,
        instrument: &str,
        category: &str,
        notes: Option<&str>,
        owned_instruments: &[String],
        owned_categories: &[String],
    ) -> Result<NewPracticeSession> {
        let now = self.clock.now();
        let session = NewPracticeSession::new(instrument, category, 0, notes, now)?;
        ensure_owned(
            &session.instrument,
            &session.category,
            owned_instruments,
            owned_categories,
        )?;
        let duration = self.duration_at(now)?;

        Ok(NewPracticeSession { duration, ..session })
    }

    pub fn snapshot(&self) -> TimerSnapshot {
        let elapsed_seconds = whole_seconds(self.elapsed());
        TimerSnapshot {
            mode: self.mode,
            is_running: self.is_running(),
            elapsed_seconds,
            display: format!("{:02}:{:02}", elapsed_seconds / 60, elapsed_seconds % 60),
        }
    }
}

fn whole_seconds(d: Duration) -> u64 {
    u64::try_from(d.num_seconds()).unwrap_or(0)
}
