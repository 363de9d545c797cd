//! Practice session records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Result, TrackerError};

/// One completed, stored unit of practice
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PracticeSession {
    /// Assigned by the store when the session is accepted
    pub id: Uuid,
    pub date: DateTime<Utc>,
    /// Seconds
    pub duration: u64,
    pub instrument: String,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// A practice session that has not been stored yet, so it has no id
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPracticeSession {
    pub date: DateTime<Utc>,
    pub duration: u64,
    pub instrument: String,
    pub category: String,
    pub notes: Option<String>,
}

impl NewPracticeSession {
    /// Build a session, rejecting blank instrument or category.
    ///
    /// Instrument and category are kept exactly as given so the membership
    /// check compares the raw value. Notes are trimmed; blank notes are dropped.
    pub fn new(
        instrument: &str,
        category: &str,
        duration: u64,
        notes: Option<&str>,
        date: DateTime<Utc>,
    ) -> Result<Self> {
        if instrument.trim().is_empty() || category.trim().is_empty() {
            return Err(TrackerError::validation(
                "Both an instrument and a category are required",
            ));
        }

        Ok(Self {
            date,
            duration,
            instrument: instrument.to_string(),
            category: category.to_string(),
            notes: notes
                .map(str::trim)
                .filter(|n| !n.is_empty())
                .map(str::to_string),
        })
    }

    /// Attach the store-assigned id
    pub fn into_session(self, id: Uuid) -> PracticeSession {
        PracticeSession {
            id,
            date: self.date,
            duration: self.duration,
            instrument: self.instrument,
            category: self.category,
            notes: self.notes,
        }
    }
}

/// Check that an instrument and category belong to the user's configured lists
pub fn ensure_owned(
    instrument: &str,
    category: &str,
    owned_instruments: &[String],
    owned_categories: &[String],
) -> Result<()> {
    if !owned_instruments.iter().any(|i| i == instrument) {
        return Err(TrackerError::validation(format!(
            "Unknown instrument: {}",
            instrument
        )));
    }
    if !owned_categories.iter().any(|c| c == category) {
        return Err(TrackerError::validation(format!(
            "Unknown category: {}",
            category
        )));
    }
    Ok(())
}
