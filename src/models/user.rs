//! Per-user practice document and account records

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::practice_session::{ensure_owned, NewPracticeSession, PracticeSession};
use crate::error::{Result, TrackerError};

/// The practice document owned by one user
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    instruments: Vec<String>,
    categories: Vec<String>,
    practice_sessions: Vec<PracticeSession>,
}

impl UserProfile {
    pub fn new(instruments: Vec<String>, categories: Vec<String>) -> Result<Self> {
        Ok(Self {
            instruments: validate_labels("instrument", instruments)?,
            categories: validate_labels("category", categories)?,
            practice_sessions: Vec::new(),
        })
    }

    pub fn instruments(&self) -> &[String] {
        &self.instruments
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn practice_sessions(&self) -> &[PracticeSession] {
        &self.practice_sessions
    }

    pub fn set_instruments(&mut self, instruments: Vec<String>) -> Result<()> {
        self.instruments = validate_labels("instrument", instruments)?;
        Ok(())
    }

    pub fn set_categories(&mut self, categories: Vec<String>) -> Result<()> {
        self.categories = validate_labels("category", categories)?;
        Ok(())
    }

    /// Replace the whole session list. Sessions keep their ids, which must be unique.
    ///
    /// Sessions already stored are kept as they are, since history may
    /// reference instruments that have since been removed from the lists.
    /// Any session with an id not seen before must match the current lists.
    pub fn replace_sessions(&mut self, sessions: Vec<PracticeSession>) -> Result<()> {
        let mut seen = std::collections::HashSet::new();
        for session in &sessions {
            if !seen.insert(session.id) {
                return Err(TrackerError::validation(format!(
                    "Duplicate practice session id: {}",
                    session.id
                )));
            }
            if !self.practice_sessions.iter().any(|s| s.id == session.id) {
                ensure_owned(
                    &session.instrument,
                    &session.category,
                    &self.instruments,
                    &self.categories,
                )?;
            }
        }
        self.practice_sessions = sessions;
        Ok(())
    }

    /// Accept a new session after checking it against the current lists
    pub fn accept(&mut self, session: NewPracticeSession) -> Result<PracticeSession> {
        ensure_owned(
            &session.instrument,
            &session.category,
            &self.instruments,
            &self.categories,
        )?;
        let stored = session.into_session(Uuid::new_v4());
        self.practice_sessions.push(stored.clone());
        Ok(stored)
    }

    pub fn remove_session(&mut self, id: Uuid) -> Result<PracticeSession> {
        let index = self
            .practice_sessions
            .iter()
            .position(|s| s.id == id)
            .ok_or_else(|| TrackerError::not_found(format!("Practice session {} not found", id)))?;
        Ok(self.practice_sessions.remove(index))
    }
}

/// Trim labels and reject blanks and duplicates
fn validate_labels(kind: &str, labels: Vec<String>) -> Result<Vec<String>> {
    let mut out: Vec<String> = Vec::with_capacity(labels.len());
    for label in labels {
        let label = label.trim();
        if label.is_empty() {
            return Err(TrackerError::validation(format!("Empty {} name", kind)));
        }
        if out.iter().any(|l| l == label) {
            return Err(TrackerError::validation(format!(
                "Duplicate {} name: {}",
                kind, label
            )));
        }
        out.push(label.to_string());
    }
    Ok(out)
}

/// A registered account with its practice document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_salt: String,
    /// Hex SHA-256 of salt + password, see `state::user_store`
    pub password_digest: String,
    pub profile: UserProfile,
}

/// JSON view of a user returned by the API; never carries credentials
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDocument {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub instruments: Vec<String>,
    pub categories: Vec<String>,
    pub practice_sessions: Vec<PracticeSession>,
}

impl From<&UserRecord> for UserDocument {
    fn from(record: &UserRecord) -> Self {
        Self {
            id: record.id,
            username: record.username.clone(),
            email: record.email.clone(),
            instruments: record.profile.instruments.clone(),
            categories: record.profile.categories.clone(),
            practice_sessions: record.profile.practice_sessions.clone(),
        }
    }
}

/// Partial update of a user's document
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdate {
    pub instruments: Option<Vec<String>>,
    pub categories: Option<Vec<String>>,
    pub practice_sessions: Option<Vec<PracticeSession>>,
}
