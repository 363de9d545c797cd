//! Registered users and their practice documents

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
    error::{Result, TrackerError},
    models::{NewPracticeSession, PracticeSession, UserProfile, UserRecord, UserUpdate},
};

const MIN_PASSWORD_LEN: usize = 6;

/// On-disk layout of the data file
#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreFile {
    users: Vec<UserRecord>,
}

/// All user records, optionally mirrored to a JSON data file.
///
/// Every mutation is applied to a copy of the record and only committed
/// once the data file has been written, so a failed write leaves memory
/// and disk in agreement.
#[derive(Debug, Default)]
pub struct UserStore {
    users: IndexMap<Uuid, UserRecord>,
    data_file: Option<PathBuf>,
}

impl UserStore {
    /// Store that lives only in memory
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Store backed by `path`, loading existing users if the file exists
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let users = if path.exists() {
            let raw = std::fs::read_to_string(&path)?;
            let file: StoreFile = serde_json::from_str(&raw)?;
            info!("Loaded {} users from {}", file.users.len(), path.display());
            file.users.into_iter().map(|u| (u.id, u)).collect()
        } else {
            info!("Data file {} not found, starting empty", path.display());
            IndexMap::new()
        };

        Ok(Self {
            users,
            data_file: Some(path),
        })
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    pub fn register(&mut self, username: &str, email: &str, password: &str) -> Result<UserRecord> {
        let username = username.trim();
        let email = normalize_email(email);
        if username.is_empty() || email.is_empty() || password.is_empty() {
            return Err(TrackerError::validation(
                "Username, email and password are required",
            ));
        }
        if !email.contains('@') {
            return Err(TrackerError::validation("Invalid email address"));
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(TrackerError::validation(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LEN
            )));
        }
        if self.find_by_email(&email).is_some() {
            return Err(TrackerError::conflict("Email is already registered"));
        }

        let salt = Uuid::new_v4().simple().to_string();
        let record = UserRecord {
            id: Uuid::new_v4(),
            username: username.to_string(),
            password_digest: digest_password(&salt, password),
            password_salt: salt,
            email,
            profile: UserProfile::default(),
        };

        self.users.insert(record.id, record.clone());
        if let Err(e) = self.persist() {
            self.users.shift_remove(&record.id);
            return Err(e);
        }
        info!("Registered user {} ({})", record.username, record.id);
        Ok(record)
    }

    pub fn authenticate(&self, email: &str, password: &str) -> Result<&UserRecord> {
        let invalid = || TrackerError::unauthorized("Invalid email or password");
        let record = self.find_by_email(&normalize_email(email)).ok_or_else(invalid)?;
        if digest_password(&record.password_salt, password) != record.password_digest {
            debug!("Password mismatch for user {}", record.id);
            return Err(invalid());
        }
        Ok(record)
    }

    pub fn get(&self, user_id: Uuid) -> Result<&UserRecord> {
        self.users
            .get(&user_id)
            .ok_or_else(|| TrackerError::not_found("User not found"))
    }

    pub fn update(&mut self, user_id: Uuid, update: UserUpdate) -> Result<&UserRecord> {
        self.commit(user_id, |record| {
            if let Some(instruments) = update.instruments {
                record.profile.set_instruments(instruments)?;
            }
            if let Some(categories) = update.categories {
                record.profile.set_categories(categories)?;
            }
            if let Some(sessions) = update.practice_sessions {
                record.profile.replace_sessions(sessions)?;
            }
            Ok(())
        })?;
        self.get(user_id)
    }

    pub fn delete(&mut self, user_id: Uuid) -> Result<UserRecord> {
        let (index, _, removed) = self
            .users
            .shift_remove_full(&user_id)
            .ok_or_else(|| TrackerError::not_found("User not found"))?;

        if let Err(e) = self.persist() {
            self.users.shift_insert(index, user_id, removed);
            return Err(e);
        }
        info!("Deleted user {}", user_id);
        Ok(removed)
    }

    /// Store a session after checking it against the user's current lists
    pub fn add_practice(&mut self, user_id: Uuid, session: NewPracticeSession) -> Result<PracticeSession> {
        self.commit(user_id, |record| record.profile.accept(session))
    }

    pub fn delete_practice(&mut self, user_id: Uuid, session_id: Uuid) -> Result<PracticeSession> {
        self.commit(user_id, |record| record.profile.remove_session(session_id))
    }

    fn find_by_email(&self, email: &str) -> Option<&UserRecord> {
        self.users.values().find(|u| u.email == email)
    }

    /// Apply `change` to a copy of the record and keep it only if it persists
    fn commit<T>(
        &mut self,
        user_id: Uuid,
        change: impl FnOnce(&mut UserRecord) -> Result<T>,
    ) -> Result<T> {
        let mut updated = self.get(user_id)?.clone();
        let out = change(&mut updated)?;

        let previous = self.users.insert(user_id, updated);
        if let Err(e) = self.persist() {
            if let Some(previous) = previous {
                self.users.insert(user_id, previous);
            }
            return Err(e);
        }
        Ok(out)
    }

    fn persist(&self) -> Result<()> {
        let Some(path) = &self.data_file else {
            return Ok(());
        };

        let file = StoreFile {
            users: self.users.values().cloned().collect(),
        };
        let json = serde_json::to_string_pretty(&file)?;
        let tmp = path.with_extension("tmp");
        std::fs::write(&tmp, json)
            .and_then(|_| std::fs::rename(&tmp, path))
            .map_err(|e| {
                warn!("Failed to write data file {}: {}", path.display(), e);
                TrackerError::from(e)
            })?;
        debug!("Wrote {} users to {}", file.users.len(), path.display());
        Ok(())
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn digest_password(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}
