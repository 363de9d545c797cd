//! Bearer tokens issued at register/login

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use super::SessionContext;
use crate::error::{Result, TrackerError};

#[derive(Debug, Clone)]
struct TokenEntry {
    user_id: Uuid,
    issued_at: DateTime<Utc>,
}

/// Opaque tokens mapped to the user they authenticate
#[derive(Debug)]
pub struct TokenStore {
    tokens: HashMap<String, TokenEntry>,
    ttl: Duration,
}

impl TokenStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            tokens: HashMap::new(),
            ttl,
        }
    }

    pub fn issue(&mut self, user_id: Uuid, now: DateTime<Utc>) -> String {
        let token = Uuid::new_v4().simple().to_string();
        self.tokens.insert(
            token.clone(),
            TokenEntry {
                user_id,
                issued_at: now,
            },
        );
        token
    }

    /// Resolve a token into the caller's context. Unknown and expired tokens are rejected.
    pub fn resolve(&self, token: &str, now: DateTime<Utc>) -> Result<SessionContext> {
        let entry = self
            .tokens
            .get(token)
            .ok_or_else(|| TrackerError::unauthorized("Invalid or expired token"))?;
        if self.is_expired(entry, now) {
            return Err(TrackerError::unauthorized("Invalid or expired token"));
        }
        Ok(SessionContext {
            user_id: entry.user_id,
            token: token.to_string(),
        })
    }

    pub fn revoke(&mut self, token: &str) -> bool {
        self.tokens.remove(token).is_some()
    }

    /// Revoke every token of a user, returning how many were dropped
    pub fn revoke_user(&mut self, user_id: Uuid) -> usize {
        let before = self.tokens.len();
        self.tokens.retain(|_, entry| entry.user_id != user_id);
        before - self.tokens.len()
    }

    pub fn sweep_expired(&mut self, now: DateTime<Utc>) -> usize {
        let before = self.tokens.len();
        let ttl = self.ttl;
        self.tokens.retain(|_, entry| now - entry.issued_at < ttl);
        before - self.tokens.len()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    fn is_expired(&self, entry: &TokenEntry, now: DateTime<Utc>) -> bool {
        now - entry.issued_at >= self.ttl
    }
}
