//! API request and response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{PracticeSession, UserDocument};

#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Token and user document returned at register and login
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserDocument,
}

/// Body of `POST /api/user/practice`
#[derive(Debug, Clone, Deserialize)]
pub struct PracticeRequest {
    pub instrument: String,
    pub category: String,
    pub duration: u64,
    pub notes: Option<String>,
    /// Defaults to the time the request is handled
    pub date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModeRequest {
    pub manual: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ManualTimeRequest {
    #[serde(default)]
    pub minutes: u64,
    #[serde(default)]
    pub seconds: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TimerSaveRequest {
    pub instrument: String,
    pub category: String,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReportQuery {
    pub range: Option<String>,
}

/// A history row: the stored session plus its `M:SS` duration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    #[serde(flatten)]
    pub session: PracticeSession,
    pub duration_formatted: String,
}

/// Plain message body, also used for every error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
    pub uptime: String,
    pub port: u16,
    pub host: String,
}

impl HealthResponse {
    pub fn ok(uptime: String, port: u16, host: String) -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            uptime,
            port,
            host,
        }
    }
}
