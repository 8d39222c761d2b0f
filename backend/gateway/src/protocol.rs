//! JSON bodies for the terminal HTTP API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Session used when a request names none.
pub const DEFAULT_SESSION_ID: &str = "default";

/// `POST /api/command` body.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandRequest {
    #[serde(default)]
    pub command: Option<String>,
    #[serde(default)]
    pub session_id: Option<String>,
}

impl CommandRequest {
    /// The trimmed command line, or `None` when it is missing or blank.
    pub fn command_line(&self) -> Option<&str> {
        self.command.as_deref().map(str::trim).filter(|c| !c.is_empty())
    }

    pub fn session(&self) -> &str {
        self.session_id
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_SESSION_ID)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandResponse {
    pub output: String,
    pub session_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// `GET /api/health` body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthReport {
    pub status: String,
    pub sessions: usize,
    pub uptime_seconds: u64,
    pub timestamp: DateTime<Utc>,
}
