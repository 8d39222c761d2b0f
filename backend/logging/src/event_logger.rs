//! Terminal Event Logger
//!
//! Structured audit events (sign-in, sign-out, entries, faults) emitted on the
//! `terminal_events` target so the file layer captures them as NDJSON.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::redact::redact_sensitive_data;

/// Longest response prefix kept in a command event.
const RESPONSE_PREVIEW: usize = 80;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum TerminalEvent {
    SessionStart {
        agent_id: String,
    },
    SessionEnd {
        agent_id: String,
    },
    Command {
        kind: String,
        raw: String,
        response: String,
    },
    Fault {
        raw: String,
    },
}

impl TerminalEvent {
    /// A command event with the first line of the response, truncated.
    pub fn command(kind: &str, raw: &str, response: &str) -> Self {
        let first_line = response.lines().next().unwrap_or_default();
        TerminalEvent::Command {
            kind: kind.to_string(),
            raw: raw.to_string(),
            response: first_line.chars().take(RESPONSE_PREVIEW).collect(),
        }
    }

    fn redact(&mut self) {
        match self {
            TerminalEvent::Command { raw, response, .. } => {
                *raw = redact_sensitive_data(raw);
                *response = redact_sensitive_data(response);
            }
            TerminalEvent::Fault { raw } => *raw = redact_sensitive_data(raw),
            TerminalEvent::SessionStart { .. } | TerminalEvent::SessionEnd { .. } => {}
        }
    }
}

#[derive(Debug, Serialize)]
pub struct EventLogEntry {
    pub session_id: String,
    pub timestamp: DateTime<Utc>,
    pub event: TerminalEvent,
}

impl EventLogEntry {
    pub fn new(session_id: &str, mut event: TerminalEvent) -> Self {
        event.redact();
        Self { session_id: session_id.to_string(), timestamp: Utc::now(), event }
    }
}

pub struct EventLogger;

impl EventLogger {
    /// Redact and emit one terminal event.
    pub fn log_event(session_id: &str, event: TerminalEvent) {
        let entry = EventLogEntry::new(session_id, event);
        match serde_json::to_string(&entry) {
            Ok(json) => info!(target: "terminal_events", event = %json, "terminal event"),
            Err(_) => info!(target: "terminal_events", event = ?entry, "terminal event"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_event_keeps_first_line_redacted() {
        let event = TerminalEvent::command("CONTACT", "AP DEL 9876543210", "  1.KUMAR/RAHUL\n 2 AP DEL 9876543210");
        let entry = EventLogEntry::new("s1", event);
        match entry.event {
            TerminalEvent::Command { raw, response, .. } => {
                assert_eq!(raw, "AP DEL [REDACTED_PHONE]");
                assert_eq!(response, "  1.KUMAR/RAHUL");
            }
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[test]
    fn events_serialize_with_type_tag() {
        let entry = EventLogEntry::new("s1", TerminalEvent::SessionStart { agent_id: "JI".into() });
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["event"]["type"], "SessionStart");
        assert_eq!(json["session_id"], "s1");
    }
}
