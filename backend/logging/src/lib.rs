//! Structured logging for the Asmodeus terminal.
//!
//! Console and rolling NDJSON file output, terminal audit events, and
//! redaction of contact and payment details before anything is written.

pub mod event_logger;
pub mod logger;
pub mod redact;

pub use event_logger::{EventLogEntry, EventLogger, TerminalEvent};
pub use logger::init_logger;
pub use redact::redact_sensitive_data;
