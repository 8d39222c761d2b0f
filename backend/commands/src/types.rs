/// Command processing types: help metadata and handler outcomes.
use asmodeus_core::Rejection;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Category
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommandCategory {
    Session,
    Availability,
    Booking,
    Elements,
    Pricing,
    Pnr,
    Queue,
    Help,
}

impl CommandCategory {
    pub fn title(self) -> &'static str {
        match self {
            CommandCategory::Session => "SESSION",
            CommandCategory::Availability => "AVAILABILITY",
            CommandCategory::Booking => "BOOKING",
            CommandCategory::Elements => "ELEMENTS",
            CommandCategory::Pricing => "PRICING/TICKETING",
            CommandCategory::Pnr => "PNR",
            CommandCategory::Queue => "QUEUE",
            CommandCategory::Help => "HELP",
        }
    }
}

// ---------------------------------------------------------------------------
// Help entry
// ---------------------------------------------------------------------------

/// One entry of the built-in help registry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HelpEntry {
    /// Entry code as typed (`SS`, `AN`, `FXP`).
    pub code: String,
    pub category: CommandCategory,
    pub summary: String,
    pub usage: String,
    pub example: String,
}

// ---------------------------------------------------------------------------
// Outcome
// ---------------------------------------------------------------------------

/// Why a handler did not produce a response.
#[derive(Debug, Error)]
pub enum CommandError {
    /// A precondition failed; the agent sees the rejection text.
    #[error(transparent)]
    Rejected(#[from] Rejection),

    /// Something unexpected broke; the agent sees a generic system error.
    #[error("command fault: {0:#}")]
    Fault(#[from] anyhow::Error),
}

pub type CommandResult = Result<String, CommandError>;

/// Text shown for any fault or panic.
pub const SYSTEM_ERROR: &str = "SYSTEM ERROR";

/// Suffix appended when a write could not reach the store.
pub const LOCAL_ONLY_FLAG: &str = " (LOCAL ONLY - DB ERROR)";
