use anyhow::Result;
use async_trait::async_trait;

use crate::types::{HistoryEntry, PnrSnapshot, TicketRecord};

/// Durable store for PNRs, tickets and terminal audit logs.
///
/// Callers treat every error as a soft failure: a write that fails is reported
/// to the agent as a flag on an otherwise successful response.
#[async_trait]
pub trait PersistenceGateway: Send + Sync {
    /// Write (or replace) the PNR stored under `locator`.
    async fn create_pnr(&self, locator: &str, snapshot: &PnrSnapshot) -> Result<()>;

    /// `Ok(None)` means the locator is unknown; `Err` means the store could not answer.
    async fn retrieve_pnr(&self, locator: &str) -> Result<Option<PnrSnapshot>>;

    async fn issue_ticket(&self, ticket: &TicketRecord) -> Result<()>;

    async fn log_session_start(&self, session_id: &str, agent_id: &str) -> Result<()>;

    async fn log_session_end(&self, session_id: &str, agent_id: &str) -> Result<()>;

    async fn log_command(&self, session_id: &str, kind: &str, raw: &str) -> Result<()>;

    async fn log_history(&self, locator: &str, action: &str, details: &str, agent_id: &str)
        -> Result<()>;

    /// History for `locator`, oldest first.
    async fn history(&self, locator: &str) -> Result<Vec<HistoryEntry>>;
}
