use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use anyhow::{anyhow, Result};
use asmodeus_core::{HistoryEntry, PersistenceGateway, PnrSnapshot, TicketRecord};
use async_trait::async_trait;
use chrono::Utc;

/// One audit row kept by the in-memory store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLogEntry {
    pub session_id: String,
    pub kind: String,
    pub raw: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionLogEntry {
    pub session_id: String,
    pub agent_id: String,
    pub ended: bool,
}

#[derive(Default)]
struct Tables {
    pnrs: HashMap<String, PnrSnapshot>,
    tickets: Vec<TicketRecord>,
    sessions: Vec<SessionLogEntry>,
    commands: Vec<CommandLogEntry>,
    history: HashMap<String, Vec<HistoryEntry>>,
}

/// Process-local store used by tests and `--store memory` servers.
/// Nothing survives a restart.
#[derive(Clone, Default)]
pub struct InMemoryPnrStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryPnrStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Tables>> {
        self.tables.read().map_err(|_| anyhow!("in-memory store lock poisoned"))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>> {
        self.tables.write().map_err(|_| anyhow!("in-memory store lock poisoned"))
    }

    pub fn pnr_count(&self) -> Result<usize> {
        Ok(self.read()?.pnrs.len())
    }

    pub fn tickets(&self) -> Result<Vec<TicketRecord>> {
        Ok(self.read()?.tickets.clone())
    }

    pub fn command_log(&self) -> Result<Vec<CommandLogEntry>> {
        Ok(self.read()?.commands.clone())
    }

    pub fn session_log(&self) -> Result<Vec<SessionLogEntry>> {
        Ok(self.read()?.sessions.clone())
    }
}

#[async_trait]
impl PersistenceGateway for InMemoryPnrStore {
    async fn create_pnr(&self, locator: &str, snapshot: &PnrSnapshot) -> Result<()> {
        self.write()?.pnrs.insert(locator.to_string(), snapshot.clone());
        Ok(())
    }

    async fn retrieve_pnr(&self, locator: &str) -> Result<Option<PnrSnapshot>> {
        Ok(self.read()?.pnrs.get(locator).cloned())
    }

    async fn issue_ticket(&self, ticket: &TicketRecord) -> Result<()> {
        let mut tables = self.write()?;
        if tables.tickets.iter().any(|t| t.ticket_number == ticket.ticket_number) {
            return Err(anyhow!("duplicate ticket number {}", ticket.ticket_number));
        }
        tables.tickets.push(ticket.clone());
        Ok(())
    }

    async fn log_session_start(&self, session_id: &str, agent_id: &str) -> Result<()> {
        self.write()?.sessions.push(SessionLogEntry {
            session_id: session_id.to_string(),
            agent_id: agent_id.to_string(),
            ended: false,
        });
        Ok(())
    }

    async fn log_session_end(&self, session_id: &str, agent_id: &str) -> Result<()> {
        let mut tables = self.write()?;
        for entry in tables
            .sessions
            .iter_mut()
            .filter(|e| e.session_id == session_id && e.agent_id == agent_id)
        {
            entry.ended = true;
        }
        Ok(())
    }

    async fn log_command(&self, session_id: &str, kind: &str, raw: &str) -> Result<()> {
        self.write()?.commands.push(CommandLogEntry {
            session_id: session_id.to_string(),
            kind: kind.to_string(),
            raw: raw.to_string(),
        });
        Ok(())
    }

    async fn log_history(&self, locator: &str, action: &str, details: &str, agent_id: &str) -> Result<()> {
        self.write()?
            .history
            .entry(locator.to_string())
            .or_default()
            .push(HistoryEntry {
                timestamp: Utc::now(),
                agent_id: agent_id.to_string(),
                action: action.to_string(),
                details: details.to_string(),
            });
        Ok(())
    }

    async fn history(&self, locator: &str) -> Result<Vec<HistoryEntry>> {
        Ok(self.read()?.history.get(locator).cloned().unwrap_or_default())
    }
}
