//! Terminal host: one entry point that runs a raw command line for a session id.

use std::sync::Arc;

use asmodeus_commands::{CommandProcessor, SYSTEM_ERROR, parse};
use asmodeus_core::CommandKind;
use asmodeus_logging::{EventLogger, TerminalEvent};
use tracing::debug;

use crate::session_registry::SessionRegistry;

pub struct TerminalHost {
    processor: Arc<CommandProcessor>,
    registry: SessionRegistry,
}

impl TerminalHost {
    pub fn new(processor: Arc<CommandProcessor>, registry: SessionRegistry) -> Self {
        Self { processor, registry }
    }

    pub fn registry(&self) -> &SessionRegistry {
        &self.registry
    }

    /// Parse and process `line` against `session_id`, waiting behind any
    /// command already running for that session.
    pub async fn execute(&self, session_id: &str, line: &str) -> String {
        let intent = parse(line);
        let handle = self.registry.get_or_create(session_id).await;

        let (output, signed_in, agent_id) = {
            let mut session = handle.lock().await;
            let was_signed_in = session.signed_in;
            // Sign-out clears the agent, so capture it first.
            let agent_id = session.agent().to_string();
            let output = self.processor.process(&mut session, &intent).await;
            (output, (was_signed_in, session.signed_in), agent_id)
        };

        match (&intent.kind, signed_in) {
            (CommandKind::SignIn { agent_id, .. }, (false, true)) => EventLogger::log_event(
                session_id,
                TerminalEvent::SessionStart { agent_id: agent_id.clone() },
            ),
            // The session stays registered: sign-out already reset it, and a
            // command queued behind this one must land on the same session.
            // Idle sessions are left to the reaper.
            (CommandKind::SignOut, (true, false)) => {
                EventLogger::log_event(session_id, TerminalEvent::SessionEnd { agent_id });
                debug!(session = session_id, "session signed out");
            }
            _ => {}
        }

        if output == SYSTEM_ERROR {
            EventLogger::log_event(session_id, TerminalEvent::Fault { raw: intent.raw.clone() });
        }
        EventLogger::log_event(
            session_id,
            TerminalEvent::command(intent.kind.name(), &intent.raw, &output),
        );
        output
    }
}
