use asmodeus_core::calendar::sign_in_stamp;
use asmodeus_core::{Rejection, Session};
use tracing::{info, warn};

use crate::dispatch::CommandProcessor;
use crate::types::CommandResult;

impl CommandProcessor {
    pub(crate) async fn sign_in(
        &self,
        session: &mut Session,
        agent_id: &str,
        office: &str,
    ) -> CommandResult {
        if session.signed_in {
            return Err(Rejection::AlreadySignedIn.into());
        }
        session.sign_in(agent_id, office);
        if let Err(e) = self.gateway.log_session_start(&session.id, agent_id).await {
            warn!(session = %session.id, "session start log failed: {e:#}");
        }
        info!(session = %session.id, agent_id, office, "[Commands] agent signed in");
        Ok(format!(
            "OK {agent_id} - ASMODEUS READY\n{}",
            sign_in_stamp(self.clock.now())
        ))
    }

    pub(crate) async fn sign_out(&self, session: &mut Session) -> CommandResult {
        let agent_id = session.agent().to_string();
        if let Err(e) = self.gateway.log_session_end(&session.id, &agent_id).await {
            warn!(session = %session.id, "session end log failed: {e:#}");
        }
        session.sign_out();
        info!(session = %session.id, agent_id = %agent_id, "[Commands] agent signed out");
        Ok("SIGNED OUT".to_string())
    }
}
