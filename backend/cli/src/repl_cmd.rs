//! Interactive terminal on stdin/stdout, running commands in-process.

use std::sync::Arc;

use anyhow::Result;
use asmodeus_gateway::{SessionRegistry, TerminalHost};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use crate::terminal_output::{note_info, prompt};

const EXIT_WORDS: &[&str] = &["EXIT", "QUIT"];

pub async fn run(host: Arc<TerminalHost>, session_id: String) -> Result<()> {
    note_info(&format!("Asmodeus terminal, session {session_id}. Type HE for help, EXIT to leave."));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();
    loop {
        stdout.write_all(prompt(&session_id).as_bytes()).await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else { break };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if EXIT_WORDS.iter().any(|w| line.eq_ignore_ascii_case(w)) {
            break;
        }
        let output = host.execute(&session_id, line).await;
        stdout.write_all(format!("{output}\n").as_bytes()).await?;
    }
    Ok(())
}

/// Host for a single local terminal.
pub fn local_host(processor: asmodeus_commands::CommandProcessor) -> Arc<TerminalHost> {
    Arc::new(TerminalHost::new(Arc::new(processor), SessionRegistry::new()))
}
