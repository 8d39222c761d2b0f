/// Per-family command handlers, each an `impl CommandProcessor` block.
mod booking;
mod pnr;
mod session;
mod ticketing;

use asmodeus_core::{Rejection, Session};
use tracing::warn;

use crate::dispatch::CommandProcessor;
use crate::render;

pub(crate) use booking::ElementKind;
pub(crate) use pnr::EndMode;

/// The working area as a PNR display, or the empty-context message.
pub(crate) fn screen(session: &Session) -> String {
    render::pnr_screen(session).unwrap_or_else(|| Rejection::NoPnr.to_string())
}

/// Modifiers after the slash of `FXP/...` and `TTP/...`.
#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct EntryOptions {
    /// `P2`: act on one passenger only.
    pub passenger: Option<u32>,
    /// `RT`: redisplay the PNR afterwards.
    pub redisplay: bool,
}

pub(crate) fn parse_options(options: Option<&str>) -> Result<EntryOptions, Rejection> {
    let mut parsed = EntryOptions::default();
    for token in options.unwrap_or("").split('/').map(str::trim).filter(|t| !t.is_empty()) {
        if token == "RT" {
            parsed.redisplay = true;
        } else if let Some(n) = token.strip_prefix('P').and_then(|n| n.parse().ok()) {
            parsed.passenger = Some(n);
        } else {
            return Err(Rejection::CheckEntry);
        }
    }
    Ok(parsed)
}

impl CommandProcessor {
    /// Append a history entry; failures are logged and otherwise ignored.
    pub(crate) async fn record_history(&self, locator: &str, action: &str, details: &str, agent: &str) {
        if let Err(e) = self.gateway.log_history(locator, action, details, agent).await {
            warn!(locator, action, "history write failed: {e:#}");
        }
    }

    pub(crate) fn help(&self, topic: Option<&str>) -> crate::types::CommandResult {
        match topic {
            None => Ok(self.help.overview()),
            Some(topic) => match self.help.find(topic) {
                Some(entry) => Ok(self.help.describe(entry)),
                None => Err(Rejection::NoHelp(topic.to_string()).into()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn options_tokens() {
        assert_eq!(parse_options(None).unwrap(), EntryOptions::default());
        assert_eq!(
            parse_options(Some("P2/RT")).unwrap(),
            EntryOptions { passenger: Some(2), redisplay: true }
        );
        assert_eq!(parse_options(Some("ZZ")), Err(Rejection::CheckEntry));
    }
}
