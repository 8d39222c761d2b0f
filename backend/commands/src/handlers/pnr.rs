use asmodeus_core::{Passenger, Rejection, Session};
use tracing::{info, warn};

use super::screen;
use crate::dispatch::CommandProcessor;
use crate::locator::generate_locator;
use crate::render;
use crate::types::{CommandError, CommandResult, LOCAL_ONLY_FLAG};

/// History entries shown by `RH`; `RHA` shows everything.
const RECENT_HISTORY: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EndMode {
    /// `ER`: commit and redisplay.
    Retrieve,
    /// `ET`: commit with a one-line acknowledgement.
    Close,
}

/// Result of writing the working area out as a PNR.
pub(crate) struct Commit {
    pub locator: String,
    pub created: bool,
    pub persisted: bool,
}

fn flag(persisted: bool) -> &'static str {
    if persisted { "" } else { LOCAL_ONLY_FLAG }
}

impl CommandProcessor {
    /// Validate and persist the working area. Reuses the locator already in context.
    pub(crate) async fn commit(&self, session: &mut Session) -> Result<Commit, CommandError> {
        let area = &session.area;
        if area.segments.is_empty() {
            return Err(Rejection::NoItinerary.into());
        }
        if area.passengers.is_empty() {
            return Err(Rejection::NeedName.into());
        }
        if area.contacts.is_empty() {
            return Err(Rejection::NeedContact.into());
        }
        if area.ticketing.is_empty() {
            return Err(Rejection::NeedTicketing.into());
        }

        let (locator, created) = match &area.current_pnr {
            Some(locator) => (locator.clone(), false),
            None => (generate_locator(), true),
        };
        let snapshot = area.snapshot();
        let persisted = match self.gateway.create_pnr(&locator, &snapshot).await {
            Ok(()) => true,
            Err(e) => {
                warn!(locator = %locator, "pnr write failed, kept locally: {e:#}");
                false
            }
        };

        let agent = session.agent().to_string();
        let details = format!("{} PAX {} SEG", snapshot.passengers.len(), snapshot.segments.len());
        let action = if created { "CREATED" } else { "MODIFIED" };
        self.record_history(&locator, action, &details, &agent).await;

        session.area.current_pnr = Some(locator.clone());
        session.queue.enqueue(&locator);
        info!(session = %session.id, locator = %locator, created, persisted, "[Commands] pnr committed");
        Ok(Commit { locator, created, persisted })
    }

    /// `ER` / `ET`.
    pub(crate) async fn end_transaction(&self, session: &mut Session, mode: EndMode) -> CommandResult {
        let commit = self.commit(session).await?;
        let suffix = flag(commit.persisted);
        Ok(match mode {
            EndMode::Retrieve => {
                let verb = if commit.created { "CREATED" } else { "UPDATED" };
                format!("PNR {verb}: {}{suffix}\n{}", commit.locator, screen(session))
            }
            EndMode::Close => format!("PNR SAVED: {}{suffix}", commit.locator),
        })
    }

    /// `RT` alone redisplays the working area; `RT ABC234` shows that PNR from
    /// the working area when it is in context, else loads it from the store.
    pub(crate) async fn retrieve(&self, session: &mut Session, locator: Option<&str>) -> CommandResult {
        let Some(locator) = locator else {
            return render::pnr_screen(session).ok_or_else(|| Rejection::NoPnr.into());
        };
        // The PNR in context wins over the store; it may exist only locally.
        if session.area.current_pnr.as_deref() == Some(locator) {
            return Ok(format!("PNR RETRIEVED: {locator}\n{}", screen(session)));
        }
        match self.gateway.retrieve_pnr(locator).await {
            Ok(Some(snapshot)) => {
                session.area.load_snapshot(locator, snapshot);
                info!(session = %session.id, locator, "[Commands] pnr retrieved");
                Ok(format!("PNR RETRIEVED: {locator}\n{}", screen(session)))
            }
            Ok(None) => Err(Rejection::PnrNotFound(locator.to_string()).into()),
            Err(e) => {
                warn!(locator, "pnr lookup failed: {e:#}");
                Err(Rejection::RetrieveUnavailable(locator.to_string()).into())
            }
        }
    }

    /// `IG` clears the working area; `IR` clears it and reloads the PNR that was in context.
    pub(crate) async fn ignore(&self, session: &mut Session, retrieve: bool) -> CommandResult {
        let locator = session.area.current_pnr.clone();
        session.ignore();
        match (retrieve, locator) {
            (true, Some(locator)) => {
                let text = self.retrieve(session, Some(&locator)).await?;
                Ok(format!("IGNORED\n{text}"))
            }
            _ => Ok("IG - WORKING AREA CLEARED".to_string()),
        }
    }

    /// `SPn`: move one passenger into a new PNR with the same itinerary.
    pub(crate) async fn split(&self, session: &mut Session, line: u32) -> CommandResult {
        let parent = session.area.current_pnr.clone().ok_or(Rejection::NoPnr)?;
        if session.area.passengers.len() < 2 {
            return Err(Rejection::SplitNeedsTwo.into());
        }
        if session.area.segments.is_empty() {
            return Err(Rejection::NoItinerary.into());
        }
        let moved = session.area.cancel_passenger(line)?;

        let mut child = session.area.snapshot();
        child.passengers = vec![Passenger { line: 1, ..moved.clone() }];
        for segment in &mut child.segments {
            segment.seats = 1;
        }
        child.remarks.push(format!("SPLIT FROM {parent}"));
        for segment in &mut session.area.segments {
            segment.seats = segment.seats.saturating_sub(1).max(1);
        }

        let child_locator = generate_locator();
        let mut persisted = true;
        if let Err(e) = self.gateway.create_pnr(&child_locator, &child).await {
            warn!(locator = %child_locator, "split pnr write failed: {e:#}");
            persisted = false;
        }
        let parent_snapshot = session.area.snapshot();
        if let Err(e) = self.gateway.create_pnr(&parent, &parent_snapshot).await {
            warn!(locator = %parent, "parent pnr write failed: {e:#}");
            persisted = false;
        }

        let agent = session.agent().to_string();
        let moved_name = moved.full_name();
        self.record_history(&parent, "SPLIT", &format!("{moved_name} TO {child_locator}"), &agent)
            .await;
        self.record_history(&child_locator, "CREATED", &format!("SPLIT FROM {parent}"), &agent)
            .await;
        session.queue.enqueue(&child_locator);

        Ok(format!(
            "SPLIT PNR CREATED: {child_locator}{}\nPARENT PNR: {parent}\n{}",
            flag(persisted),
            screen(session)
        ))
    }

    /// `RH` / `RHA`.
    pub(crate) async fn history(&self, session: &Session, full: bool) -> CommandResult {
        let locator = session.area.current_pnr.as_deref().ok_or(Rejection::NoPnr)?;
        let entries = match self.gateway.history(locator).await {
            Ok(entries) => entries,
            Err(e) => {
                warn!(locator, "history lookup failed: {e:#}");
                return Err(Rejection::RetrieveUnavailable(locator.to_string()).into());
            }
        };
        if entries.is_empty() {
            return Err(Rejection::NoHistory.into());
        }
        let skip = if full { 0 } else { entries.len().saturating_sub(RECENT_HISTORY) };
        let mut lines = vec![format!("HISTORY {locator}")];
        lines.extend(entries.iter().skip(skip).map(|e| e.display_line()));
        Ok(lines.join("\n"))
    }

    // -----------------------------------------------------------------------
    // Queue
    // -----------------------------------------------------------------------

    pub(crate) fn queue_start(&self, session: &mut Session) -> CommandResult {
        if session.queue.locators.is_empty() {
            return Err(Rejection::QueueEmpty.into());
        }
        session.queue.active = true;
        Ok(format!(
            "QUEUE MODE - {} PNR(S)\n{}",
            session.queue.locators.len(),
            queue_listing(session)
        ))
    }

    pub(crate) fn queue_display(&self, session: &Session) -> CommandResult {
        if !session.queue.active {
            return Err(Rejection::NotInQueue.into());
        }
        if session.queue.locators.is_empty() {
            return Err(Rejection::QueueEmpty.into());
        }
        Ok(queue_listing(session))
    }

    pub(crate) fn queue_exit(&self, session: &mut Session) -> CommandResult {
        if !session.queue.active {
            return Err(Rejection::NotInQueue.into());
        }
        session.queue.active = false;
        Ok("QUEUE MODE EXITED".to_string())
    }
}

fn queue_listing(session: &Session) -> String {
    session
        .queue
        .locators
        .iter()
        .enumerate()
        .map(|(i, locator)| format!("{:>2} {locator}", i + 1))
        .collect::<Vec<_>>()
        .join("\n")
}
