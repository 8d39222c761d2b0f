/// Command processor: route parsed intents to their handlers.
///
/// Each command runs against a draft copy of the session. The draft replaces
/// the session only when the handler succeeds, so a rejected or failed
/// command never leaves a half-applied change behind.
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use asmodeus_availability::AvailabilityService;
use asmodeus_core::{
    Clock, CommandIntent, CommandKind, PersistenceGateway, Rejection, SearchMode, SegmentAction,
    Session, SystemClock,
};
use futures::FutureExt;
use tracing::{debug, error, info, warn};

use crate::handlers::{ElementKind, EndMode};
use crate::registry::HelpRegistry;
use crate::types::{CommandError, CommandResult, SYSTEM_ERROR};

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Simulated fare and ticketing parameters.
#[derive(Debug, Clone)]
pub struct PricingOptions {
    pub currency: String,
    pub tax_percent: u64,
    pub base_fare_min: u64,
    pub base_fare_max: u64,
    pub ticket_prefix: String,
}

impl Default for PricingOptions {
    fn default() -> Self {
        Self {
            currency: "INR".to_string(),
            tax_percent: 15,
            base_fare_min: 10_000,
            base_fare_max: 59_999,
            ticket_prefix: "176".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Processor
// ---------------------------------------------------------------------------

pub struct CommandProcessor {
    pub(crate) gateway: Arc<dyn PersistenceGateway>,
    pub(crate) availability: AvailabilityService,
    pub(crate) pricing: PricingOptions,
    pub(crate) help: HelpRegistry,
    pub(crate) clock: Arc<dyn Clock>,
}

impl CommandProcessor {
    pub fn new(gateway: Arc<dyn PersistenceGateway>) -> Self {
        Self {
            gateway,
            availability: AvailabilityService::default(),
            pricing: PricingOptions::default(),
            help: HelpRegistry::new(),
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_availability(mut self, availability: AvailabilityService) -> Self {
        self.availability = availability;
        self
    }

    pub fn with_pricing(mut self, pricing: PricingOptions) -> Self {
        self.pricing = pricing;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Process one intent against `session` and return the terminal response.
    pub async fn process(&self, session: &mut Session, intent: &CommandIntent) -> String {
        if let Err(e) = self
            .gateway
            .log_command(&session.id, intent.kind.name(), &intent.raw)
            .await
        {
            warn!(session = %session.id, "command log write failed: {e:#}");
        }

        if !session.signed_in && !matches!(intent.kind, CommandKind::SignIn { .. }) {
            return Rejection::SecuredArea.to_string();
        }

        info!("[Commands] {} in session {}", intent.kind.name(), session.id);
        let mut draft = session.clone();
        let outcome = AssertUnwindSafe(self.dispatch(&mut draft, &intent.kind))
            .catch_unwind()
            .await;

        match outcome {
            Ok(Ok(text)) => {
                *session = draft;
                text
            }
            Ok(Err(CommandError::Rejected(rejection))) => {
                debug!(session = %session.id, %rejection, "command rejected");
                rejection.to_string()
            }
            Ok(Err(CommandError::Fault(e))) => {
                error!(session = %session.id, raw = %intent.raw, "command fault: {e:#}");
                SYSTEM_ERROR.to_string()
            }
            Err(_) => {
                error!(session = %session.id, raw = %intent.raw, "command handler panicked");
                SYSTEM_ERROR.to_string()
            }
        }
    }

    async fn dispatch(&self, session: &mut Session, kind: &CommandKind) -> CommandResult {
        let today = self.clock.today();
        match kind {
            CommandKind::SignIn { agent_id, office } => {
                self.sign_in(session, agent_id, office).await
            }
            CommandKind::SignOut => self.sign_out(session).await,

            CommandKind::Availability { params, direct_only } => Ok(self.availability.search(
                &mut session.area,
                params,
                *direct_only,
                SearchMode::Availability,
                today,
            )?),
            CommandKind::Schedule { params, direct_only } => Ok(self.availability.search(
                &mut session.area,
                params,
                *direct_only,
                SearchMode::Schedule,
                today,
            )?),
            CommandKind::MoveDown => Ok(self.availability.move_down(&mut session.area)?),
            CommandKind::MoveUp => Ok(self.availability.move_up(&mut session.area)?),
            CommandKind::MoveTop => Ok(self.availability.move_top(&mut session.area)?),
            CommandKind::MoveBottom => Ok(self.availability.move_bottom(&mut session.area)?),
            CommandKind::NextDay => Ok(self.availability.shift_day(&mut session.area, 1, today)?),
            CommandKind::PriorDay => {
                Ok(self.availability.shift_day(&mut session.area, -1, today)?)
            }
            CommandKind::ChangeDate { date } => {
                Ok(self.availability.change_date(&mut session.area, date, today)?)
            }

            CommandKind::Sell { seats, class, line } => {
                self.sell(session, *seats, *class, *line, SegmentAction::Hk)
            }
            CommandKind::Need { seats, class, line } => {
                self.sell(session, *seats, *class, *line, SegmentAction::Nn)
            }
            CommandKind::Reconfirm { seats, class, line } => {
                self.reconfirm(session, *seats, *class, *line)
            }

            CommandKind::Name { field } => self.add_names(session, field),
            CommandKind::ChangeName { line, last_name, first_name } => {
                self.change_name(session, *line, last_name, first_name)
            }
            CommandKind::Contact { text } => self.add_element(session, ElementKind::Contact, text),
            CommandKind::Ssr { text } => self.add_element(session, ElementKind::Ssr, text),
            CommandKind::Osi { text } => self.add_element(session, ElementKind::Osi, text),
            CommandKind::Remark { text } => self.add_element(session, ElementKind::Remark, text),
            CommandKind::TicketingElement { element } => {
                self.add_element(session, ElementKind::Ticketing, element)
            }
            CommandKind::ReceivedFrom { name } => self.received_from(session, name.as_deref()),
            CommandKind::SeatRequest { request } => self.seat_request(session, request),
            CommandKind::SeatMap { segment } => self.seat_map(session, *segment),

            CommandKind::FareQuote { params } => self.fare_quote(session, params),
            CommandKind::Price { rebook, options } => {
                self.price(session, *rebook, options.as_deref())
            }
            CommandKind::Ticket { options } => self.ticket(session, options.as_deref()).await,
            CommandKind::TicketDisplay => self.ticket_display(session),

            CommandKind::Retrieve { locator } => self.retrieve(session, locator.as_deref()).await,
            CommandKind::EndRetrieve => self.end_transaction(session, EndMode::Retrieve).await,
            CommandKind::EndTransaction => self.end_transaction(session, EndMode::Close).await,
            CommandKind::Ignore { retrieve } => self.ignore(session, *retrieve).await,

            CommandKind::CancelSegment { segment } => self.cancel_segment(session, *segment),
            CommandKind::CancelItinerary => self.cancel_itinerary(session),
            CommandKind::CancelName { passenger } => self.cancel_name(session, *passenger),
            CommandKind::Split { passenger } => self.split(session, *passenger).await,
            CommandKind::History { full } => self.history(session, *full).await,

            CommandKind::QueueStart => self.queue_start(session),
            CommandKind::QueueDisplay => self.queue_display(session),
            CommandKind::QueueExit => self.queue_exit(session),

            CommandKind::Help { topic } => self.help(topic.as_deref()),
            CommandKind::Unknown => Err(CommandError::Rejected(Rejection::CheckEntry)),
        }
    }
}
