//! Typed command intents produced by the parser.

use crate::types::BookingClass;

/// One parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandIntent {
    /// The normalised (trimmed, upper-cased) entry.
    pub raw: String,
    pub kind: CommandKind,
}

impl CommandIntent {
    pub fn new(raw: impl Into<String>, kind: CommandKind) -> Self {
        Self { raw: raw.into(), kind }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandKind {
    // Session
    SignIn { agent_id: String, office: String },
    SignOut,

    // Availability and schedule
    Availability { params: String, direct_only: bool },
    Schedule { params: String, direct_only: bool },
    MoveDown,
    MoveUp,
    MoveTop,
    MoveBottom,
    NextDay,
    PriorDay,
    ChangeDate { date: String },

    // Itinerary
    Sell { seats: u32, class: BookingClass, line: u32 },
    Need { seats: u32, class: BookingClass, line: u32 },
    Reconfirm { seats: u32, class: BookingClass, line: u32 },

    // Names and elements
    Name { field: String },
    ChangeName { line: u32, last_name: String, first_name: String },
    Contact { text: String },
    Ssr { text: String },
    SeatRequest { request: String },
    SeatMap { segment: Option<u32> },
    TicketingElement { element: String },
    Osi { text: String },
    Remark { text: String },
    ReceivedFrom { name: Option<String> },

    // Pricing and ticketing
    FareQuote { params: String },
    Price { rebook: bool, options: Option<String> },
    Ticket { options: Option<String> },
    TicketDisplay,

    // PNR lifecycle
    Retrieve { locator: Option<String> },
    EndRetrieve,
    EndTransaction,
    Ignore { retrieve: bool },

    // Cancellation and split
    CancelSegment { segment: u32 },
    CancelItinerary,
    CancelName { passenger: u32 },
    Split { passenger: u32 },
    History { full: bool },

    // Queue
    QueueStart,
    QueueDisplay,
    QueueExit,

    Help { topic: Option<String> },
    Unknown,
}

impl CommandKind {
    /// Stable label used in command logs.
    pub fn name(&self) -> &'static str {
        match self {
            CommandKind::SignIn { .. } => "SIGN_IN",
            CommandKind::SignOut => "SIGN_OUT",
            CommandKind::Availability { .. } => "AVAILABILITY",
            CommandKind::Schedule { .. } => "SCHEDULE",
            CommandKind::MoveDown => "MOVE_DOWN",
            CommandKind::MoveUp => "MOVE_UP",
            CommandKind::MoveTop => "MOVE_TOP",
            CommandKind::MoveBottom => "MOVE_BOTTOM",
            CommandKind::NextDay => "NEXT_DAY",
            CommandKind::PriorDay => "PRIOR_DAY",
            CommandKind::ChangeDate { .. } => "CHANGE_DATE",
            CommandKind::Sell { .. } => "SELL",
            CommandKind::Need { .. } => "NEED",
            CommandKind::Reconfirm { .. } => "RECONFIRM",
            CommandKind::Name { .. } => "NAME",
            CommandKind::ChangeName { .. } => "NAME_CHANGE",
            CommandKind::Contact { .. } => "CONTACT",
            CommandKind::Ssr { .. } => "SSR",
            CommandKind::SeatRequest { .. } => "SEAT_REQUEST",
            CommandKind::SeatMap { .. } => "SEAT_MAP",
            CommandKind::TicketingElement { .. } => "TICKETING_ELEMENT",
            CommandKind::Osi { .. } => "OSI",
            CommandKind::Remark { .. } => "REMARK",
            CommandKind::ReceivedFrom { .. } => "RECEIVED_FROM",
            CommandKind::FareQuote { .. } => "FARE_QUOTE",
            CommandKind::Price { .. } => "PRICE",
            CommandKind::Ticket { .. } => "TICKET",
            CommandKind::TicketDisplay => "TICKET_DISPLAY",
            CommandKind::Retrieve { .. } => "RETRIEVE",
            CommandKind::EndRetrieve => "END_RETRIEVE",
            CommandKind::EndTransaction => "END_TRANSACTION",
            CommandKind::Ignore { .. } => "IGNORE",
            CommandKind::CancelSegment { .. } => "CANCEL_SEGMENT",
            CommandKind::CancelItinerary => "CANCEL_ITINERARY",
            CommandKind::CancelName { .. } => "CANCEL_NAME",
            CommandKind::Split { .. } => "SPLIT",
            CommandKind::History { .. } => "HISTORY",
            CommandKind::QueueStart => "QUEUE_START",
            CommandKind::QueueDisplay => "QUEUE_DISPLAY",
            CommandKind::QueueExit => "QUEUE_EXIT",
            CommandKind::Help { .. } => "HELP",
            CommandKind::Unknown => "UNKNOWN",
        }
    }
}
