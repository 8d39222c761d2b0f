/// Cryptic entry parser: raw terminal line to typed intent.
///
/// Rules are tried in table order and the first one that both matches and
/// extracts its payload wins. A rule whose payload cannot be built (a seat
/// count that overflows, say) is skipped and matching continues. Lines that
/// match nothing parse as `Unknown`; parsing never fails.
use asmodeus_core::{BookingClass, CommandIntent, CommandKind};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use tracing::debug;

// ---------------------------------------------------------------------------
// Rule table
// ---------------------------------------------------------------------------

enum Matcher {
    /// Whole line equals the literal.
    Exact(&'static str),
    /// Line starts with the literal; the remainder is the tail.
    Prefix(&'static str),
    /// Anchored pattern; capture groups are the payload.
    Pattern(Regex),
}

/// What a matcher extracted from the line.
struct Fields<'a> {
    tail: &'a str,
    caps: Option<Captures<'a>>,
}

impl<'a> Fields<'a> {
    fn group(&self, idx: usize) -> Option<&'a str> {
        self.caps
            .as_ref()
            .and_then(|c| c.get(idx))
            .map(|m| m.as_str())
    }

    fn text(&self, idx: usize) -> Option<String> {
        self.group(idx).map(|s| s.trim().to_string())
    }

    fn number(&self, idx: usize) -> Option<u32> {
        self.group(idx)?.parse().ok()
    }

    fn class(&self, idx: usize) -> Option<BookingClass> {
        let letter = self.group(idx)?.chars().next()?;
        BookingClass::try_from(letter).ok()
    }

    fn optional(&self, idx: usize) -> Option<String> {
        self.text(idx).filter(|s| !s.is_empty())
    }
}

struct Rule {
    matcher: Matcher,
    build: fn(&Fields<'_>) -> Option<CommandKind>,
}

fn exact(literal: &'static str, build: fn(&Fields<'_>) -> Option<CommandKind>) -> Rule {
    Rule { matcher: Matcher::Exact(literal), build }
}

fn prefix(literal: &'static str, build: fn(&Fields<'_>) -> Option<CommandKind>) -> Rule {
    Rule { matcher: Matcher::Prefix(literal), build }
}

fn pattern(re: &str, build: fn(&Fields<'_>) -> Option<CommandKind>) -> Rule {
    let regex = Regex::new(re).unwrap_or_else(|e| panic!("invalid rule pattern {re}: {e}"));
    Rule { matcher: Matcher::Pattern(regex), build }
}

impl Rule {
    fn apply(&self, line: &str) -> Option<CommandKind> {
        let fields = match &self.matcher {
            Matcher::Exact(lit) => (line == *lit).then_some(Fields { tail: "", caps: None })?,
            Matcher::Prefix(lit) => Fields { tail: line.strip_prefix(lit)?, caps: None },
            Matcher::Pattern(re) => Fields { tail: "", caps: Some(re.captures(line)?) },
        };
        (self.build)(&fields)
    }
}

fn segment_request(fields: &Fields<'_>) -> Option<(u32, BookingClass, u32)> {
    Some((fields.number(1)?, fields.class(2)?, fields.number(3)?))
}

static RULES: Lazy<Vec<Rule>> = Lazy::new(|| {
    vec![
        // Help comes before anything starting with H.
        exact("HELP", |_| Some(CommandKind::Help { topic: None })),
        pattern(r"^HE(?:\s+(\S.*))?$", |f| Some(CommandKind::Help { topic: f.optional(1) })),
        // Session
        pattern(r"^JI\s*([A-Z0-9]*)(?:/([A-Z0-9]*))?$", |f| {
            Some(CommandKind::SignIn {
                agent_id: f.optional(1).unwrap_or_else(|| "AGENT".to_string()),
                office: f.optional(2).unwrap_or_else(|| "AG".to_string()),
            })
        }),
        exact("JO", |_| Some(CommandKind::SignOut)),
        // Availability and schedule
        prefix("AN", |f| {
            Some(CommandKind::Availability { params: f.tail.to_string(), direct_only: false })
        }),
        prefix("AD", |f| {
            Some(CommandKind::Availability { params: f.tail.to_string(), direct_only: true })
        }),
        prefix("SN", |f| {
            Some(CommandKind::Schedule { params: f.tail.to_string(), direct_only: false })
        }),
        prefix("SD", |f| {
            Some(CommandKind::Schedule { params: f.tail.to_string(), direct_only: true })
        }),
        exact("MD", |_| Some(CommandKind::MoveDown)),
        exact("MU", |_| Some(CommandKind::MoveUp)),
        exact("MT", |_| Some(CommandKind::MoveTop)),
        exact("MB", |_| Some(CommandKind::MoveBottom)),
        exact("MN", |_| Some(CommandKind::NextDay)),
        exact("MY", |_| Some(CommandKind::PriorDay)),
        pattern(r"^AC(\d{2}[A-Z]{3})$", |f| Some(CommandKind::ChangeDate { date: f.text(1)? })),
        // Itinerary
        pattern(r"^SS(\d+)([A-Z])(\d+)$", |f| {
            let (seats, class, line) = segment_request(f)?;
            Some(CommandKind::Sell { seats, class, line })
        }),
        pattern(r"^NN(\d+)([A-Z])(\d+)$", |f| {
            let (seats, class, line) = segment_request(f)?;
            Some(CommandKind::Need { seats, class, line })
        }),
        pattern(r"^RR(\d+)([A-Z])(\d+)$", |f| {
            let (seats, class, line) = segment_request(f)?;
            Some(CommandKind::Reconfirm { seats, class, line })
        }),
        // Names
        prefix("NM", |f| Some(CommandKind::Name { field: f.tail.trim().to_string() })),
        pattern(r"^(\d+)/([A-Z]+)/([A-Z\s]+)$", |f| {
            Some(CommandKind::ChangeName {
                line: f.number(1)?,
                last_name: f.text(2)?,
                first_name: f.text(3)?,
            })
        }),
        // Elements
        pattern(r"^AP\s+(.+)$", |f| Some(CommandKind::Contact { text: f.text(1)? })),
        pattern(r"^SR\s+(.+)$", |f| Some(CommandKind::Ssr { text: f.text(1)? })),
        prefix("ST", |f| Some(CommandKind::SeatRequest { request: f.tail.trim().to_string() })),
        pattern(r"^SM(\d*)$", |f| Some(CommandKind::SeatMap { segment: f.number(1) })),
        prefix("TK", |f| {
            Some(CommandKind::TicketingElement { element: f.tail.trim().to_string() })
        }),
        // Pricing and ticketing
        prefix("FQ", |f| Some(CommandKind::FareQuote { params: f.tail.trim().to_string() })),
        pattern(r"^FXP(?:/(.*))?$", |f| {
            Some(CommandKind::Price { rebook: false, options: f.optional(1) })
        }),
        exact("FXB", |_| Some(CommandKind::Price { rebook: true, options: None })),
        pattern(r"^TTP(?:/(.*))?$", |f| Some(CommandKind::Ticket { options: f.optional(1) })),
        exact("TWD", |_| Some(CommandKind::TicketDisplay)),
        // PNR lifecycle
        pattern(r"^RT\s*([A-Z0-9]+)?$", |f| Some(CommandKind::Retrieve { locator: f.optional(1) })),
        exact("ER", |_| Some(CommandKind::EndRetrieve)),
        exact("ET", |_| Some(CommandKind::EndTransaction)),
        exact("IG", |_| Some(CommandKind::Ignore { retrieve: false })),
        exact("IR", |_| Some(CommandKind::Ignore { retrieve: true })),
        // Cancellation, split, history
        pattern(r"^XE(\d+)$", |f| Some(CommandKind::CancelSegment { segment: f.number(1)? })),
        exact("XI", |_| Some(CommandKind::CancelItinerary)),
        pattern(r"^XN(\d+)$", |f| Some(CommandKind::CancelName { passenger: f.number(1)? })),
        pattern(r"^SP(\d+)$", |f| Some(CommandKind::Split { passenger: f.number(1)? })),
        exact("RHA", |_| Some(CommandKind::History { full: true })),
        exact("RH", |_| Some(CommandKind::History { full: false })),
        // Queue
        exact("QS", |_| Some(CommandKind::QueueStart)),
        exact("QD", |_| Some(CommandKind::QueueDisplay)),
        exact("QE", |_| Some(CommandKind::QueueExit)),
        // Free text
        pattern(r"^OSI\s+(.+)$", |f| Some(CommandKind::Osi { text: f.text(1)? })),
        pattern(r"^RM\s+(.+)$", |f| Some(CommandKind::Remark { text: f.text(1)? })),
        pattern(r"^RC(?:\s+(.+))?$", |f| Some(CommandKind::ReceivedFrom { name: f.optional(1) })),
    ]
});

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

/// Parse one terminal line. Matching is case-insensitive.
pub fn parse(raw: &str) -> CommandIntent {
    let line = raw.trim().to_uppercase();
    let kind = RULES
        .iter()
        .find_map(|rule| rule.apply(&line))
        .unwrap_or(CommandKind::Unknown);
    debug!(line = %line, kind = kind.name(), "parsed entry");
    CommandIntent::new(line, kind)
}
