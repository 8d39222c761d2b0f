use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Booking classes in the order the terminal lists them, premium first.
pub const CLASS_PRIORITY: [char; 16] = [
    'F', 'J', 'C', 'D', 'R', 'I', 'Y', 'B', 'M', 'H', 'Q', 'K', 'L', 'V', 'T', 'S',
];

/// A single-letter booking class (`Y`, `J`, ...). Always an uppercase ASCII letter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "char", into = "char")]
pub struct BookingClass(char);

impl BookingClass {
    pub fn letter(self) -> char {
        self.0
    }
}

impl TryFrom<char> for BookingClass {
    type Error = String;

    fn try_from(c: char) -> Result<Self, Self::Error> {
        if c.is_ascii_uppercase() {
            Ok(Self(c))
        } else {
            Err(format!("invalid booking class '{c}'"))
        }
    }
}

impl From<BookingClass> for char {
    fn from(class: BookingClass) -> char {
        class.0
    }
}

impl fmt::Display for BookingClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Passenger type code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PaxType {
    #[default]
    Adt,
    Chd,
    Inf,
}

impl PaxType {
    pub fn code(self) -> &'static str {
        match self {
            PaxType::Adt => "ADT",
            PaxType::Chd => "CHD",
            PaxType::Inf => "INF",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "ADT" => Some(PaxType::Adt),
            "CHD" => Some(PaxType::Chd),
            "INF" => Some(PaxType::Inf),
            _ => None,
        }
    }
}

/// How a segment entered the itinerary; rendered as the two-letter status prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SegmentAction {
    /// Holding confirmed (`SS`).
    Hk,
    /// Need, waitlist style request (`NN`).
    Nn,
    /// Reconfirmed (`RR`).
    Rr,
}

impl SegmentAction {
    pub fn code(self) -> &'static str {
        match self {
            SegmentAction::Hk => "HK",
            SegmentAction::Nn => "NN",
            SegmentAction::Rr => "RR",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "HK" => Some(SegmentAction::Hk),
            "NN" => Some(SegmentAction::Nn),
            "RR" => Some(SegmentAction::Rr),
            _ => None,
        }
    }
}

/// One itinerary line of the working area or a stored PNR.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlightSegment {
    pub line: u32,
    pub airline: String,
    pub flight_number: String,
    pub class: BookingClass,
    /// Travel date as `DDMMM`.
    pub date: String,
    pub origin: String,
    pub destination: String,
    pub action: SegmentAction,
    pub seats: u32,
    pub dep_time: String,
    pub arr_time: String,
}

impl FlightSegment {
    /// Status code such as `HK1` or `NN2`.
    pub fn status(&self) -> String {
        format!("{}{}", self.action.code(), self.seats)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Passenger {
    pub line: u32,
    pub last_name: String,
    pub first_name: String,
    pub title: Option<String>,
    #[serde(default)]
    pub pax_type: PaxType,
}

impl Passenger {
    /// `LAST/FIRST` as printed on tickets.
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.last_name, self.first_name)
    }
}

/// A synthetic flight produced by the availability generator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFlight {
    pub airline: String,
    pub flight_number: u32,
    pub origin: String,
    pub destination: String,
    pub dep_time: String,
    pub arr_time: String,
    pub equipment: String,
    /// Seats per class, in `CLASS_PRIORITY` order.
    pub classes: Vec<(BookingClass, u32)>,
    pub stops: u32,
    pub via: Option<String>,
    pub day_offset: u32,
    pub elapsed_minutes: u32,
}

impl GeneratedFlight {
    /// Seats open in `class`, or `None` when the class is not sold on this flight.
    pub fn seats_for(&self, class: BookingClass) -> Option<u32> {
        self.classes
            .iter()
            .find(|(c, _)| *c == class)
            .map(|(_, seats)| *seats)
    }

    /// Elapsed journey time as `H:MM`.
    pub fn elapsed_display(&self) -> String {
        format!("{}:{:02}", self.elapsed_minutes / 60, self.elapsed_minutes % 60)
    }
}

/// The persisted content of a PNR.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PnrSnapshot {
    pub passengers: Vec<Passenger>,
    pub segments: Vec<FlightSegment>,
    pub contacts: Vec<String>,
    pub remarks: Vec<String>,
    pub osi: Vec<String>,
    pub ssr: Vec<String>,
    pub ticketing: Vec<String>,
    pub received_from: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketRecord {
    pub ticket_number: String,
    pub locator: String,
    pub passenger_name: String,
    pub amount: u64,
    pub currency: String,
    pub agent_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub timestamp: DateTime<Utc>,
    pub agent_id: String,
    pub action: String,
    pub details: String,
}

impl HistoryEntry {
    pub fn display_line(&self) -> String {
        format!(
            "{}  {:<6}  {:<15} {}",
            self.timestamp.format("%d%b%y %H%M").to_string().to_uppercase(),
            self.agent_id,
            self.action,
            self.details
        )
    }
}

/// Fare assigned to one passenger by pricing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaxFare {
    pub passenger_line: u32,
    pub pax_type: PaxType,
    pub base: u64,
    pub tax: u64,
}

impl PaxFare {
    pub fn total(&self) -> u64 {
        self.base + self.tax
    }
}

/// A stored price quote; discarded whenever the itinerary or name list changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricedFare {
    pub currency: String,
    pub fares: Vec<PaxFare>,
}

impl PricedFare {
    pub fn base(&self) -> u64 {
        self.fares.iter().map(|f| f.base).sum()
    }

    pub fn tax(&self) -> u64 {
        self.fares.iter().map(|f| f.tax).sum()
    }

    pub fn total(&self) -> u64 {
        self.base() + self.tax()
    }

    pub fn fare_for(&self, passenger_line: u32) -> Option<&PaxFare> {
        self.fares.iter().find(|f| f.passenger_line == passenger_line)
    }

    /// Passenger mix such as `2 ADT 1 CHD`.
    pub fn pax_summary(&self) -> String {
        let mut parts = Vec::new();
        for pax_type in [PaxType::Adt, PaxType::Chd, PaxType::Inf] {
            let count = self.fares.iter().filter(|f| f.pax_type == pax_type).count();
            if count > 0 {
                parts.push(format!("{count} {}", pax_type.code()));
            }
        }
        parts.join(" ")
    }
}

/// A ticket issued from the working area.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedTicket {
    pub ticket_number: String,
    pub passenger_line: u32,
    pub passenger_name: String,
    pub amount: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn booking_class_rejects_lowercase_and_digits() {
        assert!(BookingClass::try_from('Y').is_ok());
        assert!(BookingClass::try_from('y').is_err());
        assert!(BookingClass::try_from('1').is_err());
    }

    #[test]
    fn pax_summary_groups_types() {
        let fare = PricedFare {
            currency: "INR".into(),
            fares: vec![
                PaxFare { passenger_line: 1, pax_type: PaxType::Adt, base: 100, tax: 15 },
                PaxFare { passenger_line: 2, pax_type: PaxType::Adt, base: 200, tax: 30 },
                PaxFare { passenger_line: 3, pax_type: PaxType::Chd, base: 50, tax: 7 },
            ],
        };
        assert_eq!(fare.pax_summary(), "2 ADT 1 CHD");
        assert_eq!(fare.total(), 402);
    }

    #[test]
    fn elapsed_display_pads_minutes() {
        let flight = GeneratedFlight {
            airline: "AI".into(),
            flight_number: 101,
            origin: "DEL".into(),
            destination: "DOH".into(),
            dep_time: "0900".into(),
            arr_time: "1305".into(),
            equipment: "320".into(),
            classes: vec![],
            stops: 0,
            via: None,
            day_offset: 0,
            elapsed_minutes: 245,
        };
        assert_eq!(flight.elapsed_display(), "4:05");
    }
}
