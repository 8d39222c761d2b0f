//! Synthetic flight schedules.
//!
//! Every draw comes from a `SeededRandom` keyed on origin, destination and
//! date, in a fixed order, so a query always yields the same flight list.

use asmodeus_core::calendar::format_ddmmm;
use asmodeus_core::{BookingClass, GeneratedFlight};
use chrono::NaiveDate;
use tracing::debug;

use crate::rng::SeededRandom;

pub const AIRLINES: &[&str] = &[
    "AI", "IX", "UK", "6E", "SG", "QR", "EK", "EY", "BA", "LH", "AF", "KL", "SQ", "CX", "JL",
    "NH", "UA", "AA", "DL", "AC", "TK",
];

pub const EQUIPMENT: &[&str] = &[
    "320", "321", "737", "738", "777", "787", "350", "330", "343", "E90", "CR9",
];

const DEFAULT_HUBS: &[&str] = &["DXB", "DOH", "SIN", "FRA", "CDG"];

const DEPARTURE_MINUTES: &[u32] = &[0, 15, 30, 45];

/// Seat range per class, in listing order.
const CLASS_SEATS: [(char, u32, u32); 16] = [
    ('F', 0, 4),
    ('J', 4, 9),
    ('C', 4, 9),
    ('D', 0, 9),
    ('R', 0, 9),
    ('I', 0, 9),
    ('Y', 4, 9),
    ('B', 0, 9),
    ('M', 0, 9),
    ('H', 0, 9),
    ('Q', 0, 9),
    ('K', 0, 9),
    ('L', 0, 9),
    ('V', 0, 4),
    ('T', 0, 4),
    ('S', 0, 4),
];

const DIRECT_COUNT: (u32, u32) = (3, 8);
const CONNECTION_ATTEMPTS: (u32, u32) = (2, 5);
const DIRECT_DURATION: (u32, u32) = (120, 960);
const CONNECTING_DURATION: (u32, u32) = (240, 1200);

const MINUTES_PER_DAY: u32 = 24 * 60;

/// Connection points an airline routes through.
pub fn hubs_for(airline: &str) -> &'static [&'static str] {
    match airline {
        "AI" => &["DEL", "BOM", "MAA", "BLR"],
        "EK" => &["DXB"],
        "QR" => &["DOH"],
        "BA" => &["LHR"],
        "LH" => &["FRA", "MUC"],
        "AF" => &["CDG"],
        "SQ" => &["SIN"],
        "UA" => &["ORD", "IAD", "SFO"],
        "AA" => &["DFW", "ORD", "JFK"],
        "DL" => &["ATL", "DTW", "MSP"],
        _ => DEFAULT_HUBS,
    }
}

pub struct FlightGenerator;

impl FlightGenerator {
    /// Generate the flight list for one route and date, sorted by elapsed time.
    pub fn generate(
        origin: &str,
        destination: &str,
        date: NaiveDate,
        direct_only: bool,
    ) -> Vec<GeneratedFlight> {
        let key = format!("{origin}{destination}:{}", format_ddmmm(date));
        let mut rng = SeededRandom::from_key(&key);
        let mut flights = Vec::new();

        let direct = rng.next_int(DIRECT_COUNT.0, DIRECT_COUNT.1);
        for _ in 0..direct {
            let airline = *rng.choice(AIRLINES);
            flights.push(build_flight(&mut rng, airline, origin, destination, None, DIRECT_DURATION));
        }

        if !direct_only {
            let attempts = rng.next_int(CONNECTION_ATTEMPTS.0, CONNECTION_ATTEMPTS.1);
            for _ in 0..attempts {
                let airline = *rng.choice(AIRLINES);
                let hub = *rng.choice(hubs_for(airline));
                if hub == origin || hub == destination {
                    continue;
                }
                flights.push(build_flight(
                    &mut rng,
                    airline,
                    origin,
                    destination,
                    Some(hub),
                    CONNECTING_DURATION,
                ));
            }
        }

        // Stable: ties keep generation order.
        flights.sort_by_key(|f| f.elapsed_minutes);
        debug!(key = %key, count = flights.len(), "generated flights");
        flights
    }
}

fn build_flight(
    rng: &mut SeededRandom,
    airline: &str,
    origin: &str,
    destination: &str,
    via: Option<&str>,
    duration_range: (u32, u32),
) -> GeneratedFlight {
    let flight_number = rng.next_int(100, 9999);
    let dep_hour = rng.next_int(0, 23);
    let dep_minute = *rng.choice(DEPARTURE_MINUTES);
    let duration = rng.next_int(duration_range.0, duration_range.1);
    let equipment = *rng.choice(EQUIPMENT);
    let classes = class_inventory(rng);

    let departure = dep_hour * 60 + dep_minute;
    let arrival = departure + duration;

    GeneratedFlight {
        airline: airline.to_string(),
        flight_number,
        origin: origin.to_string(),
        destination: destination.to_string(),
        dep_time: clock_time(departure),
        arr_time: clock_time(arrival % MINUTES_PER_DAY),
        equipment: equipment.to_string(),
        classes,
        stops: u32::from(via.is_some()),
        via: via.map(str::to_string),
        day_offset: arrival / MINUTES_PER_DAY,
        elapsed_minutes: duration,
    }
}

fn class_inventory(rng: &mut SeededRandom) -> Vec<(BookingClass, u32)> {
    let mut classes = Vec::with_capacity(CLASS_SEATS.len());
    for (letter, min, max) in CLASS_SEATS {
        // Draw first so the stream position never depends on the letter check.
        let seats = rng.next_int(min, max);
        if let Ok(class) = BookingClass::try_from(letter) {
            classes.push((class, seats));
        }
    }
    classes
}

fn clock_time(minutes: u32) -> String {
    format!("{:02}{:02}", minutes / 60, minutes % 60)
}
