/// Simulated cabin seat maps and seat request validation.
use asmodeus_availability::SeededRandom;
use asmodeus_core::FlightSegment;
use once_cell::sync::Lazy;
use regex::Regex;

static SEAT_REQUEST: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^/?(\d{1,2})([A-K])(?:/S(\d+))?$").expect("static regex"));

struct Cabin {
    rows: std::ops::RangeInclusive<u32>,
    /// Seat letters per row; a space marks the aisle.
    layout: &'static str,
}

const PREMIUM: Cabin = Cabin { rows: 1..=6, layout: "AC DF" };
const ECONOMY: Cabin = Cabin { rows: 10..=29, layout: "ABC DEF" };

fn cabin_for(segment: &FlightSegment) -> Cabin {
    match segment.class.letter() {
        'F' | 'J' | 'C' | 'D' | 'R' | 'I' => PREMIUM,
        _ => ECONOMY,
    }
}

/// A validated `ST` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeatRequest {
    pub seat: String,
    pub segment: Option<u32>,
}

/// Parse `/12A` or `/12A/S2`. `None` when the entry is malformed.
pub fn parse_seat_request(request: &str) -> Option<SeatRequest> {
    let caps = SEAT_REQUEST.captures(request.trim())?;
    let row: u32 = caps[1].parse().ok()?;
    if row == 0 {
        return None;
    }
    let segment = match caps.get(3) {
        Some(m) => Some(m.as_str().parse().ok()?),
        None => None,
    };
    Some(SeatRequest { seat: format!("{row}{}", &caps[2]), segment })
}

/// Deterministic occupancy grid for one segment's cabin.
pub fn render_seat_map(segment: &FlightSegment) -> String {
    let cabin = cabin_for(segment);
    let key = format!(
        "SM{}{}:{}{}{}",
        segment.airline, segment.flight_number, segment.date, segment.origin, segment.destination
    );
    let mut rng = SeededRandom::from_key(&key);

    let mut lines = vec![
        format!(
            "SEAT MAP  {} {}  {}  {}{}  CLASS {}",
            segment.airline,
            segment.flight_number,
            segment.date,
            segment.origin,
            segment.destination,
            segment.class
        ),
        format!("      {}", cabin.layout),
    ];
    for row in cabin.rows.clone() {
        let cells: String = cabin
            .layout
            .chars()
            .map(|c| match c {
                ' ' => ' ',
                _ if rng.next_int(0, 9) < 4 => 'X',
                _ => '.',
            })
            .collect();
        lines.push(format!("  {row:>2}  {cells}"));
    }
    lines.push(". AVAILABLE  X OCCUPIED".to_string());
    lines.join("\n")
}
