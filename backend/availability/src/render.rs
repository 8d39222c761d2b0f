//! Fixed-column availability listings.

use asmodeus_core::calendar::{format_ddmmm, weekday_code};
use asmodeus_core::{AvailabilityResults, GeneratedFlight, SearchMode, SearchQuery};

use crate::cities::city_name;

/// Class cells printed on the flight line; the rest wrap to a second line.
const FIRST_ROW_CELLS: usize = 7;
const CONTINUATION_INDENT: usize = 12;

pub const EMPTY_PAGE: &str = "NO FLIGHTS ON THIS PAGE";

pub fn entry_code(query: &SearchQuery) -> &'static str {
    match (query.mode, query.direct_only) {
        (SearchMode::Availability, false) => "AN",
        (SearchMode::Availability, true) => "AD",
        (SearchMode::Schedule, false) => "SN",
        (SearchMode::Schedule, true) => "SD",
    }
}

/// `** AMADEUS AVAILABILITY - AN ** DOH DOHA.QA               58 TU 12JAN 0000`
pub fn header(query: &SearchQuery) -> String {
    let title = match query.mode {
        SearchMode::Availability => "AVAILABILITY",
        SearchMode::Schedule => "SCHEDULE",
    };
    format!(
        "** AMADEUS {title} - {} ** {} {:<20}  58 {} {} 0000",
        entry_code(query),
        query.requested_destination,
        city_name(&query.requested_destination),
        weekday_code(query.date),
        format_ddmmm(query.date)
    )
}

/// One flight, one or two lines, no trailing newline.
pub fn flight_line(line: usize, flight: &GeneratedFlight, mode: SearchMode) -> String {
    let cells: Vec<String> = flight
        .classes
        .iter()
        .map(|(class, seats)| match mode {
            SearchMode::Availability => format!("{class}{seats}"),
            SearchMode::Schedule => format!("{class}-"),
        })
        .collect();
    let split = cells.len().min(FIRST_ROW_CELLS);
    let first_row = cells[..split].join(" ");
    let second_row = cells[split..].join(" ");

    let route = match &flight.via {
        Some(via) => format!("/{} {} {}", flight.origin, via, flight.destination),
        None => format!("/{} {}", flight.origin, flight.destination),
    };
    let offset = if flight.day_offset > 0 {
        format!("+{}", flight.day_offset)
    } else {
        String::new()
    };

    let mut out = format!(
        "{:>2}  {} {:<4} {:<22} {:<12} {}  {:<6} {}{:>3}  E0/{}  {}",
        line,
        flight.airline,
        flight.flight_number,
        first_row,
        route,
        flight.stops,
        flight.dep_time,
        flight.arr_time,
        offset,
        flight.equipment,
        flight.elapsed_display()
    );
    if !second_row.is_empty() {
        out.push('\n');
        out.push_str(&" ".repeat(CONTINUATION_INDENT));
        out.push_str(&second_row);
    }
    out
}

/// Header, the visible window with absolute line numbers, and paging hints.
pub fn page(results: &AvailabilityResults, page_size: usize) -> String {
    let mut lines = vec![header(&results.query)];
    let total = results.flights.len();
    let start = results.cursor.min(total);
    let end = (start + page_size).min(total);

    if start == end {
        lines.push(EMPTY_PAGE.to_string());
    } else {
        for (idx, flight) in results.flights[start..end].iter().enumerate() {
            lines.push(flight_line(start + idx + 1, flight, results.query.mode));
        }
    }

    if end < total {
        let pages = total.div_ceil(page_size);
        let current = start / page_size + 1;
        lines.push(format!("MD TO SCROLL DOWN ({current}/{pages})"));
    }
    if start > 0 {
        lines.push("MU TO SCROLL UP".to_string());
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use asmodeus_core::BookingClass;
    use chrono::NaiveDate;

    fn query() -> SearchQuery {
        SearchQuery {
            requested_origin: "DEL".into(),
            requested_destination: "DOH".into(),
            origin: "DEL".into(),
            destination: "DOH".into(),
            date: NaiveDate::from_ymd_opt(2027, 1, 12).unwrap(),
            direct_only: false,
            mode: SearchMode::Availability,
        }
    }

    fn flight(via: Option<&str>, day_offset: u32) -> GeneratedFlight {
        let classes = "FJCDRIYBMHQKLVTS"
            .chars()
            .map(|c| (BookingClass::try_from(c).unwrap(), 4))
            .collect();
        GeneratedFlight {
            airline: "QR".into(),
            flight_number: 579,
            origin: "DEL".into(),
            destination: "DOH".into(),
            dep_time: "0930".into(),
            arr_time: "1145".into(),
            equipment: "350".into(),
            classes,
            stops: u32::from(via.is_some()),
            via: via.map(str::to_string),
            day_offset,
            elapsed_minutes: 255,
        }
    }

    #[test]
    fn header_layout() {
        assert_eq!(
            header(&query()),
            "** AMADEUS AVAILABILITY - AN ** DOH DOHA.QA               58 TU 12JAN 0000"
        );
    }

    #[test]
    fn direct_flight_columns() {
        let text = flight_line(1, &flight(None, 0), SearchMode::Availability);
        let mut rows = text.lines();
        assert_eq!(
            rows.next().unwrap(),
            " 1  QR 579  F4 J4 C4 D4 R4 I4 Y4   /DEL DOH     0  0930   1145     E0/350  4:15"
        );
        assert_eq!(rows.next().unwrap(), "            B4 M4 H4 Q4 K4 L4 V4 T4 S4");
    }

    #[test]
    fn connecting_flight_shows_hub_and_offset() {
        let text = flight_line(12, &flight(Some("DXB"), 1), SearchMode::Availability);
        let first = text.lines().next().unwrap();
        assert!(first.starts_with("12  QR 579 "));
        assert!(first.contains("/DEL DXB DOH 1  0930   1145 +1  E0/350"));
    }

    #[test]
    fn schedule_masks_seats() {
        let text = flight_line(1, &flight(None, 0), SearchMode::Schedule);
        assert!(text.contains("F- J- C-"));
        assert!(!text.contains("F4"));
    }

    #[test]
    fn footers_follow_window() {
        let mut results = AvailabilityResults {
            query: query(),
            flights: vec![flight(None, 0); 8],
            cursor: 0,
        };
        let first = page(&results, 6);
        assert!(first.ends_with("MD TO SCROLL DOWN (1/2)"));
        assert!(!first.contains("MU TO SCROLL UP"));

        results.cursor = 6;
        let second = page(&results, 6);
        assert!(second.contains(" 7  QR"));
        assert!(second.ends_with("MU TO SCROLL UP"));
        assert!(!second.contains("MD TO SCROLL DOWN"));
    }

    #[test]
    fn empty_window_sentinel() {
        let results = AvailabilityResults { query: query(), flights: vec![], cursor: 0 };
        assert!(page(&results, 6).ends_with(EMPTY_PAGE));
    }
}
