/// PNR screen rendering.
///
/// Names first, then the itinerary, then the remaining elements numbered on
/// from the last segment line.
use asmodeus_core::{FlightSegment, Passenger, PricedFare, Session, WorkingArea};

/// ` 1 AI 631  Y 12JAN DELBOM  HK1  0850 1050 /E`
pub fn segment_line(seg: &FlightSegment) -> String {
    format!(
        "{:>2} {:<3}{:<5}{:<2}{:<6}{:<8}{:<5}{:<5}{:<5}/E",
        seg.line,
        seg.airline,
        seg.flight_number,
        seg.class.letter(),
        seg.date,
        format!("{}{}", seg.origin, seg.destination),
        seg.status(),
        seg.dep_time,
        seg.arr_time
    )
}

/// ` 1.KUMAR/RAHUL MR`
pub fn passenger_line(pax: &Passenger) -> String {
    let mut line = format!("{:>2}.{}/{}", pax.line, pax.last_name, pax.first_name);
    if let Some(title) = &pax.title {
        line.push(' ');
        line.push_str(title);
    }
    if pax.pax_type != asmodeus_core::PaxType::Adt {
        line.push_str(&format!(" ({})", pax.pax_type.code()));
    }
    line
}

/// The working area as a PNR display. `None` when there is nothing to show.
pub fn pnr_screen(session: &Session) -> Option<String> {
    let area = &session.area;
    if !area.has_booking_data() {
        return None;
    }

    let mut lines = Vec::new();
    if let Some(locator) = &area.current_pnr {
        lines.push("--- RLR ---".to_string());
        lines.push(format!(
            "RP/{}/{:<24}{}",
            session.office.as_deref().unwrap_or("AG"),
            session.agent(),
            locator
        ));
    }
    lines.extend(area.passengers.iter().map(passenger_line));
    lines.extend(area.segments.iter().map(segment_line));
    lines.extend(element_lines(area));
    Some(lines.join("\n"))
}

fn element_lines(area: &WorkingArea) -> Vec<String> {
    let tagged = area
        .contacts
        .iter()
        .map(|t| ("AP", t))
        .chain(area.ticketing.iter().map(|t| ("TK", t)))
        .chain(area.ssr.iter().map(|t| ("SR", t)))
        .chain(area.osi.iter().map(|t| ("OSI", t)))
        .chain(area.remarks.iter().map(|t| ("RM", t)))
        .chain(area.received_from.iter().map(|t| ("RF", t)));

    let first = area.segments.len() + 1;
    tagged
        .enumerate()
        .map(|(i, (tag, text))| format!("{:>2} {tag} {text}", first + i))
        .collect()
}

/// `FXP` response body.
/// Money with thousands separators: `12,345`.
pub fn amount(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

pub fn fare_screen(fare: &PricedFare, rebooked: bool) -> String {
    let mut lines = Vec::new();
    if rebooked {
        lines.push("ITINERARY REBOOKED - LOWEST AVAILABLE FARE".to_string());
    }
    lines.push("FARE CALCULATION".to_string());
    lines.push(format!("BASE FARE:  {} {}", fare.currency, amount(fare.base())));
    lines.push(format!("TAXES:      {} {}", fare.currency, amount(fare.tax())));
    lines.push(format!("TOTAL:      {} {}", fare.currency, amount(fare.total())));
    lines.push(format!("PAX: {}", fare.pax_summary()));
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use asmodeus_core::{BookingClass, PaxType, SegmentAction};

    fn seg() -> FlightSegment {
        FlightSegment {
            line: 1,
            airline: "AI".into(),
            flight_number: "631".into(),
            class: BookingClass::try_from('Y').unwrap(),
            date: "12JAN".into(),
            origin: "DEL".into(),
            destination: "BOM".into(),
            action: SegmentAction::Hk,
            seats: 1,
            dep_time: "0850".into(),
            arr_time: "1050".into(),
        }
    }

    #[test]
    fn segment_columns() {
        assert_eq!(segment_line(&seg()), " 1 AI 631  Y 12JAN DELBOM  HK1  0850 1050 /E");
    }

    #[test]
    fn passenger_with_title_and_type() {
        let pax = Passenger {
            line: 2,
            last_name: "KUMAR".into(),
            first_name: "ANYA".into(),
            title: Some("MISS".into()),
            pax_type: PaxType::Chd,
        };
        assert_eq!(passenger_line(&pax), " 2.KUMAR/ANYA MISS (CHD)");
    }

    #[test]
    fn elements_number_after_segments() {
        let mut session = Session::new("s");
        session.sign_in("AGT", "DEL1A");
        session.area.push_segment(seg());
        session.area.contacts.push("DEL 9876543210".into());
        session.area.ticketing.push("OK".into());
        let screen = pnr_screen(&session).unwrap();
        assert!(screen.contains(" 2 AP DEL 9876543210"));
        assert!(screen.contains(" 3 TK OK"));
        assert!(!screen.contains("RP/"));
    }

    #[test]
    fn amounts_group_thousands() {
        assert_eq!(amount(0), "0");
        assert_eq!(amount(999), "999");
        assert_eq!(amount(1000), "1,000");
        assert_eq!(amount(57499), "57,499");
        assert_eq!(amount(1234567), "1,234,567");
    }

    #[test]
    fn empty_area_has_no_screen() {
        assert!(pnr_screen(&Session::new("s")).is_none());
    }
}
