use asmodeus_core::calendar::{format_ddmmm, parse_ddmmm};
use asmodeus_core::{
    BookingClass, FlightSegment, PaxType, Passenger, Rejection, SegmentAction, Session,
};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::info;

use super::screen;
use crate::dispatch::CommandProcessor;
use crate::seatmap::{parse_seat_request, render_seat_map};
use crate::types::CommandResult;

static NAME_FIELD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+)([A-Z][A-Z' -]*)/(.+)$").expect("static regex"));
static TIME_LIMIT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^TL(\d{2}[A-Z]{3})$").expect("static regex"));

const TITLES: &[&str] = &["MR", "MRS", "MS", "MISS", "MSTR", "DR"];

/// Free-text elements the working area collects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ElementKind {
    Contact,
    Ssr,
    Osi,
    Remark,
    Ticketing,
}

impl CommandProcessor {
    // -----------------------------------------------------------------------
    // Itinerary
    // -----------------------------------------------------------------------

    /// `SS` / `NN`: take seats from a line of the stored availability.
    pub(crate) fn sell(
        &self,
        session: &mut Session,
        seats: u32,
        class: BookingClass,
        line: u32,
        action: SegmentAction,
    ) -> CommandResult {
        let area = &mut session.area;
        let results = area.availability.as_mut().ok_or(Rejection::NoAvailability)?;
        if seats == 0 {
            return Err(Rejection::InvalidSeatCount.into());
        }
        let idx = (line as usize)
            .checked_sub(1)
            .filter(|idx| *idx < results.flights.len())
            .ok_or(Rejection::InvalidLine)?;
        let date = format_ddmmm(results.query.date);
        let flight = &mut results.flights[idx];

        let open = flight.seats_for(class).ok_or(Rejection::InvalidClass)?;
        if open < seats {
            return Err(Rejection::NoSeats.into());
        }
        if action == SegmentAction::Hk {
            if let Some(entry) = flight.classes.iter_mut().find(|(c, _)| *c == class) {
                entry.1 -= seats;
            }
        }

        let segment = FlightSegment {
            line: 0,
            airline: flight.airline.clone(),
            flight_number: flight.flight_number.to_string(),
            class,
            date,
            origin: flight.origin.clone(),
            destination: flight.destination.clone(),
            action,
            seats,
            dep_time: flight.dep_time.clone(),
            arr_time: flight.arr_time.clone(),
        };
        let segment_line = area.push_segment(segment);
        info!(session = %session.id, segment_line, status = action.code(), "[Commands] segment added");
        Ok(screen(session))
    }

    /// `RR`: reconfirm an itinerary segment.
    pub(crate) fn reconfirm(
        &self,
        session: &mut Session,
        seats: u32,
        class: BookingClass,
        line: u32,
    ) -> CommandResult {
        let area = &mut session.area;
        if area.segments.is_empty() {
            return Err(Rejection::NoItinerary.into());
        }
        if seats == 0 {
            return Err(Rejection::InvalidSeatCount.into());
        }
        let segment = area
            .segments
            .iter_mut()
            .find(|s| s.line == line)
            .ok_or(Rejection::InvalidSegment)?;
        if segment.class != class {
            return Err(Rejection::InvalidClass.into());
        }
        segment.action = SegmentAction::Rr;
        segment.seats = seats;
        area.priced_fare = None;
        Ok(screen(session))
    }

    pub(crate) fn cancel_segment(&self, session: &mut Session, line: u32) -> CommandResult {
        session.area.cancel_segment(line)?;
        Ok(format!("SEGMENT {line} CANCELLED"))
    }

    pub(crate) fn cancel_itinerary(&self, session: &mut Session) -> CommandResult {
        session.area.cancel_itinerary()?;
        Ok("ITINERARY CANCELLED".to_string())
    }

    // -----------------------------------------------------------------------
    // Names
    // -----------------------------------------------------------------------

    pub(crate) fn add_names(&self, session: &mut Session, field: &str) -> CommandResult {
        let passengers = parse_name_field(field)?;
        for pax in passengers {
            session.area.push_passenger(pax);
        }
        Ok(screen(session))
    }

    pub(crate) fn change_name(
        &self,
        session: &mut Session,
        line: u32,
        last_name: &str,
        first_name: &str,
    ) -> CommandResult {
        let (first, title, _) = parse_given_name(first_name)?;
        session.area.rename_passenger(line, last_name, &first)?;
        if let Some(pax) = session.area.passengers.iter_mut().find(|p| p.line == line) {
            pax.title = title;
        }
        Ok(screen(session))
    }

    pub(crate) fn cancel_name(&self, session: &mut Session, line: u32) -> CommandResult {
        session.area.cancel_passenger(line)?;
        Ok(format!("NAME {line} CANCELLED"))
    }

    // -----------------------------------------------------------------------
    // Elements
    // -----------------------------------------------------------------------

    pub(crate) fn add_element(
        &self,
        session: &mut Session,
        kind: ElementKind,
        text: &str,
    ) -> CommandResult {
        let text = text.trim();
        if text.is_empty() {
            return Err(Rejection::CheckEntry.into());
        }
        let area = &mut session.area;
        match kind {
            ElementKind::Contact => area.contacts.push(text.to_string()),
            ElementKind::Ssr => area.ssr.push(text.to_string()),
            ElementKind::Osi => area.osi.push(text.to_string()),
            ElementKind::Remark => area.remarks.push(text.to_string()),
            ElementKind::Ticketing => {
                validate_ticketing(text, self.clock.today())?;
                // One ticketing arrangement per PNR.
                area.ticketing = vec![text.to_string()];
            }
        }
        Ok(screen(session))
    }

    pub(crate) fn received_from(&self, session: &mut Session, name: Option<&str>) -> CommandResult {
        let name = name.map(str::to_string).unwrap_or_else(|| session.agent().to_string());
        session.area.received_from = Some(name);
        Ok(screen(session))
    }

    /// `ST/12A[/S2]`: stored as a seat SSR against the segment.
    pub(crate) fn seat_request(&self, session: &mut Session, request: &str) -> CommandResult {
        let area = &mut session.area;
        if area.segments.is_empty() {
            return Err(Rejection::NoItinerary.into());
        }
        let request = parse_seat_request(request).ok_or(Rejection::InvalidSeat)?;
        let line = request.segment.unwrap_or(1);
        let segment = area.segment(line).ok_or(Rejection::InvalidSegment)?;
        let ssr = format!(
            "RQST {}{} {}{} {}/S{}",
            segment.airline,
            segment.flight_number,
            segment.origin,
            segment.destination,
            request.seat,
            line
        );
        area.ssr.push(ssr);
        Ok(screen(session))
    }

    pub(crate) fn seat_map(&self, session: &Session, segment: Option<u32>) -> CommandResult {
        let area = &session.area;
        if area.segments.is_empty() {
            return Err(Rejection::NoItinerary.into());
        }
        let segment = area.segment(segment.unwrap_or(1)).ok_or(Rejection::InvalidSegment)?;
        Ok(render_seat_map(segment))
    }
}

/// `1KUMAR/RAHUL MR` or `2SHARMA/ANIL MR/ANITA MRS`. The count must match the given names.
pub(crate) fn parse_name_field(field: &str) -> Result<Vec<Passenger>, Rejection> {
    let caps = NAME_FIELD.captures(field.trim()).ok_or(Rejection::InvalidNameFormat)?;
    let count: usize = caps[1].parse().map_err(|_| Rejection::InvalidNameFormat)?;
    let surname = caps[2].trim().to_string();
    let given: Vec<&str> = caps[3].split('/').map(str::trim).filter(|g| !g.is_empty()).collect();
    if count == 0 || given.len() != count {
        return Err(Rejection::InvalidNameFormat);
    }

    given
        .into_iter()
        .map(|g| {
            let (first_name, title, pax_type) = parse_given_name(g)?;
            Ok(Passenger {
                line: 0,
                last_name: surname.clone(),
                first_name,
                title,
                pax_type,
            })
        })
        .collect()
}

/// Split `RAHUL MR (CHD)` into given name, title and passenger type.
fn parse_given_name(text: &str) -> Result<(String, Option<String>, PaxType), Rejection> {
    let mut text = text.trim();
    let mut pax_type = PaxType::Adt;
    for (suffix, kind) in [("(CHD)", PaxType::Chd), ("(INF)", PaxType::Inf), ("(ADT)", PaxType::Adt)] {
        if let Some(rest) = text.strip_suffix(suffix) {
            text = rest.trim_end();
            pax_type = kind;
        }
    }

    let mut tokens: Vec<&str> = text.split_whitespace().collect();
    let title = match tokens.last() {
        Some(last) if tokens.len() > 1 && TITLES.contains(last) => {
            let title = last.to_string();
            tokens.pop();
            Some(title)
        }
        _ => None,
    };
    let first = tokens.join(" ");
    let valid = !first.is_empty()
        && first.chars().all(|c| c.is_ascii_uppercase() || c == ' ' || c == '-' || c == '\'');
    if !valid {
        return Err(Rejection::InvalidNameFormat);
    }
    Ok((first, title, pax_type))
}

/// `OK`, or a time limit `TLddMMM` naming a real date.
fn validate_ticketing(element: &str, today: chrono::NaiveDate) -> Result<(), Rejection> {
    if element == "OK" {
        return Ok(());
    }
    let caps = TIME_LIMIT.captures(element).ok_or(Rejection::CheckEntry)?;
    parse_ddmmm(&caps[1], today).map(|_| ()).ok_or(Rejection::InvalidDate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_name_with_title() {
        let pax = parse_name_field("1KUMAR/RAHUL MR").unwrap();
        assert_eq!(pax.len(), 1);
        assert_eq!(pax[0].last_name, "KUMAR");
        assert_eq!(pax[0].first_name, "RAHUL");
        assert_eq!(pax[0].title.as_deref(), Some("MR"));
        assert_eq!(pax[0].pax_type, PaxType::Adt);
    }

    #[test]
    fn several_names_and_child() {
        let pax = parse_name_field("3SHARMA/ANIL MR/ANITA MRS/RIYA (CHD)").unwrap();
        assert_eq!(pax.len(), 3);
        assert_eq!(pax[2].first_name, "RIYA");
        assert_eq!(pax[2].pax_type, PaxType::Chd);
        assert!(pax.iter().all(|p| p.last_name == "SHARMA"));
    }

    #[test]
    fn count_must_match() {
        assert_eq!(parse_name_field("2KUMAR/RAHUL"), Err(Rejection::InvalidNameFormat));
        assert_eq!(parse_name_field("0KUMAR/RAHUL"), Err(Rejection::InvalidNameFormat));
        assert_eq!(parse_name_field("KUMAR/RAHUL"), Err(Rejection::InvalidNameFormat));
        assert_eq!(parse_name_field("1KUMAR/"), Err(Rejection::InvalidNameFormat));
        assert_eq!(parse_name_field(""), Err(Rejection::InvalidNameFormat));
    }

    #[test]
    fn title_alone_is_a_given_name() {
        let pax = parse_name_field("1SMITH/DR").unwrap();
        assert_eq!(pax[0].first_name, "DR");
        assert_eq!(pax[0].title, None);
    }

    #[test]
    fn ticketing_elements() {
        let today = chrono::NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();
        assert!(validate_ticketing("OK", today).is_ok());
        assert!(validate_ticketing("TL20OCT", today).is_ok());
        assert_eq!(validate_ticketing("TL31FEB", today), Err(Rejection::InvalidDate));
        assert_eq!(validate_ticketing("MAYBE", today), Err(Rejection::CheckEntry));
    }
}
