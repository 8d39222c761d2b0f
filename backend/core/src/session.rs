//! Per-agent session state and the transactional working area.
//!
//! A `Session` is owned by exactly one terminal. The working area accumulates
//! an itinerary, names and elements across commands until the agent ends the
//! transaction. Segment and passenger line numbers are always `1..=len`.

use chrono::NaiveDate;

use crate::error::Rejection;
use crate::types::{FlightSegment, GeneratedFlight, IssuedTicket, Passenger, PnrSnapshot, PricedFare};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchMode {
    #[default]
    Availability,
    Schedule,
}

/// The query behind the stored availability, kept so date navigation can re-run it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    /// Codes as typed (may be city codes such as `LON`).
    pub requested_origin: String,
    pub requested_destination: String,
    /// Airports actually searched.
    pub origin: String,
    pub destination: String,
    pub date: NaiveDate,
    pub direct_only: bool,
    pub mode: SearchMode,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvailabilityResults {
    pub query: SearchQuery,
    pub flights: Vec<GeneratedFlight>,
    /// Index of the first flight on the visible page.
    pub cursor: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkingArea {
    pub availability: Option<AvailabilityResults>,
    pub segments: Vec<FlightSegment>,
    pub passengers: Vec<Passenger>,
    pub contacts: Vec<String>,
    pub remarks: Vec<String>,
    pub osi: Vec<String>,
    pub ssr: Vec<String>,
    pub ticketing: Vec<String>,
    pub received_from: Option<String>,
    pub current_pnr: Option<String>,
    pub priced_fare: Option<PricedFare>,
    pub tickets: Vec<IssuedTicket>,
}

impl WorkingArea {
    /// Append a segment; returns its line number.
    pub fn push_segment(&mut self, mut segment: FlightSegment) -> u32 {
        let line = self.segments.len() as u32 + 1;
        segment.line = line;
        self.segments.push(segment);
        self.priced_fare = None;
        line
    }

    pub fn push_passenger(&mut self, mut passenger: Passenger) -> u32 {
        let line = self.passengers.len() as u32 + 1;
        passenger.line = line;
        self.passengers.push(passenger);
        self.priced_fare = None;
        line
    }

    pub fn cancel_segment(&mut self, line: u32) -> Result<FlightSegment, Rejection> {
        if self.segments.is_empty() {
            return Err(Rejection::NoItinerary);
        }
        let idx = index_for(line, self.segments.len()).ok_or(Rejection::InvalidSegment)?;
        let removed = self.segments.remove(idx);
        renumber_segments(&mut self.segments);
        self.priced_fare = None;
        Ok(removed)
    }

    pub fn cancel_itinerary(&mut self) -> Result<usize, Rejection> {
        if self.segments.is_empty() {
            return Err(Rejection::NoItinerary);
        }
        let count = self.segments.len();
        self.segments.clear();
        self.priced_fare = None;
        Ok(count)
    }

    pub fn cancel_passenger(&mut self, line: u32) -> Result<Passenger, Rejection> {
        if self.passengers.is_empty() {
            return Err(Rejection::NoNames);
        }
        let idx = index_for(line, self.passengers.len()).ok_or(Rejection::InvalidNameNumber)?;
        let removed = self.passengers.remove(idx);
        renumber_passengers(&mut self.passengers);
        self.priced_fare = None;
        Ok(removed)
    }

    pub fn rename_passenger(
        &mut self,
        line: u32,
        last_name: &str,
        first_name: &str,
    ) -> Result<&Passenger, Rejection> {
        if self.passengers.is_empty() {
            return Err(Rejection::NoNames);
        }
        let idx = index_for(line, self.passengers.len()).ok_or(Rejection::InvalidNameNumber)?;
        let pax = &mut self.passengers[idx];
        pax.last_name = last_name.to_string();
        pax.first_name = first_name.to_string();
        Ok(pax)
    }

    pub fn segment(&self, line: u32) -> Option<&FlightSegment> {
        index_for(line, self.segments.len()).map(|idx| &self.segments[idx])
    }

    /// True when there is anything worth displaying as a PNR.
    pub fn has_booking_data(&self) -> bool {
        !self.segments.is_empty()
            || !self.passengers.is_empty()
            || !self.contacts.is_empty()
            || self.current_pnr.is_some()
    }

    pub fn snapshot(&self) -> PnrSnapshot {
        PnrSnapshot {
            passengers: self.passengers.clone(),
            segments: self.segments.clone(),
            contacts: self.contacts.clone(),
            remarks: self.remarks.clone(),
            osi: self.osi.clone(),
            ssr: self.ssr.clone(),
            ticketing: self.ticketing.clone(),
            received_from: self.received_from.clone(),
        }
    }

    /// Replace booking content with a stored PNR. Line numbers are re-derived from position.
    pub fn load_snapshot(&mut self, locator: &str, snapshot: PnrSnapshot) {
        self.passengers = snapshot.passengers;
        self.segments = snapshot.segments;
        self.contacts = snapshot.contacts;
        self.remarks = snapshot.remarks;
        self.osi = snapshot.osi;
        self.ssr = snapshot.ssr;
        self.ticketing = snapshot.ticketing;
        self.received_from = snapshot.received_from;
        self.current_pnr = Some(locator.to_string());
        self.priced_fare = None;
        self.tickets.clear();
        renumber_segments(&mut self.segments);
        renumber_passengers(&mut self.passengers);
    }
}

fn index_for(line: u32, len: usize) -> Option<usize> {
    let idx = (line as usize).checked_sub(1)?;
    (idx < len).then_some(idx)
}

fn renumber_segments(segments: &mut [FlightSegment]) {
    for (i, seg) in segments.iter_mut().enumerate() {
        seg.line = i as u32 + 1;
    }
}

fn renumber_passengers(passengers: &mut [Passenger]) {
    for (i, pax) in passengers.iter_mut().enumerate() {
        pax.line = i as u32 + 1;
    }
}

/// Locators this agent committed since signing in, worked through with `QS`/`QD`/`QE`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AgentQueue {
    pub locators: Vec<String>,
    pub active: bool,
}

impl AgentQueue {
    pub fn enqueue(&mut self, locator: &str) {
        if !self.locators.iter().any(|l| l == locator) {
            self.locators.push(locator.to_string());
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub id: String,
    pub signed_in: bool,
    pub agent_id: Option<String>,
    pub office: Option<String>,
    pub area: WorkingArea,
    pub queue: AgentQueue,
}

impl Session {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            signed_in: false,
            agent_id: None,
            office: None,
            area: WorkingArea::default(),
            queue: AgentQueue::default(),
        }
    }

    pub fn sign_in(&mut self, agent_id: &str, office: &str) {
        self.signed_in = true;
        self.agent_id = Some(agent_id.to_string());
        self.office = Some(office.to_string());
    }

    pub fn sign_out(&mut self) {
        self.signed_in = false;
        self.agent_id = None;
        self.office = None;
        self.area = WorkingArea::default();
        self.queue = AgentQueue::default();
    }

    /// Drop everything in the working area; the agent stays signed in.
    pub fn ignore(&mut self) {
        self.area = WorkingArea::default();
    }

    /// Agent id for logs and history; `AGENT` when unknown.
    pub fn agent(&self) -> &str {
        self.agent_id.as_deref().unwrap_or("AGENT")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BookingClass, PaxType, SegmentAction};

    fn segment(flight: &str) -> FlightSegment {
        FlightSegment {
            line: 0,
            airline: "AI".into(),
            flight_number: flight.into(),
            class: BookingClass::try_from('Y').unwrap(),
            date: "12JAN".into(),
            origin: "DEL".into(),
            destination: "DOH".into(),
            action: SegmentAction::Hk,
            seats: 1,
            dep_time: "0900".into(),
            arr_time: "1100".into(),
        }
    }

    fn passenger(last: &str) -> Passenger {
        Passenger {
            line: 0,
            last_name: last.into(),
            first_name: "A".into(),
            title: None,
            pax_type: PaxType::Adt,
        }
    }

    #[test]
    fn cancel_segment_renumbers_in_order() {
        let mut area = WorkingArea::default();
        for f in ["101", "202", "303"] {
            area.push_segment(segment(f));
        }
        let removed = area.cancel_segment(2).unwrap();
        assert_eq!(removed.flight_number, "202");
        let lines: Vec<_> = area.segments.iter().map(|s| (s.line, s.flight_number.as_str())).collect();
        assert_eq!(lines, vec![(1, "101"), (2, "303")]);
    }

    #[test]
    fn cancel_segment_bounds() {
        let mut area = WorkingArea::default();
        assert_eq!(area.cancel_segment(1), Err(Rejection::NoItinerary));
        area.push_segment(segment("101"));
        assert_eq!(area.cancel_segment(0), Err(Rejection::InvalidSegment));
        assert_eq!(area.cancel_segment(2), Err(Rejection::InvalidSegment));
        assert_eq!(area.segments.len(), 1);
    }

    #[test]
    fn cancel_passenger_renumbers() {
        let mut area = WorkingArea::default();
        for n in ["ONE", "TWO", "THREE"] {
            area.push_passenger(passenger(n));
        }
        area.cancel_passenger(1).unwrap();
        assert_eq!(area.passengers[0].line, 1);
        assert_eq!(area.passengers[0].last_name, "TWO");
        assert_eq!(area.passengers[1].line, 2);
        assert_eq!(area.cancel_passenger(3), Err(Rejection::InvalidNameNumber));
    }

    #[test]
    fn load_snapshot_rederives_lines() {
        let mut snap = PnrSnapshot::default();
        let mut s = segment("101");
        s.line = 7;
        snap.segments.push(s);
        let mut p = passenger("KUMAR");
        p.line = 4;
        snap.passengers.push(p);

        let mut area = WorkingArea::default();
        area.load_snapshot("ABC234", snap);
        assert_eq!(area.segments[0].line, 1);
        assert_eq!(area.passengers[0].line, 1);
        assert_eq!(area.current_pnr.as_deref(), Some("ABC234"));
    }

    #[test]
    fn sign_out_clears_area_and_queue() {
        let mut session = Session::new("s1");
        session.sign_in("AGT1", "DEL1A");
        session.area.push_segment(segment("101"));
        session.queue.enqueue("ABC234");
        session.sign_out();
        assert!(!session.signed_in);
        assert!(session.area.segments.is_empty());
        assert!(session.queue.locators.is_empty());
    }

    #[test]
    fn itinerary_change_drops_price() {
        let mut area = WorkingArea::default();
        area.priced_fare = Some(PricedFare { currency: "INR".into(), fares: vec![] });
        area.push_segment(segment("101"));
        assert!(area.priced_fare.is_none());
    }
}
