//! Availability searches and paging over the working area.

use asmodeus_core::calendar::parse_ddmmm;
use asmodeus_core::{AvailabilityResults, Rejection, SearchMode, SearchQuery, WorkingArea};
use chrono::{Duration, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, info};

use crate::cities::{airports_for, primary_airport};
use crate::generator::FlightGenerator;
use crate::render;

static DATED_PARAMS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{2}[A-Z]{3})([A-Z]{3})([A-Z]{3})$").expect("static regex"));
static ROUTE_PARAMS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([A-Z]{3})([A-Z]{3})$").expect("static regex"));

#[derive(Debug, Clone)]
pub struct AvailabilityOptions {
    pub page_size: usize,
    pub default_origin: String,
    pub default_destination: String,
}

impl Default for AvailabilityOptions {
    fn default() -> Self {
        Self {
            page_size: 6,
            default_origin: "DEL".to_string(),
            default_destination: "DOH".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct AvailabilityService {
    options: AvailabilityOptions,
}

impl AvailabilityService {
    pub fn new(options: AvailabilityOptions) -> Self {
        let page_size = options.page_size.max(1);
        Self { options: AvailabilityOptions { page_size, ..options } }
    }

    pub fn page_size(&self) -> usize {
        self.options.page_size
    }

    /// Run a search from raw entry params (`12JANDELDOH`, `LONNYC` or empty).
    pub fn search(
        &self,
        area: &mut WorkingArea,
        raw_params: &str,
        direct_only: bool,
        mode: SearchMode,
        today: NaiveDate,
    ) -> Result<String, Rejection> {
        let params: String = raw_params.chars().filter(|c| !c.is_whitespace()).collect();
        let (date, origin, destination) = self.parse_params(&params, today)?;
        for code in [&origin, &destination] {
            let airports = airports_for(code);
            if airports.len() > 1 {
                debug!(
                    city = %code,
                    searched = airports[0],
                    skipped = ?&airports[1..],
                    "city code narrowed to its primary airport"
                );
            }
        }
        let query = SearchQuery {
            origin: primary_airport(&origin).to_string(),
            destination: primary_airport(&destination).to_string(),
            requested_origin: origin,
            requested_destination: destination,
            date,
            direct_only,
            mode,
        };
        self.run(area, query)
    }

    /// `MN` / `MY`: re-run the stored query one day later or earlier.
    pub fn shift_day(
        &self,
        area: &mut WorkingArea,
        days: i64,
        today: NaiveDate,
    ) -> Result<String, Rejection> {
        let mut query = stored(area)?.query.clone();
        let date = query.date + Duration::days(days);
        if date < today {
            return Err(Rejection::InvalidDate);
        }
        query.date = date;
        self.run(area, query)
    }

    /// `ACddMMM`: re-run the stored query on another date.
    pub fn change_date(
        &self,
        area: &mut WorkingArea,
        date_text: &str,
        today: NaiveDate,
    ) -> Result<String, Rejection> {
        let mut query = stored(area)?.query.clone();
        query.date = parse_ddmmm(date_text, today).ok_or(Rejection::InvalidDate)?;
        self.run(area, query)
    }

    pub fn move_down(&self, area: &mut WorkingArea) -> Result<String, Rejection> {
        let results = stored_mut(area)?;
        let next = results.cursor + self.options.page_size;
        if next >= results.flights.len() {
            return Err(Rejection::LastPage);
        }
        results.cursor = next;
        Ok(render::page(results, self.options.page_size))
    }

    pub fn move_up(&self, area: &mut WorkingArea) -> Result<String, Rejection> {
        let results = stored_mut(area)?;
        if results.cursor == 0 {
            return Err(Rejection::TopOfList);
        }
        results.cursor = results.cursor.saturating_sub(self.options.page_size);
        Ok(render::page(results, self.options.page_size))
    }

    pub fn move_top(&self, area: &mut WorkingArea) -> Result<String, Rejection> {
        let results = stored_mut(area)?;
        results.cursor = 0;
        Ok(render::page(results, self.options.page_size))
    }

    pub fn move_bottom(&self, area: &mut WorkingArea) -> Result<String, Rejection> {
        let page_size = self.options.page_size;
        let results = stored_mut(area)?;
        results.cursor = results.flights.len().saturating_sub(1) / page_size * page_size;
        Ok(render::page(results, page_size))
    }

    fn parse_params(
        &self,
        params: &str,
        today: NaiveDate,
    ) -> Result<(NaiveDate, String, String), Rejection> {
        if params.is_empty() {
            return Ok((
                today,
                self.options.default_origin.clone(),
                self.options.default_destination.clone(),
            ));
        }
        if let Some(caps) = DATED_PARAMS.captures(params) {
            let date = parse_ddmmm(&caps[1], today).ok_or(Rejection::InvalidDate)?;
            return Ok((date, caps[2].to_string(), caps[3].to_string()));
        }
        if let Some(caps) = ROUTE_PARAMS.captures(params) {
            return Ok((today, caps[1].to_string(), caps[2].to_string()));
        }
        debug!(params, "unparseable availability params");
        Err(Rejection::CheckEntry)
    }

    fn run(&self, area: &mut WorkingArea, query: SearchQuery) -> Result<String, Rejection> {
        let flights = if query.origin == query.destination {
            Vec::new()
        } else {
            FlightGenerator::generate(&query.origin, &query.destination, query.date, query.direct_only)
        };
        if flights.is_empty() {
            return Err(Rejection::NoFlights {
                origin: query.requested_origin,
                destination: query.requested_destination,
            });
        }

        info!(
            origin = %query.origin,
            destination = %query.destination,
            date = %query.date,
            flights = flights.len(),
            "[Availability] search"
        );
        let results = AvailabilityResults { query, flights, cursor: 0 };
        let text = render::page(&results, self.options.page_size);
        area.availability = Some(results);
        Ok(text)
    }
}

fn stored(area: &WorkingArea) -> Result<&AvailabilityResults, Rejection> {
    area.availability.as_ref().ok_or(Rejection::NoAvailability)
}

fn stored_mut(area: &mut WorkingArea) -> Result<&mut AvailabilityResults, Rejection> {
    area.availability.as_mut().ok_or(Rejection::NoAvailability)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
    }

    fn service(page_size: usize) -> AvailabilityService {
        AvailabilityService::new(AvailabilityOptions { page_size, ..Default::default() })
    }

    #[test]
    fn search_stores_results_and_renders_first_page() {
        let mut area = WorkingArea::default();
        let text = service(6)
            .search(&mut area, "12JANDELDOH", false, SearchMode::Availability, today())
            .unwrap();
        assert!(text.starts_with("** AMADEUS AVAILABILITY - AN ** DOH DOHA.QA"));
        assert!(text.contains(" 1  "));
        let results = area.availability.unwrap();
        assert_eq!(results.cursor, 0);
        assert_eq!(results.query.date, NaiveDate::from_ymd_opt(2027, 1, 12).unwrap());
    }

    #[test]
    fn empty_params_use_defaults_and_today() {
        let mut area = WorkingArea::default();
        service(6)
            .search(&mut area, "", false, SearchMode::Availability, today())
            .unwrap();
        let query = area.availability.unwrap().query;
        assert_eq!((query.origin.as_str(), query.destination.as_str()), ("DEL", "DOH"));
        assert_eq!(query.date, today());
    }

    #[test]
    fn whitespace_is_ignored_and_city_codes_resolve() {
        let mut area = WorkingArea::default();
        service(6)
            .search(&mut area, " 12JAN LON NYC ", true, SearchMode::Availability, today())
            .unwrap();
        let query = area.availability.unwrap().query;
        assert_eq!(query.origin, "LHR");
        assert_eq!(query.destination, "JFK");
        assert_eq!(query.requested_destination, "NYC");
    }

    #[test]
    fn bad_params_are_rejected_without_touching_area() {
        let mut area = WorkingArea::default();
        let svc = service(6);
        assert_eq!(
            svc.search(&mut area, "DELHI", false, SearchMode::Availability, today()),
            Err(Rejection::CheckEntry)
        );
        assert_eq!(
            svc.search(&mut area, "31FEBDELDOH", false, SearchMode::Availability, today()),
            Err(Rejection::InvalidDate)
        );
        assert_eq!(
            svc.search(&mut area, "DELDEL", false, SearchMode::Availability, today()),
            Err(Rejection::NoFlights { origin: "DEL".into(), destination: "DEL".into() })
        );
        assert!(area.availability.is_none());
    }

    #[test]
    fn paging_never_passes_the_end() {
        let svc = service(2);
        let mut area = WorkingArea::default();
        svc.search(&mut area, "12JANDELDOH", false, SearchMode::Availability, today()).unwrap();
        let total = area.availability.as_ref().unwrap().flights.len();

        let mut last = 0;
        while svc.move_down(&mut area).is_ok() {
            let cursor = area.availability.as_ref().unwrap().cursor;
            assert!(cursor > last);
            last = cursor;
        }
        assert!(last < total);
        for _ in 0..3 {
            assert_eq!(svc.move_down(&mut area), Err(Rejection::LastPage));
            assert_eq!(area.availability.as_ref().unwrap().cursor, last);
        }
    }

    #[test]
    fn paging_up_stops_at_top() {
        let svc = service(2);
        let mut area = WorkingArea::default();
        assert_eq!(svc.move_up(&mut area), Err(Rejection::NoAvailability));
        svc.search(&mut area, "12JANDELDOH", false, SearchMode::Availability, today()).unwrap();
        assert_eq!(svc.move_up(&mut area), Err(Rejection::TopOfList));
        svc.move_bottom(&mut area).unwrap();
        assert!(area.availability.as_ref().unwrap().cursor > 0);
        svc.move_top(&mut area).unwrap();
        assert_eq!(area.availability.as_ref().unwrap().cursor, 0);
    }

    #[test]
    fn paging_does_not_regenerate() {
        let svc = service(2);
        let mut area = WorkingArea::default();
        svc.search(&mut area, "12JANDELDOH", false, SearchMode::Availability, today()).unwrap();
        let before = area.availability.as_ref().unwrap().flights.clone();
        svc.move_down(&mut area).unwrap();
        svc.move_up(&mut area).unwrap();
        assert_eq!(area.availability.as_ref().unwrap().flights, before);
    }

    #[test]
    fn next_day_re_searches_with_shifted_date() {
        let svc = service(6);
        let mut area = WorkingArea::default();
        svc.search(&mut area, "12JANDELDOH", false, SearchMode::Availability, today()).unwrap();
        let text = svc.shift_day(&mut area, 1, today()).unwrap();
        assert!(text.contains("13JAN"));
        let results = area.availability.as_ref().unwrap();
        assert_eq!(results.query.date, NaiveDate::from_ymd_opt(2027, 1, 13).unwrap());
        assert_eq!(
            results.flights,
            FlightGenerator::generate("DEL", "DOH", results.query.date, false)
        );
    }

    #[test]
    fn prior_day_cannot_go_before_today() {
        let svc = service(6);
        let mut area = WorkingArea::default();
        svc.search(&mut area, "DELDOH", false, SearchMode::Availability, today()).unwrap();
        assert_eq!(svc.shift_day(&mut area, -1, today()), Err(Rejection::InvalidDate));
    }

    #[test]
    fn change_date_keeps_route() {
        let svc = service(6);
        let mut area = WorkingArea::default();
        svc.search(&mut area, "12JANBOMATH", false, SearchMode::Schedule, today()).unwrap();
        let text = svc.change_date(&mut area, "20JAN", today()).unwrap();
        assert!(text.starts_with("** AMADEUS SCHEDULE - SN ** ATH ATHENS.GR"));
        assert!(text.contains("20JAN"));
    }
}
