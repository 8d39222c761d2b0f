use asmodeus_availability::SeededRandom;
use asmodeus_availability::generator::AIRLINES;
use asmodeus_core::{IssuedTicket, PaxFare, PaxType, Passenger, PricedFare, Rejection, Session, TicketRecord};
use once_cell::sync::Lazy;
use rand::Rng;
use regex::Regex;
use tracing::{info, warn};

use super::{parse_options, screen};
use crate::dispatch::{CommandProcessor, PricingOptions};
use crate::locator::generate_ticket_number;
use crate::render;
use crate::types::{CommandResult, LOCAL_ONLY_FLAG};

static FARE_QUOTE_ROUTE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^D?(?:\d{2}[A-Z]{3})?([A-Z]{3})([A-Z]{3})$").expect("static regex")
});

/// Published fare bands per booking class for the simulated fare display.
const FARE_BANDS: [(char, u32, u32); 6] = [
    ('J', 45_000, 90_000),
    ('C', 35_000, 60_000),
    ('Y', 18_000, 35_000),
    ('B', 14_000, 22_000),
    ('M', 11_000, 16_000),
    ('K', 8_000, 12_000),
];
const FARE_BASIS_STEMS: &[&str] = &["LAP", "XAP", "EE", "BX"];

impl CommandProcessor {
    /// `FQD`: a stable fare table for a city pair.
    pub(crate) fn fare_quote(&self, session: &Session, params: &str) -> CommandResult {
        let params: String = params.chars().filter(|c| !c.is_whitespace()).collect();
        let (origin, destination) = if params.is_empty() || params == "D" {
            let results = session.area.availability.as_ref().ok_or(Rejection::CheckEntry)?;
            (results.query.origin.clone(), results.query.destination.clone())
        } else {
            let caps = FARE_QUOTE_ROUTE.captures(&params).ok_or(Rejection::CheckEntry)?;
            (caps[1].to_string(), caps[2].to_string())
        };

        let mut rng = SeededRandom::from_key(&format!("FQD{origin}{destination}"));
        let mut rows: Vec<(String, String, u32, char)> = FARE_BANDS
            .iter()
            .map(|&(class, low, high)| {
                let carrier = rng.choice(AIRLINES).to_string();
                let stem = rng.choice(FARE_BASIS_STEMS);
                let fare = rng.next_int(low, high) / 10 * 10;
                (carrier, format!("{class}{stem}OW"), fare, class)
            })
            .collect();
        rows.sort_by_key(|row| row.2);

        let mut lines = vec![
            format!("FQD {origin}{destination}"),
            format!("ROE 1.000000 {}", self.pricing.currency),
            " LN CXR  FARE BASIS     OW FARE  RBD".to_string(),
        ];
        for (i, (carrier, basis, fare, class)) in rows.iter().enumerate() {
            lines.push(format!(
                " {:02} {:<4} {:<12} {:>8}  {}",
                i + 1,
                carrier,
                basis,
                render::amount(u64::from(*fare)),
                class
            ));
        }
        Ok(lines.join("\n"))
    }

    /// `FXP` / `FXB`: assign a simulated fare to each passenger and keep it in the working area.
    pub(crate) fn price(
        &self,
        session: &mut Session,
        rebook: bool,
        options: Option<&str>,
    ) -> CommandResult {
        let options = parse_options(options)?;
        let area = &mut session.area;
        if area.segments.is_empty() {
            return Err(Rejection::NoItinerary.into());
        }
        if area.passengers.is_empty() {
            return Err(Rejection::NeedName.into());
        }
        let targets: Vec<&Passenger> = match options.passenger {
            Some(line) => vec![
                area.passengers
                    .iter()
                    .find(|p| p.line == line)
                    .ok_or(Rejection::InvalidNameNumber)?,
            ],
            None => area.passengers.iter().collect(),
        };

        let fare = PricedFare {
            currency: self.pricing.currency.clone(),
            fares: draw_fares(&self.pricing, &targets),
        };
        let text = render::fare_screen(&fare, rebook);
        info!(session = %session.id, total = fare.total(), "[Commands] itinerary priced");
        session.area.priced_fare = Some(fare);
        Ok(text)
    }

    /// `TTP`: issue one ticket per priced passenger, committing the PNR first when needed.
    pub(crate) async fn ticket(&self, session: &mut Session, options: Option<&str>) -> CommandResult {
        let options = parse_options(options)?;
        let fare = session.area.priced_fare.clone().ok_or(Rejection::NotPriced)?;
        if session.area.ticketing.is_empty() {
            return Err(Rejection::NeedTicketing.into());
        }
        let passengers: Vec<Passenger> = session
            .area
            .passengers
            .iter()
            .filter(|p| fare.fare_for(p.line).is_some())
            .filter(|p| options.passenger.is_none_or(|line| p.line == line))
            .cloned()
            .collect();
        if passengers.is_empty() {
            return Err(Rejection::NotPriced.into());
        }

        let mut local_only = false;
        let locator = match session.area.current_pnr.clone() {
            Some(locator) => locator,
            None => {
                let commit = self.commit(session).await?;
                local_only |= !commit.persisted;
                commit.locator
            }
        };

        let agent = session.agent().to_string();
        let mut issued = Vec::with_capacity(passengers.len());
        for pax in &passengers {
            let amount = fare.fare_for(pax.line).map(PaxFare::total).unwrap_or_default();
            let record = TicketRecord {
                ticket_number: generate_ticket_number(&self.pricing.ticket_prefix),
                locator: locator.clone(),
                passenger_name: pax.full_name(),
                amount,
                currency: fare.currency.clone(),
                agent_id: agent.clone(),
            };
            if let Err(e) = self.gateway.issue_ticket(&record).await {
                warn!(locator = %locator, ticket = %record.ticket_number, "ticket write failed: {e:#}");
                local_only = true;
            }
            issued.push(IssuedTicket {
                ticket_number: record.ticket_number,
                passenger_line: pax.line,
                passenger_name: record.passenger_name,
                amount,
            });
        }

        let total: u64 = issued.iter().map(|t| t.amount).sum();
        let details = format!("{} TKT {} {}", issued.len(), fare.currency, total);
        self.record_history(&locator, "TICKETED", &details, &agent).await;
        info!(session = %session.id, locator = %locator, tickets = issued.len(), "[Commands] tickets issued");

        let mut lines = vec![format!(
            "TICKET ISSUED{}",
            if local_only { LOCAL_ONLY_FLAG } else { "" }
        )];
        lines.extend(issued.iter().map(|t| format!("TKT: {} {}", t.ticket_number, t.passenger_name)));
        lines.push(format!("PNR: {locator}"));
        lines.push(format!("FARE: {} {}", fare.currency, render::amount(total)));
        session.area.tickets.extend(issued);
        if options.redisplay {
            lines.push(screen(session));
        }
        Ok(lines.join("\n"))
    }

    /// `TWD`: tickets issued from this working area.
    pub(crate) fn ticket_display(&self, session: &Session) -> CommandResult {
        let area = &session.area;
        if area.tickets.is_empty() {
            return Err(Rejection::NoTickets.into());
        }
        let mut lines = vec![format!(
            "TICKETS {}",
            area.current_pnr.as_deref().unwrap_or_default()
        )];
        for (i, t) in area.tickets.iter().enumerate() {
            lines.push(format!(
                "{:>2} {}  {:<20} {} {}",
                i + 1,
                t.ticket_number,
                t.passenger_name,
                self.pricing.currency,
                render::amount(t.amount)
            ));
        }
        Ok(lines.join("\n"))
    }
}

/// Random base fare per passenger: children pay 75%, infants 10%.
fn draw_fares(pricing: &PricingOptions, passengers: &[&Passenger]) -> Vec<PaxFare> {
    let mut rng = rand::thread_rng();
    let (low, high) = if pricing.base_fare_min <= pricing.base_fare_max {
        (pricing.base_fare_min, pricing.base_fare_max)
    } else {
        (pricing.base_fare_max, pricing.base_fare_min)
    };
    passengers
        .iter()
        .map(|pax| {
            let adult = rng.gen_range(low..=high);
            let base = match pax.pax_type {
                PaxType::Adt => adult,
                PaxType::Chd => adult * 75 / 100,
                PaxType::Inf => adult / 10,
            };
            PaxFare {
                passenger_line: pax.line,
                pax_type: pax.pax_type,
                base,
                tax: base * pricing.tax_percent / 100,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pax(line: u32, pax_type: PaxType) -> Passenger {
        Passenger {
            line,
            last_name: "KUMAR".into(),
            first_name: "RAHUL".into(),
            title: None,
            pax_type,
        }
    }

    #[test]
    fn fares_respect_range_and_tax() {
        let pricing = PricingOptions::default();
        let a = pax(1, PaxType::Adt);
        let c = pax(2, PaxType::Chd);
        let fares = draw_fares(&pricing, &[&a, &c]);
        assert_eq!(fares.len(), 2);
        assert!((10_000..=59_999).contains(&fares[0].base));
        assert_eq!(fares[0].tax, fares[0].base * 15 / 100);
        assert!(fares[1].base <= 59_999 * 75 / 100);
        assert_eq!(fares[1].pax_type, PaxType::Chd);
    }

    #[test]
    fn fixed_fare_range() {
        let pricing = PricingOptions { base_fare_min: 20_000, base_fare_max: 20_000, ..Default::default() };
        let a = pax(1, PaxType::Adt);
        let fares = draw_fares(&pricing, &[&a]);
        assert_eq!(fares[0].base, 20_000);
        assert_eq!(fares[0].tax, 3_000);
    }
}
