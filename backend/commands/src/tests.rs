//! End-to-end command scenarios against the processor.

use std::sync::Arc;

use anyhow::{Result, anyhow};
use asmodeus_core::{
    FixedClock, HistoryEntry, PersistenceGateway, PnrSnapshot, Session, TicketRecord,
};
use asmodeus_store::InMemoryPnrStore;
use async_trait::async_trait;
use chrono::{TimeZone, Utc};

use crate::{CommandProcessor, parse};

/// A store that is always down.
struct OfflineStore;

#[async_trait]
impl PersistenceGateway for OfflineStore {
    async fn create_pnr(&self, _: &str, _: &PnrSnapshot) -> Result<()> {
        Err(anyhow!("database offline"))
    }
    async fn retrieve_pnr(&self, _: &str) -> Result<Option<PnrSnapshot>> {
        Err(anyhow!("database offline"))
    }
    async fn issue_ticket(&self, _: &TicketRecord) -> Result<()> {
        Err(anyhow!("database offline"))
    }
    async fn log_session_start(&self, _: &str, _: &str) -> Result<()> {
        Err(anyhow!("database offline"))
    }
    async fn log_session_end(&self, _: &str, _: &str) -> Result<()> {
        Err(anyhow!("database offline"))
    }
    async fn log_command(&self, _: &str, _: &str, _: &str) -> Result<()> {
        Err(anyhow!("database offline"))
    }
    async fn log_history(&self, _: &str, _: &str, _: &str, _: &str) -> Result<()> {
        Err(anyhow!("database offline"))
    }
    async fn history(&self, _: &str) -> Result<Vec<HistoryEntry>> {
        Err(anyhow!("database offline"))
    }
}

fn processor(gateway: Arc<dyn PersistenceGateway>) -> CommandProcessor {
    let now = Utc.with_ymd_and_hms(2026, 10, 18, 9, 30, 0).unwrap();
    CommandProcessor::new(gateway).with_clock(Arc::new(FixedClock(now)))
}

struct Terminal {
    processor: CommandProcessor,
    session: Session,
}

impl Terminal {
    fn new(gateway: Arc<dyn PersistenceGateway>) -> Self {
        Self { processor: processor(gateway), session: Session::new("t1") }
    }

    async fn run(&mut self, raw: &str) -> String {
        self.processor.process(&mut self.session, &parse(raw)).await
    }

    async fn run_all(&mut self, entries: &[&str]) {
        for entry in entries {
            self.run(entry).await;
        }
    }
}

const BOOKING: &[&str] = &[
    "JI1234AA/DEL1A",
    "AN12JANDELDOH",
    "SS1Y1",
    "NM1KUMAR/RAHUL MR",
    "AP DEL 9876543210",
    "TK OK",
];

fn locator_after(prefix: &str, text: &str) -> String {
    text.strip_prefix(prefix)
        .and_then(|rest| rest.get(..6))
        .unwrap_or_else(|| panic!("no locator in {text:?}"))
        .to_string()
}

#[tokio::test]
async fn full_booking_issues_ticket() {
    let store = InMemoryPnrStore::new();
    let mut term = Terminal::new(Arc::new(store.clone()));

    assert!(term.run("JI1234AA/DEL1A").await.starts_with("OK 1234AA - ASMODEUS READY\n18OCT26 0930Z"));
    let avail = term.run("AN12JANDELDOH").await;
    assert!(avail.starts_with("** AMADEUS AVAILABILITY - AN ** DOH"), "{avail}");
    assert!(avail.contains("TU 12JAN"));

    let sold = term.run("SS1Y1").await;
    assert!(sold.contains(" 1 "), "{sold}");
    assert!(sold.contains("HK1"));

    assert!(term.run("NM1KUMAR/RAHUL MR").await.contains(" 1.KUMAR/RAHUL MR"));
    term.run_all(&["AP DEL 9876543210", "TK OK"]).await;

    let fare = term.run("FXP").await;
    assert!(fare.starts_with("FARE CALCULATION"), "{fare}");
    assert!(fare.contains("PAX: 1 ADT"));

    let issued = term.run("TTP").await;
    assert!(issued.starts_with("TICKET ISSUED\nTKT: 176-"), "{issued}");
    assert!(issued.contains(" KUMAR/RAHUL\nPNR: "));
    assert!(issued.contains("FARE: INR "));

    let locator = issued
        .lines()
        .find_map(|line| line.strip_prefix("PNR: "))
        .expect("ticket screen names its PNR")
        .to_string();
    assert_eq!(term.session.area.current_pnr.as_deref(), Some(locator.as_str()));
    assert!(store.retrieve_pnr(&locator).await.unwrap().is_some());

    let tickets = store.tickets().unwrap();
    assert_eq!(tickets.len(), 1);
    assert_eq!(tickets[0].agent_id, "1234AA");
    assert_eq!(tickets[0].locator, locator);
    assert_eq!(store.pnr_count().unwrap(), 1);

    let history = term.run("RH").await;
    assert!(history.contains("CREATED"), "{history}");
    assert!(history.contains("TICKETED"));
    assert!(term.run("TWD").await.contains("KUMAR/RAHUL"));
}

#[tokio::test]
async fn secured_area_before_sign_in() {
    let store = InMemoryPnrStore::new();
    let mut term = Terminal::new(Arc::new(store.clone()));

    assert_eq!(term.run("AN12JANDELDOH").await, "SECURED AREA - PLEASE SIGN IN");
    assert_eq!(term.run("HELP").await, "SECURED AREA - PLEASE SIGN IN");
    assert!(term.session.area.availability.is_none());
    // Refused entries are still audited.
    assert_eq!(store.command_log().unwrap().len(), 2);

    term.run("JI").await;
    assert_eq!(term.run("JI").await, "ALREADY SIGNED IN");
}

#[tokio::test]
async fn sell_needs_availability() {
    let mut term = Terminal::new(Arc::new(InMemoryPnrStore::new()));
    term.run("JI").await;
    assert_eq!(term.run("SS1Y1").await, "NO AVAILABILITY IN WORKING AREA");
    assert_eq!(term.run("MD").await, "NO AVAILABILITY IN WORKING AREA");
}

#[tokio::test]
async fn end_transaction_checks_in_order() {
    let mut term = Terminal::new(Arc::new(InMemoryPnrStore::new()));
    term.run("JI").await;
    assert_eq!(term.run("ER").await, "NO ITIN");

    term.run_all(&["AN12JANDELDOH", "SS1Y1"]).await;
    assert_eq!(term.run("ER").await, "NEED NAME FIELD");
    term.run("NM1KUMAR/RAHUL MR").await;
    assert_eq!(term.run("ER").await, "NEED CONTACT ELEMENT");
    term.run("AP DEL 9876543210").await;
    assert_eq!(term.run("ER").await, "NEED TICKETING ARRANGEMENT");
    term.run("TK OK").await;

    let created = term.run("ER").await;
    assert!(created.starts_with("PNR CREATED: "), "{created}");
    assert!(created.contains("--- RLR ---"));
}

#[tokio::test]
async fn end_ignore_retrieve_round_trip() {
    let mut term = Terminal::new(Arc::new(InMemoryPnrStore::new()));
    term.run_all(BOOKING).await;

    let created = term.run("ER").await;
    let locator = locator_after("PNR CREATED: ", &created);

    let updated = term.run("ER").await;
    assert!(updated.starts_with(&format!("PNR UPDATED: {locator}")), "{updated}");

    assert_eq!(term.run("IG").await, "IG - WORKING AREA CLEARED");
    assert_eq!(term.run("RT").await, "NO PNR IN CONTEXT");

    let retrieved = term.run(&format!("RT {locator}")).await;
    assert!(retrieved.starts_with(&format!("PNR RETRIEVED: {locator}")), "{retrieved}");
    assert!(retrieved.contains(" 1.KUMAR/RAHUL MR"));
    assert!(retrieved.contains("HK1"));
    assert_eq!(term.session.area.current_pnr.as_deref(), Some(locator.as_str()));

    assert_eq!(term.run("RT ZZZZZZ").await, "PNR ZZZZZZ NOT FOUND");

    let queue = term.run("QS").await;
    assert!(queue.starts_with("QUEUE MODE - 1 PNR(S)"), "{queue}");
    assert!(queue.contains(&locator));
    assert_eq!(term.run("QE").await, "QUEUE MODE EXITED");
}

#[tokio::test]
async fn store_outage_keeps_pnr_locally() {
    let mut term = Terminal::new(Arc::new(OfflineStore));
    term.run_all(BOOKING).await;

    let saved = term.run("ET").await;
    assert!(saved.starts_with("PNR SAVED: "), "{saved}");
    assert!(saved.ends_with(" (LOCAL ONLY - DB ERROR)"));
    assert!(term.session.area.current_pnr.is_some());

    term.run("FXP").await;
    let issued = term.run("TTP").await;
    assert!(issued.starts_with("TICKET ISSUED (LOCAL ONLY - DB ERROR)"), "{issued}");
}

#[tokio::test]
async fn ticket_references_locator_from_end_transaction() {
    let store = InMemoryPnrStore::new();
    let mut term = Terminal::new(Arc::new(store.clone()));
    term.run_all(BOOKING).await;

    let saved = term.run("ET").await;
    let locator = locator_after("PNR SAVED: ", &saved);
    term.run("FXP").await;
    let issued = term.run("TTP").await;

    assert!(issued.contains(&format!("\nPNR: {locator}\n")), "{issued}");
    assert_eq!(store.tickets().unwrap()[0].locator, locator);
    assert_eq!(store.pnr_count().unwrap(), 1);
}

#[tokio::test]
async fn local_only_pnr_redisplays_by_locator() {
    let mut term = Terminal::new(Arc::new(OfflineStore));
    term.run_all(BOOKING).await;

    let saved = term.run("ET").await;
    assert!(saved.ends_with(" (LOCAL ONLY - DB ERROR)"), "{saved}");
    let locator = locator_after("PNR SAVED: ", &saved);

    let shown = term.run(&format!("RT {locator}")).await;
    assert!(shown.starts_with(&format!("PNR RETRIEVED: {locator}\n")), "{shown}");
    assert!(shown.contains(" 1.KUMAR/RAHUL MR"));
    assert!(shown.contains("--- RLR ---"));

    // A different locator still goes to the store.
    assert_eq!(term.run("RT ABC234").await, "UNABLE TO RETRIEVE ABC234 - RETRY LATER");
}

#[tokio::test]
async fn retrieve_during_outage() {
    let mut term = Terminal::new(Arc::new(OfflineStore));
    term.run("JI").await;
    assert_eq!(term.run("RT ABC234").await, "UNABLE TO RETRIEVE ABC234 - RETRY LATER");
}

#[tokio::test]
async fn rejected_entries_leave_session_untouched() {
    let mut term = Terminal::new(Arc::new(InMemoryPnrStore::new()));
    term.run_all(&["JI", "AN12JANDELDOH", "SS1Y1"]).await;
    let before = term.session.clone();

    assert_eq!(term.run("XE5").await, "INVALID SEGMENT NUMBER");
    assert_eq!(term.run("SS1Y99").await, "INVALID LINE NUMBER");
    assert_eq!(term.run("SS0Y1").await, "INVALID NUMBER OF SEATS");
    assert_eq!(term.run("TTP").await, "PNR NOT PRICED");
    assert_eq!(term.run("ZZZ").await, "CHECK ENTRY");
    assert_eq!(term.session, before);
}

#[tokio::test]
async fn price_is_dropped_when_itinerary_changes() {
    let mut term = Terminal::new(Arc::new(InMemoryPnrStore::new()));
    term.run_all(BOOKING).await;
    term.run("FXP").await;
    assert!(term.session.area.priced_fare.is_some());

    term.run("SS2Y1").await;
    assert!(term.session.area.priced_fare.is_none());
    assert_eq!(term.run("TTP").await, "PNR NOT PRICED");
}

#[tokio::test]
async fn sign_out_clears_working_area() {
    let mut term = Terminal::new(Arc::new(InMemoryPnrStore::new()));
    term.run_all(&["JI", "AN12JANDELDOH", "SS1Y1"]).await;

    assert_eq!(term.run("JO").await, "SIGNED OUT");
    assert!(!term.session.signed_in);
    assert!(term.session.area.segments.is_empty());
    assert_eq!(term.run("RT").await, "SECURED AREA - PLEASE SIGN IN");
}

#[tokio::test]
async fn split_moves_one_passenger() {
    let store = InMemoryPnrStore::new();
    let mut term = Terminal::new(Arc::new(store.clone()));
    term.run_all(&[
        "JI",
        "AN12JANDELDOH",
        "SS2Y1",
        "NM1KUMAR/RAHUL MR",
        "NM1KUMAR/PRIYA MRS",
        "AP DEL 9876543210",
        "TK OK",
        "ER",
    ])
    .await;

    let split = term.run("SP2").await;
    assert!(split.starts_with("SPLIT PNR CREATED: "), "{split}");
    assert_eq!(term.session.area.passengers.len(), 1);
    assert_eq!(term.session.area.segments[0].seats, 1);
    assert_eq!(store.pnr_count().unwrap(), 2);

    assert_eq!(term.run("SP1").await, "SPLIT REQUIRES AT LEAST 2 NAMES");
}
