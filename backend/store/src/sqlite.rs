/// SQLite-backed durable PNR store.
///
/// A PNR is one row in `pnrs` plus child rows for names, segments and the
/// free-text elements. Writes replace every child row inside a single
/// transaction so a stored PNR always matches one committed working area.
use std::path::Path;

use anyhow::{Context, Result};
use asmodeus_core::{
    BookingClass, FlightSegment, HistoryEntry, PaxType, Passenger, PersistenceGateway, PnrSnapshot,
    SegmentAction, TicketRecord,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction};
use tokio::sync::Mutex;
use tracing::{debug, info};

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS pnrs (
        locator       TEXT PRIMARY KEY,
        received_from TEXT,
        created_at    TEXT NOT NULL,
        updated_at    TEXT NOT NULL
    );
    CREATE TABLE IF NOT EXISTS pnr_passengers (
        locator    TEXT NOT NULL,
        line       INTEGER NOT NULL,
        last_name  TEXT NOT NULL,
        first_name TEXT NOT NULL,
        title      TEXT,
        pax_type   TEXT NOT NULL
    );
    CREATE TABLE IF NOT EXISTS pnr_segments (
        locator       TEXT NOT NULL,
        line          INTEGER NOT NULL,
        airline       TEXT NOT NULL,
        flight_number TEXT NOT NULL,
        class         TEXT NOT NULL,
        travel_date   TEXT NOT NULL,
        origin        TEXT NOT NULL,
        destination   TEXT NOT NULL,
        action        TEXT NOT NULL,
        seats         INTEGER NOT NULL,
        dep_time      TEXT NOT NULL,
        arr_time      TEXT NOT NULL
    );
    CREATE TABLE IF NOT EXISTS pnr_elements (
        locator  TEXT NOT NULL,
        kind     TEXT NOT NULL,
        position INTEGER NOT NULL,
        text     TEXT NOT NULL
    );
    CREATE TABLE IF NOT EXISTS tickets (
        ticket_number  TEXT PRIMARY KEY,
        locator        TEXT NOT NULL,
        passenger_name TEXT NOT NULL,
        amount         INTEGER NOT NULL,
        currency       TEXT NOT NULL,
        agent_id       TEXT NOT NULL,
        issued_at      TEXT NOT NULL
    );
    CREATE TABLE IF NOT EXISTS agent_sessions (
        session_id TEXT NOT NULL,
        agent_id   TEXT NOT NULL,
        started_at TEXT NOT NULL,
        ended_at   TEXT
    );
    CREATE TABLE IF NOT EXISTS command_logs (
        id         INTEGER PRIMARY KEY AUTOINCREMENT,
        session_id TEXT NOT NULL,
        kind       TEXT NOT NULL,
        raw        TEXT NOT NULL,
        logged_at  TEXT NOT NULL
    );
    CREATE TABLE IF NOT EXISTS pnr_history (
        id         INTEGER PRIMARY KEY AUTOINCREMENT,
        locator    TEXT NOT NULL,
        action     TEXT NOT NULL,
        details    TEXT NOT NULL,
        agent_id   TEXT NOT NULL,
        created_at TEXT NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_passengers_locator ON pnr_passengers(locator);
    CREATE INDEX IF NOT EXISTS idx_segments_locator ON pnr_segments(locator);
    CREATE INDEX IF NOT EXISTS idx_elements_locator ON pnr_elements(locator);
    CREATE INDEX IF NOT EXISTS idx_tickets_locator ON tickets(locator);
    CREATE INDEX IF NOT EXISTS idx_history_locator ON pnr_history(locator);
";

/// Element kinds stored in `pnr_elements`.
const CONTACT: &str = "AP";
const REMARK: &str = "RM";
const OSI: &str = "OSI";
const SSR: &str = "SSR";
const TICKETING: &str = "TK";

pub struct SqlitePnrStore {
    conn: Mutex<Connection>,
}

impl SqlitePnrStore {
    /// Create or open a database at the given path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path.as_ref()).context("Failed to open SQLite PNR database")?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")
            .context("Failed to enable WAL journal")?;
        init_schema(&conn)?;
        info!("SqlitePnrStore opened at {:?}", path.as_ref());
        Ok(Self { conn: Mutex::new(conn) })
    }

    /// Open an in-memory database (for tests).
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        init_schema(&conn)?;
        Ok(Self { conn: Mutex::new(conn) })
    }

    /// Number of stored PNRs; used by `asmodeus status`.
    pub async fn pnr_count(&self) -> Result<u64> {
        let conn = self.conn.lock().await;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM pnrs", [], |row| row.get(0))?;
        Ok(u64::try_from(count).unwrap_or_default())
    }

    /// Tickets issued against `locator`, in issue order.
    pub async fn tickets_for(&self, locator: &str) -> Result<Vec<TicketRecord>> {
        let conn = self.conn.lock().await;
        let mut stmt = conn.prepare(
            "SELECT ticket_number, locator, passenger_name, amount, currency, agent_id
             FROM tickets WHERE locator = ?1 ORDER BY rowid",
        )?;
        let rows = stmt
            .query_map(params![locator], row_to_ticket)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }
}

fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA).context("Failed to initialize PNR schema")
}

fn now() -> String {
    Utc::now().to_rfc3339()
}

#[async_trait]
impl PersistenceGateway for SqlitePnrStore {
    async fn create_pnr(&self, locator: &str, snapshot: &PnrSnapshot) -> Result<()> {
        let mut conn = self.conn.lock().await;
        let tx = conn.transaction()?;
        let stamp = now();
        tx.execute(
            "INSERT INTO pnrs (locator, received_from, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?3)
             ON CONFLICT(locator) DO UPDATE SET
                 received_from = excluded.received_from,
                 updated_at = excluded.updated_at",
            params![locator, snapshot.received_from, stamp],
        )?;
        for table in ["pnr_passengers", "pnr_segments", "pnr_elements"] {
            tx.execute(&format!("DELETE FROM {table} WHERE locator = ?1"), params![locator])?;
        }
        write_children(&tx, locator, snapshot)?;
        tx.commit().context("Failed to commit PNR")?;
        debug!(locator, "stored pnr");
        Ok(())
    }

    async fn retrieve_pnr(&self, locator: &str) -> Result<Option<PnrSnapshot>> {
        let conn = self.conn.lock().await;
        let received_from: Option<Option<String>> = conn
            .query_row(
                "SELECT received_from FROM pnrs WHERE locator = ?1",
                params![locator],
                |row| row.get(0),
            )
            .optional()?;
        let Some(received_from) = received_from else {
            return Ok(None);
        };

        let passengers = conn
            .prepare(
                "SELECT line, last_name, first_name, title, pax_type
                 FROM pnr_passengers WHERE locator = ?1 ORDER BY line",
            )?
            .query_map(params![locator], row_to_passenger)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        let segments = conn
            .prepare(
                "SELECT line, airline, flight_number, class, travel_date, origin, destination,
                        action, seats, dep_time, arr_time
                 FROM pnr_segments WHERE locator = ?1 ORDER BY line",
            )?
            .query_map(params![locator], row_to_segment)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut elements = conn.prepare(
            "SELECT text FROM pnr_elements WHERE locator = ?1 AND kind = ?2 ORDER BY position",
        )?;
        let mut texts = |kind: &str| -> Result<Vec<String>> {
            let rows = elements
                .query_map(params![locator, kind], |row| row.get(0))?
                .collect::<rusqlite::Result<Vec<String>>>()?;
            Ok(rows)
        };

        Ok(Some(PnrSnapshot {
            passengers,
            segments,
            contacts: texts(CONTACT)?,
            remarks: texts(REMARK)?,
            osi: texts(OSI)?,
            ssr: texts(SSR)?,
            ticketing: texts(TICKETING)?,
            received_from,
        }))
    }

    async fn issue_ticket(&self, ticket: &TicketRecord) -> Result<()> {
        let conn = self.conn.lock().await;
        conn.execute(
            "INSERT INTO tickets (ticket_number, locator, passenger_name, amount, currency, agent_id, issued_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                ticket.ticket_number,
                ticket.locator,
                ticket.passenger_name,
                i64::try_from(ticket.amount).context("ticket amount out of range")?,
                ticket.currency,
                ticket.agent_id,
                now(),
            ],
        )?;
        Ok(())
    }

    async fn log_session_start(&self, session_id: &str, agent_id: &str) -> Result<()> {
        let conn = self.conn.lock().await;
        conn.execute(
            "INSERT INTO agent_sessions (session_id, agent_id, started_at) VALUES (?1, ?2, ?3)",
            params![session_id, agent_id, now()],
        )?;
        Ok(())
    }

    async fn log_session_end(&self, session_id: &str, agent_id: &str) -> Result<()> {
        let conn = self.conn.lock().await;
        conn.execute(
            "UPDATE agent_sessions SET ended_at = ?3
             WHERE session_id = ?1 AND agent_id = ?2 AND ended_at IS NULL",
            params![session_id, agent_id, now()],
        )?;
        Ok(())
    }

    async fn log_command(&self, session_id: &str, kind: &str, raw: &str) -> Result<()> {
        let conn = self.conn.lock().await;
        conn.execute(
            "INSERT INTO command_logs (session_id, kind, raw, logged_at) VALUES (?1, ?2, ?3, ?4)",
            params![session_id, kind, raw, now()],
        )?;
        Ok(())
    }

    async fn log_history(&self, locator: &str, action: &str, details: &str, agent_id: &str) -> Result<()> {
        let conn = self.conn.lock().await;
        conn.execute(
            "INSERT INTO pnr_history (locator, action, details, agent_id, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![locator, action, details, agent_id, now()],
        )?;
        Ok(())
    }

    async fn history(&self, locator: &str) -> Result<Vec<HistoryEntry>> {
        let conn = self.conn.lock().await;
        let mut stmt = conn.prepare(
            "SELECT created_at, agent_id, action, details
             FROM pnr_history WHERE locator = ?1 ORDER BY id",
        )?;
        let rows = stmt
            .query_map(params![locator], row_to_history)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }
}

fn write_children(tx: &Transaction<'_>, locator: &str, snapshot: &PnrSnapshot) -> Result<()> {
    for pax in &snapshot.passengers {
        tx.execute(
            "INSERT INTO pnr_passengers (locator, line, last_name, first_name, title, pax_type)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![locator, pax.line, pax.last_name, pax.first_name, pax.title, pax.pax_type.code()],
        )?;
    }
    for seg in &snapshot.segments {
        tx.execute(
            "INSERT INTO pnr_segments (locator, line, airline, flight_number, class, travel_date,
                                       origin, destination, action, seats, dep_time, arr_time)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
            params![
                locator,
                seg.line,
                seg.airline,
                seg.flight_number,
                seg.class.to_string(),
                seg.date,
                seg.origin,
                seg.destination,
                seg.action.code(),
                seg.seats,
                seg.dep_time,
                seg.arr_time,
            ],
        )?;
    }
    let groups = [
        (CONTACT, &snapshot.contacts),
        (REMARK, &snapshot.remarks),
        (OSI, &snapshot.osi),
        (SSR, &snapshot.ssr),
        (TICKETING, &snapshot.ticketing),
    ];
    for (kind, texts) in groups {
        for (position, text) in texts.iter().enumerate() {
            tx.execute(
                "INSERT INTO pnr_elements (locator, kind, position, text) VALUES (?1, ?2, ?3, ?4)",
                params![locator, kind, position as i64, text],
            )?;
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Row deserialization helpers
// ---------------------------------------------------------------------------

fn conversion_error(column: usize, message: String) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(column, Type::Text, message.into())
}

fn row_to_passenger(row: &Row) -> rusqlite::Result<Passenger> {
    let pax_type: String = row.get(4)?;
    Ok(Passenger {
        line: row.get(0)?,
        last_name: row.get(1)?,
        first_name: row.get(2)?,
        title: row.get(3)?,
        pax_type: PaxType::from_code(&pax_type)
            .ok_or_else(|| conversion_error(4, format!("unknown passenger type {pax_type}")))?,
    })
}

fn row_to_segment(row: &Row) -> rusqlite::Result<FlightSegment> {
    let class: String = row.get(3)?;
    let class = class
        .chars()
        .next()
        .ok_or_else(|| conversion_error(3, "empty booking class".to_string()))
        .and_then(|c| BookingClass::try_from(c).map_err(|e| conversion_error(3, e)))?;
    let action: String = row.get(7)?;
    Ok(FlightSegment {
        line: row.get(0)?,
        airline: row.get(1)?,
        flight_number: row.get(2)?,
        class,
        date: row.get(4)?,
        origin: row.get(5)?,
        destination: row.get(6)?,
        action: SegmentAction::from_code(&action)
            .ok_or_else(|| conversion_error(7, format!("unknown segment action {action}")))?,
        seats: row.get(8)?,
        dep_time: row.get(9)?,
        arr_time: row.get(10)?,
    })
}

fn row_to_ticket(row: &Row) -> rusqlite::Result<TicketRecord> {
    let amount: i64 = row.get(3)?;
    Ok(TicketRecord {
        ticket_number: row.get(0)?,
        locator: row.get(1)?,
        passenger_name: row.get(2)?,
        amount: u64::try_from(amount).map_err(|e| conversion_error(3, e.to_string()))?,
        currency: row.get(4)?,
        agent_id: row.get(5)?,
    })
}

fn row_to_history(row: &Row) -> rusqlite::Result<HistoryEntry> {
    let stamp: String = row.get(0)?;
    let timestamp = DateTime::parse_from_rfc3339(&stamp)
        .map_err(|e| conversion_error(0, e.to_string()))?
        .with_timezone(&Utc);
    Ok(HistoryEntry {
        timestamp,
        agent_id: row.get(1)?,
        action: row.get(2)?,
        details: row.get(3)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> PnrSnapshot {
        PnrSnapshot {
            passengers: vec![
                Passenger {
                    line: 1,
                    last_name: "KUMAR".into(),
                    first_name: "RAHUL".into(),
                    title: Some("MR".into()),
                    pax_type: PaxType::Adt,
                },
                Passenger {
                    line: 2,
                    last_name: "KUMAR".into(),
                    first_name: "ANYA".into(),
                    title: None,
                    pax_type: PaxType::Chd,
                },
            ],
            segments: vec![FlightSegment {
                line: 1,
                airline: "QR".into(),
                flight_number: "579".into(),
                class: BookingClass::try_from('Y').unwrap(),
                date: "12JAN".into(),
                origin: "DEL".into(),
                destination: "DOH".into(),
                action: SegmentAction::Hk,
                seats: 2,
                dep_time: "0930".into(),
                arr_time: "1145".into(),
            }],
            contacts: vec!["DEL 9876543210".into()],
            remarks: vec!["VIP".into(), "WHEELCHAIR AT GATE".into()],
            osi: vec![],
            ssr: vec!["RQST QR579 DELDOH 12A/S1".into()],
            ticketing: vec!["OK".into()],
            received_from: Some("RAHUL".into()),
        }
    }

    #[tokio::test]
    async fn pnr_roundtrip_preserves_order() {
        let store = SqlitePnrStore::in_memory().expect("in-memory db");
        store.create_pnr("ABC234", &snapshot()).await.unwrap();
        let loaded = store.retrieve_pnr("ABC234").await.unwrap().expect("stored");
        assert_eq!(loaded, snapshot());
    }

    #[tokio::test]
    async fn unknown_locator_is_none() {
        let store = SqlitePnrStore::in_memory().unwrap();
        assert!(store.retrieve_pnr("ZZZZZZ").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn rewrite_replaces_children() {
        let store = SqlitePnrStore::in_memory().unwrap();
        store.create_pnr("ABC234", &snapshot()).await.unwrap();

        let mut changed = snapshot();
        changed.passengers.truncate(1);
        changed.remarks.clear();
        store.create_pnr("ABC234", &changed).await.unwrap();

        let loaded = store.retrieve_pnr("ABC234").await.unwrap().unwrap();
        assert_eq!(loaded.passengers.len(), 1);
        assert!(loaded.remarks.is_empty());
        assert_eq!(store.pnr_count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn history_is_oldest_first() {
        let store = SqlitePnrStore::in_memory().unwrap();
        store.log_history("ABC234", "CREATED", "2 PAX 1 SEG", "JI").await.unwrap();
        store.log_history("ABC234", "TICKETED", "2 TKT INR 1000", "JI").await.unwrap();
        store.log_history("OTHER1", "CREATED", "1 PAX 1 SEG", "JI").await.unwrap();

        let history = store.history("ABC234").await.unwrap();
        let actions: Vec<_> = history.iter().map(|h| h.action.as_str()).collect();
        assert_eq!(actions, ["CREATED", "TICKETED"]);
    }

    #[tokio::test]
    async fn tickets_and_logs_are_written() {
        let store = SqlitePnrStore::in_memory().unwrap();
        let ticket = TicketRecord {
            ticket_number: "176-1234567890".into(),
            locator: "ABC234".into(),
            passenger_name: "KUMAR/RAHUL".into(),
            amount: 23_000,
            currency: "INR".into(),
            agent_id: "JI".into(),
        };
        store.issue_ticket(&ticket).await.unwrap();
        store.log_session_start("s1", "JI").await.unwrap();
        store.log_command("s1", "SELL", "SS1Y1").await.unwrap();
        store.log_session_end("s1", "JI").await.unwrap();

        assert_eq!(store.tickets_for("ABC234").await.unwrap(), vec![ticket.clone()]);
        // Ticket numbers are unique.
        assert!(store.issue_ticket(&ticket).await.is_err());
    }

    #[tokio::test]
    async fn file_database_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pnr.db");
        {
            let store = SqlitePnrStore::open(&path).unwrap();
            store.create_pnr("ABC234", &snapshot()).await.unwrap();
        }
        let store = SqlitePnrStore::open(&path).unwrap();
        assert!(store.retrieve_pnr("ABC234").await.unwrap().is_some());
    }
}
