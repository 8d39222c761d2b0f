//! Persistence gateways: a durable SQLite store and an in-memory store for tests and demos.

pub mod memory;
pub mod sqlite;

pub use memory::{CommandLogEntry, InMemoryPnrStore, SessionLogEntry};
pub use sqlite::SqlitePnrStore;
