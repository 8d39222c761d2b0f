//! Active terminal session registry.
//!
//! Sessions are created lazily on first use and handed out as
//! `Arc<Mutex<Session>>`; holding that lock serializes commands for one
//! session while other sessions run concurrently.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use asmodeus_core::Session;
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, info};

pub type SessionId = String;
pub type SessionHandle = Arc<Mutex<Session>>;

struct Entry {
    session: SessionHandle,
    last_active: Instant,
}

#[derive(Clone, Default)]
pub struct SessionRegistry {
    sessions: Arc<RwLock<HashMap<SessionId, Entry>>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up `session_id`, creating a signed-out session when it is unknown.
    /// Marks the session active.
    pub async fn get_or_create(&self, session_id: &str) -> SessionHandle {
        let mut sessions = self.sessions.write().await;
        let entry = sessions.entry(session_id.to_string()).or_insert_with(|| {
            debug!(session = session_id, "creating terminal session");
            Entry {
                session: Arc::new(Mutex::new(Session::new(session_id))),
                last_active: Instant::now(),
            }
        });
        entry.last_active = Instant::now();
        Arc::clone(&entry.session)
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }

    /// Drop sessions idle for longer than `ttl`. A session whose lock is
    /// currently held is kept. Returns the number removed.
    pub async fn reap_idle(&self, ttl: Duration) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, entry| {
            entry.last_active.elapsed() < ttl || entry.session.try_lock().is_err()
        });
        let reaped = before - sessions.len();
        if reaped > 0 {
            info!(reaped, remaining = sessions.len(), "reaped idle terminal sessions");
        }
        reaped
    }

    /// Run `reap_idle` every `interval` until the task is aborted.
    pub fn spawn_reaper(&self, ttl: Duration, interval: Duration) -> JoinHandle<()> {
        let registry = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                registry.reap_idle(ttl).await;
            }
        })
    }
}
