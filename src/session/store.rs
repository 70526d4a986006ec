//! In-memory session storage.

use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::session::state::{Session, SessionData};

/// Idle lifetime used by [`SessionStore::new`].
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(1440);

/// What the transport must do with the session cookie after a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CookieAction {
    /// Cookie already carries the right id (or no session exists).
    Keep,
    /// Send a cookie with this id.
    Set(String),
    /// Expire the cookie.
    Clear,
}

#[derive(Debug)]
struct StoredSession {
    data: SessionData,
    last_seen: Instant,
}

/// Process-local session store keyed by session id.
///
/// Entries idle for longer than the configured timeout are treated as
/// unknown on load and removed by [`SessionStore::purge_idle`].
#[derive(Debug)]
pub struct SessionStore {
    sessions: DashMap<String, StoredSession>,
    idle_timeout: Duration,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::with_idle_timeout(DEFAULT_IDLE_TIMEOUT)
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_idle_timeout(idle_timeout: Duration) -> Self {
        Self {
            sessions: DashMap::new(),
            idle_timeout,
        }
    }

    pub fn idle_timeout(&self) -> Duration {
        self.idle_timeout
    }

    /// Load the session for `id`, or start an empty one.
    ///
    /// Unknown and idle-expired ids are not adopted; a new id is issued when
    /// the session is saved.
    pub fn load(&self, id: Option<&str>) -> Session {
        self.load_at(id, Instant::now())
    }

    fn load_at(&self, id: Option<&str>, now: Instant) -> Session {
        let Some(id) = id else {
            return Session::default();
        };
        let expired = match self.sessions.get(id) {
            Some(entry) if !self.is_idle(&entry, now) => {
                return Session::restore(id.to_string(), entry.data.clone());
            }
            Some(_) => true,
            None => false,
        };
        if expired {
            self.sessions.remove_if(id, |_, entry| self.is_idle(entry, now));
            tracing::debug!(session_id = %id, "Session expired");
        }
        Session::default()
    }

    /// Persist the session and decide what the client cookie should become.
    pub fn save(&self, session: Session) -> CookieAction {
        let old_id = session.id().map(str::to_string);

        if session.is_destroyed() {
            if let Some(id) = old_id {
                self.sessions.remove(&id);
                return CookieAction::Clear;
            }
            return CookieAction::Keep;
        }

        match old_id {
            Some(id) if !session.needs_regeneration() => {
                self.insert(id, session.data().clone());
                CookieAction::Keep
            }
            old => {
                if let Some(id) = old {
                    self.sessions.remove(&id);
                }
                if session.data().is_empty() {
                    return match session.id() {
                        Some(_) => CookieAction::Clear,
                        None => CookieAction::Keep,
                    };
                }
                let id = Uuid::new_v4().to_string();
                self.insert(id.clone(), session.data().clone());
                tracing::debug!(session_id = %id, "Session issued");
                CookieAction::Set(id)
            }
        }
    }

    fn insert(&self, id: String, data: SessionData) {
        self.sessions.insert(
            id,
            StoredSession {
                data,
                last_seen: Instant::now(),
            },
        );
    }

    fn is_idle(&self, entry: &StoredSession, now: Instant) -> bool {
        now.saturating_duration_since(entry.last_seen) > self.idle_timeout
    }

    /// Remove every session idle past the timeout; returns how many were dropped.
    pub fn purge_idle(&self) -> usize {
        self.purge_idle_at(Instant::now())
    }

    fn purge_idle_at(&self, now: Instant) -> usize {
        let before = self.sessions.len();
        self.sessions.retain(|_, entry| !self.is_idle(entry, now));
        before.saturating_sub(self.sessions.len())
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

/// Purge idle sessions every `every` until shutdown fires.
pub async fn sweep_idle(
    store: Arc<SessionStore>,
    every: Duration,
    mut shutdown: broadcast::Receiver<()>,
) {
    let mut ticker = tokio::time::interval(every);
    ticker.tick().await;
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let purged = store.purge_idle();
                if purged > 0 {
                    tracing::debug!(purged, remaining = store.len(), "Idle sessions purged");
                }
            }
            _ = shutdown.recv() => break,
        }
    }
}
