//! Process-lifetime log of command outcomes.
//!
//! The [`RunHistory`] is created once at startup and appended to by every
//! command handler. Storage is unbounded for the life of the process;
//! the read path surfaces only the most recent [`RECENT_WINDOW`] events.

use tokio::sync::RwLock;

use crate::domain::{EventKind, HistoryEvent};

/// Number of events surfaced by [`RunHistory::recent`].
pub const RECENT_WINDOW: usize = 50;

/// Append-only, in-memory record of command outcomes.
///
/// Owned by the application root and shared with command handlers; the
/// enumerator and batch runner never touch it.
#[derive(Debug, Default)]
pub struct RunHistory {
    events: RwLock<Vec<HistoryEvent>>,
}

impl RunHistory {
    /// Creates an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one event stamped with the current time.
    pub async fn record(&self, kind: EventKind, count: Option<usize>) {
        self.events.write().await.push(HistoryEvent::new(kind, count));
    }

    /// Returns the last [`RECENT_WINDOW`] events in insertion order.
    ///
    /// Older events remain stored but are never surfaced here.
    pub async fn recent(&self) -> Vec<HistoryEvent> {
        let events = self.events.read().await;
        let start = events.len().saturating_sub(RECENT_WINDOW);
        events[start..].to_vec()
    }

    /// Total number of events recorded since startup.
    pub async fn len(&self) -> usize {
        self.events.read().await.len()
    }

    /// Whether no event has been recorded yet.
    pub async fn is_empty(&self) -> bool {
        self.events.read().await.is_empty()
    }
}
