//! In-memory registry of live connections per chat.
//!
//! Rooms are sharded by chat id so traffic for one chat never waits on a
//! lock held for another. A handle is the sending half of a bounded queue
//! drained by the connection's writer task.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use huddle_chats::ChatEvent;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::sync::{Mutex, OwnedMutexGuard};

type OrderingLocks = DashMap<String, Arc<Mutex<()>>>;
use tracing::{debug, error, warn};

static NEXT_CONNECTION_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identifier of a live connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(u64);

impl ConnectionId {
    pub fn next() -> Self {
        Self(NEXT_CONNECTION_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

#[derive(Debug, Clone)]
pub struct ConnectionHandle {
    id: ConnectionId,
    sender: mpsc::Sender<Arc<str>>,
}

impl ConnectionHandle {
    pub fn new(id: ConnectionId, sender: mpsc::Sender<Arc<str>>) -> Self {
        Self { id, sender }
    }

    pub fn id(&self) -> ConnectionId {
        self.id
    }
}

/// Outcome of one publish call, for logging only.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PublishReport {
    pub delivered: usize,
    /// Handles whose connection had already closed.
    pub skipped: usize,
    /// Handles whose queue was full; the frame was dropped for them.
    pub failed: usize,
}

#[derive(Default)]
pub struct Rooms {
    rooms: DashMap<String, HashMap<ConnectionId, ConnectionHandle>>,
    ordering: OrderingLocks,
}

/// Exclusive right to write to one chat. The chat's lock entry is dropped
/// with the last guard or waiter referencing it.
pub struct OrderingGuard<'a> {
    locks: &'a OrderingLocks,
    chat_id: String,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for OrderingGuard<'_> {
    fn drop(&mut self) {
        drop(self.guard.take());
        self.locks
            .remove_if(&self.chat_id, |_, lock| Arc::strong_count(lock) == 1);
    }
}

impl Rooms {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, chat_id: &str, handle: ConnectionHandle) {
        let connection_id = handle.id();
        let mut room = self.rooms.entry(chat_id.to_string()).or_default();
        room.insert(connection_id, handle);
        debug!(chat_id, %connection_id, connections = room.len(), "connection registered");
    }

    /// Removes the connection; the room itself goes away once empty.
    /// Returns whether the connection was registered.
    pub fn unregister(&self, chat_id: &str, connection_id: ConnectionId) -> bool {
        let removed = match self.rooms.get_mut(chat_id) {
            Some(mut room) => room.remove(&connection_id).is_some(),
            None => false,
        };
        self.rooms.remove_if(chat_id, |_, room| room.is_empty());

        if removed {
            debug!(chat_id, %connection_id, "connection unregistered");
        }
        removed
    }

    /// Sends `event` to every open connection in the chat's room.
    ///
    /// Never blocks: a connection whose queue is full misses this frame.
    /// The room stays read-locked while frames are enqueued, so a
    /// connection that has been unregistered receives nothing further.
    pub fn publish(&self, chat_id: &str, event: &ChatEvent) -> PublishReport {
        let mut report = PublishReport::default();
        let Some(room) = self.rooms.get(chat_id) else {
            return report;
        };

        let frame: Arc<str> = match serde_json::to_string(event) {
            Ok(json) => json.into(),
            Err(e) => {
                error!(chat_id, error = %e, "failed to serialize chat event");
                report.failed = room.len();
                return report;
            }
        };

        for (connection_id, handle) in room.iter() {
            match handle.sender.try_send(frame.clone()) {
                Ok(()) => report.delivered += 1,
                Err(TrySendError::Closed(_)) => report.skipped += 1,
                Err(TrySendError::Full(_)) => {
                    warn!(chat_id, %connection_id, "outbound queue full, dropping frame");
                    report.failed += 1;
                }
            }
        }

        debug!(
            chat_id,
            event = event.event_type(),
            delivered = report.delivered,
            skipped = report.skipped,
            failed = report.failed,
            "published chat event"
        );
        report
    }

    /// Serializes writers of one chat. Hold the guard across
    /// "persist, then publish" so broadcasts follow commit order.
    pub async fn ordering_guard(&self, chat_id: &str) -> OrderingGuard<'_> {
        let lock = self
            .ordering
            .entry(chat_id.to_string())
            .or_default()
            .clone();
        OrderingGuard {
            locks: &self.ordering,
            chat_id: chat_id.to_string(),
            guard: Some(lock.lock_owned().await),
        }
    }

    pub fn connection_count(&self, chat_id: &str) -> usize {
        self.rooms.get(chat_id).map(|room| room.len()).unwrap_or(0)
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    /// Chats with a writer holding or awaiting their ordering guard.
    pub fn ordering_lock_count(&self) -> usize {
        self.ordering.len()
    }
}
