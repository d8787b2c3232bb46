//! Event store abstraction.
//!
//! The store is an append-only log of clock events. Reports re-query it on
//! every request; nothing above this layer caches event history.
//!
//! # Ordering
//!
//! [`EventStore::query_events`] returns events in timestamp order, ties in
//! append order. [`EventStore::list_distinct_users`] returns users in the
//! order they first appeared, so repeated reports list users identically.

use std::error::Error as StdError;
use std::sync::RwLock;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::action::Action;
use crate::event::ClockEvent;
use crate::types::Identity;

/// Failure reported by a store backend.
///
/// Always propagated to the caller; an unavailable store is never treated
/// as "no events".
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backend failed to read or write.
    #[error("event store backend failed: {0}")]
    Backend(#[source] Box<dyn StdError + Send + Sync>),

    /// A writer panicked while holding the store lock.
    #[error("event store lock poisoned")]
    Poisoned,
}

impl StoreError {
    pub fn backend(source: impl Into<Box<dyn StdError + Send + Sync>>) -> Self {
        Self::Backend(source.into())
    }
}

/// Append-only storage for clock events.
pub trait EventStore {
    /// Records one event.
    fn append_event(
        &self,
        user: &Identity,
        action: Action,
        timestamp: DateTime<Utc>,
    ) -> Result<(), StoreError>;

    /// Returns `user`'s events at or after `since`, oldest first.
    fn query_events(
        &self,
        user: &Identity,
        since: Option<DateTime<Utc>>,
    ) -> Result<Vec<ClockEvent>, StoreError>;

    /// Returns every user with at least one event, in first-seen order.
    fn list_distinct_users(&self) -> Result<Vec<Identity>, StoreError>;
}

#[derive(Debug, Default)]
struct MemoryLog {
    events: Vec<ClockEvent>,
    users: Vec<Identity>,
}

/// Process-local event store.
///
/// Readers take a shared lock, so a report always sees a consistent prefix
/// of the appended events.
#[derive(Debug, Default)]
pub struct MemoryStore {
    log: RwLock<MemoryLog>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored events across all users.
    pub fn len(&self) -> Result<usize, StoreError> {
        let log = self.log.read().map_err(|_| StoreError::Poisoned)?;
        Ok(log.events.len())
    }

    pub fn is_empty(&self) -> Result<bool, StoreError> {
        self.len().map(|len| len == 0)
    }
}

impl EventStore for MemoryStore {
    fn append_event(
        &self,
        user: &Identity,
        action: Action,
        timestamp: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let mut log = self.log.write().map_err(|_| StoreError::Poisoned)?;
        if !log.users.contains(user) {
            log.users.push(user.clone());
        }
        // Keep the log sorted; equal timestamps stay in append order.
        let at = log.events.partition_point(|e| e.timestamp <= timestamp);
        log.events
            .insert(at, ClockEvent::new(user.clone(), action, timestamp));
        tracing::debug!(%user, %action, %timestamp, "appended clock event");
        Ok(())
    }

    fn query_events(
        &self,
        user: &Identity,
        since: Option<DateTime<Utc>>,
    ) -> Result<Vec<ClockEvent>, StoreError> {
        let log = self.log.read().map_err(|_| StoreError::Poisoned)?;
        Ok(log
            .events
            .iter()
            .filter(|e| &e.user == user)
            .filter(|e| since.is_none_or(|since| e.timestamp >= since))
            .cloned()
            .collect())
    }

    fn list_distinct_users(&self) -> Result<Vec<Identity>, StoreError> {
        let log = self.log.read().map_err(|_| StoreError::Poisoned)?;
        Ok(log.users.clone())
    }
}
