//! Recorded clock events.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::action::Action;
use crate::types::Identity;

/// A single clock-in or clock-out, immutable once recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClockEvent {
    /// Who clocked.
    pub user: Identity,
    /// Whether this opened or closed a session.
    pub action: Action,
    /// When the event was recorded.
    pub timestamp: DateTime<Utc>,
}

impl ClockEvent {
    pub const fn new(user: Identity, action: Action, timestamp: DateTime<Utc>) -> Self {
        Self {
            user,
            action,
            timestamp,
        }
    }
}
