//! Session reconciliation.
//!
//! Pairs each clock-in with the next clock-out of the same user and sums the
//! paired durations. The input must already be in chronological order and
//! already restricted to the report window; nothing here filters by time.
//!
//! Unpaired events never contribute to totals:
//! - an `out` with no open `in` is dangling and ignored,
//! - an `in` while another `in` is still open replaces it (last open wins),
//! - an `in` still open at the end of the stream is reported as open.

use chrono::{DateTime, TimeDelta, Utc};

use crate::action::Action;
use crate::event::ClockEvent;

/// A paired clock-in and clock-out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Session {
    pub clock_in: DateTime<Utc>,
    pub clock_out: DateTime<Utc>,
}

impl Session {
    /// Duration of the session in fractional hours.
    pub fn hours(&self) -> f64 {
        delta_hours(self.clock_out - self.clock_in)
    }
}

/// What happened to a single event as it was fed to a [`Reconciler`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// An `in` opened a session.
    Opened,
    /// An `in` opened a session and discarded the still-open one.
    Superseded { previous: DateTime<Utc> },
    /// An `out` closed the open session.
    Closed(Session),
    /// An `out` arrived with no open session.
    Dangling,
}

/// Result of reconciling one user's events.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Reconciliation {
    /// Sum of all closed session durations, in hours.
    pub total_hours: f64,
    /// Closed sessions in the order they closed.
    pub sessions: Vec<Session>,
    /// Clock-in still open when the stream ended.
    pub open_since: Option<DateTime<Utc>>,
    /// Clock-outs that had nothing to close.
    pub dangling_outs: Vec<DateTime<Utc>>,
    /// Clock-ins discarded because a later clock-in replaced them.
    pub superseded_ins: Vec<DateTime<Utc>>,
}

/// Streaming form of [`reconcile`], for callers that render as they go.
#[derive(Debug, Default)]
pub struct Reconciler {
    state: Reconciliation,
}

impl Reconciler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds the next event in chronological order.
    pub fn push(&mut self, event: &ClockEvent) -> Disposition {
        let state = &mut self.state;
        match event.action {
            Action::In => match state.open_since.replace(event.timestamp) {
                Some(previous) => {
                    tracing::debug!(user = %event.user, %previous, "unmatched clock-in superseded");
                    state.superseded_ins.push(previous);
                    Disposition::Superseded { previous }
                }
                None => Disposition::Opened,
            },
            Action::Out => match state.open_since.take() {
                Some(clock_in) => {
                    let session = Session {
                        clock_in,
                        clock_out: event.timestamp,
                    };
                    state.total_hours += session.hours();
                    state.sessions.push(session);
                    Disposition::Closed(session)
                }
                None => {
                    tracing::debug!(user = %event.user, at = %event.timestamp, "clock-out without clock-in");
                    state.dangling_outs.push(event.timestamp);
                    Disposition::Dangling
                }
            },
        }
    }

    /// Running total of closed sessions so far.
    pub const fn total_hours(&self) -> f64 {
        self.state.total_hours
    }

    pub fn finish(self) -> Reconciliation {
        self.state
    }
}

/// Reconciles a chronologically ordered event list in a single pass.
pub fn reconcile(events: &[ClockEvent]) -> Reconciliation {
    let mut reconciler = Reconciler::new();
    for event in events {
        reconciler.push(event);
    }
    reconciler.finish()
}

#[allow(clippy::cast_precision_loss)]
fn delta_hours(delta: TimeDelta) -> f64 {
    let seconds = delta
        .num_microseconds()
        .map_or_else(|| delta.num_seconds() as f64, |us| us as f64 / 1_000_000.0);
    seconds / 3600.0
}
