//! Team stats and per-user detail reports.
//!
//! Both reports query the store once per user with the window's lower bound
//! and reconcile the returned events. A store failure aborts the whole
//! report; partial totals are never rendered.

use chrono::{DateTime, Utc};

use crate::event::ClockEvent;
use crate::reconcile::{Disposition, Reconciler, Reconciliation, reconcile};
use crate::store::{EventStore, StoreError};
use crate::types::Identity;
use crate::window::{TimeWindow, UnitsElapsed};
use crate::zones;

/// Hours one user logged inside a window.
#[derive(Debug, Clone, PartialEq)]
pub struct UserTotal {
    pub user: Identity,
    pub hours: f64,
}

/// Totals for every user in scope.
#[derive(Debug, Clone, PartialEq)]
pub struct StatsReport {
    pub title: String,
    pub since: Option<DateTime<Utc>>,
    pub units_elapsed: Option<UnitsElapsed>,
    pub users: Vec<UserTotal>,
}

impl StatsReport {
    pub fn render(&self) -> String {
        let mut lines = vec![format!("⏰ Clock Stats ({}):", self.title)];
        lines.extend(
            self.users
                .iter()
                .map(|total| format!("- {}: {:.2} hrs", total.user, total.hours)),
        );
        if let Some(elapsed) = self.units_elapsed {
            lines.push(elapsed.to_string());
        }
        lines.join("\n")
    }
}

/// One user's events narrated line by line, with the reconciled total.
#[derive(Debug, Clone, PartialEq)]
pub struct DetailReport {
    pub user: Identity,
    pub since: Option<DateTime<Utc>>,
    pub lines: Vec<String>,
    pub reconciliation: Reconciliation,
}

impl DetailReport {
    pub fn render(&self) -> String {
        let mut out = match self.since {
            Some(since) => format!(
                "⏰ Report for {} since {}:",
                self.user,
                since.date_naive().format("%Y-%m-%d")
            ),
            None => format!("⏰ Report for {} (all time):", self.user),
        };
        for line in &self.lines {
            out.push('\n');
            out.push_str(line);
        }
        out.push_str(&format!(
            "\nTotal: {:.2} hrs",
            self.reconciliation.total_hours
        ));
        out
    }
}

/// Narrative line for a single event.
pub fn narrate(event: &ClockEvent) -> String {
    format!(
        " • {:<5.5} @ {}",
        event.action.label(),
        zones::render(event.timestamp)
    )
}

/// Total reconciled hours for `user` since `since`.
pub fn user_total<S: EventStore + ?Sized>(
    store: &S,
    user: &Identity,
    since: Option<DateTime<Utc>>,
) -> Result<f64, StoreError> {
    let events = store.query_events(user, since)?;
    Ok(reconcile(&events).total_hours)
}

/// Builds team stats for `target`, or for every known user when `None`.
pub fn team_stats<S: EventStore + ?Sized>(
    store: &S,
    window: &TimeWindow,
    target: Option<&Identity>,
    now: DateTime<Utc>,
) -> Result<StatsReport, StoreError> {
    let users = match target {
        Some(user) => vec![user.clone()],
        None => store.list_distinct_users()?,
    };
    tracing::debug!(users = users.len(), since = ?window.since, "building team stats");

    let users = users
        .into_iter()
        .map(|user| {
            let hours = user_total(store, &user, window.since)?;
            Ok(UserTotal { user, hours })
        })
        .collect::<Result<Vec<_>, StoreError>>()?;

    Ok(StatsReport {
        title: window.label.clone(),
        since: window.since,
        units_elapsed: window.units_elapsed(now),
        users,
    })
}

/// Builds a narrated report of `user`'s events inside `window`.
pub fn detail_report<S: EventStore + ?Sized>(
    store: &S,
    user: &Identity,
    window: &TimeWindow,
) -> Result<DetailReport, StoreError> {
    let events = store.query_events(user, window.since)?;

    let mut reconciler = Reconciler::new();
    let mut lines = Vec::with_capacity(events.len());
    for event in &events {
        lines.push(narrate(event));
        match reconciler.push(event) {
            Disposition::Dangling => {
                tracing::debug!(%user, timestamp = %event.timestamp, "dangling clock-out");
            }
            Disposition::Superseded { previous } => {
                tracing::debug!(%user, %previous, "open clock-in replaced");
            }
            Disposition::Opened | Disposition::Closed(_) => {}
        }
    }

    Ok(DetailReport {
        user: user.clone(),
        since: window.since,
        lines,
        reconciliation: reconciler.finish(),
    })
}
