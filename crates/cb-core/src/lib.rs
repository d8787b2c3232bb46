//! Core domain logic for clockbot.
//!
//! This crate contains:
//! - Window resolution: turning `week` or `2 months` into a lower bound
//! - Reconciliation: pairing clock-ins with clock-outs into hour totals
//! - Reporting: team stats and narrated per-user reports
//! - Commands: parsing chat text and running it against an [`EventStore`]

pub mod action;
pub mod command;
pub mod event;
pub mod handler;
pub mod mention;
pub mod reconcile;
pub mod report;
pub mod store;
pub mod types;
pub mod window;
pub mod zones;

pub use action::{Action, UnknownAction};
pub use command::{Command, ReportSpec};
pub use event::ClockEvent;
pub use handler::{CommandError, Handler, Message, USAGE};
pub use mention::{find_mention, strip_mention};
pub use reconcile::{Reconciliation, Session, reconcile};
pub use report::{DetailReport, StatsReport, UserTotal, detail_report, team_stats};
pub use store::{EventStore, MemoryStore, StoreError};
pub use types::{Identity, ValidationError};
pub use window::{Period, RelativeUnit, TimeWindow, WindowError, resolve, resolve_relative};
