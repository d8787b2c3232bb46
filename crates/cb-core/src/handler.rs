//! Command handlers consumed by the transport.
//!
//! Every handler returns the reply text or a [`CommandError`]. The
//! [`Handler::handle_message`] entry point maps errors to short replies, so
//! a transport never has to deal with failures itself.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::action::Action;
use crate::command::{Command, ReportSpec};
use crate::report::{detail_report, team_stats};
use crate::store::{EventStore, StoreError};
use crate::types::{Identity, ValidationError};
use crate::window::{self, Period, WindowError};
use crate::zones;

/// Reasons a command could not be carried out.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Bad period keyword or relative spec.
    #[error(transparent)]
    Window(#[from] WindowError),

    /// Individual reports are restricted to admins.
    #[error("{sender} is not allowed to run individual reports")]
    Unauthorized { sender: String },

    /// `report` without an `@**User**` mention.
    #[error("report needs a user mention")]
    MissingMention,

    /// The sender has no usable identity.
    #[error("invalid sender: {0}")]
    InvalidSender(#[from] ValidationError),

    /// The event store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl CommandError {
    /// Short reply shown to the user.
    pub fn reply(&self) -> String {
        match self {
            Self::Window(WindowError::InvalidPeriod(_)) => {
                "Invalid period. Use: day, week, month, year, or all.".to_string()
            }
            Self::Window(WindowError::InvalidRelativeSpec(_)) => {
                "Usage: report @**User** <N> weeks/months/years".to_string()
            }
            Self::Unauthorized { .. } => {
                "❌ You’re not authorized to run individual reports.".to_string()
            }
            Self::MissingMention => "Usage: report @**User** [day|week|month|year|all] \
                 or report @**User** <N> units"
                .to_string(),
            Self::InvalidSender(_) => "❓ I could not tell who sent that.".to_string(),
            Self::Store(_) => "⚠️ Could not reach the event store; try again later.".to_string(),
        }
    }
}

/// An incoming chat message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub content: String,
    pub sender_name: String,
    pub sender_email: String,
}

/// Help text listing every command.
pub const USAGE: &str = "Commands:
 • in / clock in                  — record your start time
 • out / clock out                — record your end time
 • stats [day|week|month|year|all] — team totals
 • report @User [day|week|month|year|all]         — individual totals (admin)
 • report @User <N> weeks/months/years — last N units (admin)
 • help                           — show this message";

const UNKNOWN_REPLY: &str = "❓ Unknown command. Type `help` for usage.";

/// Runs commands against an event store.
#[derive(Debug)]
pub struct Handler<S> {
    store: S,
    admins: Vec<String>,
}

impl<S: EventStore> Handler<S> {
    /// Creates a handler. `admins` are the sender emails allowed to run
    /// individual reports.
    pub fn new<I, A>(store: S, admins: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<String>,
    {
        Self {
            store,
            admins: admins.into_iter().map(Into::into).collect(),
        }
    }

    pub const fn store(&self) -> &S {
        &self.store
    }

    pub fn is_admin(&self, email: &str) -> bool {
        self.admins.iter().any(|admin| admin == email)
    }

    pub fn handle_clock_in(&self, user: &Identity, now: DateTime<Utc>) -> Result<String, CommandError> {
        self.store.append_event(user, Action::In, now)?;
        tracing::info!(%user, "clocked in");
        Ok(format!("✅ {user} CLOCK IN at:\n{}", zones::render(now)))
    }

    pub fn handle_clock_out(&self, user: &Identity, now: DateTime<Utc>) -> Result<String, CommandError> {
        self.store.append_event(user, Action::Out, now)?;
        tracing::info!(%user, "clocked out");
        Ok(format!("⏱️ {user} CLOCK OUT at:\n{}", zones::render(now)))
    }

    /// Team totals for a period keyword, optionally for one user only.
    pub fn handle_stats(
        &self,
        period: &str,
        target: Option<&Identity>,
        now: DateTime<Utc>,
    ) -> Result<String, CommandError> {
        let period: Period = period.parse()?;
        let window = window::resolve(period, now);
        Ok(team_stats(&self.store, &window, target, now)?.render())
    }

    /// Individual report, restricted to admins.
    ///
    /// A period keyword renders the stats view for that user; a relative
    /// spec renders the event-by-event narrative.
    pub fn handle_detail_report(
        &self,
        sender_email: &str,
        user: Option<&Identity>,
        spec: &ReportSpec,
        now: DateTime<Utc>,
    ) -> Result<String, CommandError> {
        if !self.is_admin(sender_email) {
            tracing::warn!(sender = sender_email, "unauthorized report request");
            return Err(CommandError::Unauthorized {
                sender: sender_email.to_string(),
            });
        }
        let user = user.ok_or(CommandError::MissingMention)?;

        match spec {
            ReportSpec::Period(period) => {
                let window = window::resolve(*period, now);
                Ok(team_stats(&self.store, &window, Some(user), now)?.render())
            }
            ReportSpec::Relative { count, unit } => {
                let window = window::parse_relative(count, unit, now)?;
                Ok(detail_report(&self.store, user, &window)?.render())
            }
        }
    }

    /// Parses and runs one message, stamping events with the current time.
    pub fn handle_message(&self, message: &Message) -> Option<String> {
        self.handle_message_at(message, Utc::now())
    }

    /// Parses and runs one message at `now`. Blank messages get no reply.
    pub fn handle_message_at(&self, message: &Message, now: DateTime<Utc>) -> Option<String> {
        let command = Command::parse(&message.content)?;
        tracing::debug!(?command, sender = %message.sender_email, "dispatching command");

        let result = match command {
            Command::ClockIn => Identity::new(message.sender_name.as_str())
                .map_err(CommandError::from)
                .and_then(|user| self.handle_clock_in(&user, now)),
            Command::ClockOut => Identity::new(message.sender_name.as_str())
                .map_err(CommandError::from)
                .and_then(|user| self.handle_clock_out(&user, now)),
            Command::Stats { period, target } => self.handle_stats(&period, target.as_ref(), now),
            Command::Report { user, spec } => {
                self.handle_detail_report(&message.sender_email, user.as_ref(), &spec, now)
            }
            Command::Help => Ok(USAGE.to_string()),
            Command::Unknown => Ok(UNKNOWN_REPLY.to_string()),
        };

        Some(result.unwrap_or_else(|err| {
            if let CommandError::Store(source) = &err {
                tracing::warn!(error = %source, "event store failure");
            }
            err.reply()
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::ClockEvent;
    use crate::store::MemoryStore;
    use chrono::TimeDelta;
    use insta::assert_snapshot;

    const ADMIN: &str = "boss@example.com";

    fn at(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    fn handler() -> Handler<MemoryStore> {
        Handler::new(MemoryStore::new(), [ADMIN])
    }

    fn message(content: &str, name: &str, email: &str) -> Message {
        Message {
            content: content.to_string(),
            sender_name: name.to_string(),
            sender_email: email.to_string(),
        }
    }

    fn say(handler: &Handler<MemoryStore>, content: &str, name: &str, now: DateTime<Utc>) -> String {
        handler
            .handle_message_at(&message(content, name, "someone@example.com"), now)
            .expect("reply")
    }

    fn admin_says(handler: &Handler<MemoryStore>, content: &str, now: DateTime<Utc>) -> String {
        handler
            .handle_message_at(&message(content, "Boss", ADMIN), now)
            .expect("reply")
    }

    struct DownStore;

    impl EventStore for DownStore {
        fn append_event(
            &self,
            _user: &Identity,
            _action: Action,
            _timestamp: DateTime<Utc>,
        ) -> Result<(), StoreError> {
            Err(StoreError::backend("connection refused"))
        }

        fn query_events(
            &self,
            _user: &Identity,
            _since: Option<DateTime<Utc>>,
        ) -> Result<Vec<ClockEvent>, StoreError> {
            Err(StoreError::backend("connection refused"))
        }

        fn list_distinct_users(&self) -> Result<Vec<Identity>, StoreError> {
            Err(StoreError::backend("connection refused"))
        }
    }

    #[test]
    fn clock_in_records_and_replies_with_zones() {
        let handler = handler();
        let reply = say(&handler, "clock in", "Ada", at("2024-01-01T00:00:00Z"));

        assert_snapshot!(reply, @r"
        ✅ Ada CLOCK IN at:
        UTC 2024-01-01 00:00:00 | NYC 2023-12-31 19:00:00 | IST 2024-01-01 05:30:00 | NPT 2024-01-01 05:45:00
        ");
        let ada = Identity::new("Ada").unwrap();
        let events = handler.store().query_events(&ada, None).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].action, Action::In);
    }

    #[test]
    fn clock_out_reply() {
        let handler = handler();
        let reply = say(&handler, "out", "Ada", at("2024-07-04T16:00:00Z"));
        assert!(reply.starts_with("⏱️ Ada CLOCK OUT at:\nUTC 2024-07-04 16:00:00 | NYC 2024-07-04 12:00:00"));
    }

    #[test]
    fn chatter_is_not_recorded() {
        let handler = handler();
        let now = at("2024-03-15T09:00:00Z");
        for text in ["in a meeting, back soon", "out of office tomorrow", "in out"] {
            assert_eq!(
                say(&handler, text, "Ada", now),
                "❓ Unknown command. Type `help` for usage."
            );
        }

        let ada = Identity::new("Ada").unwrap();
        assert!(handler.store().query_events(&ada, None).unwrap().is_empty());
    }

    #[test]
    fn full_day_of_stats() {
        let handler = handler();
        let start = at("2024-03-15T09:00:00Z");
        say(&handler, "in", "Ada", start);
        say(&handler, "in", "Bob", start + TimeDelta::minutes(15));
        say(&handler, "out", "Ada", start + TimeDelta::hours(4));
        say(&handler, "out", "Bob", start + TimeDelta::minutes(45));

        let reply = say(&handler, "stats", "Ada", start + TimeDelta::hours(5));
        assert_snapshot!(reply, @r"
        ⏰ Clock Stats (Day):
        - Ada: 4.00 hrs
        - Bob: 0.50 hrs
        ");
    }

    #[test]
    fn stats_rejects_unknown_period() {
        let handler = handler();
        let reply = say(&handler, "stats fortnight", "Ada", at("2024-03-15T09:00:00Z"));
        assert_eq!(reply, "Invalid period. Use: day, week, month, year, or all.");
    }

    #[test]
    fn handle_stats_narrows_to_target() {
        let handler = handler();
        let start = at("2024-03-15T09:00:00Z");
        say(&handler, "in", "Ada", start);
        say(&handler, "in", "Bob", start);
        say(&handler, "out", "Bob", start + TimeDelta::hours(2));

        let bob = Identity::new("Bob").unwrap();
        let reply = handler
            .handle_stats("day", Some(&bob), start + TimeDelta::hours(3))
            .unwrap();
        assert_eq!(reply, "⏰ Clock Stats (Day):\n- Bob: 2.00 hrs");
    }

    #[test]
    fn handle_stats_returns_typed_error() {
        let handler = handler();
        let err = handler
            .handle_stats("hour", None, at("2024-03-15T09:00:00Z"))
            .unwrap_err();
        assert!(matches!(err, CommandError::Window(WindowError::InvalidPeriod(_))));
    }

    #[test]
    fn report_requires_admin() {
        let handler = handler();
        let reply = say(&handler, "report @**Ada** week", "Ada", at("2024-03-15T09:00:00Z"));
        assert_eq!(reply, "❌ You’re not authorized to run individual reports.");
    }

    #[test]
    fn report_requires_mention() {
        let handler = handler();
        let reply = admin_says(&handler, "report Ada week", at("2024-03-15T09:00:00Z"));
        assert_eq!(
            reply,
            "Usage: report @**User** [day|week|month|year|all] or report @**User** <N> units"
        );
    }

    #[test]
    fn report_with_keyword_uses_stats_view() {
        let handler = handler();
        let start = at("2024-03-11T09:00:00Z");
        say(&handler, "in", "Ada Lovelace", start);
        say(&handler, "out", "Ada Lovelace", start + TimeDelta::minutes(150));

        let reply = admin_says(
            &handler,
            "report @**Ada Lovelace** week",
            at("2024-03-15T09:00:00Z"),
        );
        assert_snapshot!(reply, @r"
        ⏰ Clock Stats (Week):
        - Ada Lovelace: 2.50 hrs
        Units elapsed: 0 week(s)
        ");
    }

    #[test]
    fn report_with_relative_spec_narrates() {
        let handler = handler();
        let start = at("2024-01-01T00:00:00Z");
        say(&handler, "in", "Ada", start);
        say(&handler, "out", "Ada", start + TimeDelta::hours(1));
        say(&handler, "in", "Ada", start + TimeDelta::hours(2));

        let reply = admin_says(&handler, "report @**Ada** 2 weeks", at("2024-01-05T00:00:00Z"));
        assert_snapshot!(reply, @r"
        ⏰ Report for Ada since 2023-12-22:
         • IN    @ UTC 2024-01-01 00:00:00 | NYC 2023-12-31 19:00:00 | IST 2024-01-01 05:30:00 | NPT 2024-01-01 05:45:00
         • OUT   @ UTC 2024-01-01 01:00:00 | NYC 2023-12-31 20:00:00 | IST 2024-01-01 06:30:00 | NPT 2024-01-01 06:45:00
         • IN    @ UTC 2024-01-01 02:00:00 | NYC 2023-12-31 21:00:00 | IST 2024-01-01 07:30:00 | NPT 2024-01-01 07:45:00
        Total: 1.00 hrs
        ");
    }

    #[test]
    fn report_with_bad_relative_spec() {
        let handler = handler();
        let now = at("2024-03-15T09:00:00Z");
        for text in [
            "report @**Ada** two weeks",
            "report @**Ada** 2 days",
            "report @**Ada** 0 months",
            "report @**Ada**",
        ] {
            assert_eq!(
                admin_says(&handler, text, now),
                "Usage: report @**User** <N> weeks/months/years",
                "{text}"
            );
        }
    }

    #[test]
    fn store_failure_is_reported_not_zeroed() {
        let handler = Handler::new(DownStore, [ADMIN]);
        let now = at("2024-03-15T09:00:00Z");
        let down = "⚠️ Could not reach the event store; try again later.";

        for text in ["in", "out", "stats week", "report @**Ada** 1 week", "report @**Ada** all"] {
            let reply = handler
                .handle_message_at(&message(text, "Ada", ADMIN), now)
                .unwrap();
            assert_eq!(reply, down, "{text}");
        }
    }

    #[test]
    fn help_unknown_and_blank() {
        let handler = handler();
        let now = at("2024-03-15T09:00:00Z");
        assert_eq!(say(&handler, "help", "Ada", now), USAGE);
        assert_eq!(
            say(&handler, "sing", "Ada", now),
            "❓ Unknown command. Type `help` for usage."
        );
        assert_eq!(
            handler.handle_message_at(&message("  ", "Ada", ADMIN), now),
            None
        );
    }

    #[test]
    fn blank_sender_cannot_clock() {
        let handler = handler();
        let reply = say(&handler, "in", " ", at("2024-03-15T09:00:00Z"));
        assert_eq!(reply, "❓ I could not tell who sent that.");
        assert!(handler.store().is_empty().unwrap());
    }
}
