//! Parsing of chat text into commands.
//!
//! Parsing never fails: anything unrecognised becomes [`Command::Unknown`],
//! and argument problems (bad period, bad relative spec, missing mention)
//! are carried through so the handler can answer with the right usage line.

use crate::mention::find_mention;
use crate::types::Identity;
use crate::window::Period;

/// Default period for `stats` with no argument.
pub const DEFAULT_STATS_PERIOD: &str = "day";

/// What a report should cover.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportSpec {
    /// A calendar period keyword.
    Period(Period),
    /// `<count> <unit>`, validated when the report runs.
    Relative { count: String, unit: String },
}

impl ReportSpec {
    /// Reads a spec from the trailing tokens of a report command.
    ///
    /// A trailing period keyword wins; otherwise the last two tokens are
    /// taken as count and unit.
    pub fn from_tokens(tokens: &[&str]) -> Self {
        if let Some(period) = tokens.last().and_then(|last| last.parse().ok()) {
            return Self::Period(period);
        }
        match tokens {
            [.., count, unit] => Self::Relative {
                count: (*count).to_string(),
                unit: (*unit).to_string(),
            },
            [single] => Self::Relative {
                count: String::new(),
                unit: (*single).to_string(),
            },
            [] => Self::Relative {
                count: String::new(),
                unit: String::new(),
            },
        }
    }
}

/// A parsed chat command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    ClockIn,
    ClockOut,
    /// Team totals. `period` is the raw token, checked by the handler.
    /// The chat parser always leaves `target` empty; callers that build the
    /// command directly set it to narrow the totals to one user.
    Stats {
        period: String,
        target: Option<Identity>,
    },
    /// Individual report. `user` is `None` when no mention was found.
    Report {
        user: Option<Identity>,
        spec: ReportSpec,
    },
    Help,
    Unknown,
}

impl Command {
    /// Parses one chat message. Returns `None` for blank messages.
    pub fn parse(text: &str) -> Option<Self> {
        let parts: Vec<&str> = text.split_whitespace().collect();
        let first = parts.first()?.to_lowercase();
        let second = parts.get(1).map(|s| s.to_lowercase());

        let command = match (first.as_str(), second.as_deref()) {
            ("in", None | Some("in")) | ("clock", Some("in")) => Self::ClockIn,
            ("out", None | Some("out")) | ("clock", Some("out")) => Self::ClockOut,
            ("stats", period) => Self::Stats {
                period: period.unwrap_or(DEFAULT_STATS_PERIOD).to_string(),
                target: None,
            },
            ("report", _) => Self::Report {
                user: find_mention(text).and_then(|name| Identity::new(name).ok()),
                spec: ReportSpec::from_tokens(&parts),
            },
            ("help", _) => Self::Help,
            _ => Self::Unknown,
        };
        Some(command)
    }
}
