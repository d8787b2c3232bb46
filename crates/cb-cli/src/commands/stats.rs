//! Stats command for team hour totals.
//!
//! Prints the same text the chat bot replies with, or a JSON document with
//! `--json`.

use std::io::Write;

use anyhow::{Context, Result};
use cb_core::{EventStore, Identity, Period, StatsReport, team_stats, window};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

// ========== JSON Output ==========

/// JSON stats structure.
#[derive(Debug, Serialize)]
pub struct JsonStats {
    pub title: String,
    pub since: Option<String>,
    pub units_elapsed: Option<String>,
    pub users: Vec<JsonUserTotal>,
}

#[derive(Debug, Serialize)]
pub struct JsonUserTotal {
    pub user: String,
    pub hours: f64,
}

impl From<&StatsReport> for JsonStats {
    fn from(report: &StatsReport) -> Self {
        Self {
            title: report.title.clone(),
            since: report
                .since
                .map(|since| since.to_rfc3339_opts(SecondsFormat::Secs, true)),
            units_elapsed: report.units_elapsed.map(|elapsed| elapsed.to_string()),
            users: report
                .users
                .iter()
                .map(|total| JsonUserTotal {
                    user: total.user.to_string(),
                    hours: total.hours,
                })
                .collect(),
        }
    }
}

// ========== Public Interface ==========

/// Runs the stats command.
pub fn run<W: Write, S: EventStore>(
    writer: &mut W,
    store: &S,
    period: &str,
    user: Option<&str>,
    json: bool,
    now: DateTime<Utc>,
) -> Result<()> {
    let period: Period = period.parse()?;
    let target = user
        .map(Identity::new)
        .transpose()
        .context("invalid --user")?;

    let window = window::resolve(period, now);
    let report = team_stats(store, &window, target.as_ref(), now)?;

    if json {
        let output = serde_json::to_string_pretty(&JsonStats::from(&report))?;
        writeln!(writer, "{output}")?;
    } else {
        writeln!(writer, "{}", report.render())?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use cb_core::Action;
    use cb_db::Database;
    use insta::assert_snapshot;

    fn at(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    fn seeded() -> Database {
        let db = Database::open_in_memory().unwrap();
        let ada = Identity::new("ada").unwrap();
        let bob = Identity::new("bob").unwrap();
        db.insert_event(&ada, Action::In, at("2024-03-12T09:00:00Z"))
            .unwrap();
        db.insert_event(&bob, Action::In, at("2024-03-12T10:00:00Z"))
            .unwrap();
        db.insert_event(&ada, Action::Out, at("2024-03-12T12:30:00Z"))
            .unwrap();
        db
    }

    #[test]
    fn stats_text_output() {
        let db = seeded();
        let mut output = Vec::new();
        run(&mut output, &db, "week", None, false, at("2024-03-15T10:00:00Z")).unwrap();

        assert_snapshot!(String::from_utf8(output).unwrap().trim_end(), @r"
        ⏰ Clock Stats (Week):
        - ada: 3.50 hrs
        - bob: 0.00 hrs
        Units elapsed: 0 week(s)
        ");
    }

    #[test]
    fn stats_json_output() {
        let db = seeded();
        let mut output = Vec::new();
        run(&mut output, &db, "month", Some("ada"), true, at("2024-03-15T10:00:00Z")).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&output).unwrap();
        assert_eq!(value["title"], "Month");
        assert_eq!(value["since"], "2024-03-01T00:00:00Z");
        assert_eq!(value["units_elapsed"], "Units elapsed: 0 month(s)");
        assert_eq!(value["users"][0]["user"], "ada");
        assert_eq!(value["users"][0]["hours"], 3.5);
        assert_eq!(value["users"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn stats_json_all_time_has_null_since() {
        let db = seeded();
        let mut output = Vec::new();
        run(&mut output, &db, "all", None, true, at("2024-03-15T10:00:00Z")).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&output).unwrap();
        assert_eq!(value["title"], "All time");
        assert!(value["since"].is_null());
        assert!(value["units_elapsed"].is_null());
    }

    #[test]
    fn stats_rejects_unknown_period() {
        let db = seeded();
        let mut output = Vec::new();
        let err = run(&mut output, &db, "decade", None, false, Utc::now()).unwrap_err();
        assert_eq!(err.to_string(), "invalid period: decade");
        assert!(output.is_empty());
    }
}
