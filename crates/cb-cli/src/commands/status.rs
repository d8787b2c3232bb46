//! Status command for showing where events live and what happened last.

use std::io::Write;
use std::path::Path;

use anyhow::Result;

use cb_core::zones;
use cb_db::Database;

pub fn run<W: Write>(writer: &mut W, db: &Database, database_path: &Path) -> Result<()> {
    writeln!(writer, "Clockbot status")?;
    writeln!(writer, "Database: {}", database_path.display())?;
    writeln!(writer, "Events:   {}", db.event_count()?)?;

    match db.last_event()? {
        Some(event) => writeln!(
            writer,
            "Last:     {} {} @ {}",
            event.user,
            event.action.label(),
            zones::render(event.timestamp)
        )?,
        None => writeln!(writer, "No events recorded.")?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use cb_core::{Action, Identity};
    use chrono::{DateTime, Utc};
    use insta::assert_snapshot;

    #[test]
    fn status_command_outputs_last_event() {
        let temp = tempfile::tempdir().unwrap();
        let db_path = temp.path().join("clockbot.db");
        let db = Database::open(&db_path).unwrap();

        let ada = Identity::new("Ada").unwrap();
        let at = |s: &str| DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc);
        db.insert_event(&ada, Action::In, at("2025-01-01T09:00:00Z"))
            .unwrap();
        db.insert_event(&ada, Action::Out, at("2025-01-01T17:00:00Z"))
            .unwrap();

        let mut output = Vec::new();
        run(&mut output, &db, &db_path).unwrap();

        let output = String::from_utf8(output).unwrap();
        let output = output.replace(&db_path.display().to_string(), "[TEMP]/clockbot.db");
        assert_snapshot!(output.trim_end(), @r"
        Clockbot status
        Database: [TEMP]/clockbot.db
        Events:   2
        Last:     Ada OUT @ UTC 2025-01-01 17:00:00 | NYC 2025-01-01 12:00:00 | IST 2025-01-01 22:30:00 | NPT 2025-01-01 22:45:00
        ");
    }

    #[test]
    fn status_command_on_empty_database() {
        let db = Database::open_in_memory().unwrap();
        let mut output = Vec::new();
        run(&mut output, &db, Path::new("/data/clockbot.db")).unwrap();

        assert_eq!(
            String::from_utf8(output).unwrap(),
            "Clockbot status\nDatabase: /data/clockbot.db\nEvents:   0\nNo events recorded.\n"
        );
    }
}
