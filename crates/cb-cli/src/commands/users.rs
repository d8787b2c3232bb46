//! Users command for listing everyone with recorded events.

use std::io::Write;

use anyhow::Result;
use cb_core::EventStore;

/// Runs the users command.
pub fn run<W: Write, S: EventStore>(writer: &mut W, store: &S) -> Result<()> {
    let users = store.list_distinct_users()?;

    if users.is_empty() {
        writeln!(writer, "No one has clocked in yet.")?;
        return Ok(());
    }

    for user in users {
        writeln!(writer, "{user}")?;
    }
    Ok(())
}
