//! Clock-in and clock-out commands.

use std::io::Write;

use anyhow::{Context, Result};
use cb_core::{Action, EventStore, Handler, Identity};
use chrono::{DateTime, Utc};

/// Records `action` for `user` at `now` and prints the confirmation.
pub fn run<W: Write, S: EventStore>(
    writer: &mut W,
    handler: &Handler<S>,
    user: &str,
    action: Action,
    now: DateTime<Utc>,
) -> Result<()> {
    let user = Identity::new(user).context("invalid --user")?;
    let reply = match action {
        Action::In => handler.handle_clock_in(&user, now)?,
        Action::Out => handler.handle_clock_out(&user, now)?,
    };
    writeln!(writer, "{reply}")?;
    Ok(())
}
