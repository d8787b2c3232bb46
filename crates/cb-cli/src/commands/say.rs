//! Say command: feeds one chat message through the bot.

use std::io::Write;

use anyhow::Result;
use cb_core::{EventStore, Handler, Message};
use chrono::{DateTime, Utc};

/// Runs the say command. Blank messages print nothing.
pub fn run<W: Write, S: EventStore>(
    writer: &mut W,
    handler: &Handler<S>,
    message: &Message,
    now: DateTime<Utc>,
) -> Result<()> {
    if let Some(reply) = handler.handle_message_at(message, now) {
        writeln!(writer, "{reply}")?;
    }
    Ok(())
}
