//! Report command for individual user reports.

use std::io::Write;

use anyhow::{Context, Result};
use cb_core::{EventStore, Handler, Identity, ReportSpec};
use chrono::{DateTime, Utc};

/// Runs the report command on behalf of `requester`.
pub fn run<W: Write, S: EventStore>(
    writer: &mut W,
    handler: &Handler<S>,
    requester: &str,
    user: &str,
    spec: &[String],
    now: DateTime<Utc>,
) -> Result<()> {
    let user = Identity::new(user).context("invalid user")?;
    let tokens: Vec<&str> = spec.iter().map(String::as_str).collect();
    let spec = ReportSpec::from_tokens(&tokens);

    let output = handler.handle_detail_report(requester, Some(&user), &spec, now)?;
    writeln!(writer, "{output}")?;
    Ok(())
}
