//! CLI subcommand implementations.

pub mod clock;
pub mod report;
pub mod say;
pub mod stats;
pub mod status;
pub mod users;
