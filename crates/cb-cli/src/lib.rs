//! Clockbot CLI library.
//!
//! This crate provides the command-line transport for the clockbot engine.

mod cli;
pub mod commands;
mod config;

pub use cli::{Cli, Commands};
pub use config::Config;
