//! Timesheet master CLI library.
//!
//! This crate provides the CLI interface for the timesheet master reporting
//! pipeline.

mod cli;
pub mod commands;
mod config;
mod reader;
mod writer;

pub use cli::{Cli, Commands, InputArgs};
pub use config::Config;
pub use reader::{CsvEntrySource, CsvTermsSource, discover_entry_sources};
pub use writer::{master_to_json, write_master_csv};
