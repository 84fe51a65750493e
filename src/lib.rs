#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::doc_markdown,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::new_without_default,
    clippy::needless_pass_by_value,
    clippy::needless_raw_string_hashes,
    clippy::redundant_closure_for_method_calls,
    clippy::return_self_not_must_use,
    clippy::similar_names,
    clippy::struct_field_names,
    clippy::too_many_lines,
    clippy::uninlined_format_args,
    clippy::unnecessary_wraps
)]

//! Event-log records for connector action executions.
//!
//! [`actions::create_action_event_log_record_object`] maps the parameters of
//! one action execution to an [`event_log::Event`]; an
//! [`event_log::EventLogger`] decides where the record goes.

use clap::Subcommand;
use serde::{Deserialize, Serialize};

pub mod actions;
pub mod config;
pub mod event_log;

pub use actions::{create_action_event_log_record_object, CreateActionEventLogRecordParams};
pub use config::Config;
pub use event_log::{Event, EventLogger};

/// Configuration subcommands
#[derive(Subcommand, Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum ConfigCommands {
    /// Print the effective configuration as TOML
    Show,
    /// Write the default configuration file if none exists
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
    /// Dump the full configuration JSON Schema to stdout
    Schema,
}
