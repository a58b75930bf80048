//! CLI module
//!
//! - serve: load config, schema and store, then run the HTTP API
//! - validate: check one payload against a schema
//! - check-schema: integrity-check a schema file

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{check_schema, run, run_command, serve, validate, Config, StorageKind};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{read_payload, write_json};
