//! CLI argument definitions using clap
//!
//! Commands:
//! - formintake serve [--config <path>] [--port <n>]
//! - formintake validate [--schema <path>] [--input <path>]
//! - formintake check-schema [--schema <path>] [--output <path>]

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// formintake - schema-driven form submission service
#[derive(Parser, Debug)]
#[command(name = "formintake")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the HTTP API
    Serve {
        /// Path to configuration file; defaults apply when omitted
        #[arg(long)]
        config: Option<PathBuf>,

        /// Port to bind, overriding the configuration file
        #[arg(long)]
        port: Option<u16>,
    },

    /// Validate one JSON payload and print the result
    Validate {
        /// Schema file; the built-in schema when omitted
        #[arg(long)]
        schema: Option<PathBuf>,

        /// Payload file; one line of stdin when omitted
        #[arg(long)]
        input: Option<PathBuf>,
    },

    /// Load and integrity-check a schema, printing it in wire form
    CheckSchema {
        /// Schema file; the built-in schema when omitted
        #[arg(long)]
        schema: Option<PathBuf>,

        /// Also write the checked schema to this file
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
