//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// svclog - Inspect and exercise service logger configuration
#[derive(Parser, Debug)]
#[command(name = "svclog")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Print resolution diagnostics to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// The command to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Resolve and validate the logger configuration
    ///
    /// Reads config.logger.yml and config.logger.override.yml from the
    /// directory of HINT, builds the logger and prints the merged result.
    ///
    /// Examples:
    ///   svclog check /etc/billing/service.yml
    ///   svclog check /etc/billing/ --json
    Check {
        /// Any path inside the configuration directory
        hint: PathBuf,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Write one record through the configured logger
    ///
    /// Examples:
    ///   svclog emit /etc/billing/service.yml "deploy finished"
    ///   svclog emit conf/ --level warn -n deploy -f version=1.4.2 -f canary=true "rolled back"
    Emit {
        /// Any path inside the configuration directory
        hint: PathBuf,

        /// Record level
        #[arg(short, long, default_value = "info")]
        level: String,

        /// Logger name scope
        #[arg(short, long)]
        name: Option<String>,

        /// Record field as key=value; JSON values are parsed, anything else is a string
        #[arg(short = 'f', long = "field")]
        fields: Vec<String>,

        /// Record message
        message: String,
    },
}
