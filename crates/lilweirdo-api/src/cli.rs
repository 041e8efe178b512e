//! CLI definition for the `lilweirdo` binary.
//!
//! There are no subcommands: the binary connects to Discord and runs until
//! interrupted. Everything else happens through chat commands.

use std::path::PathBuf;

use clap::Parser;

/// Lil Weirdo, a Discord bot which talks back.
#[derive(Parser, Debug)]
#[command(name = "lilweirdo", version, about, long_about = None)]
pub struct Cli {
    /// Path to the TOML config file. A missing file means all defaults.
    #[arg(short, long, env = "LILWEIRDO_CONFIG", default_value = "lilweirdo.toml")]
    pub config: PathBuf,

    /// Suppress all output except errors.
    #[arg(long)]
    pub quiet: bool,

    /// Detailed output (-v for debug, -vv for trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Also export tracing spans through OpenTelemetry (stdout exporter).
    #[arg(long)]
    pub otel: bool,
}
