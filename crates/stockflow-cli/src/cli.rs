//! Argument surface.
//!
//! Two invocations share one binary:
//!
//! ```text
//! stockflow <config_file> <wait_seconds>        # schedule
//! stockflow checker <config_file> <log_file>    # verify a log
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "stockflow",
    version,
    about = "Schedules resource-transformation processes and verifies their traces",
    args_conflicts_with_subcommands = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Path to the configuration file.
    #[arg(requires = "wait")]
    pub config: Option<PathBuf>,

    /// Wall-clock budget in whole seconds.
    pub wait: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Replay a schedule log against its configuration and confirm every
    /// entry was feasible at the cycle it ran.
    Checker {
        /// Path to the configuration file.
        config: PathBuf,
        /// Path to the log produced by the scheduler.
        log: PathBuf,
    },
}
