//! CLI command definitions

use clap::Args;

/// Run a sequence
#[derive(Debug, Args, Clone)]
pub struct RunCommand {
    /// Path to sequence YAML file
    #[arg(short, long)]
    pub file: String,

    /// Simulated battery charge in percent
    #[arg(long, default_value_t = 75)]
    pub battery: u8,

    /// Don't connect to the brick before running
    #[arg(long)]
    pub no_connect: bool,

    /// Keep running and fire the file's schedules until Ctrl-C
    #[arg(long)]
    pub watch: bool,
}

/// Validate a sequence configuration
#[derive(Debug, Args, Clone)]
pub struct ValidateCommand {
    /// Path to sequence YAML file
    #[arg(short, long)]
    pub file: String,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Show the steps of a sequence
#[derive(Debug, Args, Clone)]
pub struct ShowCommand {
    /// Path to sequence YAML file
    #[arg(short, long)]
    pub file: String,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}
