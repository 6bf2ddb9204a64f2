//! Command-line interface

pub mod commands;
pub mod output;

use clap::{Parser, Subcommand};
use commands::{RunCommand, ShowCommand, ValidateCommand};

/// EV3 automation sequence runner
#[derive(Debug, Parser, Clone)]
#[command(name = "brickflow")]
#[command(author = "Brickflow Contributors")]
#[command(version = "0.1.0")]
#[command(about = "Run automation sequences on a LEGO Mindstorms EV3 brick", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available commands
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Run a sequence
    Run(RunCommand),

    /// Validate a sequence configuration
    Validate(ValidateCommand),

    /// Show the steps of a sequence
    Show(ShowCommand),
}

impl Cli {
    /// Parse CLI arguments from environment
    pub fn from_args() -> Self {
        Self::parse()
    }

    /// Parse CLI arguments from a slice
    pub fn try_parse_from<I, T>(itr: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        <Self as Parser>::try_parse_from(itr)
    }
}

use std::ffi::OsString;
