//! jlintpaper CLI library
//!
//! This library provides the command-line interface for the jlintpaper
//! style checker for Japanese LaTeX manuscripts.

use clap::Parser;

pub mod commands;
pub mod error;
pub mod input;
pub mod output;

pub use error::{CliError, CliResult};

/// Style checker for Japanese LaTeX manuscripts
#[derive(Debug, Parser)]
#[command(name = "jlintpaper", version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: commands::Commands,
}

impl Cli {
    /// Run the selected command and return the process exit status
    pub fn run(&self) -> CliResult<u8> {
        self.command.execute()
    }
}
