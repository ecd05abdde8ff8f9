//! CLI command implementations

use anyhow::Result;
use clap::Subcommand;

pub mod check;
pub mod rules;

/// Available CLI commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Check LaTeX manuscripts for style issues
    Check(check::CheckArgs),

    /// Inspect rule tables
    Rules {
        #[command(subcommand)]
        subcommand: rules::RulesCommands,
    },
}

impl Commands {
    /// Run the command and return the process exit status
    pub fn execute(&self) -> Result<u8> {
        match self {
            Commands::Check(args) => args.execute(),
            Commands::Rules { subcommand } => subcommand.execute().map(|()| 0),
        }
    }
}

/// Initialize logging based on verbosity level
pub(crate) fn init_logging(verbose: u8, quiet: bool) {
    let log_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    if !quiet {
        // A second initialization only happens in tests
        let env = env_logger::Env::default().default_filter_or(log_level);
        let _ = env_logger::Builder::from_env(env).try_init();
    }
}
