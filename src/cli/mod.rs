//! Command-line interface.

use clap::{Parser, Subcommand};

/// Health & fitness workout tracker
#[derive(Parser)]
#[command(name = "fittrack")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commands {
    /// Run the web server (default)
    Serve,

    /// Create default config file
    Init,
}

impl Cli {
    /// The requested command, falling back to `serve`.
    #[must_use]
    pub fn command(&self) -> Commands {
        self.command.unwrap_or(Commands::Serve)
    }
}
