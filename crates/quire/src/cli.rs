//! CLI definition.

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::commands;

/// Generate changelogs from git history and a template.
#[derive(Debug, Parser)]
#[command(name = "quire")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Generate a changelog for a tag query
    Generate(commands::generate::GenerateArgs),

    /// List the tag timeline, newest first
    Tags(commands::tags::TagsArgs),
}

impl Cli {
    /// Runs the CLI command.
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Generate(args) => commands::generate::run(args),
            Commands::Tags(args) => commands::tags::run(args),
        }
    }
}
