//! Tags command.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use quire_core::Options;
use quire_git::{GitCli, RevisionSource, TagReader};

use super::Workspace;

/// Arguments for the tags command.
#[derive(Debug, Args)]
pub struct TagsArgs {
    /// Configuration file (default: nearest quire.toml)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

/// Runs the tags command.
pub fn run(args: TagsArgs) -> Result<()> {
    let Workspace { root, config, .. } = Workspace::load(args.config.as_deref())?;
    let options = Options::from_config(&config.options).context("invalid options")?;

    let source = GitCli::new(root).with_bin(&config.bin);
    let raw = source.list_tags().context("failed to list tags")?;
    let tags = TagReader::new(options.tag_filter, options.tag_sort).read(&raw);

    for tag in &tags {
        println!("{}\t{}", tag.name, tag.date.format("%Y-%m-%d"));
    }
    Ok(())
}
