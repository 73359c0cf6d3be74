//! Subcommands.

pub mod generate;
pub mod tags;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use quire_config::{Config, ConfigError, find_and_load_config_from, load_config};
use quire_git::Repository;
use tracing::info;

/// Repository and configuration shared by every subcommand.
pub struct Workspace {
    pub repository: Repository,
    pub root: PathBuf,
    pub config: Config,
}

impl Workspace {
    /// Discovers the repository around the current directory and loads its
    /// configuration, falling back to defaults when no file exists.
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let cwd = std::env::current_dir().context("failed to read current directory")?;
        let repository = Repository::discover(&cwd).context("failed to open git repository")?;
        let root = repository.path().to_path_buf();

        let config = match config_path {
            Some(path) => load_config(path)
                .with_context(|| format!("failed to load configuration {}", path.display()))?,
            None => match find_and_load_config_from(&cwd) {
                Ok(config) => config,
                Err(ConfigError::NotFound(_)) => {
                    info!("no configuration file found, using defaults");
                    let mut config = Config::default();
                    config.normalize(&root);
                    config
                }
                Err(e) => return Err(e).context("failed to load configuration"),
            },
        };

        Ok(Self {
            repository,
            root,
            config,
        })
    }
}
