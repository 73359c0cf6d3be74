//! Configuration management for Quire.
//!
//! This crate handles loading and normalizing the `quire.toml` configuration file.

mod error;
mod loader;
mod schema;

pub use error::{ConfigError, ConfigResult};
pub use loader::{CONFIG_FILE_NAME, find_and_load_config_from, load_config};
pub use schema::{
    CommitGroupsConfig, CommitsConfig, Config, InfoConfig, IssuesConfig, NotesConfig,
    OptionsConfig, PatternConfig, RefsConfig, Style, TagSortConfig, TicketConfig,
};
