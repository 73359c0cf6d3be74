//! Configuration schema.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Git binary.
    #[serde(default = "default_bin")]
    pub bin: String,

    /// Template path, relative to the configuration file.
    #[serde(default = "default_template")]
    pub template: String,

    /// Hosting style preset.
    #[serde(default)]
    pub style: Style,

    /// Document metadata.
    #[serde(default)]
    pub info: InfoConfig,

    /// Extraction options.
    #[serde(default)]
    pub options: OptionsConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bin: default_bin(),
            template: default_template(),
            style: Style::default(),
            info: InfoConfig::default(),
            options: OptionsConfig::default(),
        }
    }
}

fn default_bin() -> String {
    "git".to_string()
}

fn default_template() -> String {
    "CHANGELOG.tpl.md".to_string()
}

/// Hosting style presets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Style {
    /// No preset.
    #[default]
    None,
    /// GitHub conventions.
    Github,
    /// GitLab conventions.
    Gitlab,
    /// Bitbucket conventions.
    Bitbucket,
}

/// Document metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InfoConfig {
    /// Changelog title.
    #[serde(default = "default_title")]
    pub title: String,

    /// Repository URL.
    #[serde(default)]
    pub repository_url: String,
}

impl Default for InfoConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            repository_url: String::new(),
        }
    }
}

fn default_title() -> String {
    "CHANGELOG".to_string()
}

/// Tag timeline ordering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TagSortConfig {
    /// By tag date.
    #[default]
    Date,
    /// By semantic version.
    Semver,
}

/// Extraction options.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OptionsConfig {
    /// Treat unreleased commits as this tag.
    #[serde(default)]
    pub next_tag: Option<String>,

    /// Only tags matching this pattern are considered.
    #[serde(default)]
    pub tag_filter_pattern: Option<String>,

    /// Tag timeline ordering.
    #[serde(default)]
    pub sort: TagSortConfig,

    /// Compare filter values case-insensitively.
    #[serde(default)]
    pub no_case_sensitive: bool,

    /// Only commits touching these paths are listed.
    #[serde(default)]
    pub paths: Vec<String>,

    /// Commit filtering and sorting.
    #[serde(default)]
    pub commits: CommitsConfig,

    /// Commit grouping.
    #[serde(default)]
    pub commit_groups: CommitGroupsConfig,

    /// Header pattern.
    #[serde(default)]
    pub header: PatternConfig,

    /// Merge pattern.
    #[serde(default)]
    pub merges: PatternConfig,

    /// Revert pattern.
    #[serde(default)]
    pub reverts: PatternConfig,

    /// Issue reference prefixes.
    #[serde(default)]
    pub issues: IssuesConfig,

    /// Issue reference actions.
    #[serde(default)]
    pub refs: RefsConfig,

    /// Note keywords.
    #[serde(default)]
    pub notes: NotesConfig,

    /// Ticket enrichment.
    #[serde(default)]
    pub ticket: TicketConfig,
}

/// Commit filtering and sorting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitsConfig {
    /// Field name to allowed values.
    #[serde(default)]
    pub filters: BTreeMap<String, Vec<String>>,

    /// Field commits are sorted by within a group.
    #[serde(default = "default_commit_sort")]
    pub sort_by: String,
}

impl Default for CommitsConfig {
    fn default() -> Self {
        Self {
            filters: BTreeMap::new(),
            sort_by: default_commit_sort(),
        }
    }
}

fn default_commit_sort() -> String {
    "Scope".to_string()
}

/// Commit grouping.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitGroupsConfig {
    /// Field commits are grouped by.
    #[serde(default = "default_group_by")]
    pub group_by: String,

    /// `Custom` or a group field name.
    #[serde(default = "default_group_sort")]
    pub sort_by: String,

    /// Rank order used by `Custom` sorting.
    #[serde(default)]
    pub title_order: Vec<String>,

    /// Raw key to display title.
    #[serde(default)]
    pub title_maps: BTreeMap<String, String>,
}

impl Default for CommitGroupsConfig {
    fn default() -> Self {
        Self {
            group_by: default_group_by(),
            sort_by: default_group_sort(),
            title_order: Vec::new(),
            title_maps: BTreeMap::new(),
        }
    }
}

fn default_group_by() -> String {
    "Type".to_string()
}

fn default_group_sort() -> String {
    "Title".to_string()
}

/// A pattern and the fields its capture groups map onto.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternConfig {
    /// Regular expression.
    #[serde(default)]
    pub pattern: String,

    /// Field per capture group, in order.
    #[serde(default)]
    pub pattern_maps: Vec<String>,
}

impl PatternConfig {
    fn new(pattern: &str, maps: &[&str]) -> Self {
        Self {
            pattern: pattern.to_string(),
            pattern_maps: maps.iter().map(ToString::to_string).collect(),
        }
    }

    fn is_unset(&self) -> bool {
        self.pattern.is_empty() && self.pattern_maps.is_empty()
    }
}

/// Issue reference prefixes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IssuesConfig {
    /// Prefixes such as `#`.
    #[serde(default)]
    pub prefix: Vec<String>,
}

/// Issue reference actions.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RefsConfig {
    /// Verbs such as `closes`.
    #[serde(default)]
    pub actions: Vec<String>,
}

/// Note keywords.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NotesConfig {
    /// Keywords such as `BREAKING CHANGE`.
    #[serde(default)]
    pub keywords: Vec<String>,
}

/// Ticket enrichment.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TicketConfig {
    /// Ticket type to commit type.
    #[serde(default)]
    pub type_maps: BTreeMap<String, String>,

    /// Narrows the ticket description to its first capture group.
    #[serde(default)]
    pub description_pattern: Option<String>,
}

impl Config {
    /// Fills defaults that depend on other values and applies the style
    /// preset.
    ///
    /// A relative template path is resolved against `config_dir`.
    pub fn normalize(&mut self, config_dir: &Path) {
        self.info.repository_url = self.info.repository_url.trim_end_matches('/').to_string();

        if !Path::new(&self.template).is_absolute() {
            self.template = config_dir.join(&self.template).to_string_lossy().into_owned();
        }

        self.apply_style();

        let opts = &mut self.options;
        if opts.header.is_unset() {
            opts.header = PatternConfig::new("^(.*)$", &["Subject"]);
        }
        if opts.merges.is_unset() {
            opts.merges = PatternConfig::new(r"^Merge branch '(\w+)'$", &["Source"]);
        }
        if opts.reverts.is_unset() {
            opts.reverts = PatternConfig::new(r#"^Revert "([\s\S]*)"$"#, &["Header"]);
        }
    }

    fn apply_style(&mut self) {
        let (prefixes, actions, merges): (&[&str], &[&str], PatternConfig) = match self.style {
            Style::None => return,
            Style::Github => (
                &["#", "gh-"],
                &[
                    "close", "closes", "closed", "fix", "fixes", "fixed", "resolve", "resolves",
                    "resolved",
                ],
                PatternConfig::new(r"^Merge pull request #(\d+) from (.*)$", &["Ref", "Source"]),
            ),
            Style::Gitlab => (
                &["#"],
                &[
                    "close", "closes", "closed", "closing", "fix", "fixes", "fixed", "fixing",
                    "resolve", "resolves", "resolved", "resolving",
                ],
                PatternConfig::new(r"^Merge branch '.*' into '(.*)'$", &["Source"]),
            ),
            Style::Bitbucket => (
                &["#"],
                &[
                    "close",
                    "closes",
                    "closed",
                    "closing",
                    "fix",
                    "fixed",
                    "fixes",
                    "fixing",
                    "resolve",
                    "resolves",
                    "resolved",
                    "resolving",
                    "reopen",
                    "reopens",
                    "reopening",
                    "hold",
                    "holds",
                    "holding",
                    "wontfix",
                    "invalidate",
                    "invalidates",
                    "invalidated",
                    "invalidating",
                    "addresses",
                    "re",
                    "references",
                    "ref",
                    "refs",
                    "see",
                ],
                PatternConfig::new(
                    r"^Merged in (.*) \(pull request #(\d+)\)$",
                    &["Source", "Ref"],
                ),
            ),
        };

        let opts = &mut self.options;
        if opts.issues.prefix.is_empty() {
            opts.issues.prefix = prefixes.iter().map(ToString::to_string).collect();
        }
        if opts.refs.actions.is_empty() {
            opts.refs.actions = actions.iter().map(ToString::to_string).collect();
        }
        if opts.merges.is_unset() {
            opts.merges = merges;
        }
    }
}
