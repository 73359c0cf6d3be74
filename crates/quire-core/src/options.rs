//! Compiled extraction options.

use std::collections::BTreeMap;
use std::str::FromStr;

use quire_commit::{CommitField, FieldError, GroupField, HeaderField, MergeField, RevertField};
use quire_config::{OptionsConfig, PatternConfig, TagSortConfig};
use quire_git::TagSort;
use regex::Regex;

use crate::{CoreError, CoreResult};

/// Compiles a configured regular expression.
pub(crate) fn compile(pattern: &str) -> CoreResult<Regex> {
    Regex::new(pattern).map_err(|source| CoreError::InvalidPattern {
        pattern: pattern.to_string(),
        source,
    })
}

/// A pattern whose capture groups map onto fields of type `F`.
#[derive(Debug, Clone)]
pub struct Pattern<F> {
    /// Compiled pattern; `None` never matches.
    pub regex: Option<Regex>,
    /// Field per capture group, in order.
    pub fields: Vec<F>,
}

impl<F> Default for Pattern<F> {
    fn default() -> Self {
        Self {
            regex: None,
            fields: Vec::new(),
        }
    }
}

impl<F: FromStr<Err = FieldError>> Pattern<F> {
    /// Compiles `pattern` and resolves the field names.
    ///
    /// An empty pattern never matches.
    ///
    /// # Errors
    ///
    /// Returns an error if the pattern does not compile or a field name is
    /// unknown.
    pub fn new<S: AsRef<str>>(pattern: &str, fields: &[S]) -> CoreResult<Self> {
        let regex = if pattern.is_empty() {
            None
        } else {
            Some(compile(pattern)?)
        };
        let fields = fields
            .iter()
            .map(|name| name.as_ref().parse())
            .collect::<Result<Vec<F>, _>>()?;
        Ok(Self { regex, fields })
    }

    fn from_config(config: &PatternConfig) -> CoreResult<Self> {
        Self::new(&config.pattern, &config.pattern_maps)
    }

    /// Matches `input` and yields each mapped field with its captured text.
    ///
    /// Returns `None` when the pattern does not match. Unmatched optional
    /// groups yield empty text.
    pub fn captures<'a>(&'a self, input: &'a str) -> Option<impl Iterator<Item = (F, &'a str)>>
    where
        F: Copy,
    {
        let caps = self.regex.as_ref()?.captures(input)?;
        let values: Vec<&'a str> = (1..caps.len())
            .map(|i| caps.get(i).map_or("", |m| m.as_str()))
            .collect();
        Some(self.fields.iter().copied().zip(values))
    }
}

/// How commit groups are ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupSort {
    /// By rank in the configured title order.
    Custom,
    /// By a group field.
    Field(GroupField),
}

impl FromStr for GroupSort {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("custom") {
            Ok(Self::Custom)
        } else {
            s.parse().map(Self::Field)
        }
    }
}

/// Extraction options, validated and compiled once per generation.
#[derive(Debug, Clone)]
pub struct Options {
    /// Treat unreleased commits as this tag.
    pub next_tag: Option<String>,
    /// Only tags matching this pattern are considered.
    pub tag_filter: Option<Regex>,
    /// Tag timeline ordering.
    pub tag_sort: TagSort,
    /// Compare filter values case-insensitively.
    pub no_case_sensitive: bool,
    /// Only commits touching these paths are listed.
    pub paths: Vec<String>,
    /// Field to allowed values; an empty list allows everything.
    pub commit_filters: Vec<(CommitField, Vec<String>)>,
    /// Field commits are sorted by within a group.
    pub commit_sort_by: CommitField,
    /// Field commits are grouped by.
    pub group_by: CommitField,
    /// Group ordering.
    pub group_sort_by: GroupSort,
    /// Rank order for [`GroupSort::Custom`].
    pub title_order: Vec<String>,
    /// Raw key to display title.
    pub title_maps: BTreeMap<String, String>,
    /// Header pattern.
    pub header: Pattern<HeaderField>,
    /// Merge pattern.
    pub merge: Pattern<MergeField>,
    /// Revert pattern.
    pub revert: Pattern<RevertField>,
    /// Issue reference prefixes.
    pub issue_prefixes: Vec<String>,
    /// Issue reference actions.
    pub ref_actions: Vec<String>,
    /// Note keywords.
    pub note_keywords: Vec<String>,
    /// Ticket type to commit type.
    pub ticket_type_maps: BTreeMap<String, String>,
    /// Narrows ticket descriptions to the first capture group.
    pub ticket_description: Option<Regex>,
}

impl Options {
    /// Validates and compiles configuration options.
    ///
    /// # Errors
    ///
    /// Returns an error if a pattern does not compile or a field name is
    /// unknown.
    pub fn from_config(config: &OptionsConfig) -> CoreResult<Self> {
        let commit_filters = config
            .commits
            .filters
            .iter()
            .map(|(name, values)| Ok((name.parse::<CommitField>()?, values.clone())))
            .collect::<CoreResult<Vec<_>>>()?;

        Ok(Self {
            next_tag: config.next_tag.clone().filter(|tag| !tag.is_empty()),
            tag_filter: config
                .tag_filter_pattern
                .as_deref()
                .filter(|p| !p.is_empty())
                .map(compile)
                .transpose()?,
            tag_sort: match config.sort {
                TagSortConfig::Date => TagSort::Date,
                TagSortConfig::Semver => TagSort::Semver,
            },
            no_case_sensitive: config.no_case_sensitive,
            paths: config.paths.clone(),
            commit_filters,
            commit_sort_by: config.commits.sort_by.parse()?,
            group_by: config.commit_groups.group_by.parse()?,
            group_sort_by: config.commit_groups.sort_by.parse()?,
            title_order: config.commit_groups.title_order.clone(),
            title_maps: config.commit_groups.title_maps.clone(),
            header: Pattern::from_config(&config.header)?,
            merge: Pattern::from_config(&config.merges)?,
            revert: Pattern::from_config(&config.reverts)?,
            issue_prefixes: config.issues.prefix.clone(),
            ref_actions: config.refs.actions.clone(),
            note_keywords: config.notes.keywords.clone(),
            ticket_type_maps: config.ticket.type_maps.clone(),
            ticket_description: config
                .ticket
                .description_pattern
                .as_deref()
                .filter(|p| !p.is_empty())
                .map(compile)
                .transpose()?,
        })
    }
}
