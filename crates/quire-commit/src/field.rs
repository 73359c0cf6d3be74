//! Enum-keyed accessors for commit and group fields.
//!
//! Configuration names fields with strings such as `Type`, `Author.Name` or
//! `hash_short`. Those names are resolved once into the enums below so that
//! grouping, sorting and pattern mapping never look fields up by name.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::{Commit, CommitGroup, Merge, Revert};

/// Errors raised while resolving or comparing fields.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FieldError {
    /// The name does not denote a known field.
    #[error("unknown {kind} field: {name}")]
    Unknown {
        /// Which family of fields was being resolved.
        kind: &'static str,
        /// The offending name.
        name: String,
    },

    /// Two values of different kinds were compared.
    #[error("cannot compare {left} with {right}")]
    Incomparable {
        /// Kind of the left value.
        left: &'static str,
        /// Kind of the right value.
        right: &'static str,
    },
}

/// Lowercases and drops separators so `Author.Name`, `author_name` and
/// `AuthorName` resolve alike.
fn normalize(name: &str) -> String {
    name.chars()
        .filter(|c| !matches!(c, '.' | '_' | '-' | ' '))
        .flat_map(char::to_lowercase)
        .collect()
}

/// A value read from a commit or group field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    /// Text value.
    Text(String),
    /// Integer value.
    Int(i64),
    /// Timestamp value.
    Time(DateTime<Utc>),
}

impl FieldValue {
    fn kind(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::Int(_) => "integer",
            Self::Time(_) => "timestamp",
        }
    }

    /// Compares two values of the same kind.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::Incomparable`] if the kinds differ.
    pub fn try_cmp(&self, other: &Self) -> Result<Ordering, FieldError> {
        match (self, other) {
            (Self::Text(a), Self::Text(b)) => Ok(a.cmp(b)),
            (Self::Int(a), Self::Int(b)) => Ok(a.cmp(b)),
            (Self::Time(a), Self::Time(b)) => Ok(a.cmp(b)),
            _ => Err(FieldError::Incomparable {
                left: self.kind(),
                right: other.kind(),
            }),
        }
    }

    /// Returns `true` for empty text.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Text(s) if s.is_empty())
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Int(n) => write!(f, "{n}"),
            Self::Time(t) => write!(f, "{}", t.to_rfc3339()),
        }
    }
}

/// A commit field usable for filtering, grouping and sorting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommitField {
    /// Full hash.
    Hash,
    /// Abbreviated hash.
    ShortHash,
    /// Raw header line.
    Header,
    /// Commit type.
    Type,
    /// Commit scope.
    Scope,
    /// Commit subject.
    Subject,
    /// Ticket ID captured from the header.
    TicketId,
    /// Message body.
    Body,
    /// Author name.
    AuthorName,
    /// Author email.
    AuthorEmail,
    /// Author date.
    AuthorDate,
    /// Committer name.
    CommitterName,
    /// Committer email.
    CommitterEmail,
    /// Committer date.
    CommitterDate,
}

impl CommitField {
    /// Reads this field from a commit.
    #[must_use]
    pub fn value(self, commit: &Commit) -> FieldValue {
        let text = |s: &str| FieldValue::Text(s.to_string());
        match self {
            Self::Hash => text(&commit.hash.long),
            Self::ShortHash => text(&commit.hash.short),
            Self::Header => text(&commit.header),
            Self::Type => text(&commit.r#type),
            Self::Scope => text(&commit.scope),
            Self::Subject => text(&commit.subject),
            Self::TicketId => text(&commit.ticket_id),
            Self::Body => text(&commit.body),
            Self::AuthorName => text(&commit.author.name),
            Self::AuthorEmail => text(&commit.author.email),
            Self::AuthorDate => FieldValue::Time(commit.author.date),
            Self::CommitterName => text(&commit.committer.name),
            Self::CommitterEmail => text(&commit.committer.email),
            Self::CommitterDate => FieldValue::Time(commit.committer.date),
        }
    }
}

impl FromStr for CommitField {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match normalize(s).as_str() {
            "hash" | "hashlong" => Self::Hash,
            "shorthash" | "hashshort" => Self::ShortHash,
            "header" => Self::Header,
            "type" => Self::Type,
            "scope" => Self::Scope,
            "subject" => Self::Subject,
            "ticketid" | "jiraissueid" => Self::TicketId,
            "body" => Self::Body,
            "authorname" => Self::AuthorName,
            "authoremail" => Self::AuthorEmail,
            "date" | "authordate" => Self::AuthorDate,
            "committername" => Self::CommitterName,
            "committeremail" => Self::CommitterEmail,
            "committerdate" => Self::CommitterDate,
            _ => {
                return Err(FieldError::Unknown {
                    kind: "commit",
                    name: s.to_string(),
                });
            }
        })
    }
}

/// A commit group field usable for sorting groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroupField {
    /// Display title.
    Title,
    /// Raw classification key.
    RawTitle,
    /// Number of commits in the group.
    CommitCount,
}

impl GroupField {
    /// Reads this field from a group.
    #[must_use]
    pub fn value(self, group: &CommitGroup) -> FieldValue {
        match self {
            Self::Title => FieldValue::Text(group.title.clone()),
            Self::RawTitle => FieldValue::Text(group.raw_title.clone()),
            Self::CommitCount => {
                FieldValue::Int(i64::try_from(group.commits.len()).unwrap_or(i64::MAX))
            }
        }
    }
}

impl FromStr for GroupField {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "title" => Ok(Self::Title),
            "rawtitle" => Ok(Self::RawTitle),
            "commitcount" | "commits" => Ok(Self::CommitCount),
            _ => Err(FieldError::Unknown {
                kind: "group",
                name: s.to_string(),
            }),
        }
    }
}

/// Target of a header pattern capture group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderField {
    /// Commit type.
    Type,
    /// Commit scope.
    Scope,
    /// Commit subject.
    Subject,
    /// Ticket ID.
    TicketId,
    /// Overwrites the raw header.
    Header,
}

impl HeaderField {
    /// Stores a captured value on the commit.
    pub fn assign(self, commit: &mut Commit, value: &str) {
        let slot = match self {
            Self::Type => &mut commit.r#type,
            Self::Scope => &mut commit.scope,
            Self::Subject => &mut commit.subject,
            Self::TicketId => &mut commit.ticket_id,
            Self::Header => &mut commit.header,
        };
        value.clone_into(slot);
    }
}

impl FromStr for HeaderField {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "type" => Ok(Self::Type),
            "scope" => Ok(Self::Scope),
            "subject" => Ok(Self::Subject),
            "ticketid" | "jiraissueid" => Ok(Self::TicketId),
            "header" => Ok(Self::Header),
            _ => Err(FieldError::Unknown {
                kind: "header",
                name: s.to_string(),
            }),
        }
    }
}

/// Target of a merge pattern capture group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeField {
    /// Pull request reference.
    Ref,
    /// Source branch.
    Source,
}

impl MergeField {
    /// Stores a captured value on the merge info.
    pub fn assign(self, merge: &mut Merge, value: &str) {
        match self {
            Self::Ref => value.clone_into(&mut merge.r#ref),
            Self::Source => value.clone_into(&mut merge.source),
        }
    }
}

impl FromStr for MergeField {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "ref" => Ok(Self::Ref),
            "source" => Ok(Self::Source),
            _ => Err(FieldError::Unknown {
                kind: "merge",
                name: s.to_string(),
            }),
        }
    }
}

/// Target of a revert pattern capture group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevertField {
    /// Header of the reverted commit.
    Header,
}

impl RevertField {
    /// Stores a captured value on the revert info.
    pub fn assign(self, revert: &mut Revert, value: &str) {
        match self {
            Self::Header => value.clone_into(&mut revert.header),
        }
    }
}

impl FromStr for RevertField {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "header" => Ok(Self::Header),
            _ => Err(FieldError::Unknown {
                kind: "revert",
                name: s.to_string(),
            }),
        }
    }
}
