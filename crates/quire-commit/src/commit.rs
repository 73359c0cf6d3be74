//! Commit type as produced by the commit parser.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Long and abbreviated commit hash.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hash {
    /// Full SHA.
    pub long: String,
    /// Abbreviated SHA as printed by git.
    pub short: String,
}

impl Hash {
    /// Creates a hash, deriving the short form from the first 7 characters.
    #[must_use]
    pub fn new(long: impl Into<String>) -> Self {
        let long = long.into();
        let short = long[..7.min(long.len())].to_string();
        Self { long, short }
    }
}

/// Author or committer identity with a timestamp.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature {
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Authoring or commit time.
    pub date: DateTime<Utc>,
}

/// A name/email pair from a `Co-authored-by` or `Signed-off-by` trailer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
}

/// Merge information extracted from a merge commit header.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Merge {
    /// Pull request reference (e.g. `123`).
    pub r#ref: String,
    /// Source branch.
    pub source: String,
}

/// Revert information extracted from a revert commit header.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Revert {
    /// Header of the reverted commit.
    pub header: String,
}

/// An issue reference (e.g. `Closes #123`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ref {
    /// Action verb, empty for bare references.
    pub action: String,
    /// Referenced issue number.
    pub r#ref: String,
    /// Optional `owner/repository` source.
    pub source: String,
}

/// A note block such as `BREAKING CHANGE: ...`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    /// Note keyword as written in the commit.
    pub title: String,
    /// Note text.
    pub body: String,
}

impl Note {
    /// Creates a note.
    #[must_use]
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }
}

/// Ticket metadata fetched from an issue tracker.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketIssue {
    /// Ticket key (e.g. `PROJ-123`).
    pub key: String,
    /// Ticket type as named by the tracker.
    pub r#type: String,
    /// One-line summary.
    pub summary: String,
    /// Long description.
    pub description: String,
    /// Labels attached to the ticket.
    pub labels: Vec<String>,
}

/// How a commit is classified for extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitKind {
    /// Header matched the merge pattern.
    Merge,
    /// Header matched the revert pattern.
    Revert,
    /// Everything else.
    Normal,
}

/// A commit after parsing.
///
/// `merge` and `revert` are mutually exclusive.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commit {
    /// Commit hash.
    pub hash: Hash,
    /// Author identity.
    pub author: Signature,
    /// Committer identity.
    pub committer: Signature,
    /// Set for merge commits.
    pub merge: Option<Merge>,
    /// Set for revert commits.
    pub revert: Option<Revert>,
    /// Issue references found in header and body.
    pub refs: Vec<Ref>,
    /// Note blocks found in the body.
    pub notes: Vec<Note>,
    /// Mentioned user names (without `@`).
    pub mentions: Vec<String>,
    /// `Co-authored-by` trailers.
    pub co_authors: Vec<Contact>,
    /// `Signed-off-by` trailers.
    pub signers: Vec<Contact>,
    /// Ticket metadata, if the ticket was found.
    pub ticket: Option<TicketIssue>,
    /// Raw first line of the message.
    pub header: String,
    /// Commit type (e.g. `feat`).
    pub r#type: String,
    /// Commit scope.
    pub scope: String,
    /// Commit subject.
    pub subject: String,
    /// Ticket ID captured from the header.
    pub ticket_id: String,
    /// Message body.
    pub body: String,
    /// Body without notes and metadata lines.
    pub trimmed_body: String,
}

impl Commit {
    /// Creates a new commit builder.
    #[must_use]
    pub fn builder(hash: impl Into<String>) -> CommitBuilder {
        CommitBuilder::new(hash)
    }

    /// Returns the classification of this commit.
    #[must_use]
    pub fn kind(&self) -> CommitKind {
        if self.merge.is_some() {
            CommitKind::Merge
        } else if self.revert.is_some() {
            CommitKind::Revert
        } else {
            CommitKind::Normal
        }
    }
}

/// Builder for [`Commit`], mostly useful in tests and processors.
#[derive(Debug)]
pub struct CommitBuilder {
    commit: Commit,
}

impl CommitBuilder {
    fn new(hash: impl Into<String>) -> Self {
        Self {
            commit: Commit {
                hash: Hash::new(hash),
                ..Commit::default()
            },
        }
    }

    /// Sets the raw header.
    #[must_use]
    pub fn header(mut self, header: impl Into<String>) -> Self {
        self.commit.header = header.into();
        self
    }

    /// Sets the type.
    #[must_use]
    pub fn r#type(mut self, r#type: impl Into<String>) -> Self {
        self.commit.r#type = r#type.into();
        self
    }

    /// Sets the scope.
    #[must_use]
    pub fn scope(mut self, scope: impl Into<String>) -> Self {
        self.commit.scope = scope.into();
        self
    }

    /// Sets the subject.
    #[must_use]
    pub fn subject(mut self, subject: impl Into<String>) -> Self {
        self.commit.subject = subject.into();
        self
    }

    /// Sets the body (and the trimmed body to the same text).
    #[must_use]
    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.commit.body = body.into();
        self.commit.trimmed_body = self.commit.body.clone();
        self
    }

    /// Sets author name, email and date; the committer mirrors the author.
    #[must_use]
    pub fn author(
        mut self,
        name: impl Into<String>,
        email: impl Into<String>,
        date: DateTime<Utc>,
    ) -> Self {
        self.commit.author = Signature {
            name: name.into(),
            email: email.into(),
            date,
        };
        self.commit.committer = self.commit.author.clone();
        self
    }

    /// Adds a note.
    #[must_use]
    pub fn note(mut self, title: impl Into<String>, body: impl Into<String>) -> Self {
        self.commit.notes.push(Note::new(title, body));
        self
    }

    /// Marks the commit as a merge.
    #[must_use]
    pub fn merge(mut self, merge: Merge) -> Self {
        self.commit.revert = None;
        self.commit.merge = Some(merge);
        self
    }

    /// Marks the commit as a revert.
    #[must_use]
    pub fn revert(mut self, revert: Revert) -> Self {
        self.commit.merge = None;
        self.commit.revert = Some(revert);
        self
    }

    /// Builds the [`Commit`].
    #[must_use]
    pub fn build(self) -> Commit {
        self.commit
    }
}
