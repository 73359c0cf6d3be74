//! Grouped changes and the render data handed to templates.

use serde::{Deserialize, Serialize};

use crate::{Commit, Note, Tag};

/// Commits sharing one classification key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitGroup {
    /// Raw classification key (e.g. `feat`).
    pub raw_title: String,
    /// Display title (e.g. `Features`).
    pub title: String,
    /// Commits in this group.
    pub commits: Vec<Commit>,
}

/// Notes sharing one title.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteGroup {
    /// Note keyword.
    pub title: String,
    /// Notes with that keyword.
    pub notes: Vec<Note>,
}

/// Extracted changes for one revision range.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeSet {
    /// Normal commits grouped by classification key.
    pub commit_groups: Vec<CommitGroup>,
    /// Merge commits.
    pub merge_commits: Vec<Commit>,
    /// Revert commits.
    pub revert_commits: Vec<Commit>,
    /// Notes from every commit, grouped by title.
    pub note_groups: Vec<NoteGroup>,
}

impl ChangeSet {
    /// Returns `true` if there is nothing to show.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commit_groups.is_empty()
            && self.merge_commits.is_empty()
            && self.revert_commits.is_empty()
            && self.note_groups.is_empty()
    }
}

/// Changes after the newest tag.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unreleased {
    /// Every commit after the newest tag, in log order.
    pub commits: Vec<Commit>,
    /// Grouped changes.
    #[serde(flatten)]
    pub changes: ChangeSet,
}

impl Unreleased {
    /// Returns `true` if no commit is unreleased.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commits.is_empty() && self.changes.is_empty()
    }
}

/// One released tag and its changes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Version {
    /// The tag.
    pub tag: Tag,
    /// Every commit in the range, in log order.
    pub commits: Vec<Commit>,
    /// Grouped changes.
    #[serde(flatten)]
    pub changes: ChangeSet,
}

/// Document metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Info {
    /// Changelog title.
    pub title: String,
    /// Repository URL without trailing slash.
    pub repository_url: String,
}

/// The complete input handed to the template engine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderData {
    /// Metadata.
    pub info: Info,
    /// Unreleased changes.
    pub unreleased: Unreleased,
    /// Versions, newest first.
    pub versions: Vec<Version>,
}
