//! Tag timeline entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Name, subject and date of a neighbouring tag.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelatedTag {
    /// Tag name.
    pub name: String,
    /// Subject of the tagged commit (or tag message).
    pub subject: String,
    /// Tag date.
    pub date: DateTime<Utc>,
}

/// A tag in the timeline.
///
/// Timelines are ordered newest-first. `previous` points at the next-older
/// tag and `next` at the next-newer one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    /// Tag name.
    pub name: String,
    /// Subject of the tagged commit (or tag message).
    pub subject: String,
    /// Tag date.
    pub date: DateTime<Utc>,
    /// Next-older tag.
    pub previous: Option<RelatedTag>,
    /// Next-newer tag.
    pub next: Option<RelatedTag>,
}

impl Tag {
    /// Creates an unlinked tag.
    #[must_use]
    pub fn new(name: impl Into<String>, subject: impl Into<String>, date: DateTime<Utc>) -> Self {
        Self {
            name: name.into(),
            subject: subject.into(),
            date,
            previous: None,
            next: None,
        }
    }

    /// Returns this tag's identity without its links.
    #[must_use]
    pub fn related(&self) -> RelatedTag {
        RelatedTag {
            name: self.name.clone(),
            subject: self.subject.clone(),
            date: self.date,
        }
    }
}

/// Sets `previous`/`next` on every tag of a newest-first timeline.
pub fn link_timeline(tags: &mut [Tag]) {
    let related: Vec<RelatedTag> = tags.iter().map(Tag::related).collect();
    for (i, tag) in tags.iter_mut().enumerate() {
        tag.next = i.checked_sub(1).map(|n| related[n].clone());
        tag.previous = related.get(i + 1).cloned();
    }
}
