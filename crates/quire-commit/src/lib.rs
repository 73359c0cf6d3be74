//! Changelog data model for Quire.
//!
//! This crate provides the types shared by every stage of changelog
//! generation:
//! - [`Tag`]: an entry of the tag timeline
//! - [`Commit`]: a commit after parsing
//! - [`CommitGroup`], [`NoteGroup`], [`Version`]: extracted changes
//! - [`RenderData`]: the value handed to the template engine
//! - [`CommitField`] and friends: enum-keyed field accessors

mod changes;
mod commit;
mod field;
mod tag;

pub use changes::{ChangeSet, CommitGroup, Info, NoteGroup, RenderData, Unreleased, Version};
pub use commit::{
    Commit, CommitBuilder, CommitKind, Contact, Hash, Merge, Note, Ref, Revert, Signature,
    TicketIssue,
};
pub use field::{
    CommitField, FieldError, FieldValue, GroupField, HeaderField, MergeField, RevertField,
};
pub use tag::{RelatedTag, Tag, link_timeline};
