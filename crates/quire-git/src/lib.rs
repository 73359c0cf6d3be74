//! Git access for Quire.
//!
//! This crate provides:
//! - [`RevisionSource`]: the two git primitives the generator needs
//! - [`GitCli`]: a source backed by the git binary
//! - [`TagReader`]: parsing of the tag listing into a timeline
//! - [`Repository`]: repository discovery and remote lookup

mod error;
mod log;
mod repository;
mod source;
mod tags;

pub use error::{GitError, GitResult};
pub use log::{FIELD_MARKER, LogRecord, RECORD_MARKER, log_format, split_log_records, tag_format};
pub use repository::{Repository, normalize_remote_url};
pub use source::{GitCli, RevisionSource};
pub use tags::{TagReader, TagSort};
