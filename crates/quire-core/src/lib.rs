//! Core library for Quire.
//!
//! This crate resolves tag queries, parses and groups commits, and drives a
//! changelog generation from raw git history to a rendered document.

mod error;
mod extractor;
mod generator;
mod options;
mod parser;
mod processor;
mod selector;
mod ticket;

pub use error::{CoreError, CoreResult};
pub use extractor::CommitExtractor;
pub use generator::Generator;
pub use options::{GroupSort, Options, Pattern};
pub use parser::CommitParser;
pub use processor::{CommitProcessor, Forge, ForgeLinkProcessor};
pub use selector::{Selection, select};
pub use ticket::{TicketEnricher, TicketError};
