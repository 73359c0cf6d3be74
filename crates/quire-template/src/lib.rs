//! Template rendering for Quire.
//!
//! Templates are minijinja documents receiving a [`RenderData`] value as
//! their context: `info`, `unreleased` and `versions`.
//!
//! [`RenderData`]: quire_commit::RenderData

mod error;
mod functions;
mod renderer;

pub use error::{TemplateError, TemplateResult};
pub use renderer::TemplateRenderer;
