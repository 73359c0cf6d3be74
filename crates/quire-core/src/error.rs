//! Core error types.

use quire_commit::FieldError;
use thiserror::Error;

use crate::TicketError;

/// Core-related errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Git error.
    #[error("git error: {0}")]
    Git(#[from] quire_git::GitError),

    /// Template error.
    #[error("template error: {0}")]
    Template(#[from] quire_template::TemplateError),

    /// A tag named in the query does not exist.
    #[error("tag not found: {0}")]
    TagNotFound(String),

    /// The next-tag override names an existing tag.
    #[error("tag already exists: {0}")]
    TagExists(String),

    /// A range query selected no tags.
    #[error("no relevant tags found for {0:?}")]
    NoRelevantTags(String),

    /// The query produced no versions.
    #[error("commits corresponding to {0:?} were not found")]
    NoMatchingCommits(String),

    /// Ticket lookup failed.
    #[error("ticket error: {0}")]
    Ticket(#[from] TicketError),

    /// A configured regular expression does not compile.
    #[error("invalid pattern {pattern:?}: {source}")]
    InvalidPattern {
        /// The pattern as configured.
        pattern: String,
        /// Compilation error.
        #[source]
        source: regex::Error,
    },

    /// A configured field name is unknown.
    #[error("{0}")]
    InvalidField(FieldError),

    /// Sort keys of different kinds were compared.
    #[error("{0}")]
    IncomparableValues(FieldError),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<FieldError> for CoreError {
    fn from(err: FieldError) -> Self {
        match err {
            FieldError::Unknown { .. } => Self::InvalidField(err),
            FieldError::Incomparable { .. } => Self::IncomparableValues(err),
        }
    }
}

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_not_found_display() {
        let err = CoreError::TagNotFound("v9.9.9".to_string());
        assert_eq!(err.to_string(), "tag not found: v9.9.9");
    }

    #[test]
    fn test_no_matching_commits_display() {
        let err = CoreError::NoMatchingCommits("v1.0.0..v2.0.0".to_string());
        assert_eq!(
            err.to_string(),
            "commits corresponding to \"v1.0.0..v2.0.0\" were not found"
        );
    }

    #[test]
    fn test_field_error_conversion() {
        let unknown = FieldError::Unknown {
            kind: "commit",
            name: "Colour".to_string(),
        };
        assert!(matches!(
            CoreError::from(unknown),
            CoreError::InvalidField(_)
        ));

        let incomparable = FieldError::Incomparable {
            left: "text",
            right: "integer",
        };
        let err = CoreError::from(incomparable);
        assert!(matches!(err, CoreError::IncomparableValues(_)));
        assert_eq!(err.to_string(), "cannot compare text with integer");
    }
}
