//! Template error types.

use std::path::PathBuf;

use thiserror::Error;

/// Template-related errors.
#[derive(Debug, Error)]
pub enum TemplateError {
    /// Template file does not exist.
    #[error("template not found: {0}")]
    NotFound(PathBuf),

    /// Template path is a directory.
    #[error("template path is a directory: {0}")]
    IsDirectory(PathBuf),

    /// Template failed to parse.
    #[error("template syntax error: {0}")]
    Syntax(#[source] minijinja::Error),

    /// Template failed while rendering.
    #[error("template render error: {0}")]
    Render(#[source] minijinja::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for template operations.
pub type TemplateResult<T> = Result<T, TemplateError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_display() {
        let err = TemplateError::NotFound(PathBuf::from("/tpl/CHANGELOG.tpl.md"));
        assert_eq!(err.to_string(), "template not found: /tpl/CHANGELOG.tpl.md");
    }

    #[test]
    fn test_is_directory_display() {
        let err = TemplateError::IsDirectory(PathBuf::from("/tpl"));
        assert_eq!(err.to_string(), "template path is a directory: /tpl");
    }

    #[test]
    fn test_syntax_display() {
        let err = TemplateError::Syntax(minijinja::Error::new(
            minijinja::ErrorKind::SyntaxError,
            "unexpected end of input",
        ));
        assert!(err.to_string().starts_with("template syntax error: "));
        assert!(err.to_string().contains("unexpected end of input"));
    }
}
