//! Revision sources.

use std::path::PathBuf;
use std::process::Command;

use tracing::debug;

use crate::log::{log_format, tag_format};
use crate::{GitError, GitResult};

/// Supplies raw tag and commit listings.
///
/// Implementations return text in the formats produced by
/// [`tag_format`](crate::tag_format) and [`log_format`](crate::log_format).
pub trait RevisionSource {
    /// Lists every tag with its subject and dates.
    ///
    /// # Errors
    ///
    /// Returns an error if the listing cannot be produced.
    fn list_tags(&self) -> GitResult<String>;

    /// Lists the commits of a revision expression, optionally restricted to
    /// the given paths.
    ///
    /// # Errors
    ///
    /// Returns an error if the listing cannot be produced.
    fn list_commits(&self, revision: &str, paths: &[String]) -> GitResult<String>;
}

impl<T: RevisionSource + ?Sized> RevisionSource for &T {
    fn list_tags(&self) -> GitResult<String> {
        (**self).list_tags()
    }

    fn list_commits(&self, revision: &str, paths: &[String]) -> GitResult<String> {
        (**self).list_commits(revision, paths)
    }
}

/// Runs the git binary inside a fixed working directory.
#[derive(Debug, Clone)]
pub struct GitCli {
    bin: String,
    workdir: PathBuf,
}

impl GitCli {
    /// Creates a source running `git` in `workdir`.
    #[must_use]
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        Self {
            bin: "git".to_string(),
            workdir: workdir.into(),
        }
    }

    /// Uses a different git binary.
    #[must_use]
    pub fn with_bin(mut self, bin: impl Into<String>) -> Self {
        self.bin = bin.into();
        self
    }

    fn run(&self, args: &[String]) -> GitResult<String> {
        let command = format!("{} {}", self.bin, args.join(" "));
        debug!(%command, workdir = %self.workdir.display(), "running git");

        let output = Command::new(&self.bin)
            .args(args)
            .current_dir(&self.workdir)
            .output()
            .map_err(|source| GitError::Exec {
                command: command.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(GitError::CommandFailed {
                command,
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl RevisionSource for GitCli {
    fn list_tags(&self) -> GitResult<String> {
        self.run(&[
            "for-each-ref".to_string(),
            format!("--format={}", tag_format()),
            "refs/tags".to_string(),
        ])
    }

    fn list_commits(&self, revision: &str, paths: &[String]) -> GitResult<String> {
        let mut args = vec![
            "log".to_string(),
            revision.to_string(),
            "--no-decorate".to_string(),
            format!("--pretty={}", log_format()),
        ];
        if !paths.is_empty() {
            args.push("--".to_string());
            args.extend(paths.iter().cloned());
        }
        self.run(&args)
    }
}
