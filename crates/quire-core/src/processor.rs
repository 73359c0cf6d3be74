//! Post-parse commit processing.

use quire_commit::Commit;
use regex::{Captures, Regex};

use crate::CoreResult;
use crate::options::compile;

/// Rewrites or drops commits after parsing.
pub trait CommitProcessor {
    /// Returns the processed commit, or `None` to drop it.
    fn process(&self, commit: Commit) -> Option<Commit>;
}

/// Hosting services whose link layout [`ForgeLinkProcessor`] knows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Forge {
    /// `github.com` style.
    Github,
    /// `gitlab.com` style.
    Gitlab,
}

/// Turns `#123` and `@user` into markdown links.
#[derive(Debug, Clone)]
pub struct ForgeLinkProcessor {
    forge: Forge,
    repository_url: String,
    host_url: String,
    re_issue: Regex,
    re_mention: Regex,
}

impl ForgeLinkProcessor {
    /// Creates a processor linking into `repository_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the link patterns fail to compile.
    pub fn new(forge: Forge, repository_url: &str) -> CoreResult<Self> {
        let repository_url = repository_url.trim_end_matches('/').to_string();
        let host_url = match repository_url.split_once("://") {
            Some((scheme, rest)) => {
                let host = rest.split('/').next().unwrap_or(rest);
                format!("{scheme}://{host}")
            }
            None => repository_url.clone(),
        };

        Ok(Self {
            forge,
            repository_url,
            host_url,
            re_issue: compile(r"(^|[^\w\[/&#])#(\d+)\b")?,
            re_mention: compile(r"(^|[^\w@.\[/])@([\w-]+)")?,
        })
    }

    fn link(&self, text: &str) -> String {
        let issues = match self.forge {
            Forge::Github => "issues",
            Forge::Gitlab => "-/issues",
        };
        let text = self.re_issue.replace_all(text, |caps: &Captures<'_>| {
            format!(
                "{}[#{id}]({}/{issues}/{id})",
                &caps[1],
                self.repository_url,
                id = &caps[2],
            )
        });
        self.re_mention
            .replace_all(&text, |caps: &Captures<'_>| {
                format!("{}[@{user}]({}/{user})", &caps[1], self.host_url, user = &caps[2])
            })
            .into_owned()
    }
}

impl CommitProcessor for ForgeLinkProcessor {
    fn process(&self, mut commit: Commit) -> Option<Commit> {
        commit.subject = self.link(&commit.subject);
        commit.body = self.link(&commit.body);
        commit.trimmed_body = self.link(&commit.trimmed_body);
        for note in &mut commit.notes {
            note.body = self.link(&note.body);
        }
        Some(commit)
    }
}
