//! Commit log parsing.

use quire_commit::{Commit, Contact, Merge, Note, Ref, Revert};
use quire_git::{LogRecord, RevisionSource, split_log_records};
use regex::Regex;
use tracing::{debug, warn};

use crate::options::compile;
use crate::{CoreResult, Options, TicketEnricher, TicketError};

const MENTION_PATTERN: &str = r"(?:^|[^\w@.])@([\w-]+)";
const SIGN_OFF_PATTERN: &str = r"Signed-off-by:\s+([\p{L}\s\-\[\]]+)\s+<([\w+\-\[\].@]+)>";
const CO_AUTHOR_PATTERN: &str = r"Co-authored-by:\s+([\p{L}\s\-\[\]]+)\s+<([\w+\-\[\].@]+)>";

fn alternation(words: &[String]) -> String {
    words
        .iter()
        .map(|word| regex::escape(word))
        .collect::<Vec<_>>()
        .join("|")
}

/// Turns raw commit logs into [`Commit`] values.
pub struct CommitParser<'a> {
    options: &'a Options,
    source: &'a dyn RevisionSource,
    enricher: Option<&'a dyn TicketEnricher>,
    re_ref: Option<Regex>,
    re_issue: Option<Regex>,
    re_note: Option<Regex>,
    re_mention: Regex,
    re_sign_off: Regex,
    re_co_author: Regex,
}

impl<'a> CommitParser<'a> {
    /// Compiles the metadata patterns derived from `options`.
    ///
    /// # Errors
    ///
    /// Returns an error if a derived pattern does not compile.
    pub fn new(options: &'a Options, source: &'a dyn RevisionSource) -> CoreResult<Self> {
        let prefixes = alternation(&options.issue_prefixes);
        let actions = alternation(&options.ref_actions);
        let keywords = alternation(&options.note_keywords);

        let re_issue = (!prefixes.is_empty())
            .then(|| compile(&format!(r"(?:{prefixes})(\d+)")))
            .transpose()?;
        let re_ref = (!prefixes.is_empty() && !actions.is_empty())
            .then(|| {
                compile(&format!(
                    r"(?i)\b({actions})\s?([\w/.\-]+)?(?:{prefixes})(\d+)"
                ))
            })
            .transpose()?;
        let re_note = (!keywords.is_empty())
            .then(|| compile(&format!(r"(?i)^\s*({keywords}):\s*(.*)$")))
            .transpose()?;

        Ok(Self {
            options,
            source,
            enricher: None,
            re_ref,
            re_issue,
            re_note,
            re_mention: compile(MENTION_PATTERN)?,
            re_sign_off: compile(SIGN_OFF_PATTERN)?,
            re_co_author: compile(CO_AUTHOR_PATTERN)?,
        })
    }

    /// Attaches a ticket enricher.
    #[must_use]
    pub fn with_enricher(mut self, enricher: Option<&'a dyn TicketEnricher>) -> Self {
        self.enricher = enricher;
        self
    }

    /// Lists and parses the commits of a revision expression.
    ///
    /// Pattern mismatches never fail; only listing and ticket transport
    /// failures do.
    ///
    /// # Errors
    ///
    /// Returns an error if the revision source fails or a ticket lookup fails
    /// for a reason other than the ticket not existing.
    pub fn parse(&self, revision: &str) -> CoreResult<Vec<Commit>> {
        let raw = self.source.list_commits(revision, &self.options.paths)?;
        let records = split_log_records(&raw);
        debug!(revision, count = records.len(), "parsing commits");

        records
            .iter()
            .map(|record| {
                let mut commit = self.parse_record(record);
                self.enrich(&mut commit)?;
                Ok(commit)
            })
            .collect()
    }

    /// Parses one log record without ticket enrichment.
    pub fn parse_record(&self, record: &LogRecord) -> Commit {
        let mut commit = Commit {
            hash: record.hash.clone(),
            author: record.author.clone(),
            committer: record.committer.clone(),
            ..Commit::default()
        };

        self.process_header(&mut commit, &record.subject);
        self.process_body(&mut commit, &record.body);

        dedup(&mut commit.refs);
        dedup(&mut commit.mentions);
        commit
    }

    fn process_header(&self, commit: &mut Commit, header: &str) {
        commit.header = header.to_string();

        if let Some(captures) = self.options.merge.captures(header) {
            let mut merge = Merge::default();
            for (field, value) in captures {
                field.assign(&mut merge, value);
            }
            commit.merge = Some(merge);
        } else if let Some(captures) = self.options.revert.captures(header) {
            let mut revert = Revert::default();
            for (field, value) in captures {
                field.assign(&mut revert, value);
            }
            commit.revert = Some(revert);
        } else if let Some(captures) = self.options.header.captures(header) {
            for (field, value) in captures {
                field.assign(commit, value);
            }
        } else {
            debug!(hash = %commit.hash.short, header, "header did not match pattern");
        }

        commit.refs = self.parse_refs(header);
        commit.mentions = self.parse_mentions(header);
    }

    fn process_body(&self, commit: &mut Commit, body: &str) {
        let body = body.replace("\r\n", "\n");
        let mut fence = FenceDetector::default();
        let mut trimmed = Vec::new();
        let mut in_note = false;
        let mut trim = false;

        for line in body.split('\n') {
            if !in_note {
                trim = false;
            }
            let is_code = fence.is_code(line);

            if !is_code && self.extract_line_metadata(commit, line) {
                trim = true;
                in_note = false;
            }

            let note = self
                .re_note
                .as_ref()
                .filter(|_| !is_code)
                .and_then(|re| re.captures(line));

            if let Some(caps) = note {
                commit.notes.push(Note::new(&caps[1], &caps[2]));
                in_note = true;
                trim = true;
            } else if in_note {
                if line.trim().is_empty() {
                    in_note = false;
                    trim = false;
                } else if let Some(last) = commit.notes.last_mut() {
                    last.body.push('\n');
                    last.body.push_str(line);
                }
            }

            if !trim {
                trimmed.push(line);
            }
        }

        for note in &mut commit.notes {
            note.body = note.body.trim().to_string();
        }
        commit.trimmed_body = trimmed.join("\n").trim().to_string();
        commit.body = body;
    }

    /// Collects refs, mentions and trailers from a body line; returns whether
    /// the line carried any.
    fn extract_line_metadata(&self, commit: &mut Commit, line: &str) -> bool {
        let refs = self.parse_refs(line);
        let mentions = self.parse_mentions(line);
        let co_authors = parse_contacts(&self.re_co_author, line);
        let signers = parse_contacts(&self.re_sign_off, line);

        let found = !(refs.is_empty()
            && mentions.is_empty()
            && co_authors.is_empty()
            && signers.is_empty());

        commit.refs.extend(refs);
        commit.mentions.extend(mentions);
        commit.co_authors.extend(co_authors);
        commit.signers.extend(signers);
        found
    }

    fn parse_refs(&self, input: &str) -> Vec<Ref> {
        let mut refs: Vec<Ref> = self
            .re_ref
            .iter()
            .flat_map(|re| re.captures_iter(input))
            .map(|caps| Ref {
                action: caps[1].to_string(),
                source: caps.get(2).map_or("", |m| m.as_str()).to_string(),
                r#ref: caps[3].to_string(),
            })
            .collect();

        for caps in self.re_issue.iter().flat_map(|re| re.captures_iter(input)) {
            let id = &caps[1];
            if !refs.iter().any(|r| r.r#ref == id) {
                refs.push(Ref {
                    r#ref: id.to_string(),
                    ..Ref::default()
                });
            }
        }
        refs
    }

    fn parse_mentions(&self, input: &str) -> Vec<String> {
        self.re_mention
            .captures_iter(input)
            .map(|caps| caps[1].to_string())
            .collect()
    }

    fn enrich(&self, commit: &mut Commit) -> CoreResult<()> {
        let Some(enricher) = self.enricher else {
            return Ok(());
        };
        if commit.ticket_id.is_empty() {
            return Ok(());
        }

        match enricher.fetch(&commit.ticket_id) {
            Ok(mut ticket) => {
                if let Some(re) = &self.options.ticket_description
                    && let Some(narrowed) = re.captures(&ticket.description).and_then(|c| c.get(1))
                {
                    ticket.description = narrowed.as_str().to_string();
                }
                if let Some(mapped) = self.options.ticket_type_maps.get(&ticket.r#type) {
                    commit.r#type.clone_from(mapped);
                }
                commit.ticket = Some(ticket);
                Ok(())
            }
            Err(TicketError::NotFound(id)) => {
                warn!(hash = %commit.hash.short, ticket = %id, "ticket not found");
                Ok(())
            }
            Err(err) => Err(err.into()),
        }
    }
}

fn parse_contacts(re: &Regex, input: &str) -> Vec<Contact> {
    re.captures_iter(input)
        .map(|caps| Contact {
            name: caps[1].to_string(),
            email: caps[2].to_string(),
        })
        .collect()
}

fn dedup<T: PartialEq>(items: &mut Vec<T>) {
    let mut unique: Vec<T> = Vec::with_capacity(items.len());
    for item in items.drain(..) {
        if !unique.contains(&item) {
            unique.push(item);
        }
    }
    *items = unique;
}

/// Tracks markdown code blocks across body lines.
#[derive(Debug, Default)]
struct FenceDetector {
    fence: Option<&'static str>,
}

impl FenceDetector {
    /// Returns whether `line` is code, updating fence state.
    fn is_code(&mut self, line: &str) -> bool {
        if let Some(fence) = self.fence {
            if line.starts_with(fence) {
                self.fence = None;
            }
            return true;
        }
        if let Some(fence) = ["```", "~~~"].into_iter().find(|f| line.starts_with(f)) {
            self.fence = Some(fence);
            return true;
        }
        line.starts_with("    ") || line.starts_with('\t')
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::Pattern;
    use quire_commit::TicketIssue;
    use quire_config::Config;
    use quire_git::GitResult;
    use std::path::Path;

    struct NoSource;

    impl RevisionSource for NoSource {
        fn list_tags(&self) -> GitResult<String> {
            Ok(String::new())
        }
        fn list_commits(&self, _revision: &str, _paths: &[String]) -> GitResult<String> {
            Ok(String::new())
        }
    }

    fn options() -> Options {
        let mut config = Config::default();
        config.style = quire_config::Style::Github;
        config.options.notes.keywords = vec!["BREAKING CHANGE".to_string()];
        config.normalize(Path::new("."));
        let mut options = Options::from_config(&config.options).unwrap();
        options.header = Pattern::new(
            r"^(\w*)(?:\(([\w.\-*\s]*)\))?:\s(.*)$",
            &["Type", "Scope", "Subject"],
        )
        .unwrap();
        options
    }

    fn record(subject: &str, body: &str) -> LogRecord {
        LogRecord {
            hash: quire_commit::Hash::new("0123456789abcdef"),
            subject: subject.to_string(),
            body: body.to_string(),
            ..LogRecord::default()
        }
    }

    fn parse(options: &Options, subject: &str, body: &str) -> Commit {
        CommitParser::new(options, &NoSource)
            .unwrap()
            .parse_record(&record(subject, body))
    }

    #[test]
    fn test_header_fields() {
        let commit = parse(&options(), "feat(core): add X", "");
        assert_eq!(commit.r#type, "feat");
        assert_eq!(commit.scope, "core");
        assert_eq!(commit.subject, "add X");
        assert_eq!(commit.header, "feat(core): add X");
        assert!(commit.merge.is_none());
        assert!(commit.revert.is_none());
    }

    #[test]
    fn test_unmatched_header_keeps_raw_header() {
        let commit = parse(&options(), "just some words", "");
        assert_eq!(commit.r#type, "");
        assert_eq!(commit.scope, "");
        assert_eq!(commit.subject, "");
        assert_eq!(commit.header, "just some words");
    }

    #[test]
    fn test_merge_commit() {
        let commit = parse(
            &options(),
            "Merge pull request #42 from alice/feature-x",
            "",
        );
        let merge = commit.merge.unwrap();
        assert_eq!(merge.r#ref, "42");
        assert_eq!(merge.source, "alice/feature-x");
        assert!(commit.revert.is_none());
        assert_eq!(commit.r#type, "");
    }

    #[test]
    fn test_revert_commit() {
        let commit = parse(&options(), r#"Revert "feat(core): add X""#, "");
        assert_eq!(commit.revert.unwrap().header, "feat(core): add X");
        assert!(commit.merge.is_none());
        assert_eq!(commit.r#type, "");
    }

    #[test]
    fn test_refs_and_mentions() {
        let commit = parse(
            &options(),
            "fix(api): handle null #7",
            "Closes #12, fixes owner/repo#13\nSee gh-14 and #12\nThanks @alice and @bob-2, mail bob@example.com",
        );

        assert_eq!(
            commit.refs,
            [
                Ref {
                    action: String::new(),
                    r#ref: "7".into(),
                    source: String::new()
                },
                Ref {
                    action: "Closes".into(),
                    r#ref: "12".into(),
                    source: String::new()
                },
                Ref {
                    action: "fixes".into(),
                    r#ref: "13".into(),
                    source: "owner/repo".into()
                },
                Ref {
                    action: String::new(),
                    r#ref: "14".into(),
                    source: String::new()
                },
                Ref {
                    action: String::new(),
                    r#ref: "12".into(),
                    source: String::new()
                },
            ]
        );
        assert_eq!(commit.mentions, ["alice", "bob-2"]);
        assert_eq!(commit.trimmed_body, "");
    }

    #[test]
    fn test_notes_and_trimmed_body() {
        let body = "Some context.\n\nBREAKING CHANGE: the config\nformat changed\n\nMore text.";
        let commit = parse(&options(), "feat: new config", body);

        assert_eq!(commit.notes.len(), 1);
        assert_eq!(commit.notes[0].title, "BREAKING CHANGE");
        assert_eq!(commit.notes[0].body, "the config\nformat changed");
        assert_eq!(commit.trimmed_body, "Some context.\n\n\nMore text.");
        assert_eq!(commit.body, body);
    }

    #[test]
    fn test_note_ends_at_next_keyword() {
        let body = "BREAKING CHANGE: first\nbreaking change: second";
        let commit = parse(&options(), "feat: x", body);
        assert_eq!(commit.notes.len(), 2);
        assert_eq!(commit.notes[0].body, "first");
        assert_eq!(commit.notes[1].title, "breaking change");
        assert_eq!(commit.notes[1].body, "second");
    }

    #[test]
    fn test_code_blocks_are_not_scanned() {
        let body = "Example:\n```\nBREAKING CHANGE: not a note\nfixes #99\n```\n    @indented\nDone.";
        let commit = parse(&options(), "docs: example", body);
        assert!(commit.notes.is_empty());
        assert!(commit.refs.is_empty());
        assert!(commit.mentions.is_empty());
        assert_eq!(commit.trimmed_body, body);
    }

    #[test]
    fn test_trailers() {
        let body = "Body.\n\nCo-authored-by: Jane Doe <jane@example.com>\nSigned-off-by: John Roe <john@example.com>";
        let commit = parse(&options(), "feat: pair", body);
        assert_eq!(
            commit.co_authors,
            [Contact {
                name: "Jane Doe".into(),
                email: "jane@example.com".into()
            }]
        );
        assert_eq!(commit.signers[0].name, "John Roe");
        assert_eq!(commit.trimmed_body, "Body.");
    }

    #[test]
    fn test_no_prefixes_means_no_refs() {
        let mut options = options();
        options.issue_prefixes.clear();
        let commit = parse(&options, "fix: closes #3", "");
        assert!(commit.refs.is_empty());
    }

    struct Tickets;

    impl TicketEnricher for Tickets {
        fn fetch(&self, id: &str) -> Result<TicketIssue, TicketError> {
            match id {
                "PROJ-1" => Ok(TicketIssue {
                    key: id.to_string(),
                    r#type: "Bug".to_string(),
                    summary: "Crash".to_string(),
                    description: "Steps: crash on start\nEnvironment: linux".to_string(),
                    labels: vec!["p1".to_string()],
                }),
                "PROJ-2" => Err(TicketError::NotFound(id.to_string())),
                _ => Err(TicketError::Transport {
                    id: id.to_string(),
                    message: "connection refused".to_string(),
                }),
            }
        }
    }

    struct OneCommit(&'static str);

    impl RevisionSource for OneCommit {
        fn list_tags(&self) -> GitResult<String> {
            Ok(String::new())
        }
        fn list_commits(&self, _revision: &str, _paths: &[String]) -> GitResult<String> {
            Ok(format!(
                "{}HASH:0123456789\t0123456{f}AUTHOR:A\ta@x\t0{f}COMMITTER:A\ta@x\t0{f}SUBJECT:{}{f}BODY:",
                quire_git::RECORD_MARKER,
                self.0,
                f = quire_git::FIELD_MARKER,
            ))
        }
    }

    fn ticket_options() -> Options {
        let mut options = options();
        options.header = Pattern::new(r"^\[(\w+-\d+)\] (.*)$", &["TicketId", "Subject"]).unwrap();
        options
            .ticket_type_maps
            .insert("Bug".to_string(), "fix".to_string());
        options.ticket_description = Some(Regex::new(r"Steps: (.*)").unwrap());
        options
    }

    #[test]
    fn test_ticket_enrichment() {
        let options = ticket_options();
        let source = OneCommit("[PROJ-1] handle crash");
        let parser = CommitParser::new(&options, &source)
            .unwrap()
            .with_enricher(Some(&Tickets));

        let commits = parser.parse("HEAD").unwrap();
        assert_eq!(commits.len(), 1);
        assert_eq!(commits[0].ticket_id, "PROJ-1");
        assert_eq!(commits[0].r#type, "fix");
        let ticket = commits[0].ticket.as_ref().unwrap();
        assert_eq!(ticket.summary, "Crash");
        assert_eq!(ticket.description, "crash on start");
    }

    #[test]
    fn test_ticket_not_found_is_tolerated() {
        let options = ticket_options();
        let source = OneCommit("[PROJ-2] something");
        let parser = CommitParser::new(&options, &source)
            .unwrap()
            .with_enricher(Some(&Tickets));

        let commits = parser.parse("HEAD").unwrap();
        assert_eq!(commits.len(), 1);
        assert!(commits[0].ticket.is_none());
        assert_eq!(commits[0].subject, "something");
    }

    #[test]
    fn test_ticket_transport_error_aborts() {
        let options = ticket_options();
        let source = OneCommit("[PROJ-3] something");
        let parser = CommitParser::new(&options, &source)
            .unwrap()
            .with_enricher(Some(&Tickets));

        assert!(matches!(
            parser.parse("HEAD"),
            Err(crate::CoreError::Ticket(TicketError::Transport { .. }))
        ));
    }
}
