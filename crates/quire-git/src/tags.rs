//! Tag timeline reader.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use quire_commit::{Tag, link_timeline};
use regex::Regex;
use tracing::debug;

use crate::log::FIELD_MARKER;

/// Timeline ordering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TagSort {
    /// Newest tag date first.
    #[default]
    Date,
    /// Highest semantic version first; non-semver tags are dropped.
    Semver,
}

/// Parses `git for-each-ref` output into a linked, newest-first timeline.
#[derive(Debug, Clone, Default)]
pub struct TagReader {
    filter: Option<Regex>,
    sort: TagSort,
}

impl TagReader {
    /// Creates a reader keeping tags whose name matches `filter` (all when
    /// `None`), ordered by `sort`.
    #[must_use]
    pub fn new(filter: Option<Regex>, sort: TagSort) -> Self {
        Self { filter, sort }
    }

    /// Parses raw output produced with [`tag_format`](crate::tag_format).
    ///
    /// Lines that cannot be parsed are skipped.
    #[must_use]
    pub fn read(&self, raw: &str) -> Vec<Tag> {
        let mut tags: Vec<Tag> = raw
            .lines()
            .filter(|line| !line.trim().is_empty())
            .filter_map(|line| {
                let tag = parse_line(line);
                if tag.is_none() {
                    debug!(%line, "skipping unparsable tag line");
                }
                tag
            })
            .filter(|tag| {
                self.filter
                    .as_ref()
                    .is_none_or(|filter| filter.is_match(&tag.name))
            })
            .collect();

        match self.sort {
            TagSort::Date => tags.sort_by(|a, b| {
                b.date
                    .cmp(&a.date)
                    .then_with(|| compare_names(&b.name, &a.name))
            }),
            TagSort::Semver => {
                let mut versioned: Vec<(semver::Version, Tag)> = tags
                    .into_iter()
                    .filter_map(|tag| match parse_version(&tag.name) {
                        Some(version) => Some((version, tag)),
                        None => {
                            debug!(tag = %tag.name, "dropping non-semver tag");
                            None
                        }
                    })
                    .collect();
                versioned.sort_by(|a, b| b.0.cmp(&a.0));
                tags = versioned.into_iter().map(|(_, tag)| tag).collect();
            }
        }

        link_timeline(&mut tags);
        debug!(count = tags.len(), "read tags");
        tags
    }
}

fn parse_line(line: &str) -> Option<Tag> {
    let mut fields = line.split(FIELD_MARKER);
    let refname = fields.next()?;
    let subject = fields.next()?;
    let tagger_date = fields.next()?;
    let author_date = fields.next()?;

    let name = refname.strip_prefix("refs/tags/").unwrap_or(refname);
    if name.is_empty() {
        return None;
    }

    let date = parse_date(tagger_date).or_else(|| parse_date(author_date))?;
    Some(Tag::new(name, subject.trim(), date))
}

fn parse_date(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|date| date.with_timezone(&Utc))
}

fn parse_version(name: &str) -> Option<semver::Version> {
    semver::Version::parse(name.strip_prefix('v').unwrap_or(name)).ok()
}

/// Orders equal-date tags by semantic version when both parse, by name
/// otherwise.
fn compare_names(a: &str, b: &str) -> Ordering {
    match (parse_version(a), parse_version(b)) {
        (Some(va), Some(vb)) => va.cmp(&vb),
        _ => a.cmp(b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(name: &str, subject: &str, tagger: &str, author: &str) -> String {
        format!("refs/tags/{name}{FIELD_MARKER}{subject}{FIELD_MARKER}{tagger}{FIELD_MARKER}{author}")
    }

    fn raw(lines: &[String]) -> String {
        lines.join("\n")
    }

    fn names(tags: &[Tag]) -> Vec<&str> {
        tags.iter().map(|t| t.name.as_str()).collect()
    }

    #[test]
    fn test_read_sorts_by_date_newest_first() {
        let raw = raw(&[
            line("v1.0.0", "first", "", "2024-01-01T10:00:00+00:00"),
            line("v1.2.0", "third", "2024-03-01T10:00:00+02:00", ""),
            line("v1.1.0", "second", "", "2024-02-01T10:00:00Z"),
        ]);
        let tags = TagReader::default().read(&raw);

        assert_eq!(names(&tags), ["v1.2.0", "v1.1.0", "v1.0.0"]);
        assert_eq!(tags[0].subject, "third");
        assert_eq!(tags[0].date.to_rfc3339(), "2024-03-01T08:00:00+00:00");
    }

    #[test]
    fn test_read_links_neighbours() {
        let raw = raw(&[
            line("v1", "", "", "2024-01-01T00:00:00Z"),
            line("v2", "", "", "2024-01-02T00:00:00Z"),
        ]);
        let tags = TagReader::default().read(&raw);

        assert_eq!(tags[0].previous.as_ref().unwrap().name, "v1");
        assert!(tags[0].next.is_none());
        assert_eq!(tags[1].next.as_ref().unwrap().name, "v2");
        assert!(tags[1].previous.is_none());
    }

    #[test]
    fn test_tagger_date_preferred() {
        let raw = line("v1", "", "2024-05-01T00:00:00Z", "2024-01-01T00:00:00Z");
        let tags = TagReader::default().read(&raw);
        assert_eq!(tags[0].date.to_rfc3339(), "2024-05-01T00:00:00+00:00");
    }

    #[test]
    fn test_same_date_ties_use_version() {
        let raw = raw(&[
            line("v1.10.0", "", "", "2024-01-01T00:00:00Z"),
            line("v1.2.0", "", "", "2024-01-01T00:00:00Z"),
            line("v1.9.0", "", "", "2024-01-01T00:00:00Z"),
        ]);
        let tags = TagReader::default().read(&raw);
        assert_eq!(names(&tags), ["v1.10.0", "v1.9.0", "v1.2.0"]);
    }

    #[test]
    fn test_semver_sort_drops_non_semver() {
        let raw = raw(&[
            line("v2.0.0", "", "", "2024-01-01T00:00:00Z"),
            line("nightly", "", "", "2024-06-01T00:00:00Z"),
            line("v10.0.0", "", "", "2023-01-01T00:00:00Z"),
            line("1.5.0", "", "", "2024-02-01T00:00:00Z"),
        ]);
        let tags = TagReader::new(None, TagSort::Semver).read(&raw);
        assert_eq!(names(&tags), ["v10.0.0", "v2.0.0", "1.5.0"]);
    }

    #[test]
    fn test_filter_pattern() {
        let raw = raw(&[
            line("v1.0.0", "", "", "2024-01-01T00:00:00Z"),
            line("docs-1", "", "", "2024-01-02T00:00:00Z"),
            line("v1.1.0", "", "", "2024-01-03T00:00:00Z"),
        ]);
        let filter = Regex::new(r"^v\d").unwrap();
        let tags = TagReader::new(Some(filter), TagSort::Date).read(&raw);

        assert_eq!(names(&tags), ["v1.1.0", "v1.0.0"]);
        assert_eq!(tags[0].previous.as_ref().unwrap().name, "v1.0.0");
    }

    #[test]
    fn test_skips_malformed_lines() {
        let raw = raw(&[
            "garbage".to_string(),
            line("v1", "", "", "not a date"),
            line("v2", "", "", "2024-01-01T00:00:00Z"),
        ]);
        let tags = TagReader::default().read(&raw);
        assert_eq!(names(&tags), ["v2"]);
    }

    #[test]
    fn test_empty_input() {
        assert!(TagReader::default().read("").is_empty());
    }
}
