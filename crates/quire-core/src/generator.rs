//! Changelog generation.

use std::io::Write;

use chrono::{DateTime, Utc};
use quire_commit::{Commit, Info, RenderData, Tag, Unreleased, Version, link_timeline};
use quire_git::{RevisionSource, TagReader};
use quire_template::TemplateRenderer;
use tracing::{debug, info};

use crate::{
    CommitExtractor, CommitParser, CommitProcessor, CoreError, CoreResult, Options, Selection,
    TicketEnricher, select,
};

/// Drives a generation from tag query to rendered document.
pub struct Generator {
    options: Options,
    info: Info,
    source: Box<dyn RevisionSource>,
    enricher: Option<Box<dyn TicketEnricher>>,
    processors: Vec<Box<dyn CommitProcessor>>,
}

impl Generator {
    /// Creates a generator reading history from `source`.
    #[must_use]
    pub fn new(options: Options, source: impl RevisionSource + 'static) -> Self {
        Self {
            options,
            info: Info::default(),
            source: Box::new(source),
            enricher: None,
            processors: Vec::new(),
        }
    }

    /// Sets the document metadata.
    #[must_use]
    pub fn with_info(mut self, info: Info) -> Self {
        self.info = info;
        self
    }

    /// Enriches commits carrying a ticket id.
    #[must_use]
    pub fn with_ticket_enricher(mut self, enricher: Box<dyn TicketEnricher>) -> Self {
        self.enricher = Some(enricher);
        self
    }

    /// Adds a processor run on every parsed commit, in insertion order.
    #[must_use]
    pub fn with_processor(mut self, processor: Box<dyn CommitProcessor>) -> Self {
        self.processors.push(processor);
        self
    }

    /// Builds the render data for `query`.
    ///
    /// # Errors
    ///
    /// Returns an error if a queried tag does not exist, the next tag already
    /// exists, the revision source or a ticket lookup fails, or a non-empty
    /// query yields no versions.
    pub fn generate(&self, query: &str) -> CoreResult<RenderData> {
        info!(query, "generating changelog");

        let timeline = self.timeline()?;
        let newest = timeline
            .iter()
            .find(|tag| Some(&tag.name) != self.options.next_tag.as_ref())
            .map(|tag| tag.name.clone());
        let Selection { tags, boundary } = select(&timeline, query)?;
        debug!(tags = tags.len(), %boundary, "tags resolved");

        let parser = CommitParser::new(&self.options, self.source.as_ref())?
            .with_enricher(self.enricher.as_deref());
        let extractor = CommitExtractor::new(&self.options);

        let unreleased = self.unreleased(&parser, &extractor, newest.as_deref())?;
        debug!(empty = unreleased.is_empty(), "unreleased built");

        let versions = self.versions(&parser, &extractor, tags, &boundary)?;
        debug!(versions = versions.len(), "versions built");

        if versions.is_empty() && !query.is_empty() {
            return Err(CoreError::NoMatchingCommits(query.to_string()));
        }

        Ok(RenderData {
            info: self.info.clone(),
            unreleased,
            versions,
        })
    }

    /// Generates `query` and writes the rendered document to `writer`.
    ///
    /// Nothing is written unless generation and rendering both succeed.
    ///
    /// # Errors
    ///
    /// Returns any generation or template error, or an IO error from
    /// `writer`.
    pub fn render(
        &self,
        query: &str,
        renderer: &TemplateRenderer,
        mut writer: impl Write,
    ) -> CoreResult<()> {
        let data = self.generate(query)?;
        let document = renderer.render_to_string(&data)?;
        writer.write_all(document.as_bytes())?;
        writer.flush()?;
        info!(versions = data.versions.len(), "changelog rendered");
        Ok(())
    }

    /// Reads the tag timeline, with the next-tag pseudo-tag in front.
    fn timeline(&self) -> CoreResult<Vec<Tag>> {
        let reader = TagReader::new(self.options.tag_filter.clone(), self.options.tag_sort);
        let mut tags = reader.read(&self.source.list_tags()?);

        if let Some(next) = &self.options.next_tag {
            if tags.iter().any(|tag| &tag.name == next) {
                return Err(CoreError::TagExists(next.clone()));
            }
            debug!(tag = %next, "adding next tag");
            // Epoch until its newest commit back-fills the date.
            let date = DateTime::<Utc>::default();
            tags.insert(0, Tag::new(next.clone(), next.clone(), date));
            link_timeline(&mut tags);
        }

        Ok(tags)
    }

    fn unreleased(
        &self,
        parser: &CommitParser<'_>,
        extractor: &CommitExtractor<'_>,
        newest: Option<&str>,
    ) -> CoreResult<Unreleased> {
        if self.options.next_tag.is_some() {
            return Ok(Unreleased::default());
        }

        let revision = newest.map_or_else(|| "HEAD".to_string(), |tag| format!("{tag}..HEAD"));
        let commits = self.parse(parser, &revision)?;
        let changes = extractor.extract(&commits)?;
        Ok(Unreleased { commits, changes })
    }

    fn versions(
        &self,
        parser: &CommitParser<'_>,
        extractor: &CommitExtractor<'_>,
        tags: Vec<Tag>,
        boundary: &str,
    ) -> CoreResult<Vec<Version>> {
        let mut versions: Vec<Version> = Vec::with_capacity(tags.len());

        for mut tag in tags {
            let is_next = self.options.next_tag.as_ref() == Some(&tag.name);
            let revision = if is_next {
                tag.previous
                    .as_ref()
                    .map_or_else(|| "HEAD".to_string(), |prev| format!("{}..HEAD", prev.name))
            } else {
                revision_for(&tag, boundary)
            };

            let commits = self.parse(parser, &revision)?;
            if is_next && let Some(newest) = commits.first() {
                tag.date = newest.author.date;
            }
            // Keep the newer neighbour's date in step with a back-filled tag.
            if let (Some(newer), Some(next)) = (versions.last(), tag.next.as_mut())
                && newer.tag.name == next.name
            {
                next.date = newer.tag.date;
            }

            let changes = extractor.extract(&commits)?;
            debug!(tag = %tag.name, %revision, commits = commits.len(), "version built");
            versions.push(Version {
                tag,
                commits,
                changes,
            });
        }

        Ok(versions)
    }

    fn parse(&self, parser: &CommitParser<'_>, revision: &str) -> CoreResult<Vec<Commit>> {
        let commits = parser.parse(revision)?;
        Ok(commits
            .into_iter()
            .filter_map(|commit| {
                self.processors
                    .iter()
                    .try_fold(commit, |commit, processor| processor.process(commit))
            })
            .collect())
    }
}

/// Revision expression of a released tag.
///
/// The predecessor is the next-older tag in the timeline, else the selection
/// boundary; with neither, the range is everything reachable from the tag.
fn revision_for(tag: &Tag, boundary: &str) -> String {
    let predecessor = tag
        .previous
        .as_ref()
        .map(|prev| prev.name.as_str())
        .or_else(|| (!boundary.is_empty() && boundary != tag.name).then_some(boundary));

    match predecessor {
        Some(prev) => format!("{prev}..{}", tag.name),
        None => tag.name.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn tag(name: &str) -> Tag {
        Tag::new(name, "", Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())
    }

    #[test]
    fn test_revision_uses_previous_tag() {
        let mut tags = vec![tag("v2"), tag("v1")];
        link_timeline(&mut tags);
        assert_eq!(revision_for(&tags[0], ""), "v1..v2");
        assert_eq!(revision_for(&tags[0], "v0"), "v1..v2");
    }

    #[test]
    fn test_revision_falls_back_to_boundary() {
        assert_eq!(revision_for(&tag("v2"), "v1"), "v1..v2");
    }

    #[test]
    fn test_revision_without_predecessor() {
        assert_eq!(revision_for(&tag("v1"), ""), "v1");
        assert_eq!(revision_for(&tag("v1"), "v1"), "v1");
    }
}
