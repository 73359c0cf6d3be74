//! Tag range query resolution.
//!
//! Queries select a contiguous window of the newest-first timeline:
//!
//! | query        | selection                          | boundary                 |
//! |--------------|------------------------------------|--------------------------|
//! | empty, `..`  | every tag                          | empty                    |
//! | `old..new`   | `new` down to `old`                | `old`                    |
//! | `old..`      | newest down to `old`               | `old`                    |
//! | `..new`      | `new` and every older tag          | empty (timeline edge)    |
//! | `tag`        | same as `..tag`                    | empty (timeline edge)    |

use quire_commit::Tag;
use tracing::debug;

use crate::{CoreError, CoreResult};

/// Result of resolving a query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    /// Selected tags, newest first.
    pub tags: Vec<Tag>,
    /// Revision just below the selected window, or empty.
    pub boundary: String,
}

/// Resolves a tag range query against a newest-first timeline.
///
/// # Errors
///
/// Returns [`CoreError::TagNotFound`] if a named tag does not exist and
/// [`CoreError::NoRelevantTags`] if a range selects nothing.
pub fn select(tags: &[Tag], query: &str) -> CoreResult<Selection> {
    debug!(query, tags = tags.len(), "selecting tags");

    if query.is_empty() || query == ".." {
        return Ok(Selection {
            tags: tags.to_vec(),
            boundary: String::new(),
        });
    }

    let selection = match query.split_once("..") {
        Some((old, new)) if !old.is_empty() && !new.is_empty() => {
            select_range(tags, query, old, new)?
        }
        Some((old, _)) if !old.is_empty() => {
            let old_index = position(tags, old)?;
            Selection {
                tags: tags[..=old_index].to_vec(),
                boundary: old.to_string(),
            }
        }
        Some((_, new)) => select_to(tags, new)?,
        None => select_to(tags, query)?,
    };

    debug!(
        selected = selection.tags.len(),
        boundary = %selection.boundary,
        "selected tags"
    );
    Ok(selection)
}

fn select_range(tags: &[Tag], query: &str, old: &str, new: &str) -> CoreResult<Selection> {
    let new_index = position(tags, new)?;
    let old_index = position(tags, old)?;

    // old must not be newer than new
    if old_index < new_index {
        return Err(CoreError::NoRelevantTags(query.to_string()));
    }

    Ok(Selection {
        tags: tags[new_index..=old_index].to_vec(),
        boundary: old.to_string(),
    })
}

fn select_to(tags: &[Tag], new: &str) -> CoreResult<Selection> {
    let new_index = position(tags, new)?;
    Ok(Selection {
        tags: tags[new_index..].to_vec(),
        boundary: String::new(),
    })
}

fn position(tags: &[Tag], name: &str) -> CoreResult<usize> {
    tags.iter()
        .position(|tag| tag.name == name)
        .ok_or_else(|| CoreError::TagNotFound(name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use quire_commit::link_timeline;

    /// Newest-first timeline `v4, v3, v2, v1`.
    fn timeline() -> Vec<Tag> {
        let mut tags: Vec<Tag> = (1..=4)
            .rev()
            .map(|n| {
                Tag::new(
                    format!("v{n}"),
                    "",
                    Utc.with_ymd_and_hms(2024, 1, n, 0, 0, 0).unwrap(),
                )
            })
            .collect();
        link_timeline(&mut tags);
        tags
    }

    fn names(selection: &Selection) -> Vec<&str> {
        selection.tags.iter().map(|t| t.name.as_str()).collect()
    }

    #[test]
    fn test_empty_query_selects_all() {
        let tags = timeline();
        for query in ["", ".."] {
            let selection = select(&tags, query).unwrap();
            assert_eq!(names(&selection), ["v4", "v3", "v2", "v1"]);
            assert_eq!(selection.boundary, "");
        }
    }

    #[test]
    fn test_range() {
        let selection = select(&timeline(), "v1..v3").unwrap();
        assert_eq!(names(&selection), ["v3", "v2", "v1"]);
        assert_eq!(selection.boundary, "v1");
    }

    #[test]
    fn test_range_has_no_gaps() {
        let tags = timeline();
        for (old, new) in [(0, 1), (0, 3), (1, 2), (2, 3)] {
            let old_name = &tags[3 - old].name;
            let new_name = &tags[3 - new].name;
            let selection = select(&tags, &format!("{old_name}..{new_name}")).unwrap();

            assert_eq!(&selection.tags.first().unwrap().name, new_name);
            assert_eq!(&selection.tags.last().unwrap().name, old_name);
            assert_eq!(selection.tags.len(), new - old + 1);
            assert_eq!(&selection.boundary, old_name);
        }
    }

    #[test]
    fn test_inverted_range() {
        let err = select(&timeline(), "v3..v1").unwrap_err();
        assert!(matches!(err, CoreError::NoRelevantTags(_)));
    }

    #[test]
    fn test_range_missing_tag() {
        assert!(matches!(
            select(&timeline(), "v1..v9"),
            Err(CoreError::TagNotFound(name)) if name == "v9"
        ));
        assert!(matches!(
            select(&timeline(), "v0..v2"),
            Err(CoreError::TagNotFound(name)) if name == "v0"
        ));
    }

    #[test]
    fn test_open_ended_from() {
        let selection = select(&timeline(), "v2..").unwrap();
        assert_eq!(names(&selection), ["v4", "v3", "v2"]);
        assert_eq!(selection.boundary, "v2");
    }

    #[test]
    fn test_open_ended_to() {
        let selection = select(&timeline(), "..v3").unwrap();
        assert_eq!(names(&selection), ["v3", "v2", "v1"]);
        assert_eq!(selection.boundary, "");
    }

    #[test]
    fn test_single_tag() {
        let selection = select(&timeline(), "v3").unwrap();
        assert_eq!(names(&selection), ["v3", "v2", "v1"]);
        assert_eq!(selection.boundary, "");
        assert_eq!(selection, select(&timeline(), "..v3").unwrap());

        let selection = select(&timeline(), "v1").unwrap();
        assert_eq!(names(&selection), ["v1"]);
        assert_eq!(selection.boundary, "");
    }

    #[test]
    fn test_unknown_tag() {
        for query in ["v9", "v9..", "..v9"] {
            assert!(matches!(
                select(&timeline(), query),
                Err(CoreError::TagNotFound(_))
            ));
        }
    }

    #[test]
    fn test_query_against_empty_timeline() {
        assert!(select(&[], "").unwrap().tags.is_empty());
        assert!(matches!(
            select(&[], "v1"),
            Err(CoreError::TagNotFound(_))
        ));
    }
}
