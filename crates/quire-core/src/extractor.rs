//! Commit classification, grouping and sorting.

use std::cmp::Ordering;

use quire_commit::{ChangeSet, Commit, CommitGroup, CommitKind, FieldValue, NoteGroup};
use tracing::debug;

use crate::{CoreResult, GroupSort, Options};

/// Groups parsed commits into the sections of one version.
pub struct CommitExtractor<'a> {
    options: &'a Options,
}

impl<'a> CommitExtractor<'a> {
    /// Creates an extractor driven by `options`.
    #[must_use]
    pub fn new(options: &'a Options) -> Self {
        Self { options }
    }

    /// Extracts groups, merges, reverts and notes from `commits`.
    ///
    /// Merges and reverts are set aside before filtering, and notes are
    /// collected from every commit regardless of filters.
    ///
    /// # Errors
    ///
    /// Returns an error if sort keys of different kinds are compared.
    pub fn extract(&self, commits: &[Commit]) -> CoreResult<ChangeSet> {
        let mut changes = ChangeSet::default();
        let mut normal = Vec::new();

        for commit in commits {
            match commit.kind() {
                CommitKind::Merge => changes.merge_commits.push(commit.clone()),
                CommitKind::Revert => changes.revert_commits.push(commit.clone()),
                CommitKind::Normal if self.is_allowed(commit) => normal.push(commit.clone()),
                CommitKind::Normal => {
                    debug!(hash = %commit.hash.short, "commit filtered out");
                }
            }
        }

        changes.commit_groups = self.group(normal);
        self.sort_groups(&mut changes.commit_groups)?;
        for group in &mut changes.commit_groups {
            let field = self.options.commit_sort_by;
            sort_by_field(&mut group.commits, |commit| field.value(commit))?;
        }

        changes.note_groups = collect_notes(commits);

        debug!(
            groups = changes.commit_groups.len(),
            merges = changes.merge_commits.len(),
            reverts = changes.revert_commits.len(),
            notes = changes.note_groups.len(),
            "extracted commits"
        );
        Ok(changes)
    }

    fn equals(&self, a: &str, b: &str) -> bool {
        if self.options.no_case_sensitive {
            a.to_lowercase() == b.to_lowercase()
        } else {
            a == b
        }
    }

    fn is_allowed(&self, commit: &Commit) -> bool {
        self.options.commit_filters.iter().all(|(field, allowed)| {
            if allowed.is_empty() {
                return true;
            }
            let value = field.value(commit).to_string();
            allowed.iter().any(|candidate| self.equals(candidate, &value))
        })
    }

    fn group(&self, commits: Vec<Commit>) -> Vec<CommitGroup> {
        let mut groups: Vec<CommitGroup> = Vec::new();

        for commit in commits {
            let key = self.options.group_by.value(&commit).to_string();
            if key.is_empty() {
                continue;
            }

            match groups.iter_mut().find(|g| self.equals(&g.raw_title, &key)) {
                Some(group) => group.commits.push(commit),
                None => groups.push(CommitGroup {
                    title: self
                        .options
                        .title_maps
                        .get(&key)
                        .cloned()
                        .unwrap_or_else(|| title_case(&key)),
                    raw_title: key,
                    commits: vec![commit],
                }),
            }
        }

        groups
    }

    fn sort_groups(&self, groups: &mut Vec<CommitGroup>) -> CoreResult<()> {
        match self.options.group_sort_by {
            GroupSort::Custom => {
                let order = &self.options.title_order;
                let rank = |group: &CommitGroup| {
                    order
                        .iter()
                        .position(|t| *t == group.raw_title)
                        .or_else(|| order.iter().position(|t| *t == group.title))
                        .unwrap_or(usize::MAX)
                };
                groups.sort_by_key(rank);
                Ok(())
            }
            GroupSort::Field(field) => sort_by_field(groups, |group| field.value(group)),
        }
    }
}

/// Stable sort by a field, failing if the keys are of different kinds.
fn sort_by_field<T>(items: &mut Vec<T>, key: impl Fn(&T) -> FieldValue) -> CoreResult<()> {
    let mut keyed: Vec<(FieldValue, T)> = items.drain(..).map(|item| (key(&item), item)).collect();

    if let Some((first, rest)) = keyed.split_first() {
        for (other, _) in rest {
            first.0.try_cmp(other)?;
        }
    }

    keyed.sort_by(|a, b| a.0.try_cmp(&b.0).unwrap_or(Ordering::Equal));
    items.extend(keyed.into_iter().map(|(_, item)| item));
    Ok(())
}

fn collect_notes(commits: &[Commit]) -> Vec<NoteGroup> {
    let mut groups: Vec<NoteGroup> = Vec::new();

    for note in commits.iter().flat_map(|commit| &commit.notes) {
        match groups.iter_mut().find(|g| g.title == note.title) {
            Some(group) => group.notes.push(note.clone()),
            None => groups.push(NoteGroup {
                title: note.title.clone(),
                notes: vec![note.clone()],
            }),
        }
    }

    groups.sort_by_key(|group| group.title.to_lowercase());
    for group in &mut groups {
        group.notes.sort_by_key(|note| note.title.to_lowercase());
    }
    groups
}

/// Uppercases the first letter of every whitespace-separated word.
fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut at_word_start = true;
    for c in s.chars() {
        if at_word_start {
            out.extend(c.to_uppercase());
        } else {
            out.push(c);
        }
        at_word_start = c.is_whitespace();
    }
    out
}
