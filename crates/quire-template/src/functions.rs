//! Functions available to changelog templates.

use chrono::DateTime;
use chrono::format::{Item, StrftimeItems};
use minijinja::{Environment, Error, ErrorKind};

/// Registers the changelog function library on `env`.
pub(crate) fn register(env: &mut Environment<'_>) {
    env.add_function("contains", contains);
    env.add_function("has_prefix", has_prefix);
    env.add_function("has_suffix", has_suffix);
    env.add_function("datetime", datetime);
    env.add_function("indent", indent);
    env.add_function("replace", replace);
    env.add_function("upper_first", upper_first);
    env.add_filter("upper_first", upper_first);
}

fn contains(s: &str, sub: &str) -> bool {
    s.contains(sub)
}

fn has_prefix(s: &str, prefix: &str) -> bool {
    s.starts_with(prefix)
}

fn has_suffix(s: &str, suffix: &str) -> bool {
    s.ends_with(suffix)
}

/// Formats an RFC 3339 timestamp with a strftime layout.
fn datetime(layout: &str, value: &str) -> Result<String, Error> {
    let items: Vec<Item<'_>> = StrftimeItems::new(layout).collect();
    if items.iter().any(|item| matches!(item, Item::Error)) {
        return Err(Error::new(
            ErrorKind::InvalidOperation,
            format!("invalid date layout: {layout}"),
        ));
    }

    let date = DateTime::parse_from_rfc3339(value).map_err(|e| {
        Error::new(
            ErrorKind::InvalidOperation,
            format!("invalid timestamp {value:?}: {e}"),
        )
    })?;
    Ok(date.format_with_items(items.into_iter()).to_string())
}

/// Pads every line by `n` spaces.
fn indent(s: &str, n: usize) -> String {
    if s.is_empty() {
        return String::new();
    }
    let pad = " ".repeat(n);
    s.split('\n')
        .map(|line| format!("{pad}{line}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Replaces at most `n` occurrences; negative `n` replaces all.
fn replace(s: &str, old: &str, new: &str, n: i64) -> String {
    match usize::try_from(n) {
        Ok(n) => s.replacen(old, new, n),
        Err(_) => s.replace(old, new),
    }
}

fn upper_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
