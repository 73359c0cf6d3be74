//! Wire format shared with the git binary.
//!
//! Every log record starts with [`RECORD_MARKER`] and its fields are joined
//! by [`FIELD_MARKER`]. Both markers are long enough that ordinary commit
//! text never contains them, so bodies may hold arbitrary content.

use chrono::{DateTime, TimeZone, Utc};
use quire_commit::{Hash, Signature};
use tracing::warn;

/// Starts every commit record.
pub const RECORD_MARKER: &str = "@@__QUIRE_RECORD__@@";

/// Separates fields within a record (and within a tag line).
pub const FIELD_MARKER: &str = "@@__QUIRE_FIELD__@@";

/// Returns the `--pretty` format used for `git log`.
#[must_use]
pub fn log_format() -> String {
    format!(
        "{RECORD_MARKER}HASH:%H\t%h{FIELD_MARKER}AUTHOR:%an\t%ae\t%at{FIELD_MARKER}COMMITTER:%cn\t%ce\t%ct{FIELD_MARKER}SUBJECT:%s{FIELD_MARKER}BODY:%b"
    )
}

/// Returns the `--format` used for `git for-each-ref`.
#[must_use]
pub fn tag_format() -> String {
    format!(
        "%(refname){FIELD_MARKER}%(subject){FIELD_MARKER}%(taggerdate:iso-strict){FIELD_MARKER}%(authordate:iso-strict)"
    )
}

/// One commit as listed by `git log`, before any message parsing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogRecord {
    /// Commit hash.
    pub hash: Hash,
    /// Author identity.
    pub author: Signature,
    /// Committer identity.
    pub committer: Signature,
    /// First line of the message.
    pub subject: String,
    /// Rest of the message.
    pub body: String,
}

/// Splits raw `git log` output produced with [`log_format`] into records.
///
/// Records missing the hash field are skipped with a warning.
#[must_use]
pub fn split_log_records(raw: &str) -> Vec<LogRecord> {
    raw.split(RECORD_MARKER)
        .filter(|chunk| !chunk.trim().is_empty())
        .filter_map(|chunk| {
            let record = parse_record(chunk);
            if record.is_none() {
                warn!(record = %chunk.lines().next().unwrap_or_default(), "skipping malformed log record");
            }
            record
        })
        .collect()
}

fn parse_record(chunk: &str) -> Option<LogRecord> {
    let mut record = LogRecord::default();
    let mut has_hash = false;

    for field in chunk.split(FIELD_MARKER) {
        let (key, value) = field.split_once(':')?;
        match key {
            "HASH" => {
                let (long, short) = value.trim().split_once('\t')?;
                record.hash = Hash {
                    long: long.to_string(),
                    short: short.to_string(),
                };
                has_hash = true;
            }
            "AUTHOR" => record.author = parse_signature(value)?,
            "COMMITTER" => record.committer = parse_signature(value)?,
            "SUBJECT" => record.subject = value.trim().to_string(),
            "BODY" => record.body = value.trim().to_string(),
            _ => {}
        }
    }

    has_hash.then_some(record)
}

fn parse_signature(value: &str) -> Option<Signature> {
    let mut parts = value.trim_end_matches(['\r', '\n']).splitn(3, '\t');
    let name = parts.next()?.to_string();
    let email = parts.next()?.to_string();
    let date = parse_unix(parts.next()?)?;
    Some(Signature { name, email, date })
}

fn parse_unix(value: &str) -> Option<DateTime<Utc>> {
    let seconds = value.trim().parse::<i64>().ok()?;
    Utc.timestamp_opt(seconds, 0).single()
}
