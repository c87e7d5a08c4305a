use std::{fs, io::Read, path::Path, time::Duration};

use csv::{ReaderBuilder, StringRecord, Trim};
use shared::domain::TargetId;
use thiserror::Error;

const FIELDS_PER_ROW: usize = 3;

/// One `id,mac,settle_seconds` row of the targets file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetConfig {
    pub id: TargetId,
    pub mac: String,
    pub settle: Duration,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unable to read targets file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("unable to parse targets file as CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("line {line}: expected id,mac,timeout but found {found} field(s)")]
    FieldCount { line: u64, found: usize },
    #[error("line {line}: target id is empty")]
    EmptyId { line: u64 },
    #[error("line {line}: timeout '{value}' is not a non-negative whole number of seconds")]
    InvalidTimeout { line: u64, value: String },
    #[error("line {line}: duplicate target id '{id}'")]
    DuplicateId { line: u64, id: TargetId },
    #[error("target {row}: duplicate target id '{id}'")]
    DuplicateTarget { row: usize, id: TargetId },
}

pub fn load_targets(path: impl AsRef<Path>) -> Result<Vec<TargetConfig>, ConfigError> {
    let path = path.as_ref();
    let file = fs::File::open(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_targets(file)
}

/// Parses headerless CSV rows. Blank lines and lines starting with `#` are
/// skipped; fields are trimmed. Duplicate ids are rejected here so the
/// registry never sees them.
pub fn parse_targets(reader: impl Read) -> Result<Vec<TargetConfig>, ConfigError> {
    let mut csv = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .comment(Some(b'#'))
        .trim(Trim::All)
        .from_reader(reader);

    let mut targets: Vec<TargetConfig> = Vec::new();
    for record in csv.records() {
        let record = record?;
        let line = record.position().map(|pos| pos.line()).unwrap_or_default();
        let target = parse_row(&record, line)?;
        if targets.iter().any(|existing| existing.id == target.id) {
            return Err(ConfigError::DuplicateId {
                line,
                id: target.id,
            });
        }
        targets.push(target);
    }
    Ok(targets)
}

fn parse_row(record: &StringRecord, line: u64) -> Result<TargetConfig, ConfigError> {
    if record.len() != FIELDS_PER_ROW {
        return Err(ConfigError::FieldCount {
            line,
            found: record.len(),
        });
    }

    let id = &record[0];
    if id.is_empty() {
        return Err(ConfigError::EmptyId { line });
    }

    let raw_timeout = &record[2];
    let seconds = raw_timeout
        .parse::<u64>()
        .map_err(|_| ConfigError::InvalidTimeout {
            line,
            value: raw_timeout.to_string(),
        })?;

    Ok(TargetConfig {
        id: TargetId::new(id),
        mac: record[1].to_string(),
        settle: Duration::from_secs(seconds),
    })
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
