//! Interaction log loaders.
//!
//! # Data Format
//!
//! Logs live in the data directory as either JSON Lines or TSV, chosen by
//! file extension:
//!
//! ```text
//! data/
//! ├── test.jsonl    # {"user_id": "U1", "news_id": "N7", "clicked": 1}
//! └── train.tsv     # U1 \t N7 \t 1
//! ```
//!
//! `clicked` must be 0 or 1 (JSON also accepts `true`/`false`). TSV files may
//! start with a `user_id\tnews_id\tclicked` header; blank lines and lines
//! starting with `#` are ignored in both formats.

use recbench_core::types::{clicked_from_int, Interaction, InteractionLog};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use thiserror::Error;

/// Error type for dataset loading.
#[derive(Debug, Error)]
pub enum DatasetError {
    /// IO error reading files.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// JSON parsing error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    /// Missing required file.
    #[error("Missing file: {0}")]
    MissingFile(String),
    /// Invalid data format.
    #[error("Invalid format: {0}")]
    InvalidFormat(String),
}

/// On-disk layout of an interaction log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// One JSON object per line
    JsonLines,
    /// Tab-separated `user_id`, `news_id`, `clicked`
    Tsv,
}

impl LogFormat {
    /// Picks the format from the file extension.
    pub fn from_path(path: &Path) -> Result<Self, DatasetError> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("jsonl") | Some("json") => Ok(LogFormat::JsonLines),
            Some("tsv") => Ok(LogFormat::Tsv),
            _ => Err(DatasetError::InvalidFormat(format!(
                "{}: expected a .jsonl or .tsv file",
                path.display()
            ))),
        }
    }
}

/// Loads an interaction log, dispatching on the file extension.
pub fn load_interactions(path: &Path) -> Result<InteractionLog, DatasetError> {
    if !path.exists() {
        return Err(DatasetError::MissingFile(path.display().to_string()));
    }

    let rows = match LogFormat::from_path(path)? {
        LogFormat::JsonLines => load_jsonl(path)?,
        LogFormat::Tsv => load_tsv(path)?,
    };

    Ok(InteractionLog::new(rows))
}

/// Loads a JSONL file of interactions.
fn load_jsonl(path: &Path) -> Result<Vec<Interaction>, DatasetError> {
    let reader = BufReader::new(File::open(path)?);
    let mut rows = Vec::new();

    for (line_num, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        match serde_json::from_str(trimmed) {
            Ok(row) => rows.push(row),
            Err(e) => {
                return Err(DatasetError::InvalidFormat(format!(
                    "Line {}: {}",
                    line_num + 1,
                    e
                )));
            }
        }
    }

    Ok(rows)
}

/// Loads interactions from a TSV file.
///
/// Format: user_id \t news_id \t clicked
fn load_tsv(path: &Path) -> Result<Vec<Interaction>, DatasetError> {
    let reader = BufReader::new(File::open(path)?);
    let mut rows = Vec::new();

    for (line_num, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() || line.starts_with('#') {
            continue;
        }

        let parts: Vec<&str> = line.trim_end_matches('\r').split('\t').collect();
        if parts.len() < 3 {
            return Err(DatasetError::InvalidFormat(format!(
                "Line {}: expected 3 tab-separated fields, got {}",
                line_num + 1,
                parts.len()
            )));
        }
        if line_num == 0 && parts[0] == "user_id" {
            continue;
        }

        let clicked = parts[2]
            .trim()
            .parse::<i64>()
            .ok()
            .and_then(|value| clicked_from_int(value).ok())
            .ok_or_else(|| {
                DatasetError::InvalidFormat(format!(
                    "Line {}: invalid clicked value '{}'",
                    line_num + 1,
                    parts[2]
                ))
            })?;

        rows.push(Interaction::new(parts[0], parts[1], clicked));
    }

    Ok(rows)
}
