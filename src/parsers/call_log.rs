use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use anyhow::{Context, Result};

use super::lines::parse_lines_strict;
use crate::models::CallLogRow;
use crate::utils::validate_file_size;

/// Parse a JSON-Lines call-log export, one row per line, newest first.
///
/// A single malformed line fails the whole export.
pub fn parse_call_log_file(path: &Path) -> Result<Vec<CallLogRow>> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open call log file: {}", path.display()))?;
    validate_file_size(&file, path)?;

    parse_call_log_jsonl(BufReader::new(file))
}

/// Parse JSON-Lines call-log rows from any buffered reader
pub fn parse_call_log_jsonl<R: BufRead>(reader: R) -> Result<Vec<CallLogRow>> {
    parse_lines_strict(reader, "call log", |line| {
        Ok(Some(serde_json::from_str::<CallLogRow>(line)?))
    })
}
