use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use anyhow::{Context, Result};

use super::lines::parse_lines_tolerant;
use crate::models::ContactEntry;
use crate::utils::validate_file_size;

/// Parse a JSON-Lines contacts export (`{"number": ..., "name": ...}` per line)
pub fn parse_contacts_file(path: &Path) -> Result<Vec<ContactEntry>> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open contacts file: {}", path.display()))?;
    validate_file_size(&file, path)?;

    parse_contacts_jsonl(BufReader::new(file))
}

pub fn parse_contacts_jsonl<R: BufRead>(reader: R) -> Result<Vec<ContactEntry>> {
    parse_lines_tolerant(reader, "contacts", |line| {
        Ok(Some(serde_json::from_str::<ContactEntry>(line)?))
    })
}
