//! Parser for the text printed by Android's `content query` shell tool.
//!
//! Each result row is one line:
//!
//! ```text
//! Row: 0 number=+15551234567, name=NULL, date=1704462300000, type=1, duration=12
//! ```
//!
//! Values are not quoted, so a value containing `", key="` is ambiguous; the
//! parser splits on `", "` followed by an identifier and `=`. `NULL` is mapped
//! to an absent value.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::LazyLock;

use anyhow::{Context, Result, anyhow, bail};
use regex::Regex;

use super::lines::{parse_lines_strict, parse_lines_tolerant};
use crate::models::{CallLogRow, CallType, ContactEntry};
use crate::utils::validate_file_size;

static ROW_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^Row:\s*\d+\s?").expect("valid row prefix regex"));
static FIELD_KEY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|, )([A-Za-z_][A-Za-z0-9_]*)=").expect("valid field key regex")
});

const NO_RESULT: &str = "No result found.";

/// One row of `content query` output
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentRow {
    fields: HashMap<String, Option<String>>,
}

impl ContentRow {
    /// Value of a column; `None` when the column is missing or `NULL`
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(|v| v.as_deref())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    fn parse_i64(&self, key: &str) -> Result<Option<i64>> {
        self.get(key)
            .map(|v| v.trim().parse::<i64>().with_context(|| format!("invalid {} value: {}", key, v)))
            .transpose()
    }
}

/// Parse one output line. Returns `Ok(None)` for lines that are not rows.
pub fn parse_content_row(line: &str) -> Result<Option<ContentRow>> {
    let line = line.trim_end_matches(['\r', '\n']);
    if line.trim() == NO_RESULT {
        return Ok(None);
    }

    let prefix = ROW_PREFIX.find(line).ok_or_else(|| anyhow!("not a content row: {}", line))?;
    let body = &line[prefix.end()..];

    let keys: Vec<_> = FIELD_KEY.captures_iter(body).collect();
    if keys.is_empty() {
        bail!("content row has no columns");
    }

    let mut fields = HashMap::with_capacity(keys.len());
    for (i, caps) in keys.iter().enumerate() {
        let (Some(whole), Some(key)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let value_end = keys.get(i + 1).and_then(|next| next.get(0)).map_or(body.len(), |m| m.start());
        let value = &body[whole.end()..value_end];
        let value = if value == "NULL" { None } else { Some(value.to_string()) };
        fields.insert(key.as_str().to_string(), value);
    }

    Ok(Some(ContentRow { fields }))
}

/// Parse every row of a `content query` dump
pub fn parse_content_rows<R: BufRead>(reader: R) -> Result<Vec<ContentRow>> {
    parse_lines_tolerant(reader, "content query output", parse_content_row)
}

impl TryFrom<&ContentRow> for CallLogRow {
    type Error = anyhow::Error;

    fn try_from(row: &ContentRow) -> Result<Self> {
        let date = row.parse_i64("date")?.ok_or_else(|| anyhow!("row has no date"))?;
        let call_type = row.parse_i64("type")?.map(CallType::from_code).unwrap_or(CallType::Unknown);
        Ok(CallLogRow {
            number: row.get("number").map(String::from),
            name: row.get("name").map(String::from),
            date,
            call_type,
            duration: row.parse_i64("duration")?.unwrap_or(0),
        })
    }
}

/// Parse call-log rows from `content query --uri content://call_log/calls` output
pub fn parse_call_log_dump<R: BufRead>(reader: R) -> Result<Vec<CallLogRow>> {
    parse_lines_strict(reader, "call log dump", |line| {
        parse_content_row(line)?.map(|row| CallLogRow::try_from(&row)).transpose()
    })
}

/// Read a saved call-log dump from disk
pub fn parse_call_log_dump_file(path: &Path) -> Result<Vec<CallLogRow>> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open call log dump: {}", path.display()))?;
    validate_file_size(&file, path)?;
    parse_call_log_dump(BufReader::new(file))
}

/// Contact entry from a phones-table row; rows without number or name are dropped
pub fn contact_from_row(row: &ContentRow) -> Option<ContactEntry> {
    let number = row.get("data1").or_else(|| row.get("number"))?;
    let name = row.get("display_name").or_else(|| row.get("name"))?;
    Some(ContactEntry { number: number.to_string(), name: name.to_string() })
}

/// Parse contacts from `content query --uri content://com.android.contacts/data/phones` output
pub fn parse_contacts_dump<R: BufRead>(reader: R) -> Result<Vec<ContactEntry>> {
    Ok(parse_content_rows(reader)?.iter().filter_map(contact_from_row).collect())
}

pub fn parse_contacts_dump_file(path: &Path) -> Result<Vec<ContactEntry>> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open contacts dump: {}", path.display()))?;
    validate_file_size(&file, path)?;
    parse_contacts_dump(BufReader::new(file))
}
