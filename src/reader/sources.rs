use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::models::{CallLogRow, ContactEntry};
use crate::parsers::{
    parse_call_log_dump_file, parse_call_log_file, parse_contacts_dump_file, parse_contacts_file,
};

/// Provider of raw call-log rows, newest first.
///
/// The ordering is trusted; the reader never re-sorts.
pub trait CallLogSource {
    fn query_calls(&self) -> Result<Vec<CallLogRow>>;
}

/// Provider of display names, keyed by exact phone number.
pub trait ContactsSource {
    /// Name of the first contact whose number equals `number`
    fn lookup(&self, number: &str) -> Result<Option<String>>;
}

/// Call log exported as JSON Lines
#[derive(Debug, Clone)]
pub struct JsonlCallLogSource {
    path: PathBuf,
}

impl JsonlCallLogSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CallLogSource for JsonlCallLogSource {
    fn query_calls(&self) -> Result<Vec<CallLogRow>> {
        parse_call_log_file(&self.path)
    }
}

/// Call log saved from `content query --uri content://call_log/calls`
#[derive(Debug, Clone)]
pub struct ContentQueryCallLogSource {
    path: PathBuf,
}

impl ContentQueryCallLogSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CallLogSource for ContentQueryCallLogSource {
    fn query_calls(&self) -> Result<Vec<CallLogRow>> {
        parse_call_log_dump_file(&self.path)
    }
}

/// In-memory contacts table, searched in insertion order
#[derive(Debug, Clone, Default)]
pub struct ContactDirectory {
    entries: Vec<ContactEntry>,
}

impl ContactDirectory {
    pub fn new(entries: Vec<ContactEntry>) -> Self {
        Self { entries }
    }

    pub fn from_jsonl_file(path: &Path) -> Result<Self> {
        Ok(Self::new(parse_contacts_file(path)?))
    }

    pub fn from_dump_file(path: &Path) -> Result<Self> {
        Ok(Self::new(parse_contacts_dump_file(path)?))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ContactsSource for ContactDirectory {
    fn lookup(&self, number: &str) -> Result<Option<String>> {
        Ok(self.entries.iter().find(|c| c.number == number).map(|c| c.name.clone()))
    }
}
