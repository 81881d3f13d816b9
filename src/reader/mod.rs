//! Call history retrieval
//!
//! [`CallLogReader`] turns the rows of a [`CallLogSource`] into [`CallRecord`]s:
//!
//! 1. rows with an empty number are dropped
//! 2. with de-duplication on, only the first row per number is kept; the source
//!    is ordered newest first, so that is the most recent call
//! 3. an empty cached name counts as no name
//! 4. a missing name is looked up in the [`ContactsSource`] when contact lookup
//!    is permitted
//!
//! # Fails open
//!
//! A failure of the call-log source produces an empty history, never an error:
//! callers always get something they can display. Contact lookup failures only
//! cost the name of that one record.

pub mod adb;
pub mod sources;

use std::collections::HashSet;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

pub use adb::{AdbCallLogSource, AdbContactsSource};
pub use sources::{
    CallLogSource, ContactDirectory, ContactsSource, ContentQueryCallLogSource, JsonlCallLogSource,
};

use crate::models::CallRecord;

/// Access the host granted to the call log and contacts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Permissions {
    #[serde(default = "granted")]
    pub call_log: bool,
    #[serde(default = "granted")]
    pub contacts: bool,
}

fn granted() -> bool {
    true
}

impl Default for Permissions {
    fn default() -> Self {
        Self { call_log: true, contacts: true }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReaderOptions {
    /// Keep only the most recent call per number
    pub deduplicate: bool,
}

impl Default for ReaderOptions {
    fn default() -> Self {
        Self { deduplicate: true }
    }
}

/// Snapshot of the call history as a presentation layer would show it
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryState {
    pub records: Vec<CallRecord>,
    pub is_loading: bool,
    pub has_permission: bool,
}

pub struct CallLogReader<'a> {
    calls: &'a dyn CallLogSource,
    contacts: Option<&'a dyn ContactsSource>,
    options: ReaderOptions,
}

impl<'a> CallLogReader<'a> {
    pub fn new(calls: &'a dyn CallLogSource) -> Self {
        Self { calls, contacts: None, options: ReaderOptions::default() }
    }

    pub fn with_contacts(mut self, contacts: &'a dyn ContactsSource) -> Self {
        self.contacts = Some(contacts);
        self
    }

    pub fn with_options(mut self, options: ReaderOptions) -> Self {
        self.options = options;
        self
    }

    /// Read the call history, or an empty list if the source fails
    pub fn fetch(&self, has_contact_lookup: bool) -> Vec<CallRecord> {
        match self.try_fetch(has_contact_lookup) {
            Ok(records) => records,
            Err(e) => {
                warn!("Failed to read call log, showing empty history: {:#}", e);
                Vec::new()
            }
        }
    }

    /// Like [`fetch`](Self::fetch) but surfaces source errors
    pub fn try_fetch(&self, has_contact_lookup: bool) -> Result<Vec<CallRecord>> {
        let rows = self.calls.query_calls()?;
        let mut records = Vec::with_capacity(rows.len());
        let mut seen_numbers: HashSet<String> = HashSet::new();

        for row in rows {
            let Some(number) = row.number.filter(|n| !n.is_empty()) else {
                continue;
            };

            if self.options.deduplicate && seen_numbers.contains(&number) {
                continue;
            }

            let mut contact_name = row.name.filter(|n| !n.is_empty());
            if contact_name.is_none() && has_contact_lookup {
                contact_name = self.lookup_name(&number);
            }

            if self.options.deduplicate {
                seen_numbers.insert(number.clone());
            }
            records.push(CallRecord::new(
                number,
                contact_name,
                row.date,
                row.call_type,
                u64::try_from(row.duration).unwrap_or(0),
            ));
        }

        debug!(count = records.len(), deduplicate = self.options.deduplicate, "call log read");
        Ok(records)
    }

    /// Re-read the history under the given permissions.
    ///
    /// Without call-log access the source is not touched at all.
    pub fn refresh(&self, permissions: &Permissions) -> HistoryState {
        if !permissions.call_log {
            return HistoryState { records: Vec::new(), is_loading: false, has_permission: false };
        }

        HistoryState { records: self.fetch(permissions.contacts), is_loading: false, has_permission: true }
    }

    fn lookup_name(&self, number: &str) -> Option<String> {
        let contacts = self.contacts?;
        match contacts.lookup(number) {
            Ok(name) => name.filter(|n| !n.is_empty()),
            Err(e) => {
                warn!("Contact lookup failed for {}: {:#}", number, e);
                None
            }
        }
    }
}
