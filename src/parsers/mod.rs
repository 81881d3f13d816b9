//! Parsers for call-log and contacts exports
//!
//! Two input formats are understood:
//!
//! - **JSON Lines**: one JSON object per line (`call_log`, `contacts`)
//! - **`content query` dumps**: the text printed by Android's `content query`
//!   shell tool, either saved to a file or read live over adb (`content_query`)
//!
//! # Error Handling Strategy
//!
//! - **Call logs are all or nothing**: the first malformed row fails the whole
//!   parse, so a history is never shown with calls silently missing.
//!
//! - **Contacts degrade gracefully**: malformed lines are logged with `tracing::warn!`
//!   and skipped, costing only that one name. If >50% of lines fail to parse, or
//!   if >100 consecutive errors occur, the parser returns an error.
//!
//! - **Error propagation**: Uses `anyhow::Result` with context. The call-log reader is
//!   the one place that turns such an error into an empty history.

pub mod call_log;
pub mod contacts;
pub mod content_query;
pub mod deserializers;
mod lines;

pub use call_log::{parse_call_log_file, parse_call_log_jsonl};
pub use contacts::{parse_contacts_file, parse_contacts_jsonl};
pub use content_query::{
    ContentRow, parse_call_log_dump, parse_call_log_dump_file, parse_contacts_dump,
    parse_contacts_dump_file,
};
