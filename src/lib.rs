//! Whatsapper - browse a phone's call history and open WhatsApp chats
//!
//! This library reads an Android call log, fills in contact names and hands
//! phone numbers to WhatsApp. It provides:
//!
//! - Call-log sources: a live device over adb, JSON Lines exports, or saved
//!   `content query` output
//! - [`CallLogReader`]: empty-number filtering, per-number de-duplication and
//!   contact-name backfill, failing open to an empty history
//! - [`PhoneDispatcher`]: phone number cleanup, validation, and the
//!   app → business app → web fallback chain
//!
//! # Example
//!
//! ```no_run
//! use whatsapper::reader::{CallLogReader, JsonlCallLogSource};
//!
//! let source = JsonlCallLogSource::new("calls.jsonl");
//! let records = CallLogReader::new(&source).fetch(false);
//! for record in &records {
//!     println!("{} {}", record.display_name(), record.formatted_timestamp());
//! }
//! ```

pub mod adb;
pub mod cli;
pub mod config;
pub mod dispatch;
pub mod models;
pub mod parsers;
pub mod reader;
pub mod utils;

// Re-export commonly used types
pub use dispatch::{Launcher, PhoneDispatcher, is_valid, normalize};
pub use models::{CallRecord, CallType, DispatchOutcome, LaunchRequest};
pub use reader::{CallLogReader, CallLogSource, ContactsSource, HistoryState, Permissions};
pub use utils::format_path_with_tilde;
