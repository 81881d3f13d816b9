//! Data models for call history and chat dispatch.
//!
//! - [`CallLogRow`] - Raw row from a call-log source, before filtering
//! - [`CallRecord`] - One entry of the displayed call history
//! - [`ContactEntry`] - Number to display-name mapping from a contacts source
//! - [`LaunchRequest`] / [`DispatchOutcome`] - Deep-link requests and their results
//!
//! Rows use serde with custom deserializers for timestamps and call types
//! (see `parsers::deserializers`).

pub mod call_record;
pub mod contact;
pub mod dispatch;

pub use call_record::{CallLogRow, CallRecord, CallType};
pub use contact::ContactEntry;
pub use dispatch::{DispatchOutcome, DispatchStrategy, LaunchRequest};
