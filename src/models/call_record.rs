use std::fmt;

use chrono::{DateTime, Local, TimeZone};
use serde::{Deserialize, Serialize};

/// Direction of a call as reported by the call-log provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CallType {
    Incoming,
    Outgoing,
    Missed,
    Unknown,
}

impl CallType {
    /// Map the provider's integer `type` column (1, 2, 3) to a call type
    pub fn from_code(code: i64) -> Self {
        match code {
            1 => CallType::Incoming,
            2 => CallType::Outgoing,
            3 => CallType::Missed,
            _ => CallType::Unknown,
        }
    }

    /// Parse a textual label such as `"incoming"` or `"Missed"`
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "incoming" => CallType::Incoming,
            "outgoing" => CallType::Outgoing,
            "missed" => CallType::Missed,
            _ => CallType::Unknown,
        }
    }

    /// Human-readable label shown next to each entry
    pub fn label(&self) -> &'static str {
        match self {
            CallType::Incoming => "Incoming",
            CallType::Outgoing => "Outgoing",
            CallType::Missed => "Missed",
            CallType::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for CallType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Raw row as handed over by a call-log source, before any filtering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallLogRow {
    #[serde(default)]
    pub number: Option<String>,
    #[serde(default, alias = "cached_name")]
    pub name: Option<String>,
    #[serde(deserialize_with = "crate::parsers::deserializers::deserialize_epoch_millis")]
    pub date: i64,
    #[serde(
        rename = "type",
        default = "unknown_call_type",
        deserialize_with = "crate::parsers::deserializers::deserialize_call_type"
    )]
    pub call_type: CallType,
    #[serde(default)]
    pub duration: i64,
}

fn unknown_call_type() -> CallType {
    CallType::Unknown
}

/// One logical entry of the call history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallRecord {
    pub number: String,
    pub contact_name: Option<String>,
    /// Epoch milliseconds
    pub timestamp: i64,
    pub call_type: CallType,
    pub duration_seconds: u64,
}

impl CallRecord {
    /// Build a record, treating an empty contact name as no name at all
    pub fn new(
        number: impl Into<String>,
        contact_name: Option<String>,
        timestamp: i64,
        call_type: CallType,
        duration_seconds: u64,
    ) -> Self {
        Self {
            number: number.into(),
            contact_name: contact_name.filter(|name| !name.is_empty()),
            timestamp,
            call_type,
            duration_seconds,
        }
    }

    /// Contact name if known, otherwise the raw number
    pub fn display_name(&self) -> &str {
        self.contact_name.as_deref().unwrap_or(&self.number)
    }

    /// Call time in the local timezone, e.g. `Jan 05, 2024 13:45`
    pub fn formatted_timestamp(&self) -> String {
        self.formatted_timestamp_in(&Local)
    }

    pub fn formatted_timestamp_in<Tz: TimeZone>(&self, tz: &Tz) -> String
    where
        Tz::Offset: fmt::Display,
    {
        match DateTime::from_timestamp_millis(self.timestamp) {
            Some(utc) => crate::utils::format_call_time(&utc.with_timezone(tz)),
            None => String::from("-"),
        }
    }
}
