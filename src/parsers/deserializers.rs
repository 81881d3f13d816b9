use chrono::{DateTime, Utc};
use serde::de::Error;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::models::CallType;

/// Custom deserializer for call dates: epoch milliseconds as a number or numeric
/// string, or an RFC3339 string
pub fn deserialize_epoch_millis<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    match value {
        Value::Number(n) => n.as_i64().ok_or_else(|| Error::custom("invalid timestamp")),
        Value::String(s) => {
            if let Ok(ms) = s.trim().parse::<i64>() {
                return Ok(ms);
            }
            s.parse::<DateTime<Utc>>()
                .map(|dt| dt.timestamp_millis())
                .map_err(|e| Error::custom(format!("invalid RFC3339 timestamp: {}", e)))
        }
        _ => Err(Error::custom("timestamp must be a number or string")),
    }
}

/// Custom deserializer for call types: the provider's integer code or a label
pub fn deserialize_call_type<'de, D>(deserializer: D) -> Result<CallType, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    match value {
        Value::Number(n) => {
            Ok(n.as_i64().map(CallType::from_code).unwrap_or(CallType::Unknown))
        }
        Value::String(s) => match s.trim().parse::<i64>() {
            Ok(code) => Ok(CallType::from_code(code)),
            Err(_) => Ok(CallType::from_label(&s)),
        },
        Value::Null => Ok(CallType::Unknown),
        _ => Err(Error::custom("call type must be a number or string")),
    }
}
