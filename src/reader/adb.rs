use std::io::Cursor;

use anyhow::{Result, bail};

use super::sources::{CallLogSource, ContactsSource};
use crate::adb::{AdbShell, shell_quote};
use crate::models::CallLogRow;
use crate::parsers::content_query::{contact_from_row, parse_content_rows};
use crate::parsers::parse_call_log_dump;

const CALL_LOG_URI: &str = "content://call_log/calls";
const CALL_LOG_PROJECTION: &str = "number:name:date:type:duration";
const PHONES_URI: &str = "content://com.android.contacts/data/phones";
const PHONES_PROJECTION: &str = "display_name:data1";

/// Live call log of a device connected over adb
#[derive(Debug, Clone, Default)]
pub struct AdbCallLogSource {
    adb: AdbShell,
}

impl AdbCallLogSource {
    pub fn new(adb: AdbShell) -> Self {
        Self { adb }
    }
}

impl CallLogSource for AdbCallLogSource {
    fn query_calls(&self) -> Result<Vec<CallLogRow>> {
        let output = self.adb.shell(&[
            "content",
            "query",
            "--uri",
            CALL_LOG_URI,
            "--projection",
            CALL_LOG_PROJECTION,
            "--sort",
            "'date DESC'",
        ])?;
        parse_call_log_dump(Cursor::new(output))
    }
}

/// Contacts of a device connected over adb, queried one number at a time
#[derive(Debug, Clone, Default)]
pub struct AdbContactsSource {
    adb: AdbShell,
}

impl AdbContactsSource {
    pub fn new(adb: AdbShell) -> Self {
        Self { adb }
    }
}

/// Characters a dialable number may contain; anything else never reaches the device shell
fn is_lookup_safe(number: &str) -> bool {
    !number.is_empty()
        && number.chars().all(|c| c.is_ascii_digit() || matches!(c, '+' | '*' | '#' | ' ' | '-' | '.' | '(' | ')'))
}

impl ContactsSource for AdbContactsSource {
    fn lookup(&self, number: &str) -> Result<Option<String>> {
        if !is_lookup_safe(number) {
            bail!("refusing contact lookup for number with unexpected characters: {:?}", number);
        }

        let selection = shell_quote(&format!("data1='{}'", number));
        let output = self.adb.shell(&[
            "content",
            "query",
            "--uri",
            PHONES_URI,
            "--projection",
            PHONES_PROJECTION,
            "--where",
            &selection,
        ])?;

        let rows = parse_content_rows(Cursor::new(output))?;
        Ok(rows.iter().filter_map(contact_from_row).find(|c| c.number == number).map(|c| c.name))
    }
}
