//! Shared test utilities for integration tests
#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

pub const CALL_LOG_FILE: &str = "calls.jsonl";
pub const CONTACTS_FILE: &str = "contacts.jsonl";
pub const CALL_LOG_DUMP_FILE: &str = "calls.txt";
pub const CONTACTS_DUMP_FILE: &str = "contacts.txt";

/// Builder for one call-log row
#[derive(Clone)]
pub struct CallRowBuilder {
    number: Option<String>,
    name: Option<String>,
    date: i64,
    call_type: i64,
    duration: i64,
}

impl CallRowBuilder {
    /// Incoming call from `number` with no cached name
    pub fn new(number: &str) -> Self {
        Self {
            number: Some(number.to_string()),
            name: None,
            date: 1_704_462_300_000,
            call_type: 1,
            duration: 60,
        }
    }

    /// Row whose number column is NULL
    pub fn without_number() -> Self {
        Self { number: None, ..Self::new("") }
    }

    pub fn name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    pub fn date(mut self, date: i64) -> Self {
        self.date = date;
        self
    }

    pub fn call_type(mut self, call_type: i64) -> Self {
        self.call_type = call_type;
        self
    }

    pub fn duration(mut self, duration: i64) -> Self {
        self.duration = duration;
        self
    }

    /// JSON Lines representation
    pub fn to_json(&self) -> String {
        serde_json::json!({
            "number": self.number,
            "name": self.name,
            "date": self.date,
            "type": self.call_type,
            "duration": self.duration,
        })
        .to_string()
    }

    /// `content query` representation
    pub fn to_content_row(&self, index: usize) -> String {
        format!(
            "Row: {} number={}, name={}, date={}, type={}, duration={}",
            index,
            self.number.as_deref().unwrap_or("NULL"),
            self.name.as_deref().unwrap_or("NULL"),
            self.date,
            self.call_type,
            self.duration
        )
    }
}

pub fn call_log_jsonl(rows: &[CallRowBuilder]) -> String {
    rows.iter().map(|r| r.to_json()).collect::<Vec<_>>().join("\n")
}

pub fn call_log_dump(rows: &[CallRowBuilder]) -> String {
    if rows.is_empty() {
        return "No result found.\n".to_string();
    }
    rows.iter().enumerate().map(|(i, r)| r.to_content_row(i)).collect::<Vec<_>>().join("\n")
}

pub fn contacts_jsonl(contacts: &[(&str, &str)]) -> String {
    contacts
        .iter()
        .map(|(number, name)| serde_json::json!({ "number": number, "name": name }).to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn contacts_dump(contacts: &[(&str, &str)]) -> String {
    contacts
        .iter()
        .enumerate()
        .map(|(i, (number, name))| format!("Row: {} display_name={}, data1={}", i, name, number))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Builder for a directory holding call-log and contacts exports
pub struct ExportDirBuilder {
    temp_dir: TempDir,
}

impl ExportDirBuilder {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        Self { temp_dir }
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn with_file(self, name: &str, content: &str) -> Self {
        fs::write(self.temp_dir.path().join(name), content).expect("Failed to write export file");
        self
    }

    pub fn with_call_log(self, rows: &[CallRowBuilder]) -> Self {
        let content = call_log_jsonl(rows);
        self.with_file(CALL_LOG_FILE, &content)
    }

    pub fn with_call_log_dump(self, rows: &[CallRowBuilder]) -> Self {
        let content = call_log_dump(rows);
        self.with_file(CALL_LOG_DUMP_FILE, &content)
    }

    pub fn with_contacts(self, contacts: &[(&str, &str)]) -> Self {
        let content = contacts_jsonl(contacts);
        self.with_file(CONTACTS_FILE, &content)
    }

    pub fn with_contacts_dump(self, contacts: &[(&str, &str)]) -> Self {
        let content = contacts_dump(contacts);
        self.with_file(CONTACTS_DUMP_FILE, &content)
    }

    pub fn build(self) -> TempDir {
        self.temp_dir
    }
}

impl Default for ExportDirBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Stand-in for the `adb` tool: a shell script that logs its arguments and
/// answers `content query`, `pm list packages` and `am start` from fixtures.
#[cfg(unix)]
pub struct FakeAdb {
    dir: TempDir,
}

#[cfg(unix)]
impl FakeAdb {
    /// `refused_packages` make `am start -p <pkg>` print an error; `None`
    /// refuses the unscoped launch
    pub fn new(
        calls: &[CallRowBuilder],
        contacts: &[(&str, &str)],
        installed: &[&str],
        refused_packages: &[Option<&str>],
    ) -> Self {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().expect("Failed to create temp dir");
        let root = dir.path();
        fs::write(root.join("calls.txt"), call_log_dump(calls)).unwrap();
        fs::write(root.join("contacts.txt"), contacts_dump(contacts)).unwrap();
        let packages: String = installed.iter().map(|p| format!("package:{}\n", p)).collect();
        fs::write(root.join("packages.txt"), packages).unwrap();

        let refuse_cases: String = refused_packages
            .iter()
            .map(|p| match p {
                Some(pkg) => format!(
                    "  *\"am start\"*\"-p '{}'\"*) echo 'Error: Activity not started'; exit 0 ;;\n",
                    pkg
                ),
                None => "  *\"am start\"*\"web.whatsapp.com\"*) echo 'Error: Activity not started'; exit 0 ;;\n"
                    .to_string(),
            })
            .collect();

        let script = format!(
            r#"#!/bin/sh
echo "$*" >> '{root}/adb.log'
case "$*" in
  *call_log/calls*) cat '{root}/calls.txt' ;;
  *data/phones*) cat '{root}/contacts.txt' ;;
  *"pm list packages"*) cat '{root}/packages.txt' ;;
{refuse_cases}  *"am start"*) echo 'Starting: Intent {{ act=android.intent.action.VIEW }}' ;;
  *) echo "unexpected command: $*" >&2; exit 1 ;;
esac
"#,
            root = root.display(),
            refuse_cases = refuse_cases
        );

        let program = root.join("adb");
        fs::write(&program, script).unwrap();
        fs::set_permissions(&program, fs::Permissions::from_mode(0o755)).unwrap();

        Self { dir }
    }

    pub fn program(&self) -> PathBuf {
        self.dir.path().join("adb")
    }

    /// Every invocation, one line each
    pub fn invocations(&self) -> Vec<String> {
        fs::read_to_string(self.dir.path().join("adb.log"))
            .map(|log| log.lines().map(String::from).collect())
            .unwrap_or_default()
    }
}
