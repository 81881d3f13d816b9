use std::borrow::Cow;
use std::env;
use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result, bail};

// Exports and dumps larger than this are refused: 10MB
const MAX_FILE_SIZE_BYTES: u64 = 10 * 1024 * 1024;

/// Refuse oversized input files.
///
/// Checks the already opened handle, so the size seen here is the size of the
/// file that will actually be read.
pub fn validate_file_size(file: &File, path: &Path) -> Result<()> {
    let size = file
        .metadata()
        .with_context(|| format!("Failed to read file metadata: {}", path.display()))?
        .len();

    if size > MAX_FILE_SIZE_BYTES {
        bail!(
            "File too large: {} ({} bytes, max {} bytes)",
            path.display(),
            size,
            MAX_FILE_SIZE_BYTES
        );
    }

    Ok(())
}

/// Shorten a path for display by replacing the home directory with `~`
///
/// ```no_run
/// use std::path::Path;
/// use whatsapper::format_path_with_tilde;
///
/// // "~/exports/calls.jsonl" when HOME=/home/alice
/// let shown = format_path_with_tilde(Path::new("/home/alice/exports/calls.jsonl"));
/// ```
pub fn format_path_with_tilde(path: &Path) -> String {
    format_path_with_home(path, env::var("HOME").ok().as_deref())
}

pub(crate) fn format_path_with_home(path: &Path, home: Option<&str>) -> String {
    let path_str = path.to_string_lossy();
    if let Some(home) = home
        && !home.is_empty()
        && path_str.starts_with(home)
    {
        return path_str.replacen(home, "~", 1);
    }

    match path_str {
        Cow::Borrowed(s) => s.to_string(),
        Cow::Owned(s) => s,
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::path::PathBuf;

    use tempfile::NamedTempFile;

    use super::*;

    #[test]
    fn test_small_file_passes() {
        let mut tmp = NamedTempFile::new().unwrap();
        writeln!(tmp, "{{\"number\":\"+15550000001\",\"date\":1}}").unwrap();

        let file = File::open(tmp.path()).unwrap();
        assert!(validate_file_size(&file, tmp.path()).is_ok());
    }

    #[test]
    fn test_oversized_file_is_rejected() {
        let tmp = NamedTempFile::new().unwrap();
        tmp.as_file().set_len(MAX_FILE_SIZE_BYTES + 1).unwrap();

        let file = File::open(tmp.path()).unwrap();
        let err = validate_file_size(&file, tmp.path()).unwrap_err();
        assert!(err.to_string().contains("File too large"));
    }

    #[test]
    fn test_file_at_limit_passes() {
        let tmp = NamedTempFile::new().unwrap();
        tmp.as_file().set_len(MAX_FILE_SIZE_BYTES).unwrap();

        let file = File::open(tmp.path()).unwrap();
        assert!(validate_file_size(&file, tmp.path()).is_ok());
    }

    #[test]
    fn test_format_path_with_home() {
        let path = PathBuf::from("/home/alice/exports/calls.jsonl");
        assert_eq!(format_path_with_home(&path, Some("/home/alice")), "~/exports/calls.jsonl");
        assert_eq!(format_path_with_home(&path, Some("/home/bob")), "/home/alice/exports/calls.jsonl");
        assert_eq!(format_path_with_home(&path, Some("")), "/home/alice/exports/calls.jsonl");
        assert_eq!(format_path_with_home(&path, None), "/home/alice/exports/calls.jsonl");
    }
}
