use std::io::BufRead;

use anyhow::{Context, Result, bail};
use tracing::warn;

const MAX_CONSECUTIVE_ERRORS: usize = 100;

/// Parse a line-oriented input, skipping lines that fail to parse.
///
/// `parse` returns `Ok(None)` for lines that carry no entry (headers, banners).
/// Bails out if more than 50% of the meaningful lines fail, or after
/// 100 consecutive failures.
pub(crate) fn parse_lines_tolerant<R, T, F>(reader: R, label: &str, mut parse: F) -> Result<Vec<T>>
where
    R: BufRead,
    F: FnMut(&str) -> Result<Option<T>>,
{
    let mut entries = Vec::new();
    let mut skipped_count = 0;
    let mut total_lines = 0;
    let mut consecutive_errors = 0;

    for (line_num, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("Failed to read line from {}", label))?;

        if line.trim().is_empty() {
            continue;
        }

        match parse(&line) {
            Ok(Some(entry)) => {
                total_lines += 1;
                entries.push(entry);
                consecutive_errors = 0;
            }
            Ok(None) => {}
            Err(e) => {
                total_lines += 1;
                warn!("Failed to parse line {} in {}: {:#}", line_num + 1, label, e);
                skipped_count += 1;
                consecutive_errors += 1;

                if consecutive_errors >= MAX_CONSECUTIVE_ERRORS {
                    bail!(
                        "Too many consecutive parse errors ({}) in {} - input may be corrupted",
                        consecutive_errors,
                        label
                    );
                }
            }
        }
    }

    if total_lines > 0 {
        let failure_rate = (skipped_count as f64) / (total_lines as f64);
        if failure_rate > 0.5 {
            bail!(
                "Too many parse failures in {}: {} of {} lines failed ({:.1}%)",
                label,
                skipped_count,
                total_lines,
                failure_rate * 100.0
            );
        }
    }

    if skipped_count > 0 {
        warn!("Parsed {}: {} entries ({} skipped)", label, entries.len(), skipped_count);
    }

    Ok(entries)
}

/// Parse a line-oriented input where every meaningful line must parse.
///
/// Blank lines and `Ok(None)` lines are skipped; the first failing line aborts
/// the whole parse.
pub(crate) fn parse_lines_strict<R, T, F>(reader: R, label: &str, mut parse: F) -> Result<Vec<T>>
where
    R: BufRead,
    F: FnMut(&str) -> Result<Option<T>>,
{
    let mut entries = Vec::new();

    for (line_num, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("Failed to read line from {}", label))?;

        if line.trim().is_empty() {
            continue;
        }

        if let Some(entry) =
            parse(&line).with_context(|| format!("Failed to parse line {} in {}", line_num + 1, label))?
        {
            entries.push(entry);
        }
    }

    Ok(entries)
}
