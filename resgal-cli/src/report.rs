//! Failure publishing.
//!
//! A failed command is logged at `error` and appended as one JSON line to
//! `~/.resgal/logs/failures.jsonl`, so scheduled runs that abort part way
//! are visible to an operator after the fact.
//!
//! The file is rotated when it exceeds 1 MiB, keeping 3 copies:
//!   failures.jsonl → failures.jsonl.1 → failures.jsonl.2 → failures.jsonl.3

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;

use resgal_core::config::resgal_root;

/// Maximum failure log size before rotation (1 MiB).
pub const MAX_LOG_BYTES: u64 = 1024 * 1024;

/// Maximum number of rotated copies to keep.
pub const MAX_ROTATED_FILES: usize = 3;

/// One published failure.
#[derive(Debug, Serialize)]
pub struct FailureRecord<'a> {
    pub at: DateTime<Utc>,
    pub command: &'a str,
    pub error: String,
    /// Causes, outermost first, excluding `error` itself.
    pub chain: Vec<String>,
}

impl<'a> FailureRecord<'a> {
    pub fn new(command: &'a str, err: &anyhow::Error) -> Self {
        Self {
            at: Utc::now(),
            command,
            error: err.to_string(),
            chain: err.chain().skip(1).map(|c| c.to_string()).collect(),
        }
    }
}

/// `<home>/.resgal/logs/failures.jsonl`
pub fn failure_log_path(home: &Path) -> PathBuf {
    resgal_root(home).join("logs").join("failures.jsonl")
}

/// Log `err` and record it under the user's home directory.
///
/// Recording is best effort: a failure to write the log is itself only logged.
pub fn publish(command: &str, err: &anyhow::Error) {
    tracing::error!("{command} failed: {err:#}");
    let Some(home) = dirs::home_dir() else {
        tracing::warn!("cannot determine home directory; failure not recorded");
        return;
    };
    if let Err(io_err) = publish_at(&home, &FailureRecord::new(command, err)) {
        tracing::warn!("could not record failure: {io_err}");
    }
}

/// Append `record` to the failure log under `home`, rotating first if needed.
pub fn publish_at(home: &Path, record: &FailureRecord<'_>) -> io::Result<()> {
    let path = failure_log_path(home);
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    if rotate_if_needed(&path, MAX_LOG_BYTES, MAX_ROTATED_FILES)? {
        tracing::info!("failure log rotated: {}", path.display());
    }

    let line = serde_json::to_string(record).map_err(io::Error::other)?;
    let mut file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)?;
    writeln!(file, "{line}")?;
    Ok(())
}

/// Rotate `log_path` if its size reaches `max_bytes`.
///
/// Rotation sequence (oldest first):
///   `<name>.<max_files>` deleted
///   `<name>.<n>` → `<name>.<n+1>` for n = max_files-1 … 1
///   `<name>` → `<name>.1`
///
/// Returns `true` if rotation occurred. Missing files are not an error.
pub fn rotate_if_needed(log_path: &Path, max_bytes: u64, max_files: usize) -> io::Result<bool> {
    let size = match fs::metadata(log_path) {
        Ok(meta) => meta.len(),
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(false),
        Err(err) => return Err(err),
    };

    if size < max_bytes {
        return Ok(false);
    }

    let oldest = numbered_path(log_path, max_files);
    if oldest.exists() {
        fs::remove_file(&oldest)?;
    }

    for n in (1..max_files).rev() {
        let src = numbered_path(log_path, n);
        if src.exists() {
            fs::rename(&src, numbered_path(log_path, n + 1))?;
        }
    }

    fs::rename(log_path, numbered_path(log_path, 1))?;
    Ok(true)
}

/// The `n`-th rotated copy of `base` (e.g. `failures.jsonl.2`).
fn numbered_path(base: &Path, n: usize) -> PathBuf {
    let name = base
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("failures.jsonl");
    base.with_file_name(format!("{name}.{n}"))
}
