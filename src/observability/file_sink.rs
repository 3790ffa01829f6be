//! Rotating file sink.
//!
//! # Layout
//! ```text
//! logs/
//!   info-2024-01-31.log      active file for (INFO, 2024-01-31)
//!   info-2024-01-31.1.log    newest backup
//!   info-2024-01-31.5.log    oldest retained backup
//! ```
//!
//! # Rotation
//! After every append the active file is stat'ed. Once it exceeds
//! `max_file_size`, backups shift up one slot (the last slot is
//! overwritten) and the active file becomes slot 1. The next write
//! recreates the active file.
//!
//! # Design Decisions
//! - Append and rotate run under one mutex per file path, so concurrent
//!   requests never interleave partial lines or rotate twice
//! - Files are opened, appended and closed on every write; nothing is
//!   buffered across calls
//! - Errors stay `Result`s until `record`, which reports and drops them
//! - Locks for days before yesterday are dropped the first time a newer
//!   day is written, so the lock map stays bounded

use chrono::NaiveDate;
use dashmap::DashMap;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::config::LoggingConfig;
use crate::observability::entry::LogEntry;
use crate::observability::severity::Severity;
use crate::observability::sink::{LogSink, SinkError};

/// Sink writing one file per (severity, day) with size-based rotation.
#[derive(Debug)]
pub struct FileSink {
    dir: PathBuf,
    max_file_size: u64,
    max_files: u32,
    locks: DashMap<PathBuf, Arc<Mutex<()>>>,
    newest_day: Mutex<Option<NaiveDate>>,
}

impl FileSink {
    /// Create the sink and make sure its directory exists.
    pub fn new(config: &LoggingConfig) -> Self {
        let sink = Self {
            dir: config.directory.clone(),
            max_file_size: config.max_file_size,
            max_files: config.max_files,
            locks: DashMap::new(),
            newest_day: Mutex::new(None),
        };
        if let Err(e) = sink.ensure_dir() {
            report(&e);
        }
        sink
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Active file for a severity on a given day.
    pub fn file_path(&self, severity: Severity, date: NaiveDate) -> PathBuf {
        self.dir
            .join(format!("{}-{}.log", severity.file_stem(), date.format("%Y-%m-%d")))
    }

    /// Backup slot `slot` of an active file (`info-2024-01-31.3.log`).
    pub fn backup_path(active: &Path, slot: u32) -> PathBuf {
        let stem = active
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let name = match active.extension() {
            Some(ext) => format!("{}.{}.{}", stem, slot, ext.to_string_lossy()),
            None => format!("{}.{}", stem, slot),
        };
        active.with_file_name(name)
    }

    /// Rotate `path` if it exceeds the size threshold.
    ///
    /// Returns whether a rotation happened.
    pub fn rotate(&self, path: &Path) -> Result<bool, SinkError> {
        let lock = self.lock_for(path);
        let _guard = lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        self.rotate_locked(path)
    }

    fn ensure_dir(&self) -> Result<(), SinkError> {
        fs::create_dir_all(&self.dir).map_err(|source| SinkError::CreateDir {
            path: self.dir.clone(),
            source,
        })
    }

    fn lock_for(&self, path: &Path) -> Arc<Mutex<()>> {
        // Clone the Arc out so the map shard is released before locking.
        Arc::clone(&self.locks.entry(path.to_path_buf()).or_default())
    }

    /// Forget the locks of days older than yesterday once `day` is newer
    /// than every day seen so far. Yesterday is kept for entries stamped
    /// just before midnight.
    fn prune_locks(&self, day: NaiveDate) {
        let mut newest = self
            .newest_day
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if newest.is_some_and(|seen| seen >= day) {
            return;
        }
        *newest = Some(day);

        let kept: Vec<String> = [Some(day), day.pred_opt()]
            .into_iter()
            .flatten()
            .map(|d| format!("-{}.log", d.format("%Y-%m-%d")))
            .collect();
        self.locks.retain(|path, _| {
            path.file_name()
                .map(|name| name.to_string_lossy())
                .is_some_and(|name| kept.iter().any(|suffix| name.ends_with(suffix.as_str())))
        });
    }

    fn append(&self, entry: &LogEntry) -> Result<(), SinkError> {
        self.ensure_dir()?;

        let day = entry.timestamp.date_naive();
        self.prune_locks(day);
        let path = self.file_path(entry.severity, day);
        let lock = self.lock_for(&path);
        let _guard = lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner());

        let write_err = |source| SinkError::Write {
            path: path.clone(),
            source,
        };
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(write_err)?;
        file.write_all(entry.file_line().as_bytes())
            .map_err(write_err)?;
        drop(file);

        self.rotate_locked(&path)?;
        Ok(())
    }

    fn rotate_locked(&self, path: &Path) -> Result<bool, SinkError> {
        let rotate_err = |source| SinkError::Rotate {
            path: path.to_path_buf(),
            source,
        };

        let size = fs::metadata(path).map_err(rotate_err)?.len();
        if size <= self.max_file_size {
            return Ok(false);
        }

        for slot in (1..self.max_files).rev() {
            let older = Self::backup_path(path, slot);
            if older.exists() {
                fs::rename(&older, Self::backup_path(path, slot + 1)).map_err(rotate_err)?;
            }
        }
        fs::rename(path, Self::backup_path(path, 1)).map_err(rotate_err)?;

        tracing::debug!(path = ?path, size, "Log file rotated");
        Ok(true)
    }
}

impl LogSink for FileSink {
    fn record(&self, entry: &LogEntry) {
        if let Err(e) = self.append(entry) {
            report(&e);
        }
    }
}

/// Fallback channel for sink failures: console only, never the sink.
fn report(err: &SinkError) {
    tracing::error!(target: "order_service::fallback", error = %err, "Log sink failure");
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn config(dir: &Path, max_file_size: u64, max_files: u32) -> LoggingConfig {
        LoggingConfig {
            directory: dir.to_path_buf(),
            max_file_size,
            max_files,
            ..LoggingConfig::default()
        }
    }

    fn entry(message: &str) -> LogEntry {
        entry_on(9, message)
    }

    fn entry_on(day: u32, message: &str) -> LogEntry {
        let mut entry = LogEntry::new(Severity::Warn, message.to_string(), None);
        entry.timestamp = Utc.with_ymd_and_hms(2024, 3, day, 8, 30, 0).unwrap();
        entry
    }

    #[test]
    fn test_file_naming() {
        let dir = tempfile::tempdir().unwrap();
        let sink = FileSink::new(&config(dir.path(), 1024, 5));
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();

        let active = sink.file_path(Severity::Debug, date);
        assert_eq!(active, dir.path().join("debug-2024-03-09.log"));
        assert_eq!(
            FileSink::backup_path(&active, 2),
            dir.path().join("debug-2024-03-09.2.log")
        );
    }

    #[test]
    fn test_creates_nested_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        let sink = FileSink::new(&config(&nested, 1024, 5));
        assert!(nested.is_dir());

        fs::remove_dir_all(&nested).unwrap();
        sink.record(&entry("recreated"));
        assert!(nested.join("warn-2024-03-09.log").exists());
    }

    #[test]
    fn test_rotate_below_threshold_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let sink = FileSink::new(&config(dir.path(), 1024, 5));
        sink.record(&entry("small"));

        let active = dir.path().join("warn-2024-03-09.log");
        assert!(!sink.rotate(&active).unwrap());
        assert!(active.exists());
    }

    #[test]
    fn test_write_failure_is_swallowed() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        fs::write(&blocker, "file in the way").unwrap();

        let sink = FileSink::new(&config(&blocker, 1024, 5));
        sink.record(&entry("dropped"));
        assert_eq!(fs::read_to_string(&blocker).unwrap(), "file in the way");
    }

    #[test]
    fn test_old_day_locks_are_dropped() {
        let dir = tempfile::tempdir().unwrap();
        let sink = FileSink::new(&config(dir.path(), 1024, 5));

        sink.record(&entry_on(9, "day one"));
        sink.record(&entry_on(10, "day two"));
        assert_eq!(sink.locks.len(), 2);

        sink.record(&entry_on(11, "day three"));
        let mut tracked: Vec<PathBuf> = sink.locks.iter().map(|e| e.key().clone()).collect();
        tracked.sort();
        assert_eq!(
            tracked,
            vec![
                dir.path().join("warn-2024-03-10.log"),
                dir.path().join("warn-2024-03-11.log"),
            ]
        );

        // A late entry for an old day still writes, without pruning newer days.
        sink.record(&entry_on(9, "late"));
        assert_eq!(sink.locks.len(), 3);
        let old = fs::read_to_string(dir.path().join("warn-2024-03-09.log")).unwrap();
        assert!(old.ends_with("late\n"));
    }
}
