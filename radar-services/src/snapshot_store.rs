//! Snapshot Store
//!
//! File-backed history of fetch cycles, one directory per calendar day in
//! the reference timezone:
//!
//! ```text
//! <root>/2025-03-14/txt/09-30.txt      snapshot captured at 09:30
//! <root>/2025-03-14/report/09-30.txt   rendered report of that cycle
//! ```

use std::path::{Path, PathBuf};

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, TimeZone, Timelike, Utc};
use tracing::{debug, info, warn};

use radar_core::{RadarError, Snapshot};

use crate::snapshot_file::{parse_snapshot_text, render_snapshot_text};

const SNAPSHOT_DIR: &str = "txt";
const REPORT_DIR: &str = "report";
const FILE_STEM_FORMAT: &str = "%H-%M";

#[derive(Debug, thiserror::Error)]
pub enum SnapshotStoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Snapshot already exists: {0}")]
    AlreadyExists(String),
}

impl From<SnapshotStoreError> for RadarError {
    fn from(err: SnapshotStoreError) -> Self {
        RadarError::io(err.to_string())
    }
}

/// Day-partitioned snapshot files under a root directory
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    root: PathBuf,
    offset: FixedOffset,
}

impl SnapshotStore {
    pub fn new(root: impl Into<PathBuf>, offset: FixedOffset) -> Self {
        Self {
            root: root.into(),
            offset,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// Current time in the reference timezone, truncated to the minute
    pub fn now(&self) -> DateTime<FixedOffset> {
        let now = Utc::now().with_timezone(&self.offset);
        now.with_second(0)
            .and_then(|t| t.with_nanosecond(0))
            .unwrap_or(now)
    }

    pub fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }

    pub fn day_dir(&self, date: NaiveDate) -> PathBuf {
        self.root.join(date.format("%Y-%m-%d").to_string())
    }

    fn file_name(&self, at: DateTime<FixedOffset>) -> String {
        format!("{}.txt", at.with_timezone(&self.offset).format(FILE_STEM_FORMAT))
    }

    fn local_day(&self, at: DateTime<FixedOffset>) -> NaiveDate {
        at.with_timezone(&self.offset).date_naive()
    }

    pub fn snapshot_path(&self, at: DateTime<FixedOffset>) -> PathBuf {
        self.day_dir(self.local_day(at))
            .join(SNAPSHOT_DIR)
            .join(self.file_name(at))
    }

    pub fn report_path(&self, at: DateTime<FixedOffset>) -> PathBuf {
        self.day_dir(self.local_day(at))
            .join(REPORT_DIR)
            .join(self.file_name(at))
    }

    /// Write a new snapshot file. A capture for the same minute is never
    /// overwritten.
    pub fn append(&self, snapshot: &Snapshot) -> Result<PathBuf, SnapshotStoreError> {
        let path = self.snapshot_path(snapshot.captured_at);
        if path.exists() {
            return Err(SnapshotStoreError::AlreadyExists(path.display().to_string()));
        }
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(&path, render_snapshot_text(snapshot))?;
        info!(
            "Stored snapshot with {} entries at {}",
            snapshot.entry_count(),
            path.display()
        );
        Ok(path)
    }

    /// Write a rendered report next to the day's snapshots
    pub fn write_report(
        &self,
        at: DateTime<FixedOffset>,
        text: &str,
    ) -> Result<PathBuf, SnapshotStoreError> {
        let path = self.report_path(at);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, text)?;
        Ok(path)
    }

    /// Snapshot file times of a day, oldest first
    fn snapshot_times(&self, date: NaiveDate) -> Result<Vec<(NaiveTime, PathBuf)>, SnapshotStoreError> {
        let dir = self.day_dir(date).join(SNAPSHOT_DIR);
        if !dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut times = Vec::new();
        for entry in std::fs::read_dir(&dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("txt") {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            match NaiveTime::parse_from_str(stem, FILE_STEM_FORMAT) {
                Ok(time) => times.push((time, path)),
                Err(_) => debug!("Ignoring file with unexpected name: {}", path.display()),
            }
        }

        times.sort_by_key(|(time, _)| *time);
        Ok(times)
    }

    /// Load all snapshots of a day, oldest first.
    ///
    /// A missing day directory yields an empty list. Unreadable files and
    /// malformed lines are skipped and logged.
    pub fn load_day(&self, date: NaiveDate) -> Result<Vec<Snapshot>, SnapshotStoreError> {
        let mut snapshots = Vec::new();

        for (time, path) in self.snapshot_times(date)? {
            let Some(captured_at) = self.offset.from_local_datetime(&date.and_time(time)).single()
            else {
                continue;
            };

            let text = match std::fs::read_to_string(&path) {
                Ok(text) => text,
                Err(e) => {
                    warn!("Skipping unreadable snapshot {}: {}", path.display(), e);
                    continue;
                }
            };

            let report = parse_snapshot_text(&text, captured_at);
            if !report.dropped.is_empty() {
                for error in &report.dropped {
                    debug!(%error, "Dropped snapshot line in {}", path.display());
                }
                warn!(
                    "Dropped {} malformed lines from {}",
                    report.dropped.len(),
                    path.display()
                );
            }
            snapshots.push(report.snapshot);
        }

        debug!("Loaded {} snapshots for {}", snapshots.len(), date);
        Ok(snapshots)
    }

    pub fn snapshot_count(&self, date: NaiveDate) -> Result<usize, SnapshotStoreError> {
        Ok(self.snapshot_times(date)?.len())
    }

    /// True while the day has at most one snapshot
    pub fn is_first_cycle(&self, date: NaiveDate) -> Result<bool, SnapshotStoreError> {
        Ok(self.snapshot_count(date)? <= 1)
    }
}
