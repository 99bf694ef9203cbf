//! Snapshot data structures
//!
//! A snapshot is one fetch cycle's capture of every configured source's
//! ranked list. Snapshots of the same calendar day (in the reference
//! timezone) form the aggregation window.

use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::Source;

/// Collapse whitespace runs (including newlines) into single spaces and trim.
///
/// Titles must go through this before being used as an identity key.
pub fn normalize_title(title: &str) -> String {
    title.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// One observed (title, rank) pair as delivered by a source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawEntry {
    pub title: String,
    /// 1-based position on the source's list
    pub rank: u32,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub mobile_url: String,
}

impl RawEntry {
    pub fn new(title: impl Into<String>, rank: u32) -> Self {
        Self {
            title: title.into(),
            rank,
            url: String::new(),
            mobile_url: String::new(),
        }
    }

    pub fn with_urls(mut self, url: impl Into<String>, mobile_url: impl Into<String>) -> Self {
        self.url = url.into();
        self.mobile_url = mobile_url.into();
        self
    }
}

/// A single source's list within a snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceSnapshot {
    pub source: Source,
    /// Entries in list order. The same title may appear at several ranks.
    pub entries: Vec<RawEntry>,
}

impl SourceSnapshot {
    pub fn new(source: Source, entries: Vec<RawEntry>) -> Self {
        Self { source, entries }
    }

    /// Normalized titles in list order (repeats when a title holds several ranks)
    pub fn titles(&self) -> impl Iterator<Item = String> + '_ {
        self.entries.iter().map(|e| normalize_title(&e.title))
    }
}

/// Immutable capture of all sources at one fetch cycle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Minute-resolution capture time in the reference timezone
    pub captured_at: DateTime<FixedOffset>,
    pub sources: Vec<SourceSnapshot>,
    /// Source ids that failed upstream during this cycle
    #[serde(default)]
    pub failed_ids: Vec<String>,
}

impl Snapshot {
    pub fn new(captured_at: DateTime<FixedOffset>, sources: Vec<SourceSnapshot>) -> Self {
        Self {
            captured_at,
            sources,
            failed_ids: Vec::new(),
        }
    }

    /// Display label, e.g. "09:30"
    pub fn label(&self) -> String {
        self.captured_at.format("%H:%M").to_string()
    }

    /// Calendar day this snapshot belongs to
    pub fn day(&self) -> NaiveDate {
        self.captured_at.date_naive()
    }

    pub fn source(&self, source_id: &str) -> Option<&SourceSnapshot> {
        self.sources.iter().find(|s| s.source.id == source_id)
    }

    /// Total number of raw entries across all sources
    pub fn entry_count(&self) -> usize {
        self.sources.iter().map(|s| s.entries.len()).sum()
    }

    /// Content hash over the label and every normalized entry.
    ///
    /// Two snapshots with the same fingerprint are the same capture.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.label().as_bytes());
        for source in &self.sources {
            hasher.update(b"\x1e");
            hasher.update(source.source.id.as_bytes());
            for entry in &source.entries {
                hasher.update(b"\x1f");
                hasher.update(normalize_title(&entry.title).as_bytes());
                hasher.update(entry.rank.to_le_bytes());
                hasher.update(entry.url.as_bytes());
                hasher.update(entry.mobile_url.as_bytes());
            }
        }
        hex::encode(&hasher.finalize()[..16])
    }
}
