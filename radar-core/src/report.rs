//! Report structures consumed by renderers and delivery channels

use serde::{Deserialize, Serialize};
use std::fmt;

/// Display name of the reserved fallback ("discovery") group
pub const FALLBACK_GROUP_KEY: &str = "Random picks";

/// Display name of the synthetic group used when no rules are configured
pub const ALL_ITEMS_GROUP_KEY: &str = "All items";

/// Which slice of the day's data a report covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportMode {
    /// Everything merged so far today
    #[default]
    Daily,
    /// Only items present in the latest snapshot
    Current,
    /// Only items new in the latest snapshot
    Incremental,
}

impl ReportMode {
    /// Parse from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "daily" => Some(ReportMode::Daily),
            "current" => Some(ReportMode::Current),
            "incremental" => Some(ReportMode::Incremental),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ReportMode::Daily => "daily",
            ReportMode::Current => "current",
            ReportMode::Incremental => "incremental",
        }
    }

    /// Mode of the summary report generated alongside a realtime one, if any
    pub fn summary_mode(&self) -> Option<ReportMode> {
        match self {
            ReportMode::Daily => None,
            ReportMode::Current => Some(ReportMode::Current),
            ReportMode::Incremental => Some(ReportMode::Daily),
        }
    }
}

impl fmt::Display for ReportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Identifies a report group
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "name", rename_all = "snake_case")]
pub enum GroupKey {
    /// A configured keyword group, named by its display key
    Topic(String),
    /// Synthetic catch-all used when no groups are configured
    AllItems,
    /// Reserved random-sample pool; always rendered last
    Fallback,
}

impl GroupKey {
    pub fn is_fallback(&self) -> bool {
        matches!(self, GroupKey::Fallback)
    }

    pub fn display_name(&self) -> &str {
        match self {
            GroupKey::Topic(name) => name,
            GroupKey::AllItems => ALL_ITEMS_GROUP_KEY,
            GroupKey::Fallback => FALLBACK_GROUP_KEY,
        }
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// One item as emitted in a report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportEntry {
    pub title: String,
    pub source_id: String,
    pub source_name: String,
    pub score: f64,
    /// Observed ranks, ascending
    pub ranks: Vec<u32>,
    /// Hot threshold in force when the entry was built, for highlighting
    pub rank_threshold: u32,
    pub time_span: String,
    pub occurrences: u32,
    pub url: String,
    pub mobile_url: String,
    pub is_new: bool,
}

impl ReportEntry {
    pub fn min_rank(&self) -> Option<u32> {
        self.ranks.first().copied()
    }

    /// "[3]" or "[1 - 8]"; empty when no rank was observed
    pub fn rank_range(&self) -> String {
        match (self.ranks.first(), self.ranks.last()) {
            (Some(min), Some(max)) if min == max => format!("[{}]", min),
            (Some(min), Some(max)) => format!("[{} - {}]", min, max),
            _ => String::new(),
        }
    }

    /// Whether the best rank reached the hot threshold
    pub fn is_hot(&self) -> bool {
        self.min_rank().is_some_and(|r| r <= self.rank_threshold)
    }

    pub fn link(&self) -> Option<&str> {
        [self.url.as_str(), self.mobile_url.as_str()]
            .into_iter()
            .find(|u| !u.is_empty())
    }
}

/// A bucket of entries sharing a group key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportGroup {
    pub key: GroupKey,
    /// Items matched before per-source capping
    pub total_count: usize,
    pub entries: Vec<ReportEntry>,
}

/// Keyword-matching new items of one source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewItemSection {
    pub source_id: String,
    pub source_name: String,
    pub entries: Vec<ReportEntry>,
}

/// Final output of one report-generation pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub mode: ReportMode,
    /// Label of the latest snapshot the report was built from
    pub snapshot_label: String,
    /// Topical groups by descending count, fallback pool last
    pub groups: Vec<ReportGroup>,
    /// New items that pass the keyword rules, per source
    pub new_items: Vec<NewItemSection>,
    /// Raw items considered before classification
    pub total_items: usize,
    /// Sources that failed upstream, passed through unchanged
    pub failed_ids: Vec<String>,
}

impl Report {
    pub fn empty(mode: ReportMode) -> Self {
        Self {
            mode,
            snapshot_label: String::new(),
            groups: Vec::new(),
            new_items: Vec::new(),
            total_items: 0,
            failed_ids: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty() && self.new_items.is_empty()
    }

    pub fn group(&self, key: &GroupKey) -> Option<&ReportGroup> {
        self.groups.iter().find(|g| &g.key == key)
    }

    pub fn new_item_count(&self) -> usize {
        self.new_items.iter().map(|s| s.entries.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(ranks: &[u32]) -> ReportEntry {
        ReportEntry {
            title: "t".to_string(),
            source_id: "s".to_string(),
            source_name: "S".to_string(),
            score: 0.0,
            ranks: ranks.to_vec(),
            rank_threshold: 5,
            time_span: String::new(),
            occurrences: 1,
            url: String::new(),
            mobile_url: String::new(),
            is_new: false,
        }
    }

    #[test]
    fn test_mode_parsing() {
        assert_eq!(ReportMode::from_str("daily"), Some(ReportMode::Daily));
        assert_eq!(ReportMode::from_str(" Current "), Some(ReportMode::Current));
        assert_eq!(ReportMode::from_str("incremental"), Some(ReportMode::Incremental));
        assert_eq!(ReportMode::from_str("weekly"), None);
    }

    #[test]
    fn test_summary_mode() {
        assert_eq!(ReportMode::Daily.summary_mode(), None);
        assert_eq!(ReportMode::Incremental.summary_mode(), Some(ReportMode::Daily));
        assert_eq!(ReportMode::Current.summary_mode(), Some(ReportMode::Current));
    }

    #[test]
    fn test_rank_range_and_hotness() {
        assert_eq!(entry(&[3]).rank_range(), "[3]");
        assert_eq!(entry(&[1, 4, 8]).rank_range(), "[1 - 8]");
        assert_eq!(entry(&[]).rank_range(), "");
        assert!(entry(&[5, 9]).is_hot());
        assert!(!entry(&[6]).is_hot());
        assert!(!entry(&[]).is_hot());
    }

    #[test]
    fn test_group_key_display() {
        assert_eq!(GroupKey::Topic("AI".to_string()).to_string(), "AI");
        assert_eq!(GroupKey::Fallback.to_string(), FALLBACK_GROUP_KEY);
        assert!(GroupKey::Fallback.is_fallback());
        assert!(!GroupKey::AllItems.is_fallback());
    }
}
