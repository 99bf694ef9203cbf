//! Merged item records

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Identity of an item: (source id, normalized title)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ItemKey {
    pub source_id: String,
    pub title: String,
}

impl ItemKey {
    pub fn new(source_id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            source_id: source_id.into(),
            title: title.into(),
        }
    }
}

/// A title aggregated across the day's snapshots of one source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// Normalized title
    pub title: String,
    /// Every rank the title was observed at today
    pub ranks: BTreeSet<u32>,
    /// First non-empty URL ever recorded
    pub url: String,
    /// First non-empty mobile URL ever recorded
    pub mobile_url: String,
    /// Label of the first snapshot containing the title
    pub first_seen: String,
    /// Label of the latest snapshot containing the title
    pub last_seen: String,
    /// Number of snapshots the title appeared in
    pub occurrences: u32,
}

impl Item {
    pub fn min_rank(&self) -> Option<u32> {
        self.ranks.first().copied()
    }

    pub fn max_rank(&self) -> Option<u32> {
        self.ranks.last().copied()
    }

    /// "09:00" when first and last sighting coincide, "[09:00 ~ 11:30]" otherwise
    pub fn time_span(&self) -> String {
        if self.first_seen == self.last_seen {
            self.first_seen.clone()
        } else {
            format!("[{} ~ {}]", self.first_seen, self.last_seen)
        }
    }

    /// Preferred link: desktop URL, else mobile URL
    pub fn link(&self) -> Option<&str> {
        [self.url.as_str(), self.mobile_url.as_str()]
            .into_iter()
            .find(|u| !u.is_empty())
    }
}
