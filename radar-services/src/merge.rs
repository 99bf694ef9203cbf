//! Rank Merger
//!
//! Folds a day's snapshots (oldest first) into one deduplicated view per
//! source. Each title keeps the union of its observed ranks, the first
//! non-empty URLs ever recorded, first/last sighting labels and the number
//! of snapshots it appeared in.

use std::collections::{BTreeSet, HashSet};

use indexmap::IndexMap;
use tracing::debug;

use radar_core::{normalize_title, Item, ItemKey, Snapshot, Source, SourceSnapshot};

/// Merged items of one source, in first-seen order
#[derive(Debug, Clone)]
pub struct SourceItems {
    pub source: Source,
    pub items: IndexMap<String, Item>,
}

impl SourceItems {
    fn new(source: Source) -> Self {
        Self {
            source,
            items: IndexMap::new(),
        }
    }

    pub fn get(&self, title: &str) -> Option<&Item> {
        self.items.get(title)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// The day's deduplicated cross-snapshot view
#[derive(Debug, Clone, Default)]
pub struct MergedView {
    sources: IndexMap<String, SourceItems>,
    latest_label: Option<String>,
    snapshot_count: usize,
    failed_ids: Vec<String>,
}

impl MergedView {
    pub fn source(&self, source_id: &str) -> Option<&SourceItems> {
        self.sources.get(source_id)
    }

    pub fn sources(&self) -> impl Iterator<Item = &SourceItems> {
        self.sources.values()
    }

    pub fn item(&self, key: &ItemKey) -> Option<&Item> {
        self.sources.get(&key.source_id)?.items.get(&key.title)
    }

    /// Distinct items across all sources
    pub fn total_items(&self) -> usize {
        self.sources.values().map(SourceItems::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total_items() == 0
    }

    /// Label of the most recent merged snapshot
    pub fn latest_label(&self) -> Option<&str> {
        self.latest_label.as_deref()
    }

    /// Number of distinct snapshots merged
    pub fn snapshot_count(&self) -> usize {
        self.snapshot_count
    }

    /// Failed source ids reported by the most recent snapshot
    pub fn failed_ids(&self) -> &[String] {
        &self.failed_ids
    }
}

/// Per-title accumulation within a single snapshot
struct Sighting {
    ranks: BTreeSet<u32>,
    url: String,
    mobile_url: String,
}

/// Incremental merger over one day's snapshots
#[derive(Debug, Default)]
pub struct RankMerger {
    allowed: Option<HashSet<String>>,
    seen_fingerprints: HashSet<String>,
    view: MergedView,
}

impl RankMerger {
    /// Create a merger. `allowed` restricts merging to the given source ids.
    pub fn new(allowed: Option<&[String]>) -> Self {
        Self {
            allowed: allowed.map(|ids| ids.iter().cloned().collect()),
            ..Default::default()
        }
    }

    fn is_allowed(&self, source_id: &str) -> bool {
        self.allowed
            .as_ref()
            .map_or(true, |allowed| allowed.contains(source_id))
    }

    /// Merge the next snapshot (chronological order is the caller's contract).
    ///
    /// Returns `false` when an identical snapshot was already merged, in
    /// which case nothing changes.
    pub fn merge(&mut self, snapshot: &Snapshot) -> bool {
        if !self.seen_fingerprints.insert(snapshot.fingerprint()) {
            debug!("Skipping duplicate snapshot {}", snapshot.label());
            return false;
        }

        let label = snapshot.label();
        for source_snapshot in &snapshot.sources {
            if !self.is_allowed(&source_snapshot.source.id) {
                continue;
            }
            self.merge_source(source_snapshot, &label);
        }

        self.view.latest_label = Some(label);
        self.view.snapshot_count += 1;
        self.view.failed_ids = snapshot.failed_ids.clone();
        true
    }

    fn merge_source(&mut self, source_snapshot: &SourceSnapshot, label: &str) {
        let source = &source_snapshot.source;
        let entry = self
            .view
            .sources
            .entry(source.id.clone())
            .or_insert_with(|| SourceItems::new(source.clone()));
        // Latest configured name wins
        entry.source.name = source.name.clone();

        for (title, sighting) in collapse_entries(source_snapshot) {
            match entry.items.get_mut(&title) {
                Some(item) => {
                    item.ranks.extend(sighting.ranks);
                    if item.url.is_empty() {
                        item.url = sighting.url;
                    }
                    if item.mobile_url.is_empty() {
                        item.mobile_url = sighting.mobile_url;
                    }
                    item.last_seen = label.to_string();
                    item.occurrences += 1;
                }
                None => {
                    entry.items.insert(
                        title.clone(),
                        Item {
                            title,
                            ranks: sighting.ranks,
                            url: sighting.url,
                            mobile_url: sighting.mobile_url,
                            first_seen: label.to_string(),
                            last_seen: label.to_string(),
                            occurrences: 1,
                        },
                    );
                }
            }
        }
    }

    pub fn finish(self) -> MergedView {
        self.view
    }
}

/// Group one source's entries by normalized title, collapsing repeated ranks
fn collapse_entries(source_snapshot: &SourceSnapshot) -> IndexMap<String, Sighting> {
    let mut sightings: IndexMap<String, Sighting> = IndexMap::new();

    for entry in &source_snapshot.entries {
        let title = normalize_title(&entry.title);
        if title.is_empty() {
            debug!(
                "Dropping entry with empty title from {} at rank {}",
                source_snapshot.source.id, entry.rank
            );
            continue;
        }

        let sighting = sightings.entry(title).or_insert_with(|| Sighting {
            ranks: BTreeSet::new(),
            url: String::new(),
            mobile_url: String::new(),
        });
        sighting.ranks.insert(entry.rank);
        if sighting.url.is_empty() {
            sighting.url = entry.url.clone();
        }
        if sighting.mobile_url.is_empty() {
            sighting.mobile_url = entry.mobile_url.clone();
        }
    }

    sightings
}

/// Merge an ordered list of snapshots in one go
pub fn merge_snapshots(snapshots: &[Snapshot], allowed: Option<&[String]>) -> MergedView {
    let mut merger = RankMerger::new(allowed);
    for snapshot in snapshots {
        merger.merge(snapshot);
    }
    merger.finish()
}
