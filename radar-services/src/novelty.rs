//! Novelty Detector
//!
//! An item is new when it appears in the latest snapshot of the day but in
//! none of the earlier ones. Novelty is relative to the day's own history.

use std::collections::HashSet;

use indexmap::IndexSet;
use tracing::debug;

use radar_core::{normalize_title, ItemKey, Snapshot};

/// Items first observed in the latest snapshot, in that snapshot's order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoveltySet {
    keys: IndexSet<ItemKey>,
}

impl NoveltySet {
    pub fn contains(&self, source_id: &str, title: &str) -> bool {
        self.keys.contains(&ItemKey::new(source_id, title))
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ItemKey> {
        self.keys.iter()
    }

    /// New titles of a single source
    pub fn titles_for<'a>(&'a self, source_id: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.keys
            .iter()
            .filter(move |k| k.source_id == source_id)
            .map(|k| k.title.as_str())
    }
}

/// Diff the last snapshot against the union of all earlier ones.
///
/// Fewer than two snapshots means there is nothing to diff against and the
/// result is empty.
pub fn detect_new_items(snapshots: &[Snapshot], allowed: Option<&[String]>) -> NoveltySet {
    let Some((latest, earlier)) = snapshots.split_last() else {
        return NoveltySet::default();
    };
    if earlier.is_empty() {
        return NoveltySet::default();
    }

    let is_allowed =
        |source_id: &str| allowed.map_or(true, |ids| ids.iter().any(|id| id == source_id));

    let history: HashSet<ItemKey> = earlier
        .iter()
        .flat_map(|snapshot| snapshot.sources.iter())
        .filter(|s| is_allowed(&s.source.id))
        .flat_map(|s| {
            s.titles()
                .map(move |title| ItemKey::new(s.source.id.clone(), title))
        })
        .collect();

    let keys: IndexSet<ItemKey> = latest
        .sources
        .iter()
        .filter(|s| is_allowed(&s.source.id))
        .flat_map(|s| {
            s.entries
                .iter()
                .map(move |e| ItemKey::new(s.source.id.clone(), normalize_title(&e.title)))
        })
        .filter(|key| !key.title.is_empty() && !history.contains(key))
        .collect();

    debug!(
        "Detected {} new items in {} against {} earlier snapshots",
        keys.len(),
        latest.label(),
        earlier.len()
    );

    NoveltySet { keys }
}
