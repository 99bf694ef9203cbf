//! Selection & Capping
//!
//! Bounds each group to a few items per source, orders entries by score, and
//! draws the fallback pool as a random sample from sources that matched
//! nothing.

use std::cmp::Ordering;

use indexmap::IndexMap;
use rand::Rng;
use serde::{Deserialize, Serialize};

use radar_core::{ReportEntry, ReportGroup};

/// Configuration for selection and capping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionConfig {
    /// Entries kept per source within one group; `None` or `Some(0)` keeps all
    #[serde(default = "default_per_source_cap")]
    pub per_source_cap: Option<usize>,
    /// Total size of the fallback pool across all sources
    #[serde(default = "default_fallback_cap")]
    pub fallback_cap: usize,
    /// Whether sources without matches feed the fallback pool at all
    #[serde(default = "default_fallback_enabled")]
    pub fallback_enabled: bool,
}

fn default_per_source_cap() -> Option<usize> {
    Some(3)
}

fn default_fallback_cap() -> usize {
    35
}

fn default_fallback_enabled() -> bool {
    true
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            per_source_cap: default_per_source_cap(),
            fallback_cap: default_fallback_cap(),
            fallback_enabled: default_fallback_enabled(),
        }
    }
}

/// Score descending, best rank ascending, occurrences descending
pub fn entry_order(a: &ReportEntry, b: &ReportEntry) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| {
            let a_rank = a.min_rank().unwrap_or(u32::MAX);
            let b_rank = b.min_rank().unwrap_or(u32::MAX);
            a_rank.cmp(&b_rank)
        })
        .then_with(|| b.occurrences.cmp(&a.occurrences))
}

/// Keep the top entries of each source, then order the union
pub fn cap_group(
    by_source: IndexMap<String, Vec<ReportEntry>>,
    per_source_cap: Option<usize>,
) -> Vec<ReportEntry> {
    let mut kept = Vec::new();

    for (_, mut entries) in by_source {
        entries.sort_by(entry_order);
        if let Some(cap) = per_source_cap.filter(|cap| *cap > 0) {
            entries.truncate(cap);
        }
        kept.extend(entries);
    }

    kept.sort_by(entry_order);
    kept
}

/// Draw up to `cap` distinct candidates, ordered by best rank
pub fn sample_fallback<R: Rng + ?Sized>(
    candidates: Vec<ReportEntry>,
    cap: usize,
    rng: &mut R,
) -> Vec<ReportEntry> {
    let amount = cap.min(candidates.len());
    if amount == 0 {
        return Vec::new();
    }

    let mut picked: Vec<Option<ReportEntry>> = candidates.into_iter().map(Some).collect();
    let mut sample: Vec<ReportEntry> = rand::seq::index::sample(rng, picked.len(), amount)
        .into_iter()
        .filter_map(|index| picked[index].take())
        .collect();

    sample.sort_by_key(|entry| entry.min_rank().unwrap_or(u32::MAX));
    sample
}

/// Topical groups by descending count (ties keep rule order), fallback last
pub fn order_groups(groups: Vec<ReportGroup>) -> Vec<ReportGroup> {
    let (mut ordered, fallback): (Vec<_>, Vec<_>) =
        groups.into_iter().partition(|g| !g.key.is_fallback());

    ordered.sort_by(|a, b| b.total_count.cmp(&a.total_count));
    ordered.extend(fallback.into_iter().filter(|g| !g.entries.is_empty()));
    ordered
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use radar_core::GroupKey;
    use std::collections::HashSet;

    fn entry(source: &str, title: &str, score: f64, rank: u32, occurrences: u32) -> ReportEntry {
        ReportEntry {
            title: title.to_string(),
            source_id: source.to_string(),
            source_name: source.to_string(),
            score,
            ranks: vec![rank],
            rank_threshold: 5,
            time_span: String::new(),
            occurrences,
            url: String::new(),
            mobile_url: String::new(),
            is_new: false,
        }
    }

    fn group(key: GroupKey, count: usize) -> ReportGroup {
        ReportGroup {
            key,
            total_count: count,
            entries: vec![entry("s", "t", 1.0, 1, 1)],
        }
    }

    #[test]
    fn test_entry_order_tie_breaks() {
        let mut entries = vec![
            entry("s", "low", 1.0, 1, 1),
            entry("s", "worse-rank", 5.0, 4, 9),
            entry("s", "fewer", 5.0, 2, 1),
            entry("s", "more", 5.0, 2, 3),
        ];
        entries.sort_by(entry_order);

        let titles: Vec<_> = entries.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["more", "fewer", "worse-rank", "low"]);
    }

    #[test]
    fn test_per_source_cap() {
        let mut by_source = IndexMap::new();
        by_source.insert(
            "noisy".to_string(),
            (1..=10)
                .map(|i| entry("noisy", &format!("n{}", i), f64::from(i), i, 1))
                .collect(),
        );
        by_source.insert("quiet".to_string(), vec![entry("quiet", "q", 4.5, 1, 1)]);

        let kept = cap_group(by_source, Some(3));

        assert_eq!(kept.iter().filter(|e| e.source_id == "noisy").count(), 3);
        let titles: Vec<_> = kept.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["n10", "n9", "n8", "q"]);
    }

    #[test]
    fn test_uncapped_keeps_everything() {
        let mut by_source = IndexMap::new();
        by_source.insert(
            "s".to_string(),
            (1..=10).map(|i| entry("s", &i.to_string(), 1.0, i, 1)).collect(),
        );
        assert_eq!(cap_group(by_source.clone(), None).len(), 10);
        assert_eq!(cap_group(by_source, Some(0)).len(), 10);
    }

    #[test]
    fn test_fallback_sample_is_capped_and_distinct() {
        let candidates: Vec<_> = (1..=50)
            .map(|i| entry("s", &format!("t{}", i), 0.0, i, 1))
            .collect();
        let mut rng = StdRng::seed_from_u64(7);

        let sample = sample_fallback(candidates, 35, &mut rng);

        assert_eq!(sample.len(), 35);
        let distinct: HashSet<_> = sample.iter().map(|e| e.title.clone()).collect();
        assert_eq!(distinct.len(), 35);
        assert!(sample.windows(2).all(|w| w[0].min_rank() <= w[1].min_rank()));
    }

    #[test]
    fn test_fallback_sample_smaller_pool() {
        let candidates = vec![entry("s", "a", 0.0, 2, 1), entry("s", "b", 0.0, 1, 1)];
        let mut rng = StdRng::seed_from_u64(1);

        let sample = sample_fallback(candidates, 35, &mut rng);
        let titles: Vec<_> = sample.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["b", "a"]);
    }

    #[test]
    fn test_fallback_sample_is_reproducible() {
        let candidates: Vec<_> = (1..=20)
            .map(|i| entry("s", &format!("t{}", i), 0.0, i, 1))
            .collect();

        let first = sample_fallback(candidates.clone(), 5, &mut StdRng::seed_from_u64(42));
        let second = sample_fallback(candidates, 5, &mut StdRng::seed_from_u64(42));
        assert_eq!(first, second);
    }

    #[test]
    fn test_zero_cap_yields_empty_pool() {
        let candidates = vec![entry("s", "a", 0.0, 1, 1)];
        assert!(sample_fallback(candidates, 0, &mut StdRng::seed_from_u64(1)).is_empty());
    }

    #[test]
    fn test_fallback_group_always_last() {
        let groups = vec![
            group(GroupKey::Fallback, 30),
            group(GroupKey::Topic("small".to_string()), 2),
            group(GroupKey::Topic("big".to_string()), 9),
            group(GroupKey::Topic("tie".to_string()), 2),
        ];

        let ordered = order_groups(groups);
        let keys: Vec<_> = ordered.iter().map(|g| g.key.to_string()).collect();
        assert_eq!(
            keys,
            vec!["big".to_string(), "small".to_string(), "tie".to_string(), GroupKey::Fallback.to_string()]
        );
    }

    #[test]
    fn test_config_from_json_defaults() {
        let config: SelectionConfig = serde_json::from_str(r#"{"fallback_cap": 10}"#).unwrap();
        assert_eq!(config.per_source_cap, Some(3));
        assert_eq!(config.fallback_cap, 10);
        assert!(config.fallback_enabled);

        let uncapped: SelectionConfig =
            serde_json::from_str(r#"{"per_source_cap": null}"#).unwrap();
        assert_eq!(uncapped.per_source_cap, None);
    }
}
