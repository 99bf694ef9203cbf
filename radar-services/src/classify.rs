//! Keyword Classifier
//!
//! Filter terms are checked first and exclude a title outright. Remaining
//! titles are offered to the groups in configured order and the first group
//! whose rule holds claims the title. With no groups configured a synthetic
//! catch-all group claims every unfiltered title.

use radar_core::{GroupKey, KeywordGroup, KeywordRules};
use tracing::warn;

/// Outcome of classifying a single title
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// Contains a filter term
    Filtered,
    /// Claimed by the group at this index
    Matched(usize),
    /// Passed the filters but no group matched
    Unmatched,
}

impl Classification {
    pub fn group(&self) -> Option<usize> {
        match self {
            Classification::Matched(index) => Some(*index),
            _ => None,
        }
    }
}

/// A rule with its terms lowercased once up front
#[derive(Debug, Clone)]
struct PreparedGroup {
    key: GroupKey,
    required: Vec<String>,
    normal: Vec<String>,
}

impl PreparedGroup {
    /// `None` when the rule has no non-blank term
    fn new(group: &KeywordGroup) -> Option<Self> {
        let required = lowercase_terms(&group.required);
        let normal = lowercase_terms(&group.normal);
        if required.is_empty() && normal.is_empty() {
            return None;
        }

        Some(Self {
            key: GroupKey::Topic(group.key()),
            required,
            normal,
        })
    }

    fn catch_all() -> Self {
        Self {
            key: GroupKey::AllItems,
            required: Vec::new(),
            normal: Vec::new(),
        }
    }

    fn matches(&self, title_lower: &str) -> bool {
        self.required.iter().all(|term| title_lower.contains(term.as_str()))
            && (self.normal.is_empty()
                || self.normal.iter().any(|term| title_lower.contains(term.as_str())))
    }
}

fn lowercase_terms(terms: &[String]) -> Vec<String> {
    terms
        .iter()
        .map(|t| t.trim().to_lowercase())
        .filter(|t| !t.is_empty())
        .collect()
}

/// First-match-wins keyword classifier
#[derive(Debug, Clone)]
pub struct KeywordClassifier {
    groups: Vec<PreparedGroup>,
    filters: Vec<String>,
}

impl KeywordClassifier {
    pub fn new(rules: &KeywordRules) -> Self {
        let mut groups: Vec<PreparedGroup> =
            rules.groups.iter().filter_map(PreparedGroup::new).collect();
        if groups.len() < rules.groups.len() {
            warn!(
                "Ignoring {} keyword groups without usable terms",
                rules.groups.len() - groups.len()
            );
        }
        if groups.is_empty() {
            groups.push(PreparedGroup::catch_all());
        }

        Self {
            groups,
            filters: lowercase_terms(&rules.filters),
        }
    }

    pub fn classify(&self, title: &str) -> Classification {
        let title_lower = title.to_lowercase();

        if self
            .filters
            .iter()
            .any(|term| title_lower.contains(term.as_str()))
        {
            return Classification::Filtered;
        }

        self.groups
            .iter()
            .position(|group| group.matches(&title_lower))
            .map_or(Classification::Unmatched, Classification::Matched)
    }

    /// Whether any group claims the title
    pub fn matches(&self, title: &str) -> bool {
        matches!(self.classify(title), Classification::Matched(_))
    }

    pub fn is_filtered(&self, title: &str) -> bool {
        self.classify(title) == Classification::Filtered
    }

    pub fn group_key(&self, index: usize) -> Option<&GroupKey> {
        self.groups.get(index).map(|g| &g.key)
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Distinct group keys in first-occurrence rule order
    pub fn distinct_keys(&self) -> Vec<&GroupKey> {
        let mut keys: Vec<&GroupKey> = Vec::new();
        for group in &self.groups {
            if !keys.contains(&&group.key) {
                keys.push(&group.key);
            }
        }
        keys
    }
}
