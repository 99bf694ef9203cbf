//! Keyword rule definitions

use serde::{Deserialize, Serialize};

/// A named classification rule.
///
/// All `required` terms must appear in a title; when `normal` is non-empty at
/// least one of its terms must appear too. Matching is a case-insensitive
/// substring test.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordGroup {
    #[serde(default)]
    pub required: Vec<String>,
    #[serde(default)]
    pub normal: Vec<String>,
}

impl KeywordGroup {
    pub fn new<S: Into<String>>(
        required: impl IntoIterator<Item = S>,
        normal: impl IntoIterator<Item = S>,
    ) -> Self {
        Self {
            required: required.into_iter().map(Into::into).collect(),
            normal: normal.into_iter().map(Into::into).collect(),
        }
    }

    /// Group with only normal terms
    pub fn any_of<S: Into<String>>(normal: impl IntoIterator<Item = S>) -> Self {
        Self {
            required: Vec::new(),
            normal: normal.into_iter().map(Into::into).collect(),
        }
    }

    /// Display key: non-blank normal terms if present, else required terms
    pub fn key(&self) -> String {
        let join = |terms: &[String]| {
            terms
                .iter()
                .map(|t| t.trim())
                .filter(|t| !t.is_empty())
                .collect::<Vec<_>>()
                .join(" ")
        };
        let normal = join(&self.normal);
        if normal.is_empty() {
            join(&self.required)
        } else {
            normal
        }
    }

    /// A rule with no terms at all
    pub fn is_empty(&self) -> bool {
        self.required.is_empty() && self.normal.is_empty()
    }
}

/// Ordered groups plus global filter terms
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordRules {
    /// Evaluated in order; the first matching group claims an item
    #[serde(default)]
    pub groups: Vec<KeywordGroup>,
    /// Any title containing one of these is excluded outright
    #[serde(default)]
    pub filters: Vec<String>,
}

impl KeywordRules {
    pub fn new(groups: Vec<KeywordGroup>, filters: Vec<String>) -> Self {
        Self { groups, filters }
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty() && self.filters.is_empty()
    }
}
