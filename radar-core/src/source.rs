//! Source definitions for ranked-list feeds

use serde::{Deserialize, Serialize};
use std::fmt;

/// An external ranked-list feed (e.g. a trending board)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Source {
    /// Stable identifier used in snapshots and API requests
    pub id: String,
    /// Human-readable name, defaults to the id
    #[serde(default)]
    pub name: String,
}

impl Source {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        let id = id.into();
        let name = name.into();
        let name = if name.trim().is_empty() { id.clone() } else { name };
        Self { id, name }
    }

    /// Get the display name, falling back to the id when no name was configured
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            &self.id
        } else {
            &self.name
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl std::str::FromStr for Source {
    type Err = String;

    /// Parse `id` or `id|name`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.splitn(2, '|');
        let id = parts.next().unwrap_or_default().trim();
        if id.is_empty() {
            return Err(format!("Empty source id in: {:?}", s));
        }
        let name = parts.next().unwrap_or_default().trim();
        Ok(Source::new(id, name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_source() {
        let source: Source = "weibo|Weibo Hot".parse().unwrap();
        assert_eq!(source.id, "weibo");
        assert_eq!(source.name, "Weibo Hot");

        let bare: Source = "zhihu".parse().unwrap();
        assert_eq!(bare.name, "zhihu");

        assert!("|name".parse::<Source>().is_err());
    }

    #[test]
    fn test_deserialize_without_name() {
        let source: Source = serde_json::from_str(r#"{"id": "toutiao"}"#).unwrap();
        assert_eq!(source.display_name(), "toutiao");
    }
}
