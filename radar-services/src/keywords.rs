//! Keyword rule file loading
//!
//! Groups are separated by blank lines. Within a group, `+term` is a required
//! term, `!term` a global filter term and any other line a normal term.

use std::path::Path;

use tracing::{debug, info};

use radar_core::{KeywordGroup, KeywordRules, RadarError};

#[derive(Debug, thiserror::Error)]
pub enum KeywordFileError {
    #[error("Failed to read keyword file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl From<KeywordFileError> for RadarError {
    fn from(err: KeywordFileError) -> Self {
        RadarError::config(err.to_string())
    }
}

/// Parse rule text into ordered groups and filter terms
pub fn parse_keyword_rules(content: &str) -> KeywordRules {
    let mut groups = Vec::new();
    let mut filters = Vec::new();

    for block in split_blocks(content) {
        let mut group = KeywordGroup::default();

        for line in block {
            if let Some(term) = line.strip_prefix('!') {
                push_term(&mut filters, term);
            } else if let Some(term) = line.strip_prefix('+') {
                push_term(&mut group.required, term);
            } else {
                push_term(&mut group.normal, line);
            }
        }

        if !group.is_empty() {
            groups.push(group);
        }
    }

    debug!(
        "Parsed {} keyword groups and {} filter terms",
        groups.len(),
        filters.len()
    );
    KeywordRules::new(groups, filters)
}

/// Load rules from disk. A missing file means no rules.
pub fn load_keyword_rules(path: impl AsRef<Path>) -> Result<KeywordRules, KeywordFileError> {
    let path = path.as_ref();
    if !path.exists() {
        info!(
            "Keyword file {} not found, every item goes to the catch-all group",
            path.display()
        );
        return Ok(KeywordRules::default());
    }

    let content = std::fs::read_to_string(path).map_err(|source| KeywordFileError::Io {
        path: path.display().to_string(),
        source,
    })?;
    Ok(parse_keyword_rules(&content))
}

/// Split into blocks of trimmed, non-empty lines separated by blank lines
fn split_blocks(content: &str) -> Vec<Vec<&str>> {
    let mut blocks = Vec::new();
    let mut current = Vec::new();

    for line in content.lines().map(str::trim) {
        if line.is_empty() {
            if !current.is_empty() {
                blocks.push(std::mem::take(&mut current));
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        blocks.push(current);
    }

    blocks
}

fn push_term(terms: &mut Vec<String>, term: &str) {
    let term = term.trim();
    if !term.is_empty() {
        terms.push(term.to_string());
    }
}
