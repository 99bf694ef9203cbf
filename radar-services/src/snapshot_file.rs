//! Snapshot text codec
//!
//! One snapshot is a plain-text file of sections separated by blank lines:
//!
//! ```text
//! tech | Tech News
//! 1. AI breaks record [URL:https://a.example] [MOBILE:https://m.a.example]
//! 2. Weather update
//!
//! ==== FAILED SOURCES ====
//! weibo
//! ```
//!
//! Parsing is best-effort: each entry line parses into a [`RawEntry`] or a
//! [`LineParseError`], and bad lines are collected instead of aborting.

use chrono::{DateTime, FixedOffset};

use radar_core::{normalize_title, RawEntry, Snapshot, Source, SourceSnapshot};

/// Header of the trailing section listing failed source ids
pub const FAILED_SOURCES_HEADER: &str = "==== FAILED SOURCES ====";

const URL_TAG: &str = "URL";
const MOBILE_TAG: &str = "MOBILE";

/// A single entry line that could not be parsed
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LineParseError {
    #[error("line {line_no}: missing rank prefix in {line:?}")]
    MissingRank { line_no: usize, line: String },

    #[error("line {line_no}: invalid rank {rank:?}")]
    InvalidRank { line_no: usize, rank: String },

    #[error("line {line_no}: empty title")]
    EmptyTitle { line_no: usize },
}

/// A parsed snapshot together with the lines that were dropped
#[derive(Debug, Clone)]
pub struct ParseReport {
    pub snapshot: Snapshot,
    pub dropped: Vec<LineParseError>,
}

/// Parse one `<rank>. <title>[ [URL:..]][ [MOBILE:..]]` line
pub fn parse_line(line_no: usize, line: &str) -> Result<RawEntry, LineParseError> {
    let line = line.trim();
    let (rank, rest) = line
        .split_once('.')
        .ok_or_else(|| LineParseError::MissingRank {
            line_no,
            line: line.to_string(),
        })?;

    let rank: u32 = match rank.trim().parse() {
        Ok(rank) if rank > 0 => rank,
        _ => {
            return Err(LineParseError::InvalidRank {
                line_no,
                rank: rank.trim().to_string(),
            })
        }
    };

    // Tags are written in URL, MOBILE order, so peel them off from the end
    let (rest, mobile_url) = strip_tag(rest, MOBILE_TAG);
    let (rest, url) = strip_tag(rest, URL_TAG);

    let title = normalize_title(rest);
    if title.is_empty() {
        return Err(LineParseError::EmptyTitle { line_no });
    }

    Ok(RawEntry {
        title,
        rank,
        url,
        mobile_url,
    })
}

/// Only absolute links are written as tags
fn is_link(value: &str) -> bool {
    value.contains("://")
}

/// Split a trailing ` [TAG:link]` off `text`. A bracketed tag whose value is
/// not a link belongs to the title.
fn strip_tag<'a>(text: &'a str, tag: &str) -> (&'a str, String) {
    let text = text.trim_end();
    let marker = format!("[{}:", tag);

    if let Some(body) = text.strip_suffix(']') {
        if let Some(pos) = body.rfind(&marker) {
            let value = body[pos + marker.len()..].trim();
            if is_link(value) {
                return (&text[..pos], value.to_string());
            }
        }
    }
    (text, String::new())
}

/// Parse a whole snapshot file captured at `captured_at`
pub fn parse_snapshot_text(text: &str, captured_at: DateTime<FixedOffset>) -> ParseReport {
    let mut sources = Vec::new();
    let mut failed_ids = Vec::new();
    let mut dropped = Vec::new();

    for block in split_sections(text) {
        let Some(&(_, header)) = block.first() else {
            continue;
        };

        if header == FAILED_SOURCES_HEADER {
            failed_ids.extend(block[1..].iter().map(|(_, id)| id.to_string()));
            continue;
        }

        let source = parse_header(header);
        let mut entries = Vec::new();
        for &(line_no, line) in &block[1..] {
            match parse_line(line_no, line) {
                Ok(entry) => entries.push(entry),
                Err(e) => dropped.push(e),
            }
        }
        sources.push(SourceSnapshot::new(source, entries));
    }

    let mut snapshot = Snapshot::new(captured_at, sources);
    snapshot.failed_ids = failed_ids;
    ParseReport { snapshot, dropped }
}

fn parse_header(header: &str) -> Source {
    match header.split_once(" | ") {
        Some((id, name)) => Source::new(id.trim(), name.trim()),
        None => Source::new(header, header),
    }
}

/// Blocks of (1-based line number, trimmed line), separated by blank lines
fn split_sections(text: &str) -> Vec<Vec<(usize, &str)>> {
    let mut sections = Vec::new();
    let mut current = Vec::new();

    for (index, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            if !current.is_empty() {
                sections.push(std::mem::take(&mut current));
            }
        } else {
            current.push((index + 1, line));
        }
    }
    if !current.is_empty() {
        sections.push(current);
    }

    sections
}

/// Render a snapshot in the file format read by [`parse_snapshot_text`]
pub fn render_snapshot_text(snapshot: &Snapshot) -> String {
    let mut sections = Vec::new();

    for source in &snapshot.sources {
        let mut lines = vec![format!("{} | {}", source.source.id, source.source.display_name())];
        let mut entries: Vec<&RawEntry> = source.entries.iter().collect();
        entries.sort_by_key(|e| e.rank);

        for entry in entries {
            let title = normalize_title(&entry.title);
            if title.is_empty() {
                continue;
            }
            let mut line = format!("{}. {}", entry.rank, title);
            if is_link(&entry.url) {
                line.push_str(&format!(" [{}:{}]", URL_TAG, entry.url));
            }
            if is_link(&entry.mobile_url) {
                line.push_str(&format!(" [{}:{}]", MOBILE_TAG, entry.mobile_url));
            }
            lines.push(line);
        }
        sections.push(lines.join("\n"));
    }

    if !snapshot.failed_ids.is_empty() {
        let mut lines = vec![FAILED_SOURCES_HEADER.to_string()];
        lines.extend(snapshot.failed_ids.iter().cloned());
        sections.push(lines.join("\n"));
    }

    let mut text = sections.join("\n\n");
    text.push('\n');
    text
}
