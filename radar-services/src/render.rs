//! Plain-text report rendering

use radar_core::{Report, ReportEntry};

/// One entry line: `[source] title [rank range] - time span (xN) [NEW]`
pub fn render_entry(entry: &ReportEntry, with_source: bool) -> String {
    let mut line = String::new();
    if with_source {
        line.push_str(&format!("[{}] ", entry.source_name));
    }
    line.push_str(&entry.title);

    let range = entry.rank_range();
    if !range.is_empty() {
        if entry.is_hot() {
            line.push_str(&format!(" **{}**", range));
        } else {
            line.push_str(&format!(" {}", range));
        }
    }
    if !entry.time_span.is_empty() {
        line.push_str(&format!(" - {}", entry.time_span));
    }
    if entry.occurrences > 1 {
        line.push_str(&format!(" (x{})", entry.occurrences));
    }
    if entry.is_new {
        line.push_str(" [NEW]");
    }
    line
}

pub fn render_text(report: &Report) -> String {
    let mut lines = Vec::new();

    let label = if report.snapshot_label.is_empty() {
        "-"
    } else {
        report.snapshot_label.as_str()
    };
    lines.push(format!(
        "Trend report ({}) at {}: {} items",
        report.mode, label, report.total_items
    ));

    if report.is_empty() {
        lines.push(String::new());
        lines.push("No matching items".to_string());
    }

    if !report.new_items.is_empty() {
        lines.push(String::new());
        lines.push(format!("New this cycle ({})", report.new_item_count()));
        for section in &report.new_items {
            lines.push(format!("  {} ({})", section.source_name, section.entries.len()));
            for (i, entry) in section.entries.iter().enumerate() {
                lines.push(format!("    {}. {}", i + 1, render_entry(entry, false)));
            }
        }
    }

    for group in &report.groups {
        lines.push(String::new());
        lines.push(format!("{} ({})", group.key, group.total_count));
        for (i, entry) in group.entries.iter().enumerate() {
            lines.push(format!("  {}. {}", i + 1, render_entry(entry, true)));
        }
    }

    if !report.failed_ids.is_empty() {
        lines.push(String::new());
        lines.push(format!("Failed sources: {}", report.failed_ids.join(", ")));
    }

    let mut text = lines.join("\n");
    text.push('\n');
    text
}
