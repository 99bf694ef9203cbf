//! Report engine for the trend radar
//!
//! This crate turns a day's snapshots into grouped, scored and bounded
//! reports, and owns the file formats the radar persists: snapshot text
//! files, the keyword rule file and rendered text reports.

pub mod classify;
pub mod keywords;
pub mod merge;
pub mod novelty;
pub mod pipeline;
pub mod render;
pub mod scoring;
pub mod selection;
pub mod snapshot_file;
pub mod snapshot_store;

pub use classify::{Classification, KeywordClassifier};
pub use keywords::{load_keyword_rules, parse_keyword_rules, KeywordFileError};
pub use merge::{merge_snapshots, MergedView, RankMerger, SourceItems};
pub use novelty::{detect_new_items, NoveltySet};
pub use pipeline::{DayAnalysis, PipelineStage, ReportBuilder};
pub use render::{render_entry, render_text};
pub use scoring::{Scorer, ScoringConfig};
pub use selection::{cap_group, entry_order, order_groups, sample_fallback, SelectionConfig};
pub use snapshot_file::{
    parse_line, parse_snapshot_text, render_snapshot_text, LineParseError, ParseReport,
    FAILED_SOURCES_HEADER,
};
pub use snapshot_store::{SnapshotStore, SnapshotStoreError};
