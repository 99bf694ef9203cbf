//! Core types for the trend radar
//!
//! This crate defines the shared data structures used across the radar,
//! including sources, per-cycle snapshots, merged items, keyword rules and
//! the report structure handed to renderers.

pub mod error;
pub mod item;
pub mod keyword;
pub mod report;
pub mod snapshot;
pub mod source;

pub use error::{RadarError, RadarResult};
pub use item::{Item, ItemKey};
pub use keyword::{KeywordGroup, KeywordRules};
pub use report::{
    GroupKey, NewItemSection, Report, ReportEntry, ReportGroup, ReportMode, ALL_ITEMS_GROUP_KEY,
    FALLBACK_GROUP_KEY,
};
pub use snapshot::{normalize_title, RawEntry, Snapshot, SourceSnapshot};
pub use source::Source;
