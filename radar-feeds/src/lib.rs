//! Fetch clients for the trend radar
//!
//! This crate turns a configured list of sources into a [`radar_core::Snapshot`]:
//! - `NewsNowClient`: JSON hot-list API, one request per source
//! - `crawl`: one pass over all sources with failed ids collected

pub mod error;
pub mod fetcher;
pub mod newsnow;

pub use error::FeedError;
pub use fetcher::{crawl, FeedFetcher};
pub use newsnow::{parse_hot_list, NewsNowClient, DEFAULT_API_URL};
