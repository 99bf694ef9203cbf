//! Fetch cycle over a list of sources

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use tracing::{info, instrument, warn};

use radar_core::{Snapshot, Source, SourceSnapshot};

use crate::error::FeedError;

/// Anything that can produce the current ranked list of one source
#[async_trait]
pub trait FeedFetcher: Send + Sync {
    async fn fetch_source(&self, source: &Source) -> Result<SourceSnapshot, FeedError>;
}

/// Fetch every source once, in order, pausing `interval` between requests.
///
/// Failed sources are recorded on the snapshot's failed list instead of
/// failing the cycle.
#[instrument(skip(fetcher, sources), fields(sources = sources.len()))]
pub async fn crawl<F: FeedFetcher + ?Sized>(
    fetcher: &F,
    sources: &[Source],
    interval: Duration,
    captured_at: DateTime<FixedOffset>,
) -> Snapshot {
    let mut fetched = Vec::new();
    let mut failed_ids = Vec::new();

    for (i, source) in sources.iter().enumerate() {
        match fetcher.fetch_source(source).await {
            Ok(snapshot) => fetched.push(snapshot),
            Err(e) => {
                warn!("Failed to fetch {}: {}", source.id, e);
                failed_ids.push(source.id.clone());
            }
        }

        if i + 1 < sources.len() && !interval.is_zero() {
            tokio::time::sleep(interval).await;
        }
    }

    info!(
        "Fetched {} of {} sources ({} failed)",
        fetched.len(),
        sources.len(),
        failed_ids.len()
    );

    let mut snapshot = Snapshot::new(captured_at, fetched);
    snapshot.failed_ids = failed_ids;
    snapshot
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use radar_core::RawEntry;

    struct FakeFetcher;

    #[async_trait]
    impl FeedFetcher for FakeFetcher {
        async fn fetch_source(&self, source: &Source) -> Result<SourceSnapshot, FeedError> {
            if source.id == "broken" {
                return Err(FeedError::UnexpectedStatus("error".to_string()));
            }
            Ok(SourceSnapshot::new(
                source.clone(),
                vec![RawEntry::new(format!("{} headline", source.id), 1)],
            ))
        }
    }

    #[tokio::test]
    async fn test_crawl_collects_failures() {
        let sources = vec![
            Source::new("tech", "Tech"),
            Source::new("broken", "Broken"),
            Source::new("sports", "Sports"),
        ];
        let captured_at = FixedOffset::east_opt(8 * 3600)
            .unwrap()
            .with_ymd_and_hms(2025, 3, 14, 9, 0, 0)
            .unwrap();

        let snapshot = crawl(&FakeFetcher, &sources, Duration::ZERO, captured_at).await;

        assert_eq!(snapshot.sources.len(), 2);
        assert_eq!(snapshot.sources[1].source.id, "sports");
        assert_eq!(snapshot.failed_ids, vec!["broken"]);
        assert_eq!(snapshot.label(), "09:00");
    }
}
