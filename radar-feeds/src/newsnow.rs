//! NewsNow-style hot list client
//!
//! Each source is fetched from `<api_url>?id=<source_id>&latest`, which
//! answers with a JSON list of items in rank order.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, instrument};

use radar_core::{normalize_title, RawEntry, Source, SourceSnapshot};

use crate::error::FeedError;
use crate::fetcher::FeedFetcher;

/// Public NewsNow aggregation endpoint
pub const DEFAULT_API_URL: &str = "https://newsnow.busiyi.world/api/s";

const USER_AGENT: &str = "Mozilla/5.0";

#[derive(Debug, Deserialize)]
struct HotListResponse {
    #[serde(default)]
    status: String,
    #[serde(default)]
    items: Vec<HotListItem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HotListItem {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    mobile_url: Option<String>,
}

/// HTTP client for a NewsNow-compatible API
pub struct NewsNowClient {
    client: Client,
    api_url: String,
}

impl NewsNowClient {
    pub fn new(api_url: impl Into<String>, timeout: Duration) -> Result<Self, FeedError> {
        let api_url = api_url.into();
        if api_url.trim().is_empty() {
            return Err(FeedError::InvalidConfig("API URL is empty".to_string()));
        }

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| FeedError::InvalidConfig(e.to_string()))?;

        Ok(Self { client, api_url })
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }
}

#[async_trait]
impl FeedFetcher for NewsNowClient {
    #[instrument(skip(self), fields(source = %source.id))]
    async fn fetch_source(&self, source: &Source) -> Result<SourceSnapshot, FeedError> {
        let response = self
            .client
            .get(format!("{}?id={}&latest", self.api_url, source.id))
            .send()
            .await
            .map_err(|e| FeedError::RequestFailed(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(FeedError::ApiError {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| FeedError::RequestFailed(e.to_string()))?;
        parse_hot_list(source, &body)
    }
}

/// Turn a response body into the source's ranked list; item `i` gets rank `i + 1`
pub fn parse_hot_list(source: &Source, body: &str) -> Result<SourceSnapshot, FeedError> {
    let response: HotListResponse =
        serde_json::from_str(body).map_err(|e| FeedError::ParseError(e.to_string()))?;

    if response.status != "success" && response.status != "cache" {
        return Err(FeedError::UnexpectedStatus(response.status));
    }

    let entries: Vec<RawEntry> = response
        .items
        .into_iter()
        .enumerate()
        .filter_map(|(i, item)| {
            let title = normalize_title(item.title.as_deref().unwrap_or_default());
            if title.is_empty() {
                return None;
            }
            Some(
                RawEntry::new(title, i as u32 + 1).with_urls(
                    item.url.unwrap_or_default(),
                    item.mobile_url.unwrap_or_default(),
                ),
            )
        })
        .collect();

    debug!("Parsed {} entries for {}", entries.len(), source.id);
    Ok(SourceSnapshot::new(source.clone(), entries))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source() -> Source {
        Source::new("tech", "Tech")
    }

    #[test]
    fn test_parse_hot_list() {
        let body = r#"{
            "status": "success",
            "items": [
                {"title": "AI breaks record", "url": "https://a.example", "mobileUrl": "https://m.a.example"},
                {"title": "Weather  update"},
                {"title": "AI breaks record"}
            ]
        }"#;

        let snapshot = parse_hot_list(&source(), body).unwrap();

        assert_eq!(snapshot.entries.len(), 3);
        assert_eq!(snapshot.entries[0].mobile_url, "https://m.a.example");
        assert_eq!(snapshot.entries[1].title, "Weather update");
        assert_eq!(snapshot.entries[1].url, "");
        assert_eq!(snapshot.entries[2].rank, 3);
    }

    #[test]
    fn test_cache_status_is_accepted() {
        let snapshot = parse_hot_list(&source(), r#"{"status": "cache", "items": []}"#).unwrap();
        assert!(snapshot.entries.is_empty());
    }

    #[test]
    fn test_error_status_is_rejected() {
        let result = parse_hot_list(&source(), r#"{"status": "error"}"#);
        assert!(matches!(result, Err(FeedError::UnexpectedStatus(s)) if s == "error"));
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            parse_hot_list(&source(), "<html>"),
            Err(FeedError::ParseError(_))
        ));
    }

    #[test]
    fn test_items_without_title_keep_rank_positions() {
        let body = r#"{"status": "success", "items": [{"url": "x"}, {"title": "second"}]}"#;
        let snapshot = parse_hot_list(&source(), body).unwrap();
        assert_eq!(snapshot.entries.len(), 1);
        assert_eq!(snapshot.entries[0].rank, 2);
    }

    #[test]
    fn test_empty_api_url_is_rejected() {
        assert!(NewsNowClient::new(" ", Duration::from_secs(10)).is_err());
    }
}
