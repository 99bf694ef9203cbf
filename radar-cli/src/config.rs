//! Radar configuration from environment variables

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use chrono::{FixedOffset, Offset, Utc};
use serde::Deserialize;

use radar_core::{RadarError, ReportMode, Source};
use radar_feeds::DEFAULT_API_URL;
use radar_services::{ScoringConfig, SelectionConfig};

const DEFAULT_UTC_OFFSET_HOURS: i32 = 8;

/// Everything one fetch-and-report cycle needs
#[derive(Debug, Clone)]
pub struct RadarConfig {
    pub platforms: Vec<Source>,
    pub report_mode: ReportMode,
    pub scoring: ScoringConfig,
    pub selection: SelectionConfig,
    pub output_dir: PathBuf,
    pub frequency_words_path: PathBuf,
    /// Reference timezone for day boundaries and labels
    pub utc_offset: FixedOffset,
    pub request_interval: Duration,
    pub request_timeout: Duration,
    pub api_url: String,
    /// Fixed seed for the fallback sample
    pub seed: Option<u64>,
}

/// Platform entry as written in `RADAR_PLATFORMS`
#[derive(Debug, Deserialize)]
struct PlatformEntry {
    id: String,
    #[serde(default)]
    name: String,
}

fn default_platforms() -> Vec<Source> {
    [
        ("toutiao", "Toutiao"),
        ("baidu", "Baidu Hot Search"),
        ("wallstreetcn-hot", "Wallstreetcn"),
        ("thepaper", "The Paper"),
        ("bilibili-hot-search", "Bilibili Hot Search"),
        ("cls-hot", "CLS"),
        ("ifeng", "Ifeng"),
        ("tieba", "Tieba"),
        ("weibo", "Weibo"),
        ("douyin", "Douyin"),
        ("zhihu", "Zhihu"),
    ]
    .into_iter()
    .map(|(id, name)| Source::new(id, name))
    .collect()
}

impl Default for RadarConfig {
    fn default() -> Self {
        Self {
            platforms: default_platforms(),
            report_mode: ReportMode::default(),
            scoring: ScoringConfig::default(),
            selection: SelectionConfig::default(),
            output_dir: PathBuf::from("output"),
            frequency_words_path: PathBuf::from("config/frequency_words.txt"),
            utc_offset: FixedOffset::east_opt(DEFAULT_UTC_OFFSET_HOURS * 3600)
                .unwrap_or_else(|| Utc.fix()),
            request_interval: Duration::from_millis(1000),
            request_timeout: Duration::from_secs(10),
            api_url: DEFAULT_API_URL.to_string(),
            seed: None,
        }
    }
}

impl RadarConfig {
    /// Load configuration from the process environment
    ///
    /// Every variable is optional; unset variables keep their defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(json) = lookup("RADAR_PLATFORMS") {
            let entries: Vec<PlatformEntry> =
                serde_json::from_str(&json).map_err(|e| ConfigError::InvalidJson {
                    field: "RADAR_PLATFORMS".to_string(),
                    error: e.to_string(),
                })?;
            if entries.is_empty() {
                return Err(ConfigError::EmptyPlatformList);
            }
            config.platforms = entries
                .into_iter()
                .map(|p| Source::new(p.id, p.name))
                .collect();
        }

        if let Some(mode) = lookup("RADAR_REPORT_MODE") {
            config.report_mode =
                ReportMode::from_str(&mode).ok_or_else(|| invalid("RADAR_REPORT_MODE", &mode))?;
        }

        if let Some(threshold) = parse_var(&lookup, "RADAR_RANK_THRESHOLD")? {
            config.scoring.rank_threshold = threshold;
        }
        if let Some(weight) = parse_weight(&lookup, "RADAR_RANK_WEIGHT")? {
            config.scoring.rank_weight = weight;
        }
        if let Some(weight) = parse_weight(&lookup, "RADAR_FREQUENCY_WEIGHT")? {
            config.scoring.frequency_weight = weight;
        }
        if let Some(weight) = parse_weight(&lookup, "RADAR_HOTNESS_WEIGHT")? {
            config.scoring.hotness_weight = weight;
        }

        if let Some(cap) = parse_var::<usize, _>(&lookup, "RADAR_PER_SOURCE_CAP")? {
            // 0 disables the cap
            config.selection.per_source_cap = (cap > 0).then_some(cap);
        }
        if let Some(cap) = parse_var(&lookup, "RADAR_FALLBACK_CAP")? {
            config.selection.fallback_cap = cap;
        }
        if let Some(enabled) = parse_var(&lookup, "RADAR_FALLBACK_ENABLED")? {
            config.selection.fallback_enabled = enabled;
        }

        if let Some(dir) = lookup("RADAR_OUTPUT_DIR") {
            config.output_dir = PathBuf::from(dir);
        }
        if let Some(path) = lookup("FREQUENCY_WORDS_PATH") {
            config.frequency_words_path = PathBuf::from(path);
        }

        if let Some(hours) = parse_var::<i32, _>(&lookup, "RADAR_UTC_OFFSET_HOURS")? {
            config.utc_offset = hours
                .checked_mul(3600)
                .and_then(FixedOffset::east_opt)
                .ok_or_else(|| invalid("RADAR_UTC_OFFSET_HOURS", &hours.to_string()))?;
        }
        if let Some(ms) = parse_var(&lookup, "RADAR_REQUEST_INTERVAL_MS")? {
            config.request_interval = Duration::from_millis(ms);
        }
        if let Some(url) = lookup("RADAR_API_URL") {
            if url.trim().is_empty() {
                return Err(invalid("RADAR_API_URL", &url));
            }
            config.api_url = url;
        }
        config.seed = parse_var(&lookup, "RADAR_SEED")?;

        Ok(config)
    }

    pub fn platform_ids(&self) -> Vec<String> {
        self.platforms.iter().map(|p| p.id.clone()).collect()
    }
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| invalid(key, &raw)),
    }
}

fn parse_weight<F>(lookup: &F, key: &str) -> Result<Option<f64>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match parse_var::<f64, _>(lookup, key)? {
        Some(weight) if !weight.is_finite() || weight < 0.0 => {
            Err(invalid(key, &weight.to_string()))
        }
        weight => Ok(weight),
    }
}

fn invalid(field: &str, value: &str) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid JSON in {field}: {error}")]
    InvalidJson { field: String, error: String },

    #[error("Invalid value for {field}: {value:?}")]
    InvalidValue { field: String, value: String },

    #[error("RADAR_PLATFORMS cannot be empty")]
    EmptyPlatformList,
}

impl From<ConfigError> for RadarError {
    fn from(err: ConfigError) -> Self {
        RadarError::config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<RadarConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        RadarConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();

        assert_eq!(config.report_mode, ReportMode::Daily);
        assert_eq!(config.scoring.rank_threshold, 5);
        assert_eq!(config.selection.per_source_cap, Some(3));
        assert_eq!(config.selection.fallback_cap, 35);
        assert_eq!(config.utc_offset.local_minus_utc(), 8 * 3600);
        assert_eq!(config.request_interval, Duration::from_millis(1000));
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert!(!config.platforms.is_empty());
        assert!(config.seed.is_none());
    }

    #[test]
    fn test_platforms_from_json() {
        let config = load(&[(
            "RADAR_PLATFORMS",
            r#"[{"id": "weibo", "name": "Weibo"}, {"id": "zhihu"}]"#,
        )])
        .unwrap();

        assert_eq!(config.platform_ids(), vec!["weibo", "zhihu"]);
        assert_eq!(config.platforms[1].display_name(), "zhihu");
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("RADAR_REPORT_MODE", "incremental"),
            ("RADAR_RANK_THRESHOLD", "10"),
            ("RADAR_RANK_WEIGHT", "0.5"),
            ("RADAR_PER_SOURCE_CAP", "0"),
            ("RADAR_FALLBACK_CAP", "10"),
            ("RADAR_FALLBACK_ENABLED", "false"),
            ("RADAR_UTC_OFFSET_HOURS", "-5"),
            ("RADAR_SEED", "42"),
        ])
        .unwrap();

        assert_eq!(config.report_mode, ReportMode::Incremental);
        assert_eq!(config.scoring.rank_threshold, 10);
        assert_eq!(config.scoring.rank_weight, 0.5);
        assert_eq!(config.selection.per_source_cap, None);
        assert_eq!(config.selection.fallback_cap, 10);
        assert!(!config.selection.fallback_enabled);
        assert_eq!(config.utc_offset.local_minus_utc(), -5 * 3600);
        assert_eq!(config.seed, Some(42));
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            load(&[("RADAR_REPORT_MODE", "weekly")]),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(matches!(
            load(&[("RADAR_FALLBACK_CAP", "lots")]),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(matches!(
            load(&[("RADAR_HOTNESS_WEIGHT", "-1")]),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(matches!(
            load(&[("RADAR_UTC_OFFSET_HOURS", "30")]),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(matches!(
            load(&[("RADAR_PLATFORMS", "[]")]),
            Err(ConfigError::EmptyPlatformList)
        ));
        assert!(matches!(
            load(&[("RADAR_PLATFORMS", "not json")]),
            Err(ConfigError::InvalidJson { .. })
        ));
    }
}
