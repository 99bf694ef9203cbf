//! One fetch-and-report cycle

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{info, instrument, warn};

use radar_core::{RadarResult, Report, ReportMode};
use radar_feeds::{crawl, NewsNowClient};
use radar_services::{
    load_keyword_rules, render_text, DayAnalysis, ReportBuilder, SnapshotStore,
    SnapshotStoreError,
};

use crate::config::RadarConfig;

/// Realtime report for `mode`, followed by its summary report if the mode has one
pub fn build_reports<R: Rng + ?Sized>(
    builder: &ReportBuilder,
    analysis: &DayAnalysis,
    mode: ReportMode,
    rng: &mut R,
) -> Vec<Report> {
    let mut reports = vec![builder.build_from(analysis, mode, rng)];
    if let Some(summary) = mode.summary_mode() {
        reports.push(builder.build_from(analysis, summary, rng));
    }
    reports
}

pub fn render_reports(reports: &[Report]) -> String {
    reports
        .iter()
        .map(render_text)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Crawl, store, analyze the day and write the rendered report.
///
/// Returns the rendered text.
#[instrument(skip(config), fields(mode = %config.report_mode))]
pub async fn run_cycle(config: &RadarConfig) -> RadarResult<String> {
    let rules = load_keyword_rules(&config.frequency_words_path)?;
    let store = SnapshotStore::new(&config.output_dir, config.utc_offset);
    let client = NewsNowClient::new(config.api_url.clone(), config.request_timeout)?;

    let captured_at = store.now();
    let snapshot = crawl(&client, &config.platforms, config.request_interval, captured_at).await;

    match store.append(&snapshot) {
        Ok(path) => info!("Snapshot written to {}", path.display()),
        Err(SnapshotStoreError::AlreadyExists(path)) => {
            warn!("Snapshot {} already exists, reporting on stored data", path)
        }
        Err(e) => return Err(e.into()),
    }

    let snapshots = store.load_day(captured_at.date_naive())?;
    let allowed = config.platform_ids();
    let analysis = DayAnalysis::from_snapshots(&snapshots, Some(allowed.as_slice()));

    let builder = ReportBuilder::new(&rules, config.scoring, config.selection);
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let reports = build_reports(&builder, &analysis, config.report_mode, &mut rng);
    let text = render_reports(&reports);

    let path = store.write_report(captured_at, &text)?;
    info!("Report written to {}", path.display());

    Ok(text)
}
