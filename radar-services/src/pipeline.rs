//! Report pipeline
//!
//! Turns a day's snapshots into a bounded, grouped report:
//! merge → detect novelty → classify → score and select.
//! The pipeline never fails; missing history, missing rules or an empty
//! merged view all yield a (possibly empty) report.

use std::collections::HashSet;

use indexmap::IndexMap;
use rand::Rng;
use tracing::{debug, info, instrument};

use radar_core::{
    GroupKey, Item, KeywordRules, NewItemSection, Report, ReportEntry, ReportGroup, ReportMode,
    Snapshot,
};

use crate::classify::{Classification, KeywordClassifier};
use crate::merge::{merge_snapshots, MergedView, SourceItems};
use crate::novelty::{detect_new_items, NoveltySet};
use crate::scoring::{Scorer, ScoringConfig};
use crate::selection::{cap_group, order_groups, sample_fallback, SelectionConfig};

/// Stages of one report-generation run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Merging,
    Classifying,
    Selecting,
    Rendered,
}

/// Merged view and novelty set of one day, shared by every report pass
#[derive(Debug, Clone, Default)]
pub struct DayAnalysis {
    pub merged: MergedView,
    pub novelty: NoveltySet,
}

impl DayAnalysis {
    /// Analyze snapshots. Only the calendar day of the latest snapshot is
    /// considered; earlier days are invisible.
    pub fn from_snapshots(snapshots: &[Snapshot], allowed: Option<&[String]>) -> Self {
        enter(PipelineStage::Merging);
        let mut ordered: Vec<&Snapshot> = snapshots.iter().collect();
        ordered.sort_by_key(|s| s.captured_at);

        let Some(day) = ordered.last().map(|s| s.day()) else {
            return Self::default();
        };
        let today: Vec<Snapshot> = ordered
            .into_iter()
            .filter(|s| s.day() == day)
            .cloned()
            .collect();

        if today.len() < snapshots.len() {
            debug!(
                "Ignoring {} snapshots from days before {}",
                snapshots.len() - today.len(),
                day
            );
        }

        Self {
            merged: merge_snapshots(&today, allowed),
            novelty: detect_new_items(&today, allowed),
        }
    }

    /// The day's first fetch cycle has no earlier snapshot to compare with
    pub fn is_first_cycle(&self) -> bool {
        self.merged.snapshot_count() <= 1
    }
}

/// Matches of one group key, by source
#[derive(Debug, Default)]
struct MatchedBucket {
    count: usize,
    by_source: IndexMap<String, Vec<ReportEntry>>,
}

/// Builds reports from a day's analysis
#[derive(Debug, Clone)]
pub struct ReportBuilder {
    scorer: Scorer,
    classifier: KeywordClassifier,
    selection: SelectionConfig,
}

impl ReportBuilder {
    pub fn new(rules: &KeywordRules, scoring: ScoringConfig, selection: SelectionConfig) -> Self {
        Self {
            scorer: Scorer::new(scoring),
            classifier: KeywordClassifier::new(rules),
            selection,
        }
    }

    pub fn classifier(&self) -> &KeywordClassifier {
        &self.classifier
    }

    /// Convenience: analyze snapshots and build one report
    pub fn build<R: Rng + ?Sized>(
        &self,
        snapshots: &[Snapshot],
        allowed: Option<&[String]>,
        mode: ReportMode,
        rng: &mut R,
    ) -> Report {
        let analysis = DayAnalysis::from_snapshots(snapshots, allowed);
        self.build_from(&analysis, mode, rng)
    }

    /// Build a report for `mode` from an existing analysis
    #[instrument(skip_all, fields(mode = %mode))]
    pub fn build_from<R: Rng + ?Sized>(
        &self,
        analysis: &DayAnalysis,
        mode: ReportMode,
        rng: &mut R,
    ) -> Report {
        let merged = &analysis.merged;
        let mut report = Report::empty(mode);
        report.snapshot_label = merged.latest_label().unwrap_or_default().to_string();
        report.failed_ids = merged.failed_ids().to_vec();

        if merged.is_empty() {
            info!("Merged view is empty, producing an empty report");
            enter(PipelineStage::Rendered);
            return report;
        }

        enter(PipelineStage::Classifying);
        let first_cycle = analysis.is_first_cycle();
        // Rules sharing a display key share one bucket
        let mut matched: IndexMap<GroupKey, MatchedBucket> = self
            .classifier
            .distinct_keys()
            .into_iter()
            .map(|key| (key.clone(), MatchedBucket::default()))
            .collect();
        let mut matched_sources: HashSet<&str> = HashSet::new();
        let mut unmatched: Vec<(&SourceItems, &Item)> = Vec::new();

        for source in merged.sources() {
            for item in self.working_set(analysis, source, mode) {
                report.total_items += 1;
                match self.classifier.classify(&item.title) {
                    Classification::Matched(index) => {
                        let Some(bucket) = self
                            .classifier
                            .group_key(index)
                            .and_then(|key| matched.get_mut(key))
                        else {
                            continue;
                        };
                        matched_sources.insert(source.source.id.as_str());
                        bucket.count += 1;
                        bucket
                            .by_source
                            .entry(source.source.id.clone())
                            .or_default()
                            .push(self.entry(analysis, source, item));
                    }
                    Classification::Unmatched => unmatched.push((source, item)),
                    Classification::Filtered => {}
                }
            }
        }

        enter(PipelineStage::Selecting);
        let mut groups: Vec<ReportGroup> = matched
            .into_iter()
            .filter(|(_, bucket)| bucket.count > 0)
            .map(|(key, bucket)| ReportGroup {
                key,
                total_count: bucket.count,
                entries: cap_group(bucket.by_source, self.selection.per_source_cap),
            })
            .collect();

        if self.fallback_allowed(mode, first_cycle) {
            let candidates: Vec<ReportEntry> = unmatched
                .into_iter()
                .filter(|(source, _)| !matched_sources.contains(source.source.id.as_str()))
                .map(|(source, item)| self.entry(analysis, source, item))
                .collect();
            let pool = sample_fallback(candidates, self.selection.fallback_cap, rng);
            if !pool.is_empty() {
                debug!("Fallback pool holds {} items", pool.len());
                groups.push(ReportGroup {
                    key: GroupKey::Fallback,
                    total_count: pool.len(),
                    entries: pool,
                });
            }
        }

        report.groups = order_groups(groups);
        if mode != ReportMode::Incremental {
            report.new_items = self.new_item_sections(analysis);
        }

        enter(PipelineStage::Rendered);
        info!(
            "Built {} report: {} groups, {} new items, {} items considered",
            mode,
            report.groups.len(),
            report.new_item_count(),
            report.total_items
        );
        report
    }

    /// Items of one source that the given mode classifies
    fn working_set<'a>(
        &self,
        analysis: &'a DayAnalysis,
        source: &'a SourceItems,
        mode: ReportMode,
    ) -> Vec<&'a Item> {
        let latest = analysis.merged.latest_label().unwrap_or_default();
        source
            .items
            .values()
            .filter(|item| match mode {
                ReportMode::Daily => true,
                ReportMode::Current => item.last_seen == latest,
                ReportMode::Incremental => {
                    analysis.is_first_cycle()
                        || analysis.novelty.contains(&source.source.id, &item.title)
                }
            })
            .collect()
    }

    /// The pool only runs outside incremental refreshes, or on the first cycle
    fn fallback_allowed(&self, mode: ReportMode, first_cycle: bool) -> bool {
        self.selection.fallback_enabled && (mode != ReportMode::Incremental || first_cycle)
    }

    fn entry(&self, analysis: &DayAnalysis, source: &SourceItems, item: &Item) -> ReportEntry {
        ReportEntry {
            title: item.title.clone(),
            source_id: source.source.id.clone(),
            source_name: source.source.display_name().to_string(),
            score: self.scorer.score(item),
            ranks: item.ranks.iter().copied().collect(),
            rank_threshold: self.scorer.rank_threshold(),
            time_span: item.time_span(),
            occurrences: item.occurrences,
            url: item.url.clone(),
            mobile_url: item.mobile_url.clone(),
            is_new: analysis.novelty.contains(&source.source.id, &item.title),
        }
    }

    /// New items that pass the keyword rules, grouped by source
    fn new_item_sections(&self, analysis: &DayAnalysis) -> Vec<NewItemSection> {
        analysis
            .merged
            .sources()
            .filter_map(|source| {
                let mut entries: Vec<ReportEntry> = analysis
                    .novelty
                    .titles_for(&source.source.id)
                    .filter(|title| self.classifier.matches(title))
                    .filter_map(|title| source.get(title))
                    .map(|item| self.entry(analysis, source, item))
                    .collect();
                if entries.is_empty() {
                    return None;
                }
                entries.sort_by_key(|e| e.min_rank().unwrap_or(u32::MAX));
                Some(NewItemSection {
                    source_id: source.source.id.clone(),
                    source_name: source.source.display_name().to_string(),
                    entries,
                })
            })
            .collect()
    }
}

fn enter(stage: PipelineStage) {
    debug!(?stage, "report pipeline");
}
