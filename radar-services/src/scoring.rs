//! Scorer
//!
//! Weighted score combining how high an item ranked, how often it was seen
//! and how much of its time it spent above the hot threshold.

use serde::{Deserialize, Serialize};

use radar_core::Item;

/// Observations at or beyond this rank all contribute the minimum rank score
const RANK_SCORE_FLOOR: u32 = 10;

/// Sightings beyond this count no longer raise the frequency score
const FREQUENCY_SATURATION: u32 = 10;

/// Configuration for the scorer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    #[serde(default = "default_rank_weight")]
    pub rank_weight: f64,
    #[serde(default = "default_frequency_weight")]
    pub frequency_weight: f64,
    #[serde(default = "default_hotness_weight")]
    pub hotness_weight: f64,
    /// Ranks at or below this count as "hot"
    #[serde(default = "default_rank_threshold")]
    pub rank_threshold: u32,
}

fn default_rank_weight() -> f64 {
    0.6
}

fn default_frequency_weight() -> f64 {
    0.3
}

fn default_hotness_weight() -> f64 {
    0.1
}

fn default_rank_threshold() -> u32 {
    5
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            rank_weight: default_rank_weight(),
            frequency_weight: default_frequency_weight(),
            hotness_weight: default_hotness_weight(),
            rank_threshold: default_rank_threshold(),
        }
    }
}

/// Pure item scorer
#[derive(Debug, Clone, Copy, Default)]
pub struct Scorer {
    config: ScoringConfig,
}

impl Scorer {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    pub fn rank_threshold(&self) -> u32 {
        self.config.rank_threshold
    }

    pub fn score(&self, item: &Item) -> f64 {
        self.score_ranks(item.ranks.iter().copied(), item.occurrences)
    }

    /// Score from raw observations; an empty rank set scores 0
    pub fn score_ranks(&self, ranks: impl IntoIterator<Item = u32>, occurrences: u32) -> f64 {
        let ranks: Vec<u32> = ranks.into_iter().collect();
        if ranks.is_empty() {
            return 0.0;
        }
        let observed = ranks.len() as f64;

        let rank_score = ranks
            .iter()
            .map(|&r| f64::from(RANK_SCORE_FLOOR + 1 - r.min(RANK_SCORE_FLOOR)))
            .sum::<f64>()
            / observed;

        let freq_score = f64::from(occurrences.min(FREQUENCY_SATURATION)) * 10.0;

        let hot = ranks
            .iter()
            .filter(|&&r| r <= self.config.rank_threshold)
            .count() as f64;
        let hot_score = hot / observed * 100.0;

        rank_score * self.config.rank_weight
            + freq_score * self.config.frequency_weight
            + hot_score * self.config.hotness_weight
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_weights(threshold: u32) -> Scorer {
        Scorer::new(ScoringConfig {
            rank_weight: 1.0,
            frequency_weight: 1.0,
            hotness_weight: 1.0,
            rank_threshold: threshold,
        })
    }

    #[test]
    fn test_rank_component() {
        let scorer = Scorer::new(ScoringConfig {
            rank_weight: 1.0,
            frequency_weight: 0.0,
            hotness_weight: 0.0,
            rank_threshold: 5,
        });

        assert_eq!(scorer.score_ranks([1], 1), 10.0);
        assert_eq!(scorer.score_ranks([10], 1), 1.0);
        assert_eq!(scorer.score_ranks([50], 1), 1.0);
        assert_eq!(scorer.score_ranks([1, 10], 1), 5.5);
    }

    #[test]
    fn test_frequency_saturates() {
        let scorer = Scorer::new(ScoringConfig {
            rank_weight: 0.0,
            frequency_weight: 1.0,
            hotness_weight: 0.0,
            rank_threshold: 5,
        });

        assert_eq!(scorer.score_ranks([1], 3), 30.0);
        assert_eq!(scorer.score_ranks([1], 10), 100.0);
        assert_eq!(scorer.score_ranks([1], 25), 100.0);
    }

    #[test]
    fn test_hot_component() {
        let scorer = Scorer::new(ScoringConfig {
            rank_weight: 0.0,
            frequency_weight: 0.0,
            hotness_weight: 1.0,
            rank_threshold: 3,
        });

        assert_eq!(scorer.score_ranks([1, 2, 8, 9], 1), 50.0);
        assert_eq!(scorer.score_ranks([3], 1), 100.0);
        assert_eq!(scorer.score_ranks([4], 1), 0.0);
    }

    #[test]
    fn test_empty_ranks_score_zero() {
        let scorer = unit_weights(5);
        assert_eq!(scorer.score_ranks(Vec::new(), 7), 0.0);
    }

    #[test]
    fn test_combined_formula_with_defaults() {
        let scorer = Scorer::default();
        // rank 10*0.6 + freq 20*0.3 + hot 100*0.1
        let score = scorer.score_ranks([1], 2);
        assert!((score - 22.0).abs() < 1e-9);
    }

    #[test]
    fn test_better_rank_never_scores_lower() {
        let scorer = Scorer::default();
        for occurrences in [1, 4, 12] {
            for better in 1..30 {
                for worse in (better + 1)..31 {
                    assert!(
                        scorer.score_ranks([better], occurrences)
                            >= scorer.score_ranks([worse], occurrences),
                        "rank {} scored below rank {}",
                        better,
                        worse
                    );
                }
            }
        }
    }
}
