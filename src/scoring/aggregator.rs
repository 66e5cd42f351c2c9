//! Weighted ensemble of scorers.

use super::scorers::{build_scorer, Scorer};
use super::unit_score::UnitScore;
use crate::config::ScoringConfig;
use crate::errors::{Error, Result};
use serde::{Deserialize, Serialize};

/// How per-scorer values combine into one score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AggregationStrategy {
    #[default]
    WeightedAverage,
    Minimum,
    Maximum,
}

/// One scorer's contribution, kept for inspection even when only the
/// aggregate is consumed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScorerBreakdown {
    pub scorer: String,
    pub weight: f64,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreReport {
    /// Weighted sum for weighted-average; the selected value otherwise.
    pub raw_score: f64,
    /// Aggregate on the `[0, 1]` scale.
    pub normalized_score: f64,
    pub strategy: AggregationStrategy,
    pub breakdown: Vec<ScorerBreakdown>,
}

struct WeightedScorer {
    scorer: Box<dyn Scorer>,
    weight: f64,
}

/// Runs content through every configured scorer and combines the results.
pub struct ScoreAggregator {
    scorers: Vec<WeightedScorer>,
    strategy: AggregationStrategy,
}

impl std::fmt::Debug for ScoreAggregator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScoreAggregator")
            .field(
                "scorers",
                &self
                    .scorers
                    .iter()
                    .map(|s| (s.scorer.name(), s.weight))
                    .collect::<Vec<_>>(),
            )
            .field("strategy", &self.strategy)
            .finish()
    }
}

impl ScoreAggregator {
    /// Build an aggregator.
    ///
    /// Fails when no scorers are given, when a weight is negative or not
    /// finite, or when weighted-average weights sum to zero.
    pub fn new(scorers: Vec<(Box<dyn Scorer>, f64)>, strategy: AggregationStrategy) -> Result<Self> {
        if scorers.is_empty() {
            return Err(Error::configuration(
                "score aggregator requires at least one scorer",
            ));
        }

        for (scorer, weight) in &scorers {
            if !weight.is_finite() || *weight < 0.0 {
                return Err(Error::configuration(format!(
                    "scorer '{}' has invalid weight {}",
                    scorer.name(),
                    weight
                )));
            }
        }

        if strategy == AggregationStrategy::WeightedAverage {
            let total: f64 = scorers.iter().map(|(_, weight)| weight).sum();
            if total <= 0.0 {
                return Err(Error::configuration(
                    "weighted-average aggregation requires a positive total weight",
                ));
            }
        }

        Ok(Self {
            scorers: scorers
                .into_iter()
                .map(|(scorer, weight)| WeightedScorer { scorer, weight })
                .collect(),
            strategy,
        })
    }

    pub fn from_config(config: &ScoringConfig) -> Result<Self> {
        let scorers = config
            .scorers
            .iter()
            .map(|entry| Ok((build_scorer(entry)?, entry.weight())))
            .collect::<Result<Vec<_>>>()?;
        Self::new(scorers, config.strategy)
    }

    pub fn strategy(&self) -> AggregationStrategy {
        self.strategy
    }

    pub fn scorer_count(&self) -> usize {
        self.scorers.len()
    }

    pub fn score(&self, content: &str) -> ScoreReport {
        let breakdown: Vec<ScorerBreakdown> = self
            .scorers
            .iter()
            .map(|entry| ScorerBreakdown {
                scorer: entry.scorer.name().to_string(),
                weight: entry.weight,
                score: entry.scorer.score(content).value(),
            })
            .collect();

        let (raw_score, normalized_score) = combine(&breakdown, self.strategy);

        ScoreReport {
            raw_score,
            normalized_score: UnitScore::new(normalized_score).value(),
            strategy: self.strategy,
            breakdown,
        }
    }

    /// Report for content that must not earn anything: every scorer is
    /// listed with a score of zero.
    pub fn zero_report(&self) -> ScoreReport {
        ScoreReport {
            raw_score: 0.0,
            normalized_score: 0.0,
            strategy: self.strategy,
            breakdown: self
                .scorers
                .iter()
                .map(|entry| ScorerBreakdown {
                    scorer: entry.scorer.name().to_string(),
                    weight: entry.weight,
                    score: 0.0,
                })
                .collect(),
        }
    }
}

fn combine(breakdown: &[ScorerBreakdown], strategy: AggregationStrategy) -> (f64, f64) {
    match strategy {
        AggregationStrategy::WeightedAverage => {
            let total_weight: f64 = breakdown.iter().map(|b| b.weight).sum();
            let weighted: f64 = breakdown.iter().map(|b| b.weight * b.score).sum();
            (weighted, weighted / total_weight)
        }
        AggregationStrategy::Minimum => {
            let min = breakdown
                .iter()
                .map(|b| b.score)
                .fold(f64::INFINITY, f64::min);
            (min, min)
        }
        AggregationStrategy::Maximum => {
            let max = breakdown
                .iter()
                .map(|b| b.score)
                .fold(f64::NEG_INFINITY, f64::max);
            (max, max)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::scorers::FnScorer;

    fn fixed(name: &str, value: f64) -> Box<dyn Scorer> {
        Box::new(FnScorer::new(name, move |_content: &str| value))
    }

    #[test]
    fn test_zero_scorers_is_configuration_error() {
        let err = ScoreAggregator::new(Vec::new(), AggregationStrategy::WeightedAverage)
            .unwrap_err();
        assert!(err.is_configuration());

        let err = ScoreAggregator::new(Vec::new(), AggregationStrategy::Maximum).unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_negative_weight_rejected() {
        let err = ScoreAggregator::new(vec![(fixed("a", 0.5), -1.0)], AggregationStrategy::Minimum)
            .unwrap_err();
        assert!(err.to_string().contains("invalid weight"));
    }

    #[test]
    fn test_zero_total_weight_rejected_for_average_only() {
        assert!(ScoreAggregator::new(
            vec![(fixed("a", 0.5), 0.0)],
            AggregationStrategy::WeightedAverage
        )
        .is_err());
        assert!(
            ScoreAggregator::new(vec![(fixed("a", 0.5), 0.0)], AggregationStrategy::Maximum)
                .is_ok()
        );
    }

    #[test]
    fn test_weighted_average() {
        let aggregator = ScoreAggregator::new(
            vec![(fixed("a", 1.0), 3.0), (fixed("b", 0.0), 1.0)],
            AggregationStrategy::WeightedAverage,
        )
        .unwrap();
        let report = aggregator.score("text");
        assert_eq!(report.raw_score, 3.0);
        assert_eq!(report.normalized_score, 0.75);
        assert_eq!(report.breakdown.len(), 2);
        assert_eq!(report.breakdown[0].scorer, "a");
        assert_eq!(report.breakdown[1].score, 0.0);
    }

    #[test]
    fn test_minimum_and_maximum_ignore_weights() {
        let scorers = || vec![(fixed("a", 0.2), 100.0), (fixed("b", 0.9), 0.1)];

        let min = ScoreAggregator::new(scorers(), AggregationStrategy::Minimum)
            .unwrap()
            .score("x");
        assert_eq!(min.normalized_score, 0.2);
        assert_eq!(min.raw_score, 0.2);

        let max = ScoreAggregator::new(scorers(), AggregationStrategy::Maximum)
            .unwrap()
            .score("x");
        assert_eq!(max.normalized_score, 0.9);
    }

    #[test]
    fn test_breakdown_retained_for_min_strategy() {
        let report = ScoreAggregator::new(
            vec![(fixed("a", 0.2), 1.0), (fixed("b", 0.4), 1.0)],
            AggregationStrategy::Minimum,
        )
        .unwrap()
        .score("x");
        let names: Vec<&str> = report.breakdown.iter().map(|b| b.scorer.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn test_from_default_config() {
        let aggregator = ScoreAggregator::from_config(&ScoringConfig::default()).unwrap();
        assert_eq!(aggregator.strategy(), AggregationStrategy::WeightedAverage);
        assert_eq!(aggregator.scorer_count(), 2);
    }

    #[test]
    fn test_from_empty_config_fails() {
        let config = ScoringConfig {
            scorers: Vec::new(),
            ..ScoringConfig::default()
        };
        assert!(ScoreAggregator::from_config(&config).is_err());
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;
    use crate::scoring::scorers::FnScorer;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn aggregate_lies_between_min_and_max(
            entries in prop::collection::vec((0.0..=1.0f64, 0.01..10.0f64), 1..6)
        ) {
            let scorers: Vec<(Box<dyn Scorer>, f64)> = entries
                .iter()
                .enumerate()
                .map(|(i, (value, weight))| {
                    let value = *value;
                    (
                        Box::new(FnScorer::new(format!("s{}", i), move |_: &str| value))
                            as Box<dyn Scorer>,
                        *weight,
                    )
                })
                .collect();
            let report = ScoreAggregator::new(scorers, AggregationStrategy::WeightedAverage)
                .unwrap()
                .score("content");

            let lo = entries.iter().map(|(v, _)| *v).fold(f64::INFINITY, f64::min);
            let hi = entries.iter().map(|(v, _)| *v).fold(f64::NEG_INFINITY, f64::max);
            prop_assert!(report.normalized_score >= lo - 1e-9);
            prop_assert!(report.normalized_score <= hi + 1e-9);
        }
    }
}
