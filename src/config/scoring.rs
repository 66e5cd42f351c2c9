//! Scoring configuration
//!
//! Describes the scorers an aggregator is built from and how their
//! outputs are combined.

use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result};
use crate::scoring::aggregator::AggregationStrategy;
use crate::scoring::formulas::ScoringCurve;
use crate::scoring::scorers::{build_scorer, WordCountScorer};

/// Scorer list and aggregation strategy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    #[serde(default)]
    pub strategy: AggregationStrategy,

    #[serde(default = "default_scorers")]
    pub scorers: Vec<ScorerConfig>,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            strategy: AggregationStrategy::default(),
            scorers: default_scorers(),
        }
    }
}

fn default_scorers() -> Vec<ScorerConfig> {
    vec![
        ScorerConfig::WordCount {
            weight: 0.7,
            curve: ScoringCurve::default(),
            reference_words: WordCountScorer::DEFAULT_REFERENCE_WORDS,
        },
        ScorerConfig::LexicalDiversity { weight: 0.3 },
    ]
}

fn default_weight() -> f64 {
    1.0
}

fn default_reference_words() -> usize {
    WordCountScorer::DEFAULT_REFERENCE_WORDS
}

/// One configured scorer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum ScorerConfig {
    WordCount {
        #[serde(default = "default_weight")]
        weight: f64,
        #[serde(default)]
        curve: ScoringCurve,
        #[serde(default = "default_reference_words")]
        reference_words: usize,
    },
    LexicalDiversity {
        #[serde(default = "default_weight")]
        weight: f64,
    },
}

impl ScorerConfig {
    pub fn weight(&self) -> f64 {
        match self {
            Self::WordCount { weight, .. } | Self::LexicalDiversity { weight } => *weight,
        }
    }
}

impl ScoringConfig {
    // Pure function: Check a single weight
    fn validate_weight(index: usize, weight: f64) -> Result<()> {
        if weight.is_finite() && weight >= 0.0 {
            Ok(())
        } else {
            Err(Error::configuration(format!(
                "scorer {} has invalid weight {}",
                index, weight
            )))
        }
    }

    /// Validate scorer list and weights, and build each scorer once so that
    /// anything accepted here also constructs as a stage.
    pub fn validate(&self) -> Result<()> {
        if self.scorers.is_empty() {
            return Err(Error::configuration("at least one scorer is required"));
        }

        for (index, scorer) in self.scorers.iter().enumerate() {
            Self::validate_weight(index, scorer.weight())?;
            build_scorer(scorer)?;
        }

        if self.strategy == AggregationStrategy::WeightedAverage {
            let total: f64 = self.scorers.iter().map(ScorerConfig::weight).sum();
            if total <= 0.0 {
                return Err(Error::configuration("scorer weights sum to zero"));
            }
        }

        Ok(())
    }
}
