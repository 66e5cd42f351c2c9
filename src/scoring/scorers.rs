//! Pluggable content scorers.
//!
//! A [`Scorer`] maps a piece of already-filtered content to a value in
//! `[0, 1]`. Scorers are combined by a
//! [`ScoreAggregator`](super::ScoreAggregator).

use super::formulas::ScoringCurve;
use super::unit_score::UnitScore;
use super::word_count::{count_words, strip_non_prose};
use crate::config::ScorerConfig;
use crate::errors::{Error, Result};
use std::collections::HashSet;
use std::fmt;

/// A named content scorer.
pub trait Scorer: Send + Sync {
    /// Identifier reported in score breakdowns.
    fn name(&self) -> &str;

    /// Score `content` on a `[0, 1]` scale.
    fn score(&self, content: &str) -> UnitScore;
}

impl fmt::Debug for dyn Scorer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scorer").field("name", &self.name()).finish()
    }
}

/// Scores prose length through one of the word-count curves.
///
/// The curve value is divided by the curve value at `reference_words` and
/// capped at 1, so a comment of the reference length scores 1.0.
#[derive(Debug, Clone)]
pub struct WordCountScorer {
    curve: ScoringCurve,
    reference_words: usize,
    peak: f64,
}

impl WordCountScorer {
    pub const DEFAULT_REFERENCE_WORDS: usize = 80;

    pub fn new(curve: ScoringCurve, reference_words: usize) -> Result<Self> {
        let peak = curve.apply(reference_words);
        if peak <= 0.0 || !peak.is_finite() {
            return Err(Error::configuration(format!(
                "word-count scorer reference of {} words yields no score on the {} curve",
                reference_words,
                curve.name()
            )));
        }
        Ok(Self {
            curve,
            reference_words,
            peak,
        })
    }

    pub fn curve(&self) -> ScoringCurve {
        self.curve
    }

    pub fn reference_words(&self) -> usize {
        self.reference_words
    }
}

impl Scorer for WordCountScorer {
    fn name(&self) -> &str {
        "word-count"
    }

    fn score(&self, content: &str) -> UnitScore {
        let words = count_words(content, false, false);
        UnitScore::new(self.curve.apply(words) / self.peak)
    }
}

/// Ratio of distinct words to total words in the prose.
///
/// Repetitive padding drives the ratio down.
#[derive(Debug, Clone, Copy, Default)]
pub struct LexicalDiversityScorer;

impl Scorer for LexicalDiversityScorer {
    fn name(&self) -> &str {
        "lexical-diversity"
    }

    fn score(&self, content: &str) -> UnitScore {
        let prose = strip_non_prose(content);
        let words: Vec<String> = prose
            .split_whitespace()
            .map(|word| {
                word.trim_matches(|c: char| !c.is_alphanumeric())
                    .to_lowercase()
            })
            .filter(|word| !word.is_empty())
            .collect();

        if words.is_empty() {
            return UnitScore::zero();
        }

        let distinct: HashSet<&str> = words.iter().map(String::as_str).collect();
        UnitScore::new(distinct.len() as f64 / words.len() as f64)
    }
}

/// A scorer backed by a closure.
pub struct FnScorer<F> {
    name: String,
    func: F,
}

impl<F> FnScorer<F>
where
    F: Fn(&str) -> f64 + Send + Sync,
{
    pub fn new(name: impl Into<String>, func: F) -> Self {
        Self {
            name: name.into(),
            func,
        }
    }
}

impl<F> Scorer for FnScorer<F>
where
    F: Fn(&str) -> f64 + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn score(&self, content: &str) -> UnitScore {
        UnitScore::new((self.func)(content))
    }
}

/// Build a scorer from its configuration entry.
pub fn build_scorer(config: &ScorerConfig) -> Result<Box<dyn Scorer>> {
    match config {
        ScorerConfig::WordCount {
            curve,
            reference_words,
            ..
        } => Ok(Box::new(WordCountScorer::new(*curve, *reference_words)?)),
        ScorerConfig::LexicalDiversity { .. } => Ok(Box::new(LexicalDiversityScorer)),
    }
}
