//! Word-count scoring curves.
//!
//! All three curves grow sub-linearly so that padding a comment yields
//! diminishing returns. The exponential curve peaks around 85 words and
//! then decays toward zero.

use serde::{Deserialize, Serialize};

/// Exponent shared by every curve.
pub const LENGTH_EXPONENT: f64 = 0.85;

/// Word count at which the exponential curve has decayed by a factor of `e`.
pub const DECAY_SCALE: f64 = 100.0;

/// `w^0.85`
pub fn original(word_count: usize) -> f64 {
    if word_count == 0 {
        return 0.0;
    }
    (word_count as f64).powf(LENGTH_EXPONENT)
}

/// `w^0.85 / log2(w + 2)`
///
/// `log2(2) == 1`, so the divisor never reaches zero.
pub fn log_adjusted(word_count: usize) -> f64 {
    if word_count == 0 {
        return 0.0;
    }
    original(word_count) / (word_count as f64 + 2.0).log2()
}

/// `w^0.85 * e^(-w / 100)`
pub fn exponential(word_count: usize) -> f64 {
    if word_count == 0 {
        return 0.0;
    }
    original(word_count) * (-(word_count as f64) / DECAY_SCALE).exp()
}

/// Selects one of the three curves by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScoringCurve {
    Original,
    LogAdjusted,
    #[default]
    Exponential,
}

impl ScoringCurve {
    pub fn apply(self, word_count: usize) -> f64 {
        match self {
            Self::Original => original(word_count),
            Self::LogAdjusted => log_adjusted(word_count),
            Self::Exponential => exponential(word_count),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Original => "original",
            Self::LogAdjusted => "log-adjusted",
            Self::Exponential => "exponential",
        }
    }
}

/// Per-comment score attached in a [`ScoreTable`](crate::analysis::ScoreTable).
///
/// Non-terminal members of a comment group carry `is_grouped: true`, their
/// own word count, zero scores and no `group_word_count`. The terminal
/// member carries the scores of the whole group.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CommentScore {
    pub word_count: usize,
    pub original: f64,
    pub log_adjusted: f64,
    pub exponential: f64,
    pub is_grouped: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_word_count: Option<usize>,
}

impl CommentScore {
    /// Score a comment that stands alone.
    pub fn individual(word_count: usize) -> Self {
        Self {
            word_count,
            original: original(word_count),
            log_adjusted: log_adjusted(word_count),
            exponential: exponential(word_count),
            is_grouped: false,
            group_word_count: None,
        }
    }

    /// Score the last member of a group using the group's total word count.
    pub fn group_terminal(total_word_count: usize) -> Self {
        Self {
            is_grouped: true,
            group_word_count: Some(total_word_count),
            ..Self::individual(total_word_count)
        }
    }

    /// Placeholder for a group member whose score is carried by a later member.
    pub fn group_member(word_count: usize) -> Self {
        Self {
            word_count,
            original: 0.0,
            log_adjusted: 0.0,
            exponential: 0.0,
            is_grouped: true,
            group_word_count: None,
        }
    }

    /// Whether this entry carries a displayed score.
    pub fn carries_score(&self) -> bool {
        !self.is_grouped || self.group_word_count.is_some()
    }

    pub fn curve(&self, curve: ScoringCurve) -> f64 {
        match curve {
            ScoringCurve::Original => self.original,
            ScoringCurve::LogAdjusted => self.log_adjusted,
            ScoringCurve::Exponential => self.exponential,
        }
    }
}
