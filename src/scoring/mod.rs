//! Comment scoring.
//!
//! - [`formulas`]: the three word-count curves and the per-comment
//!   [`CommentScore`]
//! - [`word_count`]: prose word counting
//! - [`scorers`] and [`aggregator`]: the pluggable ensemble used by the
//!   pipeline's [`ScoringStage`]

pub mod aggregator;
pub mod formulas;
pub mod scorers;
pub mod stage;
pub mod unit_score;
pub mod word_count;

pub use aggregator::{AggregationStrategy, ScoreAggregator, ScoreReport, ScorerBreakdown};
pub use formulas::{exponential, log_adjusted, original, CommentScore, ScoringCurve};
pub use scorers::{FnScorer, LexicalDiversityScorer, Scorer, WordCountScorer};
pub use stage::ScoringStage;
pub use unit_score::UnitScore;
pub use word_count::{count_comment_words, count_words, strip_non_prose};
