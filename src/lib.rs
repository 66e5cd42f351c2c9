//! Fairness-aware contributor scoring for code-review discussions.
//!
//! Two entry points share the same author policy and scoring formulas:
//!
//! - [`pipeline`]: platform events are folded through a [`StageChain`] of
//!   filter, scoring and custom stages into a [`PipelineResult`].
//! - [`analysis`]: the comments of a whole discussion are grouped and
//!   scored by a [`CommentAnalyzer`], so that splitting a comment into
//!   several never earns more than posting it once.

// Export modules for library usage
pub mod analysis;
pub mod comment;
pub mod config;
pub mod errors;
pub mod event;
pub mod filter;
pub mod grouping;
pub mod pipeline;
pub mod policy;
pub mod scoring;
pub mod summary;

// Re-export commonly used types
pub use crate::analysis::{AnalysisReport, CommentAnalyzer, RunId, ScoreTable};
pub use crate::comment::{Comment, CommentContext, ISSUE_BODY_ID, PULL_REQUEST_BODY_ID};
pub use crate::config::{load_config, FilterConfig, GroupingConfig, ThreadScoreConfig};
pub use crate::errors::{Error, Result, StageError};
pub use crate::event::Event;
pub use crate::filter::{ContentFilterStage, FilterReason};
pub use crate::grouping::{detect_groups, CommentGroup, GroupMap, GroupingEngine};
pub use crate::pipeline::{
    ChainRegistry, CustomStage, EventMatcher, PipelineResult, Stage, StageChain,
};
pub use crate::policy::AuthorPolicy;
pub use crate::scoring::{
    AggregationStrategy, CommentScore, ScoreAggregator, ScoreReport, Scorer, ScoringCurve,
    ScoringStage,
};
pub use crate::summary::{summarize, ContributorSummary};
