//! Consecutive-comment grouping.
//!
//! Splitting one long comment into several short ones must not earn more
//! than posting it whole. The grouping engine finds runs of consecutive
//! comments by the same author in the same source (conversation, review
//! thread on one file, commit note) so they can be scored as one unit.
//!
//! Bot comments and slash commands never join a run and always end the
//! current one.

mod detector;

pub use detector::{detect_groups, CommentGroup, GroupMap, GroupingEngine};
