//! Per-contributor totals over an analysis report.

use crate::analysis::AnalysisReport;
use crate::comment::Comment;
use crate::policy::AuthorPolicy;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Scores of one contributor summed over a discussion.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContributorSummary {
    pub author: String,
    /// Comments posted, including slash commands and grouped members.
    pub comment_count: usize,
    /// Individually scored comments plus groups.
    pub scored_units: usize,
    pub total_words: usize,
    pub original: f64,
    pub log_adjusted: f64,
    pub exponential: f64,
}

impl ContributorSummary {
    fn new(author: &str) -> Self {
        Self {
            author: author.to_string(),
            ..Self::default()
        }
    }
}

/// Roll `report` up to one entry per human author.
///
/// Comments missing from the report count towards `comment_count` only.
/// Sorted by summed exponential score descending, then author name.
pub fn summarize(
    report: &AnalysisReport,
    comments: &[Comment],
    policy: &AuthorPolicy,
) -> Vec<ContributorSummary> {
    let mut by_author: BTreeMap<&str, ContributorSummary> = BTreeMap::new();

    for comment in comments
        .iter()
        .filter(|c| !policy.is_bot(&c.author, c.author_type.as_deref()))
    {
        let entry = by_author
            .entry(comment.author.as_str())
            .or_insert_with(|| ContributorSummary::new(&comment.author));
        entry.comment_count += 1;

        if let Some(score) = report.score(&comment.id).filter(|s| s.carries_score()) {
            entry.scored_units += 1;
            entry.total_words += score.word_count;
            entry.original += score.original;
            entry.log_adjusted += score.log_adjusted;
            entry.exponential += score.exponential;
        }
    }

    let mut summaries: Vec<ContributorSummary> = by_author.into_values().collect();
    summaries.sort_by(|a, b| {
        b.exponential
            .total_cmp(&a.exponential)
            .then_with(|| a.author.cmp(&b.author))
    });
    summaries
}
