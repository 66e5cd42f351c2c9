//! Top-level analysis of a discussion.
//!
//! An analysis run sorts the comments, detects groups, counts words and
//! writes one [`CommentScore`] per comment into a [`ScoreTable`]. The table
//! is owned by the caller and tied to a [`RunId`]; starting a new run on a
//! table clears it. Nothing is shared between runs, so independent
//! analyses can proceed concurrently.

use crate::comment::{sort_chronologically, Comment};
use crate::config::{GroupingConfig, ThreadScoreConfig};
use crate::grouping::{detect_groups, GroupMap};
use crate::policy::AuthorPolicy;
use crate::scoring::formulas::CommentScore;
use crate::scoring::word_count::count_comment_words;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, info_span};

static NEXT_RUN_ID: AtomicU64 = AtomicU64::new(1);

/// Identifier of one analysis run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RunId(u64);

impl RunId {
    /// Allocate a fresh, process-unique id.
    pub fn next() -> Self {
        Self(NEXT_RUN_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "run-{}", self.0)
    }
}

/// Per-run lookup from comment id to score.
#[derive(Debug, Clone, Default)]
pub struct ScoreTable {
    run: Option<RunId>,
    scores: HashMap<String, CommentScore>,
}

impl ScoreTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear the table and bind it to a fresh run.
    pub fn begin_run(&mut self) -> RunId {
        let run = RunId::next();
        self.scores.clear();
        self.run = Some(run);
        run
    }

    /// The run whose scores the table currently holds.
    pub fn run(&self) -> Option<RunId> {
        self.run
    }

    pub fn insert(&mut self, comment_id: impl Into<String>, score: CommentScore) {
        self.scores.insert(comment_id.into(), score);
    }

    pub fn get(&self, comment_id: &str) -> Option<&CommentScore> {
        self.scores.get(comment_id)
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CommentScore)> {
        self.scores.iter().map(|(id, score)| (id.as_str(), score))
    }

    /// Entries that carry a displayed score.
    pub fn scored(&self) -> impl Iterator<Item = (&str, &CommentScore)> {
        self.iter().filter(|(_, score)| score.carries_score())
    }
}

/// Scores and groups produced by one run.
#[derive(Debug, Clone)]
pub struct AnalysisReport {
    pub scores: ScoreTable,
    pub groups: GroupMap,
}

impl AnalysisReport {
    pub fn run(&self) -> Option<RunId> {
        self.scores.run()
    }

    pub fn score(&self, comment_id: &str) -> Option<&CommentScore> {
        self.scores.get(comment_id)
    }
}

/// Scores the comments of one discussion.
#[derive(Debug, Clone)]
pub struct CommentAnalyzer {
    policy: AuthorPolicy,
    grouping: GroupingConfig,
}

impl Default for CommentAnalyzer {
    fn default() -> Self {
        Self::new(AuthorPolicy::default(), GroupingConfig::default())
    }
}

impl CommentAnalyzer {
    pub fn new(policy: AuthorPolicy, grouping: GroupingConfig) -> Self {
        Self { policy, grouping }
    }

    pub fn from_config(config: &ThreadScoreConfig) -> Self {
        Self::new(config.policy.clone(), config.grouping.clone())
    }

    pub fn policy(&self) -> &AuthorPolicy {
        &self.policy
    }

    /// Analyze `comments` into a fresh table.
    pub fn analyze(&self, comments: &[Comment]) -> AnalysisReport {
        let mut scores = ScoreTable::new();
        let groups = self.analyze_into(comments, &mut scores);
        AnalysisReport { scores, groups }
    }

    /// Analyze `comments` into `table`, which is cleared first.
    pub fn analyze_into(&self, comments: &[Comment], table: &mut ScoreTable) -> GroupMap {
        let run = table.begin_run();
        let span = info_span!("comment_analysis", run = %run, comments = comments.len());
        let _guard = span.enter();

        let groups = if self.grouping.enabled {
            detect_groups(comments, &self.grouping.scope, &self.policy)
        } else {
            GroupMap::default()
        };

        for comment in sort_chronologically(comments) {
            table.insert(comment.id.clone(), self.score_comment(comment, &groups));
        }

        debug!(
            scored = table.scored().count(),
            groups = groups.len(),
            "analysis complete"
        );
        groups
    }

    fn score_comment(&self, comment: &Comment, groups: &GroupMap) -> CommentScore {
        let words = count_comment_words(
            &comment.body,
            &comment.author,
            comment.author_type.as_deref(),
            &self.policy,
        );

        match groups.group_of(&comment.id) {
            Some(group) if group.terminal_id() == comment.id => {
                CommentScore::group_terminal(group.total_word_count)
            }
            Some(_) => CommentScore::group_member(words),
            None => CommentScore::individual(words),
        }
    }
}
