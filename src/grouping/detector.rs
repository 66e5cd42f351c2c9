use crate::comment::{sort_chronologically, Comment};
use crate::policy::AuthorPolicy;
use crate::scoring::word_count::count_words;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// A run of two or more consecutive comments scored as one unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentGroup {
    pub author: String,
    pub context_key: String,
    /// Member ids in chronological order.
    pub member_ids: Vec<String>,
    /// Member bodies joined by blank lines.
    pub concatenated_text: String,
    pub total_word_count: usize,
}

impl CommentGroup {
    fn start(comment: &Comment, context_key: String, word_count: usize) -> Self {
        Self {
            author: comment.author.clone(),
            context_key,
            member_ids: vec![comment.id.clone()],
            concatenated_text: comment.body.clone(),
            total_word_count: word_count,
        }
    }

    fn extend(&mut self, comment: &Comment, word_count: usize) {
        self.member_ids.push(comment.id.clone());
        self.concatenated_text.push_str("\n\n");
        self.concatenated_text.push_str(&comment.body);
        self.total_word_count += word_count;
    }

    fn accepts(&self, author: &str, context_key: &str) -> bool {
        self.author == author && self.context_key == context_key
    }

    /// Id of the last member, the only one that carries a score.
    pub fn terminal_id(&self) -> &str {
        self.member_ids
            .last()
            .map(String::as_str)
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.member_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.member_ids.is_empty()
    }
}

/// Comment id to shared group. Every member of a group maps to the same
/// `Arc`.
#[derive(Debug, Clone, Default)]
pub struct GroupMap {
    by_id: HashMap<String, Arc<CommentGroup>>,
    groups: Vec<Arc<CommentGroup>>,
}

impl GroupMap {
    fn from_groups(groups: Vec<CommentGroup>) -> Self {
        let groups: Vec<Arc<CommentGroup>> = groups.into_iter().map(Arc::new).collect();
        let by_id = groups
            .iter()
            .flat_map(|group| {
                group
                    .member_ids
                    .iter()
                    .map(move |id| (id.clone(), Arc::clone(group)))
            })
            .collect();
        Self { by_id, groups }
    }

    pub fn group_of(&self, comment_id: &str) -> Option<&Arc<CommentGroup>> {
        self.by_id.get(comment_id)
    }

    pub fn is_member(&self, comment_id: &str) -> bool {
        self.by_id.contains_key(comment_id)
    }

    /// Whether `comment_id` is the last member of its group.
    pub fn is_terminal(&self, comment_id: &str) -> bool {
        self.group_of(comment_id)
            .is_some_and(|group| group.terminal_id() == comment_id)
    }

    /// Distinct groups in chronological order of their first member.
    pub fn groups(&self) -> &[Arc<CommentGroup>] {
        &self.groups
    }

    /// Number of distinct groups.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Number of comments that belong to some group.
    pub fn member_count(&self) -> usize {
        self.by_id.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Arc<CommentGroup>)> {
        self.by_id.iter().map(|(id, group)| (id.as_str(), group))
    }
}

/// Group detection bound to an [`AuthorPolicy`].
#[derive(Debug, Clone, Default)]
pub struct GroupingEngine {
    policy: AuthorPolicy,
}

impl GroupingEngine {
    pub fn new(policy: AuthorPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &AuthorPolicy {
        &self.policy
    }

    pub fn detect_groups(&self, comments: &[Comment], context_scope: &str) -> GroupMap {
        detect_groups(comments, context_scope, &self.policy)
    }
}

/// Find runs of consecutive same-author, same-source comments.
///
/// Input order does not matter; comments are sorted with opening text
/// first and then by creation time. Runs shorter than two comments are
/// discarded.
pub fn detect_groups(comments: &[Comment], context_scope: &str, policy: &AuthorPolicy) -> GroupMap {
    let mut runs: Vec<CommentGroup> = Vec::new();
    let mut current: Option<CommentGroup> = None;

    for comment in sort_chronologically(comments) {
        if policy.is_excluded_from_scoring(
            &comment.author,
            comment.author_type.as_deref(),
            &comment.body,
        ) {
            // Own singleton, discarded. It still breaks the current run.
            runs.extend(current.take());
            continue;
        }

        let context_key = comment.source_key(context_scope);
        let word_count = count_words(&comment.body, false, false);

        match current.as_mut() {
            Some(group) if group.accepts(&comment.author, &context_key) => {
                group.extend(comment, word_count);
            }
            _ => {
                let next = CommentGroup::start(comment, context_key, word_count);
                runs.extend(current.replace(next));
            }
        }
    }
    runs.extend(current);

    let groups: Vec<CommentGroup> = runs.into_iter().filter(|g| g.len() >= 2).collect();
    debug!(
        scope = context_scope,
        comments = comments.len(),
        groups = groups.len(),
        "detected comment groups"
    );
    GroupMap::from_groups(groups)
}
