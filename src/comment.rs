//! Comment records supplied by a discussion fetcher.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Synthetic id for a pull request's own description.
pub const PULL_REQUEST_BODY_ID: &str = "pr-body";

/// Synthetic id for an issue's own description.
pub const ISSUE_BODY_ID: &str = "issue-body";

/// Sub-context of a discussion a comment was posted in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum CommentContext {
    /// Top-level conversation timeline.
    #[default]
    Conversation,
    /// Inline review thread anchored to a file.
    ReviewThread {
        path: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        line: Option<u32>,
    },
    /// Note attached to a specific commit.
    CommitNote { commit_id: String },
    /// Body of a submitted review.
    ReviewSummary,
}

impl CommentContext {
    pub fn review_thread(path: impl Into<String>) -> Self {
        Self::ReviewThread {
            path: path.into(),
            line: None,
        }
    }

    pub fn commit_note(commit_id: impl Into<String>) -> Self {
        Self::CommitNote {
            commit_id: commit_id.into(),
        }
    }

    /// `scope` refined by this context.
    ///
    /// Review threads are keyed by file path and commit notes by commit, so
    /// comments on different files never share a key.
    pub fn source_key(&self, scope: &str) -> String {
        match self {
            Self::Conversation => format!("{}:conversation", scope),
            Self::ReviewThread { path, .. } => format!("{}:review:{}", scope, path),
            Self::CommitNote { commit_id } => format!("{}:commit:{}", scope, commit_id),
            Self::ReviewSummary => format!("{}:review-summary", scope),
        }
    }
}

/// A single comment in a discussion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: String,
    pub body: String,
    pub author: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub context: CommentContext,
    /// Platform account type (e.g. `"Bot"`), when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_type: Option<String>,
}

impl Comment {
    pub fn new(
        id: impl Into<String>,
        author: impl Into<String>,
        body: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            body: body.into(),
            author: author.into(),
            created_at,
            context: CommentContext::Conversation,
            author_type: None,
        }
    }

    pub fn with_context(mut self, context: CommentContext) -> Self {
        self.context = context;
        self
    }

    pub fn with_author_type(mut self, author_type: impl Into<String>) -> Self {
        self.author_type = Some(author_type.into());
        self
    }

    /// Whether this is the discussion's own opening text.
    pub fn is_opening_text(&self) -> bool {
        self.id == PULL_REQUEST_BODY_ID || self.id == ISSUE_BODY_ID
    }

    /// Grouping key for this comment within `scope`.
    ///
    /// Opening text is its own source so a description never merges with
    /// the author's first reply.
    pub fn source_key(&self, scope: &str) -> String {
        if self.is_opening_text() {
            format!("{}:opening", scope)
        } else {
            self.context.source_key(scope)
        }
    }
}

/// Opening text first, then ascending creation time. Ties keep input order.
pub fn sort_chronologically(comments: &[Comment]) -> Vec<&Comment> {
    let mut sorted: Vec<&Comment> = comments.iter().collect();
    sorted.sort_by_key(|c| (!c.is_opening_text(), c.created_at));
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, minute, 0).unwrap()
    }

    #[test]
    fn test_source_keys_distinguish_contexts() {
        let scope = "repo#42";
        assert_eq!(
            CommentContext::Conversation.source_key(scope),
            "repo#42:conversation"
        );
        assert_ne!(
            CommentContext::review_thread("src/a.rs").source_key(scope),
            CommentContext::review_thread("src/b.rs").source_key(scope)
        );
        assert_eq!(
            CommentContext::commit_note("abc123").source_key(scope),
            "repo#42:commit:abc123"
        );
    }

    #[test]
    fn test_review_thread_line_does_not_split_key() {
        let a = CommentContext::ReviewThread {
            path: "src/lib.rs".into(),
            line: Some(10),
        };
        let b = CommentContext::ReviewThread {
            path: "src/lib.rs".into(),
            line: Some(90),
        };
        assert_eq!(a.source_key("s"), b.source_key("s"));
    }

    #[test]
    fn test_opening_text_sorts_first() {
        let comments = vec![
            Comment::new("c1", "bob", "first reply", at(5)),
            Comment::new(PULL_REQUEST_BODY_ID, "alice", "description", at(30)),
            Comment::new("c0", "carol", "earliest reply", at(1)),
        ];
        let order: Vec<&str> = sort_chronologically(&comments)
            .iter()
            .map(|c| c.id.as_str())
            .collect();
        assert_eq!(order, vec!["pr-body", "c0", "c1"]);
    }

    #[test]
    fn test_sort_is_stable_for_equal_times() {
        let comments = vec![
            Comment::new("b", "x", "", at(0)),
            Comment::new("a", "x", "", at(0)),
        ];
        let order: Vec<&str> = sort_chronologically(&comments)
            .iter()
            .map(|c| c.id.as_str())
            .collect();
        assert_eq!(order, vec!["b", "a"]);
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let comment: Comment = serde_json::from_str(
            r#"{"id":"c9","body":"hi","author":"dana","created_at":"2024-05-01T12:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(comment.context, CommentContext::Conversation);
        assert_eq!(comment.author_type, None);

        let comment: Comment = serde_json::from_str(
            r#"{"id":"c10","body":"hi","author":"dana","created_at":"2024-05-01T12:00:00Z",
                "context":{"kind":"review-thread","path":"src/main.rs"}}"#,
        )
        .unwrap();
        assert_eq!(comment.context, CommentContext::review_thread("src/main.rs"));
    }
}
