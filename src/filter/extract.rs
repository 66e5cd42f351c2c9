//! Content and author extraction from platform payloads.
//!
//! Known event types map to JSON pointers into the payload. Unknown types
//! fall back to a handful of generic field names.

use crate::event::Event;
use serde_json::Value;

/// Text and author pulled out of an event payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extracted {
    pub content: String,
    pub author: Option<String>,
    /// Platform account type, when the payload carries one (e.g. `"Bot"`).
    pub author_type: Option<String>,
}

struct PayloadShape {
    event_type: &'static str,
    content: &'static str,
    author: &'static str,
    author_type: Option<&'static str>,
}

const PAYLOAD_SHAPES: &[PayloadShape] = &[
    PayloadShape {
        event_type: "github.issue_comment.created",
        content: "/comment/body",
        author: "/comment/user/login",
        author_type: Some("/comment/user/type"),
    },
    PayloadShape {
        event_type: "github.pull_request_review_comment.created",
        content: "/comment/body",
        author: "/comment/user/login",
        author_type: Some("/comment/user/type"),
    },
    PayloadShape {
        event_type: "github.pull_request_review.submitted",
        content: "/review/body",
        author: "/review/user/login",
        author_type: Some("/review/user/type"),
    },
    PayloadShape {
        event_type: "github.issues.opened",
        content: "/issue/body",
        author: "/issue/user/login",
        author_type: Some("/issue/user/type"),
    },
    PayloadShape {
        event_type: "github.pull_request.opened",
        content: "/pull_request/body",
        author: "/pull_request/user/login",
        author_type: Some("/pull_request/user/type"),
    },
    PayloadShape {
        event_type: "gitlab.note.created",
        content: "/object_attributes/note",
        author: "/user/username",
        author_type: None,
    },
];

const GENERIC_CONTENT_FIELDS: &[&str] = &["/content", "/body", "/text", "/message"];

const GENERIC_AUTHOR_FIELDS: &[&str] = &[
    "/author",
    "/author/login",
    "/author/name",
    "/user/login",
    "/user/username",
    "/username",
    "/login",
];

const GENERIC_AUTHOR_TYPE_FIELDS: &[&str] = &["/author/type", "/user/type"];

/// Whether `event_type` has a dedicated payload shape.
pub fn is_known_event_type(event_type: &str) -> bool {
    PAYLOAD_SHAPES.iter().any(|s| s.event_type == event_type)
}

/// Extract content and author. Returns `None` when no non-blank text exists.
pub fn extract(event: &Event) -> Option<Extracted> {
    let data = event.data();

    let (content, author, author_type) =
        match PAYLOAD_SHAPES.iter().find(|s| s.event_type == event.event_type()) {
            Some(shape) => (
                string_at(data, shape.content),
                string_at(data, shape.author),
                shape.author_type.and_then(|ptr| string_at(data, ptr)),
            ),
            None => (
                first_string(data, GENERIC_CONTENT_FIELDS),
                first_string(data, GENERIC_AUTHOR_FIELDS),
                first_string(data, GENERIC_AUTHOR_TYPE_FIELDS),
            ),
        };

    let content = content.filter(|text| !text.trim().is_empty())?;
    Some(Extracted {
        content,
        author,
        author_type,
    })
}

fn string_at(data: &Value, pointer: &str) -> Option<String> {
    data.pointer(pointer)
        .and_then(Value::as_str)
        .map(str::to_string)
}

fn first_string(data: &Value, pointers: &[&str]) -> Option<String> {
    pointers.iter().find_map(|ptr| string_at(data, ptr))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn event(event_type: &str, data: Value) -> Event {
        Event::now("e", "test", event_type, data)
    }

    #[test]
    fn test_github_issue_comment() {
        let extracted = extract(&event(
            "github.issue_comment.created",
            json!({"comment": {"body": "Nice work", "user": {"login": "alice", "type": "User"}}}),
        ))
        .unwrap();
        assert_eq!(extracted.content, "Nice work");
        assert_eq!(extracted.author.as_deref(), Some("alice"));
        assert_eq!(extracted.author_type.as_deref(), Some("User"));
    }

    #[test]
    fn test_github_review() {
        let extracted = extract(&event(
            "github.pull_request_review.submitted",
            json!({"review": {"body": "Approved with nits", "user": {"login": "bob"}}}),
        ))
        .unwrap();
        assert_eq!(extracted.content, "Approved with nits");
        assert_eq!(extracted.author.as_deref(), Some("bob"));
        assert_eq!(extracted.author_type, None);
    }

    #[test]
    fn test_gitlab_note() {
        let extracted = extract(&event(
            "gitlab.note.created",
            json!({"object_attributes": {"note": "LGTM"}, "user": {"username": "carol"}}),
        ))
        .unwrap();
        assert_eq!(extracted.content, "LGTM");
        assert_eq!(extracted.author.as_deref(), Some("carol"));
    }

    #[test]
    fn test_generic_fallback() {
        let extracted = extract(&event(
            "discourse.post.created",
            json!({"text": "generic text", "user": {"login": "dave"}}),
        ))
        .unwrap();
        assert_eq!(extracted.content, "generic text");
        assert_eq!(extracted.author.as_deref(), Some("dave"));

        let extracted = extract(&event("custom", json!({"body": "b", "author": "erin"}))).unwrap();
        assert_eq!(extracted.author.as_deref(), Some("erin"));
    }

    #[test]
    fn test_known_type_does_not_use_generic_fields() {
        let extracted = extract(&event(
            "github.issue_comment.created",
            json!({"body": "top-level body is not a comment"}),
        ));
        assert_eq!(extracted, None);
    }

    #[test]
    fn test_blank_content_is_none() {
        assert_eq!(extract(&event("custom", json!({"body": "   \n"}))), None);
        assert_eq!(extract(&event("custom", json!({"body": null}))), None);
        assert_eq!(extract(&event("custom", json!({}))), None);
    }

    #[test]
    fn test_is_known_event_type() {
        assert!(is_known_event_type("gitlab.note.created"));
        assert!(!is_known_event_type("gitlab.note.updated"));
    }
}
