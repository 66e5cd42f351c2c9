//! Normalized event envelope.
//!
//! Platform adapters translate their source-specific payloads (a webhook
//! delivery, a fetched review comment) into an [`Event`] before it enters a
//! stage chain. Stages only look at the dot-namespaced `event_type` and the
//! opaque `data` payload.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Immutable event envelope flowing into a stage chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    id: String,
    source: String,
    #[serde(rename = "type")]
    event_type: String,
    time: DateTime<Utc>,
    data: Value,
}

impl Event {
    pub fn new(
        id: impl Into<String>,
        source: impl Into<String>,
        event_type: impl Into<String>,
        time: DateTime<Utc>,
        data: Value,
    ) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            event_type: event_type.into(),
            time,
            data,
        }
    }

    /// Convenience constructor stamping the event with the current time.
    pub fn now(
        id: impl Into<String>,
        source: impl Into<String>,
        event_type: impl Into<String>,
        data: Value,
    ) -> Self {
        Self::new(id, source, event_type, Utc::now(), data)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Namespaced type, e.g. `github.issue_comment.created`.
    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    pub fn time(&self) -> DateTime<Utc> {
        self.time
    }

    pub fn data(&self) -> &Value {
        &self.data
    }

    /// Leading namespace segment of the type (`github` for
    /// `github.issue_comment.created`).
    pub fn platform(&self) -> &str {
        self.event_type
            .split('.')
            .next()
            .unwrap_or(self.event_type.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_event_accessors() {
        let event = Event::now(
            "evt-1",
            "webhook",
            "github.issue_comment.created",
            json!({"comment": {"body": "hi"}}),
        );
        assert_eq!(event.id(), "evt-1");
        assert_eq!(event.source(), "webhook");
        assert_eq!(event.event_type(), "github.issue_comment.created");
        assert_eq!(event.platform(), "github");
        assert_eq!(event.data()["comment"]["body"], "hi");
    }

    #[test]
    fn test_event_serializes_type_field() {
        let time = DateTime::parse_from_rfc3339("2024-03-01T10:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let event = Event::new("e", "s", "gitlab.note.created", time, json!(null));
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["type"], "gitlab.note.created");

        let back: Event = serde_json::from_value(value).unwrap();
        assert_eq!(back, event);
    }

    #[test]
    fn test_platform_without_namespace() {
        let event = Event::now("e", "s", "ping", json!({}));
        assert_eq!(event.platform(), "ping");
    }
}
