//! The accumulated result threaded through a stage chain.

use crate::filter::FilterReason;
use crate::scoring::ScoreReport;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Result object folded through every applicable stage.
///
/// Stages receive the current result by reference and return an updated
/// copy. Nothing outside this value survives between stage invocations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PipelineResult {
    /// Set by the content filter when a policy rule rejected the content.
    #[serde(default)]
    pub filtered: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<FilterReason>,

    /// Plain text extracted from the event payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,

    /// Platform account type of the author (e.g. `"Bot"`), when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<ScoreReport>,

    /// Free-form values written by custom stages.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub fields: BTreeMap<String, Value>,
}

impl PipelineResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of this result with `key` set to `value`.
    pub fn with_field(&self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        let mut next = self.clone();
        next.fields.insert(key.into(), value.into());
        next
    }

    pub fn field(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Content is present and no filter rule rejected it.
    pub fn is_scorable(&self) -> bool {
        !self.filtered && self.content.as_deref().is_some_and(|c| !c.is_empty())
    }
}
