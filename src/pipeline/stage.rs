//! Stage abstractions for stage chains.
//!
//! A stage is a named transform over `(event, result)` that declares which
//! event types it accepts. The set of stage kinds is closed: the chain
//! dispatches over [`Stage`] rather than over arbitrary trait objects. Host
//! code that needs its own transform wraps it in a [`CustomStage`].

use super::result::PipelineResult;
use crate::errors::{Error, Result, StageError};
use crate::event::Event;
use crate::filter::ContentFilterStage;
use crate::scoring::ScoringStage;
use regex::Regex;
use std::collections::BTreeSet;
use std::future::Future;
use std::panic::{self, AssertUnwindSafe};
use std::pin::Pin;
use std::sync::Arc;

/// Which event types a stage accepts.
#[derive(Debug, Clone, Default)]
pub enum EventMatcher {
    #[default]
    Any,
    /// Exact type strings.
    Types(BTreeSet<String>),
    /// Regular expression tested against the type string.
    Pattern(Regex),
}

impl EventMatcher {
    pub fn types<I, S>(types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Types(types.into_iter().map(Into::into).collect())
    }

    pub fn pattern(pattern: &str) -> Result<Self> {
        Regex::new(pattern)
            .map(Self::Pattern)
            .map_err(|e| Error::invalid_pattern(pattern, e))
    }

    pub fn matches(&self, event_type: &str) -> bool {
        match self {
            Self::Any => true,
            Self::Types(types) => types.contains(event_type),
            Self::Pattern(regex) => regex.is_match(event_type),
        }
    }
}

type StageFuture = Pin<Box<dyn Future<Output = anyhow::Result<PipelineResult>> + Send>>;
type AsyncTransform = dyn Fn(Event, PipelineResult) -> StageFuture + Send + Sync;
type SyncTransform = dyn Fn(&Event, &PipelineResult) -> anyhow::Result<PipelineResult> + Send + Sync;

#[derive(Clone)]
enum CustomTransform {
    Sync(Arc<SyncTransform>),
    Async(Arc<AsyncTransform>),
}

/// A host-defined stage backed by a closure.
///
/// # Example
///
/// ```rust
/// use threadscore::pipeline::{CustomStage, EventMatcher};
///
/// let stage = CustomStage::new("tag-source", |event, result| {
///     Ok(result.with_field("source", event.source()))
/// })
/// .accepting(EventMatcher::types(["github.issue_comment.created"]));
/// assert_eq!(stage.name(), "tag-source");
/// ```
#[derive(Clone)]
pub struct CustomStage {
    name: String,
    matcher: EventMatcher,
    transform: CustomTransform,
}

impl std::fmt::Debug for CustomStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CustomStage")
            .field("name", &self.name)
            .field("matcher", &self.matcher)
            .finish()
    }
}

impl CustomStage {
    /// Synchronous stage. Panics inside `func` are caught and reported as
    /// stage failures.
    pub fn new<F>(name: impl Into<String>, func: F) -> Self
    where
        F: Fn(&Event, &PipelineResult) -> anyhow::Result<PipelineResult> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            matcher: EventMatcher::Any,
            transform: CustomTransform::Sync(Arc::new(func)),
        }
    }

    /// Stage whose transform suspends. It receives owned copies of the event
    /// and the current result, and runs as its own Tokio task so a panic is
    /// reported as a stage failure. Must run within a Tokio runtime.
    pub fn from_async<F, Fut>(name: impl Into<String>, func: F) -> Self
    where
        F: Fn(Event, PipelineResult) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<PipelineResult>> + Send + 'static,
    {
        let erased = move |event: Event, result: PipelineResult| -> StageFuture {
            Box::pin(func(event, result))
        };
        Self {
            name: name.into(),
            matcher: EventMatcher::Any,
            transform: CustomTransform::Async(Arc::new(erased)),
        }
    }

    pub fn accepting(mut self, matcher: EventMatcher) -> Self {
        self.matcher = matcher;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    async fn transform(
        &self,
        event: &Event,
        result: &PipelineResult,
    ) -> std::result::Result<PipelineResult, StageError> {
        let outcome = match &self.transform {
            CustomTransform::Sync(func) => {
                panic::catch_unwind(AssertUnwindSafe(|| func(event, result))).unwrap_or_else(
                    |payload| Err(anyhow::anyhow!("panicked: {}", panic_message(&*payload))),
                )
            }
            CustomTransform::Async(func) => {
                match tokio::spawn(func(event.clone(), result.clone())).await {
                    Ok(outcome) => outcome,
                    Err(e) if e.is_panic() => Err(anyhow::anyhow!(
                        "panicked: {}",
                        panic_message(&*e.into_panic())
                    )),
                    Err(e) => Err(anyhow::anyhow!("task failed: {}", e)),
                }
            }
        };
        outcome.map_err(|e| StageError::new(&self.name, format!("{:#}", e)))
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string())
}

/// A stage in a chain.
#[derive(Debug)]
pub enum Stage {
    ContentFilter(ContentFilterStage),
    Scoring(ScoringStage),
    Custom(CustomStage),
}

impl Stage {
    pub fn name(&self) -> &str {
        match self {
            Self::ContentFilter(stage) => stage.name(),
            Self::Scoring(stage) => stage.name(),
            Self::Custom(stage) => stage.name(),
        }
    }

    fn matcher(&self) -> &EventMatcher {
        match self {
            Self::ContentFilter(stage) => stage.matcher(),
            Self::Scoring(stage) => stage.matcher(),
            Self::Custom(stage) => &stage.matcher,
        }
    }

    /// Whether this stage accepts the event's type.
    pub fn can_process(&self, event: &Event) -> bool {
        self.matcher().matches(event.event_type())
    }

    /// Run the stage, returning an updated copy of `result`.
    pub async fn transform(
        &self,
        event: &Event,
        result: &PipelineResult,
    ) -> std::result::Result<PipelineResult, StageError> {
        match self {
            Self::ContentFilter(stage) => Ok(stage.transform(event, result)),
            Self::Scoring(stage) => Ok(stage.transform(event, result)),
            Self::Custom(stage) => stage.transform(event, result).await,
        }
    }
}

impl From<ContentFilterStage> for Stage {
    fn from(stage: ContentFilterStage) -> Self {
        Self::ContentFilter(stage)
    }
}

impl From<ScoringStage> for Stage {
    fn from(stage: ScoringStage) -> Self {
        Self::Scoring(stage)
    }
}

impl From<CustomStage> for Stage {
    fn from(stage: CustomStage) -> Self {
        Self::Custom(stage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn event(event_type: &str) -> Event {
        Event::now("e-1", "test", event_type, json!({}))
    }

    #[test]
    fn test_matcher_any() {
        assert!(EventMatcher::Any.matches("anything.at.all"));
    }

    #[test]
    fn test_matcher_types() {
        let matcher = EventMatcher::types(["github.issue_comment.created"]);
        assert!(matcher.matches("github.issue_comment.created"));
        assert!(!matcher.matches("github.issue_comment.edited"));
    }

    #[test]
    fn test_matcher_pattern() {
        let matcher = EventMatcher::pattern(r"^github\.").unwrap();
        assert!(matcher.matches("github.pull_request.opened"));
        assert!(!matcher.matches("gitlab.note.created"));
    }

    #[test]
    fn test_matcher_invalid_pattern() {
        let err = EventMatcher::pattern("([").unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_custom_stage_can_process() {
        let stage: Stage = CustomStage::new("noop", |_, result| Ok(result.clone()))
            .accepting(EventMatcher::types(["a.b.c"]))
            .into();
        assert!(stage.can_process(&event("a.b.c")));
        assert!(!stage.can_process(&event("a.b.d")));
        assert_eq!(stage.name(), "noop");
    }

    #[tokio::test]
    async fn test_custom_stage_error_is_stage_error() {
        let stage: Stage =
            CustomStage::new("broken", |_, _| Err(anyhow::anyhow!("bad payload"))).into();
        let err = stage
            .transform(&event("x"), &PipelineResult::new())
            .await
            .unwrap_err();
        assert_eq!(err.stage, "broken");
        assert_eq!(err.message, "bad payload");
    }

    #[tokio::test]
    async fn test_custom_stage_panic_is_caught() {
        let stage: Stage = CustomStage::new("panicky", |_, _| panic!("exploded")).into();
        let err = stage
            .transform(&event("x"), &PipelineResult::new())
            .await
            .unwrap_err();
        assert!(err.message.contains("exploded"));
    }

    #[tokio::test]
    async fn test_async_custom_stage_panic_is_caught() {
        let stage: Stage = CustomStage::from_async("panicky-async", |_event, result| async move {
            tokio::task::yield_now().await;
            if result.fields.is_empty() {
                panic!("async exploded");
            }
            Ok(result)
        })
        .into();
        let err = stage
            .transform(&event("x"), &PipelineResult::new())
            .await
            .unwrap_err();
        assert_eq!(err.stage, "panicky-async");
        assert!(err.message.contains("async exploded"));
    }

    #[tokio::test]
    async fn test_async_custom_stage() {
        let stage: Stage = CustomStage::from_async("later", |event, result| async move {
            tokio::task::yield_now().await;
            Ok(result.with_field("seen", event.id()))
        })
        .into();
        let result = stage
            .transform(&event("x"), &PipelineResult::new())
            .await
            .unwrap();
        assert_eq!(result.field("seen"), Some(&json!("e-1")));
    }
}
