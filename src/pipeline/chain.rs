//! Ordered stage chains.
//!
//! A chain folds one [`Event`] through its stages in insertion order. Each
//! applicable stage is awaited before the next one starts. A stage that
//! fails is logged and skipped: the result it was given carries on to the
//! next stage unchanged.

use super::result::PipelineResult;
use super::stage::Stage;
use crate::config::ThreadScoreConfig;
use crate::errors::Result;
use crate::event::Event;
use crate::filter::ContentFilterStage;
use crate::scoring::ScoringStage;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinSet;
use tracing::{debug, debug_span, warn, Instrument};

/// What happened to one stage during a chain run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageOutcome {
    Applied,
    /// The stage does not accept this event type.
    Skipped,
    /// The stage failed; its output was discarded.
    Failed(String),
}

/// Timing and outcome for a stage.
#[derive(Debug, Clone)]
pub struct StageTrace {
    pub name: String,
    pub outcome: StageOutcome,
    pub duration: Duration,
}

impl StageTrace {
    /// Format the trace as a human-readable string.
    pub fn format(&self) -> String {
        let outcome = match &self.outcome {
            StageOutcome::Applied => "applied".to_string(),
            StageOutcome::Skipped => "skipped".to_string(),
            StageOutcome::Failed(message) => format!("failed ({})", message),
        };
        format!(
            "{}: {} in {:.3}ms",
            self.name,
            outcome,
            self.duration.as_secs_f64() * 1000.0
        )
    }
}

/// An ordered list of stages bound to a chain identifier.
#[derive(Debug)]
pub struct StageChain {
    id: String,
    stages: Vec<Stage>,
}

impl StageChain {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            stages: Vec::new(),
        }
    }

    /// The default chain: content filter followed by scoring.
    pub fn standard(id: impl Into<String>, config: &ThreadScoreConfig) -> Result<Self> {
        let filter = ContentFilterStage::from_config(&config.filter, config.policy.clone())?;
        let scoring = ScoringStage::from_config(&config.scoring, config.policy.clone())?;
        Ok(Self::new(id).add_stage(filter).add_stage(scoring))
    }

    /// Append a stage. Order is preserved and significant.
    pub fn add_stage(mut self, stage: impl Into<Stage>) -> Self {
        self.stages.push(stage.into());
        self
    }

    /// Apply `f` only when `condition` holds.
    pub fn when<F>(self, condition: bool, f: F) -> Self
    where
        F: FnOnce(Self) -> Self,
    {
        if condition {
            f(self)
        } else {
            self
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }

    pub fn stage_names(&self) -> Vec<&str> {
        self.stages.iter().map(Stage::name).collect()
    }

    /// Fold `event` through every applicable stage.
    pub async fn execute(&self, event: &Event, initial: PipelineResult) -> PipelineResult {
        self.execute_traced(event, initial).await.0
    }

    /// Fold `event` through the chain and report what each stage did.
    pub async fn execute_traced(
        &self,
        event: &Event,
        initial: PipelineResult,
    ) -> (PipelineResult, Vec<StageTrace>) {
        let span = debug_span!(
            "stage_chain",
            chain = %self.id,
            event_id = %event.id(),
            event_type = %event.event_type()
        );
        self.fold(event, initial).instrument(span).await
    }

    /// Fold `event` through the chain, stopping at the first stage that
    /// fails and returning its [`Error::Stage`](crate::Error::Stage).
    pub async fn execute_strict(
        &self,
        event: &Event,
        initial: PipelineResult,
    ) -> Result<PipelineResult> {
        let mut result = initial;
        for stage in self.stages.iter().filter(|stage| stage.can_process(event)) {
            result = stage.transform(event, &result).await?;
        }
        Ok(result)
    }

    /// Run each event through the chain on its own Tokio task.
    ///
    /// Results come back in input order. An event whose task dies keeps
    /// `initial` as its result. Must be called from within a Tokio runtime.
    pub async fn execute_concurrent(
        self: Arc<Self>,
        events: Vec<Event>,
        initial: PipelineResult,
    ) -> Vec<PipelineResult> {
        let mut results = vec![initial.clone(); events.len()];
        let mut tasks = JoinSet::new();

        for (index, event) in events.into_iter().enumerate() {
            let chain = Arc::clone(&self);
            let initial = initial.clone();
            tasks.spawn(async move { (index, chain.execute(&event, initial).await) });
        }

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, result)) => results[index] = result,
                Err(e) => warn!(chain = %self.id, error = %e, "event task failed"),
            }
        }

        results
    }

    async fn fold(&self, event: &Event, initial: PipelineResult) -> (PipelineResult, Vec<StageTrace>) {
        let mut result = initial;
        let mut traces = Vec::with_capacity(self.stages.len());

        for stage in &self.stages {
            let start = Instant::now();

            if !stage.can_process(event) {
                debug!(stage = stage.name(), "stage skipped");
                traces.push(StageTrace {
                    name: stage.name().to_string(),
                    outcome: StageOutcome::Skipped,
                    duration: start.elapsed(),
                });
                continue;
            }

            let outcome = match stage.transform(event, &result).await {
                Ok(next) => {
                    result = next;
                    StageOutcome::Applied
                }
                Err(e) => {
                    warn!(
                        chain = %self.id,
                        stage = stage.name(),
                        error = %e,
                        "stage failed; keeping previous result"
                    );
                    StageOutcome::Failed(e.message)
                }
            };

            traces.push(StageTrace {
                name: stage.name().to_string(),
                outcome,
                duration: start.elapsed(),
            });
        }

        (result, traces)
    }
}
