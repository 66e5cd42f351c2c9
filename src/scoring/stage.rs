use super::aggregator::ScoreAggregator;
use crate::config::ScoringConfig;
use crate::errors::Result;
use crate::event::Event;
use crate::pipeline::{EventMatcher, PipelineResult};
use crate::policy::AuthorPolicy;
use tracing::trace;

/// Pipeline stage that scores extracted content with a [`ScoreAggregator`].
///
/// Filtered results and results without content pass through unchanged.
/// Slash commands and bot-authored content, as recognised by the
/// [`AuthorPolicy`], get a zero report.
#[derive(Debug)]
pub struct ScoringStage {
    aggregator: ScoreAggregator,
    policy: AuthorPolicy,
    matcher: EventMatcher,
}

impl ScoringStage {
    pub fn new(aggregator: ScoreAggregator, policy: AuthorPolicy) -> Self {
        Self {
            aggregator,
            policy,
            matcher: EventMatcher::Any,
        }
    }

    pub fn from_config(config: &ScoringConfig, policy: AuthorPolicy) -> Result<Self> {
        Ok(Self::new(ScoreAggregator::from_config(config)?, policy))
    }

    pub fn accepting(mut self, matcher: EventMatcher) -> Self {
        self.matcher = matcher;
        self
    }

    pub fn name(&self) -> &str {
        "scoring"
    }

    pub fn matcher(&self) -> &EventMatcher {
        &self.matcher
    }

    pub fn aggregator(&self) -> &ScoreAggregator {
        &self.aggregator
    }

    pub fn policy(&self) -> &AuthorPolicy {
        &self.policy
    }

    fn earns_nothing(&self, result: &PipelineResult, content: &str) -> bool {
        let author_type = result.author_type.as_deref();
        self.policy.is_command(content)
            || match result.author.as_deref() {
                Some(author) => self.policy.is_bot(author, author_type),
                None => author_type.is_some_and(|kind| kind.eq_ignore_ascii_case("bot")),
            }
    }

    pub fn transform(&self, event: &Event, result: &PipelineResult) -> PipelineResult {
        let content = match result.content.as_deref() {
            Some(content) if !result.filtered && !content.is_empty() => content,
            _ => return result.clone(),
        };

        let report = if self.earns_nothing(result, content) {
            self.aggregator.zero_report()
        } else {
            self.aggregator.score(content)
        };
        trace!(
            event_id = %event.id(),
            score = report.normalized_score,
            "scored content"
        );

        PipelineResult {
            score: Some(report),
            ..result.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::FilterReason;
    use crate::scoring::aggregator::AggregationStrategy;
    use crate::scoring::scorers::{FnScorer, Scorer};
    use serde_json::json;

    fn stage() -> ScoringStage {
        let scorers: Vec<(Box<dyn Scorer>, f64)> =
            vec![(Box::new(FnScorer::new("half", |_: &str| 0.5)) as Box<dyn Scorer>, 1.0)];
        ScoringStage::new(
            ScoreAggregator::new(scorers, AggregationStrategy::WeightedAverage).unwrap(),
            AuthorPolicy::default(),
        )
    }

    fn event() -> Event {
        Event::now("e", "s", "github.issue_comment.created", json!({}))
    }

    #[test]
    fn test_scores_content() {
        let input = PipelineResult {
            content: Some("looks good".into()),
            author: Some("alice".into()),
            ..PipelineResult::default()
        };
        let output = stage().transform(&event(), &input);
        let report = output.score.expect("score attached");
        assert_eq!(report.normalized_score, 0.5);
        assert_eq!(report.breakdown.len(), 1);
        assert_eq!(output.author.as_deref(), Some("alice"));
    }

    #[test]
    fn test_skips_filtered_content() {
        let input = PipelineResult {
            filtered: true,
            reason: Some(FilterReason::Bot),
            content: Some("automated".into()),
            ..PipelineResult::default()
        };
        assert_eq!(stage().transform(&event(), &input), input);
    }

    #[test]
    fn test_skips_missing_content() {
        let input = PipelineResult {
            reason: Some(FilterReason::NoContent),
            ..PipelineResult::default()
        };
        assert_eq!(stage().transform(&event(), &input), input);
    }

    #[test]
    fn test_slash_command_scores_zero() {
        let input = PipelineResult {
            content: Some("/approve".into()),
            author: Some("alice".into()),
            ..PipelineResult::default()
        };
        let report = stage().transform(&event(), &input).score.expect("score attached");
        assert_eq!(report.normalized_score, 0.0);
        assert_eq!(report.raw_score, 0.0);
        assert_eq!(report.breakdown.len(), 1);
        assert_eq!(report.breakdown[0].score, 0.0);
    }

    #[test]
    fn test_bot_author_scores_zero() {
        let input = PipelineResult {
            content: Some("Bumps serde from 1.0.1 to 1.0.2".into()),
            author: Some("renovate[bot]".into()),
            ..PipelineResult::default()
        };
        let report = stage().transform(&event(), &input).score.expect("score attached");
        assert_eq!(report.normalized_score, 0.0);
    }

    #[test]
    fn test_bot_account_type_scores_zero() {
        let input = PipelineResult {
            content: Some("Coverage report attached".into()),
            author: Some("ci".into()),
            author_type: Some("Bot".into()),
            ..PipelineResult::default()
        };
        let report = stage().transform(&event(), &input).score.expect("score attached");
        assert_eq!(report.normalized_score, 0.0);
    }

    #[test]
    fn test_permissive_policy_scores_commands() {
        let scorers: Vec<(Box<dyn Scorer>, f64)> =
            vec![(Box::new(FnScorer::new("half", |_: &str| 0.5)) as Box<dyn Scorer>, 1.0)];
        let stage = ScoringStage::new(
            ScoreAggregator::new(scorers, AggregationStrategy::WeightedAverage).unwrap(),
            AuthorPolicy::permissive(),
        );
        let input = PipelineResult {
            content: Some("/approve".into()),
            ..PipelineResult::default()
        };
        let report = stage.transform(&event(), &input).score.expect("score attached");
        assert_eq!(report.normalized_score, 0.5);
    }

    #[test]
    fn test_from_config() {
        let stage =
            ScoringStage::from_config(&ScoringConfig::default(), AuthorPolicy::default()).unwrap();
        assert_eq!(stage.aggregator().scorer_count(), 2);
    }
}
