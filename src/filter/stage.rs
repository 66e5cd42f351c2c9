use super::extract::extract;
use super::FilterReason;
use crate::config::FilterConfig;
use crate::errors::{Error, Result};
use crate::event::Event;
use crate::pipeline::{EventMatcher, PipelineResult};
use crate::policy::AuthorPolicy;
use regex::Regex;
use std::collections::HashSet;
use tracing::debug;

/// Pipeline stage that extracts content from the payload and applies the
/// exclusion rules.
///
/// Rules run in a fixed order and the first match wins: bot author,
/// excluded user, minimum length, then each pattern.
#[derive(Debug, Clone)]
pub struct ContentFilterStage {
    exclude_bots: bool,
    exclude_users: HashSet<String>,
    min_length: usize,
    patterns: Vec<Regex>,
    policy: AuthorPolicy,
    matcher: EventMatcher,
}

impl ContentFilterStage {
    /// Build the stage. Fails when a pattern does not compile.
    pub fn from_config(config: &FilterConfig, policy: AuthorPolicy) -> Result<Self> {
        let patterns = config
            .filter_patterns
            .iter()
            .map(|p| Regex::new(p).map_err(|e| Error::invalid_pattern(p, e)))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            exclude_bots: config.exclude_bots,
            exclude_users: config
                .exclude_users
                .iter()
                .map(|user| user.to_lowercase())
                .collect(),
            min_length: config.min_length,
            patterns,
            policy,
            matcher: EventMatcher::Any,
        })
    }

    pub fn accepting(mut self, matcher: EventMatcher) -> Self {
        self.matcher = matcher;
        self
    }

    pub fn name(&self) -> &str {
        "content-filter"
    }

    pub fn matcher(&self) -> &EventMatcher {
        &self.matcher
    }

    pub fn policy(&self) -> &AuthorPolicy {
        &self.policy
    }

    pub fn transform(&self, event: &Event, result: &PipelineResult) -> PipelineResult {
        if result.filtered {
            return result.clone();
        }

        let Some(extracted) = extract(event) else {
            return PipelineResult {
                filtered: false,
                reason: Some(FilterReason::NoContent),
                ..result.clone()
            };
        };

        if let Some(reason) = self.rejection(
            &extracted.content,
            extracted.author.as_deref(),
            extracted.author_type.as_deref(),
        ) {
            debug!(event_id = %event.id(), reason = %reason, "content filtered");
            return PipelineResult {
                filtered: true,
                reason: Some(reason),
                ..result.clone()
            };
        }

        PipelineResult {
            filtered: false,
            reason: None,
            content: Some(extracted.content),
            author: extracted.author,
            author_type: extracted.author_type,
            ..result.clone()
        }
    }

    /// First rule that rejects the content, if any.
    pub fn rejection(
        &self,
        content: &str,
        author: Option<&str>,
        author_type: Option<&str>,
    ) -> Option<FilterReason> {
        if let Some(author) = author {
            if self.exclude_bots && self.policy.is_bot(author, author_type) {
                return Some(FilterReason::Bot);
            }
            if self.exclude_users.contains(&author.to_lowercase()) {
                return Some(FilterReason::ExcludedUser);
            }
        } else if self.exclude_bots
            && author_type.is_some_and(|kind| kind.eq_ignore_ascii_case("bot"))
        {
            return Some(FilterReason::Bot);
        }

        if content.trim().chars().count() < self.min_length {
            return Some(FilterReason::TooShort);
        }

        self.patterns
            .iter()
            .find(|pattern| pattern.is_match(content))
            .map(|pattern| FilterReason::Pattern(pattern.as_str().to_string()))
    }
}
