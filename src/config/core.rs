use serde::{Deserialize, Serialize};

use super::scoring::ScoringConfig;
use crate::policy::AuthorPolicy;

/// Root configuration structure for threadscore
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ThreadScoreConfig {
    /// Content filter thresholds
    #[serde(default)]
    pub filter: FilterConfig,

    /// Bot and slash-command recognition shared by every component
    #[serde(default)]
    pub policy: AuthorPolicy,

    /// Scorers and aggregation strategy
    #[serde(default)]
    pub scoring: ScoringConfig,

    /// Consecutive-comment grouping
    #[serde(default)]
    pub grouping: GroupingConfig,
}

/// Content filter configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterConfig {
    /// Reject content whose author the policy recognises as a bot
    #[serde(default = "default_exclude_bots")]
    pub exclude_bots: bool,

    /// Minimum trimmed content length in characters
    #[serde(default)]
    pub min_length: usize,

    /// Authors whose content is never scored (case-insensitive)
    #[serde(default)]
    pub exclude_users: Vec<String>,

    /// Regexes that reject matching content
    #[serde(default)]
    pub filter_patterns: Vec<String>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            exclude_bots: default_exclude_bots(),
            min_length: 0,
            exclude_users: Vec::new(),
            filter_patterns: Vec::new(),
        }
    }
}

fn default_exclude_bots() -> bool {
    true
}

/// Grouping configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupingConfig {
    /// When false every comment is scored on its own
    #[serde(default = "default_grouping_enabled")]
    pub enabled: bool,

    /// Scope prefix for source keys (e.g. `owner/repo#42`)
    #[serde(default = "default_grouping_scope")]
    pub scope: String,
}

impl Default for GroupingConfig {
    fn default() -> Self {
        Self {
            enabled: default_grouping_enabled(),
            scope: default_grouping_scope(),
        }
    }
}

fn default_grouping_enabled() -> bool {
    true
}

fn default_grouping_scope() -> String {
    "discussion".to_string()
}
