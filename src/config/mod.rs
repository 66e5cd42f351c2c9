//! Configuration for threadscore.
//!
//! A `.threadscore.toml` file has four optional sections:
//!
//! ```toml
//! [filter]
//! exclude_bots = true
//! min_length = 3
//! exclude_users = ["release-manager"]
//! filter_patterns = ["(?i)^lgtm$"]
//!
//! [policy]
//! bot_suffixes = ["[bot]", "-bot"]
//! command_prefixes = ["/"]
//!
//! [scoring]
//! strategy = "weighted-average"
//!
//! [[scoring.scorers]]
//! kind = "word-count"
//! weight = 0.7
//! curve = "exponential"
//!
//! [grouping]
//! enabled = true
//! scope = "acme/widgets#7"
//! ```
//!
//! Every field has a default, so an empty file is a valid configuration.

mod core;
mod loader;
mod scoring;

pub use self::core::{FilterConfig, GroupingConfig, ThreadScoreConfig};
pub use loader::{
    directory_ancestors, load_config, load_config_from, load_config_from_path,
    parse_and_validate_config, validate_config, CONFIG_FILE_NAME,
};
pub use scoring::{ScorerConfig, ScoringConfig};
