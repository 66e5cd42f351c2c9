//! Content filtering.
//!
//! The [`ContentFilterStage`] pulls plain text and an author out of an event
//! payload and decides whether the content should be scored. A missing body
//! is not a rejection: it is tagged [`FilterReason::NoContent`] and simply
//! carries no text.

pub mod extract;
pub mod stage;

pub use extract::{extract, Extracted};
pub use stage::ContentFilterStage;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Why content was not scored.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum FilterReason {
    NoContent,
    Bot,
    ExcludedUser,
    TooShort,
    /// The regex that matched.
    Pattern(String),
}

impl fmt::Display for FilterReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoContent => f.write_str("no-content"),
            Self::Bot => f.write_str("bot"),
            Self::ExcludedUser => f.write_str("excluded-user"),
            Self::TooShort => f.write_str("too-short"),
            Self::Pattern(pattern) => write!(f, "pattern:{}", pattern),
        }
    }
}

impl From<FilterReason> for String {
    fn from(reason: FilterReason) -> Self {
        reason.to_string()
    }
}

impl TryFrom<String> for FilterReason {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "no-content" => Ok(Self::NoContent),
            "bot" => Ok(Self::Bot),
            "excluded-user" => Ok(Self::ExcludedUser),
            "too-short" => Ok(Self::TooShort),
            other => other
                .strip_prefix("pattern:")
                .map(|pattern| Self::Pattern(pattern.to_string()))
                .ok_or_else(|| format!("unknown filter reason '{}'", other)),
        }
    }
}
