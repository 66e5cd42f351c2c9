//! Error types for threadscore.
//!
//! Two layers of failure exist in the crate:
//!
//! - [`Error`]: fatal problems surfaced to the caller, most importantly
//!   configuration errors (zero scorers, invalid filter patterns) which are
//!   returned from constructors rather than swallowed.
//! - [`StageError`]: a fault inside one stage's transform. The stage chain
//!   catches these, logs them, and continues with the previous result.
//!   `StageChain::execute_strict` returns the first one as [`Error::Stage`].
//!
//! Extraction misses and filter rejections are not errors at all; they are
//! recorded on the [`PipelineResult`](crate::pipeline::PipelineResult).

use thiserror::Error;

/// Main error type for threadscore operations
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid construction-time configuration
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A filter pattern failed to compile
    #[error("Invalid filter pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// A stage failed during strict chain execution
    #[error(transparent)]
    Stage(#[from] StageError),

    /// No chain registered under the requested identifier
    #[error("No stage chain registered for '{0}'")]
    UnknownChain(String),

    /// IO errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// TOML errors
    #[error(transparent)]
    Toml(#[from] toml::de::Error),
}

impl Error {
    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Create an invalid-pattern error
    pub fn invalid_pattern(pattern: impl Into<String>, source: regex::Error) -> Self {
        Self::InvalidPattern {
            pattern: pattern.into(),
            source,
        }
    }

    /// Whether this error stems from configuration supplied by the caller.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::Configuration(_) | Self::InvalidPattern { .. } | Self::Toml(_)
        )
    }
}

/// Result type alias using our error type
pub type Result<T> = std::result::Result<T, Error>;

/// A failure raised by a single stage's transform.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Stage '{stage}' failed: {message}")]
pub struct StageError {
    pub stage: String,
    pub message: String,
}

impl StageError {
    pub fn new(stage: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            stage: stage.into(),
            message: message.into(),
        }
    }
}
