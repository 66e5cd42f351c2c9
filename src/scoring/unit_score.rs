//! Normalized `[0, 1]` score newtype.
//!
//! Every scorer in an ensemble reports on this scale. Wrapping the value
//! means a scorer that overshoots (or returns NaN) cannot skew the
//! aggregate.

use serde::{Deserialize, Serialize};

/// Score on 0-1 scale.
///
/// Values are clamped to [0.0, 1.0]; non-finite input becomes 0.0.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
pub struct UnitScore(f64);

impl UnitScore {
    /// Create a new score, clamping to [0.0, 1.0].
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use threadscore::scoring::UnitScore;
    /// assert_eq!(UnitScore::new(0.4).value(), 0.4);
    /// assert_eq!(UnitScore::new(7.0).value(), 1.0);
    /// assert_eq!(UnitScore::new(f64::NAN).value(), 0.0);
    /// ```
    pub fn new(value: f64) -> Self {
        if value.is_finite() {
            Self(value.clamp(0.0, 1.0))
        } else {
            Self(0.0)
        }
    }

    /// Get the raw f64 value.
    pub fn value(self) -> f64 {
        self.0
    }

    pub fn zero() -> Self {
        Self(0.0)
    }

    pub fn one() -> Self {
        Self(1.0)
    }
}

impl From<UnitScore> for f64 {
    fn from(score: UnitScore) -> f64 {
        score.0
    }
}
