//! Exact decimal evidence scores.
//!
//! Scores and thresholds are exact decimals in `[0, 1]`. Threshold
//! comparisons and the QA soundness check rely on exact equality between a
//! stored dyad score and a freshly recomputed minimum, so binary floating
//! point is never used here.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// An exact decimal score in `[0, 1]`.
///
/// # Examples
///
/// ```
/// use dyadgraph::Score;
///
/// let a: Score = "0.6".parse().unwrap();
/// let b: Score = "0.5".parse().unwrap();
/// assert_eq!(a.min(b), b);
/// assert!("1.5".parse::<Score>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Score(Decimal);

impl Score {
    /// Creates a score, validating the `[0, 1]` range.
    pub fn new(value: Decimal) -> Result<Self, ValidationError> {
        if value < Decimal::ZERO || value > Decimal::ONE {
            return Err(ValidationError::ScoreOutOfRange { value });
        }
        Ok(Self(value))
    }

    /// Parses a score from its decimal lexical form.
    ///
    /// A lexical value that is not a decimal is an error, never a silent
    /// default.
    pub fn parse(lexical: &str) -> Result<Self, ValidationError> {
        let value = Decimal::from_str(lexical.trim()).map_err(|_| {
            ValidationError::MalformedScore {
                lexical: lexical.to_string(),
            }
        })?;
        Self::new(value)
    }

    /// The zero score.
    #[must_use]
    pub const fn zero() -> Self {
        Self(Decimal::ZERO)
    }

    /// The maximum score.
    #[must_use]
    pub const fn one() -> Self {
        Self(Decimal::ONE)
    }

    /// Returns the underlying decimal value.
    #[must_use]
    pub const fn value(self) -> Decimal {
        self.0
    }

    /// Returns the smaller of two scores (exact comparison).
    #[must_use]
    pub fn min(self, other: Self) -> Self {
        if self.0 <= other.0 {
            self
        } else {
            other
        }
    }

    /// Lexical form suitable for a decimal-typed literal.
    ///
    /// Preserves the stored scale, so `0.50` stays `0.50`.
    #[must_use]
    pub fn lexical(&self) -> String {
        self.0.to_string()
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Score {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<Score> for Decimal {
    fn from(score: Score) -> Self {
        score.value()
    }
}
