//! The fixed emotion vocabulary.
//!
//! Eight basic Plutchik emotions plus the ten compound dyads they combine
//! into. The vocabulary is closed: evidence carrying any other label is
//! rejected at resolution time rather than silently ignored.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::term::Iri;
use crate::vocab;

/// Whether an emotion is a basic input label or a derived dyad.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmotionKind {
    /// One of the eight basic emotions; carried by input evidence.
    Basic,
    /// A compound emotion; produced only by the rule engine.
    Dyad,
}

/// An emotion label from the fixed vocabulary.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Emotion {
    // Basic
    Joy,
    Trust,
    Fear,
    Surprise,
    Sadness,
    Disgust,
    Anger,
    Anticipation,
    // Dyads
    Love,
    Submission,
    Awe,
    Disapproval,
    Remorse,
    Contempt,
    Aggressiveness,
    Optimism,
    Hope,
    Pride,
}

/// The eight basic emotions, in Plutchik wheel order.
pub const BASIC_EMOTIONS: [Emotion; 8] = [
    Emotion::Joy,
    Emotion::Trust,
    Emotion::Fear,
    Emotion::Surprise,
    Emotion::Sadness,
    Emotion::Disgust,
    Emotion::Anger,
    Emotion::Anticipation,
];

impl Emotion {
    /// Returns whether this label is basic or a dyad.
    #[must_use]
    pub const fn kind(self) -> EmotionKind {
        match self {
            Self::Joy
            | Self::Trust
            | Self::Fear
            | Self::Surprise
            | Self::Sadness
            | Self::Disgust
            | Self::Anger
            | Self::Anticipation => EmotionKind::Basic,
            _ => EmotionKind::Dyad,
        }
    }

    /// Returns true for one of the eight basic emotions.
    #[must_use]
    pub const fn is_basic(self) -> bool {
        matches!(self.kind(), EmotionKind::Basic)
    }

    /// The canonical label string, e.g. `"Joy"`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Joy => "Joy",
            Self::Trust => "Trust",
            Self::Fear => "Fear",
            Self::Surprise => "Surprise",
            Self::Sadness => "Sadness",
            Self::Disgust => "Disgust",
            Self::Anger => "Anger",
            Self::Anticipation => "Anticipation",
            Self::Love => "Love",
            Self::Submission => "Submission",
            Self::Awe => "Awe",
            Self::Disapproval => "Disapproval",
            Self::Remorse => "Remorse",
            Self::Contempt => "Contempt",
            Self::Aggressiveness => "Aggressiveness",
            Self::Optimism => "Optimism",
            Self::Hope => "Hope",
            Self::Pride => "Pride",
        }
    }

    /// The IRI of this emotion in the `pl:` namespace.
    #[must_use]
    pub fn iri(self) -> Iri {
        Iri::from_static_parts(vocab::PL, self.as_str())
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Emotion {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Joy" => Ok(Self::Joy),
            "Trust" => Ok(Self::Trust),
            "Fear" => Ok(Self::Fear),
            "Surprise" => Ok(Self::Surprise),
            "Sadness" => Ok(Self::Sadness),
            "Disgust" => Ok(Self::Disgust),
            "Anger" => Ok(Self::Anger),
            "Anticipation" => Ok(Self::Anticipation),
            "Love" => Ok(Self::Love),
            "Submission" => Ok(Self::Submission),
            "Awe" => Ok(Self::Awe),
            "Disapproval" => Ok(Self::Disapproval),
            "Remorse" => Ok(Self::Remorse),
            "Contempt" => Ok(Self::Contempt),
            "Aggressiveness" => Ok(Self::Aggressiveness),
            "Optimism" => Ok(Self::Optimism),
            "Hope" => Ok(Self::Hope),
            "Pride" => Ok(Self::Pride),
            other => Err(ValidationError::UnknownEmotion {
                name: other.to_string(),
            }),
        }
    }
}
