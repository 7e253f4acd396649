//! The fixed dyad definition table.
//!
//! A dyad is a compound emotion defined as an ordered pair of basic
//! component emotions. The ten Plutchik dyads are static configuration:
//! the table is constructed once and passed into the engine, never mutated.

use serde::Serialize;

use crate::emotion::Emotion;
use crate::term::Iri;

/// A dyad: a compound emotion with its two ordered basic components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DyadDefinition {
    /// The compound emotion this dyad produces.
    pub name: Emotion,
    /// The two basic component emotions, in wheel order.
    pub components: [Emotion; 2],
}

impl DyadDefinition {
    /// The IRI of the dyad in the `pl:` namespace.
    #[must_use]
    pub fn iri(&self) -> Iri {
        self.name.iri()
    }
}

/// Immutable table of dyad definitions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DyadTable {
    definitions: Vec<DyadDefinition>,
}

impl DyadTable {
    /// The ten standard Plutchik primary dyads.
    #[must_use]
    pub fn standard() -> Self {
        use Emotion::{
            Aggressiveness, Anger, Anticipation, Awe, Contempt, Disapproval, Disgust, Fear,
            Hope, Joy, Love, Optimism, Pride, Remorse, Sadness, Submission, Surprise, Trust,
        };

        Self {
            definitions: vec![
                DyadDefinition { name: Love, components: [Joy, Trust] },
                DyadDefinition { name: Submission, components: [Trust, Fear] },
                DyadDefinition { name: Awe, components: [Fear, Surprise] },
                DyadDefinition { name: Disapproval, components: [Surprise, Sadness] },
                DyadDefinition { name: Remorse, components: [Sadness, Disgust] },
                DyadDefinition { name: Contempt, components: [Disgust, Anger] },
                DyadDefinition { name: Aggressiveness, components: [Anger, Anticipation] },
                DyadDefinition { name: Optimism, components: [Anticipation, Joy] },
                DyadDefinition { name: Hope, components: [Anticipation, Trust] },
                DyadDefinition { name: Pride, components: [Anger, Joy] },
            ],
        }
    }

    /// Iterates over the definitions in table order.
    pub fn iter(&self) -> impl Iterator<Item = &DyadDefinition> {
        self.definitions.iter()
    }

    /// Number of definitions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// Returns true if the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Looks up the definition for a dyad emotion.
    #[must_use]
    pub fn get(&self, name: Emotion) -> Option<&DyadDefinition> {
        self.definitions.iter().find(|d| d.name == name)
    }
}
