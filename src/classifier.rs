//! Lexical category classification by hypernym lookup.
//!
//! The `food` slot's last resort is asking whether any word in the utterance
//! is *a kind of* food. That needs a word-sense inventory, which the engine
//! does not depend on directly; it goes through [`LexicalClassifier`].
//!
//! # Sense inventories
//!
//! A word maps to its senses in frequency order; each sense is a chain of
//! hypernym levels walked upward, each level a set of lemmas:
//!
//! ```text
//! "fries" ─ sense 1: potato → root vegetable → vegetable → produce → food ✓
//! "fish"  ─ sense 1: aquatic vertebrate → vertebrate → chordate → animal
//!         └ sense 2: food ✓
//! "coffee"─ sense 1: beverage ✗ (stop lemma)
//! ```
//!
//! Only the first `sense_limit` senses count: rare senses ("center" as a
//! dish, "green" as a vegetable) would otherwise make almost anything food.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Lemmas that end a hypernym walk without a match.
pub const DEFAULT_STOP_LEMMAS: &[&str] = &["vitamin", "beverage"];

/// Decides whether a word belongs to a lexical category.
pub trait LexicalClassifier: Send + Sync {
    /// Whether `word` has `category` as a hypernym within its first `sense_limit` senses.
    fn has_hypernym(&self, word: &str, category: &str, sense_limit: usize) -> bool;

    /// Name for diagnostics.
    fn name(&self) -> &str;
}

/// Classifier that never matches.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLexicalClassifier;

impl LexicalClassifier for NoLexicalClassifier {
    fn has_hypernym(&self, _word: &str, _category: &str, _sense_limit: usize) -> bool {
        false
    }

    fn name(&self) -> &str {
        "none"
    }
}

/// One hypernym level: the lemmas of a synset.
pub type HypernymLevel = Vec<String>;

/// A sense: its hypernym chain from the nearest ancestor upward.
pub type Sense = Vec<HypernymLevel>;

/// Data-driven classifier over a word → senses inventory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SenseInventoryClassifier {
    senses: HashMap<String, Vec<Sense>>,
    #[serde(default = "default_stop_lemmas")]
    stop_lemmas: Vec<String>,
}

fn default_stop_lemmas() -> Vec<String> {
    DEFAULT_STOP_LEMMAS.iter().map(|s| (*s).to_string()).collect()
}

impl Default for SenseInventoryClassifier {
    fn default() -> Self {
        Self {
            senses: HashMap::new(),
            stop_lemmas: default_stop_lemmas(),
        }
    }
}

impl SenseInventoryClassifier {
    /// Create an empty inventory with the default stop lemmas.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a sense for a word (appended after existing senses).
    pub fn add_sense(&mut self, word: impl Into<String>, chain: Sense) {
        self.senses.entry(word.into()).or_default().push(chain);
    }

    /// Replace the stop lemmas.
    #[must_use]
    pub fn with_stop_lemmas(mut self, lemmas: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.stop_lemmas = lemmas.into_iter().map(Into::into).collect();
        self
    }

    /// Parse an inventory from JSON (`{"word": [[["lemma", ...], ...], ...]}`).
    pub fn from_json_str(json: &str) -> Result<Self> {
        let senses: HashMap<String, Vec<Sense>> = serde_json::from_str(json)
            .map_err(|e| Error::parse(format!("sense inventory: {e}")))?;
        Ok(Self {
            senses,
            stop_lemmas: default_stop_lemmas(),
        })
    }

    /// Load an inventory from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::resource_not_found(format!(
                "sense inventory {}",
                path.display()
            )));
        }
        let inventory = Self::from_json_str(&std::fs::read_to_string(path)?)?;
        log::info!(
            "loaded senses for {} words from {}",
            inventory.len(),
            path.display()
        );
        Ok(inventory)
    }

    /// Number of words with at least one sense.
    #[must_use]
    pub fn len(&self) -> usize {
        self.senses.len()
    }

    /// Whether the inventory is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.senses.is_empty()
    }

    fn is_stop(&self, level: &HypernymLevel) -> bool {
        level.iter().any(|lemma| self.stop_lemmas.contains(lemma))
    }
}

impl LexicalClassifier for SenseInventoryClassifier {
    fn has_hypernym(&self, word: &str, category: &str, sense_limit: usize) -> bool {
        let Some(senses) = self.senses.get(word) else {
            return false;
        };

        for chain in senses.iter().take(sense_limit) {
            for level in chain {
                if level.iter().any(|lemma| lemma == category) {
                    return true;
                }
                if self.is_stop(level) {
                    break;
                }
            }
        }
        false
    }

    fn name(&self) -> &str {
        "sense-inventory"
    }
}

static BUILTIN: Lazy<Arc<SenseInventoryClassifier>> = Lazy::new(|| {
    Arc::new(
        SenseInventoryClassifier::from_json_str(include_str!("../resources/food_senses.json"))
            .expect("embedded food_senses.json is invalid"),
    )
});

/// The compiled-in food sense inventory.
#[must_use]
pub fn builtin() -> Arc<SenseInventoryClassifier> {
    Arc::clone(&BUILTIN)
}
