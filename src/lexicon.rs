//! Alternatives lexicon: accepted surface forms of slot values.
//!
//! Read-only after construction and shared across threads. The lexicon is
//! keyed by slot, then by canonical value:
//!
//! ```json
//! { "area": { "city centre": ["downtown", ["city", "center"]] } }
//! ```
//!
//! A plain string is a phrase; a list is a group of tokens that must all
//! appear. The compiled-in default is available through [`builtin`].

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::normalize::canonical_value;

/// One alternative surface form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Alternative {
    /// A single word or phrase.
    Phrase(String),
    /// Tokens that must all be present.
    Tokens(Vec<String>),
}

impl Alternative {
    /// The alternative's components: one phrase, or each token of a group.
    #[must_use]
    pub fn parts(&self) -> Vec<&str> {
        match self {
            Self::Phrase(phrase) => vec![phrase.as_str()],
            Self::Tokens(tokens) => tokens.iter().map(String::as_str).collect(),
        }
    }
}

impl From<&str> for Alternative {
    fn from(phrase: &str) -> Self {
        Self::Phrase(phrase.to_string())
    }
}

/// Read-only source of alternative phrasings.
///
/// Implementations must be cheap to query and safe to share.
pub trait Lexicon: Send + Sync {
    /// Alternatives for a canonical value of a slot (empty if unknown).
    fn alternatives(&self, slot: &str, value: &str) -> &[Alternative];

    /// Whether the lexicon has alternatives for this slot value.
    fn contains(&self, slot: &str, value: &str) -> bool {
        !self.alternatives(slot, value).is_empty()
    }

    /// Source identifier (for diagnostics).
    fn source(&self) -> &str;

    /// Number of (slot, value) entries.
    fn len(&self) -> usize;

    /// Check if lexicon is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// HashMap-backed lexicon loaded from JSON.
#[derive(Debug, Clone, Default)]
pub struct AlternativesLexicon {
    entries: HashMap<String, HashMap<String, Vec<Alternative>>>,
    source: String,
}

impl AlternativesLexicon {
    /// Create a new empty lexicon with the given source identifier.
    #[must_use]
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            entries: HashMap::new(),
            source: source.into(),
        }
    }

    /// Add alternatives for a slot value; the value is canonicalized.
    pub fn insert(
        &mut self,
        slot: impl Into<String>,
        value: &str,
        alternatives: impl IntoIterator<Item = Alternative>,
    ) {
        self.entries
            .entry(slot.into())
            .or_default()
            .entry(canonical_value(value))
            .or_default()
            .extend(alternatives);
    }

    /// Parse a lexicon from its JSON form.
    pub fn from_json_str(json: &str, source: impl Into<String>) -> Result<Self> {
        let raw: HashMap<String, HashMap<String, Vec<Alternative>>> = serde_json::from_str(json)
            .map_err(|e| Error::parse(format!("alternatives lexicon: {e}")))?;

        let mut lexicon = Self::new(source);
        for (slot, values) in raw {
            for (value, alternatives) in values {
                lexicon.insert(slot.as_str(), &value, alternatives);
            }
        }
        Ok(lexicon)
    }

    /// Load a lexicon from a JSON file.
    ///
    /// Fails with [`Error::ResourceNotFound`] if the file does not exist.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::resource_not_found(format!(
                "alternatives lexicon {}",
                path.display()
            )));
        }
        let json = std::fs::read_to_string(path)?;
        let lexicon = Self::from_json_str(&json, path.display().to_string())?;
        log::info!(
            "loaded {} lexicon entries from {}",
            lexicon.len(),
            path.display()
        );
        Ok(lexicon)
    }
}

impl Lexicon for AlternativesLexicon {
    fn alternatives(&self, slot: &str, value: &str) -> &[Alternative] {
        self.entries
            .get(slot)
            .and_then(|values| values.get(value))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    fn source(&self) -> &str {
        &self.source
    }

    fn len(&self) -> usize {
        self.entries.values().map(HashMap::len).sum()
    }
}

/// Lexicon with no entries.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyLexicon;

impl Lexicon for EmptyLexicon {
    fn alternatives(&self, _slot: &str, _value: &str) -> &[Alternative] {
        &[]
    }

    fn source(&self) -> &str {
        "empty"
    }

    fn len(&self) -> usize {
        0
    }
}

static BUILTIN: Lazy<Arc<AlternativesLexicon>> = Lazy::new(|| {
    Arc::new(
        AlternativesLexicon::from_json_str(include_str!("../resources/alternatives.json"), "builtin")
            .expect("embedded alternatives.json is invalid"),
    )
});

/// The compiled-in alternatives lexicon, parsed once per process.
#[must_use]
pub fn builtin() -> Arc<AlternativesLexicon> {
    Arc::clone(&BUILTIN)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_builtin_loads() {
        let lex = builtin();
        assert!(!lex.is_empty());
        assert!(lex.contains("area", "city centre"));
        assert!(!lex.contains("area", "atlantis"));
        assert!(!lex.contains("nonexistent", "city centre"));
    }

    #[test]
    fn test_token_group_alternative() {
        let lex = builtin();
        let alts = lex.alternatives("area", "city centre");
        assert!(alts.contains(&Alternative::Tokens(vec!["city".into(), "center".into()])));
        assert!(alts.contains(&Alternative::from("downtown")));
    }

    #[test]
    fn test_insert_canonicalizes_value() {
        let mut lex = AlternativesLexicon::new("test");
        lex.insert("eattype", "Coffee-Shop", [Alternative::from("café")]);
        assert_eq!(lex.alternatives("eattype", "coffee shop").len(), 1);
        assert_eq!(lex.source(), "test");
        assert_eq!(lex.len(), 1);
    }

    #[test]
    fn test_from_path_missing_is_resource_not_found() {
        let err = AlternativesLexicon::from_path("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, Error::ResourceNotFound(_)));
    }

    #[test]
    fn test_from_path_malformed_is_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();
        let err = AlternativesLexicon::from_path(file.path()).unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
    }

    #[test]
    fn test_from_path_roundtrip() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"food": {{"italian": ["pasta", ["wood", "fired"]]}}}}"#).unwrap();
        let lex = AlternativesLexicon::from_path(file.path()).unwrap();
        let parts: Vec<Vec<&str>> = lex
            .alternatives("food", "italian")
            .iter()
            .map(Alternative::parts)
            .collect();
        assert_eq!(parts, vec![vec!["pasta"], vec!["wood", "fired"]]);
    }

    #[test]
    fn test_empty_lexicon() {
        assert!(EmptyLexicon.is_empty());
        assert!(EmptyLexicon.alternatives("area", "riverside").is_empty());
    }
}
