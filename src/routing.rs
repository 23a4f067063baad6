//! Domain/slot routing: which matcher realizes which slot.
//!
//! # The Slot Polysemy Problem
//!
//! Datasets reuse slot names with different semantics:
//!
//! ```text
//! ┌──────────────┬──────────────────────┬──────────────────────────────┐
//! │ Domain       │ slot `type`          │ matcher                      │
//! ├──────────────┼──────────────────────┼──────────────────────────────┤
//! │ multiwoz     │ "guesthouse"         │ categorical, plurals allowed │
//! │ tv           │ "television"         │ categorical                  │
//! │ rest_e2e     │ (not used)           │ fallback                     │
//! └──────────────┴──────────────────────┴──────────────────────────────┘
//! ```
//!
//! # Solution: A Routing Table
//!
//! `(domain, slot) → MatcherDescriptor`, kept as data. A domain entry is
//! selected when its key occurs in the caller's domain identifier
//! (`"rest_e2e_cleaned"` selects `rest_e2e`); entries are tried in order and
//! the first hit wins. Slots a domain does not route, and unknown domains,
//! get [`MatcherDescriptor::Fallback`]: verbatim search.
//!
//! ```rust
//! use slotalign::routing::{MatcherDescriptor, RoutingTable};
//!
//! let table = RoutingTable::builtin();
//! assert!(matches!(table.route("multiwoz_hotel", "stars"), MatcherDescriptor::Numeric));
//! assert!(matches!(table.route("unknown", "stars"), MatcherDescriptor::Fallback));
//! ```

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

// =============================================================================
// Matcher descriptors
// =============================================================================

/// How a categorical value is expanded into candidate forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    /// The whole value.
    #[default]
    ExactMatch,
    /// Only the value's first word.
    FirstWord,
    /// Any single word of the value.
    AnyWord,
    /// All words of the value, in any order.
    AllWords,
}

fn default_true_value() -> String {
    "yes".to_string()
}

fn default_false_value() -> String {
    "no".to_string()
}

fn default_true() -> bool {
    true
}

/// Which matcher to apply to a slot, with its parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MatcherDescriptor {
    /// Yes/no slot realized through its mention stems.
    Boolean {
        /// Value meaning "true".
        #[serde(default = "default_true_value")]
        true_value: String,
        /// Value meaning "false".
        #[serde(default = "default_false_value")]
        false_value: String,
        /// Track contradictory mentions through a tri-state.
        #[serde(default)]
        negatable: bool,
    },
    /// Value or one of its lexicon alternatives.
    Categorical {
        /// Expansion mode.
        #[serde(default)]
        mode: MatchMode,
        /// Expansion mode under soft alignment.
        #[serde(default)]
        soft_mode: Option<MatchMode>,
        /// Also try plural forms.
        #[serde(default)]
        allow_plural: bool,
    },
    /// Cuisine: verbatim, fixed renamings, then lexical classification.
    Food,
    /// Bare number, digits or words.
    Numeric,
    /// Number followed by its unit.
    NumericWithUnit,
    /// Four-digit year or its short forms.
    Year,
    /// Ordinal value mapped through a rank table.
    Scalar {
        /// Under soft alignment, search only for the slot stem.
        #[serde(default)]
        stem_only_when_soft: bool,
    },
    /// Separator-delimited list of items.
    List {
        /// Per-item expansion mode.
        #[serde(default)]
        mode: MatchMode,
        /// Require every item (relaxed to any item under soft alignment).
        #[serde(default = "default_true")]
        match_all: bool,
        /// Items may be joined by "and"/"or" instead of commas.
        #[serde(default)]
        conjunctions: bool,
    },
    /// Verbatim search only.
    Fallback,
}

impl MatcherDescriptor {
    /// Short name for logs.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Boolean { .. } => "boolean",
            Self::Categorical { .. } => "categorical",
            Self::Food => "food",
            Self::Numeric => "numeric",
            Self::NumericWithUnit => "numeric_with_unit",
            Self::Year => "year",
            Self::Scalar { .. } => "scalar",
            Self::List { .. } => "list",
            Self::Fallback => "fallback",
        }
    }
}

static FALLBACK: MatcherDescriptor = MatcherDescriptor::Fallback;

// =============================================================================
// Routing table
// =============================================================================

/// Slot routes of one domain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainRoutes {
    /// Selected when this key occurs in the domain identifier.
    pub key: String,
    /// Slot name → matcher.
    pub slots: HashMap<String, MatcherDescriptor>,
}

impl DomainRoutes {
    /// Create an empty route set for a domain key.
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            slots: HashMap::new(),
        }
    }

    /// Route a slot to a matcher.
    #[must_use]
    pub fn with_slot(mut self, slot: impl Into<String>, matcher: MatcherDescriptor) -> Self {
        self.slots.insert(slot.into(), matcher);
        self
    }
}

/// Ordered list of domain route sets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutingTable {
    domains: Vec<DomainRoutes>,
}

static BUILTIN: Lazy<Arc<RoutingTable>> = Lazy::new(|| {
    Arc::new(
        RoutingTable::from_json_str(include_str!("../resources/routing.json"))
            .expect("embedded routing.json is invalid"),
    )
});

impl RoutingTable {
    /// An empty table: everything falls back to verbatim search.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The compiled-in table (restaurants, MultiWOZ, TV, laptop, video game,
    /// song, board game).
    #[must_use]
    pub fn builtin() -> Arc<RoutingTable> {
        Arc::clone(&BUILTIN)
    }

    /// Append a domain (tried after existing ones).
    #[must_use]
    pub fn with_domain(mut self, routes: DomainRoutes) -> Self {
        self.domains.push(routes);
        self
    }

    /// The route set selected for a domain identifier.
    #[must_use]
    pub fn domain(&self, domain: &str) -> Option<&DomainRoutes> {
        self.domains.iter().find(|d| domain.contains(d.key.as_str()))
    }

    /// The matcher for a (base) slot name in a domain.
    #[must_use]
    pub fn route(&self, domain: &str, slot: &str) -> &MatcherDescriptor {
        match self.domain(domain) {
            Some(routes) => routes.slots.get(slot).unwrap_or(&FALLBACK),
            None => {
                log::debug!("no routes for domain {domain:?}, {slot} falls back to verbatim");
                &FALLBACK
            }
        }
    }

    /// Domain keys in lookup order.
    pub fn domain_keys(&self) -> impl Iterator<Item = &str> {
        self.domains.iter().map(|d| d.key.as_str())
    }

    /// Parse from JSON.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let table: Self = serde_json::from_str(json)
            .map_err(|e| Error::parse(format!("routing table: {e}")))?;
        if let Some(empty) = table.domains.iter().find(|d| d.key.is_empty()) {
            return Err(Error::config(format!(
                "routing table has a domain with an empty key ({} slots)",
                empty.slots.len()
            )));
        }
        Ok(table)
    }

    /// Load from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::resource_not_found(format!(
                "routing table {}",
                path.display()
            )));
        }
        let table = Self::from_json_str(&std::fs::read_to_string(path)?)?;
        log::info!(
            "loaded routes for {} domains from {}",
            table.domains.len(),
            path.display()
        );
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_domains_in_order() {
        let table = RoutingTable::builtin();
        let keys: Vec<&str> = table.domain_keys().collect();
        assert_eq!(
            keys,
            vec!["rest_e2e", "multiwoz", "tv", "laptop", "video_game", "song", "board_game"]
        );
    }

    #[test]
    fn test_same_slot_different_domains() {
        let table = RoutingTable::builtin();
        assert_eq!(
            table.route("multiwoz", "type"),
            &MatcherDescriptor::Categorical {
                mode: MatchMode::ExactMatch,
                soft_mode: Some(MatchMode::FirstWord),
                allow_plural: true,
            }
        );
        assert_eq!(
            table.route("tv", "type"),
            &MatcherDescriptor::Categorical {
                mode: MatchMode::ExactMatch,
                soft_mode: Some(MatchMode::FirstWord),
                allow_plural: false,
            }
        );
        assert_eq!(table.route("rest_e2e", "type"), &MatcherDescriptor::Fallback);
    }

    #[test]
    fn test_domain_substring_selection() {
        let table = RoutingTable::builtin();
        assert_eq!(table.route("rest_e2e_cleaned", "food"), &MatcherDescriptor::Food);
        assert_eq!(table.route("", "food"), &MatcherDescriptor::Fallback);
    }

    #[test]
    fn test_descriptor_defaults() {
        let table = RoutingTable::builtin();
        match table.route("video_game", "platforms") {
            MatcherDescriptor::List {
                mode,
                match_all,
                conjunctions,
            } => {
                assert_eq!(*mode, MatchMode::FirstWord);
                assert!(*match_all);
                assert!(!*conjunctions);
            }
            other => panic!("unexpected matcher {other:?}"),
        }
        match table.route("song", "is_in_album") {
            MatcherDescriptor::Boolean {
                true_value,
                false_value,
                negatable,
            } => {
                assert_eq!(true_value, "yes");
                assert_eq!(false_value, "no");
                assert!(!negatable);
            }
            other => panic!("unexpected matcher {other:?}"),
        }
    }

    #[test]
    fn test_custom_domain_is_data() {
        let table = RoutingTable::new().with_domain(
            DomainRoutes::new("hotel_reviews").with_slot("stars", MatcherDescriptor::Numeric),
        );
        assert_eq!(table.route("hotel_reviews_v2", "stars").kind(), "numeric");
        assert_eq!(table.route("hotel_reviews_v2", "area").kind(), "fallback");
    }

    #[test]
    fn test_empty_key_rejected() {
        let err = RoutingTable::from_json_str(r#"{"domains": [{"key": "", "slots": {}}]}"#)
            .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
