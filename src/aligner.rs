//! Alignment orchestration and slot error scoring.
//!
//! # Pipeline
//!
//! ```text
//!  raw MR ──► canonicalize ──┐
//!                            ├──► mask names ──► per slot: route ──► matcher ──► fallback
//!  raw utt ─► canonicalize ──┘        │                                   │
//!                 │                   └─ name slots resolved here         ▼
//!                 └──── raw char map ◄─────────────── canonical byte offset
//! ```
//!
//! Both entry points share the pipeline:
//!
//! - [`SlotAligner::align`] returns every realized slot with its char
//!   offset in the raw utterance, sorted by offset.
//! - [`SlotAligner::score`] counts missing slot occurrences and slots with
//!   duplicate mentions, the inputs to slot error rate (SER).
//!
//! Matching never fails: an unknown domain routes every slot to verbatim
//! search, and anything not found is simply absent from the alignment.
//! Errors only come from building an aligner with bad configuration.
//!
//! # Example
//!
//! ```rust
//! use slotalign::{MeaningRepresentation, SlotAligner};
//!
//! let aligner = SlotAligner::new();
//! let mr = MeaningRepresentation::from_pairs([("name", "Aromi"), ("food", "Italian")]);
//!
//! let alignment = aligner.align(&mr, "Aromi serves Italian food.", "rest_e2e");
//! assert_eq!(alignment[0].slot, "name");
//! assert_eq!(alignment[1].offset, 13);
//!
//! let summary = aligner.score(&mr, "Aromi is nice.", "rest_e2e");
//! assert_eq!(summary.missing_slots, vec!["food"]);
//! ```

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use slotalign_core::{ErrorSummary, MeaningRepresentation, Sentinel, SlotAlignment, SlotValue};

use crate::classifier::{self, LexicalClassifier};
use crate::duplicates::{self, DuplicatePolicy};
use crate::error::{Error, Result};
use crate::lexicon::{self, Lexicon};
use crate::masking::{mask_named_entities, DEFAULT_NAME_SLOTS, ENTITY_NAME_SLOT};
use crate::matchers::keyword::{match_keyword, Keyword};
use crate::matchers::{boolean, categorical, food, list, numeric, scalar, universal};
use crate::matchers::{MatchContext, Realization};
use crate::mentions::{self, SlotMentions};
use crate::normalize::{canonicalize_mr, find_token, tokenize, CanonicalMr, CanonicalSlot, Utterance};
use crate::routing::{MatcherDescriptor, RoutingTable};

/// Pronouns that may refer back to the entity name.
const NAME_REFERENCES: &[&str] = &["it", "its", "they", "their", "this"];

fn default_sense_limit() -> usize {
    3
}

fn default_true() -> bool {
    true
}

fn default_name_slots() -> Vec<String> {
    DEFAULT_NAME_SLOTS.iter().map(|s| (*s).to_string()).collect()
}

/// Aligner configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlignerConfig {
    /// Relaxed matching: first-word categorical modes, any-item lists,
    /// stem-only scalars and stem-only sentinels.
    #[serde(default)]
    pub soft_align: bool,
    /// Let a pronoun realize the `name` slot.
    #[serde(default)]
    pub match_name_ref: bool,
    /// Do not flag repeated mentions of the entity name as duplicates.
    #[serde(default = "default_true")]
    pub ignore_name_slot_dupes: bool,
    /// Senses consulted per word by the lexical classifier.
    #[serde(default = "default_sense_limit")]
    pub hypernym_sense_limit: usize,
    /// Slots masked as named entities before matching.
    #[serde(default = "default_name_slots")]
    pub name_slots: Vec<String>,
}

impl Default for AlignerConfig {
    fn default() -> Self {
        Self {
            soft_align: false,
            match_name_ref: false,
            ignore_name_slot_dupes: true,
            hypernym_sense_limit: default_sense_limit(),
            name_slots: default_name_slots(),
        }
    }
}

impl AlignerConfig {
    /// Set soft alignment.
    #[must_use]
    pub fn with_soft_align(mut self, soft: bool) -> Self {
        self.soft_align = soft;
        self
    }

    /// Set pronoun matching for `name`.
    #[must_use]
    pub fn with_match_name_ref(mut self, enabled: bool) -> Self {
        self.match_name_ref = enabled;
        self
    }

    /// Set whether repeated entity names count as duplicates.
    #[must_use]
    pub fn with_ignore_name_slot_dupes(mut self, ignore: bool) -> Self {
        self.ignore_name_slot_dupes = ignore;
        self
    }

    /// Set the classifier's sense limit.
    #[must_use]
    pub fn with_hypernym_sense_limit(mut self, limit: usize) -> Self {
        self.hypernym_sense_limit = limit;
        self
    }

    /// Replace the name-slot set.
    #[must_use]
    pub fn with_name_slots(mut self, slots: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.name_slots = slots.into_iter().map(Into::into).collect();
        self
    }

    /// Check the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.hypernym_sense_limit == 0 {
            return Err(Error::config("hypernym_sense_limit must be at least 1"));
        }
        if let Some(empty) = self.name_slots.iter().find(|s| s.trim().is_empty()) {
            return Err(Error::config(format!("invalid name slot {empty:?}")));
        }
        Ok(())
    }
}

// =============================================================================
// Aligner
// =============================================================================

/// Slot aligner: locates MR slots in utterances and scores them.
///
/// Immutable once built; share it across threads freely.
pub struct SlotAligner {
    config: AlignerConfig,
    name_slots: HashSet<String>,
    lexicon: Arc<dyn Lexicon>,
    classifier: Arc<dyn LexicalClassifier>,
    routing: Arc<RoutingTable>,
    mentions: Arc<SlotMentions>,
    duplicates: Arc<DuplicatePolicy>,
}

/// Builder for [`SlotAligner`]. Unset components use the compiled-in defaults.
#[derive(Default)]
pub struct SlotAlignerBuilder {
    config: AlignerConfig,
    lexicon: Option<Arc<dyn Lexicon>>,
    classifier: Option<Arc<dyn LexicalClassifier>>,
    routing: Option<Arc<RoutingTable>>,
    mentions: Option<Arc<SlotMentions>>,
    duplicates: Option<Arc<DuplicatePolicy>>,
}

impl SlotAlignerBuilder {
    /// Set the configuration.
    #[must_use]
    pub fn config(mut self, config: AlignerConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the alternatives lexicon.
    #[must_use]
    pub fn lexicon(mut self, lexicon: Arc<dyn Lexicon>) -> Self {
        self.lexicon = Some(lexicon);
        self
    }

    /// Set the lexical classifier used for `food`.
    #[must_use]
    pub fn classifier(mut self, classifier: Arc<dyn LexicalClassifier>) -> Self {
        self.classifier = Some(classifier);
        self
    }

    /// Set the routing table.
    #[must_use]
    pub fn routing(mut self, routing: Arc<RoutingTable>) -> Self {
        self.routing = Some(routing);
        self
    }

    /// Set the slot-mention stems.
    #[must_use]
    pub fn mentions(mut self, mentions: Arc<SlotMentions>) -> Self {
        self.mentions = Some(mentions);
        self
    }

    /// Set the duplicate policy.
    #[must_use]
    pub fn duplicates(mut self, duplicates: Arc<DuplicatePolicy>) -> Self {
        self.duplicates = Some(duplicates);
        self
    }

    /// Validate the configuration and build.
    pub fn build(self) -> Result<SlotAligner> {
        self.config.validate()?;
        let name_slots = self.config.name_slots.iter().cloned().collect();
        let lex: Arc<dyn Lexicon> = match self.lexicon {
            Some(lex) => lex,
            None => lexicon::builtin(),
        };
        let hypernyms: Arc<dyn LexicalClassifier> = match self.classifier {
            Some(c) => c,
            None => classifier::builtin(),
        };
        Ok(SlotAligner {
            config: self.config,
            name_slots,
            lexicon: lex,
            classifier: hypernyms,
            routing: self.routing.unwrap_or_else(RoutingTable::builtin),
            mentions: self.mentions.unwrap_or_else(mentions::builtin),
            duplicates: self.duplicates.unwrap_or_else(duplicates::builtin),
        })
    }
}

/// Everything both entry points need after matching.
struct Analysis {
    utterance: Utterance,
    mr: CanonicalMr,
    /// One entry per MR slot, in MR order.
    realizations: Vec<Option<Realization>>,
}

impl Default for SlotAligner {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SlotAligner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SlotAligner")
            .field("config", &self.config)
            .field("lexicon", &self.lexicon.source())
            .field("classifier", &self.classifier.name())
            .field("domains", &self.routing.domain_keys().collect::<Vec<_>>())
            .finish()
    }
}

impl SlotAligner {
    /// Aligner with the default configuration and compiled-in resources.
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: AlignerConfig::default(),
            name_slots: DEFAULT_NAME_SLOTS.iter().map(|s| (*s).to_string()).collect(),
            lexicon: lexicon::builtin(),
            classifier: classifier::builtin(),
            routing: RoutingTable::builtin(),
            mentions: mentions::builtin(),
            duplicates: duplicates::builtin(),
        }
    }

    /// Create a builder for custom configuration.
    #[must_use]
    pub fn builder() -> SlotAlignerBuilder {
        SlotAlignerBuilder::default()
    }

    /// Aligner with a custom configuration and compiled-in resources.
    pub fn with_config(config: AlignerConfig) -> Result<Self> {
        Self::builder().config(config).build()
    }

    /// The configuration.
    #[must_use]
    pub fn config(&self) -> &AlignerConfig {
        &self.config
    }

    /// Locate every realized slot.
    ///
    /// Offsets are char indices into `utterance`; the list is sorted by
    /// offset (stable for ties). Slot names lose their numeric suffix.
    #[must_use]
    pub fn align(
        &self,
        mr: &MeaningRepresentation,
        utterance: &str,
        domain: &str,
    ) -> Vec<SlotAlignment> {
        let analysis = self.analyze(mr, utterance, domain, false);

        let mut alignment: Vec<SlotAlignment> = analysis
            .mr
            .slots
            .iter()
            .zip(&analysis.realizations)
            .filter_map(|(slot, realization)| {
                realization.map(|r| {
                    SlotAlignment::new(
                        slot.base_name(),
                        slot.value.text(),
                        analysis.utterance.to_raw_offset(r.pos),
                    )
                })
            })
            .collect();
        alignment.sort_by_key(|a| a.offset);
        alignment
    }

    /// Count missing and duplicated slot mentions.
    #[must_use]
    pub fn score(&self, mr: &MeaningRepresentation, utterance: &str, domain: &str) -> ErrorSummary {
        let analysis = self.analyze(mr, utterance, domain, true);
        let mr = &analysis.mr;

        let mut expected: HashMap<&str, usize> = mr.name_counts();
        let mut duplicate_slots: Vec<String> = Vec::new();

        for (slot, realization) in mr.slots.iter().zip(&analysis.realizations) {
            let Some(realization) = realization else {
                continue;
            };
            if let Some(left) = expected.get_mut(slot.name.as_str()) {
                *left = left.saturating_sub(1);
            }
            let is_dupe = self.duplicates.reevaluate(realization.is_dupe, slot, mr);
            if is_dupe && !duplicate_slots.contains(&slot.label) {
                log::debug!("duplicate mention: {}={:?}", slot.label, slot.value.text());
                duplicate_slots.push(slot.label.clone());
            }
        }

        // one entry per unrealized occurrence, in MR order
        let mut missing_slots = Vec::new();
        for slot in &mr.slots {
            if let Some(left) = expected.get_mut(slot.name.as_str()) {
                if *left > 0 {
                    *left -= 1;
                    missing_slots.push(slot.label.clone());
                }
            }
        }

        ErrorSummary {
            num_errors: missing_slots.len() + duplicate_slots.len(),
            missing_slots,
            duplicate_slots,
            num_content_slots: mr.len(),
        }
    }

    fn analyze(
        &self,
        mr: &MeaningRepresentation,
        utterance: &str,
        domain: &str,
        scoring: bool,
    ) -> Analysis {
        let canonical = canonicalize_mr(mr);
        let utterance = Utterance::new(utterance);
        let masked = mask_named_entities(
            &canonical,
            utterance.text(),
            &self.name_slots,
            self.config.ignore_name_slot_dupes,
        );

        let realizations: Vec<Option<Realization>> = {
            let tokens = tokenize(&masked.text);
            let present = masked.mr.slot_names();
            let name_counts = masked.mr.name_counts();
            let ctx = MatchContext {
                text: &masked.text,
                tokens: &tokens,
                lexicon: self.lexicon.as_ref(),
                mentions: self.mentions.as_ref(),
                present_slots: &present,
                soft: self.config.soft_align,
            };

            masked
                .mr
                .slots
                .iter()
                .map(|slot| match &slot.value {
                    SlotValue::Masked(masked_value) => Some(Realization {
                        pos: masked_value.pos,
                        is_dupe: masked_value.is_dupe,
                    }),
                    SlotValue::Text(value) => {
                        let ignore_dupes = scoring
                            && name_counts.get(slot.name.as_str()).copied().unwrap_or(0) > 1;
                        self.find_slot_realization(&ctx, slot, value, domain, ignore_dupes)
                    }
                })
                .collect()
        };

        Analysis {
            utterance,
            mr: masked.mr,
            realizations,
        }
    }

    /// Realize one unmasked slot.
    fn find_slot_realization(
        &self,
        ctx: &MatchContext<'_>,
        slot: &CanonicalSlot,
        value: &str,
        domain: &str,
        ignore_dupes: bool,
    ) -> Option<Realization> {
        let name = slot.base_name();

        match Sentinel::from_value(value) {
            Some(Sentinel::DontCare) => return universal::match_dontcare(ctx, name, ignore_dupes),
            Some(Sentinel::None) => return universal::match_none(ctx, name),
            Some(Sentinel::Empty) => return universal::match_elided(ctx, name, ignore_dupes),
            None => {}
        }

        if name == ENTITY_NAME_SLOT && self.config.match_name_ref {
            return ctx
                .text
                .find(value)
                .or_else(|| NAME_REFERENCES.iter().find_map(|p| find_token(ctx.tokens, p)))
                .map(Realization::at);
        }

        let descriptor = self.routing.route(domain, name);
        log::trace!("{name}={value:?} routed to {}", descriptor.kind());

        let routed = self.dispatch(ctx, descriptor, name, value);
        if routed.is_some() {
            return routed;
        }
        match_keyword(&Keyword::from(value), ctx.text, ignore_dupes)
    }

    fn dispatch(
        &self,
        ctx: &MatchContext<'_>,
        descriptor: &MatcherDescriptor,
        slot: &str,
        value: &str,
    ) -> Option<Realization> {
        let pos = match descriptor {
            MatcherDescriptor::Boolean {
                true_value,
                false_value,
                negatable,
            } => {
                return boolean::match_boolean(ctx, slot, value, true_value, false_value, *negatable)
            }
            MatcherDescriptor::Categorical {
                mode,
                soft_mode,
                allow_plural,
            } => {
                let mode = match soft_mode {
                    Some(soft) if ctx.soft => *soft,
                    _ => *mode,
                };
                categorical::match_categorical(ctx, slot, value, mode, *allow_plural)
            }
            MatcherDescriptor::Food => food::match_food(
                ctx.text,
                value,
                self.classifier.as_ref(),
                self.config.hypernym_sense_limit,
            ),
            MatcherDescriptor::Numeric => numeric::match_numeric(ctx.tokens, value),
            MatcherDescriptor::NumericWithUnit => numeric::match_numeric_with_unit(ctx.tokens, value),
            MatcherDescriptor::Year => numeric::match_year(ctx.tokens, value),
            MatcherDescriptor::Scalar { stem_only_when_soft } => {
                scalar::match_scalar(ctx, slot, value, *stem_only_when_soft)
            }
            MatcherDescriptor::List {
                mode,
                match_all,
                conjunctions,
            } => list::match_list(ctx, slot, value, *mode, *match_all, *conjunctions),
            MatcherDescriptor::Fallback => None,
        };
        pos.map(Realization::at)
    }
}
