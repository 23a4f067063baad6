//! Slot value matchers.
//!
//! Each matcher answers one question: where (if anywhere) does the
//! utterance realize this slot value? Positions are byte offsets into the
//! canonical, masked utterance; the aligner maps them back to raw chars.
//!
//! | Module | Realizes |
//! |--------|----------|
//! | [`keyword`] | phrases and token groups, with duplicate detection |
//! | [`boolean`] | yes/no slots through their mention stems |
//! | [`categorical`] | values and lexicon alternatives, optionally plural |
//! | [`food`] | cuisines, with lexical classification as a last resort |
//! | [`numeric`] | numbers, numbers with units, years |
//! | [`scalar`] | ordinal values through rank tables |
//! | [`list`] | separator- or conjunction-delimited item lists |
//! | [`universal`] | `dontcare`, `none` and elided values |

pub mod boolean;
pub mod categorical;
pub mod food;
pub mod keyword;
pub mod list;
pub mod numeric;
pub mod scalar;
pub mod universal;

use std::collections::HashSet;

use crate::lexicon::Lexicon;
use crate::mentions::SlotMentions;
use crate::normalize::Token;

use keyword::Keyword;

/// A located slot mention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Realization {
    /// Byte offset in the canonical utterance.
    pub pos: usize,
    /// Whether the slot appears to be mentioned more than once.
    pub is_dupe: bool,
}

impl Realization {
    /// A single mention at `pos`.
    #[must_use]
    pub fn at(pos: usize) -> Self {
        Self { pos, is_dupe: false }
    }
}

/// Everything a matcher may consult for one utterance.
#[derive(Clone, Copy)]
pub struct MatchContext<'a> {
    /// Canonical utterance with name mentions masked.
    pub text: &'a str,
    /// Tokens of the masked text.
    pub tokens: &'a [Token],
    /// Alternative phrasings of slot values.
    pub lexicon: &'a dyn Lexicon,
    /// Slot mention stems.
    pub mentions: &'a SlotMentions,
    /// Base names of all slots in the MR.
    pub present_slots: &'a HashSet<&'a str>,
    /// Soft alignment: relaxed modes and stem-only matching.
    pub soft: bool,
}

impl<'a> MatchContext<'a> {
    /// Mention stems of a slot given the rest of the MR.
    #[must_use]
    pub fn stems(&self, slot: &str) -> Vec<Keyword> {
        self.mentions.stems(slot, self.present_slots)
    }
}

impl std::fmt::Debug for MatchContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MatchContext")
            .field("text", &self.text)
            .field("tokens", &self.tokens.len())
            .field("lexicon", &self.lexicon.source())
            .field("present_slots", &self.present_slots)
            .field("soft", &self.soft)
            .finish()
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::collections::HashSet;

    use crate::lexicon::{self, AlternativesLexicon};
    use crate::mentions::{self, SlotMentions};
    use crate::normalize::{Token, Utterance};
    use std::sync::Arc;

    use super::MatchContext;

    /// Owned pieces a [`MatchContext`] borrows from.
    pub(crate) struct Fixture {
        pub utterance: Utterance,
        pub lexicon: Arc<AlternativesLexicon>,
        pub mentions: Arc<SlotMentions>,
        pub present: Vec<String>,
    }

    impl Fixture {
        pub(crate) fn new(utt: &str, present: &[&str]) -> Self {
            Self {
                utterance: Utterance::new(utt),
                lexicon: lexicon::builtin(),
                mentions: mentions::builtin(),
                present: present.iter().map(|s| (*s).to_string()).collect(),
            }
        }

        pub(crate) fn tokens(&self) -> &[Token] {
            self.utterance.tokens()
        }

        pub(crate) fn with_ctx<R>(&self, soft: bool, f: impl FnOnce(&MatchContext<'_>) -> R) -> R {
            let present: HashSet<&str> = self.present.iter().map(String::as_str).collect();
            let ctx = MatchContext {
                text: self.utterance.text(),
                tokens: self.utterance.tokens(),
                lexicon: self.lexicon.as_ref(),
                mentions: self.mentions.as_ref(),
                present_slots: &present,
                soft,
            };
            f(&ctx)
        }
    }
}
