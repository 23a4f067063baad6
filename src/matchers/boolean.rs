//! Yes/no slots.
//!
//! A boolean value is never in the text; its slot's stems are ("family
//! friendly", "kids", "usb"). Polarity comes from negation cues around the
//! stem:
//!
//! ```text
//!        ◄──── 5 tokens (true) / 10 tokens (false) ────┐
//!   "it is  not  a place  for  kids  and  never  will"  │ ──► 10 tokens (false)
//!           ▲ cue             ▲ stem
//! ```
//!
//! A contrast cue between the negation and the stem ("not cheap, but great
//! for kids") cancels the negation.
//!
//! Negatable slots fold every mention through [`Polarity`] so a text that
//! first denies and then affirms is reported as ambiguous: located, but
//! flagged like a duplicate mention.

use crate::mentions::stem_plural;
use crate::normalize::Token;

use super::keyword::{find_phrase, match_keyword, phrase_pattern, Keyword};
use super::{MatchContext, Realization};

const NEGATION_CUES: &[&str] = &[
    "no", "not", "n't", "without", "never", "non", "nor", "neither", "lack", "lacks", "lacking",
    "nothing", "dont", "doesnt", "isnt",
];

const CONTRAST_CUES: &[&str] = &[
    "but",
    "however",
    "although",
    "though",
    "yet",
    "whereas",
    "while",
    "nevertheless",
    "nonetheless",
];

/// Negation window before the stem when the value is true.
pub const TRUE_WINDOW_BEFORE: usize = 5;
/// Negation window before the stem when the value is false.
pub const FALSE_WINDOW_BEFORE: usize = 10;
/// Negation window after the stem when the value is false.
pub const FALSE_WINDOW_AFTER: usize = 10;

/// Phrases that realize a false value without negation.
const ANTONYMS: &[(&str, &[&str])] = &[
    ("familyfriendly", &["adult", "adults"]),
    (
        "isforbusinesscomputing",
        &["personal", "home", "personal use", "everyday", "casual", "gaming"],
    ),
    ("has_multiplayer", &["single player", "singleplayer", "solo"]),
];

/// Mention state of a negatable slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Polarity {
    /// No mention seen.
    #[default]
    Unmentioned,
    /// Only negated mentions so far.
    Negated,
    /// Affirmed at first mention.
    Affirmed,
    /// Negated, then affirmed.
    Ambiguous,
}

impl Polarity {
    /// Fold one mention into the state.
    #[must_use]
    pub fn observe(self, negated: bool) -> Self {
        match (self, negated) {
            (Self::Unmentioned, true) => Self::Negated,
            (Self::Unmentioned, false) => Self::Affirmed,
            (Self::Negated, false) => Self::Ambiguous,
            (state, _) => state,
        }
    }
}

/// A stem occurrence: token index and byte offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Occurrence {
    token: usize,
    pos: usize,
}

fn token_at(tokens: &[Token], pos: usize) -> Option<usize> {
    tokens.iter().position(|t| t.start >= pos)
}

fn stem_occurrences(ctx: &MatchContext<'_>, stems: &[Keyword]) -> Vec<Occurrence> {
    let mut out = Vec::new();
    for stem in stems {
        match stem.as_phrase() {
            Some(word) if !word.contains(' ') => {
                let plural = stem_plural(word);
                out.extend(
                    ctx.tokens
                        .iter()
                        .enumerate()
                        .filter(|(_, t)| t.text == word || t.text == plural)
                        .map(|(token, t)| Occurrence { token, pos: t.start }),
                );
            }
            Some(phrase) => {
                let Some(pattern) = phrase_pattern(phrase) else {
                    continue;
                };
                out.extend(pattern.find_iter(ctx.text).filter_map(|m| {
                    token_at(ctx.tokens, m.start()).map(|token| Occurrence {
                        token,
                        pos: m.start(),
                    })
                }));
            }
            None => {
                if let Some(r) = match_keyword(stem, ctx.text, true) {
                    if let Some(token) = token_at(ctx.tokens, r.pos) {
                        out.push(Occurrence { token, pos: r.pos });
                    }
                }
            }
        }
    }
    out.sort_by_key(|o| o.pos);
    out.dedup_by_key(|o| o.token);
    out
}

fn is_cue(token: &Token, cues: &[&str]) -> bool {
    cues.contains(&token.text.as_str())
}

/// Whether the stem at token `idx` is negated, looking `before` tokens back
/// and `after` tokens ahead.
fn is_negated(tokens: &[Token], idx: usize, before: usize, after: usize) -> bool {
    let start = idx.saturating_sub(before);
    let negated_before = tokens[start..idx]
        .iter()
        .rposition(|t| is_cue(t, NEGATION_CUES))
        .is_some_and(|cue| {
            !tokens[start + cue + 1..idx]
                .iter()
                .any(|t| is_cue(t, CONTRAST_CUES))
        });
    if negated_before {
        return true;
    }

    let end = (idx + 1 + after).min(tokens.len());
    let ahead = &tokens[(idx + 1).min(end)..end];
    ahead
        .iter()
        .position(|t| is_cue(t, NEGATION_CUES))
        .is_some_and(|cue| !ahead[..cue].iter().any(|t| is_cue(t, CONTRAST_CUES)))
}

fn windows(expect_true: bool) -> (usize, usize) {
    if expect_true {
        (TRUE_WINDOW_BEFORE, 0)
    } else {
        (FALSE_WINDOW_BEFORE, FALSE_WINDOW_AFTER)
    }
}

fn find_antonym(text: &str, slot: &str) -> Option<usize> {
    ANTONYMS
        .iter()
        .find(|(s, _)| *s == slot)
        .and_then(|(_, phrases)| phrases.iter().filter_map(|p| find_phrase(text, p)).min())
}

/// Boolean matcher.
///
/// Values other than `true_value`/`false_value` are not realized here.
#[must_use]
pub fn match_boolean(
    ctx: &MatchContext<'_>,
    slot: &str,
    value: &str,
    true_value: &str,
    false_value: &str,
    negatable: bool,
) -> Option<Realization> {
    let expect_true = if value == true_value {
        true
    } else if value == false_value {
        false
    } else {
        return None;
    };

    let stems = ctx.stems(slot);
    let occurrences = stem_occurrences(ctx, &stems);
    let (before, after) = windows(expect_true);
    let negated: Vec<bool> = occurrences
        .iter()
        .map(|o| is_negated(ctx.tokens, o.token, before, after))
        .collect();

    if negatable {
        return fold_negatable(ctx.text, slot, expect_true, &occurrences, &negated);
    }

    let realized = occurrences
        .iter()
        .zip(&negated)
        .find(|(_, neg)| **neg != expect_true)
        .map(|(o, _)| o.pos);
    realized
        .or_else(|| (!expect_true).then(|| find_antonym(ctx.text, slot)).flatten())
        .map(Realization::at)
}

fn fold_negatable(
    text: &str,
    slot: &str,
    expect_true: bool,
    occurrences: &[Occurrence],
    negated: &[bool],
) -> Option<Realization> {
    let mut mentions: Vec<(usize, bool)> = occurrences
        .iter()
        .zip(negated)
        .map(|(o, &neg)| (o.pos, neg))
        .collect();
    if let Some(pos) = find_antonym(text, slot) {
        mentions.push((pos, true));
    }
    mentions.sort_by_key(|(pos, _)| *pos);

    let state = mentions
        .iter()
        .fold(Polarity::Unmentioned, |state, &(_, neg)| state.observe(neg));
    let first_with = |neg: bool| mentions.iter().find(|(_, n)| *n == neg).map(|(p, _)| *p);

    match (state, expect_true) {
        (Polarity::Affirmed, true) => first_with(false).map(Realization::at),
        (Polarity::Negated, false) => first_with(true).map(Realization::at),
        (Polarity::Ambiguous, _) => {
            log::debug!("{slot}: contradictory mentions");
            mentions.first().map(|&(pos, _)| Realization { pos, is_dupe: true })
        }
        _ => None,
    }
}
