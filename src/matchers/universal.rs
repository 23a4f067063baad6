//! Universal sentinel values: `dontcare`, `none`, and the elided `""`.
//!
//! These are never in the text. They are realized by a mention of the slot
//! (its stems) together with a cue for the sentinel's meaning:
//!
//! | Value | Realized by |
//! |-------|-------------|
//! | `dontcare` | stem + an indifference cue ("any", "no preference", ...) |
//! | `none` | stem (or "none") + a negation + an information noun |
//! | `""` | stem alone |
//!
//! Soft alignment accepts the stem alone for `dontcare` and `none`.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::mentions::stem_plural;
use crate::normalize::{find_token, has_token, tokenize, Token};

use super::keyword::{count_phrase, find_phrase, match_keyword, Keyword};
use super::{MatchContext, Realization};

/// Single-token indifference cues.
pub const INDIFFERENCE_WORDS: &[&str] = &[
    "any", "all", "vary", "varying", "varied", "various", "variety", "different", "unspecified",
    "irrelevant", "unnecessary", "unknown", "particular", "specific", "priority", "choosy",
    "picky", "regardless", "disregarding", "disregard", "excluding", "unconcerned", "matter",
    "specification", "concern", "consideration", "considerations", "factoring", "accounting",
    "ignoring",
];

/// Multi-token indifference cues, matched on apostrophe-free text.
pub const INDIFFERENCE_PHRASES: &[&str] = &[
    "no preference",
    "no predetermined",
    "no certain",
    "wide range",
    "may or may not",
    "not an issue",
    "not a factor",
    "not important",
    "not considered",
    "not considering",
    "not concerned",
    "without a preference",
    "without preference",
    "without specification",
    "without caring",
    "without considering",
    "not have a preference",
    "dont have a preference",
    "not consider",
    "dont consider",
    "not mind",
    "dont mind",
    "not caring",
    "not care",
    "dont care",
    "didnt care",
    "n a",
];

static NEGATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(no|not|any)\b").expect("NEGATION regex is invalid"));

static INFORMATION_NOUN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\b(information|info|inform|results|requirement|requirements|specification|specifications)\b",
    )
    .expect("INFORMATION_NOUN regex is invalid")
});

fn has_indifference_cue(text: &str, tokens: &[Token]) -> bool {
    if INDIFFERENCE_WORDS.iter().any(|w| has_token(tokens, w)) {
        return true;
    }
    if INDIFFERENCE_PHRASES
        .iter()
        .any(|p| find_phrase(text, p).is_some())
    {
        return true;
    }
    has_token(tokens, "no") && (has_token(tokens, "preference") || has_token(tokens, "specifics"))
}

/// Whether a stem is mentioned in the (apostrophe-free) text.
fn stem_mentioned(stem: &Keyword, text: &str, tokens: &[Token]) -> bool {
    match stem.as_phrase() {
        Some(word) if !word.contains(' ') => {
            has_token(tokens, word) || has_token(tokens, &stem_plural(word))
        }
        _ => match_keyword(stem, text, true).is_some(),
    }
}

/// `dontcare`: the slot is mentioned alongside an indifference cue.
///
/// Reports where the stem (or its plural) starts and flags a duplicate
/// when the stem occurs more than once. A stem only visible once
/// apostrophes are dropped has no position and is not realized.
#[must_use]
pub fn match_dontcare(ctx: &MatchContext<'_>, slot: &str, ignore_dupes: bool) -> Option<Realization> {
    let text = ctx.text.replace('\'', "");
    let tokens = tokenize(&text);

    let mut stems = ctx.stems(slot);
    stems.push(Keyword::from(slot));

    let stem = stems
        .iter()
        .find(|stem| stem_mentioned(stem, &text, &tokens))?;
    if !ctx.soft && !has_indifference_cue(&text, &tokens) {
        return None;
    }

    let (pos, count) = match stem.as_phrase() {
        Some(phrase) => {
            let pos = find_phrase(ctx.text, phrase)
                .or_else(|| find_token(ctx.tokens, phrase))
                .or_else(|| find_token(ctx.tokens, &stem_plural(phrase)))?;
            (pos, count_phrase(ctx.text, phrase))
        }
        None => {
            let r = match_keyword(stem, ctx.text, ignore_dupes)?;
            (r.pos, if r.is_dupe { 2 } else { 1 })
        }
    };
    Some(Realization {
        pos,
        is_dupe: !ignore_dupes && count > 1,
    })
}

/// `none`: the slot (or "none") is mentioned and the text says no
/// information/results/requirements exist.
#[must_use]
pub fn match_none(ctx: &MatchContext<'_>, slot: &str) -> Option<Realization> {
    let mut stems = ctx.stems(slot);
    stems.push(Keyword::from("none"));

    let found = stems
        .iter()
        .find_map(|stem| match_keyword(stem, ctx.text, true))?;
    if ctx.soft || (NEGATION.is_match(ctx.text) && INFORMATION_NOUN.is_match(ctx.text)) {
        Some(found)
    } else {
        None
    }
}

/// Elided value: any mention of the slot.
#[must_use]
pub fn match_elided(ctx: &MatchContext<'_>, slot: &str, ignore_dupes: bool) -> Option<Realization> {
    ctx.stems(slot)
        .iter()
        .find_map(|stem| match_keyword(stem, ctx.text, ignore_dupes))
}
