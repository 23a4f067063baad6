//! Categorical values and their alternatives.
//!
//! A value is expanded into candidate forms according to a [`MatchMode`],
//! merged with its lexicon alternatives, and optionally pluralized. Among
//! the candidates whose parts are all present, the one starting left-most
//! wins; a candidate starts at its left-most part.
//!
//! Short single words (≤ 4 chars) are looked up as tokens so "bar" does not
//! match inside "barbecue"; longer words and phrases are searched in the
//! text directly, which also tolerates tokenizer artifacts.

use crate::lexicon::Alternative;
use crate::normalize::{find_token, Token};
use crate::routing::MatchMode;

use super::MatchContext;

/// English plural with the common irregular endings.
#[must_use]
pub fn plural(word: &str) -> String {
    if let Some(stem) = word.strip_suffix("fe") {
        format!("{stem}ves")
    } else if let Some(stem) = word.strip_suffix('f') {
        format!("{stem}ves")
    } else if word.ends_with('o') {
        format!("{word}es")
    } else if let Some(stem) = word.strip_suffix("us") {
        format!("{stem}i")
    } else if let Some(stem) = word.strip_suffix("on") {
        format!("{stem}a")
    } else if let Some(stem) = word.strip_suffix('y') {
        format!("{stem}ies")
    } else if word.ends_with(['s', 'x']) || word.ends_with("sh") || word.ends_with("ch") {
        format!("{word}es")
    } else if let Some(stem) = word.strip_suffix("an") {
        format!("{stem}en")
    } else {
        format!("{word}s")
    }
}

/// Candidate forms of a value under a match mode (before alternatives).
#[must_use]
pub fn expand_value(value: &str, mode: MatchMode) -> Vec<Vec<String>> {
    let words = || value.split(' ').filter(|w| !w.is_empty());
    match mode {
        MatchMode::ExactMatch => vec![vec![value.to_string()]],
        MatchMode::FirstWord => words().take(1).map(|w| vec![w.to_string()]).collect(),
        MatchMode::AnyWord => words().map(|w| vec![w.to_string()]).collect(),
        MatchMode::AllWords => vec![words().map(str::to_string).collect()],
    }
}

fn find_part(text: &str, tokens: &[Token], part: &str) -> Option<usize> {
    if part.chars().count() > 4 || part.contains(' ') {
        text.find(part)
    } else {
        find_token(tokens, part)
    }
}

/// Find a value or one of its alternatives.
#[must_use]
pub fn find_value_alternative(
    text: &str,
    tokens: &[Token],
    value: &str,
    alternatives: &[Alternative],
    mode: MatchMode,
    allow_plural: bool,
) -> Option<usize> {
    if value.is_empty() {
        return None;
    }

    let mut candidates = expand_value(value, mode);
    candidates.extend(
        alternatives
            .iter()
            .map(|alt| alt.parts().into_iter().map(str::to_string).collect()),
    );
    if allow_plural {
        let plurals: Vec<Vec<String>> = candidates
            .iter()
            .filter(|group| group.len() == 1)
            .map(|group| vec![plural(&group[0])])
            .collect();
        candidates.extend(plurals);
    }

    candidates
        .iter()
        .filter_map(|group| {
            group
                .iter()
                .map(|part| find_part(text, tokens, part))
                .collect::<Option<Vec<usize>>>()
                .and_then(|positions| positions.into_iter().min())
        })
        .min()
}

/// Categorical matcher: the value or a lexicon alternative of it.
#[must_use]
pub fn match_categorical(
    ctx: &MatchContext<'_>,
    slot: &str,
    value: &str,
    mode: MatchMode,
    allow_plural: bool,
) -> Option<usize> {
    find_value_alternative(
        ctx.text,
        ctx.tokens,
        value,
        ctx.lexicon.alternatives(slot, value),
        mode,
        allow_plural,
    )
}
