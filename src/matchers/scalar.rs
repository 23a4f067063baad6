//! Ordinal (scalar) values.
//!
//! Datasets spell the same rank many ways: `customerrating` may be
//! `"5 out of 5"` or `"high"`, and utterances say "excellent" or "highly
//! rated". Each scalar slot has a rank table; values of equal rank are
//! interchangeable, and `customerrating` additionally maps onto the
//! `rating` categories (poor/average/excellent) whose lexicon entries carry
//! the adjectives.
//!
//! ```text
//! "5 out of 5" ─rank 3─► "high"
//!      └─category─► "excellent" ─lexicon(rating)─► "5 stars", "highly", "great", ...
//! ```

use crate::lexicon::Lexicon;

use super::keyword::{find_phrase, match_any_keyword};
use super::MatchContext;

/// Rank table of one scalar slot.
#[derive(Debug, Clone, Copy)]
pub struct ScalarScale {
    /// Slot name.
    pub slot: &'static str,
    /// Raw value → rank (1 = lowest in the slot's own order).
    pub ranks: &'static [(&'static str, u8)],
    /// Raw value → category of the alias slot.
    pub categories: &'static [(&'static str, &'static str)],
    /// Slot whose lexicon entries describe the categories.
    pub alias_slot: Option<&'static str>,
}

impl ScalarScale {
    /// Rank of a raw value.
    #[must_use]
    pub fn rank(&self, value: &str) -> Option<u8> {
        lookup(self.ranks, value)
    }

    /// Alias-slot category of a raw value.
    #[must_use]
    pub fn category(&self, value: &str) -> Option<&'static str> {
        lookup(self.categories, value)
    }

    /// Other raw values with the same rank.
    pub fn same_rank(&self, value: &str) -> impl Iterator<Item = &'static str> + '_ {
        let rank = self.rank(value);
        let value = value.to_string();
        self.ranks
            .iter()
            .filter(move |(v, r)| Some(*r) == rank && *v != value)
            .map(|(v, _)| *v)
    }
}

fn lookup<T: Copy>(table: &[(&str, T)], key: &str) -> Option<T> {
    table.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
}

/// Built-in scales.
pub static SCALES: &[ScalarScale] = &[
    ScalarScale {
        slot: "customerrating",
        ranks: &[
            ("low", 1),
            ("average", 2),
            ("high", 3),
            ("1 out of 5", 1),
            ("3 out of 5", 2),
            ("5 out of 5", 3),
        ],
        categories: &[
            ("low", "poor"),
            ("average", "average"),
            ("high", "excellent"),
            ("1 out of 5", "poor"),
            ("3 out of 5", "average"),
            ("5 out of 5", "excellent"),
        ],
        alias_slot: Some("rating"),
    },
    ScalarScale {
        slot: "pricerange",
        ranks: &[
            ("high", 1),
            ("moderate", 2),
            ("cheap", 3),
            ("more than £30", 1),
            ("£20 25", 2),
            ("less than £20", 3),
        ],
        categories: &[],
        alias_slot: None,
    },
    ScalarScale {
        slot: "familyfriendly",
        ranks: &[("no", 1), ("yes", 3)],
        categories: &[],
        alias_slot: None,
    },
    ScalarScale {
        slot: "esrb",
        ranks: &[
            ("e (for everyone)", 1),
            ("e 10+ (for everyone 10 and older)", 2),
            ("t (for teen)", 3),
            ("m (for mature)", 4),
        ],
        categories: &[],
        alias_slot: None,
    },
    ScalarScale {
        slot: "rating",
        ranks: &[("poor", 1), ("average", 2), ("good", 3), ("excellent", 4)],
        categories: &[],
        alias_slot: None,
    },
];

/// The scale of a slot, if it has one.
#[must_use]
pub fn scale(slot: &str) -> Option<&'static ScalarScale> {
    SCALES.iter().find(|s| s.slot == slot)
}

fn push_with_alternatives(
    out: &mut Vec<Vec<String>>,
    lexicon: &dyn Lexicon,
    slots: &[&str],
    value: &str,
) {
    out.push(vec![value.to_string()]);
    for slot in slots {
        out.extend(
            lexicon
                .alternatives(slot, value)
                .iter()
                .map(|alt| alt.parts().into_iter().map(str::to_string).collect()),
        );
    }
}

/// Candidate surface forms of a scalar value, most specific first.
///
/// The matcher reports the earliest candidate in the text, not the first
/// in this order.
#[must_use]
pub fn scalar_candidates(lexicon: &dyn Lexicon, slot: &str, value: &str) -> Vec<Vec<String>> {
    let mut out = Vec::new();
    let Some(scale) = scale(slot) else {
        push_with_alternatives(&mut out, lexicon, &[slot], value);
        return out;
    };

    let mut slots = vec![slot];
    slots.extend(scale.alias_slot);

    push_with_alternatives(&mut out, lexicon, &slots, value);
    if let Some(category) = scale.category(value) {
        push_with_alternatives(&mut out, lexicon, &slots, category);
    }
    for other in scale.same_rank(value) {
        out.push(vec![other.to_string()]);
        out.extend(scale.category(other).map(|c| vec![c.to_string()]));
    }
    out
}

/// Scalar matcher.
///
/// With `stem_only` under soft alignment only the slot's stems are
/// searched ("price", "customer").
#[must_use]
pub fn match_scalar(
    ctx: &MatchContext<'_>,
    slot: &str,
    value: &str,
    stem_only: bool,
) -> Option<usize> {
    if value.is_empty() {
        return None;
    }
    if stem_only && ctx.soft {
        let stems = ctx.stems(slot);
        return match_any_keyword(&stems, ctx.text, true).map(|r| r.pos);
    }

    scalar_candidates(ctx.lexicon, slot, value)
        .iter()
        .filter_map(|group| {
            group
                .iter()
                .map(|part| find_phrase(ctx.text, part))
                .collect::<Option<Vec<usize>>>()
                .and_then(|positions| positions.into_iter().min())
        })
        .min()
}
