//! Invariant tests for slotalign.
//!
//! Properties that must hold for any MR and utterance, checked over
//! generated inputs.

use proptest::prelude::*;
use slotalign::{align, score, MeaningRepresentation, Sentinel, SlotAligner};

const DOMAINS: &[&str] = &["rest_e2e", "multiwoz_hotel", "tv", "laptop", "video_game", "unknown"];

const SLOTS: &[&str] = &[
    "name", "food", "area", "type", "stars", "price", "familyfriendly", "pricerange", "platforms",
    "release_year", "color",
];

const WORDS: &[&str] = &[
    "the", "aromi", "italian", "food", "cheap", "not", "kids", "family", "friendly", "2014", "four",
    "stars", "pc", "xbox", "hotel", "hotels", "riverside", "any", "area", "no", "preference", "it",
    "32", "inch", "price", "dontcare", "none", "",
];

fn word() -> impl Strategy<Value = &'static str> {
    prop::sample::select(WORDS)
}

fn slot_pair() -> impl Strategy<Value = (&'static str, String)> {
    (
        prop::sample::select(SLOTS),
        prop::collection::vec(word(), 1..3).prop_map(|w| w.join(" ")),
    )
}

fn mr_strategy() -> impl Strategy<Value = MeaningRepresentation> {
    prop::collection::vec(slot_pair(), 0..6).prop_map(MeaningRepresentation::from_pairs)
}

fn utterance_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop_oneof![
            word().prop_map(str::to_string),
            "[A-Za-zé' ,.!-]{1,8}",
        ],
        0..15,
    )
    .prop_map(|w| w.join(" "))
}

// =============================================================================
// Alignment Invariants
// =============================================================================

mod alignment_invariants {
    use super::*;

    proptest! {
        /// Offsets are sorted and index into the raw utterance.
        #[test]
        fn offsets_sorted_and_in_bounds(
            mr in mr_strategy(),
            utt in utterance_strategy(),
            domain in prop::sample::select(DOMAINS),
        ) {
            let a = align(&mr, &utt, domain);
            let len = utt.chars().count();
            for pair in a.windows(2) {
                prop_assert!(pair[0].offset <= pair[1].offset);
            }
            for slot in &a {
                prop_assert!(slot.offset <= len, "{} > {}", slot.offset, len);
            }
            prop_assert!(a.len() <= mr.len());
        }

        /// Two runs on the same input agree.
        #[test]
        fn deterministic(
            mr in mr_strategy(),
            utt in utterance_strategy(),
            domain in prop::sample::select(DOMAINS),
        ) {
            let aligner = SlotAligner::new();
            prop_assert_eq!(aligner.align(&mr, &utt, domain), aligner.align(&mr, &utt, domain));
            prop_assert_eq!(aligner.score(&mr, &utt, domain), aligner.score(&mr, &utt, domain));
        }

        /// A value that occurs verbatim is aligned at its first occurrence.
        #[test]
        fn verbatim_value_found(
            value in "[a-z]{3,8}"
                .prop_filter("sentinels are not literal text", |v| Sentinel::from_value(v).is_none()),
            prefix in prop::collection::vec("[0-9]{1,4}", 0..4),
            suffix in "[0-9 ]{0,6}",
        ) {
            let prefix = prefix.join(" ");
            let utt = format!("{prefix} {value} {suffix}");
            let m = MeaningRepresentation::from_pairs([("color", value.as_str())]);

            let a = align(&m, &utt, "warehouse");
            prop_assert_eq!(a.len(), 1);
            prop_assert_eq!(a[0].offset, prefix.len() + 1);
        }
    }
}

// =============================================================================
// Scoring Invariants
// =============================================================================

mod scoring_invariants {
    use super::*;

    proptest! {
        /// The error count is the sum of missing and duplicate slots, and
        /// missing slots never outnumber content slots.
        #[test]
        fn error_count_consistent(
            mr in mr_strategy(),
            utt in utterance_strategy(),
            domain in prop::sample::select(DOMAINS),
        ) {
            let s = score(&mr, &utt, domain);
            prop_assert_eq!(s.num_errors, s.missing_slots.len() + s.duplicate_slots.len());
            prop_assert!(s.missing_slots.len() <= s.num_content_slots);
            prop_assert!(s.duplicate_slots.len() <= s.num_content_slots);
            prop_assert!((0.0..=1.0).contains(&s.slot_accuracy()));
        }

        /// Every duplicate slot is reported once.
        #[test]
        fn duplicates_unique(
            mr in mr_strategy(),
            utt in utterance_strategy(),
        ) {
            let s = score(&mr, &utt, "rest_e2e");
            let mut seen = std::collections::HashSet::new();
            for slot in &s.duplicate_slots {
                prop_assert!(seen.insert(slot.clone()), "{} reported twice", slot);
            }
        }

        /// An aligned slot is never also missing when it occurs once in the MR.
        #[test]
        fn aligned_slots_not_missing(
            mr in mr_strategy(),
            utt in utterance_strategy(),
            domain in prop::sample::select(DOMAINS),
        ) {
            let names: Vec<&str> = mr.iter().map(|s| s.name.as_str()).collect();
            let aligned = align(&mr, &utt, domain);
            let s = score(&mr, &utt, domain);
            for slot in &aligned {
                if names.iter().filter(|n| **n == slot.slot).count() == 1 {
                    prop_assert!(!s.missing_slots.contains(&slot.slot));
                }
            }
        }
    }
}
