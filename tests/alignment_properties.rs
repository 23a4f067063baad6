//! End-to-end alignment and scoring behavior.
//!
//! Each test pins one observable property of `align` / `score` on a
//! realistic MR and utterance.

use slotalign::{align, score, MeaningRepresentation, SlotAligner, SlotAlignment};

fn mr(pairs: &[(&str, &str)]) -> MeaningRepresentation {
    MeaningRepresentation::from_pairs(pairs.iter().copied())
}

// =============================================================================
// Alignment
// =============================================================================

mod alignment {
    use super::*;

    #[test]
    fn verbatim_value_offset_is_substring_start() {
        let utt = "Located by the riverside, The Punter serves Italian food.";
        let m = mr(&[("name", "The Punter"), ("food", "Italian"), ("area", "riverside")]);
        let a = align(&m, utt, "rest_e2e");

        for slot in &a {
            let expected = utt.to_lowercase().find(&slot.value).unwrap();
            assert_eq!(slot.offset, expected, "offset of {}", slot.slot);
        }
        assert_eq!(a.len(), 3);
    }

    #[test]
    fn alignment_sorted_by_offset() {
        let m = mr(&[
            ("area", "city centre"),
            ("eattype", "coffee shop"),
            ("name", "Aromi"),
            ("food", "Japanese"),
        ]);
        let a = align(&m, "Aromi is a Japanese coffee shop in the city centre.", "rest_e2e");
        let offsets: Vec<usize> = a.iter().map(|s| s.offset).collect();
        let mut sorted = offsets.clone();
        sorted.sort_unstable();
        assert_eq!(offsets, sorted);
        assert_eq!(
            a.iter().map(|s| s.slot.as_str()).collect::<Vec<_>>(),
            vec!["name", "food", "eattype", "area"]
        );
    }

    #[test]
    fn align_is_deterministic() {
        let aligner = SlotAligner::new();
        let m = mr(&[("name", "Zizzi"), ("familyfriendly", "no"), ("pricerange", "cheap")]);
        let utt = "Zizzi is a cheap place, not family friendly.";
        let first = aligner.align(&m, utt, "rest_e2e");
        let second = aligner.align(&m, utt, "rest_e2e");
        assert_eq!(first, second);
        assert_eq!(aligner.score(&m, utt, "rest_e2e"), aligner.score(&m, utt, "rest_e2e"));
    }

    #[test]
    fn offsets_index_raw_utterance() {
        let utt = "Welcome!   Try   Fitzbillies for  French food.";
        let a = align(&mr(&[("food", "French")]), utt, "rest_e2e");
        assert_eq!(a, vec![SlotAlignment::new("food", "french", 34)]);
        assert_eq!(&utt[34..40], "French");
    }

    #[test]
    fn plural_categorical_match() {
        let a = align(
            &mr(&[("type", "hotel")]),
            "There are several hotels nearby.",
            "multiwoz_hotel",
        );
        assert_eq!(a.len(), 1);
        assert_eq!(a[0].offset, 18);
    }

    #[test]
    fn incomplete_list_not_realized() {
        let m = mr(&[("platforms", "PC, Xbox")]);
        let partial = align(&m, "It is available on PC.", "video_game");
        assert!(partial.is_empty());

        let full = align(&m, "It is available on PC and Xbox.", "video_game");
        assert_eq!(full.len(), 1);
        assert_eq!(full[0].offset, 19);
    }
}

// =============================================================================
// Scoring
// =============================================================================

mod scoring {
    use super::*;

    #[test]
    fn missing_slot_counted() {
        let s = score(&mr(&[("food", "Italian")]), "This place is great.", "rest_e2e");
        assert_eq!(s.num_errors, 1);
        assert_eq!(s.missing_slots, vec!["food"]);
        assert!(s.duplicate_slots.is_empty());
        assert_eq!(s.num_content_slots, 1);
    }

    #[test]
    fn dontcare_realized_by_indifference() {
        let s = score(
            &mr(&[("area", "dontcare")]),
            "I have no preference on the area",
            "multiwoz_hotel",
        );
        assert!(s.is_correct(), "{s:?}");
    }

    #[test]
    fn shared_value_is_not_a_duplicate() {
        let m = mr(&[("origin", "london"), ("destination", "london")]);
        let s = score(&m, "From London to London.", "freight");
        assert!(s.is_correct(), "{s:?}");

        let s = score(&mr(&[("origin", "london")]), "From London to London.", "freight");
        assert_eq!(s.duplicate_slots, vec!["origin"]);
    }

    #[test]
    fn negated_boolean_realized() {
        let m = mr(&[("familyfriendly", "no")]);
        assert!(score(&m, "It is not family friendly.", "rest_e2e").is_correct());

        let m = mr(&[("familyfriendly", "yes")]);
        let s = score(&m, "It is not family friendly.", "rest_e2e");
        assert_eq!(s.missing_slots, vec!["familyfriendly"]);
    }

    #[test]
    fn contradictory_boolean_flagged() {
        let m = mr(&[("familyfriendly", "no")]);
        let s = score(
            &m,
            "It is not family friendly, although kids are welcome.",
            "rest_e2e",
        );
        assert_eq!(s.duplicate_slots, vec!["familyfriendly"]);
        assert!(s.missing_slots.is_empty());
    }

    #[test]
    fn slot_accuracy_saturates() {
        let s = score(&mr(&[("food", "Italian")]), "Nothing relevant.", "rest_e2e");
        assert_eq!(s.slot_accuracy(), 0.0);
    }
}
