//! Cuisine matcher.
//!
//! Tries, in order: the value verbatim, a couple of fixed renamings, then
//! any token the [`LexicalClassifier`] considers a kind of food. The last
//! step is what lets "They serve pasta" realize `food = italian`; it is
//! coarse by nature and bounded by the classifier's sense limit.

use crate::classifier::LexicalClassifier;
use crate::normalize::tokenize;

/// Hypernym every food word must reach.
pub const FOOD_CATEGORY: &str = "food";

/// Renamings tried when the value is not mentioned verbatim.
const RENAMINGS: &[(&str, &str)] = &[("english", "british"), ("fast food", "american style")];

/// Locate a cuisine value in the (masked) canonical text.
#[must_use]
pub fn match_food(
    text: &str,
    value: &str,
    classifier: &dyn LexicalClassifier,
    sense_limit: usize,
) -> Option<usize> {
    if value.is_empty() {
        return None;
    }
    if let Some(pos) = text.find(value) {
        return Some(pos);
    }

    for (from, to) in RENAMINGS {
        if value == *from {
            if let Some(pos) = text.find(to) {
                return Some(pos);
            }
        }
    }

    // masked names are runs of '_' and never classify as food
    let found = tokenize(text)
        .into_iter()
        .find(|token| classifier.has_hypernym(&token.text, FOOD_CATEGORY, sense_limit));
    if let Some(token) = &found {
        log::trace!(
            "food={value:?} realized by {:?} via {}",
            token.text,
            classifier.name()
        );
    }
    found.map(|token| token.start)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::{self, NoLexicalClassifier};

    #[test]
    fn test_verbatim() {
        let c = classifier::builtin();
        assert_eq!(match_food("they serve italian food", "italian", c.as_ref(), 3), Some(11));
    }

    #[test]
    fn test_renamings() {
        let c = NoLexicalClassifier;
        assert_eq!(match_food("classic british dishes", "english", &c, 3), Some(8));
        assert_eq!(
            match_food("american style burgers", "fast food", &c, 3),
            Some(0)
        );
        assert_eq!(match_food("classic british dishes", "french", &c, 3), None);
    }

    #[test]
    fn test_classifier_fallback() {
        let c = classifier::builtin();
        assert_eq!(
            match_food("the place serves pasta", "italian", c.as_ref(), 3),
            Some(17)
        );
        assert_eq!(match_food("the place serves pasta", "italian", &NoLexicalClassifier, 3), None);
    }

    #[test]
    fn test_masked_text_is_not_food() {
        let c = classifier::builtin();
        assert_eq!(match_food("_____ is great.", "italian", c.as_ref(), 3), None);
    }

    #[test]
    fn test_empty_value() {
        let c = classifier::builtin();
        assert_eq!(match_food("pasta", "", c.as_ref(), 3), None);
    }
}
