//! Multi-item values: `"pc, xbox, playstation"`.

use crate::routing::MatchMode;

use super::categorical::find_value_alternative;
use super::MatchContext;

const CONJUNCTIONS: &[&str] = &[" and ", " or "];

/// Split a list value into trimmed, non-empty items.
#[must_use]
pub fn split_items(value: &str, conjunctions: bool) -> Vec<String> {
    let mut items: Vec<String> = value.split(',').map(str::to_string).collect();
    if conjunctions {
        for conj in CONJUNCTIONS {
            items = items
                .iter()
                .flat_map(|item| item.split(conj).map(str::to_string).collect::<Vec<_>>())
                .collect();
        }
    }
    items
        .into_iter()
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
        .collect()
}

/// List matcher.
///
/// With `match_all` every item must be realized and the left-most item is
/// reported; soft alignment relaxes this to any single item.
#[must_use]
pub fn match_list(
    ctx: &MatchContext<'_>,
    slot: &str,
    value: &str,
    mode: MatchMode,
    match_all: bool,
    conjunctions: bool,
) -> Option<usize> {
    let items = split_items(value, conjunctions);
    if items.is_empty() {
        return None;
    }

    let positions: Vec<Option<usize>> = items
        .iter()
        .map(|item| {
            find_value_alternative(
                ctx.text,
                ctx.tokens,
                item,
                ctx.lexicon.alternatives(slot, item),
                mode,
                false,
            )
        })
        .collect();

    if match_all && !ctx.soft {
        if let Some(missing) = items.iter().zip(&positions).find(|(_, p)| p.is_none()) {
            log::trace!("{slot}: list item {:?} not realized", missing.0);
            return None;
        }
    }
    positions.into_iter().flatten().min()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matchers::test_support::Fixture;

    #[test]
    fn test_split_items() {
        assert_eq!(split_items("pc, xbox", false), vec!["pc", "xbox"]);
        assert_eq!(
            split_items("black, white and silver", true),
            vec!["black", "white", "silver"]
        );
        assert_eq!(split_items("black and white", false), vec!["black and white"]);
        assert!(split_items(" , ", false).is_empty());
    }

    #[test]
    fn test_all_items_required() {
        let f = Fixture::new("Available on PC only.", &[]);
        let pos = f.with_ctx(false, |ctx| {
            match_list(ctx, "platforms", "pc, xbox", MatchMode::FirstWord, true, false)
        });
        assert_eq!(pos, None);

        let f = Fixture::new("Available on Xbox and PC.", &[]);
        let pos = f.with_ctx(false, |ctx| {
            match_list(ctx, "platforms", "pc, xbox", MatchMode::FirstWord, true, false)
        });
        assert_eq!(pos, Some(13));
    }

    #[test]
    fn test_soft_accepts_any_item() {
        let f = Fixture::new("Available on PC only.", &[]);
        let pos = f.with_ctx(true, |ctx| {
            match_list(ctx, "platforms", "pc, xbox", MatchMode::FirstWord, true, false)
        });
        assert_eq!(pos, Some(13));
    }

    #[test]
    fn test_item_alternatives() {
        let f = Fixture::new("Play it on Windows or on a Microsoft console.", &[]);
        let pos = f.with_ctx(false, |ctx| {
            match_list(ctx, "platforms", "pc, xbox", MatchMode::FirstWord, true, false)
        });
        assert_eq!(pos, Some(11));
    }

    #[test]
    fn test_conjunction_list() {
        let f = Fixture::new("Comes in white or black.", &[]);
        let pos = f.with_ctx(false, |ctx| {
            match_list(ctx, "color", "black and white", MatchMode::ExactMatch, true, true)
        });
        assert_eq!(pos, Some(9));
    }
}
