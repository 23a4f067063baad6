//! Numbers, numbers with units, and years.
//!
//! All three work on tokens: a number is only realized by a whole token
//! (`"3"` must not match inside `"2013"`). Values these matchers cannot
//! parse return `None` and are left to the verbatim fallback.

use crate::normalize::{find_token, Token};

const NUMBER_WORDS: &[&str] = &[
    "zero", "one", "two", "three", "four", "five", "six", "seven", "eight", "nine", "ten",
    "eleven", "twelve", "thirteen", "fourteen", "fifteen", "sixteen", "seventeen", "eighteen",
    "nineteen", "twenty",
];

const CURRENCY: &[char] = &['$', '£', '€'];

/// Tokens searched after a number for its unit.
pub const UNIT_WINDOW: usize = 3;

/// Interchangeable spellings of a unit.
const UNIT_ALIASES: &[&[&str]] = &[
    &["inch", "inches", "in", "\""],
    &["watt", "watts", "w"],
    &["hour", "hours", "hr", "hrs", "h"],
    &["pound", "pounds", "lbs", "lb"],
    &["kilogram", "kilograms", "kg", "kgs"],
    &["gigabyte", "gigabytes", "gb"],
    &["terabyte", "terabytes", "tb"],
    &["dollar", "dollars", "usd"],
];

fn unit_aliases(unit: &str) -> Option<&'static [&'static str]> {
    UNIT_ALIASES.iter().copied().find(|group| group.contains(&unit))
}

/// Digit and word forms of a small number value.
fn number_forms(value: &str) -> Vec<String> {
    if let Ok(n) = value.parse::<usize>() {
        let mut forms = vec![n.to_string()];
        if let Some(word) = NUMBER_WORDS.get(n) {
            forms.push((*word).to_string());
        }
        return forms;
    }
    match NUMBER_WORDS.iter().position(|w| *w == value) {
        Some(n) => vec![value.to_string(), n.to_string()],
        None => Vec::new(),
    }
}

/// A bare number, as digits or as an English word (zero to twenty).
#[must_use]
pub fn match_numeric(tokens: &[Token], value: &str) -> Option<usize> {
    number_forms(value)
        .iter()
        .filter_map(|form| find_token(tokens, form))
        .min()
}

/// Split a value like `"$1,299"` or `"55 inches"` into number and unit.
fn split_number_unit(value: &str) -> Option<(&str, Option<&str>)> {
    let rest = value.trim_start_matches(CURRENCY);
    let end = rest
        .find(|c: char| !(c.is_ascii_digit() || c == '.' || c == ','))
        .unwrap_or(rest.len());
    let number = rest[..end].trim_end_matches(['.', ',']);
    if number.is_empty() {
        return None;
    }
    let unit = rest[end..]
        .split(' ')
        .filter(|w| !w.is_empty())
        .find(|w| unit_aliases(w).is_some());
    Some((number, unit))
}

/// Whether a token spells `number`, possibly with currency or an attached unit.
fn is_number_token(token: &str, number: &str, aliases: &[&str]) -> bool {
    let token = token.trim_start_matches(CURRENCY);
    match token.strip_prefix(number) {
        Some("") => true,
        Some(suffix) => aliases.contains(&suffix),
        None => false,
    }
}

/// A number followed by its unit (`"55 inch"`, `"50w"`, `"$299"`).
///
/// An occurrence with the unit within [`UNIT_WINDOW`] tokens wins over a
/// bare one.
#[must_use]
pub fn match_numeric_with_unit(tokens: &[Token], value: &str) -> Option<usize> {
    let (number, unit) = split_number_unit(value)?;
    let aliases = unit.and_then(unit_aliases).unwrap_or(&[]);

    let occurrences: Vec<usize> = tokens
        .iter()
        .enumerate()
        .filter(|(_, t)| is_number_token(&t.text, number, aliases))
        .map(|(i, _)| i)
        .collect();

    let with_unit = occurrences.iter().copied().find(|&i| {
        tokens[i].text.trim_start_matches(CURRENCY) != number
            || tokens[i + 1..]
                .iter()
                .take(UNIT_WINDOW)
                .any(|t| aliases.contains(&t.text.as_str()))
    });

    with_unit
        .or_else(|| occurrences.first().copied())
        .map(|i| tokens[i].start)
}

/// A four-digit year, or its two-digit short form (`'15`, `15`).
#[must_use]
pub fn match_year(tokens: &[Token], value: &str) -> Option<usize> {
    if value.len() != 4 || !value.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if let Some(pos) = find_token(tokens, value) {
        return Some(pos);
    }
    let short = &value[2..];
    find_token(tokens, &format!("'{short}")).or_else(|| find_token(tokens, short))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::tokenize;

    #[test]
    fn test_numeric_digits_and_words() {
        let tokens = tokenize("a table for 3 people");
        assert_eq!(match_numeric(&tokens, "3"), Some(12));
        assert_eq!(match_numeric(&tokens, "three"), Some(12));

        let tokens = tokenize("a table for three people");
        assert_eq!(match_numeric(&tokens, "3"), Some(12));
    }

    #[test]
    fn test_numeric_whole_tokens_only() {
        let tokens = tokenize("opened in 2013");
        assert_eq!(match_numeric(&tokens, "3"), None);
        assert_eq!(match_numeric(&tokens, "many"), None);
    }

    #[test]
    fn test_unit_window_preferred() {
        let tokens = tokenize("for 55 dollars you get a 55 inch screen");
        assert_eq!(match_numeric_with_unit(&tokens, "55 inches"), Some(25));
        assert_eq!(match_numeric_with_unit(&tokens, "55 dollars"), Some(4));
    }

    #[test]
    fn test_attached_unit_and_currency() {
        let tokens = tokenize("it draws 50w at most");
        assert_eq!(match_numeric_with_unit(&tokens, "50 watts"), Some(9));

        let tokens = tokenize("it costs $299 today");
        assert_eq!(match_numeric_with_unit(&tokens, "$299"), Some(9));
        assert_eq!(match_numeric_with_unit(&tokens, "299 dollars"), Some(9));
    }

    #[test]
    fn test_bare_occurrence_fallback() {
        let tokens = tokenize("it weighs 4 and is light");
        assert_eq!(match_numeric_with_unit(&tokens, "4 pounds"), Some(10));
    }

    #[test]
    fn test_non_numeric_value() {
        let tokens = tokenize("it is large");
        assert_eq!(match_numeric_with_unit(&tokens, "large"), None);
    }

    #[test]
    fn test_year_forms() {
        assert_eq!(match_year(&tokenize("released in 2015"), "2015"), Some(12));
        assert_eq!(match_year(&tokenize("a '15 release"), "2015"), Some(3));
        assert_eq!(match_year(&tokenize("released in 2016"), "2015"), None);
        assert_eq!(match_year(&tokenize("released in 15"), "15"), None);
    }
}
