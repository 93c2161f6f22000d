//! Turning the text around a record into a readable description.

use std::sync::LazyLock;

use regex::Regex;

use crate::amount::remove_amounts;

static WHITESPACE_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("regex"));

/// A leading-keyword rewrite, e.g. `TO TRANSFER-` → `Transfer to `.
pub(crate) struct PrefixRewrite {
    pattern: LazyLock<Regex>,
    replacement: &'static str,
}

impl PrefixRewrite {
    pub(crate) const fn new(pattern: fn() -> Regex, replacement: &'static str) -> Self {
        Self {
            pattern: LazyLock::new(pattern),
            replacement,
        }
    }
}

pub fn collapse_whitespace(s: &str) -> String {
    WHITESPACE_REGEX.replace_all(s.trim(), " ").into_owned()
}

/// Drops every amount and normalizes whitespace.
pub fn strip_and_collapse(raw: &str) -> String {
    collapse_whitespace(&remove_amounts(raw))
}

/// Applies the first matching prefix rewrite. Whitespace is not collapsed
/// again afterwards, so `TO TRANSFER- JOHN` becomes `Transfer to  JOHN`.
pub(crate) fn rewrite_prefix(s: &str, rewrites: &[PrefixRewrite]) -> String {
    let rewritten = rewrites
        .iter()
        .find(|rewrite| rewrite.pattern.is_match(s))
        .map(|rewrite| rewrite.pattern.replace(s, rewrite.replacement).into_owned())
        .unwrap_or_else(|| s.to_owned());
    rewritten.trim().to_owned()
}

/// Truncates to at most `limit` characters, never splitting a character.
pub fn truncate(mut s: String, limit: usize) -> String {
    if let Some((byte_index, _)) = s.char_indices().nth(limit) {
        s.truncate(byte_index);
    }
    s
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::*;

    static REWRITES: [PrefixRewrite; 1] = [PrefixRewrite::new(
        || Regex::new(r"(?i)^TO TRANSFER-?").expect("regex"),
        "Transfer to ",
    )];

    #[test]
    fn should_strip_amounts_and_rewrite_prefix() {
        let line = "TO TRANSFER- JOHN DOE   A/C 1,180.00 62,780.51";
        let stripped = strip_and_collapse(line);
        assert_eq!("TO TRANSFER- JOHN DOE A/C", stripped);
        assert_eq!("Transfer to  JOHN DOE A/C", rewrite_prefix(&stripped, &REWRITES));
    }

    #[test]
    fn should_strip_repeated_amounts() {
        assert_eq!(
            "REFUND OF PAID",
            strip_and_collapse("REFUND OF 500.00\tPAID 500.00")
        );
    }

    #[test]
    fn should_truncate_on_character_boundaries() {
        assert_eq!("₹₹", truncate("₹₹₹".to_owned(), 2));
        assert_eq!("abc", truncate("abc".to_owned(), 200));
    }
}
