//! Monetary tokens as they appear in Indian statements.
//!
//! Amounts always carry two decimals and use commas for digit grouping,
//! with groups of two or three digits (`1,96,760.96`, `62,780.51`). Plain
//! digit runs (`1180.00`) are accepted too.

use std::borrow::Cow;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;

const MONEY_PATTERN: &str = r"(?:\d{1,3}(?:,\d{2,3})+|\d+)\.\d{2}";

static MONEY_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"\b{MONEY_PATTERN}")).expect("regex"));

/// An amount found in a line, together with the exact text it was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoneyToken<'a> {
    pub text: &'a str,
    pub value: Decimal,
}

/// Pattern fragment for embedding in larger regexes.
pub(crate) fn money_pattern() -> &'static str {
    MONEY_PATTERN
}

pub fn contains_amount(line: &str) -> bool {
    MONEY_REGEX.is_match(line)
}

/// Every amount in `line`, left to right.
pub fn find_amounts(line: &str) -> Vec<MoneyToken<'_>> {
    MONEY_REGEX
        .find_iter(line)
        .filter_map(|m| {
            parse_amount(m.as_str()).map(|value| MoneyToken {
                text: m.as_str(),
                value,
            })
        })
        .collect()
}

/// `line` with every amount removed.
pub fn remove_amounts(line: &str) -> Cow<'_, str> {
    MONEY_REGEX.replace_all(line, "")
}

/// Parses `1,96,760.96`, `₹1,180.00` or `1180.00`.
pub fn parse_amount(s: &str) -> Option<Decimal> {
    let digits: String = s
        .trim()
        .chars()
        .filter(|c| *c != ',' && *c != '₹')
        .collect();
    Decimal::from_str(&digits).ok()
}
