//! One transaction per line: a numeric date, some keywords and amounts.

use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;

use super::{Record, SkipReason};
use crate::amount::find_amounts;
use crate::classify::{classify_generic, Classification};
use crate::config::ParserConfig;
use crate::dates::parse_numeric;
use crate::description::strip_and_collapse;
use crate::transaction::Transaction;

/// Shortest line that can hold a date, a word and an amount.
const MIN_LINE_LENGTH: usize = 15;

pub(super) const NUMERIC_DATE_PATTERN: &str =
    r"\b(?:\d{4}-\d{1,2}-\d{1,2}|\d{1,2}[/.-]\d{1,2}[/.-](?:\d{4}|\d{2}))\b";

static NUMERIC_DATE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(NUMERIC_DATE_PATTERN).expect("regex"));

pub(super) fn records<'a>(
    lines: &'a [&'a str],
    config: &'a ParserConfig,
) -> impl Iterator<Item = Record> + 'a {
    lines
        .iter()
        .enumerate()
        .filter_map(move |(index, line)| record(index + 1, line.trim(), config))
}

fn record(line_number: usize, line: &str, config: &ParserConfig) -> Option<Record> {
    if line.chars().count() < MIN_LINE_LENGTH {
        return None;
    }
    let date_match = NUMERIC_DATE_REGEX.find(line)?;

    match classify_generic(line) {
        Classification::Credit => return Some(Err(SkipReason::Credit { line: line_number })),
        Classification::Unknown => {
            return Some(Err(SkipReason::Unclassified { line: line_number }))
        }
        Classification::Debit => {}
    }

    // Without the date, so that `15.04.2024` is not read as an amount.
    let rest = format!("{} {}", &line[..date_match.start()], &line[date_match.end()..]);
    let Some(amount) = find_amounts(&rest)
        .into_iter()
        .map(|t| t.value)
        .find(|value| *value > Decimal::ZERO && *value < config.max_amount)
    else {
        return Some(Err(SkipReason::NoAmount { line: line_number }));
    };

    let record = parse_numeric(date_match.as_str())
        .map_err(|source| SkipReason::InvalidDate {
            line: line_number,
            raw: date_match.as_str().to_owned(),
            source,
        })
        .and_then(|date| {
            Transaction::withdrawal(date, strip_and_collapse(&rest), amount, config, line_number)
        });
    Some(record)
}
