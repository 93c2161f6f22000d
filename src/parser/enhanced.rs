//! Already-tabular text: `date description debit [credit]` on one line,
//! matched by a single regex over the whole statement.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use super::generic::NUMERIC_DATE_PATTERN;
use super::{Record, SkipReason};
use crate::amount::{money_pattern, parse_amount};
use crate::classify::{classify, Classification};
use crate::config::ParserConfig;
use crate::dates::parse_numeric;
use crate::description::collapse_whitespace;
use crate::transaction::Transaction;

const DATE_FIELD: &str = "date";
const DESCRIPTION_FIELD: &str = "description";
const DEBIT_FIELD: &str = "debit";
const CREDIT_FIELD: &str = "credit";

static ROW_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    let money = money_pattern();
    Regex::new(&format!(
        r"(?x)
        (?P<{DATE_FIELD}>{NUMERIC_DATE_PATTERN})
        [\x20\t]+
        (?P<{DESCRIPTION_FIELD}>[^\n]+?)
        [\x20\t]+
        ₹?(?P<{DEBIT_FIELD}>{money})
        (?:[\x20\t]+₹?(?P<{CREDIT_FIELD}>{money}))?
        "
    ))
    .expect("regex")
});

pub(super) fn records<'a>(
    text: &'a str,
    config: &'a ParserConfig,
) -> impl Iterator<Item = Record> + 'a {
    let mut line_number = 1;
    let mut counted_to = 0;
    ROW_REGEX.captures_iter(text).map(move |groups| {
        let start = groups.get(0).map_or(counted_to, |m| m.start());
        line_number += text[counted_to..start].matches('\n').count();
        counted_to = start;
        record(&groups, line_number, config)
    })
}

/// The debit column is taken as the withdrawal unless the description
/// reads as a credit. The credit column only anchors the match.
fn record(groups: &Captures<'_>, line: usize, config: &ParserConfig) -> Record {
    let description = collapse_whitespace(&groups[DESCRIPTION_FIELD]);
    if classify(&description, config) == Classification::Credit {
        return Err(SkipReason::Credit { line });
    }
    let amount = parse_amount(&groups[DEBIT_FIELD]).ok_or(SkipReason::NoAmount { line })?;
    let date = parse_numeric(&groups[DATE_FIELD]).map_err(|source| SkipReason::InvalidDate {
        line,
        raw: groups[DATE_FIELD].to_owned(),
        source,
    })?;
    Transaction::withdrawal(date, description, amount, config, line)
}
