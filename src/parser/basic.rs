//! Last resort for statements that print debits with a minus sign.
//!
//! Lines are read in order, keeping the last date and the last negative
//! amount seen; the next date line (or the end of the text) closes the
//! record.

use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;

use super::{Record, SkipReason};
use crate::amount::parse_amount;
use crate::config::ParserConfig;
use crate::dates::parse_numeric;
use crate::description::strip_and_collapse;
use crate::transaction::Transaction;

static DATE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\d{1,2}[/-]\d{1,2}[/-](?:\d{4}|\d{2})\b").expect("regex"));

static NEGATIVE_AMOUNT_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|\s)(?:-\s?₹?|₹\s?-)\s?(?P<value>\d[\d,]*(?:\.\d{1,2})?)").expect("regex")
});

struct Pending<'a> {
    line: usize,
    raw_date: &'a str,
    description: String,
    amount: Option<Decimal>,
}

#[must_use = "iterators are lazy and do nothing unless consumed"]
pub(super) struct BasicRecords<'a> {
    lines: std::iter::Enumerate<std::slice::Iter<'a, &'a str>>,
    config: &'a ParserConfig,
    pending: Option<Pending<'a>>,
}

impl<'a> BasicRecords<'a> {
    pub(super) fn new(lines: &'a [&'a str], config: &'a ParserConfig) -> Self {
        Self {
            lines: lines.iter().enumerate(),
            config,
            pending: None,
        }
    }

    fn observe(&mut self, text: &str) {
        let Some(pending) = self.pending.as_mut() else {
            return;
        };
        if let Some(value) = NEGATIVE_AMOUNT_REGEX
            .captures_iter(text)
            .filter_map(|groups| parse_amount(&groups["value"]))
            .last()
        {
            pending.amount = Some(value);
        }
        pending.description.push(' ');
        pending
            .description
            .push_str(&NEGATIVE_AMOUNT_REGEX.replace_all(text, " "));
    }

    fn close(&self, pending: Pending<'_>) -> Record {
        let Some(amount) = pending.amount else {
            return Err(SkipReason::NoAmount { line: pending.line });
        };
        let date = parse_numeric(pending.raw_date).map_err(|source| SkipReason::InvalidDate {
            line: pending.line,
            raw: pending.raw_date.to_owned(),
            source,
        })?;
        Transaction::withdrawal(
            date,
            strip_and_collapse(&pending.description),
            amount,
            self.config,
            pending.line,
        )
    }
}

impl Iterator for BasicRecords<'_> {
    type Item = Record;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((index, line)) = self.lines.next() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let Some(date_match) = DATE_REGEX.find(line) else {
                self.observe(line);
                continue;
            };
            let closed = self.pending.replace(Pending {
                line: index + 1,
                raw_date: date_match.as_str(),
                description: String::new(),
                amount: None,
            });
            self.observe(&format!(
                "{} {}",
                &line[..date_match.start()],
                &line[date_match.end()..]
            ));
            if let Some(closed) = closed {
                return Some(self.close(closed));
            }
        }
        self.pending.take().map(|pending| self.close(pending))
    }
}
