//! Standard Chartered statements.
//!
//! A row opens with the transaction and value dates on one line
//! (`17 Jun 19  16 Jun 19`), followed by description lines and a line
//! holding the amount and the running balance. Further transactions on the
//! same day omit the date line and start directly with their type keyword
//! (`PURCHASE`, `UPI/`, `IMPS/`, ...).

use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;

use super::{Record, SkipReason};
use crate::amount::{contains_amount, find_amounts, MoneyToken};
use crate::classify::{classify, Classification};
use crate::config::ParserConfig;
use crate::dates::{parse_day_month_year, YearStyle, MONTH_ALTERNATION};
use crate::description::{rewrite_prefix, strip_and_collapse, PrefixRewrite};
use crate::transaction::Transaction;

static DATE_PAIR_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)^(\d{{1,2}}\s+(?:{MONTH_ALTERNATION})\s+\d{{2}})\s+\d{{1,2}}\s+(?:{MONTH_ALTERNATION})\s+\d{{2}}\b\s*(.*)$"
    ))
    .expect("regex")
});

static CONTINUATION_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:PURCHASE|UPI/|IMPS/|ATM|CRADJ|CREDIT)").expect("regex")
});

static REWRITES: [PrefixRewrite; 4] = [
    PrefixRewrite::new(
        || Regex::new(r"(?i)^PURCHASE\s+").expect("regex"),
        "Purchase at ",
    ),
    PrefixRewrite::new(
        || Regex::new(r"(?i)^ATM WITHDRAWAL\s+").expect("regex"),
        "ATM Withdrawal - ",
    ),
    PrefixRewrite::new(
        || Regex::new(r"(?i)^UPI/").expect("regex"),
        "UPI Payment - ",
    ),
    PrefixRewrite::new(|| Regex::new(r"(?i)^IMPS/").expect("regex"), "IMPS - "),
];

#[must_use = "iterators are lazy and do nothing unless consumed"]
pub(super) struct StandardCharteredRecords<'a> {
    lines: &'a [&'a str],
    config: &'a ParserConfig,
    pos: usize,
    last_date: Option<&'a str>,
}

/// Where a record's description starts.
struct RecordStart<'a> {
    date: &'a str,
    /// Text on the opening line that belongs to the description.
    first: &'a str,
    /// Index of the first line after the opening line.
    next: usize,
}

impl<'a> StandardCharteredRecords<'a> {
    pub(super) fn new(lines: &'a [&'a str], config: &'a ParserConfig) -> Self {
        Self {
            lines,
            config,
            pos: 0,
            last_date: None,
        }
    }

    fn line(&self, index: usize) -> Option<&'a str> {
        self.lines.get(index).copied().map(str::trim)
    }

    fn record(&mut self, index: usize, start: RecordStart<'a>) -> Record {
        let line_number = index + 1;
        let end = (start.next + self.config.standard_chartered_lookahead).min(self.lines.len());
        let candidates = std::iter::once((index, start.first))
            .chain((start.next..end).filter_map(|j| self.line(j).map(|line| (j, line))));

        let mut description: Vec<&str> = Vec::new();
        let mut amount_line: Option<(usize, &str)> = None;
        for (j, line) in candidates {
            if j >= start.next && DATE_PAIR_REGEX.is_match(line) {
                break;
            }
            if line.is_empty() {
                continue;
            }
            if contains_amount(line) {
                amount_line = Some((j, line));
                break;
            }
            description.push(line);
        }

        let Some((amount_index, amount_text)) = amount_line else {
            self.pos = start.next;
            return Err(SkipReason::NoAmount { line: line_number });
        };
        self.pos = amount_index + 1;

        let tokens: Vec<MoneyToken<'_>> = find_amounts(amount_text)
            .into_iter()
            .filter(|t| t.value > Decimal::ZERO && t.value < self.config.max_amount)
            .collect();
        let [.., withdrawal, _balance] = tokens.as_slice() else {
            return Err(SkipReason::NoAmount { line: line_number });
        };

        description.push(amount_text);
        let joined = description.join(" ");
        let description = strip_and_collapse(&joined);
        match classify(&description, self.config) {
            Classification::Credit => return Err(SkipReason::Credit { line: line_number }),
            Classification::Unknown => {
                return Err(SkipReason::Unclassified { line: line_number })
            }
            Classification::Debit => {}
        }

        let date = parse_day_month_year(start.date, YearStyle::TwoDigit).map_err(|source| {
            SkipReason::InvalidDate {
                line: line_number,
                raw: start.date.to_owned(),
                source,
            }
        })?;

        Transaction::withdrawal(
            date,
            rewrite_prefix(&description, &REWRITES),
            withdrawal.value,
            self.config,
            line_number,
        )
    }
}

impl Iterator for StandardCharteredRecords<'_> {
    type Item = Record;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(line) = self.line(self.pos) {
            let index = self.pos;
            self.pos += 1;

            let start = if let Some(groups) = DATE_PAIR_REGEX.captures(line) {
                let date = groups.get(1).map_or("", |m| m.as_str());
                self.last_date = Some(date);
                if line.to_uppercase().contains("BALANCE FORWARD") {
                    return Some(Err(SkipReason::BalanceForward { line: index + 1 }));
                }
                RecordStart {
                    date,
                    first: groups.get(2).map_or("", |m| m.as_str().trim()),
                    next: index + 1,
                }
            } else if CONTINUATION_REGEX.is_match(line) {
                let Some(date) = self.last_date else {
                    continue;
                };
                RecordStart {
                    date,
                    first: line,
                    next: index + 1,
                }
            } else {
                continue;
            };
            return Some(self.record(index, start));
        }
        None
    }
}
