//! State Bank of India account statements.
//!
//! Columns are `Txn Date | Value Date | Description | Ref No. | Debit |
//! Credit | Balance`, but once extracted to text a row looks like:
//!
//! ```text
//! 4 Apr 2024 4 Apr 2024 TO TRANSFER- JOHN DOE A/C XXXX1234 1,180.00 62,780.51
//! ```
//!
//! or, when the PDF wraps cells, is spread over several lines with the
//! year of each date on its own line:
//!
//! ```text
//! 15 Apr
//! 2024
//! 15 Apr
//! 2024
//! TO TRANSFER-
//! JOHN DOE
//! 2,000.00 60,780.51
//! ```
//!
//! Empty Debit/Credit cells vanish from the text, so the amount line
//! usually holds the transaction amount followed by the balance.

use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;

use super::{Record, SkipReason};
use crate::amount::{find_amounts, MoneyToken};
use crate::classify::{classify, is_fee_or_charge, Classification};
use crate::config::ParserConfig;
use crate::dates::{parse_day_month_year, YearStyle, MONTH_ALTERNATION};
use crate::description::{rewrite_prefix, strip_and_collapse, PrefixRewrite};
use crate::transaction::Transaction;

static FULL_DATE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)^(\d{{1,2}}\s+(?:{MONTH_ALTERNATION})\s+\d{{4}})\b\s*(.*)$"
    ))
    .expect("regex")
});

static PARTIAL_DATE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?i)^\d{{1,2}}\s+(?:{MONTH_ALTERNATION})$")).expect("regex")
});

static YEAR_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d{4}$").expect("regex"));

static REWRITES: [PrefixRewrite; 2] = [
    PrefixRewrite::new(
        || Regex::new(r"(?i)^TO TRANSFER-?").expect("regex"),
        "Transfer to ",
    ),
    PrefixRewrite::new(
        || Regex::new(r"(?i)^Forex Txn-").expect("regex"),
        "Forex Transaction - ",
    ),
];

/// A transaction date, possibly assembled from two lines.
struct DateHeader<'a> {
    raw: String,
    /// Text following the date on its line.
    rest: &'a str,
    /// Number of lines the date occupies.
    consumed: usize,
}

#[must_use = "iterators are lazy and do nothing unless consumed"]
pub(super) struct SbiRecords<'a> {
    lines: &'a [&'a str],
    config: &'a ParserConfig,
    pos: usize,
}

impl<'a> SbiRecords<'a> {
    pub(super) fn new(lines: &'a [&'a str], config: &'a ParserConfig) -> Self {
        Self {
            lines,
            config,
            pos: 0,
        }
    }

    fn line(&self, index: usize) -> Option<&'a str> {
        self.lines.get(index).copied().map(str::trim)
    }

    fn date_header(&self, index: usize) -> Option<DateHeader<'a>> {
        let line = self.line(index)?;
        if let Some(groups) = FULL_DATE_REGEX.captures(line) {
            return Some(DateHeader {
                raw: groups[1].to_owned(),
                rest: groups.get(2).map_or("", |m| m.as_str().trim()),
                consumed: 1,
            });
        }
        if PARTIAL_DATE_REGEX.is_match(line) {
            let year = self.line(index + 1).filter(|l| YEAR_REGEX.is_match(l))?;
            return Some(DateHeader {
                raw: format!("{line} {year}"),
                rest: "",
                consumed: 2,
            });
        }
        None
    }

    fn starts_new_record(line: &str) -> bool {
        (FULL_DATE_REGEX.is_match(line) && !line.to_lowercase().contains("txn date"))
            || PARTIAL_DATE_REGEX.is_match(line)
    }

    fn is_column_header(line: &str) -> bool {
        line.contains("Debit") && line.contains("Credit") && line.contains("Balance")
    }

    fn record(&mut self, start: usize, header: DateHeader<'a>) -> Record {
        let line_number = start + 1;
        let mut next = start + header.consumed;
        let mut first = (next - 1, header.rest);

        // The value date follows the transaction date, on the same line or
        // on the next one(s).
        if let Some(groups) = FULL_DATE_REGEX.captures(header.rest) {
            first.1 = groups.get(2).map_or("", |m| m.as_str().trim());
        } else if header.rest.is_empty() {
            if let Some(value_date) = self.date_header(next) {
                next += value_date.consumed;
                first = (next - 1, value_date.rest);
            }
        }

        let end = (next + self.config.sbi_lookahead).min(self.lines.len());
        let candidates = std::iter::once(first)
            .filter(|(_, line)| !line.is_empty())
            .chain((next..end).filter_map(|j| self.line(j).map(|line| (j, line))));

        let mut description: Vec<&str> = Vec::new();
        let mut amount_line: Option<(usize, Vec<MoneyToken<'a>>)> = None;
        for (j, line) in candidates {
            if j >= next && Self::starts_new_record(line) {
                break;
            }
            let tokens = find_amounts(line);
            if tokens.iter().any(|t| t.value >= self.config.min_amount) {
                description.push(line);
                amount_line = Some((j, tokens));
                break;
            }
            if !line.is_empty() && !line.to_lowercase().contains("txn date") {
                description.push(line);
            }
        }

        let Some((amount_index, tokens)) = amount_line else {
            self.pos = next;
            return Err(SkipReason::NoAmount { line: line_number });
        };
        self.pos = amount_index + 1;

        let joined = description.join(" ");
        let description = strip_and_collapse(&joined);
        let classification = classify(&description, self.config);
        let amount = resolve_amount(
            &tokens,
            classification,
            &description,
            self.config,
            line_number,
        )?;

        let date = parse_day_month_year(&header.raw, YearStyle::Full).map_err(|source| {
            SkipReason::InvalidDate {
                line: line_number,
                raw: header.raw.clone(),
                source,
            }
        })?;

        Transaction::withdrawal(
            date,
            rewrite_prefix(&description, &REWRITES),
            amount,
            self.config,
            line_number,
        )
    }
}

/// Picks the debit amount from an amount line.
///
/// With three or more amounts the last three are the Debit, Credit and
/// Balance columns, and a column that is effectively empty settles the
/// direction. With fewer, the first amount is the transaction and the
/// keywords decide; a lone amount is only trusted for fees, since it may
/// just as well be the balance.
fn resolve_amount(
    tokens: &[MoneyToken<'_>],
    classification: Classification,
    description: &str,
    config: &ParserConfig,
    line: usize,
) -> Result<Decimal, SkipReason> {
    if classification == Classification::Credit {
        return Err(SkipReason::Credit { line });
    }

    if let [.., debit, credit, _balance] = tokens {
        let debit_present = debit.value >= config.min_amount;
        let credit_present = credit.value >= config.min_amount;
        return match (debit_present, credit_present, classification) {
            (true, false, _) | (true, true, Classification::Debit) => Ok(debit.value),
            (false, true, _) => Err(SkipReason::Credit { line }),
            (false, false, _) => Err(SkipReason::NoAmount { line }),
            (true, true, _) => Err(SkipReason::Unclassified { line }),
        };
    }

    let significant: Vec<Decimal> = tokens
        .iter()
        .map(|t| t.value)
        .filter(|value| *value >= config.min_amount)
        .collect();
    match (classification, significant.as_slice()) {
        (_, []) => Err(SkipReason::NoAmount { line }),
        (Classification::Unknown, _) => Err(SkipReason::Unclassified { line }),
        (_, [first, _, ..]) => Ok(*first),
        (_, [only]) if is_fee_or_charge(description) => Ok(*only),
        (_, [_]) => Err(SkipReason::AmbiguousAmount { line }),
    }
}

impl Iterator for SbiRecords<'_> {
    type Item = Record;

    fn next(&mut self) -> Option<Self::Item> {
        while self.pos < self.lines.len() {
            let start = self.pos;
            let Some(header) = self.date_header(start) else {
                self.pos += 1;
                continue;
            };
            if self.line(start).is_some_and(Self::is_column_header) {
                self.pos = start + header.consumed;
                continue;
            }
            return Some(self.record(start, header));
        }
        None
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use helpers::*;

    #[test]
    fn should_parse_a_single_line_row() {
        let records = parse(&[
            "4 Apr 2024 4 Apr 2024 TO TRANSFER- JOHN DOE A/C XXXX1234 1,180.00 62,780.51",
        ]);
        assert_eq!(
            vec![Ok(withdrawal(
                date(2024, 4, 4),
                "Transfer to  JOHN DOE A/C XXXX1234",
                dec!(1_180.00)
            ))],
            records
        );
    }

    #[test]
    fn should_keep_upi_transfers_to_named_payees() {
        assert_eq!(
            vec![
                Ok(withdrawal(
                    date(2024, 4, 4),
                    "Transfer to UPI/DR/412345678901/CROMA/HDFC/croma.pay",
                    dec!(1_499.00)
                )),
                Ok(withdrawal(
                    date(2024, 4, 5),
                    "Transfer to UPI/DR/412345678902/MR RAVI KUMAR/SBIN",
                    dec!(500.00)
                )),
            ],
            parse(&[
                "4 Apr 2024 4 Apr 2024 TO TRANSFER-UPI/DR/412345678901/CROMA/HDFC/croma.pay 1,499.00 61,281.51",
                "5 Apr 2024 5 Apr 2024 TO TRANSFER-UPI/DR/412345678902/MR RAVI KUMAR/SBIN 500.00 60,781.51",
            ])
        );
    }

    #[test]
    fn should_assemble_dates_split_over_two_lines() {
        let split = parse(&[
            "15 Apr",
            "2024",
            "15 Apr",
            "2024",
            "TO TRANSFER-",
            "JOHN DOE",
            "2,000.00 60,780.51",
        ]);
        let joined = parse(&[
            "15 Apr 2024",
            "15 Apr 2024",
            "TO TRANSFER-",
            "JOHN DOE",
            "2,000.00 60,780.51",
        ]);
        assert_eq!(
            vec![Ok(withdrawal(
                date(2024, 4, 15),
                "Transfer to  JOHN DOE",
                dec!(2_000.00)
            ))],
            split
        );
        assert_eq!(split, joined);
    }

    #[test]
    fn should_skip_credits() {
        assert_eq!(
            vec![Err(SkipReason::Credit { line: 1 })],
            parse(&["15 Apr 2024", "BY TRANSFER- SALARY", "50,000.00"])
        );
    }

    #[test]
    fn should_skip_rows_without_keywords() {
        assert_eq!(
            vec![Err(SkipReason::Unclassified { line: 1 })],
            parse(&["15 Apr 2024 15 Apr 2024 NEW CHQ BOOK 300.00 9,700.00"])
        );
    }

    #[test]
    fn should_trust_a_single_amount_only_for_fees() {
        assert_eq!(
            vec![
                Ok(withdrawal(
                    date(2024, 4, 30),
                    "Forex Transaction - Commission",
                    dec!(150.00)
                )),
                Err(SkipReason::AmbiguousAmount { line: 2 }),
            ],
            parse(&[
                "30 Apr 2024 30 Apr 2024 Forex Txn-Commission 150.00",
                "30 Apr 2024 30 Apr 2024 TO TRANSFER- RENT 62,000.00",
            ])
        );
    }

    #[test]
    fn should_read_debit_credit_balance_columns() {
        assert_eq!(
            vec![
                Ok(withdrawal(date(2024, 5, 2), "INB IMPS 1234", dec!(750.00))),
                Err(SkipReason::Credit { line: 2 }),
            ],
            parse(&[
                "2 May 2024 2 May 2024 INB IMPS 1234 750.00 0.00 9,250.00",
                "3 May 2024 3 May 2024 INB IMPS 5678 0.00 750.00 10,000.00",
            ])
        );
    }

    #[test]
    fn should_stop_the_window_at_the_next_date() {
        assert_eq!(
            vec![
                Err(SkipReason::NoAmount { line: 1 }),
                Ok(withdrawal(date(2024, 4, 6), "Transfer to RENT", dec!(9_000.00))),
            ],
            parse(&[
                "5 Apr 2024",
                "OPENING BALANCE",
                "6 Apr 2024 6 Apr 2024",
                "TO TRANSFER-RENT",
                "9,000.00 1,000.00",
            ])
        );
    }

    #[test]
    fn should_not_reuse_the_amount_line() {
        let records = parse(&[
            "7 Apr 2024 7 Apr 2024 TO TRANSFER- A 100.00 900.00",
            "8 Apr 2024 8 Apr 2024 TO TRANSFER- B 200.00 700.00",
        ]);
        assert_eq!(2, records.len());
        assert!(records.iter().all(Result::is_ok));
    }

    #[test]
    fn should_skip_column_headers_and_ignore_txn_date_labels() {
        assert_eq!(
            vec![Ok(withdrawal(date(2024, 4, 9), "Transfer to  X", dec!(10.00)))],
            parse(&[
                "1 Apr 2024 Txn Date Debit Credit Balance",
                "9 Apr 2024 9 Apr 2024 TO TRANSFER- X",
                "Txn Date",
                "10.00 990.00",
            ])
        );
    }

    #[test]
    fn should_drop_impossible_dates() {
        let records = parse(&["31 Feb 2024 31 Feb 2024 TO TRANSFER- X 10.00 990.00"]);
        assert!(matches!(
            records.as_slice(),
            [Err(SkipReason::InvalidDate { line: 1, .. })]
        ));
    }

    #[test]
    fn should_give_up_after_the_lookahead_window() {
        let mut lines = vec!["9 Apr 2024"];
        lines.extend(std::iter::repeat("TO TRANSFER- X").take(20));
        lines.push("10.00 990.00");
        assert_eq!(vec![Err(SkipReason::NoAmount { line: 1 })], parse(&lines));
    }

    #[test]
    fn should_cap_long_descriptions() {
        let long = format!("TO TRANSFER- {}", "X".repeat(10_000));
        let records = parse(&["9 Apr 2024", long.as_str(), "10.00 990.00"]);
        let transaction = records[0].as_ref().expect("transaction");
        assert_eq!(200, transaction.description.chars().count());
    }

    mod helpers {
        use chrono::NaiveDate;
        use rust_decimal::Decimal;

        use super::super::*;
        use crate::transaction::TransactionKind;

        pub(super) fn parse(lines: &[&str]) -> Vec<Record> {
            let config = ParserConfig::default();
            SbiRecords::new(lines, &config).collect()
        }

        pub(super) fn date(year: i32, month: u32, day: u32) -> NaiveDate {
            NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
        }

        pub(super) fn withdrawal(date: NaiveDate, description: &str, amount: Decimal) -> Transaction {
            Transaction {
                date,
                description: description.to_owned(),
                amount,
                kind: TransactionKind::Withdrawal,
            }
        }
    }
}
