//! Strategy dispatch over the known statement layouts.
//!
//! Each strategy turns statement text into a stream of [`Record`]s, one
//! per candidate transaction. A candidate either becomes a
//! [`Transaction`] or is dropped with a [`SkipReason`]; nothing a strategy
//! meets in the text can abort the parse. Strategies are tried in
//! [`Strategy::ORDER`] and the first one that yields withdrawals wins.

mod basic;
mod enhanced;
mod generic;
mod sbi;
mod standard_chartered;

use std::fmt;

use rust_decimal::Decimal;

use crate::config::ParserConfig;
use crate::detect::{detect_format, StatementFormat};
use crate::diagnostics::{Diagnostic, DiagnosticSink, LogSink};
use crate::error::DateError;
use crate::transaction::Transaction;

/// Why a candidate record did not become a withdrawal. `line` is 1-based.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SkipReason {
    #[error("line {line}: could not parse date '{raw}': {source}")]
    InvalidDate {
        line: usize,
        raw: String,
        source: DateError,
    },

    #[error("line {line}: no amount found")]
    NoAmount { line: usize },

    #[error("line {line}: credit")]
    Credit { line: usize },

    #[error("line {line}: could not tell debit from credit")]
    Unclassified { line: usize },

    #[error("line {line}: single amount on a non-fee debit, could be the balance")]
    AmbiguousAmount { line: usize },

    #[error("line {line}: amount {amount} out of range")]
    AmountOutOfRange { line: usize, amount: Decimal },

    #[error("line {line}: balance brought forward")]
    BalanceForward { line: usize },
}

pub type Record = Result<Transaction, SkipReason>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    Sbi,
    StandardChartered,
    Generic,
    Enhanced,
    Basic,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Sbi => "sbi",
            Self::StandardChartered => "standard-chartered",
            Self::Generic => "generic",
            Self::Enhanced => "enhanced",
            Self::Basic => "basic",
        })
    }
}

impl Strategy {
    pub const ORDER: [Strategy; 5] = [
        Self::Sbi,
        Self::StandardChartered,
        Self::Generic,
        Self::Enhanced,
        Self::Basic,
    ];

    /// Whether this strategy should run for text tagged as `format`. Only
    /// the SBI parser is gated; the others validate their own patterns.
    pub fn applies_to(self, format: StatementFormat) -> bool {
        match self {
            Self::Sbi => format == StatementFormat::Sbi,
            _ => true,
        }
    }

    fn records<'a>(
        self,
        text: &'a str,
        lines: &'a [&'a str],
        config: &'a ParserConfig,
    ) -> Box<dyn Iterator<Item = Record> + 'a> {
        match self {
            Self::Sbi => Box::new(sbi::SbiRecords::new(lines, config)),
            Self::StandardChartered => Box::new(
                standard_chartered::StandardCharteredRecords::new(lines, config),
            ),
            Self::Generic => Box::new(generic::records(lines, config)),
            Self::Enhanced => Box::new(enhanced::records(text, config)),
            Self::Basic => Box::new(basic::BasicRecords::new(lines, config)),
        }
    }

    /// Runs this strategy alone, logging skipped records to `sink`.
    pub fn parse(
        self,
        text: &str,
        config: &ParserConfig,
        sink: &mut dyn DiagnosticSink,
    ) -> Vec<Transaction> {
        let lines: Vec<&str> = text.lines().collect();
        collect(self, self.records(text, &lines, config), sink)
    }
}

/// Folds a strategy's records into its withdrawals, reporting every skip.
fn collect(
    strategy: Strategy,
    records: impl Iterator<Item = Record>,
    sink: &mut dyn DiagnosticSink,
) -> Vec<Transaction> {
    let mut skipped = 0;
    let transactions: Vec<Transaction> = records
        .filter_map(|record| match record {
            Ok(transaction) => {
                sink.emit(Diagnostic::Accepted {
                    strategy,
                    transaction: transaction.clone(),
                });
                Some(transaction)
            }
            Err(reason) => {
                skipped += 1;
                sink.emit(Diagnostic::Skipped { strategy, reason });
                None
            }
        })
        .collect();
    sink.emit(Diagnostic::StrategyFinished {
        strategy,
        found: transactions.len(),
        skipped,
    });
    transactions
}

/// Anything that turns statement text into withdrawals.
pub trait Parser {
    fn parse(&self, text: &str) -> Vec<Transaction>;
}

/// Result of running the dispatch over one statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    pub format: StatementFormat,
    /// The strategy that produced the withdrawals, if any did.
    pub strategy: Option<Strategy>,
    pub transactions: Vec<Transaction>,
}

/// Tries every applicable strategy in priority order.
#[derive(Debug, Clone, Default)]
pub struct StatementParser {
    config: ParserConfig,
}

impl StatementParser {
    pub fn new(config: ParserConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    pub fn extract(&self, text: &str, sink: &mut dyn DiagnosticSink) -> Extraction {
        let format = detect_format(text);
        sink.emit(Diagnostic::FormatDetected(format));

        let lines: Vec<&str> = text.lines().collect();
        for strategy in Strategy::ORDER {
            if !strategy.applies_to(format) {
                continue;
            }
            let transactions = collect(
                strategy,
                strategy.records(text, &lines, &self.config),
                sink,
            );
            if !transactions.is_empty() {
                return Extraction {
                    format,
                    strategy: Some(strategy),
                    transactions,
                };
            }
        }
        Extraction {
            format,
            strategy: None,
            transactions: Vec::new(),
        }
    }
}

impl Parser for StatementParser {
    fn parse(&self, text: &str) -> Vec<Transaction> {
        self.extract(text, &mut LogSink).transactions
    }
}
