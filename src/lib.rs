#![warn(clippy::unwrap_used)]
#![doc = include_str!("../README.md")]

pub mod amount;
pub mod classify;
pub mod config;
pub mod dates;
pub mod description;
pub mod detect;
pub mod diagnostics;
pub mod error;
pub mod extract;
pub mod parser;
pub mod transaction;

pub use config::ParserConfig;
pub use detect::{detect_format, StatementFormat};
pub use diagnostics::{Diagnostic, DiagnosticSink, LogSink};
pub use error::{ConfigError, DateError, ExtractError};
pub use extract::extract_text;
pub use parser::{Extraction, Parser, SkipReason, StatementParser, Strategy};
pub use transaction::{Transaction, TransactionKind};

/// Extracts the text of a statement PDF and runs every applicable strategy
/// over it. Failing to get text out of the PDF is the only error.
pub fn parse_statement_pdf(
    pdf_bytes: &[u8],
    parser: &StatementParser,
    sink: &mut dyn DiagnosticSink,
) -> Result<Extraction, ExtractError> {
    let text = extract_text(pdf_bytes)?;
    Ok(parser.extract(&text, sink))
}

/// Withdrawals in already-extracted statement text, with default settings.
pub fn parse_statement_text(text: &str) -> Vec<Transaction> {
    StatementParser::default().parse(text)
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn should_parse_text_with_default_settings() {
        let transactions = parse_statement_text(
            "Account Statement\nTxn Date Value Date Description Debit Credit Balance\n\
             5 Apr 2024 5 Apr 2024 SMS CHARGES 17.70 62,762.81",
        );
        assert_eq!(1, transactions.len());
        assert_eq!(dec!(17.70), transactions[0].amount);
    }
}
