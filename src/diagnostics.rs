//! Structured events describing what the parser did with a statement.

use crate::detect::StatementFormat;
use crate::parser::{SkipReason, Strategy};
use crate::transaction::Transaction;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    FormatDetected(StatementFormat),
    Accepted {
        strategy: Strategy,
        transaction: Transaction,
    },
    Skipped {
        strategy: Strategy,
        reason: SkipReason,
    },
    StrategyFinished {
        strategy: Strategy,
        found: usize,
        skipped: usize,
    },
}

/// Receives parser diagnostics. Inject a `Vec<Diagnostic>` to inspect them,
/// or use [`LogSink`] to send them to the `log` facade.
pub trait DiagnosticSink {
    fn emit(&mut self, diagnostic: Diagnostic);
}

impl DiagnosticSink for Vec<Diagnostic> {
    fn emit(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl DiagnosticSink for LogSink {
    fn emit(&mut self, diagnostic: Diagnostic) {
        match diagnostic {
            Diagnostic::FormatDetected(format) => {
                log::info!("Detected {format} statement format");
            }
            Diagnostic::Accepted {
                strategy,
                transaction,
            } => {
                log::debug!(
                    "[{strategy}] withdrawal {} {} {:.50}",
                    transaction.date,
                    transaction.amount,
                    transaction.description
                );
            }
            Diagnostic::Skipped { strategy, reason } => {
                log::debug!("[{strategy}] skipped: {reason}");
            }
            Diagnostic::StrategyFinished {
                strategy,
                found,
                skipped,
            } => {
                log::info!("[{strategy}] found {found} withdrawals, skipped {skipped} records");
            }
        }
    }
}
