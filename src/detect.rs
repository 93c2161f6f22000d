use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

/// Issuer layout suggested by signature text. Advisory only: every
/// strategy validates its own line patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementFormat {
    Sbi,
    StandardChartered,
    Unrecognized,
}

impl fmt::Display for StatementFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Sbi => "SBI",
            Self::StandardChartered => "Standard Chartered",
            Self::Unrecognized => "unrecognized",
        })
    }
}

static SBI_IFSC_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)IFS(?:C)?\s*Code\s*:?\s*SBIN").expect("regex"));

pub fn detect_format(text: &str) -> StatementFormat {
    let lower = text.to_lowercase();
    let is_account_statement = lower.contains("account statement");
    let has_sbi_marker = lower.contains("txn date")
        || SBI_IFSC_REGEX.is_match(text)
        || lower.contains("state bank of india")
        || text.contains("SBI");

    if is_account_statement && has_sbi_marker {
        StatementFormat::Sbi
    } else if lower.contains("standard chartered") {
        StatementFormat::StandardChartered
    } else {
        StatementFormat::Unrecognized
    }
}
