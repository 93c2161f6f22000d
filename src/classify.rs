//! Debit/credit heuristics shared by the strategies.
//!
//! Matching is case-insensitive substring search. Credit rules always run
//! first: a line that looks like money coming in is never reconsidered as a
//! withdrawal. When nothing matches the answer is [`Classification::Unknown`],
//! which every strategy discards.

use std::sync::LazyLock;

use regex::Regex;

use crate::config::ParserConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Debit,
    Credit,
    Unknown,
}

const CREDIT_PHRASES: &[&str] = &[
    "by transfer",
    "deposit",
    "credit of interest",
    "cradj/upi",
    "discount on fuel",
];

const DEBIT_PHRASES: &[&str] = &[
    "to transfer",
    "transfer to",
    "transferto",
    "transfered",
    "transaction comm",
    "forex txn-commission",
    "forex txn-service",
    "atm withdrawal",
    "purchase",
    "imps/p2a",
    "charges",
    "cgst",
    "sgst",
];

const UPI_PAYMENT_HINTS: &[&str] = &[
    "paytm",
    "amazon",
    "google",
    "add-money",
    "ixigo",
    "airtel",
    "billdesk",
    "indiaideas",
    "payment",
    "@",
];

const UPI_RECEIPT_PHRASES: &[&str] = &["lic premium", "season ticket"];

/// Markers of an outgoing transfer that no receipt pattern may override.
const OUTGOING_MARKERS: &[&str] = &["to transfer", "transfer to", "/dr/"];

const FEE_HINTS: &[&str] = &["commission", "service", "charge", "fee"];

const GENERIC_CREDIT_WORDS: &[&str] = &["credit", "deposit", "balance forward"];

const GENERIC_DEBIT_WORDS: &[&str] = &["withdrawal", "atm", "purchase", "payment", "debit", "upi"];

static NAMED_PAYER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"mr\s+[a-z]").expect("regex"));

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| haystack.contains(n))
}

/// Classifies a record description from one of the named-bank layouts.
pub fn classify(description: &str, config: &ParserConfig) -> Classification {
    let lower = description.to_lowercase();

    if is_credit(&lower, config) {
        return Classification::Credit;
    }
    if contains_any(&lower, DEBIT_PHRASES) || lower.contains("upi/") {
        return Classification::Debit;
    }
    Classification::Unknown
}

fn is_credit(lower: &str, config: &ParserConfig) -> bool {
    if contains_any(lower, CREDIT_PHRASES) || lower.starts_with("by ") {
        return true;
    }
    if lower.contains("neft")
        && config
            .incoming_neft_banks
            .iter()
            .any(|bank| lower.contains(bank.as_str()))
    {
        return true;
    }
    is_upi_receipt(lower, config)
}

fn is_upi_payment(lower: &str) -> bool {
    lower.contains("upi/") && contains_any(lower, UPI_PAYMENT_HINTS)
}

fn is_upi_receipt(lower: &str, config: &ParserConfig) -> bool {
    if !lower.contains("upi/")
        || is_upi_payment(lower)
        || contains_any(lower, OUTGOING_MARKERS)
    {
        return false;
    }
    config
        .receipt_names
        .iter()
        .any(|name| lower.contains(name.as_str()))
        || lower.contains("cr")
        || NAMED_PAYER_REGEX.is_match(lower)
        || contains_any(lower, UPI_RECEIPT_PHRASES)
}

/// Whether a description reads like a bank fee, which is the only kind of
/// SBI row trusted when just one amount is printed.
pub fn is_fee_or_charge(description: &str) -> bool {
    contains_any(&description.to_lowercase(), FEE_HINTS)
}

/// Broad, whole-line classification for layouts we have no model of.
pub fn classify_generic(line: &str) -> Classification {
    let lower = line.to_lowercase();
    if contains_any(&lower, GENERIC_CREDIT_WORDS) {
        Classification::Credit
    } else if contains_any(&lower, GENERIC_DEBIT_WORDS) {
        Classification::Debit
    } else {
        Classification::Unknown
    }
}
