use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::config::ParserConfig;
use crate::description::truncate;
use crate::parser::SkipReason;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Withdrawal,
}

/// A withdrawal read from a statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Transaction {
    pub date: NaiveDate,
    pub description: String,
    pub amount: Decimal,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
}

impl Transaction {
    /// Builds a withdrawal, enforcing the amount bounds and description cap.
    pub fn withdrawal(
        date: NaiveDate,
        description: String,
        amount: Decimal,
        config: &ParserConfig,
        line: usize,
    ) -> Result<Self, SkipReason> {
        if amount <= Decimal::ZERO || amount >= config.max_amount {
            return Err(SkipReason::AmountOutOfRange { line, amount });
        }
        let description = if description.trim().is_empty() {
            "Withdrawal".to_owned()
        } else {
            truncate(description, config.description_limit)
        };
        Ok(Self {
            date,
            description,
            amount,
            kind: TransactionKind::Withdrawal,
        })
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 4, 4).expect("valid date")
    }

    #[test]
    fn should_reject_amounts_outside_the_bounds() {
        let config = ParserConfig::default();
        for amount in [dec!(0), dec!(-5.00), dec!(10_000_000.00)] {
            assert_eq!(
                Err(SkipReason::AmountOutOfRange { line: 3, amount }),
                Transaction::withdrawal(date(), "x".to_owned(), amount, &config, 3)
            );
        }
    }

    #[test]
    fn should_default_empty_descriptions() {
        let transaction =
            Transaction::withdrawal(date(), " ".to_owned(), dec!(10.00), &ParserConfig::default(), 1)
                .expect("transaction");
        assert_eq!("Withdrawal", transaction.description);
    }

    #[test]
    fn should_cap_the_description() {
        let transaction = Transaction::withdrawal(
            date(),
            "X".repeat(10_000),
            dec!(10.00),
            &ParserConfig::default(),
            1,
        )
        .expect("transaction");
        assert_eq!(200, transaction.description.chars().count());
    }
}
