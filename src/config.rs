use std::fs;
use std::path::Path;

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::error::ConfigError;

/// Tunables shared by every strategy.
///
/// All fields have defaults, so a TOML file only needs to list the values
/// it overrides:
///
/// ```toml
/// max_amount = "2500000.00"
/// receipt_names = ["season ticket refund", "a. kumar"]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ParserConfig {
    /// Exclusive ceiling on a withdrawal amount. Anything at or above it is
    /// treated as a misparsed run of digits.
    pub max_amount: Decimal,
    /// SBI amounts below this value are ignored when looking for the
    /// transaction amount.
    pub min_amount: Decimal,
    /// Maximum number of characters kept in a description.
    pub description_limit: usize,
    pub sbi_lookahead: usize,
    pub standard_chartered_lookahead: usize,
    /// Lower-case name fragments that mark a UPI line as money received.
    pub receipt_names: Vec<String>,
    /// Lower-case bank names that mark a NEFT line as incoming.
    pub incoming_neft_banks: Vec<String>,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            max_amount: Decimal::new(10_000_000, 0),
            min_amount: Decimal::ONE,
            description_limit: 200,
            sbi_lookahead: 15,
            standard_chartered_lookahead: 10,
            receipt_names: vec!["rajaguru".to_owned(), "dummy name".to_owned()],
            incoming_neft_banks: vec!["state bank of india".to_owned()],
        }
    }
}

impl ParserConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let mut config: Self = toml::from_str(s)?;
        for name in config
            .receipt_names
            .iter_mut()
            .chain(config.incoming_neft_banks.iter_mut())
        {
            *name = name.to_lowercase();
        }
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.description_limit == 0 {
            return Err(ConfigError::Invalid(
                "description_limit must be at least 1".to_owned(),
            ));
        }
        if self.sbi_lookahead == 0 || self.standard_chartered_lookahead == 0 {
            return Err(ConfigError::Invalid(
                "lookahead windows must be at least 1 line".to_owned(),
            ));
        }
        if self.min_amount.is_sign_negative() || self.min_amount >= self.max_amount {
            return Err(ConfigError::Invalid(format!(
                "min_amount {} must be non-negative and below max_amount {}",
                self.min_amount, self.max_amount
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn should_use_defaults_for_an_empty_file() {
        assert_eq!(
            ParserConfig::default(),
            ParserConfig::from_toml_str("").expect("config")
        );
    }

    #[test]
    fn should_override_only_listed_values() {
        let config = ParserConfig::from_toml_str(
            r#"
            max_amount = "2500000.00"
            receipt_names = ["A. Kumar"]
            "#,
        )
        .expect("config");
        assert_eq!(dec!(2_500_000.00), config.max_amount);
        assert_eq!(vec!["a. kumar".to_owned()], config.receipt_names);
        assert_eq!(200, config.description_limit);
        assert_eq!(15, config.sbi_lookahead);
    }

    #[test]
    fn should_reject_unknown_keys() {
        assert!(ParserConfig::from_toml_str("lookahead = 3").is_err());
    }

    #[test]
    fn should_reject_a_floor_above_the_ceiling() {
        let err = ParserConfig::from_toml_str(r#"min_amount = "20000000""#)
            .expect_err("min above max");
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn should_reject_a_zero_window() {
        assert!(ParserConfig::from_toml_str("standard_chartered_lookahead = 0").is_err());
    }
}
