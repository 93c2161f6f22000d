//! Date normalizers for the statement layouts we know about.

use chrono::NaiveDate;

use crate::error::DateError;

const MONTHS: [&str; 12] = [
    "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
];

/// Regex alternation of the month abbreviations, for `(?i)` patterns.
pub(crate) const MONTH_ALTERNATION: &str = "Jan|Feb|Mar|Apr|May|Jun|Jul|Aug|Sep|Oct|Nov|Dec";

/// How the year component of a `D Mon Y` date is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YearStyle {
    /// `4 Apr 2024`, as printed by SBI.
    Full,
    /// `17 Jun 19`, as printed by Standard Chartered. Always 20YY.
    TwoDigit,
}

pub fn month_from_abbreviation(s: &str) -> Option<u32> {
    let s = s.to_ascii_lowercase();
    MONTHS
        .iter()
        .position(|m| *m == s)
        .and_then(|i| u32::try_from(i + 1).ok())
}

/// Parses `D Mon YYYY` or `D Mon YY` depending on `style`.
pub fn parse_day_month_year(s: &str, style: YearStyle) -> Result<NaiveDate, DateError> {
    let parts: Vec<&str> = s.split_whitespace().collect();
    let [day, month, year] = parts[..] else {
        return Err(DateError::Shape(s.to_owned()));
    };
    let day: u32 = parse_component("day", day)?;
    let month = month_from_abbreviation(month).ok_or_else(|| DateError::Month(month.to_owned()))?;
    let year = match style {
        YearStyle::Full => parse_component("year", year)?,
        YearStyle::TwoDigit => 2000 + parse_component::<i32>("year", year)?,
    };
    build(year, month, day)
}

/// Parses the numeric layouts the fallback strategies meet: day-first
/// `DD/MM/YYYY`, `DD-MM-YY`, `DD.MM.YYYY`, and ISO `YYYY-MM-DD`.
pub fn parse_numeric(s: &str) -> Result<NaiveDate, DateError> {
    let parts: Vec<&str> = s.trim().split(['/', '-', '.']).collect();
    let [first, second, third] = parts[..] else {
        return Err(DateError::Shape(s.to_owned()));
    };
    if first.len() == 4 {
        let year = parse_component("year", first)?;
        let month = parse_component("month", second)?;
        let day = parse_component("day", third)?;
        return build(year, month, day);
    }
    let day = parse_component("day", first)?;
    let month = parse_component("month", second)?;
    let year: i32 = parse_component("year", third)?;
    let year = if third.len() == 2 { 2000 + year } else { year };
    build(year, month, day)
}

fn parse_component<T: std::str::FromStr>(field: &'static str, value: &str) -> Result<T, DateError> {
    value.parse().map_err(|_| DateError::Component {
        field,
        value: value.to_owned(),
    })
}

fn build(year: i32, month: u32, day: u32) -> Result<NaiveDate, DateError> {
    NaiveDate::from_ymd_opt(year, month, day).ok_or(DateError::OutOfRange { year, month, day })
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::*;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
    }

    #[test]
    fn should_parse_sbi_dates() {
        assert_eq!(
            Ok(date(2024, 4, 4)),
            parse_day_month_year("4 Apr 2024", YearStyle::Full)
        );
        assert_eq!(
            Ok(date(2024, 4, 30)),
            parse_day_month_year("30  APR 2024", YearStyle::Full)
        );
    }

    #[test]
    fn should_parse_two_digit_years_in_this_century() {
        assert_eq!(
            Ok(date(2019, 6, 17)),
            parse_day_month_year("17 Jun 19", YearStyle::TwoDigit)
        );
    }

    #[test]
    fn should_reject_unknown_months() {
        assert_eq!(
            Err(DateError::Month("Foo".to_owned())),
            parse_day_month_year("4 Foo 2024", YearStyle::Full)
        );
    }

    #[test]
    fn should_reject_impossible_days() {
        assert!(matches!(
            parse_day_month_year("31 Feb 2024", YearStyle::Full),
            Err(DateError::OutOfRange { .. })
        ));
    }

    #[test]
    fn should_reject_malformed_shapes() {
        assert!(matches!(
            parse_day_month_year("4 Apr", YearStyle::Full),
            Err(DateError::Shape(_))
        ));
        assert!(matches!(
            parse_day_month_year("x Apr 2024", YearStyle::Full),
            Err(DateError::Component { field: "day", .. })
        ));
    }

    #[test]
    fn should_parse_numeric_dates_day_first() {
        assert_eq!(Ok(date(2024, 4, 15)), parse_numeric("15/04/2024"));
        assert_eq!(Ok(date(2024, 4, 15)), parse_numeric("15-04-24"));
        assert_eq!(Ok(date(2024, 4, 5)), parse_numeric("5.4.2024"));
        assert_eq!(Ok(date(2024, 4, 15)), parse_numeric("2024-04-15"));
        assert!(parse_numeric("04/15/2024").is_err());
    }

    #[test]
    fn should_match_month_abbreviations_case_insensitively() {
        assert_eq!(Some(12), month_from_abbreviation("DEC"));
        assert_eq!(None, month_from_abbreviation("December"));
    }
}
