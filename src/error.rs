use std::path::PathBuf;

/// Failure to obtain any text from an uploaded statement.
///
/// This is the only condition that aborts a parse: without text there is
/// nothing for the strategies to look at.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("could not extract text from PDF: {0}")]
    Pdf(#[from] pdf_extract::OutputError),

    #[error("PDF contains no extractable text (scanned or image-only document?)")]
    NoText,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read parser configuration {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid parser configuration: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid parser configuration: {0}")]
    Invalid(String),
}

/// A date string that does not follow the convention its parser expects.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DateError {
    #[error("expected three date components in '{0}'")]
    Shape(String),

    #[error("unknown month '{0}'")]
    Month(String),

    #[error("non-numeric {field} '{value}'")]
    Component { field: &'static str, value: String },

    #[error("{year}-{month:02}-{day:02} is not a calendar date")]
    OutOfRange { year: i32, month: u32, day: u32 },
}
