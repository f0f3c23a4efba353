use thiserror::Error;

/// Problems with the shape or content of the loaded data.
///
/// Raised by the loader, the statistics engine and the scales. I/O failures are
/// not represented here; those travel as `anyhow::Error` with context.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DataFormatError {
    #[error("missing column '{0}'")]
    MissingColumn(String),

    /// `row` is 1-based and counts data rows only (the header is not a row).
    #[error("row {row}, column '{field}': '{value}' is not a number")]
    InvalidNumber {
        row: usize,
        field: String,
        value: String,
    },

    #[error("row {row}, column '{field}': value is not finite")]
    NonFiniteValue { row: usize, field: String },

    #[error("dataset contains no records")]
    EmptyDataset,

    #[error("group '{0}' contains no values")]
    EmptyGroup(String),

    #[error("invalid domain [{lo}, {hi}]")]
    InvalidDomain { lo: f64, hi: f64 },

    #[error("header does not match a known dataset layout: {0:?}")]
    UnknownVariant(Vec<String>),
}

pub type Result<T> = std::result::Result<T, DataFormatError>;
