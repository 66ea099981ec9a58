//! Error types for the filtering and testing core.

use thiserror::Error;

/// Errors raised by grid filtering, digit extraction and the statistical tests.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum BenfordError {
    /// Input is not a flat sequence of finite numbers.
    #[error("invalid input shape: {0}")]
    InvalidInputShape(String),
    /// Nothing usable was left to analyze.
    #[error("dataset is empty: no nonzero numeric values to analyze")]
    EmptyDataset,
    /// Requested statistic is not one of the supported tests.
    #[error("unknown test kind '{0}' (expected kuiper, ks, m or d)")]
    UnknownTestKind(String),
    /// Digit positions start at 1.
    #[error("invalid digit position {0}: positions start at 1")]
    InvalidDigitPosition(u32),
    /// Malformed A1-style cell range.
    #[error("invalid cell range '{0}'")]
    InvalidCellRange(String),
}

pub type Result<T> = std::result::Result<T, BenfordError>;
