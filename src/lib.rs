//! benfords: Benford's Law conformance testing for tabular data.
//!
//! Extracts numbers from a grid under include/exclude filters, derives their
//! leading-digit distribution, and compares it with Benford's Law using
//! Kuiper's, Kolmogorov-Smirnov, Leemis' m or Cho-Gaines' d statistic.

pub mod benford;
pub mod config;
pub mod dataset;
pub mod digits;
pub mod error;
pub mod filter;
pub mod grid;
pub mod source;
pub mod stats;
pub mod types;

pub use dataset::{run_test, Dataset};
pub use digits::leading_digit;
pub use error::{BenfordError, Result};
pub use filter::{filter_grid, filter_workbook, AxisPolicy, FilterConfig, InclusionPolicy};
pub use grid::{Cell, CellRange, CellValue, Grid, HeaderConvention, Sheet, Workbook};
pub use types::{Alpha, Analysis, TestKind, TestResult};
