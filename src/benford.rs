//! Theoretical and empirical first-digit distributions.

#![allow(clippy::cast_precision_loss)]

use std::sync::OnceLock;

use serde::Serialize;

use crate::error::{BenfordError, Result};

/// The nine possible leading digits, in order.
pub const DIGITS: [u8; 9] = [1, 2, 3, 4, 5, 6, 7, 8, 9];

/// Benford's Law over first significant digits: `p(d) = log10(1 + 1/d)`.
#[derive(Debug, Clone, PartialEq)]
pub struct BenfordDistribution {
    pdf: [f64; 9],
    cdf: [f64; 9],
}

impl BenfordDistribution {
    /// Shared instance; the law has no parameters.
    pub fn standard() -> &'static Self {
        static STANDARD: OnceLock<BenfordDistribution> = OnceLock::new();
        STANDARD.get_or_init(|| {
            let pdf = DIGITS.map(Self::probability);
            Self {
                pdf,
                cdf: cumulative(&pdf),
            }
        })
    }

    /// Probability that the leading digit equals `digit` (1-9).
    pub fn probability(digit: u8) -> f64 {
        (1.0 + 1.0 / f64::from(digit)).log10()
    }

    pub const fn pdf(&self) -> &[f64; 9] {
        &self.pdf
    }

    pub const fn cdf(&self) -> &[f64; 9] {
        &self.cdf
    }
}

fn cumulative(pdf: &[f64; 9]) -> [f64; 9] {
    let mut total = 0.0;
    pdf.map(|p| {
        total += p;
        total
    })
}

/// Observed first-digit frequencies of a sample.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DigitDistribution {
    pub counts: [usize; 9],
    pub pdf: [f64; 9],
    pub cdf: [f64; 9],
    pub n: usize,
}

impl DigitDistribution {
    /// Builds the empirical PDF/CDF from leading digits in `1..=9`.
    pub fn from_digits(digits: &[u8]) -> Result<Self> {
        if digits.is_empty() {
            return Err(BenfordError::EmptyDataset);
        }

        let mut counts = [0usize; 9];
        for &d in digits {
            if !(1..=9).contains(&d) {
                return Err(BenfordError::InvalidInputShape(format!(
                    "leading digit {d} is outside 1..=9"
                )));
            }
            counts[usize::from(d - 1)] += 1;
        }

        let n = digits.len();
        let pdf = counts.map(|c| c as f64 / n as f64);
        Ok(Self {
            counts,
            cdf: cumulative(&pdf),
            pdf,
            n,
        })
    }
}

/// Theoretical and observed curves indexed by digit 1..9, for plotting.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonCurves {
    pub digits: [u8; 9],
    pub benford_pdf: [f64; 9],
    pub empirical_pdf: [f64; 9],
    pub benford_cdf: [f64; 9],
    pub empirical_cdf: [f64; 9],
}

impl ComparisonCurves {
    pub fn new(empirical: &DigitDistribution) -> Self {
        let benford = BenfordDistribution::standard();
        Self {
            digits: DIGITS,
            benford_pdf: *benford.pdf(),
            empirical_pdf: empirical.pdf,
            benford_cdf: *benford.cdf(),
            empirical_cdf: empirical.cdf,
        }
    }
}
