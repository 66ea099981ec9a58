//! Common types for benfords.
//!
//! Defines the supported conformance tests and their results.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::benford::ComparisonCurves;
use crate::error::BenfordError;

/// Goodness-of-fit statistic used to compare against Benford's Law.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", try_from = "String")]
pub enum TestKind {
    /// Kuiper's `V`.
    Kuiper,
    /// Kolmogorov-Smirnov `D`.
    KolmogorovSmirnov,
    /// Leemis' `m`.
    LeemisM,
    /// Cho-Gaines' `d`.
    ChoGainesD,
}

impl TestKind {
    pub const ALL: [Self; 4] = [
        Self::Kuiper,
        Self::KolmogorovSmirnov,
        Self::LeemisM,
        Self::ChoGainesD,
    ];

    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Kuiper => "Kuiper's",
            Self::KolmogorovSmirnov => "Kolmogorov-Smirnov",
            Self::LeemisM => "Leemis'",
            Self::ChoGainesD => "Cho-Gaines'",
        }
    }

    /// Conventional symbol of the test statistic.
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Kuiper => "V",
            Self::KolmogorovSmirnov => "D",
            Self::LeemisM => "m",
            Self::ChoGainesD => "d",
        }
    }
}

impl fmt::Display for TestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for TestKind {
    type Err = BenfordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "kuiper" | "v" => Ok(Self::Kuiper),
            "ks" | "kolmogorov-smirnov" => Ok(Self::KolmogorovSmirnov),
            "m" | "leemis" | "leemis-m" => Ok(Self::LeemisM),
            "d" | "cho-gaines" | "cho-gaines-d" => Ok(Self::ChoGainesD),
            _ => Err(BenfordError::UnknownTestKind(s.to_string())),
        }
    }
}

impl TryFrom<String> for TestKind {
    type Error = BenfordError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Fixed significance levels with published critical values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Alpha {
    #[serde(rename = "0.10")]
    TenPercent,
    #[serde(rename = "0.05")]
    FivePercent,
    #[serde(rename = "0.01")]
    OnePercent,
}

impl Alpha {
    pub const ALL: [Self; 3] = [Self::TenPercent, Self::FivePercent, Self::OnePercent];

    pub const fn value(self) -> f64 {
        match self {
            Self::TenPercent => 0.10,
            Self::FivePercent => 0.05,
            Self::OnePercent => 0.01,
        }
    }
}

/// Outcome of comparing a statistic to one critical value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SignificanceLevel {
    pub alpha: Alpha,
    pub critical_value: f64,
    /// Whether Benford conformance is rejected at this level.
    pub significant: bool,
}

/// Result of running one test.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TestResult {
    pub test: TestKind,
    /// Display name of the statistic, e.g. `Kuiper's`.
    pub statistic: &'static str,
    pub value: f64,
    pub sample_size: usize,
    pub significance: [SignificanceLevel; 3],
}

impl TestResult {
    pub fn is_significant_at(&self, alpha: Alpha) -> bool {
        self.significance
            .iter()
            .any(|level| level.alpha == alpha && level.significant)
    }

    /// Significant at any of the tabulated levels.
    pub fn rejects_benford(&self) -> bool {
        self.significance.iter().any(|level| level.significant)
    }
}

/// Full output of one analysis: verdict, plotting curves and magnitude spread.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Analysis {
    pub result: TestResult,
    pub curves: ComparisonCurves,
    pub magnitudes: BTreeMap<i32, usize>,
}
