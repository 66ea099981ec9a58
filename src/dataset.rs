//! Validated numeric datasets and the test entry points.

use tracing::debug;

use crate::benford::{ComparisonCurves, DigitDistribution};
use crate::digits::{first_digits, magnitude_bins};
use crate::error::{BenfordError, Result};
use crate::filter::{filter_grid, filter_workbook, FilterConfig};
use crate::grid::{Grid, Workbook};
use crate::stats;
use crate::types::{Analysis, TestKind, TestResult};

/// Nonempty sequence of nonzero finite numbers with their leading digits.
///
/// Zero values are dropped on the way in since they have no leading digit.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    values: Vec<f64>,
    first_digits: Vec<u8>,
}

impl Dataset {
    pub fn new(values: Vec<f64>) -> Result<Self> {
        let values = admit(values)?;
        if values.is_empty() {
            return Err(BenfordError::EmptyDataset);
        }
        let first_digits = first_digits(&values)?;
        Ok(Self {
            values,
            first_digits,
        })
    }

    /// Parses a flat JSON array of numbers, e.g. `[12, 3.5, 900]`.
    pub fn from_json(text: &str) -> Result<Self> {
        let parsed: serde_json::Value = serde_json::from_str(text)
            .map_err(|e| BenfordError::InvalidInputShape(format!("invalid JSON: {e}")))?;
        let serde_json::Value::Array(items) = parsed else {
            return Err(BenfordError::InvalidInputShape(
                "expected a JSON array of numbers".to_string(),
            ));
        };

        let mut values = Vec::with_capacity(items.len());
        for (i, item) in items.iter().enumerate() {
            match item {
                serde_json::Value::Number(n) => values.push(n.as_f64().ok_or_else(|| {
                    BenfordError::InvalidInputShape(format!("element {i} is not representable as f64"))
                })?),
                serde_json::Value::Array(_) => {
                    return Err(BenfordError::InvalidInputShape(format!(
                        "element {i} is an array; input must be one-dimensional"
                    )));
                }
                other => {
                    return Err(BenfordError::InvalidInputShape(format!(
                        "element {i} is not a number: {other}"
                    )));
                }
            }
        }
        Self::new(values)
    }

    /// Filters one grid; fails with [`BenfordError::EmptyDataset`] if nothing is admitted.
    pub fn from_grid(grid: &Grid, config: &FilterConfig) -> Result<Self> {
        Self::new(filter_grid(grid, config))
    }

    /// Filters every admitted sheet of `workbook`.
    pub fn from_workbook(workbook: &Workbook, config: &FilterConfig) -> Result<Self> {
        Self::new(filter_workbook(workbook, config))
    }

    /// Appends `values`, then re-sorts the whole dataset ascending.
    ///
    /// On error the dataset is left unchanged.
    pub fn append(&mut self, values: &[f64]) -> Result<()> {
        let mut merged = self.values.clone();
        merged.extend(admit(values.to_vec())?);
        merged.sort_by(f64::total_cmp);
        let digits = first_digits(&merged)?;
        self.values = merged;
        self.first_digits = digits;
        Ok(())
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Leading digit of each value, parallel to [`Dataset::values`].
    pub fn first_digits(&self) -> &[u8] {
        &self.first_digits
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn distribution(&self) -> Result<DigitDistribution> {
        DigitDistribution::from_digits(&self.first_digits)
    }

    pub fn run_test(&self, kind: TestKind) -> Result<TestResult> {
        Ok(stats::evaluate(kind, &self.distribution()?))
    }

    /// Runs `kind` and collects the comparison curves and magnitude bins.
    pub fn analyze(&self, kind: TestKind) -> Result<Analysis> {
        let distribution = self.distribution()?;
        Ok(Analysis {
            result: stats::evaluate(kind, &distribution),
            curves: ComparisonCurves::new(&distribution),
            magnitudes: magnitude_bins(&self.values),
        })
    }
}

/// Runs `kind` on a raw list of numbers.
pub fn run_test(kind: TestKind, values: &[f64]) -> Result<TestResult> {
    Dataset::new(values.to_vec())?.run_test(kind)
}

/// Rejects non-finite values and drops zeros.
fn admit(values: Vec<f64>) -> Result<Vec<f64>> {
    if let Some(bad) = values.iter().find(|v| !v.is_finite()) {
        return Err(BenfordError::InvalidInputShape(format!(
            "non-finite value {bad} in dataset"
        )));
    }
    let total = values.len();
    let kept: Vec<f64> = values.into_iter().filter(|&v| v != 0.0).collect();
    if kept.len() < total {
        debug!(dropped = total - kept.len(), "dropped zero values");
    }
    Ok(kept)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{AxisPolicy, InclusionPolicy};
    use crate::grid::CellValue;
    use pretty_assertions::assert_eq;

    #[test]
    fn first_digits_follow_input_order() {
        let data = Dataset::new(vec![1.0, 234.0, 5234.0, 6457.0, 345.0]).unwrap();
        assert_eq!(data.first_digits(), &[1, 2, 5, 6, 3]);
        assert_eq!(data.len(), 5);
    }

    #[test]
    fn zeros_are_dropped() {
        let data = Dataset::new(vec![0.0, 12.0, 0.0, 7.0]).unwrap();
        assert_eq!(data.values(), &[12.0, 7.0]);
        assert_eq!(data.first_digits(), &[1, 7]);
    }

    #[test]
    fn empty_input_is_error() {
        assert_eq!(Dataset::new(vec![]), Err(BenfordError::EmptyDataset));
        assert_eq!(Dataset::new(vec![0.0, 0.0]), Err(BenfordError::EmptyDataset));
        assert_eq!(
            run_test(TestKind::Kuiper, &[]),
            Err(BenfordError::EmptyDataset)
        );
    }

    #[test]
    fn non_finite_is_invalid_shape() {
        assert!(matches!(
            Dataset::new(vec![1.0, f64::NAN]),
            Err(BenfordError::InvalidInputShape(_))
        ));
    }

    #[test]
    fn json_input() {
        let data = Dataset::from_json("[12, 3.5, 900, -41]").unwrap();
        assert_eq!(data.first_digits(), &[1, 3, 9, 4]);

        for bad in ["[[1, 2], [3]]", "[1, \"two\"]", "{\"a\": 1}", "[1,"] {
            assert!(
                matches!(Dataset::from_json(bad), Err(BenfordError::InvalidInputShape(_))),
                "{bad}"
            );
        }
        assert_eq!(Dataset::from_json("[]"), Err(BenfordError::EmptyDataset));
    }

    #[test]
    fn append_sorts_and_recomputes_digits() {
        let mut data = Dataset::new(vec![500.0, 20.0]).unwrap();
        data.append(&[3.0, 0.0, 1000.0]).unwrap();
        assert_eq!(data.values(), &[3.0, 20.0, 500.0, 1000.0]);
        assert_eq!(data.first_digits(), &[3, 2, 5, 1]);

        let before = data.clone();
        assert!(data.append(&[f64::INFINITY]).is_err());
        assert_eq!(data, before);
    }

    #[test]
    fn grid_with_nothing_admitted_is_empty_dataset() {
        let grid = Grid::new(vec![vec![CellValue::from(5.0), CellValue::from("x")]]);
        let config = FilterConfig {
            columns: AxisPolicy::by_indices(InclusionPolicy::only([1])),
            ..FilterConfig::default()
        };
        assert_eq!(
            Dataset::from_grid(&grid, &config),
            Err(BenfordError::EmptyDataset)
        );
        assert_eq!(
            Dataset::from_grid(&grid, &FilterConfig::default()).unwrap().values(),
            &[5.0]
        );
    }

    #[test]
    fn analysis_bundles_curves() {
        let data = Dataset::new(vec![1.0, 123.0, 234.0, 12345.0]).unwrap();
        let analysis = data.analyze(TestKind::ChoGainesD).unwrap();
        assert_eq!(analysis.result.sample_size, 4);
        assert_eq!(analysis.result.test, TestKind::ChoGainesD);
        // Leading digits 1, 1, 2, 1.
        assert_eq!(analysis.curves.empirical_pdf[0], 0.75);
        assert_eq!(analysis.curves.empirical_pdf[1], 0.25);
        assert_eq!(analysis.curves.empirical_cdf[0], 0.75);
        assert_eq!(analysis.curves.empirical_cdf[1..], [1.0; 8]);
        assert_eq!(analysis.magnitudes.get(&2), Some(&2));
        assert_eq!(data.run_test(TestKind::ChoGainesD).unwrap(), analysis.result);
    }
}
