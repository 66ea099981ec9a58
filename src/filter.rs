//! Include/exclude filtering of grid cells.
//!
//! Every filterable axis (row labels, column labels, row indices, column
//! indices, worksheet names, cell ranges) carries an [`InclusionPolicy`]. A
//! value listed in `exclude` is always rejected, even when it is also listed in
//! `include`; otherwise it is admitted when listed in `include` or when the
//! policy admits by default.
//!
//! Label and index policies of the same physical axis are combined: inclusion
//! and defaults are OR-ed, and an exclusion by either policy vetoes the row or
//! column. Rows and columns are then AND-ed.

use std::collections::HashSet;
use std::hash::Hash;

use tracing::{debug, warn};

use crate::grid::{CellRange, Grid, Workbook};

/// Include set, exclude set, and fallback decision for one axis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InclusionPolicy<T: Eq + Hash> {
    pub include: HashSet<T>,
    pub exclude: HashSet<T>,
    pub default_include: bool,
}

impl<T: Eq + Hash> Default for InclusionPolicy<T> {
    fn default() -> Self {
        Self::admit_all()
    }
}

impl<T: Eq + Hash> InclusionPolicy<T> {
    /// Admits every value.
    pub fn admit_all() -> Self {
        Self {
            include: HashSet::new(),
            exclude: HashSet::new(),
            default_include: true,
        }
    }

    /// Admits nothing unless listed in `include`.
    pub fn admit_none() -> Self {
        Self {
            default_include: false,
            ..Self::admit_all()
        }
    }

    /// Admits only the given values.
    pub fn only(values: impl IntoIterator<Item = T>) -> Self {
        Self {
            include: values.into_iter().collect(),
            ..Self::admit_none()
        }
    }

    /// Admits everything except the given values.
    pub fn all_except(values: impl IntoIterator<Item = T>) -> Self {
        Self {
            exclude: values.into_iter().collect(),
            ..Self::admit_all()
        }
    }

    pub fn includes(&self, value: &T) -> bool {
        self.include.contains(value)
    }

    pub fn excludes(&self, value: &T) -> bool {
        self.exclude.contains(value)
    }

    /// Exact-membership admission of `value`.
    pub fn admits(&self, value: &T) -> bool {
        decide(self.excludes(value), self.includes(value), self.default_include)
    }

    /// Admission where membership is decided by `matches` instead of equality.
    pub fn admits_by(&self, matches: impl Fn(&T) -> bool) -> bool {
        let excluded = self.exclude.iter().any(&matches);
        let included = self.include.iter().any(&matches);
        decide(excluded, included, self.default_include)
    }
}

impl InclusionPolicy<String> {
    /// Label lookup; an unlabeled position matches neither set.
    fn label_membership(&self, label: Option<&str>) -> (bool, bool) {
        label.map_or((false, false), |l| {
            (self.exclude.contains(l), self.include.contains(l))
        })
    }
}

#[inline]
const fn decide(excluded: bool, included: bool, default_include: bool) -> bool {
    !excluded && (included || default_include)
}

/// Label-based and index-based policies of one physical axis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AxisPolicy {
    pub labels: InclusionPolicy<String>,
    pub indices: InclusionPolicy<usize>,
}

impl Default for AxisPolicy {
    fn default() -> Self {
        Self {
            labels: InclusionPolicy::admit_all(),
            indices: InclusionPolicy::admit_none(),
        }
    }
}

impl AxisPolicy {
    /// Decides on labels alone.
    pub fn by_labels(labels: InclusionPolicy<String>) -> Self {
        Self {
            labels,
            indices: InclusionPolicy::admit_none(),
        }
    }

    /// Decides on source indices alone.
    pub fn by_indices(indices: InclusionPolicy<usize>) -> Self {
        Self {
            labels: InclusionPolicy::admit_none(),
            indices,
        }
    }

    /// Whether the row or column at source `index` with `label` is admitted.
    pub fn admits(&self, label: Option<&str>, index: usize) -> bool {
        let (label_excluded, label_included) = self.labels.label_membership(label);
        let excluded = label_excluded || self.indices.excludes(&index);
        let included = label_included || self.indices.includes(&index);
        decide(
            excluded,
            included,
            self.labels.default_include || self.indices.default_include,
        )
    }
}

/// Complete filter configuration for one extraction call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterConfig {
    pub rows: AxisPolicy,
    pub columns: AxisPolicy,
    pub worksheets: InclusionPolicy<String>,
    pub cell_ranges: InclusionPolicy<CellRange>,
}

impl FilterConfig {
    /// Data row indices of `grid` admitted by the row policy.
    pub fn admitted_rows(&self, grid: &Grid) -> Vec<usize> {
        (0..grid.n_rows())
            .filter(|&r| self.rows.admits(grid.row_label(r), grid.source_row(r)))
            .collect()
    }

    /// Data column indices of `grid` admitted by the column policy.
    pub fn admitted_columns(&self, grid: &Grid) -> Vec<usize> {
        (0..grid.n_cols())
            .filter(|&c| self.columns.admits(grid.col_label(c), grid.source_col(c)))
            .collect()
    }

    fn admits_cell(&self, row: usize, col: usize) -> bool {
        self.cell_ranges.admits_by(|range| range.contains(row, col))
    }
}

/// Extracts the admitted, numeric, nonzero values of `grid` in row-major order.
///
/// The grid must already be restricted to an admitted worksheet; see
/// [`filter_workbook`] for sources with several sheets. An empty result is not
/// an error here.
pub fn filter_grid(grid: &Grid, config: &FilterConfig) -> Vec<f64> {
    let rows = config.admitted_rows(grid);
    let columns = config.admitted_columns(grid);
    debug!(
        rows = rows.len(),
        total_rows = grid.n_rows(),
        columns = columns.len(),
        total_columns = grid.n_cols(),
        "admitted grid axes"
    );

    let mut values = Vec::new();
    for &r in &rows {
        for &c in &columns {
            let cell = grid.cell(r, c);
            let Some(n) = cell.value.as_number() else {
                continue;
            };
            if n != 0.0 && config.admits_cell(cell.row, cell.col) {
                values.push(n);
            }
        }
    }
    values
}

/// Applies the worksheet policy, then [`filter_grid`] to each admitted sheet in order.
pub fn filter_workbook(workbook: &Workbook, config: &FilterConfig) -> Vec<f64> {
    let mut values = Vec::new();
    for sheet in &workbook.sheets {
        if !config.worksheets.admits(&sheet.name) {
            debug!(sheet = %sheet.name, "worksheet not admitted");
            continue;
        }
        let extracted = filter_grid(&sheet.grid, config);
        if extracted.is_empty() {
            warn!(sheet = %sheet.name, "worksheet yielded no numeric values");
        }
        values.extend(extracted);
    }
    values
}
