//! YAML analysis configuration.
//!
//! ```yaml
//! test: kuiper
//! worksheets: { include: [Sheet1] }
//! rows:
//!   labels:  { include: [Revenue], exclude: [Total] }
//!   indices: { exclude: [0] }
//! columns:
//!   labels:  { exclude: [Notes] }
//! cell_ranges: { exclude: ["A1:B2"] }
//! ```
//!
//! An omitted `default_include` admits by default only when nothing on that
//! axis lists `include` entries.

use std::collections::HashSet;
use std::fs;
use std::hash::Hash;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::filter::{AxisPolicy, FilterConfig, InclusionPolicy};
use crate::grid::CellRange;
use crate::types::TestKind;

/// Label written in YAML; numbers are accepted so `2019` matches a numeric header.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Label {
    Text(String),
    Integer(i64),
    Float(f64),
}

impl Label {
    fn into_text(self) -> String {
        match self {
            Self::Text(s) => s,
            Self::Integer(i) => i.to_string(),
            Self::Float(f) => f.to_string(),
        }
    }
}

/// One include/exclude policy as written in the file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PolicySpec<T> {
    #[serde(default = "Vec::new")]
    pub include: Vec<T>,
    #[serde(default = "Vec::new")]
    pub exclude: Vec<T>,
    pub default_include: Option<bool>,
}

impl<T> Default for PolicySpec<T> {
    fn default() -> Self {
        Self {
            include: Vec::new(),
            exclude: Vec::new(),
            default_include: None,
        }
    }
}

/// Label and index policies of one axis.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AxisSpec {
    #[serde(default)]
    pub labels: PolicySpec<Label>,
    #[serde(default)]
    pub indices: PolicySpec<usize>,
}

/// Analysis configuration file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AnalysisConfig {
    /// Test to run when none is given on the command line.
    pub test: Option<TestKind>,
    #[serde(default)]
    pub worksheets: PolicySpec<String>,
    #[serde(default)]
    pub rows: AxisSpec,
    #[serde(default)]
    pub columns: AxisSpec,
    #[serde(default)]
    pub cell_ranges: PolicySpec<String>,
}

impl AnalysisConfig {
    /// Resolves the file into the filter used for extraction.
    pub fn filter_config(&self) -> Result<FilterConfig> {
        let ranges = self
            .cell_ranges
            .include
            .iter()
            .chain(&self.cell_ranges.exclude)
            .map(|r| {
                r.parse::<CellRange>()
                    .with_context(|| format!("Invalid cell range in config: {r}"))
                    .map(|range| (r.as_str(), range))
            })
            .collect::<Result<Vec<_>>>()?;
        let lookup = |names: &[String]| -> HashSet<CellRange> {
            ranges
                .iter()
                .filter(|(raw, _)| names.iter().any(|n| n.as_str() == *raw))
                .map(|(_, range)| *range)
                .collect()
        };

        Ok(FilterConfig {
            rows: resolve_axis(&self.rows),
            columns: resolve_axis(&self.columns),
            worksheets: resolve_policy(&self.worksheets, Clone::clone),
            cell_ranges: InclusionPolicy {
                include: lookup(&self.cell_ranges.include),
                exclude: lookup(&self.cell_ranges.exclude),
                default_include: self
                    .cell_ranges
                    .default_include
                    .unwrap_or(self.cell_ranges.include.is_empty()),
            },
        })
    }
}

fn resolve_policy<S, T: Eq + Hash>(spec: &PolicySpec<S>, convert: impl Fn(&S) -> T) -> InclusionPolicy<T> {
    InclusionPolicy {
        include: spec.include.iter().map(&convert).collect(),
        exclude: spec.exclude.iter().map(&convert).collect(),
        default_include: spec.default_include.unwrap_or(spec.include.is_empty()),
    }
}

fn resolve_axis(spec: &AxisSpec) -> AxisPolicy {
    let restricted = !spec.labels.include.is_empty() || !spec.indices.include.is_empty();
    let label_text = |label: &Label| label.clone().into_text();

    // The axis default is the OR of both, so an omitted index default adds nothing.
    let mut labels = resolve_policy(&spec.labels, label_text);
    labels.default_include = spec.labels.default_include.unwrap_or(!restricted);

    let mut indices = resolve_policy(&spec.indices, |i: &usize| *i);
    indices.default_include = spec.indices.default_include.unwrap_or(false);

    AxisPolicy { labels, indices }
}

/// Parses an analysis configuration from YAML text.
pub fn load_config(content: &str) -> Result<AnalysisConfig> {
    let config: AnalysisConfig = serde_yaml_ng::from_str(content)?;
    Ok(config)
}

/// Reads and parses an analysis configuration file.
pub fn load_config_file(path: &Path) -> Result<AnalysisConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    load_config(&content).with_context(|| format!("Failed to parse config {}", path.display()))
}
