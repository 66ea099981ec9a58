//! CSV sources.
//!
//! Reads a delimited text file into a one-sheet [`Workbook`]. Every field is
//! classified with [`CellValue::parse`]; no locale-specific number formats are
//! recognized.

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;

use crate::grid::{CellValue, Grid, HeaderConvention, Workbook};

/// Parses CSV from any reader into a grid.
pub fn parse_csv<R: Read>(reader: R, delimiter: u8, convention: HeaderConvention) -> Result<Grid> {
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut rows = Vec::new();
    for (i, result) in rdr.records().enumerate() {
        let record = result.with_context(|| format!("Failed to read CSV row {}", i + 1))?;
        rows.push(record.iter().map(CellValue::parse).collect::<Vec<_>>());
    }

    let grid = Grid::with_headers(rows, convention);
    debug!(rows = grid.n_rows(), columns = grid.n_cols(), "parsed CSV grid");
    Ok(grid)
}

/// Reads a CSV file; the sheet is named after the file stem.
pub fn read_csv(path: &Path, delimiter: u8, convention: HeaderConvention) -> Result<Workbook> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;
    let grid = parse_csv(file, delimiter, convention)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    let name = path
        .file_stem()
        .map_or_else(|| "Sheet1".to_string(), |s| s.to_string_lossy().into_owned());
    Ok(Workbook::single(name, grid))
}
