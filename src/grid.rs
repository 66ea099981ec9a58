//! Tabular grids of cell values.
//!
//! A [`Grid`] is the dematerialized form of one worksheet: data cells plus the
//! row and column labels taken from its header row/column. Positions are always
//! reported in source coordinates, so a header row keeps index 0 and the first
//! data row is index 1.

use std::fmt;
use std::str::FromStr;

use crate::error::{BenfordError, Result};

/// Value held by a single cell.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Number(f64),
    Text(String),
    Empty,
}

impl CellValue {
    /// Classifies raw source text. Only finite decimal numbers count as numbers.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Self::Empty;
        }
        match trimmed.parse::<f64>() {
            Ok(n) if n.is_finite() => Self::Number(n),
            _ => Self::Text(trimmed.to_string()),
        }
    }

    pub const fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Text form used when the cell sits in a header row or column.
    fn as_label(&self) -> Option<String> {
        match self {
            Self::Number(n) => Some(n.to_string()),
            Self::Text(s) => Some(s.clone()),
            Self::Empty => None,
        }
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

/// Which edges of the source carry labels instead of data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HeaderConvention {
    /// No labels; every cell is data.
    None,
    /// First row holds column labels.
    FirstRow,
    /// First column holds row labels.
    FirstColumn,
    /// First row holds column labels and first column holds row labels.
    #[default]
    Both,
}

impl HeaderConvention {
    const fn has_header_row(self) -> bool {
        matches!(self, Self::FirstRow | Self::Both)
    }

    const fn has_header_column(self) -> bool {
        matches!(self, Self::FirstColumn | Self::Both)
    }
}

/// Borrowed view of one data cell with its position and labels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cell<'a> {
    pub row: usize,
    pub col: usize,
    pub row_label: Option<&'a str>,
    pub col_label: Option<&'a str>,
    pub value: &'a CellValue,
}

/// A 2-D block of data cells with optional row and column labels.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Grid {
    rows: Vec<Vec<CellValue>>,
    row_labels: Vec<Option<String>>,
    col_labels: Vec<Option<String>>,
    row_offset: usize,
    col_offset: usize,
}

static EMPTY: CellValue = CellValue::Empty;

impl Grid {
    /// Builds an unlabeled grid; ragged rows are padded with empty cells on read.
    pub fn new(rows: Vec<Vec<CellValue>>) -> Self {
        Self::with_headers(rows, HeaderConvention::None)
    }

    /// Splits header row/column off `raw` according to `convention`.
    pub fn with_headers(mut raw: Vec<Vec<CellValue>>, convention: HeaderConvention) -> Self {
        let row_offset = usize::from(convention.has_header_row() && !raw.is_empty());
        let col_offset = usize::from(convention.has_header_column());

        let header = if row_offset == 1 {
            Some(raw.remove(0))
        } else {
            None
        };

        let mut row_labels = Vec::with_capacity(raw.len());
        for row in &mut raw {
            if col_offset == 1 && !row.is_empty() {
                row_labels.push(row.remove(0).as_label());
            } else {
                row_labels.push(None);
            }
        }

        let width = raw.iter().map(Vec::len).max().unwrap_or(0);
        let mut col_labels: Vec<Option<String>> = header
            .map(|cells| {
                cells
                    .iter()
                    .skip(col_offset)
                    .map(CellValue::as_label)
                    .collect()
            })
            .unwrap_or_default();
        col_labels.resize(width.max(col_labels.len()), None);

        Self {
            rows: raw,
            row_labels,
            col_labels,
            row_offset,
            col_offset,
        }
    }

    /// Number of data rows.
    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    /// Number of data columns (widest row or header).
    pub fn n_cols(&self) -> usize {
        self.col_labels.len()
    }

    /// Source row index of data row `row`.
    pub const fn source_row(&self, row: usize) -> usize {
        row + self.row_offset
    }

    /// Source column index of data column `col`.
    pub const fn source_col(&self, col: usize) -> usize {
        col + self.col_offset
    }

    pub fn row_label(&self, row: usize) -> Option<&str> {
        self.row_labels.get(row).and_then(Option::as_deref)
    }

    pub fn col_label(&self, col: usize) -> Option<&str> {
        self.col_labels.get(col).and_then(Option::as_deref)
    }

    /// Value at data position `(row, col)`; missing cells read as empty.
    pub fn value(&self, row: usize, col: usize) -> &CellValue {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&EMPTY)
    }

    /// Cell view at data position `(row, col)`.
    pub fn cell(&self, row: usize, col: usize) -> Cell<'_> {
        Cell {
            row: self.source_row(row),
            col: self.source_col(col),
            row_label: self.row_label(row),
            col_label: self.col_label(col),
            value: self.value(row, col),
        }
    }

    /// Every data cell in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = Cell<'_>> + '_ {
        let n_cols = self.n_cols();
        (0..self.n_rows()).flat_map(move |r| (0..n_cols).map(move |c| self.cell(r, c)))
    }
}

/// A named grid, e.g. one worksheet of a workbook.
#[derive(Debug, Clone, PartialEq)]
pub struct Sheet {
    pub name: String,
    pub grid: Grid,
}

/// Ordered collection of sheets read from one source file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Workbook {
    pub sheets: Vec<Sheet>,
}

impl Workbook {
    pub fn single(name: impl Into<String>, grid: Grid) -> Self {
        Self {
            sheets: vec![Sheet {
                name: name.into(),
                grid,
            }],
        }
    }
}

/// Convert zero-based (row, col) indices to an A1 address string.
pub fn index_to_address(row: usize, col: usize) -> String {
    let mut col_index = col;
    let mut col_label = String::new();

    loop {
        let rem = u8::try_from(col_index % 26).unwrap_or(0);
        col_label.push(char::from(b'A' + rem));
        if col_index < 26 {
            break;
        }
        col_index = col_index / 26 - 1;
    }

    col_label.chars().rev().collect::<String>() + &(row + 1).to_string()
}

/// Parse an A1 address into zero-based (row, col) indices.
/// Returns `None` for malformed addresses.
pub fn address_to_index(a1: &str) -> Option<(usize, usize)> {
    let mut col: usize = 0;
    let mut row: usize = 0;
    let mut saw_letter = false;
    let mut saw_digit = false;

    for ch in a1.chars() {
        if ch.is_ascii_alphabetic() {
            if saw_digit {
                return None;
            }
            saw_letter = true;
            let upper = ch.to_ascii_uppercase() as u8;
            col = col
                .checked_mul(26)?
                .checked_add(usize::from(upper - b'A' + 1))?;
        } else if ch.is_ascii_digit() {
            saw_digit = true;
            row = row
                .checked_mul(10)?
                .checked_add(usize::from(ch as u8 - b'0'))?;
        } else {
            return None;
        }
    }

    if !saw_letter || !saw_digit || row == 0 || col == 0 {
        return None;
    }

    Some((row - 1, col - 1))
}

/// Inclusive rectangle of source cells, written `B2:D10` or `C5`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellRange {
    pub first_row: usize,
    pub first_col: usize,
    pub last_row: usize,
    pub last_col: usize,
}

impl CellRange {
    pub fn new(a: (usize, usize), b: (usize, usize)) -> Self {
        Self {
            first_row: a.0.min(b.0),
            first_col: a.1.min(b.1),
            last_row: a.0.max(b.0),
            last_col: a.1.max(b.1),
        }
    }

    pub const fn contains(&self, row: usize, col: usize) -> bool {
        row >= self.first_row && row <= self.last_row && col >= self.first_col && col <= self.last_col
    }
}

impl FromStr for CellRange {
    type Err = BenfordError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || BenfordError::InvalidCellRange(s.to_string());
        let trimmed = s.trim();
        let (start, end) = trimmed.split_once(':').unwrap_or((trimmed, trimmed));
        let start = address_to_index(start.trim()).ok_or_else(invalid)?;
        let end = address_to_index(end.trim()).ok_or_else(invalid)?;
        Ok(Self::new(start, end))
    }
}

impl fmt::Display for CellRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}",
            index_to_address(self.first_row, self.first_col),
            index_to_address(self.last_row, self.last_col)
        )
    }
}
