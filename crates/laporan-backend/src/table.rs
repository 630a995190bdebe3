//! Scanned table types.
//!
//! A [`Table`] is the scanner's unit of output: one rectangular region of a
//! worksheet with a header row and zero or more data rows. Tables are
//! created per scan and discarded after field mapping.

use calamine::Data;
use serde::Serialize;
use std::collections::BTreeMap;

/// A single cell value as read from the workbook.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    /// Empty or whitespace-only cell.
    Empty,
    /// Text content, as written.
    Text(String),
    /// Numeric content (integer cells widen to f64).
    Number(f64),
    /// Boolean content.
    Bool(bool),
}

impl CellValue {
    /// Convert a calamine cell. Date, duration, and error cells carry
    /// their display text.
    #[must_use]
    pub fn from_data(data: &Data) -> Self {
        match data {
            Data::Empty => Self::Empty,
            Data::String(s) => {
                if s.trim().is_empty() {
                    Self::Empty
                } else {
                    Self::Text(s.clone())
                }
            }
            Data::Int(i) => Self::Number(*i as f64),
            Data::Float(f) => Self::Number(*f),
            Data::Bool(b) => Self::Bool(*b),
            other => {
                let text = other.to_string();
                if text.trim().is_empty() {
                    Self::Empty
                } else {
                    Self::Text(text)
                }
            }
        }
    }

    /// True for [`CellValue::Empty`].
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Display text for the cell; empty string for empty cells.
    #[must_use]
    pub fn to_text(&self) -> String {
        match self {
            Self::Empty => String::new(),
            Self::Text(s) => s.trim().to_string(),
            Self::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => format!("{n:.0}"),
            Self::Number(n) => n.to_string(),
            Self::Bool(b) => b.to_string(),
        }
    }
}

/// A rectangular table extracted from one worksheet.
///
/// Invariant: every row's key set equals `header`. The scanner guarantees
/// this by right-padding ragged rows with [`CellValue::Empty`] and by
/// normalizing header names (see [`normalize_headers`]).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Table {
    /// Name of the worksheet the table was found on.
    pub sheet_name: String,
    /// Normalized header names, in column order.
    pub header: Vec<String>,
    /// Data rows in sheet order, keyed by header name.
    pub rows: Vec<BTreeMap<String, CellValue>>,
}

impl Table {
    /// Number of data rows.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Column values for one header, in row order.
    #[must_use]
    pub fn column(&self, header: &str) -> Vec<&CellValue> {
        self.rows
            .iter()
            .filter_map(|row| row.get(header))
            .collect()
    }
}

/// Normalize a header row into unique, non-empty column names.
///
/// Empty header cells become positional `column_N` names; duplicates get a
/// ` (k)` suffix. This keeps the row key-set invariant intact for
/// real-world sheets, which routinely repeat or omit header labels.
#[must_use]
pub fn normalize_headers(cells: &[CellValue]) -> Vec<String> {
    let mut seen: BTreeMap<String, usize> = BTreeMap::new();
    let mut names = Vec::with_capacity(cells.len());

    for (idx, cell) in cells.iter().enumerate() {
        let base = match cell {
            CellValue::Empty => format!("column_{}", idx + 1),
            other => other.to_text(),
        };
        let count = seen.entry(base.to_lowercase()).or_insert(0);
        *count += 1;
        if *count == 1 {
            names.push(base);
        } else {
            names.push(format!("{base} ({count})"));
        }
    }

    names
}
