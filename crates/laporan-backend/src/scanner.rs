//! Workbook scanner.
//!
//! Walks every worksheet top-to-bottom and cuts it into rectangular
//! tables. A row opens a table when it is a **header candidate**: at least
//! two non-empty cells, with the row above blank (or the top of the
//! sheet). Data rows follow until a fully blank row closes the table;
//! several tables per sheet is the common case in the source workbooks.
//!
//! The scan is purely informational: no side effects, no state between
//! invocations. A sheet without header candidates simply contributes zero
//! tables.

use crate::table::{normalize_headers, CellValue, Table};
use calamine::{open_workbook_auto, open_workbook_auto_from_rs, Data, Range, Reader, Sheets};
use laporan_core::{LaporanError, Result};
use std::collections::BTreeMap;
use std::io::{Cursor, Read, Seek};
use std::path::Path;

/// Minimum number of non-empty cells for a row to qualify as a header.
const HEADER_MIN_CELLS: usize = 2;

/// Result of scanning one workbook: the extracted tables plus the
/// provenance the mapper records in the model metadata.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkbookScan {
    /// Path or description of the workbook input.
    pub source_name: String,
    /// Sheet names in workbook order, including sheets without tables.
    pub sheets: Vec<String>,
    /// All extracted tables, in sheet order then top-to-bottom.
    pub tables: Vec<Table>,
}

/// Scan a workbook file (`.xlsx`, `.xls`, `.ods`; format auto-detected).
///
/// # Errors
///
/// [`LaporanError::UnreadableWorkbook`] when the file is missing, corrupt,
/// or not a supported spreadsheet format. Zero extracted tables is not an
/// error.
pub fn scan_path<P: AsRef<Path>>(path: P) -> Result<WorkbookScan> {
    let path_ref = path.as_ref();
    let source_name = path_ref.display().to_string();
    let mut workbook = open_workbook_auto(path_ref).map_err(|e| {
        LaporanError::UnreadableWorkbook {
            source_name: source_name.clone(),
            reason: e.to_string(),
        }
    })?;
    scan_workbook(&mut workbook, &source_name)
}

/// Scan a workbook from an in-memory byte buffer.
///
/// Callers that receive uploads rather than files avoid a temp-file round
/// trip this way. `source_name` is only used for provenance and error
/// context.
///
/// # Errors
///
/// [`LaporanError::UnreadableWorkbook`] when the bytes cannot be parsed as
/// a supported spreadsheet format.
pub fn scan_bytes(bytes: &[u8], source_name: &str) -> Result<WorkbookScan> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes)).map_err(|e| {
        LaporanError::UnreadableWorkbook {
            source_name: source_name.to_string(),
            reason: e.to_string(),
        }
    })?;
    scan_workbook(&mut workbook, source_name)
}

fn scan_workbook<RS: Read + Seek>(
    workbook: &mut Sheets<RS>,
    source_name: &str,
) -> Result<WorkbookScan> {
    let sheets = workbook.sheet_names();
    let mut tables = Vec::new();

    for name in &sheets {
        let range = workbook.worksheet_range(name).map_err(|e| {
            LaporanError::UnreadableWorkbook {
                source_name: source_name.to_string(),
                reason: format!("sheet {name:?}: {e}"),
            }
        })?;
        tables.extend(scan_sheet(name, &range));
    }

    log::debug!(
        "scanned {source_name}: {} sheet(s), {} table(s)",
        sheets.len(),
        tables.len()
    );

    Ok(WorkbookScan {
        source_name: source_name.to_string(),
        sheets,
        tables,
    })
}

/// Cut one worksheet range into tables.
///
/// Exposed for tests and callers that already hold a calamine range; the
/// path/bytes entry points delegate here per sheet.
#[must_use]
pub fn scan_sheet(sheet_name: &str, range: &Range<Data>) -> Vec<Table> {
    let mut tables = Vec::new();
    let mut current: Option<TableBuilder> = None;
    // The top of the sheet counts as a blank row above.
    let mut above_blank = true;

    for row in range.rows() {
        let cells: Vec<CellValue> = row.iter().map(CellValue::from_data).collect();
        let filled = cells.iter().filter(|c| !c.is_empty()).count();

        if filled == 0 {
            // Fully blank row closes the current table.
            if let Some(builder) = current.take() {
                tables.push(builder.finish());
            }
            above_blank = true;
            continue;
        }

        if above_blank && filled >= HEADER_MIN_CELLS {
            // New header candidate; closes any open table and opens the next.
            if let Some(builder) = current.take() {
                tables.push(builder.finish());
            }
            current = Some(TableBuilder::new(sheet_name, &cells));
        } else if let Some(builder) = current.as_mut() {
            builder.push_row(&cells);
        } else {
            // Narrative row outside any table; skipped.
            log::trace!("skipping narrative row on sheet {sheet_name:?}");
        }

        above_blank = false;
    }

    if let Some(builder) = current.take() {
        tables.push(builder.finish());
    }

    tables
}

/// Accumulates one table while the scanner walks data rows.
struct TableBuilder {
    sheet_name: String,
    header: Vec<String>,
    width: usize,
    rows: Vec<BTreeMap<String, CellValue>>,
}

impl TableBuilder {
    fn new(sheet_name: &str, header_cells: &[CellValue]) -> Self {
        // Column count is the header length up to its last non-empty cell;
        // blank padding columns to the right are not part of the table.
        let width = header_cells
            .iter()
            .rposition(|c| !c.is_empty())
            .map_or(0, |p| p + 1);
        let header = normalize_headers(&header_cells[..width]);
        Self {
            sheet_name: sheet_name.to_string(),
            header,
            width,
            rows: Vec::new(),
        }
    }

    fn push_row(&mut self, cells: &[CellValue]) {
        let mut row = BTreeMap::new();
        for (idx, name) in self.header.iter().enumerate() {
            let value = cells.get(idx).cloned().unwrap_or(CellValue::Empty);
            row.insert(name.clone(), value);
        }
        if cells.iter().skip(self.width).any(|c| !c.is_empty()) {
            log::warn!(
                "sheet {:?}: data beyond the {}-column header dropped",
                self.sheet_name,
                self.width
            );
        }
        self.rows.push(row);
    }

    fn finish(self) -> Table {
        Table {
            sheet_name: self.sheet_name,
            header: self.header,
            rows: self.rows,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Data {
        Data::String(s.to_string())
    }

    /// Sheet: header row (name/organization/position), three data rows,
    /// then nothing. One table, three rows.
    #[test]
    fn test_participant_table_shape() {
        let mut range = Range::new((0, 0), (3, 2));
        range.set_value((0, 0), text("Name"));
        range.set_value((0, 1), text("Organization"));
        range.set_value((0, 2), text("Position"));
        for (i, (n, o, p)) in [
            ("Aina", "JPN", "Officer"),
            ("Ben", "MOE", "Clerk"),
            ("Chong", "JPS", "Engineer"),
        ]
        .iter()
        .enumerate()
        {
            range.set_value(((i + 1) as u32, 0), text(n));
            range.set_value(((i + 1) as u32, 1), text(o));
            range.set_value(((i + 1) as u32, 2), text(p));
        }

        let tables = scan_sheet("Participants", &range);
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].header, vec!["Name", "Organization", "Position"]);
        assert_eq!(tables[0].row_count(), 3);
    }

    /// A blank row ends the table exactly there; rows after the blank that
    /// form a new header open a second table.
    #[test]
    fn test_blank_row_closes_table_and_new_header_opens_next() {
        let mut range = Range::new((0, 0), (5, 1));
        range.set_value((0, 0), text("A"));
        range.set_value((0, 1), text("B"));
        range.set_value((1, 0), text("a1"));
        range.set_value((1, 1), text("b1"));
        // row 2 blank
        range.set_value((3, 0), text("C"));
        range.set_value((3, 1), text("D"));
        range.set_value((4, 0), text("c1"));
        range.set_value((4, 1), text("d1"));
        range.set_value((5, 0), text("c2"));
        range.set_value((5, 1), text("d2"));

        let tables = scan_sheet("Sheet1", &range);
        assert_eq!(tables.len(), 2);
        assert_eq!(tables[0].row_count(), 1);
        assert_eq!(tables[1].header, vec!["C", "D"]);
        assert_eq!(tables[1].row_count(), 2);
    }

    /// Ragged data rows are right-padded with empty values, never
    /// rejected.
    #[test]
    fn test_ragged_rows_padded() {
        let mut range = Range::new((0, 0), (2, 2));
        range.set_value((0, 0), text("Time"));
        range.set_value((0, 1), text("Activity"));
        range.set_value((0, 2), text("Handler"));
        range.set_value((1, 0), text("9.00"));
        range.set_value((1, 1), text("Registration"));
        // row 1 has no handler; row 2 only a time cell
        range.set_value((2, 0), text("10.00"));

        let tables = scan_sheet("Tentative", &range);
        assert_eq!(tables.len(), 1);
        let table = &tables[0];
        assert_eq!(table.row_count(), 2);
        for row in &table.rows {
            assert_eq!(row.len(), table.header.len());
        }
        assert_eq!(table.rows[0]["Handler"], CellValue::Empty);
        assert_eq!(table.rows[1]["Activity"], CellValue::Empty);
    }

    /// A purely narrative sheet (no row with two or more filled cells
    /// after a blank) yields zero tables, which is not an error.
    #[test]
    fn test_narrative_sheet_yields_no_tables() {
        let mut range = Range::new((0, 0), (2, 2));
        range.set_value((0, 0), text("Laporan Program Latihan"));
        range.set_value((2, 0), text("Disediakan oleh urus setia"));

        let tables = scan_sheet("Cover", &range);
        assert!(tables.is_empty());
    }

    /// A wide row directly below data rows is data, not a new header:
    /// header candidates need a blank row above.
    #[test]
    fn test_header_candidate_requires_blank_above() {
        let mut range = Range::new((0, 0), (2, 1));
        range.set_value((0, 0), text("Name"));
        range.set_value((0, 1), text("Score"));
        range.set_value((1, 0), text("Aina"));
        range.set_value((1, 1), Data::Int(5));
        range.set_value((2, 0), text("Total"));
        range.set_value((2, 1), Data::Int(5));

        let tables = scan_sheet("Scores", &range);
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].row_count(), 2);
    }

    /// Numbers survive as numeric cell values for downstream coercion.
    #[test]
    fn test_numeric_cells_kept_numeric() {
        let mut range = Range::new((0, 0), (1, 1));
        range.set_value((0, 0), text("Metric"));
        range.set_value((0, 1), Data::Int(4));
        range.set_value((1, 0), text("Clarity"));
        range.set_value((1, 1), Data::Float(12.0));

        let tables = scan_sheet("Evaluation", &range);
        assert_eq!(tables[0].header, vec!["Metric", "4"]);
        assert_eq!(tables[0].rows[0]["4"], CellValue::Number(12.0));
    }

    /// An empty range produces nothing.
    #[test]
    fn test_empty_range() {
        let range: Range<Data> = Range::empty();
        assert!(scan_sheet("Empty", &range).is_empty());
    }
}
