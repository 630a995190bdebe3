//! # laporan-backend - workbook scanning
//!
//! Loads spreadsheet workbooks with `calamine` and cuts each worksheet
//! into rectangular [`Table`]s. This is the first stage of the
//! report-generation pipeline; the extracted tables feed the field mapper
//! in `laporan-mapper`.
//!
//! ## Supported inputs
//!
//! - `.xlsx`, `.xls`, `.ods` files via [`scan_path`] (format auto-detected)
//! - in-memory byte buffers via [`scan_bytes`]
//!
//! ## Table detection
//!
//! The source workbooks are loosely structured: one sheet typically holds
//! several stacked tables separated by blank rows, with the occasional
//! narrative row in between. The scanner walks rows top-to-bottom, opens a
//! table at every header candidate (two or more filled cells below a blank
//! row or the sheet top), and closes it at the next fully blank row.
//! Ragged data rows are right-padded rather than rejected.

pub mod scanner;
pub mod table;

pub use scanner::{scan_bytes, scan_path, scan_sheet, WorkbookScan};
pub use table::{normalize_headers, CellValue, Table};
