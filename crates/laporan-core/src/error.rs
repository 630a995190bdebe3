//! Error types for the report-generation pipeline.
//!
//! The taxonomy distinguishes fatal conditions, which abort a pipeline run
//! immediately, from non-fatal diagnostics. Unresolved template references
//! are deliberately *not* an error variant: they are collected and returned
//! alongside the rendered output (see `laporan-template`).

use thiserror::Error;

/// Errors that can occur while extracting, mapping, or rendering a report.
///
/// Each variant carries enough context to locate the problem: the workbook
/// source for read failures, the offending header for dictionary conflicts,
/// and the tag text plus byte offset for template syntax errors.
///
/// # Examples
///
/// ```rust,ignore
/// use laporan_core::{LaporanError, Result};
///
/// fn summarize(path: &str) -> Result<String> {
///     let model = laporan_pipeline::ReportPipeline::new()?.extract(path)?;
///     Ok(serde_json::to_string(&model)?)
/// }
///
/// match summarize("report.xlsx") {
///     Ok(json) => println!("{json}"),
///     Err(LaporanError::UnreadableWorkbook { source_name, reason }) => {
///         eprintln!("cannot read {source_name}: {reason}");
///     }
///     Err(e) => eprintln!("pipeline error: {e}"),
/// }
/// ```
#[derive(Error, Debug)]
pub enum LaporanError {
    /// The workbook could not be opened or parsed at all.
    ///
    /// File missing, corrupt archive, or an unsupported spreadsheet format.
    /// A readable workbook that merely contains no tables is *not* this
    /// error; it produces an empty-but-valid model.
    #[error("Unreadable workbook {source_name}: {reason}")]
    UnreadableWorkbook {
        /// Path or description of the workbook input.
        source_name: String,
        /// Underlying parser/IO failure text.
        reason: String,
    },

    /// Two canonical fields claim the same header alias.
    ///
    /// The synonym dictionary requires disjoint alias sets; an overlap is a
    /// configuration bug, surfaced instead of resolved by guessing.
    #[error("Ambiguous header mapping: {header:?} is claimed by both {first} and {second}")]
    AmbiguousHeaderMapping {
        /// The normalized header text that matched more than one field.
        header: String,
        /// First canonical field claiming the header.
        first: String,
        /// Second canonical field claiming the header.
        second: String,
    },

    /// A template section or control tag has no matching counterpart.
    ///
    /// Raised by the dialect translator for `{{#name}}`/`{{/name}}` pairs
    /// and by the renderer for `{% for %}`/`{% endfor %}` and
    /// `{% if %}`/`{% endif %}`. A half-translated document is worse than a
    /// rejected one, so this aborts the run.
    #[error("Unbalanced section tag {tag:?} at offset {offset}")]
    UnbalancedSectionTags {
        /// The tag text as written in the template.
        tag: String,
        /// Byte offset of the tag in the template source.
        offset: usize,
    },

    /// File I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Type alias for [`Result<T, LaporanError>`].
pub type Result<T> = std::result::Result<T, LaporanError>;
