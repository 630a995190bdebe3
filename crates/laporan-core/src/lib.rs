//! # laporan-core - canonical model and error taxonomy
//!
//! Core types for the laporan report-generation pipeline:
//!
//! - [`DocumentModel`] - the canonical intermediate data shape every report
//!   template is rendered against, produced by the field mapper
//!   (`laporan-mapper`) and consumed by the renderer (`laporan-template`).
//! - [`LaporanError`] / [`Result`] - the shared error taxonomy. Fatal
//!   conditions (`UnreadableWorkbook`, `AmbiguousHeaderMapping`,
//!   `UnbalancedSectionTags`) abort a run; missing data never does.
//! - [`ModelSummary`] - the JSON summary printed by the `laporan` CLI.
//!
//! The pipeline itself is stateless: every model is built fresh from one
//! workbook scan and immutable afterwards, so concurrent pipeline runs
//! share nothing.

pub mod error;
pub mod model;
pub mod summary;

pub use error::{LaporanError, Result};
pub use model::{
    DocumentModel, EvaluationSection, ModelMetadata, RatingDistribution, ScalarValue,
    ScheduleEntry, UnmappedColumn,
};
pub use summary::ModelSummary;
