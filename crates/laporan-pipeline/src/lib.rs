//! # laporan-pipeline - end-to-end report generation
//!
//! Composes the pipeline stages into one facade:
//!
//! ```text
//! workbook ──▶ scan (laporan-backend) ──▶ tables
//! tables ──▶ map (laporan-mapper) ──▶ canonical model
//! template ──▶ detect + translate (laporan-template) ──▶ normalized text
//! (model, normalized text) ──▶ render ──▶ artifact + diagnostics
//! ```
//!
//! Every invocation is an independent, side-effect-free computation over
//! its inputs (the only I/O is the initial workbook read), so pipelines
//! are safe to run concurrently from worker threads without shared state,
//! locks, or cancellation plumbing. Callers that fan work out are
//! responsible for giving each job a unique output location.
//!
//! ## Map once, render many
//!
//! Extraction dominates the cost when several templates are rendered
//! against one workbook. [`ReportPipeline::extract`] produces the model
//! once; [`ReportPipeline::render_with_model`] runs any number of
//! templates against it.

// Rendering helpers take &self for API consistency with the extraction
// methods even where the mapper is not consulted.
#![allow(clippy::unused_self)]

use laporan_backend::{scan_bytes, scan_path};
use laporan_core::{DocumentModel, Result};
use laporan_mapper::{FieldMapper, SynonymDictionary};
use laporan_template::{detect, render, translate, Dialect, UnresolvedReference};
use std::path::Path;

/// A rendered report artifact together with its diagnostics.
#[derive(Debug, Clone)]
pub struct GeneratedReport {
    /// The rendered text, complete even when references were unresolved.
    pub text: String,
    /// Every expression that did not resolve against the model. The tag
    /// text for each of these appears verbatim in `text`.
    pub unresolved: Vec<UnresolvedReference>,
    /// Dialect the template was detected as before normalization.
    pub dialect: Dialect,
}

/// The report-generation pipeline facade.
///
/// Construct once (the synonym dictionary is fixed at construction) and
/// reuse freely; the pipeline holds no mutable state.
#[derive(Debug, Clone, Default)]
pub struct ReportPipeline {
    mapper: FieldMapper,
}

impl ReportPipeline {
    /// Pipeline over the builtin bilingual dictionary.
    #[must_use]
    pub fn new() -> Self {
        Self {
            mapper: FieldMapper::with_builtin_dictionary(),
        }
    }

    /// Pipeline over a custom dictionary.
    #[must_use]
    pub const fn with_dictionary(dictionary: SynonymDictionary) -> Self {
        Self {
            mapper: FieldMapper::new(dictionary),
        }
    }

    /// Scan and map a workbook file into the canonical model.
    ///
    /// # Errors
    ///
    /// `UnreadableWorkbook` when the file cannot be opened or parsed;
    /// `AmbiguousHeaderMapping` on a broken dictionary. A workbook with
    /// no recognizable tables maps to an empty-but-valid model.
    pub fn extract<P: AsRef<Path>>(&self, workbook: P) -> Result<DocumentModel> {
        let scan = scan_path(workbook)?;
        self.mapper.map(&scan)
    }

    /// Scan and map an in-memory workbook.
    ///
    /// # Errors
    ///
    /// Same as [`ReportPipeline::extract`].
    pub fn extract_bytes(&self, bytes: &[u8], source_name: &str) -> Result<DocumentModel> {
        let scan = scan_bytes(bytes, source_name)?;
        self.mapper.map(&scan)
    }

    /// Run the whole pipeline: extract the model from `workbook`, then
    /// render `template` against it.
    ///
    /// # Errors
    ///
    /// The extraction errors above, plus `UnbalancedSectionTags` for
    /// broken template markup. Unresolved references are diagnostics on
    /// the result, never errors.
    pub fn generate<P: AsRef<Path>>(
        &self,
        workbook: P,
        template: &str,
    ) -> Result<GeneratedReport> {
        let model = self.extract(workbook)?;
        self.render_with_model(&model, template)
    }

    /// Render a template against a previously extracted model.
    ///
    /// The template may be in either markup family: section markup is
    /// translated first, control-tag markup passes through normalization
    /// untouched.
    ///
    /// # Errors
    ///
    /// `UnbalancedSectionTags` for broken markup in either family.
    pub fn render_with_model(
        &self,
        model: &DocumentModel,
        template: &str,
    ) -> Result<GeneratedReport> {
        let dialect = detect(template);
        let normalized = translate(template)?;
        let (text, unresolved) = render(&normalized, model)?;
        if !unresolved.is_empty() {
            log::warn!(
                "rendered with {} unresolved reference(s), first: {}",
                unresolved.len(),
                unresolved[0].path
            );
        }
        Ok(GeneratedReport {
            text,
            unresolved,
            dialect,
        })
    }
}
