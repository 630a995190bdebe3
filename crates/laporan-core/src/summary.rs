//! JSON-serializable model summary for diagnostic and CLI use.

use crate::model::{DocumentModel, ModelMetadata, ScalarValue, ScheduleEntry};
use serde::Serialize;
use std::collections::BTreeMap;

/// How many participant records the summary includes as a sample.
const PARTICIPANT_SAMPLE_SIZE: usize = 3;

/// Compact, JSON-serializable view of a [`DocumentModel`].
///
/// Collections are reduced to counts plus a small sample so the summary
/// stays readable for large workbooks; scalar sections are carried whole.
#[derive(Debug, Clone, Serialize)]
pub struct ModelSummary {
    /// Full program info (scalar section, carried as-is).
    pub program_info: BTreeMap<String, ScalarValue>,
    /// Total number of participant records.
    pub participant_count: usize,
    /// First few participant records.
    pub participant_sample: Vec<BTreeMap<String, ScalarValue>>,
    /// Evaluation section names (distributions omitted).
    pub evaluation_sections: Vec<String>,
    /// Full tentative schedule.
    pub tentative: BTreeMap<String, Vec<ScheduleEntry>>,
    /// Attendance counts (scalar section, carried as-is).
    pub attendance: BTreeMap<String, ScalarValue>,
    /// Suggestion entry count per category.
    pub suggestion_counts: BTreeMap<String, usize>,
    /// Number of columns that matched no canonical field.
    pub unmapped_columns: usize,
    /// Non-fatal mapping notes.
    pub warnings: Vec<String>,
    /// Provenance info.
    pub metadata: ModelMetadata,
}

impl ModelSummary {
    /// Build a summary from a mapped model.
    #[must_use]
    pub fn from_model(model: &DocumentModel) -> Self {
        Self {
            program_info: model.program_info.clone(),
            participant_count: model.participants.len(),
            participant_sample: model
                .participants
                .iter()
                .take(PARTICIPANT_SAMPLE_SIZE)
                .cloned()
                .collect(),
            evaluation_sections: model.evaluation.keys().cloned().collect(),
            tentative: model.tentative.clone(),
            attendance: model.attendance.clone(),
            suggestion_counts: model
                .suggestions
                .iter()
                .map(|(category, entries)| (category.clone(), entries.len()))
                .collect(),
            unmapped_columns: model.unmapped.len(),
            warnings: model.warnings.clone(),
            metadata: model.metadata.clone(),
        }
    }
}
