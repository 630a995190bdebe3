//! Canonical document model.
//!
//! The model is the language-neutral intermediate shape every report
//! template is rendered against. It is produced once by the field mapper
//! and immutable for the rest of the pipeline.
//!
//! Scalar sections (`program_info`, `attendance`) hold only string/number
//! values; collection sections (`participants`, `evaluation`, `tentative`,
//! `suggestions`) never appear as bare scalars and vice versa.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A scalar cell value after mapping: trimmed text or a coerced number.
///
/// Serialized untagged so JSON output carries native numbers
/// (`"title": "Workshop"`, `"days": 3.0`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScalarValue {
    /// Numeric value (counts, scores, ratings).
    Number(f64),
    /// Everything that is not syntactically numeric, trimmed.
    Text(String),
}

impl ScalarValue {
    /// Coerce raw cell text: syntactically numeric input becomes
    /// [`ScalarValue::Number`], everything else trimmed text.
    #[must_use]
    pub fn coerce(raw: &str) -> Self {
        let trimmed = raw.trim();
        trimmed
            .parse::<f64>()
            .map_or_else(|_| Self::Text(trimmed.to_string()), Self::Number)
    }

    /// Numeric view of the value, parsing text if it happens to be numeric.
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(s) => s.trim().parse().ok(),
        }
    }

    /// Text view of the value.
    #[must_use]
    pub fn to_text(&self) -> String {
        match self {
            Self::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => {
                format!("{n:.0}")
            }
            Self::Number(n) => n.to_string(),
            Self::Text(s) => s.clone(),
        }
    }
}

impl From<&ScalarValue> for serde_json::Value {
    fn from(value: &ScalarValue) -> Self {
        match value {
            ScalarValue::Number(n) => serde_json::Number::from_f64(*n)
                .map_or_else(|| Self::String(n.to_string()), Self::Number),
            ScalarValue::Text(s) => Self::String(s.clone()),
        }
    }
}

/// One row of the tentative (programme schedule) section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    /// Time slot text as written in the workbook (e.g. "9.00 - 10.30").
    pub time: String,
    /// Activity title.
    pub activity: String,
    /// Free-text description, empty when the column is absent.
    pub description: String,
    /// Person or role in charge of the slot.
    pub handler: String,
}

/// Distribution of response counts keyed by rating value ("1".."5").
pub type RatingDistribution = BTreeMap<String, f64>;

/// One evaluation section: metric name -> distribution.
pub type EvaluationSection = BTreeMap<String, RatingDistribution>;

/// A column whose header matched no canonical field.
///
/// Retained for manual inspection instead of being discarded; silent data
/// loss is indistinguishable from legitimately empty data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnmappedColumn {
    /// Sheet the table was found on.
    pub sheet: String,
    /// Zero-based index of the table within the scan result.
    pub table_index: usize,
    /// The header text that failed to match.
    pub header: String,
    /// Column values in row order, as display text.
    pub values: Vec<String>,
}

/// Provenance for a mapped model.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelMetadata {
    /// File name (or byte-input description) the workbook was read from.
    pub source_file: String,
    /// Sheet names in workbook order.
    pub sheets: Vec<String>,
    /// When the extraction ran.
    pub extracted_at: Option<DateTime<Utc>>,
}

/// The canonical document model: the target shape for any downstream
/// template.
///
/// Produced by the field mapper from scanned tables. An empty model (no
/// participants, no program info) is valid; zero extracted tables is not an
/// error condition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentModel {
    /// Flat scalar attributes: title, date, location, organizer,
    /// objectives, counts.
    pub program_info: BTreeMap<String, ScalarValue>,
    /// Ordered per-person records with a uniform key set.
    pub participants: Vec<BTreeMap<String, ScalarValue>>,
    /// Section name -> metric name -> counts-by-rating.
    pub evaluation: BTreeMap<String, EvaluationSection>,
    /// Day label -> ordered schedule entries.
    pub tentative: BTreeMap<String, Vec<ScheduleEntry>>,
    /// Flat mapping of attendance counts.
    pub attendance: BTreeMap<String, ScalarValue>,
    /// Category ("consultant", "participants") -> free-text entries.
    pub suggestions: BTreeMap<String, Vec<String>>,
    /// Columns that matched no canonical field, kept per table.
    pub unmapped: Vec<UnmappedColumn>,
    /// Non-fatal mapping notes (coercion failures, skipped cells).
    pub warnings: Vec<String>,
    /// Provenance info.
    pub metadata: ModelMetadata,
}

impl DocumentModel {
    /// Create an empty model carrying only provenance.
    #[must_use]
    pub fn empty(metadata: ModelMetadata) -> Self {
        Self {
            metadata,
            ..Self::default()
        }
    }

    /// True when no section holds any extracted data.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.program_info.is_empty()
            && self.participants.is_empty()
            && self.evaluation.is_empty()
            && self.tentative.is_empty()
            && self.attendance.is_empty()
            && self.suggestions.is_empty()
    }

    /// Flatten the model into the dotted key surface templates address.
    ///
    /// Scalar sections flatten one level deep (`program.title`,
    /// `attendance.present`); collection sections are emitted as single
    /// keys whose values are already-nested JSON, so metric names and day
    /// labels containing dots or spaces never take part in path splitting.
    ///
    /// The renderer nests these pairs into one context tree, merging
    /// overlapping prefixes.
    #[must_use]
    pub fn to_dotted_pairs(&self) -> Vec<(String, serde_json::Value)> {
        let mut pairs = Vec::new();

        for (key, value) in &self.program_info {
            pairs.push((format!("program.{key}"), value.into()));
        }

        let participants: Vec<serde_json::Value> = self
            .participants
            .iter()
            .map(|entry| {
                serde_json::Value::Object(
                    entry
                        .iter()
                        .map(|(k, v)| (k.clone(), v.into()))
                        .collect(),
                )
            })
            .collect();
        pairs.push((
            "participants".to_string(),
            serde_json::Value::Array(participants),
        ));

        pairs.push((
            "evaluation".to_string(),
            serde_json::to_value(&self.evaluation).unwrap_or_default(),
        ));

        let tentative: serde_json::Map<String, serde_json::Value> = self
            .tentative
            .iter()
            .map(|(day, entries)| {
                (
                    day.clone(),
                    serde_json::to_value(entries).unwrap_or_default(),
                )
            })
            .collect();
        pairs.push((
            "tentative".to_string(),
            serde_json::Value::Object(tentative),
        ));

        for (key, value) in &self.attendance {
            pairs.push((format!("attendance.{key}"), value.into()));
        }

        for (category, entries) in &self.suggestions {
            pairs.push((
                format!("suggestions.{category}"),
                serde_json::to_value(entries).unwrap_or_default(),
            ));
        }

        pairs.push((
            "meta.source_file".to_string(),
            serde_json::Value::String(self.metadata.source_file.clone()),
        ));
        pairs.push((
            "meta.sheets".to_string(),
            serde_json::to_value(&self.metadata.sheets).unwrap_or_default(),
        ));

        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coerce_numeric_text() {
        assert_eq!(ScalarValue::coerce(" 42 "), ScalarValue::Number(42.0));
        assert_eq!(ScalarValue::coerce("3.5"), ScalarValue::Number(3.5));
        assert_eq!(
            ScalarValue::coerce("  Kuala Lumpur "),
            ScalarValue::Text("Kuala Lumpur".to_string())
        );
    }

    #[test]
    fn test_to_text_drops_trailing_zero() {
        assert_eq!(ScalarValue::Number(7.0).to_text(), "7");
        assert_eq!(ScalarValue::Number(2.5).to_text(), "2.5");
    }

    #[test]
    fn test_empty_model_is_empty() {
        let model = DocumentModel::empty(ModelMetadata {
            source_file: "report.xlsx".to_string(),
            sheets: vec!["Sheet1".to_string()],
            extracted_at: None,
        });
        assert!(model.is_empty());
        assert_eq!(model.metadata.source_file, "report.xlsx");
    }

    #[test]
    fn test_dotted_pairs_flatten_scalars_one_level() {
        let mut model = DocumentModel::default();
        model.program_info.insert(
            "title".to_string(),
            ScalarValue::Text("Leadership Workshop".to_string()),
        );
        model
            .attendance
            .insert("present".to_string(), ScalarValue::Number(24.0));

        let pairs = model.to_dotted_pairs();
        let program_title = pairs
            .iter()
            .find(|(k, _)| k == "program.title")
            .expect("program.title pair");
        assert_eq!(
            program_title.1,
            serde_json::Value::String("Leadership Workshop".to_string())
        );
        assert!(pairs.iter().any(|(k, _)| k == "attendance.present"));
    }

    #[test]
    fn test_dotted_pairs_keep_collections_nested() {
        let mut model = DocumentModel::default();
        let mut entry = BTreeMap::new();
        entry.insert("name".to_string(), ScalarValue::Text("X".to_string()));
        model.participants.push(entry);

        let pairs = model.to_dotted_pairs();
        let participants = pairs
            .iter()
            .find(|(k, _)| k == "participants")
            .expect("participants pair");
        let arr = participants.1.as_array().expect("array value");
        assert_eq!(arr.len(), 1);
        assert_eq!(arr[0]["name"], serde_json::Value::String("X".to_string()));
    }

    #[test]
    fn test_scalar_value_untagged_serialization() {
        let mut info = BTreeMap::new();
        info.insert("days".to_string(), ScalarValue::Number(3.0));
        info.insert(
            "title".to_string(),
            ScalarValue::Text("Course".to_string()),
        );
        let json = serde_json::to_value(&info).unwrap();
        assert_eq!(json["days"], serde_json::json!(3.0));
        assert_eq!(json["title"], serde_json::json!("Course"));
    }
}
