//! Field mapper: scanned tables to the canonical document model.
//!
//! Each table is classified by the shape of its dictionary-matched
//! headers (participant roster, evaluation distribution, schedule,
//! label/value pairs) and assembled into the matching model section.
//! Headers that match nothing are never discarded; their columns land in
//! the model's `unmapped` bucket for manual inspection.
//!
//! Non-fatal irregularities (skipped cells, coercion failures, duplicate
//! scalars) accumulate in `model.warnings`. The only fatal condition is an
//! ambiguous header, which indicates a broken alias table rather than bad
//! input data.

use crate::dictionary::{CanonicalField, FieldFamily, SynonymDictionary};
use chrono::Utc;
use laporan_backend::{CellValue, Table, WorkbookScan};
use laporan_core::{
    DocumentModel, ModelMetadata, Result, ScalarValue, ScheduleEntry, UnmappedColumn,
};
use std::collections::BTreeMap;

/// Day label used when a schedule table carries no day information.
const DEFAULT_DAY_LABEL: &str = "Day 1";

/// Maps scanned tables into a [`DocumentModel`] using an immutable synonym
/// dictionary.
///
/// The dictionary is fixed at construction; a mapper is cheap to build and
/// safe to share across threads.
#[derive(Debug, Clone, Default)]
pub struct FieldMapper {
    dictionary: SynonymDictionary,
}

/// How a table's headers classified it.
#[derive(Debug)]
enum TableKind {
    /// Per-person roster; one model entry per data row.
    Participants,
    /// Rating-distribution table: a metric column plus numeric buckets.
    Evaluation {
        metric_col: String,
        buckets: Vec<String>,
    },
    /// Programme schedule.
    Tentative,
    /// Two-column label/value table (program info or attendance labels).
    KeyValue,
    /// No roster/schedule/distribution shape; matched columns are handled
    /// per family, the rest goes to the unmapped bucket.
    Columnwise,
}

/// A header resolved against the dictionary.
struct ResolvedColumn {
    header: String,
    field: Option<CanonicalField>,
}

impl FieldMapper {
    /// Create a mapper over a specific dictionary.
    #[must_use]
    pub const fn new(dictionary: SynonymDictionary) -> Self {
        Self { dictionary }
    }

    /// Create a mapper over the builtin bilingual dictionary.
    #[must_use]
    pub fn with_builtin_dictionary() -> Self {
        Self::new(SynonymDictionary::builtin())
    }

    /// Map a whole workbook scan, carrying its provenance into the model.
    ///
    /// # Errors
    ///
    /// [`laporan_core::LaporanError::AmbiguousHeaderMapping`] when the
    /// dictionary resolves one header to two fields.
    pub fn map(&self, scan: &WorkbookScan) -> Result<DocumentModel> {
        let metadata = ModelMetadata {
            source_file: scan.source_name.clone(),
            sheets: scan.sheets.clone(),
            extracted_at: Some(Utc::now()),
        };
        self.map_with_metadata(&scan.tables, metadata)
    }

    /// Map bare tables (provenance limited to the sheet names the tables
    /// mention).
    ///
    /// # Errors
    ///
    /// Same as [`FieldMapper::map`].
    pub fn map_tables(&self, tables: &[Table]) -> Result<DocumentModel> {
        let mut sheets: Vec<String> = Vec::new();
        for table in tables {
            if !sheets.contains(&table.sheet_name) {
                sheets.push(table.sheet_name.clone());
            }
        }
        let metadata = ModelMetadata {
            source_file: String::new(),
            sheets,
            extracted_at: Some(Utc::now()),
        };
        self.map_with_metadata(tables, metadata)
    }

    fn map_with_metadata(
        &self,
        tables: &[Table],
        metadata: ModelMetadata,
    ) -> Result<DocumentModel> {
        let mut model = DocumentModel::empty(metadata);

        for (table_index, table) in tables.iter().enumerate() {
            let resolved = self.resolve_headers(table)?;
            match self.classify(table, &resolved)? {
                TableKind::Participants => {
                    Self::assemble_participants(table, table_index, &resolved, &mut model);
                }
                TableKind::Evaluation {
                    metric_col,
                    buckets,
                } => {
                    Self::assemble_evaluation(
                        table,
                        table_index,
                        &resolved,
                        &metric_col,
                        &buckets,
                        &mut model,
                    );
                }
                TableKind::Tentative => {
                    Self::assemble_tentative(table, table_index, &resolved, &mut model);
                }
                TableKind::KeyValue => {
                    self.assemble_key_value(table, table_index, &mut model)?;
                }
                TableKind::Columnwise => {
                    Self::assemble_columnwise(table, table_index, &resolved, &mut model);
                }
            }
        }

        Self::align_participant_fields(&mut model);
        log::debug!(
            "mapped {} table(s): {} participant(s), {} unmapped column(s), {} warning(s)",
            tables.len(),
            model.participants.len(),
            model.unmapped.len(),
            model.warnings.len()
        );
        Ok(model)
    }

    fn resolve_headers(&self, table: &Table) -> Result<Vec<ResolvedColumn>> {
        table
            .header
            .iter()
            .map(|header| {
                Ok(ResolvedColumn {
                    header: header.clone(),
                    field: self.dictionary.lookup(header)?,
                })
            })
            .collect()
    }

    fn classify(&self, table: &Table, resolved: &[ResolvedColumn]) -> Result<TableKind> {
        let matched: Vec<CanonicalField> =
            resolved.iter().filter_map(|c| c.field).collect();
        let family_count = |family: FieldFamily| {
            matched.iter().filter(|f| f.family() == family).count()
        };

        // Rating-distribution shape: a metric column plus two or more
        // numeric-bucket headers ("1".."5").
        let metric_col = resolved
            .iter()
            .find(|c| c.field == Some(CanonicalField::Metric))
            .map(|c| c.header.clone());
        let buckets: Vec<String> = resolved
            .iter()
            .filter(|c| c.header.trim().parse::<f64>().is_ok())
            .map(|c| c.header.clone())
            .collect();
        if let Some(metric_col) = metric_col {
            if buckets.len() >= 2 {
                return Ok(TableKind::Evaluation {
                    metric_col,
                    buckets,
                });
            }
        }

        // Roster shape: name column present and participants-family
        // headers predominate among the matches.
        let participant_matches = family_count(FieldFamily::Participants);
        if matched.contains(&CanonicalField::ParticipantName)
            && participant_matches * 2 > matched.len()
        {
            return Ok(TableKind::Participants);
        }

        // Schedule shape.
        if matched.contains(&CanonicalField::Time)
            && matched.contains(&CanonicalField::Activity)
        {
            return Ok(TableKind::Tentative);
        }

        // Label/value shape: two columns whose left side reads as program
        // info or attendance labels. The header row itself is the first
        // pair ("Tajuk Program" / "Kursus Kepimpinan"), so it counts too.
        if table.header.len() == 2 && self.is_key_value(table)? {
            return Ok(TableKind::KeyValue);
        }

        Ok(TableKind::Columnwise)
    }

    /// A two-column table is label/value when more than half of its left
    /// cells (header included) resolve to program-info or attendance
    /// fields.
    fn is_key_value(&self, table: &Table) -> Result<bool> {
        let mut labels: Vec<String> = vec![table.header[0].clone()];
        let label_col = &table.header[0];
        for row in &table.rows {
            if let Some(cell) = row.get(label_col) {
                if !cell.is_empty() {
                    labels.push(cell.to_text());
                }
            }
        }

        let mut matched = 0_usize;
        for label in &labels {
            if let Some(field) = self.dictionary.lookup(label)? {
                if matches!(
                    field.family(),
                    FieldFamily::ProgramInfo | FieldFamily::Attendance
                ) {
                    matched += 1;
                }
            }
        }
        Ok(matched * 2 > labels.len())
    }

    fn assemble_participants(
        table: &Table,
        table_index: usize,
        resolved: &[ResolvedColumn],
        model: &mut DocumentModel,
    ) {
        for row in &table.rows {
            let mut entry: BTreeMap<String, ScalarValue> = BTreeMap::new();
            for column in resolved {
                let Some(field) = column.field else { continue };
                if field.family() != FieldFamily::Participants {
                    continue;
                }
                let value = row
                    .get(&column.header)
                    .and_then(cell_to_scalar)
                    .unwrap_or_else(|| ScalarValue::Text(String::new()));
                // First column wins when two headers map to the same field.
                entry.entry(field.key().to_string()).or_insert(value);
            }
            if entry
                .values()
                .all(|v| matches!(v, ScalarValue::Text(t) if t.is_empty()))
            {
                continue;
            }
            model.participants.push(entry);
        }

        for column in resolved {
            if let Some(field) = column.field {
                if field.family() != FieldFamily::Participants {
                    model.warnings.push(format!(
                        "sheet {:?}, table {}: column {:?} matched {} but sits in a roster table",
                        table.sheet_name,
                        table_index,
                        column.header,
                        field.display_name()
                    ));
                }
            }
        }
        Self::bucket_columns(table, table_index, resolved, |c| c.field.is_none(), model);
    }

    fn assemble_evaluation(
        table: &Table,
        table_index: usize,
        resolved: &[ResolvedColumn],
        metric_col: &str,
        buckets: &[String],
        model: &mut DocumentModel,
    ) {
        let section = model
            .evaluation
            .entry(table.sheet_name.clone())
            .or_default();

        for row in &table.rows {
            let metric = row.get(metric_col).map(CellValue::to_text).unwrap_or_default();
            if metric.is_empty() {
                model.warnings.push(format!(
                    "sheet {:?}, table {}: evaluation row without a metric name skipped",
                    table.sheet_name, table_index
                ));
                continue;
            }
            let distribution = section.entry(metric.clone()).or_default();
            for bucket in buckets {
                match row.get(bucket) {
                    Some(CellValue::Empty) | None => {
                        distribution.entry(bucket.trim().to_string()).or_insert(0.0);
                    }
                    Some(cell) => {
                        if let Some(count) = cell_to_scalar(cell).and_then(|s| s.as_number()) {
                            distribution.insert(bucket.trim().to_string(), count);
                        } else {
                            model.warnings.push(format!(
                                "sheet {:?}, table {}: non-numeric count for {metric:?} bucket {bucket:?}",
                                table.sheet_name, table_index
                            ));
                        }
                    }
                }
            }
        }

        Self::bucket_columns(
            table,
            table_index,
            resolved,
            |c| c.field.is_none() && !buckets.contains(&c.header),
            model,
        );
    }

    fn assemble_tentative(
        table: &Table,
        table_index: usize,
        resolved: &[ResolvedColumn],
        model: &mut DocumentModel,
    ) {
        let column_for = |wanted: CanonicalField| {
            resolved
                .iter()
                .find(|c| c.field == Some(wanted))
                .map(|c| c.header.clone())
        };
        let day_col = column_for(CanonicalField::Day);
        let time_col = column_for(CanonicalField::Time);
        let activity_col = column_for(CanonicalField::Activity);
        let description_col = column_for(CanonicalField::Description);
        let handler_col = column_for(CanonicalField::Handler);

        let text_at = |row: &BTreeMap<String, CellValue>, col: &Option<String>| {
            col.as_ref()
                .and_then(|c| row.get(c))
                .map(CellValue::to_text)
                .unwrap_or_default()
        };

        let mut current_day = String::new();
        for row in &table.rows {
            // A row whose only filled cell is the leading column is a day
            // label, not a schedule entry.
            let filled: Vec<&String> = table
                .header
                .iter()
                .filter(|h| row.get(*h).is_some_and(|c| !c.is_empty()))
                .collect();
            if filled.len() == 1 && *filled[0] == table.header[0] {
                current_day = row[&table.header[0]].to_text();
                continue;
            }

            if let Some(day_col) = &day_col {
                let day = row.get(day_col).map(CellValue::to_text).unwrap_or_default();
                if !day.is_empty() {
                    // Carried forward over blank day cells below.
                    current_day = day;
                }
            }

            let entry = ScheduleEntry {
                time: text_at(row, &time_col),
                activity: text_at(row, &activity_col),
                description: text_at(row, &description_col),
                handler: text_at(row, &handler_col),
            };
            if entry.time.is_empty() && entry.activity.is_empty() {
                model.warnings.push(format!(
                    "sheet {:?}, table {}: schedule row without time or activity skipped",
                    table.sheet_name, table_index
                ));
                continue;
            }

            let day = if current_day.is_empty() {
                DEFAULT_DAY_LABEL.to_string()
            } else {
                current_day.clone()
            };
            model.tentative.entry(day).or_default().push(entry);
        }

        Self::bucket_columns(table, table_index, resolved, |c| c.field.is_none(), model);
    }

    fn assemble_key_value(
        &self,
        table: &Table,
        table_index: usize,
        model: &mut DocumentModel,
    ) -> Result<()> {
        let label_col = table.header[0].clone();
        let value_col = table.header[1].clone();

        // The header row is itself the first label/value pair.
        let mut pairs: Vec<(String, ScalarValue)> = Vec::new();
        if !value_col.starts_with("column_") {
            pairs.push((label_col.clone(), ScalarValue::coerce(&value_col)));
        }
        for row in &table.rows {
            let label = row
                .get(&label_col)
                .map(CellValue::to_text)
                .unwrap_or_default();
            if label.is_empty() {
                continue;
            }
            match row.get(&value_col).and_then(cell_to_scalar) {
                Some(value) => pairs.push((label, value)),
                None => model.warnings.push(format!(
                    "sheet {:?}, table {}: label {label:?} has no value",
                    table.sheet_name, table_index
                )),
            }
        }

        for (label, value) in pairs {
            match self.dictionary.lookup(&label)? {
                Some(field) if field.family() == FieldFamily::ProgramInfo => {
                    Self::insert_scalar(
                        &mut model.program_info,
                        field.key(),
                        value,
                        &table.sheet_name,
                        &mut model.warnings,
                    );
                }
                Some(field) if field.family() == FieldFamily::Attendance => {
                    Self::insert_scalar(
                        &mut model.attendance,
                        field.key(),
                        value,
                        &table.sheet_name,
                        &mut model.warnings,
                    );
                }
                _ => model.unmapped.push(UnmappedColumn {
                    sheet: table.sheet_name.clone(),
                    table_index,
                    header: label,
                    values: vec![value.to_text()],
                }),
            }
        }
        Ok(())
    }

    /// Handle tables without a recognized overall shape: each matched
    /// column is mapped by its family, everything else is retained.
    fn assemble_columnwise(
        table: &Table,
        table_index: usize,
        resolved: &[ResolvedColumn],
        model: &mut DocumentModel,
    ) {
        for column in resolved {
            let values: Vec<&CellValue> = table.column(&column.header);
            match column.field {
                Some(field) if field.family() == FieldFamily::ProgramInfo => {
                    let joined = values
                        .iter()
                        .filter(|c| !c.is_empty())
                        .map(|c| c.to_text())
                        .collect::<Vec<_>>()
                        .join("\n");
                    if !joined.is_empty() {
                        Self::insert_scalar(
                            &mut model.program_info,
                            field.key(),
                            ScalarValue::coerce(&joined),
                            &table.sheet_name,
                            &mut model.warnings,
                        );
                    }
                }
                Some(field) if field.family() == FieldFamily::Suggestions => {
                    let entries = model
                        .suggestions
                        .entry(field.key().to_string())
                        .or_default();
                    entries.extend(
                        values
                            .iter()
                            .filter(|c| !c.is_empty())
                            .map(|c| c.to_text()),
                    );
                }
                Some(field) if field.family() == FieldFamily::Attendance => {
                    if let Some(value) =
                        values.iter().find(|c| !c.is_empty()).and_then(|c| cell_to_scalar(c))
                    {
                        Self::insert_scalar(
                            &mut model.attendance,
                            field.key(),
                            value,
                            &table.sheet_name,
                            &mut model.warnings,
                        );
                    }
                }
                _ => {
                    model.unmapped.push(UnmappedColumn {
                        sheet: table.sheet_name.clone(),
                        table_index,
                        header: column.header.clone(),
                        values: values.iter().map(|c| c.to_text()).collect(),
                    });
                }
            }
        }
    }

    /// Retain the columns selected by `keep` in the unmapped bucket.
    fn bucket_columns<F>(
        table: &Table,
        table_index: usize,
        resolved: &[ResolvedColumn],
        keep: F,
        model: &mut DocumentModel,
    ) where
        F: Fn(&ResolvedColumn) -> bool,
    {
        for column in resolved.iter().filter(|c| keep(c)) {
            model.unmapped.push(UnmappedColumn {
                sheet: table.sheet_name.clone(),
                table_index,
                header: column.header.clone(),
                values: table
                    .column(&column.header)
                    .iter()
                    .map(|c| c.to_text())
                    .collect(),
            });
        }
    }

    fn insert_scalar(
        section: &mut BTreeMap<String, ScalarValue>,
        key: &str,
        value: ScalarValue,
        sheet: &str,
        warnings: &mut Vec<String>,
    ) {
        if let Some(existing) = section.get(key) {
            if *existing != value {
                warnings.push(format!(
                    "sheet {sheet:?}: duplicate value for {key:?} ignored"
                ));
            }
            return;
        }
        section.insert(key.to_string(), value);
    }

    /// Give every participant entry the same field set: the union of all
    /// mapped participant columns, missing cells filled with empty text.
    fn align_participant_fields(model: &mut DocumentModel) {
        let mut keys: Vec<String> = Vec::new();
        for entry in &model.participants {
            for key in entry.keys() {
                if !keys.contains(key) {
                    keys.push(key.clone());
                }
            }
        }
        for entry in &mut model.participants {
            for key in &keys {
                entry
                    .entry(key.clone())
                    .or_insert_with(|| ScalarValue::Text(String::new()));
            }
        }
    }
}

/// Coerce a scanned cell into a model scalar. Empty cells yield `None`.
fn cell_to_scalar(cell: &CellValue) -> Option<ScalarValue> {
    match cell {
        CellValue::Empty => None,
        CellValue::Number(n) => Some(ScalarValue::Number(*n)),
        CellValue::Text(s) => Some(ScalarValue::coerce(s)),
        CellValue::Bool(b) => Some(ScalarValue::Text(b.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dictionary::{DictionaryEntry, SynonymDictionary};

    fn cell(text: &str) -> CellValue {
        if text.is_empty() {
            CellValue::Empty
        } else {
            CellValue::Text(text.to_string())
        }
    }

    fn table(sheet: &str, headers: &[&str], rows: &[&[&str]]) -> Table {
        let header: Vec<String> = headers.iter().map(|h| (*h).to_string()).collect();
        let rows = rows
            .iter()
            .map(|row| {
                header
                    .iter()
                    .zip(row.iter())
                    .map(|(h, v)| (h.clone(), cell(v)))
                    .collect::<BTreeMap<_, _>>()
            })
            .collect();
        Table {
            sheet_name: sheet.to_string(),
            header,
            rows,
        }
    }

    /// Scenario: a workbook with one 4-row participant table (header plus
    /// three data rows) and nothing else.
    #[test]
    fn test_participant_table_maps_three_entries() {
        let tables = vec![table(
            "Senarai Peserta",
            &["Nama", "Organisasi", "Jawatan"],
            &[
                &["Aina", "JPN Johor", "Pegawai"],
                &["Ben", "MOE", "Kerani"],
                &["Chong", "JPS", "Jurutera"],
            ],
        )];
        let mapper = FieldMapper::with_builtin_dictionary();
        let model = mapper.map_tables(&tables).unwrap();

        assert_eq!(model.participants.len(), 3);
        assert!(model.program_info.is_empty());
        assert_eq!(
            model.participants[0]["name"],
            ScalarValue::Text("Aina".to_string())
        );
        assert_eq!(
            model.participants[2]["organization"],
            ScalarValue::Text("JPS".to_string())
        );
    }

    /// Every participant entry carries the same field set even when two
    /// roster tables disagree on columns.
    #[test]
    fn test_participant_entries_have_uniform_fields() {
        let tables = vec![
            table(
                "Peserta",
                &["Nama", "Organisasi"],
                &[&["Aina", "JPN"]],
            ),
            table(
                "Peserta",
                &["Nama", "Jawatan", "Markah"],
                &[&["Ben", "Kerani", "85"]],
            ),
        ];
        let mapper = FieldMapper::with_builtin_dictionary();
        let model = mapper.map_tables(&tables).unwrap();

        assert_eq!(model.participants.len(), 2);
        let keys: Vec<&String> = model.participants[0].keys().collect();
        for entry in &model.participants {
            assert_eq!(entry.keys().collect::<Vec<_>>(), keys);
        }
        assert_eq!(
            model.participants[1]["score"],
            ScalarValue::Number(85.0)
        );
    }

    /// Two canonical fields whose alias sets both contain "Date": the
    /// mapper refuses to guess.
    #[test]
    fn test_overlapping_aliases_fail_mapping() {
        let dict = SynonymDictionary::from_entries_unchecked(vec![
            DictionaryEntry::new(CanonicalField::ProgramDate, &["Date", "Tarikh"]),
            DictionaryEntry::new(CanonicalField::Day, &["Date", "Hari"]),
        ]);
        let mapper = FieldMapper::new(dict);
        let tables = vec![table("Info", &["Date", "Venue"], &[&["1 Mac", "KL"]])];
        let err = mapper.map_tables(&tables).unwrap_err();
        assert!(matches!(
            err,
            laporan_core::LaporanError::AmbiguousHeaderMapping { .. }
        ));
    }

    /// Label/value table where the header row is itself the first pair.
    #[test]
    fn test_key_value_program_info() {
        let tables = vec![table(
            "Maklumat",
            &["Tajuk Program", "Kursus Kepimpinan"],
            &[
                &["Tarikh", "1 Mac 2024"],
                &["Tempat", "Putrajaya"],
                &["Penganjur", "JPA"],
            ],
        )];
        let mapper = FieldMapper::with_builtin_dictionary();
        let model = mapper.map_tables(&tables).unwrap();

        assert_eq!(
            model.program_info["title"],
            ScalarValue::Text("Kursus Kepimpinan".to_string())
        );
        assert_eq!(
            model.program_info["date"],
            ScalarValue::Text("1 Mac 2024".to_string())
        );
        assert_eq!(
            model.program_info["location"],
            ScalarValue::Text("Putrajaya".to_string())
        );
        assert_eq!(
            model.program_info["organizer"],
            ScalarValue::Text("JPA".to_string())
        );
    }

    /// Rating-distribution table: metric column plus numeric buckets.
    #[test]
    fn test_evaluation_distribution() {
        let tables = vec![table(
            "Penilaian Kursus",
            &["Aspek", "1", "2", "3", "4", "5"],
            &[
                &["Kandungan", "0", "1", "3", "10", "6"],
                &["Penyampaian", "", "2", "4", "8", "6"],
            ],
        )];
        let mapper = FieldMapper::with_builtin_dictionary();
        let model = mapper.map_tables(&tables).unwrap();

        let section = &model.evaluation["Penilaian Kursus"];
        assert_eq!(section["Kandungan"]["4"], 10.0);
        assert_eq!(section["Kandungan"]["1"], 0.0);
        // Empty bucket cells read as zero counts.
        assert_eq!(section["Penyampaian"]["1"], 0.0);
        assert_eq!(section["Penyampaian"]["5"], 6.0);
    }

    /// Schedule table with an explicit day column carried forward over
    /// blank cells.
    #[test]
    fn test_tentative_day_column_carry_forward() {
        let tables = vec![table(
            "Tentatif",
            &["Hari", "Masa", "Aktiviti", "Penceramah"],
            &[
                &["Hari 1", "9.00", "Pendaftaran", "Urus setia"],
                &["", "10.00", "Sesi 1", "Dr. Lim"],
                &["Hari 2", "9.00", "Sesi 2", "Pn. Siti"],
            ],
        )];
        let mapper = FieldMapper::with_builtin_dictionary();
        let model = mapper.map_tables(&tables).unwrap();

        assert_eq!(model.tentative["Hari 1"].len(), 2);
        assert_eq!(model.tentative["Hari 2"].len(), 1);
        assert_eq!(model.tentative["Hari 1"][1].activity, "Sesi 1");
        assert_eq!(model.tentative["Hari 2"][0].handler, "Pn. Siti");
    }

    /// Schedule table without day information: rows where only the leading
    /// cell is filled act as day labels; with none at all, "Day 1".
    #[test]
    fn test_tentative_label_rows_and_fallback() {
        let labelled = vec![table(
            "Tentatif",
            &["Masa", "Aktiviti"],
            &[
                &["Hari Pertama", ""],
                &["9.00", "Taklimat"],
                &["Hari Kedua", ""],
                &["9.30", "Bengkel"],
            ],
        )];
        let mapper = FieldMapper::with_builtin_dictionary();
        let model = mapper.map_tables(&labelled).unwrap();
        assert_eq!(model.tentative["Hari Pertama"].len(), 1);
        assert_eq!(model.tentative["Hari Kedua"][0].activity, "Bengkel");

        let bare = vec![table(
            "Tentatif",
            &["Masa", "Aktiviti"],
            &[&["9.00", "Taklimat"]],
        )];
        let model = mapper.map_tables(&bare).unwrap();
        assert_eq!(model.tentative[DEFAULT_DAY_LABEL].len(), 1);
    }

    /// Attendance label/value table.
    #[test]
    fn test_attendance_key_value() {
        let tables = vec![table(
            "Kehadiran",
            &["Dijemput", "30"],
            &[&["Hadir", "24"], &["Tidak Hadir", "6"]],
        )];
        let mapper = FieldMapper::with_builtin_dictionary();
        let model = mapper.map_tables(&tables).unwrap();

        assert_eq!(model.attendance["invited"], ScalarValue::Number(30.0));
        assert_eq!(model.attendance["attended"], ScalarValue::Number(24.0));
        assert_eq!(model.attendance["absent"], ScalarValue::Number(6.0));
    }

    /// Suggestions column with an index column alongside.
    #[test]
    fn test_suggestions_column() {
        let tables = vec![table(
            "Cadangan",
            &["Bil", "Cadangan Peserta"],
            &[
                &["1", "Lanjutkan tempoh kursus"],
                &["2", "Sediakan nota bercetak"],
                &["3", ""],
            ],
        )];
        let mapper = FieldMapper::with_builtin_dictionary();
        let model = mapper.map_tables(&tables).unwrap();

        let entries = &model.suggestions["participants"];
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0], "Lanjutkan tempoh kursus");
        // The index column matched nothing and is retained.
        assert!(model.unmapped.iter().any(|c| c.header == "Bil"));
    }

    /// Objectives spread over several rows of one column join into a
    /// single scalar.
    #[test]
    fn test_objectives_column_joins_rows() {
        let tables = vec![table(
            "Objektif",
            &["Bil", "Objektif"],
            &[
                &["1", "Meningkatkan kemahiran"],
                &["2", "Memupuk kerjasama"],
            ],
        )];
        let mapper = FieldMapper::with_builtin_dictionary();
        let model = mapper.map_tables(&tables).unwrap();

        assert_eq!(
            model.program_info["objectives"],
            ScalarValue::Text("Meningkatkan kemahiran\nMemupuk kerjasama".to_string())
        );
    }

    /// Completely unrecognized tables keep all their columns.
    #[test]
    fn test_unrecognized_table_retained_in_unmapped() {
        let tables = vec![table(
            "Lain-lain",
            &["Kod", "Catatan Dalaman"],
            &[&["A1", "semakan"], &["A2", "lulus"]],
        )];
        let mapper = FieldMapper::with_builtin_dictionary();
        let model = mapper.map_tables(&tables).unwrap();

        assert!(model.is_empty());
        assert_eq!(model.unmapped.len(), 2);
        assert_eq!(model.unmapped[0].values, vec!["A1", "A2"]);
    }

    /// Zero tables produce an empty-but-valid model, not an error.
    #[test]
    fn test_zero_tables_is_not_an_error() {
        let mapper = FieldMapper::with_builtin_dictionary();
        let model = mapper.map_tables(&[]).unwrap();
        assert!(model.is_empty());
        assert!(model.warnings.is_empty());
    }
}
