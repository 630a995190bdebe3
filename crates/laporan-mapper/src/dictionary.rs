//! Localization-aware synonym dictionary.
//!
//! Header matching is the mapper's only contact with the workbooks' two
//! header languages (English and Malay). Instead of containment heuristics
//! scattered through the mapping code, all recognized spellings live in
//! one explicit table with a documented matching algorithm: aliases are
//! compared case-insensitively with surrounding whitespace trimmed, and
//! alias sets of distinct canonical fields must be disjoint. An overlap is
//! a configuration bug surfaced as
//! [`LaporanError::AmbiguousHeaderMapping`], never a silent pick.
//!
//! The dictionary is an immutable value handed to the mapper at
//! construction time; there is no module-level state.

use laporan_core::{LaporanError, Result};
use serde::Serialize;

/// The canonical fields a workbook header can resolve to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum CanonicalField {
    /// Program title (`program_info.title`).
    ProgramTitle,
    /// Program date (`program_info.date`).
    ProgramDate,
    /// Venue (`program_info.location`).
    ProgramLocation,
    /// Organizing body (`program_info.organizer`).
    ProgramOrganizer,
    /// Program objectives (`program_info.objectives`).
    ProgramObjectives,
    /// Duration in days (`program_info.duration`).
    ProgramDuration,
    /// Participant name column.
    ParticipantName,
    /// Participant organization/agency column.
    ParticipantOrganization,
    /// Participant position/designation column.
    ParticipantPosition,
    /// Participant score column.
    ParticipantScore,
    /// Schedule day column.
    Day,
    /// Schedule time-slot column.
    Time,
    /// Schedule activity column.
    Activity,
    /// Schedule description column.
    Description,
    /// Schedule handler/facilitator column.
    Handler,
    /// Evaluation metric column.
    Metric,
    /// Attendance: invited count.
    AttendanceInvited,
    /// Attendance: attended count.
    AttendanceAttended,
    /// Attendance: absent count.
    AttendanceAbsent,
    /// Free-text suggestions from the consultant/speaker.
    SuggestionsConsultant,
    /// Free-text suggestions from participants.
    SuggestionsParticipants,
}

/// Field families, used by the mapper to classify whole tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldFamily {
    /// Scalar program attributes.
    ProgramInfo,
    /// Per-person participant columns.
    Participants,
    /// Schedule columns.
    Tentative,
    /// Evaluation metric column.
    Evaluation,
    /// Attendance counts.
    Attendance,
    /// Free-text suggestion columns.
    Suggestions,
}

impl CanonicalField {
    /// Key under which the field lands in the canonical model.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::ProgramTitle => "title",
            Self::ProgramDate => "date",
            Self::ProgramLocation => "location",
            Self::ProgramOrganizer => "organizer",
            Self::ProgramObjectives => "objectives",
            Self::ProgramDuration => "duration",
            Self::ParticipantName => "name",
            Self::ParticipantOrganization => "organization",
            Self::ParticipantPosition => "position",
            Self::ParticipantScore => "score",
            Self::Day => "day",
            Self::Time => "time",
            Self::Activity => "activity",
            Self::Description => "description",
            Self::Handler => "handler",
            Self::Metric => "metric",
            Self::AttendanceInvited => "invited",
            Self::AttendanceAttended => "attended",
            Self::AttendanceAbsent => "absent",
            Self::SuggestionsConsultant => "consultant",
            Self::SuggestionsParticipants => "participants",
        }
    }

    /// The family the field belongs to.
    #[must_use]
    pub const fn family(self) -> FieldFamily {
        match self {
            Self::ProgramTitle
            | Self::ProgramDate
            | Self::ProgramLocation
            | Self::ProgramOrganizer
            | Self::ProgramObjectives
            | Self::ProgramDuration => FieldFamily::ProgramInfo,
            Self::ParticipantName
            | Self::ParticipantOrganization
            | Self::ParticipantPosition
            | Self::ParticipantScore => FieldFamily::Participants,
            Self::Day | Self::Time | Self::Activity | Self::Description | Self::Handler => {
                FieldFamily::Tentative
            }
            Self::Metric => FieldFamily::Evaluation,
            Self::AttendanceInvited | Self::AttendanceAttended | Self::AttendanceAbsent => {
                FieldFamily::Attendance
            }
            Self::SuggestionsConsultant | Self::SuggestionsParticipants => {
                FieldFamily::Suggestions
            }
        }
    }

    /// Stable display name, used in error messages.
    #[must_use]
    pub fn display_name(self) -> String {
        format!("{self:?}")
    }
}

/// One dictionary entry: a canonical field and its recognized spellings.
#[derive(Debug, Clone)]
pub struct DictionaryEntry {
    /// The canonical field.
    pub field: CanonicalField,
    /// Normalized (lowercased, trimmed) aliases.
    aliases: Vec<String>,
}

impl DictionaryEntry {
    /// Build an entry, normalizing every alias.
    #[must_use]
    pub fn new(field: CanonicalField, aliases: &[&str]) -> Self {
        Self {
            field,
            aliases: aliases.iter().map(|a| normalize(a)).collect(),
        }
    }

    fn matches(&self, normalized_header: &str) -> bool {
        self.aliases.iter().any(|a| a == normalized_header)
    }
}

/// Normalize header/alias text for comparison: trim surrounding
/// whitespace, lowercase.
#[must_use]
pub fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Static mapping from canonical field to recognized header aliases.
#[derive(Debug, Clone)]
pub struct SynonymDictionary {
    entries: Vec<DictionaryEntry>,
}

impl SynonymDictionary {
    /// Build a dictionary from entries, enforcing alias-set disjointness.
    ///
    /// # Errors
    ///
    /// [`LaporanError::AmbiguousHeaderMapping`] when two entries share an
    /// alias.
    pub fn new(entries: Vec<DictionaryEntry>) -> Result<Self> {
        let dictionary = Self { entries };
        dictionary.validate()?;
        Ok(dictionary)
    }

    /// Build a dictionary without the disjointness check.
    ///
    /// Lookups still detect overlap, so a conflicting table fails at first
    /// use instead of construction. Intended for configuration loaded from
    /// external sources where construction-time validation is handled by
    /// the caller.
    #[must_use]
    pub fn from_entries_unchecked(entries: Vec<DictionaryEntry>) -> Self {
        Self { entries }
    }

    /// The builtin bilingual (English/Malay) table used by the default
    /// mapper.
    #[must_use]
    pub fn builtin() -> Self {
        use CanonicalField as F;
        Self {
            entries: vec![
                DictionaryEntry::new(
                    F::ProgramTitle,
                    &[
                        "title",
                        "program title",
                        "course title",
                        "tajuk",
                        "tajuk program",
                        "tajuk kursus",
                        "nama program",
                        "nama kursus",
                    ],
                ),
                DictionaryEntry::new(
                    F::ProgramDate,
                    &["date", "program date", "tarikh", "tarikh program"],
                ),
                DictionaryEntry::new(
                    F::ProgramLocation,
                    &["location", "venue", "place", "tempat", "lokasi"],
                ),
                DictionaryEntry::new(
                    F::ProgramOrganizer,
                    &["organizer", "organiser", "penganjur", "anjuran"],
                ),
                DictionaryEntry::new(
                    F::ProgramObjectives,
                    &["objective", "objectives", "objektif"],
                ),
                DictionaryEntry::new(
                    F::ProgramDuration,
                    &["duration", "days", "tempoh", "bilangan hari"],
                ),
                DictionaryEntry::new(
                    F::ParticipantName,
                    &[
                        "name",
                        "participant name",
                        "full name",
                        "nama",
                        "nama peserta",
                        "nama penuh",
                    ],
                ),
                DictionaryEntry::new(
                    F::ParticipantOrganization,
                    &[
                        "organization",
                        "organisation",
                        "agency",
                        "department",
                        "organisasi",
                        "agensi",
                        "jabatan",
                    ],
                ),
                DictionaryEntry::new(
                    F::ParticipantPosition,
                    &["position", "designation", "jawatan", "gred"],
                ),
                DictionaryEntry::new(
                    F::ParticipantScore,
                    &["score", "marks", "markah", "skor"],
                ),
                DictionaryEntry::new(F::Day, &["day", "hari"]),
                DictionaryEntry::new(F::Time, &["time", "masa"]),
                DictionaryEntry::new(
                    F::Activity,
                    &["activity", "agenda", "aktiviti", "perkara", "slot"],
                ),
                DictionaryEntry::new(
                    F::Description,
                    &["description", "details", "keterangan", "butiran", "penerangan"],
                ),
                DictionaryEntry::new(
                    F::Handler,
                    &[
                        "handler",
                        "facilitator",
                        "speaker",
                        "trainer",
                        "pengendali",
                        "penceramah",
                        "fasilitator",
                        "urus setia",
                    ],
                ),
                DictionaryEntry::new(
                    F::Metric,
                    &["metric", "item", "aspect", "criteria", "aspek", "kriteria", "penilaian"],
                ),
                DictionaryEntry::new(
                    F::AttendanceInvited,
                    &["invited", "dijemput", "jumlah dijemput"],
                ),
                DictionaryEntry::new(
                    F::AttendanceAttended,
                    &["attended", "present", "hadir", "jumlah hadir", "kehadiran"],
                ),
                DictionaryEntry::new(F::AttendanceAbsent, &["absent", "tidak hadir"]),
                DictionaryEntry::new(
                    F::SuggestionsConsultant,
                    &[
                        "consultant suggestions",
                        "consultant comments",
                        "cadangan penceramah",
                        "ulasan penceramah",
                        "komen penceramah",
                    ],
                ),
                DictionaryEntry::new(
                    F::SuggestionsParticipants,
                    &[
                        "suggestions",
                        "comments",
                        "participant suggestions",
                        "cadangan",
                        "cadangan peserta",
                        "ulasan peserta",
                        "komen",
                    ],
                ),
            ],
        }
    }

    /// Resolve a header to its canonical field.
    ///
    /// Matching is exact on the normalized text. Exactly one entry may
    /// match; none is `Ok(None)` (the column lands in the unmapped
    /// bucket).
    ///
    /// # Errors
    ///
    /// [`LaporanError::AmbiguousHeaderMapping`] when two entries claim the
    /// header. The dictionary invariant is supposed to prevent this;
    /// hitting it means a misconfigured alias table.
    pub fn lookup(&self, header: &str) -> Result<Option<CanonicalField>> {
        let normalized = normalize(header);
        if normalized.is_empty() {
            return Ok(None);
        }

        let mut found: Option<CanonicalField> = None;
        for entry in &self.entries {
            if entry.matches(&normalized) {
                if let Some(first) = found {
                    return Err(LaporanError::AmbiguousHeaderMapping {
                        header: header.trim().to_string(),
                        first: first.display_name(),
                        second: entry.field.display_name(),
                    });
                }
                found = Some(entry.field);
            }
        }
        Ok(found)
    }

    /// Verify alias-set disjointness across all entries.
    ///
    /// # Errors
    ///
    /// [`LaporanError::AmbiguousHeaderMapping`] naming the first shared
    /// alias found.
    pub fn validate(&self) -> Result<()> {
        for (i, entry) in self.entries.iter().enumerate() {
            for other in &self.entries[i + 1..] {
                if let Some(shared) = entry.aliases.iter().find(|a| other.matches(a)) {
                    return Err(LaporanError::AmbiguousHeaderMapping {
                        header: shared.clone(),
                        first: entry.field.display_name(),
                        second: other.field.display_name(),
                    });
                }
            }
        }
        Ok(())
    }
}

impl Default for SynonymDictionary {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_dictionary_is_disjoint() {
        SynonymDictionary::builtin()
            .validate()
            .expect("builtin alias sets must not overlap");
    }

    #[test]
    fn test_lookup_is_case_insensitive_and_trimmed() {
        let dict = SynonymDictionary::builtin();
        assert_eq!(
            dict.lookup("  NAMA Peserta ").unwrap(),
            Some(CanonicalField::ParticipantName)
        );
        assert_eq!(
            dict.lookup("Tempat").unwrap(),
            Some(CanonicalField::ProgramLocation)
        );
        assert_eq!(dict.lookup("Jumlah Kenderaan").unwrap(), None);
    }

    #[test]
    fn test_bilingual_aliases_resolve_to_one_field() {
        let dict = SynonymDictionary::builtin();
        assert_eq!(
            dict.lookup("Objektif").unwrap(),
            dict.lookup("Objectives").unwrap()
        );
    }

    #[test]
    fn test_new_rejects_overlapping_aliases() {
        let entries = vec![
            DictionaryEntry::new(CanonicalField::ProgramDate, &["Date"]),
            DictionaryEntry::new(CanonicalField::Day, &["date"]),
        ];
        let err = SynonymDictionary::new(entries).unwrap_err();
        match err {
            laporan_core::LaporanError::AmbiguousHeaderMapping { header, .. } => {
                assert_eq!(header, "date");
            }
            other => panic!("expected AmbiguousHeaderMapping, got {other}"),
        }
    }

    #[test]
    fn test_unchecked_dictionary_fails_at_lookup() {
        let entries = vec![
            DictionaryEntry::new(CanonicalField::ProgramDate, &["Date"]),
            DictionaryEntry::new(CanonicalField::Day, &["Date"]),
        ];
        let dict = SynonymDictionary::from_entries_unchecked(entries);
        assert!(dict.lookup("Date").is_err());
        // Non-conflicting lookups still work.
        assert!(dict.lookup("Time").unwrap().is_none());
    }

    #[test]
    fn test_empty_header_never_matches() {
        let dict = SynonymDictionary::builtin();
        assert_eq!(dict.lookup("   ").unwrap(), None);
    }
}
