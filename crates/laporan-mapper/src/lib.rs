//! # laporan-mapper - canonical field mapping
//!
//! Turns the scanner's [`Table`](laporan_backend::Table)s into the
//! canonical [`DocumentModel`](laporan_core::DocumentModel) using a
//! localization-aware [`SynonymDictionary`].
//!
//! The dictionary is an explicit, testable value: every recognized header
//! spelling (English and Malay) lives in one table, matching is
//! case-insensitive on trimmed text, and alias sets of distinct fields
//! must be disjoint. An overlap is surfaced as a fatal
//! `AmbiguousHeaderMapping` instead of being resolved by a heuristic.
//!
//! Missing data never fails the mapper: unmatched headers land in the
//! model's `unmapped` bucket, irregular cells become `warnings`, and a
//! workbook with no recognizable tables maps to an empty-but-valid model.

pub mod dictionary;
pub mod mapper;

pub use dictionary::{
    normalize, CanonicalField, DictionaryEntry, FieldFamily, SynonymDictionary,
};
pub use mapper::FieldMapper;
