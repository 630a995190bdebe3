//! Template dialect detection.
//!
//! Report templates arrive in one of two incompatible markup families:
//!
//! - **section markup**: paired `{{#name}}…{{/name}}` markers denote loops
//!   and conditional blocks, with bare `{{ expr }}` interpolation and no
//!   control-flow keywords;
//! - **control-tag markup**: explicit `{% for … %}`/`{% endfor %}` and
//!   `{% if … %}`/`{% endif %}` tags plus `{{ expr }}` interpolation.
//!
//! The renderer executes control-tag markup only, so section markup (and
//! the section spans of mixed documents) is rewritten first by
//! [`translate`](crate::translate::translate).

use once_cell::sync::Lazy;
use regex::Regex;

/// Matches `{{#name}}` and `{{/name}}` section markers.
static SECTION_MARKER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{\{\s*[#/]\s*[A-Za-z_][A-Za-z0-9_.]*\s*\}\}").expect("static regex")
});

/// Matches `{% … %}` control tags.
static CONTROL_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)\{%.*?%\}").expect("static regex"));

/// The markup family a template uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dialect {
    /// Section markers only (`{{#name}}…{{/name}}`).
    Sections,
    /// Control tags only (`{% for %}`, `{% if %}`).
    ControlTags,
    /// Both families co-occur in one document.
    Mixed,
    /// Neither family; at most bare `{{ expr }}` interpolation.
    Plain,
}

/// A template together with its detected dialect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateSource {
    /// The template text as received.
    pub raw_text: String,
    /// Result of [`detect`] on `raw_text`.
    pub detected_dialect: Dialect,
}

impl TemplateSource {
    /// Detect the dialect of `text` and wrap it.
    #[must_use]
    pub fn analyze(text: &str) -> Self {
        Self {
            raw_text: text.to_string(),
            detected_dialect: detect(text),
        }
    }
}

/// Classify a template by counting occurrences of each tag family.
#[must_use]
pub fn detect(text: &str) -> Dialect {
    let sections = SECTION_MARKER.find_iter(text).count();
    let controls = CONTROL_TAG.find_iter(text).count();

    match (sections > 0, controls > 0) {
        (true, true) => Dialect::Mixed,
        (true, false) => Dialect::Sections,
        (false, true) => Dialect::ControlTags,
        (false, false) => Dialect::Plain,
    }
}
