//! # laporan-template - dialect translation and rendering
//!
//! Report templates come in two incompatible markup families (section
//! markers vs. explicit control tags). This crate detects which family a
//! template uses ([`detect`]), rewrites section markup into control-tag
//! markup ([`translate`]) with a consistent loop-variable discipline, and
//! renders the normalized template against the canonical model
//! ([`render`]).
//!
//! Rendering never fails on missing data: unresolved paths keep their tag
//! text in the output and come back as [`UnresolvedReference`]
//! diagnostics. The only fatal template condition is unbalanced
//! section/control tags.
//!
//! ```rust
//! use laporan_template::{translate, render_with_context};
//! use serde_json::json;
//!
//! let normalized = translate("{{#items}}{{name}}{{/items}}")?;
//! let context = json!({"items": [{"name": "X"}, {"name": "Y"}]});
//! let (out, unresolved) = render_with_context(&normalized, &context)?;
//! assert_eq!(out, "XY");
//! assert!(unresolved.is_empty());
//! # Ok::<(), laporan_core::LaporanError>(())
//! ```

pub mod context;
pub mod dialect;
pub mod render;
pub mod translate;

pub use context::{build_context, nest};
pub use dialect::{detect, Dialect, TemplateSource};
pub use render::{render, render_with_context, UnresolvedReference};
pub use translate::translate;
