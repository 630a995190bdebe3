//! Context renderer.
//!
//! Evaluates a normalized (control-tag) template against the render
//! context built from a canonical model. The supported tag set is the
//! minimal one the report templates need: `{{ dotted.path }}`
//! interpolation, `{% for var in path %}…{% endfor %}` loops, and
//! `{% if path %}…{% endif %}` guards.
//!
//! ## Undefined references
//!
//! A path that does not resolve neither raises nor becomes an empty
//! string. The original tag text is emitted verbatim into the output and
//! an [`UnresolvedReference`] is recorded, so a human reviewing the
//! generated report sees exactly which placeholder failed while still
//! getting a complete document. Callers wanting strict behavior fail on a
//! non-empty diagnostics list themselves.

use crate::context::build_context;
use laporan_core::{DocumentModel, LaporanError, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use serde_json::Value;

/// Matches any tag: a control tag or an interpolation expression.
static TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)\{%.*?%\}|\{\{\s*[A-Za-z_][A-Za-z0-9_.]*\s*\}\}").expect("static regex")
});

static FOR_TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\{%\s*for\s+([A-Za-z_][A-Za-z0-9_]*)\s+in\s+([A-Za-z_][A-Za-z0-9_.]*)\s*%\}$")
        .expect("static regex")
});
static ENDFOR_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\{%\s*endfor\s*%\}$").expect("static regex"));
static IF_TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\{%\s*if\s+([A-Za-z_][A-Za-z0-9_.]*)\s*%\}$").expect("static regex")
});
static ENDIF_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\{%\s*endif\s*%\}$").expect("static regex"));
static EXPR_TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\{\{\s*([A-Za-z_][A-Za-z0-9_.]*)\s*\}\}$").expect("static regex")
});

/// An expression the renderer could not resolve against the context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnresolvedReference {
    /// The dotted path as written in the template.
    pub path: String,
    /// Byte offset of the tag in the template.
    pub offset: usize,
    /// 1-based line of the tag in the template.
    pub line: usize,
}

/// Parsed template node.
#[derive(Debug)]
enum Node {
    Text(String),
    Expr {
        raw: String,
        path: String,
        offset: usize,
    },
    For {
        var: String,
        path: String,
        offset: usize,
        body: Vec<Node>,
    },
    If {
        path: String,
        body: Vec<Node>,
    },
}

/// Open block while parsing.
enum OpenBlock {
    For {
        var: String,
        path: String,
        offset: usize,
        tag: String,
    },
    If {
        path: String,
        offset: usize,
        tag: String,
    },
}

/// Render a template against a mapped model.
///
/// The context tree is built from the model's dotted keys (see
/// [`build_context`]); the template must already be in control-tag form
/// (run [`translate`](crate::translate::translate) first when in doubt).
///
/// # Errors
///
/// [`LaporanError::UnbalancedSectionTags`] for mismatched
/// `for`/`endfor` or `if`/`endif` tags. Unresolved paths are not errors;
/// they come back in the diagnostics list.
pub fn render(template: &str, model: &DocumentModel) -> Result<(String, Vec<UnresolvedReference>)> {
    let context = build_context(model);
    render_with_context(template, &context)
}

/// Render a template against a pre-built context tree.
///
/// # Errors
///
/// Same as [`render`].
pub fn render_with_context(
    template: &str,
    context: &Value,
) -> Result<(String, Vec<UnresolvedReference>)> {
    let nodes = parse(template)?;
    let mut out = String::with_capacity(template.len());
    let mut unresolved = Vec::new();
    let mut frames = Vec::new();
    eval(
        &nodes,
        context,
        &mut frames,
        &mut out,
        &mut unresolved,
        template,
    );
    Ok((out, unresolved))
}

fn parse(template: &str) -> Result<Vec<Node>> {
    let mut stack: Vec<(OpenBlock, Vec<Node>)> = Vec::new();
    let mut current: Vec<Node> = Vec::new();
    let mut last = 0;

    for found in TAG.find_iter(template) {
        if found.start() > last {
            current.push(Node::Text(template[last..found.start()].to_string()));
        }
        let tag = found.as_str();
        let offset = found.start();

        if let Some(caps) = FOR_TAG.captures(tag) {
            stack.push((
                OpenBlock::For {
                    var: caps[1].to_string(),
                    path: caps[2].to_string(),
                    offset,
                    tag: tag.to_string(),
                },
                std::mem::take(&mut current),
            ));
        } else if let Some(caps) = IF_TAG.captures(tag) {
            stack.push((
                OpenBlock::If {
                    path: caps[1].to_string(),
                    offset,
                    tag: tag.to_string(),
                },
                std::mem::take(&mut current),
            ));
        } else if ENDFOR_TAG.is_match(tag) {
            match stack.pop() {
                Some((
                    OpenBlock::For {
                        var,
                        path,
                        offset: open_offset,
                        ..
                    },
                    parent,
                )) => {
                    let body = std::mem::replace(&mut current, parent);
                    current.push(Node::For {
                        var,
                        path,
                        offset: open_offset,
                        body,
                    });
                }
                _ => {
                    return Err(LaporanError::UnbalancedSectionTags {
                        tag: tag.to_string(),
                        offset,
                    });
                }
            }
        } else if ENDIF_TAG.is_match(tag) {
            match stack.pop() {
                Some((OpenBlock::If { path, .. }, parent)) => {
                    let body = std::mem::replace(&mut current, parent);
                    current.push(Node::If { path, body });
                }
                _ => {
                    return Err(LaporanError::UnbalancedSectionTags {
                        tag: tag.to_string(),
                        offset,
                    });
                }
            }
        } else if let Some(caps) = EXPR_TAG.captures(tag) {
            current.push(Node::Expr {
                raw: tag.to_string(),
                path: caps[1].to_string(),
                offset,
            });
        } else {
            // Tags outside the supported subset pass through as text.
            current.push(Node::Text(tag.to_string()));
        }
        last = found.end();
    }

    if let Some((open, _)) = stack.pop() {
        let (tag, offset) = match open {
            OpenBlock::For { tag, offset, .. } | OpenBlock::If { tag, offset, .. } => {
                (tag, offset)
            }
        };
        return Err(LaporanError::UnbalancedSectionTags { tag, offset });
    }
    if last < template.len() {
        current.push(Node::Text(template[last..].to_string()));
    }
    Ok(current)
}

fn eval<'a>(
    nodes: &[Node],
    context: &'a Value,
    frames: &mut Vec<(String, &'a Value)>,
    out: &mut String,
    unresolved: &mut Vec<UnresolvedReference>,
    template: &str,
) {
    for node in nodes {
        match node {
            Node::Text(text) => out.push_str(text),
            Node::Expr { raw, path, offset } => match resolve(path, context, frames) {
                Some(value) => out.push_str(&value_text(value)),
                None => {
                    out.push_str(raw);
                    unresolved.push(UnresolvedReference {
                        path: path.clone(),
                        offset: *offset,
                        line: line_of(template, *offset),
                    });
                }
            },
            Node::For {
                var,
                path,
                offset,
                body,
            } => match resolve(path, context, frames) {
                Some(Value::Array(items)) => {
                    for item in items {
                        frames.push((var.clone(), item));
                        eval(body, context, frames, out, unresolved, template);
                        frames.pop();
                    }
                }
                Some(value) if truthy(value) => {
                    // Section semantics: a truthy non-list iterates once
                    // with the value bound.
                    frames.push((var.clone(), value));
                    eval(body, context, frames, out, unresolved, template);
                    frames.pop();
                }
                Some(_) => {}
                None => {
                    // Zero iterations, recorded once: visible in the
                    // diagnostics rather than in the artifact.
                    unresolved.push(UnresolvedReference {
                        path: path.clone(),
                        offset: *offset,
                        line: line_of(template, *offset),
                    });
                }
            },
            Node::If { path, body } => {
                // Guards probe optional data; a missing path is plain
                // falsy, not a diagnostic.
                if resolve(path, context, frames).is_some_and(truthy) {
                    eval(body, context, frames, out, unresolved, template);
                }
            }
        }
    }
}

/// Resolve a dotted path: the first segment is looked up in the loop
/// frames innermost-first, then in the context root; the rest descends
/// through mappings.
fn resolve<'a>(
    path: &str,
    context: &'a Value,
    frames: &[(String, &'a Value)],
) -> Option<&'a Value> {
    let mut segments = path.split('.');
    let first = segments.next()?;

    let mut current = match frames.iter().rev().find(|(name, _)| name == first) {
        Some((_, value)) => *value,
        None => context.as_object()?.get(first)?,
    };
    for segment in segments {
        current = current.as_object()?.get(segment)?;
    }
    Some(current)
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// Output text for a resolved value. Whole numbers print without a
/// trailing `.0`; collections print as compact JSON.
fn value_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.as_f64().map_or_else(
            || n.to_string(),
            |f| {
                if f.fract() == 0.0 && f.abs() < 1e15 {
                    format!("{f:.0}")
                } else {
                    f.to_string()
                }
            },
        ),
        Value::String(s) => s.clone(),
        other => serde_json::to_string(other).unwrap_or_default(),
    }
}

fn line_of(template: &str, offset: usize) -> usize {
    template[..offset].bytes().filter(|b| *b == b'\n').count() + 1
}
