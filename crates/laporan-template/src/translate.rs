//! Section-markup to control-tag translation.
//!
//! Rewrites `{{#name}}…{{/name}}` section blocks into
//! `{% for … %}…{% endfor %}` loops so one renderer executes both markup
//! families. Mixed documents are handled by rewriting only the section
//! spans; existing `{% … %}` tags pass through as plain text.
//!
//! ## Loop-variable discipline
//!
//! Source templates are inconsistent about how a section body refers to
//! the current element: sometimes the bare field name, sometimes a fixed
//! `item` alias, sometimes the section name itself. The translator
//! assigns one loop variable per nesting level (`item`, `item2`, …) and
//! rewrites every interior reference to it:
//!
//! - `{{field}}` becomes `{{ item.field }}` (the innermost loop wins:
//!   inner bindings shadow outer ones);
//! - `{{item.field}}`, `{{this.field}}` and `{{<section>.field}}` are
//!   normalized to the generated variable of the loop they refer to;
//! - any other qualified reference (`{{program.title}}`) is left alone and
//!   resolves against the outer context at render time.
//!
//! Unbalanced section markers abort translation: a half-translated
//! document is worse than a rejected one.

use laporan_core::{LaporanError, Result};
use once_cell::sync::Lazy;
use regex::Regex;

/// Matches section markers and expressions alike: group 1 is the optional
/// `#`/`/` marker, group 2 the dotted name.
static TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{\{\s*([#/]?)\s*([A-Za-z_][A-Za-z0-9_.]*)\s*\}\}").expect("static regex")
});

/// Generic aliases templates use for "the current element".
const LOOP_ALIASES: [&str; 2] = ["item", "this"];

/// Parsed template structure, section markers resolved into a tree.
#[derive(Debug)]
enum Node {
    /// Raw text, including any `{% … %}` spans of mixed documents.
    Text(String),
    /// An interpolation expression.
    Expr { raw: String, path: String },
    /// A section block and its body.
    Section { name: String, children: Vec<Node> },
}

/// Rewrite all section markup in `text` into control-tag markup.
///
/// Text without section markers passes through unchanged (modulo nothing:
/// expressions outside sections keep their original spelling), so the
/// translation is safe to apply to any template regardless of detected
/// dialect.
///
/// # Errors
///
/// [`LaporanError::UnbalancedSectionTags`] when a section opens without a
/// matching close, closes without an open, or closes in the wrong order.
pub fn translate(text: &str) -> Result<String> {
    let nodes = parse(text)?;
    let mut out = String::with_capacity(text.len() + 32);
    let mut scopes = Vec::new();
    emit(&nodes, &mut scopes, &mut out);
    Ok(out)
}

fn parse(text: &str) -> Result<Vec<Node>> {
    // Stack frame: open section name, its byte offset, the parent's
    // accumulated children.
    let mut stack: Vec<(String, usize, Vec<Node>)> = Vec::new();
    let mut current: Vec<Node> = Vec::new();
    let mut last = 0;

    for caps in TOKEN.captures_iter(text) {
        let Some(whole) = caps.get(0) else { continue };
        if whole.start() > last {
            current.push(Node::Text(text[last..whole.start()].to_string()));
        }
        let marker = caps.get(1).map_or("", |g| g.as_str());
        let name = caps
            .get(2)
            .map_or_else(String::new, |g| g.as_str().to_string());

        match marker {
            "#" => {
                stack.push((name, whole.start(), std::mem::take(&mut current)));
            }
            "/" => {
                let Some((open_name, _, parent)) = stack.pop() else {
                    return Err(LaporanError::UnbalancedSectionTags {
                        tag: whole.as_str().to_string(),
                        offset: whole.start(),
                    });
                };
                if open_name != name {
                    return Err(LaporanError::UnbalancedSectionTags {
                        tag: whole.as_str().to_string(),
                        offset: whole.start(),
                    });
                }
                let children = std::mem::replace(&mut current, parent);
                current.push(Node::Section { name, children });
            }
            _ => {
                current.push(Node::Expr {
                    raw: whole.as_str().to_string(),
                    path: name,
                });
            }
        }
        last = whole.end();
    }

    if let Some((open_name, open_offset, _)) = stack.pop() {
        return Err(LaporanError::UnbalancedSectionTags {
            tag: format!("{{{{#{open_name}}}}}"),
            offset: open_offset,
        });
    }
    if last < text.len() {
        current.push(Node::Text(text[last..].to_string()));
    }
    Ok(current)
}

/// Loop variable for a nesting depth (1-based): `item`, `item2`, `item3`.
fn loop_var(depth: usize) -> String {
    if depth == 1 {
        "item".to_string()
    } else {
        format!("item{depth}")
    }
}

fn emit(nodes: &[Node], scopes: &mut Vec<(String, String)>, out: &mut String) {
    for node in nodes {
        match node {
            Node::Text(text) => out.push_str(text),
            Node::Expr { raw, path } => {
                if scopes.is_empty() {
                    // Expressions outside any section keep their original
                    // spelling; mixed documents stay byte-stable outside
                    // the rewritten spans.
                    out.push_str(raw);
                } else {
                    let rewritten = rewrite_path(path, scopes);
                    out.push_str("{{ ");
                    out.push_str(&rewritten);
                    out.push_str(" }}");
                }
            }
            Node::Section { name, children } => {
                let collection = if scopes.is_empty() {
                    name.clone()
                } else {
                    // Nested sections iterate a field of the enclosing
                    // element unless they qualify an outer path.
                    rewrite_path(name, scopes)
                };
                let var = loop_var(scopes.len() + 1);
                out.push_str("{% for ");
                out.push_str(&var);
                out.push_str(" in ");
                out.push_str(&collection);
                out.push_str(" %}");
                scopes.push((name.clone(), var));
                emit(children, scopes, out);
                scopes.pop();
                out.push_str("{% endfor %}");
            }
        }
    }
}

/// Rewrite one dotted reference against the enclosing loop scopes
/// (innermost last).
fn rewrite_path(path: &str, scopes: &[(String, String)]) -> String {
    let (first, rest) = path
        .split_once('.')
        .map_or((path, None), |(head, tail)| (head, Some(tail)));

    let join = |var: &str, rest: Option<&str>| match rest {
        Some(rest) => format!("{var}.{rest}"),
        None => var.to_string(),
    };

    // Generic aliases always mean the innermost element.
    if LOOP_ALIASES.contains(&first) {
        if let Some((_, var)) = scopes.last() {
            return join(var, rest);
        }
    }

    // A reference qualified by a section name (or by an already-generated
    // variable) binds to that level, innermost first.
    for (name, var) in scopes.iter().rev() {
        if first == name || first == var {
            return join(var, rest);
        }
    }

    // Bare field references bind to the innermost element.
    if rest.is_none() {
        if let Some((_, var)) = scopes.last() {
            return format!("{var}.{path}");
        }
    }

    // Anything else is an outer-context path, untouched.
    path.to_string()
}
