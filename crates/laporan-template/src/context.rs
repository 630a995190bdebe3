//! Render context construction.
//!
//! The canonical model addresses its data through dotted keys
//! (`program.title`, `attendance.present`). Before rendering, every dotted
//! key is split into nested mappings and merged into one tree, so
//! `program.title` and `program.date` end up under a single `program`
//! node. List-typed values stay as ordered sequences of (possibly nested)
//! mappings. The tree is immutable once built.

use laporan_core::DocumentModel;
use serde_json::{Map, Value};

/// Build the render context for a mapped model.
#[must_use]
pub fn build_context(model: &DocumentModel) -> Value {
    nest(model.to_dotted_pairs())
}

/// Nest dotted key/value pairs into one JSON tree, merging overlapping
/// prefixes.
#[must_use]
pub fn nest<I>(pairs: I) -> Value
where
    I: IntoIterator<Item = (String, Value)>,
{
    let mut root = Map::new();
    for (key, value) in pairs {
        insert_path(&mut root, &key, value);
    }
    Value::Object(root)
}

fn insert_path(map: &mut Map<String, Value>, key: &str, value: Value) {
    match key.split_once('.') {
        None => match map.get_mut(key) {
            Some(Value::Object(existing)) => {
                if let Value::Object(incoming) = value {
                    // Overlapping prefix: merge key by key.
                    for (k, v) in incoming {
                        insert_path(existing, &k, v);
                    }
                } else {
                    log::warn!("context key {key:?} redefined from mapping to scalar");
                    map.insert(key.to_string(), value);
                }
            }
            Some(existing) => {
                log::warn!("context key {key:?} redefined");
                *existing = value;
            }
            None => {
                map.insert(key.to_string(), value);
            }
        },
        Some((head, rest)) => {
            let entry = map
                .entry(head.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !entry.is_object() {
                log::warn!("context key {head:?} redefined from scalar to mapping");
                *entry = Value::Object(Map::new());
            }
            if let Some(child) = entry.as_object_mut() {
                insert_path(child, rest, value);
            }
        }
    }
}
