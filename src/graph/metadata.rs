//! Typed inspection of entry metadata.
//!
//! Parent links and output markers are found by walking the parsed JSON
//! document rather than pattern-matching its string rendering. Malformed
//! structures yield empty results, never errors.

use serde_json::{Map, Value};

use super::entry::Entry;

/// Key under which an entry lists its parents
pub const PARENT_ENTRIES_KEY: &str = "_parent_entries";
/// Marker of a reference-by-name call, e.g. `["^", "byname", "base_entry"]`
pub const BYNAME_MARKER: &str = "byname";

/// One parent link of an entry
#[derive(Debug, Clone, PartialEq)]
pub enum ParentRef {
    /// Reference to another entry by name
    ByName(String),
    /// Entry object embedded directly in the metadata
    Inline(String, Map<String, Value>),
}

/// Interpret a `["^", "byname", <name>, ...]` call list.
pub fn byname_call(value: &Value) -> Option<&str> {
    let items = value.as_array()?;
    match (items.first(), items.get(1), items.get(2)) {
        (Some(Value::String(caret)), Some(Value::String(op)), Some(Value::String(name)))
            if caret == "^" && op == BYNAME_MARKER =>
        {
            Some(name.as_str())
        }
        _ => None,
    }
}

/// Parent links of a `_parent_entries` value.
///
/// Accepted element shapes: a bare name string, a byname call list, or an
/// inline entry object carrying a `name` field. Anything else is dropped.
pub fn parent_refs(value: &Value) -> Vec<ParentRef> {
    let Some(items) = value.as_array() else {
        return Vec::new();
    };

    items
        .iter()
        .filter_map(|item| match item {
            Value::String(name) => Some(ParentRef::ByName(name.clone())),
            Value::Array(_) => byname_call(item).map(|name| ParentRef::ByName(name.to_string())),
            Value::Object(obj) => {
                let name = obj.get("name")?.as_str()?;
                Some(ParentRef::Inline(name.to_string(), obj.clone()))
            }
            _ => None,
        })
        .collect()
}

/// Whether a value contains `marker` anywhere: as an object key, or as the
/// first element of a list.
pub fn contains_marker(value: &Value, marker: &str) -> bool {
    match value {
        Value::Object(obj) => {
            obj.contains_key(marker) || obj.values().any(|v| contains_marker(v, marker))
        }
        Value::Array(items) => {
            let head_matches = matches!(items.first(), Some(Value::String(s)) if s == marker);
            head_matches || items.iter().any(|v| contains_marker(v, marker))
        }
        _ => false,
    }
}

/// Collect every byname reference reachable inside a value.
pub fn byname_names(value: &Value) -> Vec<String> {
    let mut names = Vec::new();
    collect_byname(value, &mut names);
    names
}

fn collect_byname(value: &Value, names: &mut Vec<String>) {
    if let Some(name) = byname_call(value) {
        names.push(name.to_string());
        return;
    }

    match value {
        Value::Object(obj) => {
            for v in obj.values() {
                collect_byname(v, names);
            }
        }
        Value::Array(items) => {
            for item in items {
                collect_byname(item, names);
            }
        }
        _ => {}
    }
}

/// Names listed in an `output_entry_parents` value: elements that are lists
/// containing a `byname` tag followed by a name.
pub fn extract_byname_entries(value: &Value) -> Vec<String> {
    let Some(items) = value.as_array() else {
        return Vec::new();
    };

    items
        .iter()
        .filter_map(|item| {
            let list = item.as_array()?;
            let tag_pos = list
                .iter()
                .position(|v| matches!(v, Value::String(s) if s == BYNAME_MARKER))?;
            list.get(tag_pos + 1)?.as_str().map(str::to_string)
        })
        .collect()
}

/// Output-linkage signals found in a target entry's metadata.
#[derive(Debug, Clone, Default)]
pub struct OutputSignals {
    /// Whether the graph needs a synthetic output node
    pub output: bool,
    /// Value carrying a nested parent-entries structure, when one was found
    pub parent_data: Option<Value>,
    /// Names from a non-empty `output_entry_parents` list
    pub entry_parents: Vec<String>,
}

/// Scan a target entry for output linkage.
///
/// Signals, in the order they are checked per value: a nested
/// `_parent_entries` structure (captured), a `tags` field on the entry, or a
/// non-empty `output_entry_parents` list.
pub fn scan_output_signals(entry: &Entry) -> OutputSignals {
    let mut signals = OutputSignals::default();

    signals.entry_parents = entry
        .get("output_entry_parents")
        .map(extract_byname_entries)
        .unwrap_or_default();

    for (key, value) in entry.own_data() {
        if contains_marker(value, PARENT_ENTRIES_KEY) {
            signals.output = true;
            if signals.parent_data.is_none() {
                signals.parent_data = Some(value.clone());
            }
        } else if key == "tags" || !signals.entry_parents.is_empty() {
            signals.output = true;
        }
    }

    signals
}

/// Output-ancestor names of an entry, resolved from its `output_file_path`
/// and `output_entry` values.
pub fn output_parent_names(entry: &Entry) -> Vec<String> {
    let mut names = Vec::new();
    for key in ["output_file_path", "output_entry"] {
        if let Some(value) = entry.get(key) {
            names.extend(byname_names(value));
        }
    }
    names
}
