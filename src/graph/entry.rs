//! Entries and entry resolution.
//!
//! An entry is a named unit of metadata produced by the workflow system: a
//! directory holding a `data_axs.json` document. This crate only reads
//! entries; their lifecycle belongs to the system that created them.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use tracing::debug;

/// Metadata file name inside every entry directory
pub const ENTRY_DATA_FILE: &str = "data_axs.json";

/// A resolved entry: its name, its on-disk location (inline entries have
/// none), and its parsed metadata document.
#[derive(Debug, Clone)]
pub struct Entry {
    name: String,
    path: Option<PathBuf>,
    data: Map<String, Value>,
}

impl Entry {
    pub fn new(name: String, path: Option<PathBuf>, data: Map<String, Value>) -> Self {
        Self { name, path, data }
    }

    /// Entry defined inline in another entry's metadata
    pub fn inline(name: String, data: Map<String, Value>) -> Self {
        Self::new(name, None, data)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// The full metadata document
    pub fn own_data(&self) -> &Map<String, Value> {
        &self.data
    }

    /// A single metadata value by key
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }
}

/// Resolution of entry names to entries.
pub trait EntryResolver {
    /// Look up an entry by name. `None` when the name does not resolve or
    /// its metadata cannot be read.
    fn byname(&self, name: &str) -> Option<Entry>;
}

/// Directory-backed catalog: entry `<name>` lives at
/// `<root>/<name>/data_axs.json`.
#[derive(Debug, Clone)]
pub struct DirCatalog {
    root: PathBuf,
}

impl DirCatalog {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn entry_dir(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }
}

impl EntryResolver for DirCatalog {
    fn byname(&self, name: &str) -> Option<Entry> {
        let dir = self.entry_dir(name);
        let data_path = dir.join(ENTRY_DATA_FILE);

        let content = match fs::read_to_string(&data_path) {
            Ok(content) => content,
            Err(e) => {
                debug!("Cannot read {}: {}", data_path.display(), e);
                return None;
            }
        };

        match serde_json::from_str::<Value>(&content) {
            Ok(Value::Object(data)) => Some(Entry::new(name.to_string(), Some(dir), data)),
            Ok(_) => {
                debug!("{} is not a JSON object", data_path.display());
                None
            }
            Err(e) => {
                debug!("Malformed metadata in {}: {}", data_path.display(), e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn write_entry(root: &Path, name: &str, data: &Value) {
        let dir = root.join(name);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(ENTRY_DATA_FILE), data.to_string()).unwrap();
    }

    #[test]
    fn test_dir_catalog_resolves_entry() {
        let root = tempfile::tempdir().unwrap();
        write_entry(root.path(), "bert", &json!({"tags": ["model"]}));

        let catalog = DirCatalog::new(root.path());
        let entry = catalog.byname("bert").unwrap();

        assert_eq!(entry.name(), "bert");
        assert!(entry.path().unwrap().ends_with("bert"));
        assert!(entry.get("tags").is_some());
        assert!(entry.get("missing").is_none());
    }

    #[test]
    fn test_dir_catalog_unknown_name() {
        let root = tempfile::tempdir().unwrap();
        let catalog = DirCatalog::new(root.path());
        assert!(catalog.byname("missing").is_none());
    }

    #[test]
    fn test_dir_catalog_malformed_metadata() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("broken");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(ENTRY_DATA_FILE), "{not json").unwrap();

        let catalog = DirCatalog::new(root.path());
        assert!(catalog.byname("broken").is_none());
    }

    #[test]
    fn test_inline_entry_has_no_path() {
        let entry = Entry::inline("adhoc".to_string(), Map::new());
        assert!(entry.path().is_none());
        assert!(entry.own_data().is_empty());
    }
}
