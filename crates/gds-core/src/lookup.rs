//! String and symbol-table lookups
//!
//! Definitions reference display text by key. [`LookupService`] resolves
//! those keys; [`LookupStore`] is the file-backed implementation. A store is
//! built once per run and passed by reference to every stage that needs it.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use gds_conv::SymbolTableSource;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::document::extension;
use crate::error::DocumentError;

/// Resolves document keys to display text and symbol tables
///
/// Every lookup is total: a missing key yields an empty string (or `None`
/// for symbol tables), never an error.
pub trait LookupService: SymbolTableSource {
    /// Text registered under `key` for message attribute `attribute`
    fn resolve_message(&self, key: &str, attribute: &str) -> String;

    /// Text registered under `key` in collection `collection`
    fn resolve_collection_entry(&self, key: &str, collection: &str) -> String;
}

/// In-memory lookup data with optional on-disk symbol tables
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LookupStore {
    /// attribute → key → text
    #[serde(default)]
    pub messages: HashMap<String, HashMap<String, String>>,
    /// collection → key → text
    #[serde(default)]
    pub collections: HashMap<String, HashMap<String, String>>,
    /// Tables registered in memory; checked before `lut_dir`
    #[serde(default)]
    pub symbol_tables: HashMap<String, Vec<String>>,
    /// Directory of `<id>.lut` files
    #[serde(skip)]
    pub lut_dir: Option<PathBuf>,
}

impl LookupStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load lookup data from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self, DocumentError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Load lookup data from a JSON string
    pub fn from_json(json: &str) -> Result<Self, DocumentError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load lookup data from a `.json`, `.yaml` or `.yml` file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, DocumentError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        match extension(path).as_deref() {
            Some("json") => Self::from_json(&content),
            Some("yaml") | Some("yml") => Self::from_yaml(&content),
            other => Err(DocumentError::UnsupportedFormat(
                other.unwrap_or("<none>").to_string(),
            )),
        }
    }

    /// Builder: set the symbol-table directory
    pub fn with_lut_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.lut_dir = Some(dir.into());
        self
    }

    /// Merge another store into this one; `other` wins on key conflicts
    pub fn merge(&mut self, other: LookupStore) {
        for (attribute, entries) in other.messages {
            self.messages.entry(attribute).or_default().extend(entries);
        }
        for (collection, entries) in other.collections {
            self.collections.entry(collection).or_default().extend(entries);
        }
        self.symbol_tables.extend(other.symbol_tables);
        if other.lut_dir.is_some() {
            self.lut_dir = other.lut_dir;
        }
    }

    pub fn insert_message(
        &mut self,
        attribute: impl Into<String>,
        key: impl Into<String>,
        text: impl Into<String>,
    ) {
        self.messages
            .entry(attribute.into())
            .or_default()
            .insert(key.into(), text.into());
    }

    pub fn insert_collection_entry(
        &mut self,
        collection: impl Into<String>,
        key: impl Into<String>,
        text: impl Into<String>,
    ) {
        self.collections
            .entry(collection.into())
            .or_default()
            .insert(key.into(), text.into());
    }

    pub fn insert_symbol_table(&mut self, identifier: impl Into<String>, symbols: Vec<String>) {
        self.symbol_tables.insert(identifier.into(), symbols);
    }
}

impl SymbolTableSource for LookupStore {
    fn load_symbol_table(&self, identifier: &str) -> Option<Vec<String>> {
        if let Some(table) = self.symbol_tables.get(identifier) {
            return Some(table.clone());
        }
        let dir = self.lut_dir.as_ref()?;
        read_lut_file(dir, identifier)
    }
}

impl LookupService for LookupStore {
    fn resolve_message(&self, key: &str, attribute: &str) -> String {
        self.messages
            .get(attribute)
            .and_then(|entries| entries.get(key))
            .cloned()
            .unwrap_or_default()
    }

    fn resolve_collection_entry(&self, key: &str, collection: &str) -> String {
        self.collections
            .get(collection)
            .and_then(|entries| entries.get(key))
            .cloned()
            .unwrap_or_default()
    }
}

/// Read `<dir>/<id>.lut`, falling back to `<dir>/<id>.LUT`
///
/// One entry per line, surrounding whitespace trimmed.
pub fn read_lut_file(dir: &Path, identifier: &str) -> Option<Vec<String>> {
    for file_name in [format!("{}.lut", identifier), format!("{}.LUT", identifier)] {
        let path = dir.join(&file_name);
        match std::fs::read_to_string(&path) {
            Ok(content) => {
                debug!(path = %path.display(), "Loaded symbol table");
                return Some(content.lines().map(|l| l.trim().to_string()).collect());
            }
            Err(_) => continue,
        }
    }
    None
}
