//! Generic document tree
//!
//! ECU definitions reach this crate already parsed: a tree of tagged nodes
//! with string attributes. [`DocNode`] is that tree. It serializes to and
//! from JSON or YAML so pre-converted definitions can be loaded from disk.

use std::collections::BTreeMap;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{DocumentError, FieldError};
use crate::field;

/// One element of a parsed definition document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocNode {
    /// Element name (e.g. `currentdatanode`)
    pub tag: String,
    /// Attributes in document form
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,
    /// Child elements in document order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<DocNode>,
}

impl DocNode {
    /// Create an empty node
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Default::default()
        }
    }

    /// Builder: add an attribute
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Builder: append a child
    pub fn with_child(mut self, child: DocNode) -> Self {
        self.children.push(child);
        self
    }

    /// Builder: append several children
    pub fn with_children(mut self, children: impl IntoIterator<Item = DocNode>) -> Self {
        self.children.extend(children);
        self
    }

    /// Attribute value, `None` when absent or empty
    pub fn attr(&self, name: &str) -> Option<&str> {
        field::non_empty(self.attributes.get(name).map(String::as_str))
    }

    /// Attribute value as written, including empty strings
    pub fn raw_attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Parse a decimal attribute
    pub fn decimal_attr<T: FromStr>(&self, name: &str) -> Result<Option<T>, FieldError> {
        field::parse_decimal(name, self.raw_attr(name))
    }

    /// Parse a hex attribute
    pub fn hex_attr(&self, name: &str) -> Result<Option<u64>, FieldError> {
        field::parse_hex(name, self.raw_attr(name))
    }

    /// Direct children with the given tag
    pub fn children_named<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a DocNode> + 'a {
        self.children.iter().filter(move |c| c.tag == tag)
    }

    /// First direct child with the given tag
    pub fn first_child(&self, tag: &str) -> Option<&DocNode> {
        self.children.iter().find(|c| c.tag == tag)
    }

    /// All descendants reached by a `/`-separated tag path, in document order
    ///
    /// `find_all("currentdata/currentdatanode")` matches like an XPath
    /// relative child path.
    pub fn find_all(&self, path: &str) -> Vec<&DocNode> {
        let mut current = vec![self];
        for segment in path.split('/').filter(|s| !s.is_empty()) {
            current = current
                .into_iter()
                .flat_map(|node| node.children.iter().filter(move |c| c.tag == segment))
                .collect();
        }
        current
    }

    /// Load a tree from a JSON string
    pub fn from_json(json: &str) -> Result<Self, DocumentError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a tree from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self, DocumentError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Load a tree from a `.json`, `.yaml` or `.yml` file
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
}

pub(crate) fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
}
