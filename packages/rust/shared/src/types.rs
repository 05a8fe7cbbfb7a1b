//! Core domain types for agentsdoc rule repositories.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer, Serialize};

// ---------------------------------------------------------------------------
// Frontmatter metadata
// ---------------------------------------------------------------------------

/// A single frontmatter value: either a scalar string or a flat list of strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetaValue {
    Scalar(String),
    List(Vec<String>),
}

impl MetaValue {
    /// The scalar string, or `None` for a list.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Scalar(s) => Some(s),
            Self::List(_) => None,
        }
    }
}

impl From<&str> for MetaValue {
    fn from(value: &str) -> Self {
        Self::Scalar(value.to_string())
    }
}

impl From<String> for MetaValue {
    fn from(value: String) -> Self {
        Self::Scalar(value)
    }
}

impl From<Vec<String>> for MetaValue {
    fn from(value: Vec<String>) -> Self {
        Self::List(value)
    }
}

/// Insertion-ordered frontmatter key/value map.
///
/// Keys are free-form. Inserting an existing key replaces its value in place,
/// so the original key position is kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metadata {
    entries: Vec<(String, MetaValue)>,
}

impl Metadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<MetaValue>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&MetaValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Scalar value for `key`; `None` when absent or when the value is a list.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(MetaValue::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &MetaValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Output of the frontmatter parser: the metadata block and the verbatim body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedDocument {
    pub metadata: Metadata,
    /// Everything after the closing delimiter, untrimmed.
    pub body: String,
}

// ---------------------------------------------------------------------------
// RuleDocument
// ---------------------------------------------------------------------------

/// One rule file from the `rules/` directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleDocument {
    /// File name including extension (e.g. `runtime-model.md`).
    pub file_name: String,
    /// Path the rule was read from.
    pub path: PathBuf,
    pub metadata: Metadata,
    pub body: String,
}

impl RuleDocument {
    /// Stable key for sorting and diagnostics.
    pub fn identifier(&self) -> &str {
        &self.file_name
    }

    /// File name without its `.md` extension.
    pub fn stem(&self) -> &str {
        Path::new(&self.file_name)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(&self.file_name)
    }

    pub fn title(&self) -> Option<&str> {
        self.metadata.get_str("title").filter(|t| !t.is_empty())
    }

    pub fn section(&self) -> Option<&str> {
        self.metadata.get_str("section")
    }

    /// Title used for ordering and headings: `title`, else the file stem.
    pub fn display_title(&self) -> &str {
        self.title().unwrap_or_else(|| self.stem())
    }
}

// ---------------------------------------------------------------------------
// SectionDescriptor
// ---------------------------------------------------------------------------

/// A numbered section declared in the section index document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionDescriptor {
    /// Document order and the numeral shown in headings.
    pub number: u32,
    pub title: String,
    /// Join key against a rule's `section` metadata.
    pub id: String,
    pub impact: String,
    /// Empty when the index gives no description.
    pub description: String,
}

impl SectionDescriptor {
    /// Heading text as rendered, e.g. `2. Usage`.
    pub fn heading(&self) -> String {
        format!("{}. {}", self.number, self.title)
    }
}

// ---------------------------------------------------------------------------
// DocumentMetadata
// ---------------------------------------------------------------------------

/// Top-level document metadata (`metadata.json` in the skill directory).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub organization: String,
    #[serde(default)]
    pub date: String,
    #[serde(default, rename = "abstract", skip_serializing_if = "Option::is_none")]
    pub abstract_text: Option<String>,
    /// Anything other than an array (including `null`) reads as no references.
    #[serde(default, deserialize_with = "references_or_empty")]
    pub references: Vec<String>,
}

fn references_or_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    let serde_json::Value::Array(items) = value else {
        return Ok(Vec::new());
    };
    Ok(items
        .into_iter()
        .map(|item| match item {
            serde_json::Value::String(s) => s,
            other => other.to_string(),
        })
        .collect())
}
