//! Records - field-addressable entities read from game reference sources.
//!
//! A source is a named collection of records (one per XML `Entry`). Fields
//! are loosely typed: scalars are kept as text and parsed on access, so a
//! missing or malformed field silently falls back to its default.

mod xml;

use std::collections::BTreeMap;

use thiserror::Error;

pub use xml::XmlDirectory;

/// Field holding the stable id of every record.
pub const ID_FIELD: &str = "zType";

/// Errors raised while reading a single source.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("io error reading {name}: {source}")]
    Io {
        name: String,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed source {name}: {message}")]
    Malformed { name: String, message: String },
}

/// One `(subtype, value)` entry of a pair-list field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pair {
    pub index: String,
    /// Raw value text (`iValue` or `bValue`), if any
    pub value: Option<String>,
}

impl Pair {
    pub fn new(index: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            index: index.into(),
            value: Some(value.into()),
        }
    }

    /// Integer value, 0 when absent or unparsable.
    pub fn int_value(&self) -> i64 {
        self.value.as_deref().and_then(parse_int).unwrap_or(0)
    }

    /// Boolean value (`"1"`), false when absent.
    pub fn bool_value(&self) -> bool {
        self.value.as_deref().map(str::trim) == Some("1")
    }
}

/// A single field of a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Field {
    Text(String),
    Pairs(Vec<Pair>),
    Values(Vec<String>),
}

/// A field-addressable raw record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    fields: BTreeMap<String, Field>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: set a scalar text field
    pub fn with_text(mut self, name: &str, value: impl Into<String>) -> Self {
        self.fields.insert(name.to_string(), Field::Text(value.into()));
        self
    }

    /// Builder: set a pair-list field
    pub fn with_pairs<I, K, V>(mut self, name: &str, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let pairs = pairs.into_iter().map(|(k, v)| Pair::new(k, v)).collect();
        self.fields.insert(name.to_string(), Field::Pairs(pairs));
        self
    }

    /// Builder: set a value-list field
    pub fn with_values<I, V>(mut self, name: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        let values = values.into_iter().map(Into::into).collect();
        self.fields.insert(name.to_string(), Field::Values(values));
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, field: Field) {
        self.fields.insert(name.into(), field);
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.get(name)
    }

    /// The record id, `None` when empty or absent.
    pub fn id(&self) -> Option<&str> {
        self.text(ID_FIELD).map(str::trim)
    }

    /// Non-empty scalar text.
    pub fn text(&self, name: &str) -> Option<&str> {
        match self.fields.get(name) {
            Some(Field::Text(s)) if !s.is_empty() => Some(s.as_str()),
            _ => None,
        }
    }

    /// Integer scalar, `default` when absent or unparsable.
    pub fn int(&self, name: &str, default: i64) -> i64 {
        self.text(name).and_then(parse_int).unwrap_or(default)
    }

    /// Boolean scalar stored as `0`/`1`.
    pub fn flag(&self, name: &str) -> bool {
        self.text(name).map(str::trim) == Some("1")
    }

    /// Pair list, empty when absent. Pairs without a subtype are dropped.
    pub fn pairs(&self, name: &str) -> Vec<&Pair> {
        match self.fields.get(name) {
            Some(Field::Pairs(pairs)) => pairs.iter().filter(|p| !p.index.is_empty()).collect(),
            _ => Vec::new(),
        }
    }

    /// Value list, empty when absent.
    pub fn values(&self, name: &str) -> Vec<String> {
        match self.fields.get(name) {
            Some(Field::Values(values)) => {
                values.iter().filter(|v| !v.is_empty()).cloned().collect()
            }
            _ => Vec::new(),
        }
    }
}

fn parse_int(raw: &str) -> Option<i64> {
    raw.trim().parse().ok()
}

/// Reader seam over the raw reference data.
pub trait RecordSource {
    /// Records of the named source; `Ok(None)` when it does not exist.
    fn records(&self, name: &str) -> Result<Option<Vec<Record>>, SourceError>;

    /// Names of the available sources that start with `prefix`, sorted.
    fn source_names(&self, prefix: &str) -> Vec<String>;
}

/// In-memory source, keyed by source name.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    sources: BTreeMap<String, Vec<Record>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_source(mut self, name: &str, records: Vec<Record>) -> Self {
        self.sources.insert(name.to_string(), records);
        self
    }

    pub fn insert(&mut self, name: &str, records: Vec<Record>) {
        self.sources.insert(name.to_string(), records);
    }
}

impl RecordSource for MemorySource {
    fn records(&self, name: &str) -> Result<Option<Vec<Record>>, SourceError> {
        Ok(self.sources.get(name).cloned())
    }

    fn source_names(&self, prefix: &str) -> Vec<String> {
        self.sources
            .keys()
            .filter(|name| name.starts_with(prefix))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_accessors_default_when_missing_or_malformed() {
        let record = Record::new()
            .with_text(ID_FIELD, "GOAL_X")
            .with_text("iMinTier", "3")
            .with_text("iMaxTier", "lots")
            .with_text("bGlobal", "1")
            .with_text("Name", "");

        assert_eq!(record.id(), Some("GOAL_X"));
        assert_eq!(record.int("iMinTier", 1), 3);
        assert_eq!(record.int("iMaxTier", 10), 10);
        assert_eq!(record.int("iSubjectWeight", 0), 0);
        assert!(record.flag("bGlobal"));
        assert!(!record.flag("bScenario"));
        assert_eq!(record.text("Name"), None);
    }

    #[test]
    fn list_accessors_skip_blank_entries() {
        let record = Record::new()
            .with_pairs("aiUnitCount", [("UNIT_WARRIOR", "2"), ("", "5")])
            .with_values("aeFamilyClass", ["FAMILYCLASS_SAGES", ""]);

        let pairs = record.pairs("aiUnitCount");
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].int_value(), 2);
        assert_eq!(record.values("aeFamilyClass"), vec!["FAMILYCLASS_SAGES"]);
        assert!(record.pairs("aiMissing").is_empty());
    }

    #[test]
    fn memory_source_lists_by_prefix() {
        let source = MemorySource::new()
            .with_source("text-b.xml", vec![])
            .with_source("text-a.xml", vec![])
            .with_source("goal.xml", vec![]);

        assert_eq!(
            source.source_names("text-"),
            vec!["text-a.xml".to_string(), "text-b.xml".to_string()]
        );
        assert!(source.records("law.xml").unwrap().is_none());
    }
}
