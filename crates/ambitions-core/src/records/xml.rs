//! XML reference directory reader.

use std::collections::BTreeSet;
use std::path::PathBuf;

use roxmltree::{Document, Node, ParsingOptions};

use super::{Field, Pair, Record, RecordSource, SourceError};

/// Reads `<Root><Entry>...</Entry></Root>` files from one directory.
#[derive(Debug, Clone)]
pub struct XmlDirectory {
    root: PathBuf,
}

impl XmlDirectory {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn exists(&self) -> bool {
        self.root.is_dir()
    }
}

impl RecordSource for XmlDirectory {
    fn records(&self, name: &str) -> Result<Option<Vec<Record>>, SourceError> {
        let path = self.root.join(name);
        if !path.is_file() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&path).map_err(|source| SourceError::Io {
            name: name.to_string(),
            source,
        })?;

        parse_entries(name, &content).map(Some)
    }

    fn source_names(&self, prefix: &str) -> Vec<String> {
        let entries = match std::fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(err) => {
                tracing::warn!(dir = %self.root.display(), error = %err, "Failed to list reference directory");
                return Vec::new();
            }
        };

        let mut names: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().is_file())
            .filter_map(|entry| entry.file_name().into_string().ok())
            .filter(|name| name.starts_with(prefix) && name.ends_with(".xml"))
            .collect();
        names.sort();
        names
    }
}

/// Parse every `Entry` element under the document root.
pub(crate) fn parse_entries(name: &str, content: &str) -> Result<Vec<Record>, SourceError> {
    let content = content.trim_start_matches('\u{feff}');
    let options = ParsingOptions {
        allow_dtd: true,
        ..ParsingOptions::default()
    };
    let doc = Document::parse_with_options(content, options).map_err(|err| {
        SourceError::Malformed {
            name: name.to_string(),
            message: err.to_string(),
        }
    })?;

    let records = doc
        .root_element()
        .children()
        .filter(|node| node.is_element() && node.tag_name().name() == "Entry")
        .map(parse_entry)
        .collect();

    Ok(records)
}

/// The first element of a repeated tag is the field; later ones are ignored.
fn parse_entry(entry: Node<'_, '_>) -> Record {
    let mut record = Record::new();
    let mut seen = BTreeSet::new();

    for child in entry.children().filter(Node::is_element) {
        let name = child.tag_name().name();
        if !seen.insert(name) {
            continue;
        }
        if let Some(field) = parse_field(child) {
            record.insert(name, field);
        }
    }

    record
}

fn parse_field(node: Node<'_, '_>) -> Option<Field> {
    let elements: Vec<Node<'_, '_>> = node.children().filter(Node::is_element).collect();

    if elements.is_empty() {
        // Scalars keep their text verbatim; numeric accessors trim on parse.
        let text = node.text().unwrap_or_default();
        return (!text.trim().is_empty()).then(|| Field::Text(text.to_string()));
    }

    if elements.iter().any(|n| n.tag_name().name() == "Pair") {
        let pairs = elements
            .iter()
            .filter(|n| n.tag_name().name() == "Pair")
            .filter_map(|pair| {
                let index = child_text(*pair, "zIndex")?;
                let value = child_text(*pair, "iValue").or_else(|| child_text(*pair, "bValue"));
                Some(Pair { index, value })
            })
            .collect();
        return Some(Field::Pairs(pairs));
    }

    if elements.iter().any(|n| n.tag_name().name() == "zValue") {
        let values = elements
            .iter()
            .filter(|n| n.tag_name().name() == "zValue")
            .filter_map(|n| n.text().map(str::trim))
            .filter(|text| !text.is_empty())
            .map(str::to_string)
            .collect();
        return Some(Field::Values(values));
    }

    None
}

fn child_text(node: Node<'_, '_>, tag: &str) -> Option<String> {
    node.children()
        .find(|n| n.is_element() && n.tag_name().name() == tag)
        .and_then(|n| n.text())
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
}
