//! Catalogs - localized text and per-category type tables.
//!
//! Both catalogs are built once from the reference sources and are
//! read-only afterwards. Building never fails: a missing or malformed
//! source only contributes nothing.

pub mod link;

use std::collections::{BTreeMap, HashMap};

use crate::records::{RecordSource, ID_FIELD};

pub use link::{format_type_name, LinkResolver};

/// Separator between the variants of a localized string (`singular~plural`).
pub const VARIANT_SEPARATOR: char = '~';

/// First variant of a localized string.
pub fn first_variant(text: &str) -> &str {
    text.split(VARIANT_SEPARATOR).next().unwrap_or(text)
}

/// Key -> display string table aggregated from every localization source.
#[derive(Debug, Clone, Default)]
pub struct TextCatalog {
    texts: HashMap<String, String>,
}

impl TextCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the named sources in order; later sources overwrite earlier ones.
    pub fn load(source: &dyn RecordSource, names: &[String], language: &str) -> Self {
        let mut catalog = Self::new();

        for name in names {
            let records = match source.records(name) {
                Ok(Some(records)) => records,
                Ok(None) => {
                    tracing::debug!(source = %name, "Text source not found, skipping");
                    continue;
                }
                Err(err) => {
                    tracing::warn!(source = %name, error = %err, "Skipping unreadable text source");
                    continue;
                }
            };

            let before = catalog.len();
            for record in &records {
                if let (Some(key), Some(text)) = (record.id(), record.text(language)) {
                    catalog.insert(key, text);
                }
            }
            tracing::debug!(
                source = %name,
                added = catalog.len() - before,
                "Loaded text source"
            );
        }

        catalog
    }

    /// Store the first variant of `text` under `key`, replacing any previous value.
    pub fn insert(&mut self, key: impl Into<String>, text: &str) {
        self.texts.insert(key.into(), first_variant(text).to_string());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.texts.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.texts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.texts.is_empty()
    }
}

/// Domain categories with an id -> name-key table.
///
/// Declaration order is the probe order used when resolving references.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
    Law,
    Tech,
    Improvement,
    Specialist,
    FamilyClass,
    Religion,
    Yield,
    Unit,
    Project,
    Nation,
}

impl Category {
    pub const ALL: [Category; 10] = [
        Category::Law,
        Category::Tech,
        Category::Improvement,
        Category::Specialist,
        Category::FamilyClass,
        Category::Religion,
        Category::Yield,
        Category::Unit,
        Category::Project,
        Category::Nation,
    ];

    /// Source file holding this category's records
    pub fn source_name(self) -> &'static str {
        match self {
            Self::Law => "law.xml",
            Self::Tech => "tech.xml",
            Self::Improvement => "improvement.xml",
            Self::Specialist => "specialist.xml",
            Self::FamilyClass => "familyClass.xml",
            Self::Religion => "religion.xml",
            Self::Yield => "yield.xml",
            Self::Unit => "unit.xml",
            Self::Project => "project.xml",
            Self::Nation => "nation.xml",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Law => "law",
            Self::Tech => "tech",
            Self::Improvement => "improvement",
            Self::Specialist => "specialist",
            Self::FamilyClass => "familyClass",
            Self::Religion => "religion",
            Self::Yield => "yield",
            Self::Unit => "unit",
            Self::Project => "project",
            Self::Nation => "nation",
        }
    }
}

/// Field holding the name text key in type records.
pub const NAME_FIELD: &str = "Name";

/// One id -> name-key table per category.
#[derive(Debug, Clone, Default)]
pub struct TypeCatalog {
    tables: BTreeMap<Category, HashMap<String, String>>,
}

impl TypeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build every category table from its source.
    pub fn load(source: &dyn RecordSource) -> Self {
        let mut catalog = Self::new();

        for category in Category::ALL {
            let name = category.source_name();
            let records = match source.records(name) {
                Ok(Some(records)) => records,
                Ok(None) => {
                    tracing::debug!(category = category.name(), "Type source not found");
                    Vec::new()
                }
                Err(err) => {
                    tracing::warn!(source = name, error = %err, "Skipping unreadable type source");
                    Vec::new()
                }
            };

            for record in &records {
                if let (Some(id), Some(name_key)) = (record.text(ID_FIELD), record.text(NAME_FIELD)) {
                    catalog.insert(category, id, name_key);
                }
            }
            tracing::debug!(
                category = category.name(),
                entries = catalog.table_len(category),
                "Loaded type table"
            );
        }

        catalog
    }

    pub fn insert(&mut self, category: Category, id: impl Into<String>, name_key: impl Into<String>) {
        self.tables
            .entry(category)
            .or_default()
            .insert(id.into(), name_key.into());
    }

    /// Name key of `id` within one category.
    pub fn name_key(&self, category: Category, id: &str) -> Option<&str> {
        self.tables
            .get(&category)
            .and_then(|table| table.get(id))
            .map(String::as_str)
    }

    /// Every `(category, name key)` holding `id`, in probe order.
    pub fn lookup<'a>(&'a self, id: &'a str) -> impl Iterator<Item = (Category, &'a str)> + 'a {
        Category::ALL
            .into_iter()
            .filter_map(move |category| self.name_key(category, id).map(|key| (category, key)))
    }

    pub fn table_len(&self, category: Category) -> usize {
        self.tables.get(&category).map_or(0, HashMap::len)
    }

    /// Ids present in more than one table, with the categories holding them.
    pub fn collisions(&self) -> Vec<(String, Vec<Category>)> {
        let mut seen: BTreeMap<&str, Vec<Category>> = BTreeMap::new();
        for (category, table) in &self.tables {
            for id in table.keys() {
                seen.entry(id.as_str()).or_default().push(*category);
            }
        }

        seen.into_iter()
            .filter(|(_, categories)| categories.len() > 1)
            .map(|(id, categories)| (id.to_string(), categories))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{MemorySource, Record};

    fn entry(key: &str, text: &str) -> Record {
        Record::new().with_text(ID_FIELD, key).with_text("en-US", text)
    }

    #[test]
    fn first_variant_keeps_text_before_separator() {
        assert_eq!(first_variant("City~Cities"), "City");
        assert_eq!(first_variant("~Cities"), "");
        assert_eq!(first_variant("Plain"), "Plain");
    }

    #[test]
    fn later_text_source_wins() {
        let source = MemorySource::new()
            .with_source("text-a.xml", vec![entry("TEXT_X", "First"), entry("TEXT_Y", "Only")])
            .with_source("text-b.xml", vec![entry("TEXT_X", "Second~Seconds")]);
        let names = vec!["text-a.xml".to_string(), "text-b.xml".to_string()];

        let catalog = TextCatalog::load(&source, &names, "en-US");
        assert_eq!(catalog.get("TEXT_X"), Some("Second"));
        assert_eq!(catalog.get("TEXT_Y"), Some("Only"));

        let reversed: Vec<String> = names.into_iter().rev().collect();
        let catalog = TextCatalog::load(&source, &reversed, "en-US");
        assert_eq!(catalog.get("TEXT_X"), Some("First"));
    }

    #[test]
    fn text_records_need_key_and_language() {
        let source = MemorySource::new().with_source(
            "text-a.xml",
            vec![
                Record::new().with_text("en-US", "No key"),
                Record::new().with_text(ID_FIELD, "TEXT_FR").with_text("fr-FR", "Bonjour"),
            ],
        );

        let catalog = TextCatalog::load(&source, &["text-a.xml".to_string(), "text-missing.xml".to_string()], "en-US");
        assert!(catalog.is_empty());
    }

    #[test]
    fn missing_type_sources_yield_empty_tables() {
        let source = MemorySource::new().with_source(
            "law.xml",
            vec![
                Record::new().with_text(ID_FIELD, "LAW_SLAVERY").with_text(NAME_FIELD, "TEXT_LAW_SLAVERY"),
                Record::new().with_text(ID_FIELD, "LAW_NO_NAME"),
            ],
        );

        let catalog = TypeCatalog::load(&source);
        assert_eq!(catalog.table_len(Category::Law), 1);
        assert_eq!(catalog.table_len(Category::Tech), 0);
        assert_eq!(catalog.name_key(Category::Law, "LAW_SLAVERY"), Some("TEXT_LAW_SLAVERY"));
    }

    #[test]
    fn collisions_report_shared_ids() {
        let mut catalog = TypeCatalog::new();
        catalog.insert(Category::Unit, "SHARED", "TEXT_UNIT");
        catalog.insert(Category::Project, "SHARED", "TEXT_PROJECT");
        catalog.insert(Category::Law, "LAW_ONLY", "TEXT_LAW");

        let collisions = catalog.collisions();
        assert_eq!(collisions, vec![("SHARED".to_string(), vec![Category::Unit, Category::Project])]);

        let hits: Vec<_> = catalog.lookup("SHARED").collect();
        assert_eq!(hits[0], (Category::Unit, "TEXT_UNIT"));
    }
}
