//! Link resolution - expands `link(REFERENCE[,N])` macros into display names.

use super::{first_variant, TextCatalog, TypeCatalog};

const LINK_OPEN: &str = "link(";

/// Prefixes stripped from unresolved macro references.
const LINK_PREFIXES: &[&str] = &[
    "LAW_",
    "TECH_",
    "IMPROVEMENT_",
    "YIELD_",
    "SPECIALIST_",
    "FAMILYCLASS_",
    "THEOLOGY_",
    "RELIGION_",
    "UNIT_",
    "PROJECT_",
    "DIPLOMACY_",
    "STAT_",
];

/// Prefixes stripped when turning a bare id into a label.
const LABEL_PREFIXES: &[&str] = &[
    "GOAL_",
    "LAW_",
    "TECH_",
    "IMPROVEMENT_",
    "YIELD_",
    "SPECIALIST_",
    "FAMILYCLASS_",
    "THEOLOGY_",
    "RELIGION_",
    "UNIT_",
    "PROJECT_",
    "DIPLOMACY_",
    "STAT_",
    "EFFECTCITY_",
    "CULTURE_",
    "SUBJECT_",
    "IMPROVEMENTCLASS_",
    "RESOURCE_",
    "OPINIONFAMILY_",
    "NATION_",
];

/// Resolves references against the text and type catalogs.
#[derive(Debug, Clone, Copy)]
pub struct LinkResolver<'a> {
    texts: &'a TextCatalog,
    types: &'a TypeCatalog,
}

impl<'a> LinkResolver<'a> {
    pub fn new(texts: &'a TextCatalog, types: &'a TypeCatalog) -> Self {
        Self { texts, types }
    }

    pub fn texts(&self) -> &'a TextCatalog {
        self.texts
    }

    /// Replace every `link(...)` macro in `text`.
    pub fn resolve_macros(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        let mut rest = text;

        while let Some(start) = rest.find(LINK_OPEN) {
            let inner = &rest[start + LINK_OPEN.len()..];
            match inner.find(')') {
                Some(end) if end > 0 => {
                    out.push_str(&rest[..start]);
                    out.push_str(&self.resolve_reference(&inner[..end]));
                    rest = &inner[end + 1..];
                }
                _ => {
                    out.push_str(&rest[..start + LINK_OPEN.len()]);
                    rest = inner;
                }
            }
        }

        out.push_str(rest);
        out
    }

    /// Display text for one macro reference (numeric suffix allowed).
    pub fn resolve_reference(&self, reference: &str) -> String {
        let reference = reference.split(',').next().unwrap_or(reference);

        if let Some(name) = self.catalog_name(reference) {
            return name.to_string();
        }

        match strip_known_prefix(reference, LINK_PREFIXES) {
            Some(rest) => title_case(&rest.replace('_', " ")),
            None => reference.to_string(),
        }
    }

    /// Readable label for a bare id: catalog name, else a formatted id.
    pub fn label(&self, id: &str) -> String {
        match self.catalog_name(id) {
            Some(name) => name.to_string(),
            None => format_type_name(id),
        }
    }

    fn catalog_name(&self, id: &str) -> Option<&'a str> {
        self.types
            .lookup(id)
            .find_map(|(_, name_key)| self.texts.get(name_key))
            .map(first_variant)
    }
}

/// Turn an id such as `RESOURCE_WINE` into `Wine`.
pub fn format_type_name(id: &str) -> String {
    if id.is_empty() {
        return String::new();
    }

    let rest = strip_known_prefix(id, LABEL_PREFIXES).unwrap_or(id);
    title_case(&rest.replace('_', " "))
}

fn strip_known_prefix<'s>(id: &'s str, prefixes: &[&str]) -> Option<&'s str> {
    prefixes.iter().find_map(|prefix| id.strip_prefix(prefix))
}

/// Upper-case letters that start a word, lower-case the rest.
fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_word = false;

    for ch in text.chars() {
        if ch.is_alphabetic() {
            if in_word {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(ch);
            in_word = false;
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Category;

    fn catalogs() -> (TextCatalog, TypeCatalog) {
        let mut texts = TextCatalog::new();
        texts.insert("TEXT_TECH_FORESTRY", "Forestry");
        texts.insert("TEXT_YIELD_TRAINING", "Training~Trainings");

        let mut types = TypeCatalog::new();
        types.insert(Category::Tech, "TECH_FORESTRY", "TEXT_TECH_FORESTRY");
        types.insert(Category::Yield, "YIELD_TRAINING", "TEXT_YIELD_TRAINING");
        types.insert(Category::Law, "LAW_ORPHAN", "TEXT_NOT_LOADED");
        (texts, types)
    }

    #[test]
    fn macros_resolve_through_catalogs() {
        let (texts, types) = catalogs();
        let resolver = LinkResolver::new(&texts, &types);

        assert_eq!(
            resolver.resolve_macros("Research link(TECH_FORESTRY) and make link(YIELD_TRAINING,1)."),
            "Research Forestry and make Training."
        );
    }

    #[test]
    fn unknown_references_fall_back_to_formatting() {
        let (texts, types) = catalogs();
        let resolver = LinkResolver::new(&texts, &types);

        assert_eq!(resolver.resolve_macros("link(LAW_FOO_BAR)"), "Foo Bar");
        assert_eq!(resolver.resolve_macros("link(LAW_ORPHAN)"), "Orphan");
        assert_eq!(resolver.resolve_macros("link(GOAL_SOMETHING)"), "GOAL_SOMETHING");
    }

    #[test]
    fn text_without_complete_macros_passes_through() {
        let (texts, types) = catalogs();
        let resolver = LinkResolver::new(&texts, &types);

        assert_eq!(resolver.resolve_macros("No macros here"), "No macros here");
        assert_eq!(resolver.resolve_macros("Broken link( tail"), "Broken link( tail");
        assert_eq!(resolver.resolve_macros("Empty link() stays"), "Empty link() stays");
    }

    #[test]
    fn labels_prefer_catalog_names() {
        let (texts, types) = catalogs();
        let resolver = LinkResolver::new(&texts, &types);

        assert_eq!(resolver.label("TECH_FORESTRY"), "Forestry");
        assert_eq!(resolver.label("RESOURCE_WINE"), "Wine");
        assert_eq!(resolver.label("NATION_ROME"), "Rome");
    }

    #[test]
    fn format_type_name_title_cases_words() {
        assert_eq!(format_type_name("GOAL_2000_EACH_YIELD"), "2000 Each Yield");
        assert_eq!(format_type_name("IMPROVEMENTCLASS_MINE"), "Mine");
        assert_eq!(format_type_name("UNKNOWN_THING"), "Unknown Thing");
        assert_eq!(format_type_name(""), "");
    }
}
