//! Extraction - turns raw ambition, family and nation records into the
//! normalized model.

pub mod events;

use std::collections::{BTreeMap, BTreeSet};

use crate::catalog::{format_type_name, LinkResolver, TextCatalog, TypeCatalog};
use crate::model::{
    class_name, Ambition, FamilyClass, Filters, Flags, Nation, RequirementKind, Requirements,
    TypedCount, SIMPLE_COUNTS, TYPED_COUNTS,
};
use crate::records::Record;

pub use events::{EventOnlyEntry, EventSourceAnnotator, EVENT_ONLY_AMBITIONS};

pub const DEFAULT_MIN_TIER: i64 = 1;
pub const DEFAULT_MAX_TIER: i64 = 10;

/// Builds [`Ambition`]s from raw goal records.
#[derive(Debug, Clone, Copy)]
pub struct RequirementExtractor<'a> {
    resolver: LinkResolver<'a>,
    annotator: &'a EventSourceAnnotator,
}

impl<'a> RequirementExtractor<'a> {
    pub fn new(
        texts: &'a TextCatalog,
        types: &'a TypeCatalog,
        annotator: &'a EventSourceAnnotator,
    ) -> Self {
        Self {
            resolver: LinkResolver::new(texts, types),
            annotator,
        }
    }

    /// Normalize one goal record.
    ///
    /// Returns `None` for records without an id and for scenario-only or
    /// disabled goals.
    pub fn extract(&self, record: &Record) -> Option<Ambition> {
        let id = record.id()?;

        if record.flag("bScenario") {
            tracing::trace!(ambition = id, "Skipping scenario ambition");
            return None;
        }
        if record.flag("bDisabled") {
            tracing::trace!(ambition = id, "Skipping disabled ambition");
            return None;
        }

        let ambition_class = record.int("iAmbitionClass", 0);
        let min_tier = record.int("iMinTier", DEFAULT_MIN_TIER);
        let mut max_tier = record.int("iMaxTier", DEFAULT_MAX_TIER);
        if min_tier > max_tier {
            tracing::warn!(
                ambition = id,
                min_tier,
                max_tier,
                "Ambition tier range is inverted, raising max tier"
            );
            max_tier = min_tier;
        }

        Some(Ambition {
            id: id.to_string(),
            name: self
                .display_text(record, "Name")
                .unwrap_or_else(|| format_type_name(id)),
            short_name: self.display_text(record, "ShortName").unwrap_or_default(),
            help_text: self.display_text(record, "HelpText").unwrap_or_default(),
            ambition_class,
            ambition_class_name: class_name(ambition_class),
            min_tier,
            max_tier,
            subject_weight: record.int("iSubjectWeight", 0),
            dlc: record.text("GameContentRequired").map(str::to_string),
            requirements: self.requirements(record),
            filters: self.filters(record),
            flags: Flags {
                victory_eligible: record.flag("bVictoryEligible"),
                block_complete: record.flag("bBlockComplete"),
                global: record.flag("bGlobal"),
            },
            event_source: self.annotator.lookup(id),
        })
    }

    /// Text key field -> catalog -> macro expansion.
    fn display_text(&self, record: &Record, field: &str) -> Option<String> {
        let key = record.text(field)?;
        let raw = self.resolver.texts().get(key)?;
        Some(self.resolver.resolve_macros(raw))
    }

    fn labelled(&self, id: Option<&str>) -> (Option<String>, Option<String>) {
        match id {
            Some(id) => (Some(id.to_string()), Some(self.resolver.label(id))),
            None => (None, None),
        }
    }

    fn labels(&self, ids: &[String]) -> Vec<String> {
        ids.iter().map(|id| self.resolver.label(id)).collect()
    }

    fn filters(&self, record: &Record) -> Filters {
        let (tech_prereq, tech_prereq_name) = self.labelled(record.text("TechPrereq"));
        let (tech_obsolete, tech_obsolete_name) = self.labelled(record.text("TechObsolete"));
        let (nation_prereq, nation_prereq_name) = self.labelled(record.text("NationPrereq"));

        let family_classes = record.values("aeFamilyClass");
        let religions = record.values("aeReligion");

        Filters {
            tech_prereq,
            tech_prereq_name,
            tech_obsolete,
            tech_obsolete_name,
            nation_prereq,
            nation_prereq_name,
            family_class_names: self.labels(&family_classes),
            family_classes,
            religion_names: self.labels(&religions),
            religions,
            invalid_game_options: record.values("aeInvalidGameOptions"),
        }
    }

    fn requirements(&self, record: &Record) -> Requirements {
        let mut req = Requirements::default();

        if let Some(law) = record.text("StartLaw") {
            req.kind = Some(RequirementKind::Law);
            req.law_name = Some(self.resolver.label(law));
            req.law = Some(law.to_string());
        }

        if let Some(theology) = record.text("EstablishTheology") {
            req.kind = Some(RequirementKind::Theology);
            req.theology_name = Some(self.resolver.label(theology));
            req.theology = Some(theology.to_string());
        }

        for field in SIMPLE_COUNTS {
            let value = record.int(field.source, 0);
            if value > 0 {
                req.kind.get_or_insert(RequirementKind::Count);
                (field.set)(&mut req, value);
            }
        }

        for field in TYPED_COUNTS {
            let pairs = record.pairs(field.source);
            if pairs.is_empty() {
                continue;
            }
            req.kind.get_or_insert(RequirementKind::TypedCount);
            let entries = pairs
                .into_iter()
                .map(|pair| TypedCount {
                    type_name: self.resolver.label(&pair.index),
                    subtype: pair.index.clone(),
                    value: pair.int_value(),
                })
                .collect();
            (field.set)(&mut req, entries);
        }

        let techs = record.values("aeTechsAcquired");
        if !techs.is_empty() {
            req.kind = Some(RequirementKind::Techs);
            req.tech_names = self.labels(&techs);
            req.techs = techs;
        }

        let sub_goals = record.values("aeSubGoals");
        req.sub_goal_names = self.labels(&sub_goals);
        req.sub_goals = sub_goals;
        req.state_religion = record.flag("bStateReligion");
        req.all_holy_cities = record.flag("bAllHolyCities");

        let (diplomacy_all, diplomacy_all_name) = self.labelled(record.text("DiplomacyAll"));
        req.diplomacy_all = diplomacy_all;
        req.diplomacy_all_name = diplomacy_all_name;

        let (min_opinion, min_opinion_name) = self.labelled(record.text("MinOpinionFamily"));
        req.min_opinion_family = min_opinion;
        req.min_opinion_family_name = min_opinion_name;

        req
    }
}

/// Catalog text for `key`, else a label derived from `id`.
fn entity_name(texts: &TextCatalog, key: Option<&str>, id: &str) -> String {
    key.and_then(|key| texts.get(key))
        .map(str::to_string)
        .unwrap_or_else(|| format_type_name(id))
}

/// Family classes keyed by id.
pub fn extract_family_classes(
    records: &[Record],
    texts: &TextCatalog,
) -> BTreeMap<String, FamilyClass> {
    records
        .iter()
        .filter_map(|record| {
            let id = record.id()?;
            let family_class = FamilyClass {
                id: id.to_string(),
                name: entity_name(texts, record.text("Name"), id),
            };
            Some((family_class.id.clone(), family_class))
        })
        .collect()
}

/// Nation id -> family classes of the families enabled for that nation.
///
/// Family records link to nations through `abNation` pairs whose boolean is
/// true; a family without a `FamilyClass` still registers the nation.
pub fn nation_family_classes(families: &[Record]) -> BTreeMap<String, BTreeSet<String>> {
    let mut by_nation: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();

    for family in families {
        if family.id().is_none() {
            continue;
        }
        let family_class = family.text("FamilyClass");

        for pair in family.pairs("abNation") {
            if !pair.bool_value() {
                continue;
            }
            let classes = by_nation.entry(pair.index.clone()).or_default();
            if let Some(family_class) = family_class {
                classes.insert(family_class.to_string());
            }
        }
    }

    by_nation
}

/// Enabled nations keyed by id, with their family classes attached.
pub fn extract_nations(
    nations: &[Record],
    families: &[Record],
    texts: &TextCatalog,
) -> BTreeMap<String, Nation> {
    let mut family_classes = nation_family_classes(families);

    nations
        .iter()
        .filter_map(|record| {
            let id = record.id()?;
            if record.flag("bDisabled") {
                tracing::trace!(nation = id, "Skipping disabled nation");
                return None;
            }

            let nation = Nation {
                id: id.to_string(),
                name: entity_name(texts, record.text("GenderedName"), id),
                dlc: record.text("GameContentRequired").map(str::to_string),
                family_classes: family_classes
                    .remove(id)
                    .map(|classes| classes.into_iter().collect())
                    .unwrap_or_default(),
            };
            Some((nation.id.clone(), nation))
        })
        .collect()
}
