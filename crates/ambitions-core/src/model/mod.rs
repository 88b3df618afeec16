//! Normalized ambition model - the published document contract.

mod classes;
mod requirements;

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use classes::{class_name, class_table, AMBITION_CLASS_NAMES};
pub use requirements::{
    CountField, RequirementKind, Requirements, TypedCount, TypedCountField, SIMPLE_COUNTS,
    TYPED_COUNTS,
};

/// Tier at which national (victory) ambitions are offered.
pub const NATIONAL_TIER: i64 = 10;

/// A single normalized ambition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ambition {
    /// Unique identifier
    pub id: String,

    pub name: String,

    #[serde(default)]
    pub short_name: String,

    #[serde(default)]
    pub help_text: String,

    pub ambition_class: i64,

    pub ambition_class_name: String,

    pub min_tier: i64,

    pub max_tier: i64,

    /// Random-offering weight; 0 means event-only
    #[serde(default)]
    pub subject_weight: i64,

    /// Content pack required for this ambition
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dlc: Option<String>,

    #[serde(default)]
    pub requirements: Requirements,

    #[serde(default)]
    pub filters: Filters,

    #[serde(default)]
    pub flags: Flags,

    /// Narrative unlock metadata for event-only ambitions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_source: Option<EventSource>,
}

impl Ambition {
    /// Victory-eligible ambitions offered only at the final tier.
    pub fn is_national(&self) -> bool {
        self.flags.victory_eligible && self.min_tier == NATIONAL_TIER
    }

    /// Whether the ambition can be offered at `tier`.
    pub fn offered_at(&self, tier: i64) -> bool {
        self.min_tier <= tier && tier <= self.max_tier
    }

    pub fn is_event_only(&self) -> bool {
        self.subject_weight == 0
    }
}

/// Offering constraints. Empty fields leave the dimension unconstrained.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Filters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tech_prereq: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tech_prereq_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tech_obsolete: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tech_obsolete_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nation_prereq: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nation_prereq_name: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub family_classes: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub family_class_names: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub religions: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub religion_names: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub invalid_game_options: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Flags {
    pub victory_eligible: bool,
    pub block_complete: bool,
    pub global: bool,
}

/// Event that grants an otherwise unobtainable ambition.
///
/// A missing `event_name` marks a known-unused placeholder ambition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventSource {
    pub event_name: Option<String>,
    pub event_dlc: Option<String>,
    pub trigger: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FamilyClass {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Nation {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dlc: Option<String>,
    /// Family classes available to this nation, sorted
    #[serde(default)]
    pub family_classes: Vec<String>,
}

impl Nation {
    pub fn offers_family(&self, family_class: &str) -> bool {
        self.family_classes.iter().any(|fc| fc == family_class)
    }
}

/// The published normalized model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AmbitionDocument {
    pub version: String,
    pub generated_at: DateTime<Utc>,
    pub ambition_classes: BTreeMap<i64, String>,
    pub family_classes: BTreeMap<String, FamilyClass>,
    pub nations: BTreeMap<String, Nation>,
    pub ambitions: Vec<Ambition>,
}

impl AmbitionDocument {
    /// Read a document from its JSON form.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn ambition(&self, id: &str) -> Option<&Ambition> {
        self.ambitions.iter().find(|a| a.id == id)
    }

    pub fn class_name(&self, class: i64) -> String {
        self.ambition_classes
            .get(&class)
            .cloned()
            .unwrap_or_else(|| class_name(class))
    }
}
