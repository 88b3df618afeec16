//! Requirement record - the sparse, multi-category completion conditions.
//!
//! `kind` is only a hint at the primary category. An ambition can carry
//! fields from several categories at once, so consumers must read the
//! fields individually.

use serde::{Deserialize, Serialize};

use crate::catalog::format_type_name;

/// Primary-category hint stored under `type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequirementKind {
    Law,
    Theology,
    Count,
    TypedCount,
    Techs,
}

/// One `(subtype, quantity)` entry of a typed count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypedCount {
    #[serde(rename = "type")]
    pub subtype: String,
    pub type_name: String,
    pub value: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Requirements {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<RequirementKind>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub law: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub law_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theology: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theology_name: Option<String>,

    // Simple counts
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cities: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connected_cities: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub population: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legitimacy: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wonders: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub laws: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub citizens: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specialists: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub luxuries: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sent_luxuries: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub military_units: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_level_units: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub urban_tiles: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub urban_improvements: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reveal_land: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reveal_water: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generals: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explorers: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub governors: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agents: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent_networks: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub holy_cities: Option<i64>,

    // Typed counts
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yield_produced: Option<Vec<TypedCount>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yield_sold: Option<Vec<TypedCount>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yield_rate: Option<Vec<TypedCount>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yield_stockpile: Option<Vec<TypedCount>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub improvements: Option<Vec<TypedCount>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub improvement_classes: Option<Vec<TypedCount>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specialist_types: Option<Vec<TypedCount>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub units: Option<Vec<TypedCount>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_traits: Option<Vec<TypedCount>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub projects: Option<Vec<TypedCount>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub luxuries_hooked: Option<Vec<TypedCount>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diplomacy: Option<Vec<TypedCount>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<Vec<TypedCount>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub culture: Option<Vec<TypedCount>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub culture_wonders: Option<Vec<TypedCount>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tribes_killed: Option<Vec<TypedCount>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub missions_completed: Option<Vec<TypedCount>>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub techs: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tech_names: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sub_goals: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sub_goal_names: Vec<String>,

    #[serde(skip_serializing_if = "is_false")]
    pub state_religion: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub all_holy_cities: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub diplomacy_all: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diplomacy_all_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_opinion_family: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_opinion_family_name: Option<String>,
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// A plain integer threshold read from one source field.
pub struct CountField {
    pub source: &'static str,
    pub label: &'static str,
    pub get: fn(&Requirements) -> Option<i64>,
    pub set: fn(&mut Requirements, i64),
}

/// A list of `(subtype, quantity)` thresholds read from one pair-list field.
pub struct TypedCountField {
    pub source: &'static str,
    pub label: &'static str,
    pub get: fn(&Requirements) -> Option<&[TypedCount]>,
    pub set: fn(&mut Requirements, Vec<TypedCount>),
}

macro_rules! count_field {
    ($source:literal, $label:literal, $field:ident) => {
        CountField {
            source: $source,
            label: $label,
            get: |r| r.$field,
            set: |r, value| r.$field = Some(value),
        }
    };
}

macro_rules! typed_count_field {
    ($source:literal, $label:literal, $field:ident) => {
        TypedCountField {
            source: $source,
            label: $label,
            get: |r| r.$field.as_deref(),
            set: |r, entries| r.$field = Some(entries),
        }
    };
}

/// Simple counts, in extraction order.
pub static SIMPLE_COUNTS: &[CountField] = &[
    count_field!("iCities", "Cities", cities),
    count_field!("iConnectedCities", "Connected Cities", connected_cities),
    count_field!("iPopulation", "Population", population),
    count_field!("iLegitimacy", "Legitimacy", legitimacy),
    count_field!("iWonders", "Wonders", wonders),
    count_field!("iLaws", "Laws", laws),
    count_field!("iCitizens", "Citizens", citizens),
    count_field!("iSpecialists", "Specialists", specialists),
    count_field!("iLuxuries", "Luxuries", luxuries),
    count_field!("iSentLuxuries", "Luxuries Sent", sent_luxuries),
    count_field!("iMilitaryUnits", "Military Units", military_units),
    count_field!("iMaxLevelUnits", "Max Level Units", max_level_units),
    count_field!("iUrbanTiles", "Urban Tiles", urban_tiles),
    count_field!("iUrbanImprovements", "Urban Improvements", urban_improvements),
    count_field!("iRevealLand", "Land Revealed", reveal_land),
    count_field!("iRevealWater", "Water Revealed", reveal_water),
    count_field!("iGeneralCount", "Generals", generals),
    count_field!("iExplorerCount", "Explorers", explorers),
    count_field!("iGovernorCount", "Governors", governors),
    count_field!("iAgentCount", "Agents", agents),
    count_field!("iAgentNetworks", "Agent Networks", agent_networks),
    count_field!("iWorldReligionHolyCities", "Holy Cities", holy_cities),
];

/// Typed counts, in extraction order.
pub static TYPED_COUNTS: &[TypedCountField] = &[
    typed_count_field!("aiYieldProducedData", "Yield Produced", yield_produced),
    typed_count_field!("aiYieldSoldData", "Yield Sold", yield_sold),
    typed_count_field!("aiYieldRate", "Yield/Turn", yield_rate),
    typed_count_field!("aiYieldCount", "Yield Stockpile", yield_stockpile),
    typed_count_field!("aiImprovementCount", "Improvements", improvements),
    typed_count_field!("aiImprovementClassCount", "Improvement Classes", improvement_classes),
    typed_count_field!("aiSpecialistCount", "Specialists", specialist_types),
    typed_count_field!("aiUnitCount", "Units", units),
    typed_count_field!("aiUnitTraitCount", "Unit Traits", unit_traits),
    typed_count_field!("aiProjectCount", "Projects", projects),
    typed_count_field!("aiLuxuryCount", "Luxuries Hooked", luxuries_hooked),
    typed_count_field!("aiDiplomacyCount", "Diplomacy", diplomacy),
    typed_count_field!("aiStatCountData", "Statistics", stats),
    typed_count_field!("aiCultureCount", "Culture", culture),
    typed_count_field!("aiCultureWonders", "Culture Wonders", culture_wonders),
    typed_count_field!("aiTribesKilledData", "Tribes Killed", tribes_killed),
    typed_count_field!("aiMissionsCompletedData", "Missions", missions_completed),
];

impl Requirements {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Short human-readable phrases, one per populated requirement.
    pub fn describe(&self) -> Vec<String> {
        let mut parts = Vec::new();

        if let Some(name) = &self.law_name {
            parts.push(format!("Enact {name}"));
        }
        if let Some(name) = &self.theology_name {
            parts.push(format!("Establish {name}"));
        }

        for field in SIMPLE_COUNTS {
            if let Some(value) = (field.get)(self) {
                parts.push(format!("{value} {}", field.label));
            }
        }

        for field in TYPED_COUNTS {
            for entry in (field.get)(self).unwrap_or_default() {
                parts.push(format!("{} {}", entry.value, entry.type_name));
            }
        }

        if !self.tech_names.is_empty() {
            parts.push(format!("Research: {}", self.tech_names.join(" and ")));
        }
        if !self.sub_goals.is_empty() {
            let names = if self.sub_goal_names.len() == self.sub_goals.len() {
                self.sub_goal_names.clone()
            } else {
                self.sub_goals.iter().map(|id| format_type_name(id)).collect()
            };
            parts.push(format!("Complete: {}", names.join(", ")));
        }
        if self.state_religion {
            parts.push("Have a State Religion".to_string());
        }
        if self.all_holy_cities {
            parts.push("Hold every Holy City".to_string());
        }
        if let Some(name) = &self.diplomacy_all_name {
            parts.push(format!("{name} with every nation"));
        }
        if let Some(name) = &self.min_opinion_family_name {
            parts.push(format!("Every family at least {name}"));
        }

        parts
    }
}
