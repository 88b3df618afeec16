//! Availability engine - filters, annotates and ranks ambitions for one
//! [`FilterContext`].
//!
//! Every call recomputes from scratch. Nothing here fails: unknown nation,
//! family or class ids simply do not match.

pub mod debounce;
pub mod session;

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::model::{Ambition, AmbitionDocument, Nation};

pub use debounce::Debouncer;
pub use session::{FilterEvent, Session};

/// Highest selectable completed-ambitions count.
pub const MAX_COMPLETED: u8 = 9;

/// How many ambitions the player has completed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CompletedBucket {
    /// No tier filtering
    #[default]
    All,
    Count(u8),
}

impl CompletedBucket {
    /// Tier of the next ambition offered, `None` for [`CompletedBucket::All`].
    pub fn target_tier(self) -> Option<i64> {
        match self {
            Self::All => None,
            Self::Count(n) => Some(i64::from(n) + 1),
        }
    }
}

impl FromStr for CompletedBucket {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        match s.parse::<u8>() {
            Ok(n) if n <= MAX_COMPLETED => Ok(Self::Count(n)),
            _ => Err(format!("expected `all` or 0-{MAX_COMPLETED}, got `{s}`")),
        }
    }
}

impl fmt::Display for CompletedBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Count(n) => write!(f, "{n}"),
        }
    }
}

/// The user's current filter selections.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterContext {
    pub nation: Option<String>,
    /// Selected family classes, in selection order
    pub families: Vec<String>,
    pub completed: CompletedBucket,
    pub category: Option<i64>,
    pub search: String,
    pub show_unavailable: bool,
}

impl FilterContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select (or clear) the nation, dropping families it does not offer.
    pub fn select_nation(&mut self, doc: &AmbitionDocument, nation: Option<String>) {
        self.nation = nation;
        let offered = self.nation.as_deref().map(|id| doc.nations.get(id));
        if let Some(nation) = offered {
            self.families
                .retain(|family| nation.is_some_and(|n| n.offers_family(family)));
        }
    }

    /// Add the family class if absent, remove it otherwise.
    ///
    /// A family the selected nation does not offer cannot be added; returns
    /// whether the selection changed.
    pub fn toggle_family(&mut self, doc: &AmbitionDocument, family: &str) -> bool {
        if let Some(index) = self.families.iter().position(|f| f == family) {
            self.families.remove(index);
            return true;
        }
        if !self.family_offered(doc, family) {
            tracing::debug!(family, nation = ?self.nation, "Family not offered by selected nation");
            return false;
        }
        self.families.push(family.to_string());
        true
    }

    /// Whether `family` is selectable: no nation selected, or the nation lists it.
    pub fn family_offered(&self, doc: &AmbitionDocument, family: &str) -> bool {
        match self.nation.as_deref() {
            None => true,
            Some(id) => doc.nations.get(id).is_some_and(|n| n.offers_family(family)),
        }
    }

    pub fn has_family(&self, family: &str) -> bool {
        self.families.iter().any(|f| f == family)
    }

    /// Normalized search term, `None` when search is inactive.
    fn search_term(&self) -> Option<String> {
        let term = self.search.trim().to_lowercase();
        (!term.is_empty()).then_some(term)
    }
}

/// Whether an ambition can be offered under the current selections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Availability {
    pub available: bool,
    pub reasons: Vec<String>,
}

impl Availability {
    pub fn check(ambition: &Ambition, ctx: &FilterContext) -> Self {
        let filters = &ambition.filters;
        let mut reasons = Vec::new();

        if let (Some(required), Some(selected)) = (&filters.nation_prereq, &ctx.nation) {
            if required != selected {
                let name = filters.nation_prereq_name.as_deref().unwrap_or(required.as_str());
                reasons.push(format!("Requires {name}"));
            }
        }

        if !filters.family_classes.is_empty()
            && !ctx.families.is_empty()
            && !filters.family_classes.iter().any(|fc| ctx.has_family(fc))
        {
            reasons.push(format!(
                "Preferred by: {}",
                filters.family_class_names.join(", ")
            ));
        }

        Self {
            available: reasons.is_empty(),
            reasons,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RankedAmbition<'a> {
    pub ambition: &'a Ambition,
    pub availability: Availability,
}

/// One ranked partition.
#[derive(Debug, Clone, Default)]
pub struct Section<'a> {
    pub entries: Vec<RankedAmbition<'a>>,
    /// Available ambitions in the filtered set
    pub available: usize,
    /// Size of the filtered set, before hiding unavailable entries
    pub total: usize,
}

/// Ranked regular and national ambitions.
#[derive(Debug, Clone, Default)]
pub struct RankedView<'a> {
    pub regular: Section<'a>,
    pub national: Section<'a>,
    pub target_tier: Option<i64>,
}

impl RankedView<'_> {
    /// Result line such as `12 available at Tier 3 (20 total) + 2 national`.
    pub fn summary(&self) -> String {
        let tier = self
            .target_tier
            .map(|t| format!(" at Tier {t}"))
            .unwrap_or_default();
        format!(
            "{} available{} ({} total) + {} national",
            self.regular.available, tier, self.regular.total, self.national.available
        )
    }

    pub fn is_empty(&self) -> bool {
        self.regular.entries.is_empty() && self.national.entries.is_empty()
    }
}

/// Stateless ranking over a slice of ambitions.
#[derive(Debug, Clone, Copy, Default)]
pub struct AvailabilityEngine;

impl AvailabilityEngine {
    pub fn rank<'a>(ambitions: &'a [Ambition], ctx: &FilterContext) -> RankedView<'a> {
        let target_tier = ctx.completed.target_tier();
        let term = ctx.search_term();

        let (national, regular): (Vec<&Ambition>, Vec<&Ambition>) =
            ambitions.iter().partition(|a| a.is_national());

        let keep = |a: &&Ambition| {
            target_tier.map_or(true, |tier| a.offered_at(tier))
                && ctx.category.map_or(true, |class| a.ambition_class == class)
                && term.as_deref().map_or(true, |term| matches_search(a, term))
        };

        RankedView {
            regular: rank_section(regular.into_iter().filter(keep), ctx),
            national: rank_section(national.into_iter().filter(keep), ctx),
            target_tier,
        }
    }
}

fn matches_search(ambition: &Ambition, term: &str) -> bool {
    let mut haystack = format!(
        "{} {} {}",
        ambition.name, ambition.ambition_class_name, ambition.help_text
    );
    for name in &ambition.filters.family_class_names {
        haystack.push(' ');
        haystack.push_str(name);
    }
    haystack.to_lowercase().contains(term)
}

fn rank_section<'a>(
    ambitions: impl Iterator<Item = &'a Ambition>,
    ctx: &FilterContext,
) -> Section<'a> {
    let mut entries: Vec<RankedAmbition<'a>> = ambitions
        .map(|ambition| RankedAmbition {
            ambition,
            availability: Availability::check(ambition, ctx),
        })
        .collect();

    entries.sort_by(compare_entries);

    let total = entries.len();
    let available = entries.iter().filter(|e| e.availability.available).count();
    if !ctx.show_unavailable {
        entries.retain(|e| e.availability.available);
    }

    Section {
        entries,
        available,
        total,
    }
}

fn compare_entries(a: &RankedAmbition<'_>, b: &RankedAmbition<'_>) -> Ordering {
    b.availability
        .available
        .cmp(&a.availability.available)
        .then_with(|| a.ambition.min_tier.cmp(&b.ambition.min_tier))
        .then_with(|| a.ambition.name.cmp(&b.ambition.name))
        .then_with(|| a.ambition.id.cmp(&b.ambition.id))
}

/// Nations for a selector: base game first, then content packs, each by name.
pub fn nation_options(doc: &AmbitionDocument) -> Vec<&Nation> {
    let mut nations: Vec<&Nation> = doc.nations.values().collect();
    nations.sort_by(|a, b| {
        a.dlc
            .is_some()
            .cmp(&b.dlc.is_some())
            .then_with(|| a.name.cmp(&b.name))
            .then_with(|| a.id.cmp(&b.id))
    });
    nations
}

/// `(class id, class name)` pairs sorted by name.
pub fn class_options(doc: &AmbitionDocument) -> Vec<(i64, &str)> {
    let mut classes: Vec<(i64, &str)> = doc
        .ambition_classes
        .iter()
        .map(|(id, name)| (*id, name.as_str()))
        .collect();
    classes.sort_by(|a, b| a.1.cmp(b.1).then(a.0.cmp(&b.0)));
    classes
}

/// A family-class checkbox.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FamilyOption<'a> {
    pub id: &'a str,
    pub name: &'a str,
    /// Offered by the selected nation (always true with no nation)
    pub enabled: bool,
    pub checked: bool,
}

/// Family classes sorted by name, marked against the current selections.
pub fn family_options<'a>(doc: &'a AmbitionDocument, ctx: &FilterContext) -> Vec<FamilyOption<'a>> {
    let mut options: Vec<FamilyOption<'a>> = doc
        .family_classes
        .values()
        .map(|fc| FamilyOption {
            id: &fc.id,
            name: &fc.name,
            enabled: ctx.family_offered(doc, &fc.id),
            checked: ctx.has_family(&fc.id),
        })
        .collect();
    options.sort_by(|a, b| a.name.cmp(b.name).then(a.id.cmp(b.id)));
    options
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use chrono::Utc;

    use super::*;
    use crate::model::{Filters, Flags};

    fn document(nations: &[(&str, &[&str])]) -> AmbitionDocument {
        AmbitionDocument {
            version: "1.0".to_string(),
            generated_at: Utc::now(),
            ambition_classes: BTreeMap::new(),
            family_classes: BTreeMap::new(),
            nations: nations
                .iter()
                .map(|(id, families)| {
                    let nation = Nation {
                        id: id.to_string(),
                        name: id.to_string(),
                        dlc: None,
                        family_classes: families.iter().map(|f| f.to_string()).collect(),
                    };
                    (id.to_string(), nation)
                })
                .collect(),
            ambitions: Vec::new(),
        }
    }

    fn ambition(id: &str, name: &str, min_tier: i64) -> Ambition {
        Ambition {
            id: id.to_string(),
            name: name.to_string(),
            short_name: String::new(),
            help_text: String::new(),
            ambition_class: 3,
            ambition_class_name: "Cities".to_string(),
            min_tier,
            max_tier: 10,
            subject_weight: 1,
            dlc: None,
            requirements: Default::default(),
            filters: Filters::default(),
            flags: Flags::default(),
            event_source: None,
        }
    }

    #[test]
    fn completed_bucket_parses_all_and_counts() {
        assert_eq!("all".parse::<CompletedBucket>(), Ok(CompletedBucket::All));
        assert_eq!("4".parse::<CompletedBucket>(), Ok(CompletedBucket::Count(4)));
        assert!("10".parse::<CompletedBucket>().is_err());
        assert_eq!(CompletedBucket::Count(4).target_tier(), Some(5));
        assert_eq!(CompletedBucket::All.target_tier(), None);
    }

    #[test]
    fn toggling_families_keeps_selection_order() {
        let doc = document(&[]);
        let mut ctx = FilterContext::new();
        ctx.toggle_family(&doc, "FAMILYCLASS_SAGES");
        ctx.toggle_family(&doc, "FAMILYCLASS_CHAMPIONS");
        ctx.toggle_family(&doc, "FAMILYCLASS_TRADERS");
        ctx.toggle_family(&doc, "FAMILYCLASS_CHAMPIONS");

        assert_eq!(ctx.families, vec!["FAMILYCLASS_SAGES", "FAMILYCLASS_TRADERS"]);
    }

    #[test]
    fn families_the_nation_does_not_offer_cannot_be_selected() {
        let doc = document(&[("NATION_ROME", &["FAMILYCLASS_CHAMPIONS"][..])]);
        let mut ctx = FilterContext::new();
        ctx.select_nation(&doc, Some("NATION_ROME".to_string()));

        assert!(!ctx.toggle_family(&doc, "FAMILYCLASS_SAGES"));
        assert!(ctx.families.is_empty());

        let mut a = ambition("GOAL_LEARNING", "Learning", 2);
        a.filters.family_classes = vec!["FAMILYCLASS_CLERICS".to_string()];
        a.filters.family_class_names = vec!["Clerics".to_string()];
        assert!(Availability::check(&a, &ctx).available);

        assert!(ctx.toggle_family(&doc, "FAMILYCLASS_CHAMPIONS"));
        assert_eq!(ctx.families, vec!["FAMILYCLASS_CHAMPIONS"]);

        ctx.select_nation(&doc, Some("NATION_NOWHERE".to_string()));
        assert!(!ctx.toggle_family(&doc, "FAMILYCLASS_CHAMPIONS"));
    }

    #[test]
    fn nation_conflicts_report_reasons() {
        let mut a = ambition("GOAL_ROME", "Eternal City", 2);
        a.filters.nation_prereq = Some("NATION_ROME".to_string());
        a.filters.nation_prereq_name = Some("Rome".to_string());

        let ctx = FilterContext {
            nation: Some("NATION_EGYPT".to_string()),
            ..FilterContext::default()
        };
        let availability = Availability::check(&a, &ctx);
        assert!(!availability.available);
        assert_eq!(availability.reasons, vec!["Requires Rome"]);

        let ctx = FilterContext {
            nation: Some("NATION_ROME".to_string()),
            ..FilterContext::default()
        };
        assert!(Availability::check(&a, &ctx).available);
    }

    #[test]
    fn family_mismatch_lists_preferred_families() {
        let mut a = ambition("GOAL_LEARNING", "Learning", 2);
        a.filters.family_classes = vec!["FAMILYCLASS_SAGES".to_string(), "FAMILYCLASS_CLERICS".to_string()];
        a.filters.family_class_names = vec!["Sages".to_string(), "Clerics".to_string()];

        let doc = document(&[]);
        let mut ctx = FilterContext::new();
        ctx.toggle_family(&doc, "FAMILYCLASS_CHAMPIONS");
        let availability = Availability::check(&a, &ctx);
        assert_eq!(availability.reasons, vec!["Preferred by: Sages, Clerics"]);

        ctx.toggle_family(&doc, "FAMILYCLASS_CLERICS");
        assert!(Availability::check(&a, &ctx).available);
    }

    #[test]
    fn search_matches_class_and_family_names() {
        let mut a = ambition("GOAL_A", "Six Cities", 1);
        a.filters.family_class_names = vec!["Landowners".to_string()];
        let ambitions = vec![a, ambition("GOAL_B", "Other", 1)];

        let ctx = FilterContext {
            search: "  LANDOWN ".to_string(),
            show_unavailable: true,
            ..FilterContext::default()
        };
        let view = AvailabilityEngine::rank(&ambitions, &ctx);
        assert_eq!(view.regular.total, 1);

        let ctx = FilterContext {
            search: "cities".to_string(),
            ..FilterContext::default()
        };
        assert_eq!(AvailabilityEngine::rank(&ambitions, &ctx).regular.total, 2);
    }

    #[test]
    fn summary_mentions_tier_only_for_specific_bucket() {
        let ambitions = vec![ambition("GOAL_A", "A", 1), ambition("GOAL_B", "B", 4)];

        let ctx = FilterContext::default();
        let view = AvailabilityEngine::rank(&ambitions, &ctx);
        assert_eq!(view.summary(), "2 available (2 total) + 0 national");

        let ctx = FilterContext {
            completed: CompletedBucket::Count(2),
            ..FilterContext::default()
        };
        let view = AvailabilityEngine::rank(&ambitions, &ctx);
        assert_eq!(view.summary(), "1 available at Tier 3 (1 total) + 0 national");
    }

    #[test]
    fn equal_names_are_ordered_by_id() {
        let ambitions = vec![ambition("GOAL_B", "Same", 1), ambition("GOAL_A", "Same", 1)];
        let view = AvailabilityEngine::rank(&ambitions, &FilterContext::default());
        let ids: Vec<&str> = view.regular.entries.iter().map(|e| e.ambition.id.as_str()).collect();
        assert_eq!(ids, vec!["GOAL_A", "GOAL_B"]);
    }
}
