use std::collections::BTreeMap;

use chrono::{TimeZone, Utc};

use ambitions_core::engine::{class_options, family_options, nation_options, RankedAmbition};
use ambitions_core::model::{class_table, FamilyClass, Filters, Flags, Nation};
use ambitions_core::{Ambition, AmbitionDocument, AvailabilityEngine, CompletedBucket, FilterContext};

fn ambition(id: &str, name: &str, min_tier: i64, max_tier: i64) -> Ambition {
    Ambition {
        id: id.to_string(),
        name: name.to_string(),
        short_name: String::new(),
        help_text: String::new(),
        ambition_class: 5,
        ambition_class_name: "Production".to_string(),
        min_tier,
        max_tier,
        subject_weight: 5,
        dlc: None,
        requirements: Default::default(),
        filters: Filters::default(),
        flags: Flags::default(),
        event_source: None,
    }
}

fn national(id: &str, name: &str) -> Ambition {
    let mut a = ambition(id, name, 10, 10);
    a.flags.victory_eligible = true;
    a
}

fn roman(id: &str, name: &str, min_tier: i64) -> Ambition {
    let mut a = ambition(id, name, min_tier, 10);
    a.filters.nation_prereq = Some("NATION_ROME".to_string());
    a.filters.nation_prereq_name = Some("Rome".to_string());
    a
}

fn sages(id: &str, name: &str, min_tier: i64) -> Ambition {
    let mut a = ambition(id, name, min_tier, 10);
    a.filters.family_classes = vec!["FAMILYCLASS_SAGES".to_string()];
    a.filters.family_class_names = vec!["Sages".to_string()];
    a
}

fn sample() -> Vec<Ambition> {
    vec![
        ambition("GOAL_C", "Charter", 2, 6),
        roman("GOAL_ROME", "Aqueducts", 2),
        sages("GOAL_SAGES", "Archive", 1),
        ambition("GOAL_B", "Bazaar", 2, 10),
        ambition("GOAL_RANGE", "Ranged", 3, 7),
        national("GOAL_WONDERS", "Seven Wonders"),
        national("GOAL_GLORY", "Glory"),
        // minTier 10 without the victory flag stays regular
        ambition("GOAL_LATE", "Late", 10, 10),
    ]
}

fn ids<'a>(entries: &'a [RankedAmbition<'_>]) -> Vec<&'a str> {
    entries.iter().map(|e| e.ambition.id.as_str()).collect()
}

fn document() -> AmbitionDocument {
    let mut nations = BTreeMap::new();
    for (id, name, dlc, classes) in [
        ("NATION_ROME", "Rome", None, vec!["FAMILYCLASS_CHAMPIONS"]),
        ("NATION_ASSYRIA", "Assyria", None, vec!["FAMILYCLASS_SAGES"]),
        ("NATION_HITTITE", "Hatti", Some("DLC_HEROES"), vec![]),
        ("NATION_AKSUM", "Aksum", Some("DLC_AKSUM"), vec![]),
    ] {
        nations.insert(
            id.to_string(),
            Nation {
                id: id.to_string(),
                name: name.to_string(),
                dlc: dlc.map(str::to_string),
                family_classes: classes.into_iter().map(str::to_string).collect(),
            },
        );
    }

    let mut family_classes = BTreeMap::new();
    for (id, name) in [("FAMILYCLASS_SAGES", "Sages"), ("FAMILYCLASS_CHAMPIONS", "Champions")] {
        family_classes.insert(
            id.to_string(),
            FamilyClass {
                id: id.to_string(),
                name: name.to_string(),
            },
        );
    }

    AmbitionDocument {
        version: "1.0".to_string(),
        generated_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        ambition_classes: class_table(),
        family_classes,
        nations,
        ambitions: sample(),
    }
}

#[test]
fn partitions_cover_the_filtered_set_exactly_once() {
    let ambitions = sample();
    let ctx = FilterContext {
        show_unavailable: true,
        ..FilterContext::default()
    };
    let view = AvailabilityEngine::rank(&ambitions, &ctx);

    assert_eq!(ids(&view.national.entries), vec!["GOAL_GLORY", "GOAL_WONDERS"]);
    assert_eq!(view.regular.total + view.national.total, ambitions.len());

    let mut all: Vec<&str> = ids(&view.regular.entries);
    all.extend(ids(&view.national.entries));
    all.sort_unstable();
    let mut expected: Vec<&str> = ambitions.iter().map(|a| a.id.as_str()).collect();
    expected.sort_unstable();
    assert_eq!(all, expected);
}

#[test]
fn no_selection_makes_everything_available() {
    let ambitions = sample();
    let view = AvailabilityEngine::rank(&ambitions, &FilterContext::default());

    assert_eq!(view.regular.available, view.regular.total);
    assert_eq!(view.national.available, view.national.total);
    assert!(view
        .regular
        .entries
        .iter()
        .all(|e| e.availability.available && e.availability.reasons.is_empty()));
}

#[test]
fn sort_is_availability_then_tier_then_name() {
    let ambitions = sample();
    let ctx = FilterContext {
        nation: Some("NATION_EGYPT".to_string()),
        families: vec!["FAMILYCLASS_CHAMPIONS".to_string()],
        show_unavailable: true,
        ..FilterContext::default()
    };
    let view = AvailabilityEngine::rank(&ambitions, &ctx);

    assert_eq!(
        ids(&view.regular.entries),
        vec!["GOAL_B", "GOAL_C", "GOAL_RANGE", "GOAL_LATE", "GOAL_SAGES", "GOAL_ROME"]
    );
    assert_eq!(view.regular.available, 4);
    assert_eq!(view.regular.total, 6);
}

#[test]
fn hiding_unavailable_preserves_relative_order() {
    let ambitions = sample();
    let mut ctx = FilterContext {
        nation: Some("NATION_EGYPT".to_string()),
        families: vec!["FAMILYCLASS_CHAMPIONS".to_string()],
        show_unavailable: true,
        ..FilterContext::default()
    };
    let shown = AvailabilityEngine::rank(&ambitions, &ctx);
    let kept: Vec<&str> = shown
        .regular
        .entries
        .iter()
        .filter(|e| e.availability.available)
        .map(|e| e.ambition.id.as_str())
        .collect();

    ctx.show_unavailable = false;
    let hidden = AvailabilityEngine::rank(&ambitions, &ctx);

    assert_eq!(ids(&hidden.regular.entries), kept);
    assert_eq!(hidden.regular.total, shown.regular.total);
    assert_eq!(hidden.regular.available, shown.regular.available);
}

#[test]
fn tier_filter_uses_completed_count_plus_one() {
    let ambitions = sample();

    let ctx = FilterContext {
        completed: CompletedBucket::Count(4),
        ..FilterContext::default()
    };
    let view = AvailabilityEngine::rank(&ambitions, &ctx);
    assert!(ids(&view.regular.entries).contains(&"GOAL_RANGE"));
    assert!(!ids(&view.regular.entries).contains(&"GOAL_LATE"));

    let ctx = FilterContext {
        completed: CompletedBucket::Count(7),
        ..FilterContext::default()
    };
    let view = AvailabilityEngine::rank(&ambitions, &ctx);
    assert!(!ids(&view.regular.entries).contains(&"GOAL_RANGE"));
    assert!(view.summary().contains("at Tier 8"));
}

#[test]
fn category_and_unknown_ids_never_fail() {
    let ambitions = sample();

    let ctx = FilterContext {
        category: Some(99),
        nation: Some("NATION_NOWHERE".to_string()),
        ..FilterContext::default()
    };
    let view = AvailabilityEngine::rank(&ambitions, &ctx);
    assert!(view.is_empty());
    assert_eq!(view.summary(), "0 available (0 total) + 0 national");
}

#[test]
fn nation_options_list_base_game_before_content_packs() {
    let doc = document();
    let names: Vec<&str> = nation_options(&doc).iter().map(|n| n.name.as_str()).collect();
    assert_eq!(names, vec!["Assyria", "Rome", "Aksum", "Hatti"]);
}

#[test]
fn class_options_are_sorted_by_name() {
    let doc = document();
    let options = class_options(&doc);
    assert_eq!(options.len(), doc.ambition_classes.len());
    assert_eq!(options[0], (3, "Cities"));
    assert!(options.windows(2).all(|w| w[0].1 <= w[1].1));
}

#[test]
fn selecting_a_nation_prunes_and_disables_families() {
    let doc = document();
    let mut ctx = FilterContext::new();
    ctx.toggle_family(&doc, "FAMILYCLASS_SAGES");
    ctx.toggle_family(&doc, "FAMILYCLASS_CHAMPIONS");

    ctx.select_nation(&doc, Some("NATION_ASSYRIA".to_string()));
    assert_eq!(ctx.families, vec!["FAMILYCLASS_SAGES"]);

    let options = family_options(&doc, &ctx);
    let summary: Vec<(&str, bool, bool)> = options.iter().map(|o| (o.name, o.enabled, o.checked)).collect();
    assert_eq!(summary, vec![("Champions", false, false), ("Sages", true, true)]);

    ctx.select_nation(&doc, None);
    assert!(family_options(&doc, &ctx).iter().all(|o| o.enabled));
    assert_eq!(ctx.families, vec!["FAMILYCLASS_SAGES"]);
}
