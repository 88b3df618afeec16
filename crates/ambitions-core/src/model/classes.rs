//! Ambition class names.

use std::collections::BTreeMap;

/// Class id -> display name, as grouped in the game data.
pub const AMBITION_CLASS_NAMES: &[(i64, &str)] = &[
    (1, "Laws"),
    (2, "Theologies"),
    (3, "Cities"),
    (4, "Tribes"),
    (5, "Production"),
    (6, "Stockpiles"),
    (7, "Workers & Rural"),
    (8, "Rural Improvements"),
    (9, "Wonders"),
    (10, "Culture"),
    (11, "Rural Specialists"),
    (12, "Urban Specialists"),
    (13, "Projects"),
    (14, "Diplomacy"),
    (15, "Religion"),
    (16, "Technology"),
    (17, "Combat"),
    (18, "Promotions"),
    (19, "Units"),
    (20, "Unique Units"),
    (21, "Leaders"),
    (22, "Exploration"),
    (23, "Trade"),
    (24, "Luxuries"),
    (25, "Conquest"),
    (26, "Population"),
    (27, "Urban Buildings"),
    (28, "Religious Buildings"),
    (29, "Urban Development"),
    (30, "Espionage"),
    (31, "Defense"),
    (39, "Repairs"),
    (40, "Lifestyle"),
];

/// Display name for a class id; unknown ids render as `Class <n>`.
pub fn class_name(class: i64) -> String {
    AMBITION_CLASS_NAMES
        .iter()
        .find(|(id, _)| *id == class)
        .map(|(_, name)| name.to_string())
        .unwrap_or_else(|| format!("Class {class}"))
}

pub fn class_table() -> BTreeMap<i64, String> {
    AMBITION_CLASS_NAMES
        .iter()
        .map(|(id, name)| (*id, name.to_string()))
        .collect()
}
