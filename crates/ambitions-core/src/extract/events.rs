//! Event-only ambitions and the narrative events that grant them.

use crate::model::EventSource;

#[derive(Debug)]
pub struct EventOnlyEntry {
    pub ambition: &'static str,
    pub event_name: Option<&'static str>,
    pub event_dlc: Option<&'static str>,
    pub trigger: &'static str,
}

const BEHIND_THE_THRONE: Option<&str> = Some("Behind the Throne");
const SACRED_AND_PROFANE: Option<&str> = Some("Sacred and Profane");

/// Ambitions that are never offered randomly (subject weight 0).
pub static EVENT_ONLY_AMBITIONS: &[EventOnlyEntry] = &[
    EventOnlyEntry {
        ambition: "GOAL_LOSE_A_CITY",
        event_name: Some("Strength and Weakness"),
        event_dlc: BEHIND_THE_THRONE,
        trigger: "Leader must be Insane, 3+ upset families",
    },
    EventOnlyEntry {
        ambition: "GOAL_FURIOUS_FAMILY",
        event_name: Some("Strength and Weakness"),
        event_dlc: BEHIND_THE_THRONE,
        trigger: "Leader must be Insane, 3+ upset families",
    },
    EventOnlyEntry {
        ambition: "GOAL_TO_BE_KING",
        event_name: Some("To Be A King/Queen"),
        event_dlc: None,
        trigger: "Regent ruling with Rightful Heir alive",
    },
    EventOnlyEntry {
        ambition: "GOAL_THE_GREAT",
        event_name: Some("The Road to Glory"),
        event_dlc: None,
        trigger: "Young leader (under 30) with 2+ dead ancestors, on succession",
    },
    EventOnlyEntry {
        ambition: "GOAL_DESTROY_RIVALS",
        event_name: Some("Rivals event chain (Let the Land Burn / No Surrender)"),
        event_dlc: None,
        trigger: "At war, breach enemy city, part of Rivals chain",
    },
    EventOnlyEntry {
        ambition: "GOAL_KILL_CHARACTER",
        event_name: Some("[Character's] Mark"),
        event_dlc: BEHIND_THE_THRONE,
        trigger: "Child of leader (teen+), angry foreign leader nearby, have spymaster",
    },
    EventOnlyEntry {
        ambition: "GOAL_HARVEST_WINE",
        event_name: Some("A Refined Palate"),
        event_dlc: BEHIND_THE_THRONE,
        trigger: "Leader has high Charisma, unclaimed wine within 5 tiles",
    },
    EventOnlyEntry {
        ambition: "GOAL_TAKE_HANGING_GARDENS",
        event_name: Some("The Jewel of [Nation]"),
        event_dlc: BEHIND_THE_THRONE,
        trigger: "Another nation owns the Hanging Gardens",
    },
    EventOnlyEntry {
        ambition: "GOAL_TAKE_CITY",
        event_name: Some("Various conquest/rivalry events"),
        event_dlc: None,
        trigger: "Rivalry or conquest event chains",
    },
    EventOnlyEntry {
        ambition: "GOAL_STATE_RELIGION_SPECIFIC",
        event_name: Some("The Tutor Kartir"),
        event_dlc: SACRED_AND_PROFANE,
        trigger: "Character studying, Zoroastrian city, Kartir tutor",
    },
    EventOnlyEntry {
        ambition: "GOAL_EIGHT_RELIGION_SPREAD_SPECIFIC",
        event_name: Some("In Heaven as on Earth"),
        event_dlc: SACRED_AND_PROFANE,
        trigger: "Augustine character, Christianity, after High Synod mission",
    },
    EventOnlyEntry {
        ambition: "GOAL_FOUR_RELIGION_SPREAD_SPECIFIC",
        event_name: Some("Religion events"),
        event_dlc: SACRED_AND_PROFANE,
        trigger: "Religion-specific event chains",
    },
    EventOnlyEntry {
        ambition: "GOAL_2000_EACH_YIELD",
        event_name: None,
        event_dlc: None,
        trigger: "Unused/placeholder goal",
    },
];

/// Lookup of event metadata by ambition id.
#[derive(Debug, Clone, Copy)]
pub struct EventSourceAnnotator {
    entries: &'static [EventOnlyEntry],
}

impl Default for EventSourceAnnotator {
    fn default() -> Self {
        Self::builtin()
    }
}

impl EventSourceAnnotator {
    pub fn builtin() -> Self {
        Self {
            entries: EVENT_ONLY_AMBITIONS,
        }
    }

    pub fn lookup(&self, ambition_id: &str) -> Option<EventSource> {
        self.entries
            .iter()
            .find(|entry| entry.ambition == ambition_id)
            .map(|entry| EventSource {
                event_name: entry.event_name.map(str::to_string),
                event_dlc: entry.event_dlc.map(str::to_string),
                trigger: entry.trigger.to_string(),
            })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_copies_entries_verbatim() {
        let annotator = EventSourceAnnotator::builtin();

        let source = annotator.lookup("GOAL_HARVEST_WINE").unwrap();
        assert_eq!(source.event_name.as_deref(), Some("A Refined Palate"));
        assert_eq!(source.event_dlc.as_deref(), Some("Behind the Throne"));

        let placeholder = annotator.lookup("GOAL_2000_EACH_YIELD").unwrap();
        assert_eq!(placeholder.event_name, None);
        assert_eq!(placeholder.trigger, "Unused/placeholder goal");

        assert!(annotator.lookup("GOAL_SIX_CITIES").is_none());
    }

    #[test]
    fn builtin_ids_are_unique() {
        let mut ids: Vec<&str> = EVENT_ONLY_AMBITIONS.iter().map(|e| e.ambition).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), EventSourceAnnotator::builtin().len());
    }
}
