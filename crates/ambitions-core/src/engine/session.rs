//! Interactive session - one [`FilterContext`] driven by UI events.

use std::str::FromStr;
use std::time::{Duration, Instant};

use super::{
    family_options, AvailabilityEngine, CompletedBucket, Debouncer, FamilyOption, FilterContext,
    RankedView,
};
use crate::config::EngineConfig;
use crate::model::AmbitionDocument;

/// A user edit to the filter selections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterEvent {
    SelectNation(Option<String>),
    ToggleFamily(String),
    SetCompleted(CompletedBucket),
    SetCategory(Option<i64>),
    /// Raw contents of the search box after a keystroke
    SearchInput(String),
    SetShowUnavailable(bool),
}

/// Parses one command line such as `nation NATION_ROME`, `completed 3`
/// or `search law`. A bare `nation` or `category` clears the selection.
impl FromStr for FilterEvent {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim_start();
        let (command, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let arg = rest.trim();

        match command {
            "nation" => Ok(Self::SelectNation((!arg.is_empty()).then(|| arg.to_string()))),
            "family" if !arg.is_empty() => Ok(Self::ToggleFamily(arg.to_string())),
            "family" => Err("family needs a family class id".to_string()),
            "completed" => arg.parse().map(Self::SetCompleted),
            "category" if arg.is_empty() => Ok(Self::SetCategory(None)),
            "category" => arg
                .parse()
                .map(|class| Self::SetCategory(Some(class)))
                .map_err(|_| format!("expected a class id, got `{arg}`")),
            // search text is passed through untrimmed, like a text box
            "search" => Ok(Self::SearchInput(rest.to_string())),
            "unavailable" => match arg {
                "on" | "show" => Ok(Self::SetShowUnavailable(true)),
                "off" | "hide" => Ok(Self::SetShowUnavailable(false)),
                _ => Err(format!("expected on or off, got `{arg}`")),
            },
            _ => Err(format!("unknown command `{command}`")),
        }
    }
}

/// Owns the document and the single mutable filter context.
#[derive(Debug)]
pub struct Session {
    document: AmbitionDocument,
    context: FilterContext,
    search: Debouncer<String>,
}

impl Session {
    pub fn new(document: AmbitionDocument, search_delay: Duration) -> Self {
        Self {
            document,
            context: FilterContext::default(),
            search: Debouncer::new(search_delay),
        }
    }

    /// Session using the configured search delay.
    pub fn with_config(document: AmbitionDocument, config: &EngineConfig) -> Self {
        Self::new(document, config.search_debounce())
    }

    /// Start from existing selections instead of an empty context.
    pub fn with_context(mut self, context: FilterContext) -> Self {
        self.context = context;
        self
    }

    pub fn search_delay(&self) -> Duration {
        self.search.delay()
    }

    pub fn document(&self) -> &AmbitionDocument {
        &self.document
    }

    pub fn context(&self) -> &FilterContext {
        &self.context
    }

    /// Apply `event`; returns the recomputed view unless it was deferred.
    ///
    /// Search input is deferred until [`Session::tick`] sees the delay
    /// expire. Any other event commits pending search text first, so the
    /// returned view always reflects the latest input.
    pub fn apply(&mut self, event: FilterEvent, now: Instant) -> Option<RankedView<'_>> {
        tracing::trace!(?event, "Filter event");

        match event {
            FilterEvent::SearchInput(text) => {
                self.search.schedule(now, text);
                return None;
            }
            FilterEvent::SelectNation(nation) => self.context.select_nation(&self.document, nation),
            FilterEvent::ToggleFamily(family) => {
                self.context.toggle_family(&self.document, &family);
            }
            FilterEvent::SetCompleted(bucket) => self.context.completed = bucket,
            FilterEvent::SetCategory(category) => self.context.category = category,
            FilterEvent::SetShowUnavailable(show) => self.context.show_unavailable = show,
        }

        if let Some(text) = self.search.cancel() {
            self.context.search = text;
        }
        Some(self.view())
    }

    /// Commit debounced search text once due; returns the recomputed view.
    pub fn tick(&mut self, now: Instant) -> Option<RankedView<'_>> {
        let text = self.search.poll(now)?;
        self.context.search = text;
        Some(self.view())
    }

    /// When the pending search text becomes due.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.search.deadline()
    }

    pub fn view(&self) -> RankedView<'_> {
        AvailabilityEngine::rank(&self.document.ambitions, &self.context)
    }

    pub fn family_options(&self) -> Vec<FamilyOption<'_>> {
        family_options(&self.document, &self.context)
    }
}
