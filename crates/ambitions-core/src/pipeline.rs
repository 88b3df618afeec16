//! Build pipeline - reference records in, published document out.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};

use crate::catalog::{TextCatalog, TypeCatalog};
use crate::config::PipelineConfig;
use crate::extract::{
    extract_family_classes, extract_nations, EventSourceAnnotator, RequirementExtractor,
};
use crate::model::{class_table, Ambition, AmbitionDocument};
use crate::records::{Record, RecordSource, XmlDirectory};

pub const GOAL_SOURCE: &str = "goal.xml";
pub const FAMILY_CLASS_SOURCE: &str = "familyClass.xml";
pub const FAMILY_SOURCE: &str = "family.xml";
pub const NATION_SOURCE: &str = "nation.xml";

/// Counts reported after a build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildReport {
    pub output: PathBuf,
    pub ambitions: usize,
    pub national: usize,
    pub event_only: usize,
    pub nations: usize,
    pub family_classes: usize,
}

impl BuildReport {
    fn new(output: PathBuf, document: &AmbitionDocument) -> Self {
        Self {
            output,
            ambitions: document.ambitions.len(),
            national: document.ambitions.iter().filter(|a| a.is_national()).count(),
            event_only: document
                .ambitions
                .iter()
                .filter(|a| a.event_source.is_some())
                .count(),
            nations: document.nations.len(),
            family_classes: document.family_classes.len(),
        }
    }
}

/// One build over a record source.
pub struct Pipeline<'a> {
    source: &'a dyn RecordSource,
    config: &'a PipelineConfig,
    annotator: EventSourceAnnotator,
}

impl<'a> Pipeline<'a> {
    pub fn new(source: &'a dyn RecordSource, config: &'a PipelineConfig) -> Self {
        Self {
            source,
            config,
            annotator: EventSourceAnnotator::builtin(),
        }
    }

    /// Build the document, stamped with the current time.
    pub fn build(&self) -> Result<AmbitionDocument> {
        self.build_at(Utc::now())
    }

    pub fn build_at(&self, generated_at: DateTime<Utc>) -> Result<AmbitionDocument> {
        let goals = self
            .source
            .records(GOAL_SOURCE)
            .with_context(|| format!("Failed to read ambition source {GOAL_SOURCE}"))?
            .with_context(|| format!("Ambition source {GOAL_SOURCE} not found"))?;

        let text_sources = self.config.text_source_names(self.source);
        let texts = TextCatalog::load(self.source, &text_sources, &self.config.language);
        tracing::info!(
            sources = text_sources.len(),
            entries = texts.len(),
            "Loaded text catalog"
        );

        let types = TypeCatalog::load(self.source);
        for (id, categories) in types.collisions() {
            let names: Vec<&str> = categories.iter().map(|c| c.name()).collect();
            tracing::warn!(
                id = %id,
                categories = %names.join(", "),
                "Type id defined in several categories, first category wins"
            );
        }

        let extractor = RequirementExtractor::new(&texts, &types, &self.annotator);
        let mut ambitions =
            dedup_ambitions(goals.iter().filter_map(|record| extractor.extract(record)));
        name_sub_goals(&mut ambitions);

        let family_classes = extract_family_classes(&self.optional(FAMILY_CLASS_SOURCE), &texts);
        let nations = extract_nations(
            &self.optional(NATION_SOURCE),
            &self.optional(FAMILY_SOURCE),
            &texts,
        );

        tracing::info!(
            ambitions = ambitions.len(),
            records = goals.len(),
            nations = nations.len(),
            family_classes = family_classes.len(),
            "Extracted ambitions"
        );

        Ok(AmbitionDocument {
            version: self.config.version.clone(),
            generated_at,
            ambition_classes: class_table(),
            family_classes,
            nations,
            ambitions,
        })
    }

    /// Records of a supporting source; problems only cost its contribution.
    fn optional(&self, name: &str) -> Vec<Record> {
        match self.source.records(name) {
            Ok(Some(records)) => records,
            Ok(None) => {
                tracing::warn!(source = name, "Source not found, continuing without it");
                Vec::new()
            }
            Err(err) => {
                tracing::warn!(source = name, error = %err, "Skipping unreadable source");
                Vec::new()
            }
        }
    }
}

/// Keep the first ambition for every id.
fn dedup_ambitions(ambitions: impl Iterator<Item = Ambition>) -> Vec<Ambition> {
    let mut seen = HashSet::new();
    ambitions
        .filter(|ambition| {
            let fresh = seen.insert(ambition.id.clone());
            if !fresh {
                tracing::warn!(ambition = %ambition.id, "Dropping duplicate ambition id");
            }
            fresh
        })
        .collect()
}

/// Label sub-goals with the display name of the ambition they reference.
fn name_sub_goals(ambitions: &mut [Ambition]) {
    let names: HashMap<String, String> = ambitions
        .iter()
        .map(|a| (a.id.clone(), a.name.clone()))
        .collect();

    for ambition in ambitions.iter_mut() {
        let req = &mut ambition.requirements;
        for (id, name) in req.sub_goals.iter().zip(req.sub_goal_names.iter_mut()) {
            match names.get(id) {
                Some(resolved) => *name = resolved.clone(),
                None => tracing::debug!(ambition = %ambition.id, sub_goal = %id, "Sub-goal not found"),
            }
        }
    }
}

/// Write `document` as pretty JSON, creating parent directories.
pub fn write_document(document: &AmbitionDocument, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let json = document
        .to_json_pretty()
        .context("Failed to serialize ambition document")?;
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

/// Read a previously written document.
pub fn read_document(path: &Path) -> Result<AmbitionDocument> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    AmbitionDocument::from_json(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

/// Run a full build from the configured reference directory.
///
/// `config` paths are used as given; call
/// [`PipelineConfig::resolve_paths`] first for project-relative paths.
pub fn run(config: &PipelineConfig) -> Result<BuildReport> {
    let source = XmlDirectory::new(&config.reference_dir);
    if !source.exists() {
        bail!(
            "Reference directory not found: {}",
            config.reference_dir.display()
        );
    }

    tracing::info!(reference = %config.reference_dir.display(), "Building ambition document");

    let document = Pipeline::new(&source, config).build()?;
    write_document(&document, &config.output)?;

    let report = BuildReport::new(config.output.clone(), &document);
    tracing::info!(
        output = %report.output.display(),
        ambitions = report.ambitions,
        national = report.national,
        event_only = report.event_only,
        "Wrote ambition document"
    );
    Ok(report)
}
