//! Ambitions Core - ambition data pipeline and availability engine
//!
//! This crate reads the game's reference records, resolves localized
//! text and cross-references, normalizes every ambition into a typed
//! model, and ranks ambitions against the player's filter selections.

pub mod catalog;
pub mod config;
pub mod engine;
pub mod extract;
pub mod model;
pub mod pipeline;
pub mod records;

pub use catalog::{Category, LinkResolver, TextCatalog, TypeCatalog};
pub use config::PipelineConfig;
pub use engine::{AvailabilityEngine, CompletedBucket, FilterContext, FilterEvent, RankedView, Session};
pub use extract::{EventSourceAnnotator, RequirementExtractor};
pub use model::{Ambition, AmbitionDocument, Nation, Requirements};
pub use pipeline::{BuildReport, Pipeline};
pub use records::{MemorySource, Record, RecordSource, XmlDirectory};
