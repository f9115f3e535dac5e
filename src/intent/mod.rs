//! The tag-normalization and intent-resolution engine.
//!
//! Data flows adapter → sanitizer → builder (hierarchy resolution +
//! allocation): the [`classifier::IntentPipeline`] wraps the external models,
//! the [`sanitizer::TagSanitizer`] repairs their output, and the
//! [`builder::OutputBuilder`] resolves granularity levels and allocates
//! budgets into the final [`types::OutputIntent`].

pub mod allocator;
pub mod builder;
pub mod classifier;
pub mod hierarchy;
pub mod sanitizer;
pub mod types;

pub use allocator::{allocate, AllocationCase};
pub use builder::OutputBuilder;
pub use classifier::{
    ActionClass, ActionClassifier, ContextClassifier, ContextLabel, EntityRecognizer,
    IntentPipeline, Interpretation,
};
pub use hierarchy::{
    deepest_level, find_most_similar, resolve_levels, shallowest_level, similarity,
    GranularityLevel, LevelBounds,
};
pub use sanitizer::TagSanitizer;
pub use types::{
    AuditEvent, LevelDeep, LevelEntry, MainAction, OutputIntent, PredictionBundle, Tag, TagLabel,
    TagValue,
};
