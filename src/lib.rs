//! Planvoice: natural-language media-plan command interpreter.
//!
//! Takes an utterance about advertising media-plan management, runs it
//! through external context/action classifiers and a named-entity
//! recognizer, repairs their output, and resolves a structured intent:
//! main action, shallow and deep granularity levels, and a budget
//! allocation across the named entities.
//!
//! The models themselves are external collaborators injected behind the
//! [`ContextClassifier`], [`ActionClassifier`], and [`EntityRecognizer`]
//! traits; this crate owns only the rule layer between their raw output and
//! the final intent.

pub mod config;
pub mod error;
pub mod intent;

pub use config::{Config, InteractActions, SanitizerConfig};
pub use error::{ConfigError, ModelError, PlanvoiceError, Result};
pub use intent::{
    allocate, deepest_level, find_most_similar, resolve_levels, shallowest_level, ActionClass,
    ActionClassifier, AllocationCase, AuditEvent, ContextClassifier, ContextLabel,
    EntityRecognizer, GranularityLevel, IntentPipeline, Interpretation, LevelBounds, LevelDeep,
    LevelEntry, MainAction, OutputBuilder, OutputIntent, PredictionBundle, Tag, TagLabel,
    TagSanitizer, TagValue,
};
