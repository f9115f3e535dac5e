//! Types for the media-plan intent engine.

use serde::de::Deserializer;
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::intent::hierarchy::GranularityLevel;

// ============================================================================
// Tags
// ============================================================================

/// The value carried by a tag: a text span from the recognizer, or a number
/// synthesized by the sanitizer's budget recovery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TagValue {
    Number(f64),
    Text(String),
}

impl TagValue {
    /// Numeric view of the value, when it parses as a finite number.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n).filter(|n| n.is_finite()),
            Self::Text(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        }
    }

    /// Whether the value parses as a finite number.
    pub fn is_numeric(&self) -> bool {
        self.as_number().is_some()
    }
}

impl fmt::Display for TagValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// Label attached to a tag by the recognizer or the sanitizer.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TagLabel {
    /// A free-text granularity mention ("channel", "media row", ...).
    Granularity,
    /// A budget amount.
    Budget,
    /// An action verb ("create", "show", ...).
    Action,
    /// Pending recognizer retraining; always dropped by the sanitizer.
    Filter,
    /// A named entity at a specific hierarchy level ("Facebook" at PLATFORM).
    Level(GranularityLevel),
    /// Any other recognizer-defined category.
    Other(String),
}

impl TagLabel {
    /// Parse a recognizer label string (case-insensitive).
    pub fn parse(label: &str) -> Self {
        match label.to_uppercase().as_str() {
            "GRANULARITY" => Self::Granularity,
            "BUDGET" => Self::Budget,
            "ACTION" => Self::Action,
            "FILTER" => Self::Filter,
            upper => match GranularityLevel::from_name(upper) {
                Some(level) => Self::Level(level),
                None => Self::Other(upper.to_string()),
            },
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Granularity => "GRANULARITY",
            Self::Budget => "BUDGET",
            Self::Action => "ACTION",
            Self::Filter => "FILTER",
            Self::Level(level) => level.as_str(),
            Self::Other(s) => s,
        }
    }
}

impl fmt::Display for TagLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for TagLabel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for TagLabel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Self::parse(&s))
    }
}

/// A (value, label) pair produced by the recognizer or the sanitizer.
///
/// Sequence order matters: recognizer insertion order first, recovered budget
/// tags appended after, and the allocator cuts by position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    pub value: TagValue,
    pub label: TagLabel,
}

impl Tag {
    pub fn new(value: TagValue, label: TagLabel) -> Self {
        Self { value, label }
    }

    pub fn text(value: impl Into<String>, label: TagLabel) -> Self {
        Self::new(TagValue::Text(value.into()), label)
    }

    pub fn number(value: f64, label: TagLabel) -> Self {
        Self::new(TagValue::Number(value), label)
    }
}

// ============================================================================
// Prediction Bundle
// ============================================================================

/// Normalized model outputs for one utterance: context label, action label,
/// and the sanitized tag sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionBundle {
    pub context: String,
    pub action: String,
    pub tags: Vec<Tag>,
}

// ============================================================================
// Output Intent
// ============================================================================

/// Main action resolved from the ACTION tags against the word lists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MainAction {
    Create,
    Modify,
    Decision,
    Show,
    Trigger,
    /// An ACTION tag was present but matched no word list.
    Unclear,
    /// No ACTION tag at all; serializes as the empty string.
    #[default]
    Unspecified,
}

impl MainAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Modify => "modify",
            Self::Decision => "decision",
            Self::Show => "show",
            Self::Trigger => "trigger",
            Self::Unclear => "unclear",
            Self::Unspecified => "",
        }
    }
}

impl fmt::Display for MainAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for MainAction {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// One allocated entity at the deepest granularity level.
///
/// Serializes with a level-derived key, e.g.
/// `{"platform_name": "Facebook", "budget": 100.0}`.
#[derive(Debug, Clone, PartialEq)]
pub struct LevelEntry {
    pub level: GranularityLevel,
    pub name: String,
    pub budget: f64,
}

impl Serialize for LevelEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry(&format!("{}_name", self.level.name()), &self.name)?;
        map.serialize_entry("budget", &self.budget)?;
        map.end()
    }
}

/// Deepest granularity touched by the utterance and its budget breakdown.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LevelDeep {
    pub name: String,
    pub data: Vec<LevelEntry>,
}

/// The fully resolved intent for one utterance.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OutputIntent {
    pub main_action: MainAction,
    pub level_main: String,
    pub budget: f64,
    pub level_deep: LevelDeep,
}

// ============================================================================
// Audit Events
// ============================================================================

/// Recoverable heuristics applied while interpreting an utterance.
///
/// These are reported alongside the result rather than accumulated in shared
/// state; they are never errors.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum AuditEvent {
    /// A FILTER-labeled tag was dropped before sanitization.
    FilterDropped { value: String },
    /// A tag was relabeled as a granularity mention.
    TagRelabeled { value: String, from: String },
    /// A budget amount was recovered from the raw utterance.
    BudgetRecovered { amount: f64 },
    /// A numeric-valued tag with an incompatible label was removed.
    TagRemoved { value: String, label: String },
    /// Excess budget values were dropped; the last N were kept.
    ExcessBudgetsDropped { dropped: usize },
    /// Budgets could not be mapped to entities; entries were zero-filled.
    FallbackAllocation { entities: usize, budgets: usize },
}
