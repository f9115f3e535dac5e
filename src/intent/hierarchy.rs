//! The media-plan granularity hierarchy and fuzzy level resolution.
//!
//! Free-text granularity mentions ("channel", "media row", ...) are matched
//! against the four fixed levels by string similarity, and the deepest and
//! shallowest levels mentioned in an utterance are reported.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One level of the fixed media-plan hierarchy, ordered by depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum GranularityLevel {
    Mediaplan,
    Channel,
    Platform,
    Mediarow,
}

impl GranularityLevel {
    /// All levels in declaration order, shallowest first. This order also
    /// decides fuzzy-match ties: the earliest level wins an exact tie.
    pub const ALL: [GranularityLevel; 4] = [
        Self::Mediaplan,
        Self::Channel,
        Self::Platform,
        Self::Mediarow,
    ];

    /// Depth rank: MEDIAPLAN(0) < CHANNEL(1) < PLATFORM(2) < MEDIAROW(3).
    pub fn rank(&self) -> u8 {
        match self {
            Self::Mediaplan => 0,
            Self::Channel => 1,
            Self::Platform => 2,
            Self::Mediarow => 3,
        }
    }

    /// Canonical uppercase name, as the recognizer labels it.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mediaplan => "MEDIAPLAN",
            Self::Channel => "CHANNEL",
            Self::Platform => "PLATFORM",
            Self::Mediarow => "MEDIAROW",
        }
    }

    /// Lowercase name used in the output intent.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Mediaplan => "mediaplan",
            Self::Channel => "channel",
            Self::Platform => "platform",
            Self::Mediarow => "mediarow",
        }
    }

    /// Exact (case-insensitive) lookup by canonical name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|level| level.as_str().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for GranularityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Deepest and shallowest levels touched by an utterance, after the
/// shallow-level override policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelBounds {
    pub deepest: GranularityLevel,
    pub shallowest: GranularityLevel,
}

/// Case-insensitive character-sequence similarity in [0, 1]. Symmetric, and
/// exactly 1.0 on equal strings.
pub fn similarity(a: &str, b: &str) -> f64 {
    strsim::normalized_levenshtein(&a.to_uppercase(), &b.to_uppercase())
}

/// The hierarchy level a mention most resembles.
///
/// Levels are compared in [`GranularityLevel::ALL`] order and only a strictly
/// higher similarity replaces the current best, so the earliest declared
/// level wins an exact tie.
pub fn find_most_similar(mention: &str) -> GranularityLevel {
    let mut best = GranularityLevel::Mediaplan;
    let mut best_score = f64::NEG_INFINITY;

    for level in GranularityLevel::ALL {
        let score = similarity(level.as_str(), mention);
        if score > best_score {
            best_score = score;
            best = level;
        }
    }

    best
}

/// The deepest level among the mentions. Defaults to MEDIAPLAN when there are
/// none, or when every mention resolves to MEDIAPLAN itself.
pub fn deepest_level(mentions: &[String]) -> GranularityLevel {
    let mut deepest = GranularityLevel::Mediaplan;

    for mention in mentions {
        let level = find_most_similar(mention);
        if level.rank() > deepest.rank() {
            deepest = level;
        }
    }

    deepest
}

/// The shallowest level among the mentions. Defaults to MEDIAROW when there
/// are none.
pub fn shallowest_level(mentions: &[String]) -> GranularityLevel {
    let mut shallowest = GranularityLevel::Mediarow;

    for mention in mentions {
        let level = find_most_similar(mention);
        if level.rank() < shallowest.rank() {
            shallowest = level;
        }
    }

    shallowest
}

/// Resolve both extrema and apply the shallow-level override: unless every
/// mention agrees on MEDIAROW, an ambiguous shallow level collapses to the
/// top of the hierarchy.
pub fn resolve_levels(mentions: &[String]) -> LevelBounds {
    let deepest = deepest_level(mentions);
    let mut shallowest = shallowest_level(mentions);

    if !(deepest == GranularityLevel::Mediarow && shallowest == GranularityLevel::Mediarow) {
        shallowest = GranularityLevel::Mediaplan;
    }

    LevelBounds {
        deepest,
        shallowest,
    }
}
