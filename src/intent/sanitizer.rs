//! Tag sanitization: repairs recognizer output before intent resolution.
//!
//! Three passes in fixed order, after an unconditional FILTER drop:
//! 1. Granularity fuzzy-fix — relabel near-exact hierarchy-name mentions.
//! 2. Budget recovery — re-scan the raw utterance for amounts the recognizer
//!    missed and append them as BUDGET tags.
//! 3. Invalid-numeric removal — drop numeric-valued tags whose label cannot
//!    carry a number.
//!
//! Every repair is a recoverable heuristic: it is reported as an
//! [`AuditEvent`] and mirrored on the tracing channel, never raised as an
//! error.

use tracing::{debug, warn};

use crate::config::SanitizerConfig;
use crate::intent::hierarchy::{similarity, GranularityLevel};
use crate::intent::types::{AuditEvent, Tag, TagLabel, TagValue};

const BUDGET_ANCHOR: &str = "budget";

/// Sanitizer for raw (value, label) tag sequences.
pub struct TagSanitizer {
    granularity_threshold: f64,
    budget_anchor_threshold: f64,
}

impl Default for TagSanitizer {
    fn default() -> Self {
        Self::from_config(&SanitizerConfig::default())
    }
}

impl TagSanitizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &SanitizerConfig) -> Self {
        Self {
            granularity_threshold: config.granularity_threshold,
            budget_anchor_threshold: config.budget_anchor_threshold,
        }
    }

    /// Run all repair passes over a tag sequence.
    ///
    /// `utterance` is the original (lowercased) input text; budget recovery
    /// scans it independently of the recognizer's own output. Sanitization is
    /// idempotent: a second pass over its own output changes nothing.
    pub fn sanitize(
        &self,
        mut tags: Vec<Tag>,
        utterance: &str,
        events: &mut Vec<AuditEvent>,
    ) -> Vec<Tag> {
        tags = self.drop_filter_tags(tags, events);
        self.fix_granularity_labels(&mut tags, events);
        self.recover_budgets(&mut tags, utterance, events);
        self.remove_invalid_numerics(tags, events)
    }

    /// FILTER tags are always noise until the recognizer is retrained.
    fn drop_filter_tags(&self, tags: Vec<Tag>, events: &mut Vec<AuditEvent>) -> Vec<Tag> {
        tags.into_iter()
            .filter(|tag| {
                if tag.label == TagLabel::Filter {
                    warn!(value = %tag.value, "dropping FILTER tag");
                    events.push(AuditEvent::FilterDropped {
                        value: tag.value.to_string(),
                    });
                    false
                } else {
                    true
                }
            })
            .collect()
    }

    /// Relabel tags whose text is a near-exact hierarchy level name.
    fn fix_granularity_labels(&self, tags: &mut [Tag], events: &mut Vec<AuditEvent>) {
        for tag in tags.iter_mut() {
            if tag.label == TagLabel::Granularity {
                continue;
            }
            let TagValue::Text(ref text) = tag.value else {
                continue;
            };
            let matched = GranularityLevel::ALL
                .iter()
                .any(|level| similarity(level.as_str(), text) > self.granularity_threshold);
            if matched {
                debug!(value = %text, from = %tag.label, "relabeling tag as GRANULARITY");
                events.push(AuditEvent::TagRelabeled {
                    value: text.clone(),
                    from: tag.label.to_string(),
                });
                tag.label = TagLabel::Granularity;
            }
        }
    }

    /// Scan the utterance for "budget" anchors and append each run of numbers
    /// that follows one.
    ///
    /// Appending is deficit-aware: a recovered number already covered by an
    /// existing numeric BUDGET tag is skipped, so re-sanitizing never
    /// duplicates tags.
    fn recover_budgets(&self, tags: &mut Vec<Tag>, utterance: &str, events: &mut Vec<AuditEvent>) {
        let tokens: Vec<&str> = utterance
            .split_whitespace()
            .map(|t| t.trim_matches(','))
            .filter(|t| !t.is_empty())
            .collect();

        let mut recovered = Vec::new();
        let mut i = 0;
        while i < tokens.len() {
            if self.is_budget_anchor(tokens[i]) {
                let mut j = i + 1;
                while j < tokens.len() {
                    match parse_number(tokens[j]) {
                        Some(amount) => recovered.push(amount),
                        None => break,
                    }
                    j += 1;
                }
                i = j;
            } else {
                i += 1;
            }
        }

        // Multiset of amounts the recognizer already tagged as BUDGET.
        let mut covered: Vec<f64> = tags
            .iter()
            .filter(|tag| tag.label == TagLabel::Budget)
            .filter_map(|tag| tag.value.as_number())
            .collect();

        for amount in recovered {
            if let Some(pos) = covered.iter().position(|&c| c == amount) {
                covered.swap_remove(pos);
                continue;
            }
            debug!(amount, "recovered budget from utterance");
            events.push(AuditEvent::BudgetRecovered { amount });
            tags.push(Tag::number(amount, TagLabel::Budget));
        }
    }

    fn is_budget_anchor(&self, token: &str) -> bool {
        token.eq_ignore_ascii_case(BUDGET_ANCHOR)
            || similarity(token, BUDGET_ANCHOR) > self.budget_anchor_threshold
    }

    /// Drop tags whose value parses as a number but whose label cannot carry
    /// one. BUDGET tags are numeric by definition; numeric GRANULARITY values
    /// survive as well.
    fn remove_invalid_numerics(&self, tags: Vec<Tag>, events: &mut Vec<AuditEvent>) -> Vec<Tag> {
        tags.into_iter()
            .filter(|tag| {
                let keep = !tag.value.is_numeric()
                    || matches!(tag.label, TagLabel::Budget | TagLabel::Granularity);
                if !keep {
                    warn!(value = %tag.value, label = %tag.label, "removing numeric tag with incompatible label");
                    events.push(AuditEvent::TagRemoved {
                        value: tag.value.to_string(),
                        label: tag.label.to_string(),
                    });
                }
                keep
            })
            .collect()
    }
}

fn parse_number(token: &str) -> Option<f64> {
    token.parse::<f64>().ok().filter(|n| n.is_finite())
}
