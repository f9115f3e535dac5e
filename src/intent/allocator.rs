//! Budget allocation across entities at the target granularity level.
//!
//! Given the sanitized tag sequence and the deepest level an utterance
//! touches, distribute the stated budget values across the named entities at
//! that level. Five mutually exclusive scenarios, evaluated in priority
//! order; exactly one fires for any input.

use tracing::{debug, warn};

use crate::intent::hierarchy::GranularityLevel;
use crate::intent::types::{AuditEvent, LevelEntry, OutputIntent, Tag, TagLabel};

/// Which allocation branch fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllocationCase {
    /// One budget per entity: pair element-wise by position.
    ExactMatch,
    /// An unqualified single number at plan level is the plan total.
    PlanTotal,
    /// Entities named but no amounts stated: zero-fill the breakdown.
    NoBudgets,
    /// More budgets than entities: the most recently stated amounts are
    /// assumed authoritative, so keep the last N and pair those.
    LastBudgets,
    /// Fewer budgets than entities: no reliable mapping, zero-fill instead of
    /// guessing which entities get funded.
    Fallback,
}

/// Fill `intent.level_deep.data` and `intent.budget` from the tags.
///
/// `target` is the deepest granularity level the utterance touches. Entity
/// names are the values of tags labeled with exactly that level; budget
/// values are the numeric values of BUDGET tags. Both keep tag-sequence
/// order.
pub fn allocate(
    tags: &[Tag],
    target: GranularityLevel,
    intent: &mut OutputIntent,
    events: &mut Vec<AuditEvent>,
) -> AllocationCase {
    let entities: Vec<String> = tags
        .iter()
        .filter(|tag| tag.label == TagLabel::Level(target))
        .map(|tag| tag.value.to_string())
        .collect();

    // Unparseable BUDGET values were filtered by the sanitizer; anything
    // slipping through here is a sanitizer bug, not a runtime case.
    let budgets: Vec<f64> = tags
        .iter()
        .filter(|tag| tag.label == TagLabel::Budget)
        .filter_map(|tag| {
            let number = tag.value.as_number();
            if number.is_none() {
                warn!(value = %tag.value, "BUDGET tag with unparseable value slipped past the sanitizer");
            }
            number
        })
        .collect();

    let case = select_case(target, entities.len(), budgets.len());
    debug!(?case, entities = entities.len(), budgets = budgets.len(), "allocating budgets");

    match case {
        AllocationCase::ExactMatch => {
            for (name, budget) in entities.into_iter().zip(&budgets) {
                push_entry(intent, target, name, *budget);
            }
            intent.budget = budgets.iter().sum();
        }
        AllocationCase::PlanTotal => {
            intent.budget = budgets[0];
        }
        AllocationCase::NoBudgets => {
            for name in entities {
                push_entry(intent, target, name, 0.0);
            }
        }
        AllocationCase::LastBudgets => {
            let kept = &budgets[budgets.len() - entities.len()..];
            events.push(AuditEvent::ExcessBudgetsDropped {
                dropped: budgets.len() - kept.len(),
            });
            for (name, budget) in entities.into_iter().zip(kept) {
                push_entry(intent, target, name, *budget);
            }
            intent.budget = kept.iter().sum();
        }
        AllocationCase::Fallback => {
            warn!(
                entities = entities.len(),
                budgets = budgets.len(),
                "cannot map budgets to entities, zero-filling"
            );
            events.push(AuditEvent::FallbackAllocation {
                entities: entities.len(),
                budgets: budgets.len(),
            });
            for name in entities {
                push_entry(intent, target, name, 0.0);
            }
        }
    }

    case
}

fn select_case(target: GranularityLevel, entities: usize, budgets: usize) -> AllocationCase {
    if entities == budgets && budgets > 0 {
        AllocationCase::ExactMatch
    } else if target == GranularityLevel::Mediaplan && budgets == 1 {
        AllocationCase::PlanTotal
    } else if budgets == 0 && entities > 0 {
        AllocationCase::NoBudgets
    } else if budgets > entities {
        AllocationCase::LastBudgets
    } else {
        AllocationCase::Fallback
    }
}

fn push_entry(intent: &mut OutputIntent, level: GranularityLevel, name: String, budget: f64) {
    intent.level_deep.data.push(LevelEntry {
        level,
        name,
        budget,
    });
}
