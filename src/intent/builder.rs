//! Output assembly: from a sanitized prediction bundle to the final intent.

use tracing::debug;

use crate::config::Config;
use crate::intent::allocator::allocate;
use crate::intent::hierarchy::resolve_levels;
use crate::intent::types::{
    AuditEvent, LevelDeep, MainAction, OutputIntent, PredictionBundle, TagLabel, TagValue,
};

/// Builds the final intent structure from a prediction bundle.
///
/// Borrows the action word lists from the configuration; the lists are data
/// and editable without code changes.
pub struct OutputBuilder<'a> {
    config: &'a Config,
}

impl<'a> OutputBuilder<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    /// Assemble the output intent: main action, shallow/deep granularity
    /// levels, and the allocated budget breakdown.
    pub fn build(&self, bundle: &PredictionBundle, events: &mut Vec<AuditEvent>) -> OutputIntent {
        let mentions: Vec<String> = bundle
            .tags
            .iter()
            .filter(|tag| tag.label == TagLabel::Granularity)
            .map(|tag| tag.value.to_string())
            .collect();
        let bounds = resolve_levels(&mentions);

        let mut intent = OutputIntent {
            main_action: self.resolve_action(bundle),
            level_main: bounds.shallowest.name().to_string(),
            budget: 0.0,
            level_deep: LevelDeep {
                name: bounds.deepest.name().to_string(),
                data: Vec::new(),
            },
        };

        allocate(&bundle.tags, bounds.deepest, &mut intent, events);

        debug!(
            main_action = %intent.main_action,
            level_main = %intent.level_main,
            level_deep = %intent.level_deep.name,
            budget = intent.budget,
            "intent assembled"
        );
        intent
    }

    /// Classify the last ACTION-labeled tag against the word lists. Later
    /// ACTION tags overwrite earlier ones; users correct themselves as they
    /// speak.
    fn resolve_action(&self, bundle: &PredictionBundle) -> MainAction {
        let last_action = bundle
            .tags
            .iter()
            .rev()
            .find(|tag| tag.label == TagLabel::Action);

        let Some(tag) = last_action else {
            return MainAction::Unspecified;
        };
        let word = match &tag.value {
            TagValue::Text(s) => s.as_str(),
            TagValue::Number(_) => return MainAction::Unclear,
        };

        let contains = |list: &[String]| list.iter().any(|w| w.eq_ignore_ascii_case(word));
        let lists = [
            (&self.config.interact_actions.create, MainAction::Create),
            (&self.config.interact_actions.modify, MainAction::Modify),
            (&self.config.interact_actions.decision, MainAction::Decision),
            (&self.config.show_actions, MainAction::Show),
            (&self.config.trigger_actions, MainAction::Trigger),
        ];
        for (list, action) in lists {
            if contains(list) {
                return action;
            }
        }
        MainAction::Unclear
    }
}
