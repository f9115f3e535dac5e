//! Adapter around the external models: context classifier, action
//! classifier, and named-entity recognizer.
//!
//! The models are injected capabilities with a single method each, so tests
//! substitute deterministic stubs. Their integer outputs pass through fixed
//! enumerated label tables that fail fast on out-of-range values; invocation
//! failures propagate unhandled because the models are local, already
//! validated artifacts.

use tracing::debug;

use crate::config::Config;
use crate::error::{ModelError, Result};
use crate::intent::builder::OutputBuilder;
use crate::intent::sanitizer::TagSanitizer;
use crate::intent::types::{AuditEvent, OutputIntent, PredictionBundle, Tag, TagLabel};

// ============================================================================
// Model Traits
// ============================================================================

/// Black-box context classifier: normalized text to an integer label in 0..=6.
pub trait ContextClassifier: Send + Sync {
    fn classify(&self, text: &str) -> Result<i64>;
}

/// Black-box action classifier: normalized text to an integer label in 0..=1.
pub trait ActionClassifier: Send + Sync {
    fn classify(&self, text: &str) -> Result<i64>;
}

/// Black-box named-entity recognizer: raw text to (span, label) pairs in
/// recognition order.
pub trait EntityRecognizer: Send + Sync {
    fn recognize(&self, text: &str) -> Result<Vec<(String, String)>>;
}

// ============================================================================
// Label Tables
// ============================================================================

/// The context classifier's fixed output domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextLabel {
    MainPage,
    Mediamix,
    Planning,
    TraffickingAdserver,
    TraffickingAnalytics,
    GoalsAndProgress,
    Recommendations,
}

impl ContextLabel {
    /// Map a raw classifier label, failing fast on out-of-range values.
    pub fn from_id(id: i64) -> Result<Self> {
        match id {
            0 => Ok(Self::MainPage),
            1 => Ok(Self::Mediamix),
            2 => Ok(Self::Planning),
            3 => Ok(Self::TraffickingAdserver),
            4 => Ok(Self::TraffickingAnalytics),
            5 => Ok(Self::GoalsAndProgress),
            6 => Ok(Self::Recommendations),
            _ => Err(ModelError::UnknownContextLabel(id).into()),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MainPage => "mycampaign-main_page",
            Self::Mediamix => "mycampaign-mediamix",
            Self::Planning => "mycampaign-planning",
            Self::TraffickingAdserver => "mycampaign-trafficking-adserver",
            Self::TraffickingAnalytics => "mycampaign-trafficking-analytics",
            Self::GoalsAndProgress => "mycampaign-goals-and-progress",
            Self::Recommendations => "notifications-recommendations",
        }
    }
}

/// The action classifier's fixed output domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionClass {
    Show,
    Interact,
}

impl ActionClass {
    pub fn from_id(id: i64) -> Result<Self> {
        match id {
            0 => Ok(Self::Show),
            1 => Ok(Self::Interact),
            _ => Err(ModelError::UnknownActionLabel(id).into()),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Show => "show",
            Self::Interact => "interact",
        }
    }
}

// ============================================================================
// Pipeline
// ============================================================================

/// One interpreted utterance: the normalized model outputs, the resolved
/// intent, and the repairs applied along the way.
#[derive(Debug, Clone)]
pub struct Interpretation {
    pub prediction: PredictionBundle,
    pub intent: OutputIntent,
    pub events: Vec<AuditEvent>,
}

/// The full interpretation pipeline: normalize, classify, recognize,
/// sanitize, and build the output intent.
///
/// Single-threaded and synchronous; every call is a bounded local
/// computation with no shared mutable state across invocations.
pub struct IntentPipeline {
    context: Box<dyn ContextClassifier>,
    action: Box<dyn ActionClassifier>,
    recognizer: Box<dyn EntityRecognizer>,
    sanitizer: TagSanitizer,
    config: Config,
}

impl IntentPipeline {
    pub fn new(
        config: Config,
        context: Box<dyn ContextClassifier>,
        action: Box<dyn ActionClassifier>,
        recognizer: Box<dyn EntityRecognizer>,
    ) -> Self {
        Self {
            context,
            action,
            recognizer,
            sanitizer: TagSanitizer::from_config(&config.sanitizer),
            config,
        }
    }

    /// Produce the normalized prediction bundle for an utterance.
    pub fn predict(&self, prompt: &str) -> Result<(PredictionBundle, Vec<AuditEvent>)> {
        let text = prompt.to_lowercase();

        let context = ContextLabel::from_id(self.context.classify(&text)?)?;
        let action = ActionClass::from_id(self.action.classify(&text)?)?;

        let raw: Vec<Tag> = self
            .recognizer
            .recognize(&text)?
            .into_iter()
            .map(|(span, label)| Tag::text(span, TagLabel::parse(&label)))
            .collect();
        debug!(context = context.as_str(), action = action.as_str(), tags = raw.len(), "model predictions");

        let mut events = Vec::new();
        let tags = self.sanitizer.sanitize(raw, &text, &mut events);

        Ok((
            PredictionBundle {
                context: context.as_str().to_string(),
                action: action.as_str().to_string(),
                tags,
            },
            events,
        ))
    }

    /// Interpret an utterance end to end.
    pub fn interpret(&self, prompt: &str) -> Result<Interpretation> {
        let (prediction, mut events) = self.predict(prompt)?;
        let intent = OutputBuilder::new(&self.config).build(&prediction, &mut events);
        Ok(Interpretation {
            prediction,
            intent,
            events,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PlanvoiceError;
    use crate::intent::types::MainAction;

    struct FixedContext(i64);
    impl ContextClassifier for FixedContext {
        fn classify(&self, _text: &str) -> Result<i64> {
            Ok(self.0)
        }
    }

    struct FixedAction(i64);
    impl ActionClassifier for FixedAction {
        fn classify(&self, _text: &str) -> Result<i64> {
            Ok(self.0)
        }
    }

    struct FixedRecognizer(Vec<(String, String)>);
    impl EntityRecognizer for FixedRecognizer {
        fn recognize(&self, _text: &str) -> Result<Vec<(String, String)>> {
            Ok(self.0.clone())
        }
    }

    fn pipeline(context: i64, action: i64, tags: Vec<(&str, &str)>) -> IntentPipeline {
        IntentPipeline::new(
            Config::default(),
            Box::new(FixedContext(context)),
            Box::new(FixedAction(action)),
            Box::new(FixedRecognizer(
                tags.into_iter()
                    .map(|(v, l)| (v.to_string(), l.to_string()))
                    .collect(),
            )),
        )
    }

    #[test]
    fn test_context_label_table() {
        assert_eq!(ContextLabel::from_id(0).unwrap().as_str(), "mycampaign-main_page");
        assert_eq!(
            ContextLabel::from_id(6).unwrap().as_str(),
            "notifications-recommendations"
        );
        assert!(matches!(
            ContextLabel::from_id(7),
            Err(PlanvoiceError::Model(ModelError::UnknownContextLabel(7)))
        ));
    }

    #[test]
    fn test_action_label_table() {
        assert_eq!(ActionClass::from_id(0).unwrap(), ActionClass::Show);
        assert_eq!(ActionClass::from_id(1).unwrap(), ActionClass::Interact);
        assert!(ActionClass::from_id(2).is_err());
    }

    #[test]
    fn test_predict_maps_labels_and_sanitizes() {
        let p = pipeline(
            2,
            1,
            vec![
                ("create", "ACTION"),
                ("platforms", "ORG"),
                ("noise", "FILTER"),
            ],
        );
        let (bundle, events) = p.predict("Create the platforms").unwrap();
        assert_eq!(bundle.context, "mycampaign-planning");
        assert_eq!(bundle.action, "interact");
        assert_eq!(bundle.tags.len(), 2);
        assert_eq!(bundle.tags[1].label, TagLabel::Granularity);
        assert_eq!(events.len(), 2); // filter drop + relabel
    }

    #[test]
    fn test_out_of_range_context_is_fatal() {
        let p = pipeline(9, 0, vec![]);
        assert!(matches!(
            p.interpret("show the mediaplan"),
            Err(PlanvoiceError::Model(ModelError::UnknownContextLabel(9)))
        ));
    }

    #[test]
    fn test_model_failure_propagates() {
        struct Broken;
        impl EntityRecognizer for Broken {
            fn recognize(&self, _text: &str) -> Result<Vec<(String, String)>> {
                Err(ModelError::Inference("model artifact missing".to_string()).into())
            }
        }
        let p = IntentPipeline::new(
            Config::default(),
            Box::new(FixedContext(0)),
            Box::new(FixedAction(0)),
            Box::new(Broken),
        );
        assert!(matches!(
            p.interpret("anything"),
            Err(PlanvoiceError::Model(ModelError::Inference(_)))
        ));
    }

    #[test]
    fn test_interpret_end_to_end() {
        let p = pipeline(
            1,
            1,
            vec![
                ("modify", "ACTION"),
                ("platform", "GRANULARITY"),
                ("facebook", "PLATFORM"),
                ("google", "PLATFORM"),
            ],
        );
        let out = p
            .interpret("Modify the platform budget 100 200 for Facebook and Google")
            .unwrap();
        assert_eq!(out.intent.main_action, MainAction::Modify);
        assert_eq!(out.intent.level_deep.name, "platform");
        assert_eq!(out.intent.level_main, "mediaplan");
        assert_eq!(out.intent.budget, 300.0);
        assert_eq!(out.intent.level_deep.data.len(), 2);
        assert!(out
            .events
            .iter()
            .any(|e| matches!(e, AuditEvent::BudgetRecovered { .. })));
    }
}
