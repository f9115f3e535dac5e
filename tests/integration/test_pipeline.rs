//! End-to-end pipeline tests with stub models.

use planvoice::{
    ActionClassifier, AuditEvent, Config, ContextClassifier, EntityRecognizer, IntentPipeline,
    MainAction, ModelError, PlanvoiceError, Result,
};

/// Context classifier stub: always "planning".
struct PlanningContext;
impl ContextClassifier for PlanningContext {
    fn classify(&self, _text: &str) -> Result<i64> {
        Ok(2)
    }
}

/// Action classifier stub: "interact" when the text contains an interaction
/// verb, "show" otherwise.
struct KeywordAction;
impl ActionClassifier for KeywordAction {
    fn classify(&self, text: &str) -> Result<i64> {
        let interact = ["create", "set", "change", "approve", "launch"]
            .iter()
            .any(|w| text.contains(w));
        Ok(if interact { 1 } else { 0 })
    }
}

/// Recognizer stub with a canned tag sequence per utterance.
struct CannedRecognizer(Vec<(&'static str, &'static str)>);
impl EntityRecognizer for CannedRecognizer {
    fn recognize(&self, _text: &str) -> Result<Vec<(String, String)>> {
        Ok(self
            .0
            .iter()
            .map(|(v, l)| (v.to_string(), l.to_string()))
            .collect())
    }
}

fn pipeline(tags: Vec<(&'static str, &'static str)>) -> IntentPipeline {
    IntentPipeline::new(
        Config::default(),
        Box::new(PlanningContext),
        Box::new(KeywordAction),
        Box::new(CannedRecognizer(tags)),
    )
}

#[test]
fn platform_budgets_pair_with_entities() {
    let p = pipeline(vec![
        ("set", "ACTION"),
        ("platform", "GRANULARITY"),
        ("facebook", "PLATFORM"),
        ("google", "PLATFORM"),
    ]);
    let out = p
        .interpret("Set the platform budget 100 200 for Facebook and Google")
        .unwrap();

    assert_eq!(out.prediction.context, "mycampaign-planning");
    assert_eq!(out.prediction.action, "interact");
    assert_eq!(out.intent.main_action, MainAction::Modify);
    assert_eq!(out.intent.budget, 300.0);

    let json = serde_json::to_value(&out.intent).unwrap();
    assert_eq!(json["level_main"], "mediaplan");
    assert_eq!(json["level_deep"]["name"], "platform");
    assert_eq!(
        json["level_deep"]["data"][0]["platform_name"],
        "facebook"
    );
    assert_eq!(json["level_deep"]["data"][0]["budget"], 100.0);
    assert_eq!(json["level_deep"]["data"][1]["platform_name"], "google");
    assert_eq!(json["level_deep"]["data"][1]["budget"], 200.0);
}

#[test]
fn plan_level_total_without_entities() {
    let p = pipeline(vec![("create", "ACTION")]);
    let out = p.interpret("Create a mediaplan with a budget 500").unwrap();

    assert_eq!(out.intent.main_action, MainAction::Create);
    assert_eq!(out.intent.budget, 500.0);
    assert_eq!(out.intent.level_main, "mediaplan");
    assert_eq!(out.intent.level_deep.name, "mediaplan");
    assert!(out.intent.level_deep.data.is_empty());
}

#[test]
fn channels_without_budgets_zero_fill() {
    let p = pipeline(vec![
        ("show", "ACTION"),
        ("channel", "GRANULARITY"),
        ("display", "CHANNEL"),
        ("search", "CHANNEL"),
    ]);
    let out = p.interpret("Show the display and search channel").unwrap();

    assert_eq!(out.prediction.action, "show");
    assert_eq!(out.intent.main_action, MainAction::Show);
    assert_eq!(out.intent.budget, 0.0);
    assert_eq!(out.intent.level_deep.data.len(), 2);
    assert!(out.intent.level_deep.data.iter().all(|e| e.budget == 0.0));
}

#[test]
fn excess_budgets_keep_latest_statement() {
    let p = pipeline(vec![
        ("change", "ACTION"),
        ("channel", "GRANULARITY"),
        ("display", "CHANNEL"),
    ]);
    // The user restates the amount twice; the last value is authoritative.
    let out = p
        .interpret("Change the display channel budget 100 250 400")
        .unwrap();

    assert_eq!(out.intent.budget, 400.0);
    assert_eq!(out.intent.level_deep.data.len(), 1);
    assert_eq!(out.intent.level_deep.data[0].budget, 400.0);
    assert!(out
        .events
        .iter()
        .any(|e| matches!(e, AuditEvent::ExcessBudgetsDropped { dropped: 2 })));
}

#[test]
fn recognizer_mistakes_are_repaired() {
    let p = pipeline(vec![
        ("approve", "ACTION"),
        ("platforms", "ORG"),       // mislabeled granularity mention
        ("facebook", "PLATFORM"),
        ("junk", "FILTER"),         // always dropped
        ("42", "CARDINAL"),         // numeric under a non-budget label
    ]);
    let out = p
        .interpret("Approve the platforms budget 900 for facebook, 42 thanks")
        .unwrap();

    assert_eq!(out.intent.main_action, MainAction::Decision);
    assert_eq!(out.intent.level_deep.name, "platform");
    assert_eq!(out.intent.budget, 900.0);
    assert_eq!(out.intent.level_deep.data.len(), 1);

    assert!(out
        .events
        .iter()
        .any(|e| matches!(e, AuditEvent::TagRelabeled { .. })));
    assert!(out
        .events
        .iter()
        .any(|e| matches!(e, AuditEvent::FilterDropped { .. })));
    assert!(out
        .events
        .iter()
        .any(|e| matches!(e, AuditEvent::TagRemoved { .. })));
    assert!(out
        .events
        .iter()
        .any(|e| matches!(e, AuditEvent::BudgetRecovered { amount } if *amount == 900.0)));
}

#[test]
fn unknown_action_word_still_yields_complete_intent() {
    let p = pipeline(vec![("frobnicate", "ACTION")]);
    let out = p.interpret("frobnicate the mediaplan").unwrap();

    assert_eq!(out.intent.main_action, MainAction::Unclear);
    let json = serde_json::to_value(&out.intent).unwrap();
    let mut keys: Vec<&str> = json
        .as_object()
        .unwrap()
        .keys()
        .map(String::as_str)
        .collect();
    keys.sort_unstable();
    assert_eq!(keys, vec!["budget", "level_deep", "level_main", "main_action"]);
}

#[test]
fn out_of_range_classifier_label_is_fatal() {
    struct Bad;
    impl ContextClassifier for Bad {
        fn classify(&self, _text: &str) -> Result<i64> {
            Ok(42)
        }
    }
    let p = IntentPipeline::new(
        Config::default(),
        Box::new(Bad),
        Box::new(KeywordAction),
        Box::new(CannedRecognizer(vec![])),
    );
    assert!(matches!(
        p.interpret("show the mediaplan"),
        Err(PlanvoiceError::Model(ModelError::UnknownContextLabel(42)))
    ));
}

#[test]
fn word_lists_are_editable_configuration() {
    let config = Config::from_str(
        r#"
        [interact_actions]
        create = ["conjure"]
        "#,
    )
    .unwrap();
    let p = IntentPipeline::new(
        config,
        Box::new(PlanningContext),
        Box::new(KeywordAction),
        Box::new(CannedRecognizer(vec![("conjure", "ACTION")])),
    );
    let out = p.interpret("Conjure a mediaplan").unwrap();
    assert_eq!(out.intent.main_action, MainAction::Create);
}
