//! Unit tests for answers, conditions, traces and configuration.
mod common;
use common::*;
use stepwise::sequence::explain_visibility;
use stepwise::prelude::*;

#[test]
fn test_answer_value_display() {
    assert_eq!(format!("{}", AnswerValue::Number(7.0)), "7");
    assert_eq!(format!("{}", AnswerValue::Number(2.5)), "2.5");
    assert_eq!(
        format!("{}", AnswerValue::selection(["b", "a"])),
        "{a, b}"
    );
    assert_eq!(format!("{}", AnswerValue::Text("hi".to_string())), "\"hi\"");
}

#[test]
fn test_toggle_respects_exclusive_options() {
    let mut answers = AnswerMap::new();
    answers.toggle("symptoms", "tremor", &["none"]);
    answers.toggle("symptoms", "fatigue", &["none"]);
    assert_eq!(answers.selection("symptoms").map(|s| s.len()), Some(2));

    answers.toggle("symptoms", "none", &["none"]);
    assert!(answers.contains("symptoms", "none"));
    assert_eq!(answers.selection("symptoms").map(|s| s.len()), Some(1));

    // Un-toggling the last option keeps an empty answer.
    answers.toggle("symptoms", "none", &["none"]);
    assert_eq!(answers.selection("symptoms").map(|s| s.len()), Some(0));
    assert!(!answers.is_filled("symptoms"));
}

#[test]
fn test_missing_answers_never_satisfy_leaf_conditions() {
    let answers = AnswerMap::new();
    assert!(!Condition::contains("medications", "yes").is_satisfied(&answers));
    assert!(!Condition::contains_any("symptoms", ["falls"]).is_satisfied(&answers));
    assert!(!Condition::count_above("symptoms", 0, ["none"]).is_satisfied(&answers));
    assert!(Condition::negate(Condition::contains("medications", "yes")).is_satisfied(&answers));
    assert!(Condition::Always.is_satisfied(&answers));
}

#[test]
fn test_numbers_do_not_satisfy_selection_conditions() {
    let mut answers = AnswerMap::new();
    answers.set_number("energy_level", 5.0);
    assert!(!answers.contains("energy_level", "5"));
    assert!(!Condition::contains("energy_level", "5").is_satisfied(&answers));
}

#[test]
fn test_count_above_ignores_listed_options() {
    let condition = Condition::count_above("symptoms", 1, ["none"]);
    let mut answers = AnswerMap::new();
    answers.insert("symptoms", AnswerValue::selection(["tremor", "none"]));
    assert!(!condition.is_satisfied(&answers));

    answers.insert("symptoms", AnswerValue::selection(["tremor", "balance"]));
    assert!(condition.is_satisfied(&answers));
}

#[test]
fn test_condition_display() {
    let condition = Condition::All(vec![
        Condition::count_above("symptoms", 0, ["none"]),
        Condition::contains_any("symptoms", ["falls", "balance"]),
    ]);
    assert_eq!(
        condition.to_string(),
        "(count(symptoms without none) > 0 AND symptoms contains any of [\"falls\", \"balance\"])"
    );
    assert_eq!(condition.referenced_steps(), vec!["symptoms"]);
}

#[test]
fn test_condition_json_round_trip() {
    let condition = Condition::negate(Condition::contains("medications", "yes"));
    let json = serde_json::to_string(&condition).expect("Failed to serialize");
    assert_eq!(json, r#"{"not":{"contains":{"step":"medications","value":"yes"}}}"#);
    let back: Condition = serde_json::from_str(&json).expect("Failed to deserialize");
    assert_eq!(back, condition);
}

#[test]
fn test_trace_formatting_of_a_hidden_step() {
    let mut answers = AnswerMap::new();
    answers.replace_single("medications", "no");
    let trace = Condition::contains("medications", "yes").explain(&answers);
    assert!(!trace.outcome());
    assert_eq!(
        TraceFormatter::format_trace(&trace),
        "medications contains \"yes\" (was {no}) -> false"
    );
}

#[test]
fn test_trace_formatting_of_negation() {
    let trace = Condition::negate(Condition::contains("a", "x")).explain(&AnswerMap::new());
    assert!(trace.outcome());
    assert_eq!(
        TraceFormatter::format_trace(&trace),
        "NOT a contains \"x\" (was unanswered) -> false"
    );
}

#[test]
fn test_explain_visibility_reports_every_step() {
    let flow = compiled(medication_phase());
    let mut answers = AnswerMap::new();
    answers.replace_single("medications", "no");

    let report = explain_visibility(&flow, &answers);
    assert_eq!(report.len(), 3);
    assert!(report[0].visible);
    assert_eq!(report[0].reason(), "no condition");
    assert!(!report[1].visible);
    assert_eq!(report[1].step_id, "add_medications");
    assert!(report[1].reason().ends_with("-> false"));
}

#[test]
fn test_progress_fraction() {
    assert_eq!(Progress::new(0, 0).fraction(), 0.0);
    assert_eq!(Progress::new(1, 4).fraction(), 0.25);
    assert_eq!(Progress::new(3, 4).percent(), 75.0);
    assert!(!Progress::new(3, 4).is_done());
}

#[test]
fn test_config_from_json() {
    let config = FlowConfig::from_json(
        r#"{ "auto_advance_ms": 250, "back_at_start": "ignore", "skip_policy": "never" }"#,
    )
    .expect("Valid config");
    assert_eq!(
        config.auto_advance_delay(),
        Some(std::time::Duration::from_millis(250))
    );
    assert_eq!(config.back_at_start, BackAtStart::Ignore);
    assert_eq!(config.skip_policy, SkipPolicy::Never);

    assert!(FlowConfig::from_json(r#"{ "skip_policy": "sometimes" }"#).is_err());
    assert!(matches!(
        FlowConfig::from_file("/nonexistent/stepwise.json"),
        Err(ConfigError::Io { .. })
    ));
}

#[test]
fn test_resume_token_json_keys() {
    let mut answers = AnswerMap::new();
    answers.replace_single("medications", "yes");
    answers.set_number("energy_level", 7.0);
    let token = ResumeToken::new(2, 2, answers);

    let value: serde_json::Value =
        serde_json::from_str(&token.to_json().expect("Failed to encode")).expect("Valid JSON");
    assert_eq!(value["phaseIndex"], serde_json::json!(2));
    assert_eq!(value["questionIndex"], serde_json::json!(2));
    assert_eq!(value["answers"]["medications"], serde_json::json!(["yes"]));
    assert_eq!(value["answers"]["energy_level"], serde_json::json!(7.0));
}

#[test]
fn test_resume_token_rejects_garbage() {
    assert!(matches!(
        ResumeToken::from_json("{\"phase\": 1}"),
        Err(TokenError::Decode(_))
    ));
    assert!(matches!(
        ResumeToken::from_bytes(&[0xff, 0xff]),
        Err(TokenError::Decode(_))
    ));
}
