//! Tests for the onboarding flow and the medication detour.
mod common;
use common::*;
use stepwise::catalog::onboarding;
use stepwise::flows::medication::{SetupStage, TimeSlot};
use stepwise::navigation::{MedicationDetour, Navigator, Route};
use stepwise::prelude::*;
use stepwise::sequence;

/// Walks a fresh onboarding up to the first question of phase "C".
fn onboarding_at_medications() -> FlowController {
    let mut controller = start_onboarding();
    assert_eq!(
        choose(&mut controller, "patient"),
        Transition::Moved(Position::new(0, 1))
    );
    assert_eq!(
        choose(&mut controller, "newly"),
        Transition::Interstitial { phase: 0 }
    );
    controller.advance().expect("Failed to leave interstitial");
    choose(&mut controller, "movement");
    controller.set_number(3.0).expect("Failed to set energy");
    assert_eq!(
        controller.advance(),
        Ok(Transition::Interstitial { phase: 1 })
    );
    controller.advance().expect("Failed to leave interstitial");
    assert_eq!(current_id(&controller).as_deref(), Some("medications"));
    controller
}

#[test]
fn test_onboarding_content_shape() {
    let flow = compiled(onboarding());
    let names: Vec<_> = flow.phases().iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["A", "B", "C", "D", "E"]);
    assert_eq!(flow.definition().step_count(), 11);
    assert!((0..4).all(|phase| flow.interstitial_after(phase).is_some()));
    assert!(flow.interstitial_after(4).is_none());
    assert_eq!(
        flow.completion().map(|c| c.title.as_str()),
        Some("Your plan is ready! 🎉")
    );
}

#[test]
fn test_declining_medications_hides_the_detour_question() {
    let flow = compiled(medication_phase());
    let mut controller = FlowController::start(flow.clone(), FlowConfig::default());
    assert_eq!(sequence::visible_in_phase(&flow, 0, controller.answers()).len(), 3);

    controller.select("no").expect("Failed to select");
    let visible: Vec<_> = sequence::visible_steps(&flow, controller.answers())
        .iter()
        .map(|s| s.id.as_str())
        .collect();
    assert_eq!(visible, ["medications", "tracking_goal"]);
    assert_eq!(sequence::visible_in_phase(&flow, 0, controller.answers()).len(), 2);

    let transition = controller.advance().expect("Failed to advance");
    assert_eq!(transition, Transition::Moved(Position::new(0, 2)));
    assert_eq!(current_id(&controller).as_deref(), Some("tracking_goal"));
}

#[test]
fn test_visibility_is_idempotent() {
    let flow = compiled(onboarding());
    let mut answers = AnswerMap::new();
    answers.replace_single("medications", "yes");

    let first: Vec<_> = sequence::visible_positions(&flow, &answers);
    let second: Vec<_> = sequence::visible_positions(&flow, &answers);
    assert_eq!(first, second);
    assert_eq!(first.len(), 11);
}

#[test]
fn test_adding_medications_produces_a_resume_token() {
    let mut controller = onboarding_at_medications();
    choose(&mut controller, "yes");
    assert_eq!(current_id(&controller).as_deref(), Some("add_medications"));

    let Transition::Detour(token) = choose(&mut controller, "yes") else {
        panic!("Expected the medication detour");
    };
    assert_eq!(token.phase_index, 2);
    assert_eq!(token.question_index, 2);
    assert!(token.answers.contains("medications", "yes"));
    assert!(token.answers.contains("add_medications", "yes"));
    assert_eq!(token.answers.number("energy_level"), Some(3.0));
}

#[test]
fn test_postponing_medications_continues_normally() {
    let mut controller = onboarding_at_medications();
    choose(&mut controller, "yes");
    let transition = choose(&mut controller, "later");
    assert_eq!(transition, Transition::Moved(Position::new(2, 2)));
}

#[test]
fn test_medication_detour_round_trip() {
    let mut navigator = Navigator::new(Route::Onboarding { resume: None });
    let mut controller = onboarding_at_medications();
    choose(&mut controller, "yes");
    let transition = choose(&mut controller, "yes");
    drop(controller);

    let mut detour = MedicationDetour::begin(transition, &mut navigator).expect("Failed to begin detour");
    assert_eq!(navigator.depth(), 2);
    assert!(matches!(navigator.current(), Route::MedicationSetup { resume: Some(_) }));

    let setup = detour.setup_mut();
    assert_eq!(setup.answer_gate(true), Ok(SetupStage::Entry));
    setup.set_text("Levodopa").expect("Failed to enter name");
    setup.advance().expect("Failed to advance");
    setup.set_text("100mg").expect("Failed to enter dosage");
    setup.advance().expect("Failed to advance");
    setup.select("twice").expect("Failed to select frequency");
    setup.advance().expect("Failed to advance");
    setup.select("evening").expect("Failed to select time");
    setup.select("morning").expect("Failed to select time");
    assert_eq!(setup.advance(), Ok(SetupStage::AddAnother));
    assert_eq!(setup.add_another(false), Ok(SetupStage::Complete));

    let (resumed, medications) = detour
        .finish(&mut navigator, compiled(onboarding()), FlowConfig::default())
        .expect("Failed to finish detour");

    assert_eq!(navigator.depth(), 1);
    assert!(matches!(navigator.current(), Route::Onboarding { resume: Some(_) }));
    assert_eq!(current_id(&resumed).as_deref(), Some("tracking_goal"));
    assert!(resumed.answers().contains("add_medications", "yes"));

    assert_eq!(medications.len(), 1);
    assert_eq!(medications[0].name, "Levodopa");
    assert_eq!(medications[0].times, vec![TimeSlot::Morning, TimeSlot::Evening]);
}

#[test]
fn test_unfinished_detour_cannot_return() {
    let mut navigator = Navigator::new(Route::Onboarding { resume: None });
    let mut controller = onboarding_at_medications();
    choose(&mut controller, "yes");
    let transition = choose(&mut controller, "yes");

    let detour = MedicationDetour::begin(transition, &mut navigator).expect("Failed to begin detour");
    let err = detour
        .finish(&mut navigator, compiled(onboarding()), FlowConfig::default())
        .unwrap_err();
    assert_eq!(err, HandoffError::NotFinished);
}

#[test]
fn test_abandoned_detour_still_resumes_after_the_question() {
    let mut navigator = Navigator::new(Route::Onboarding { resume: None });
    let mut controller = onboarding_at_medications();
    choose(&mut controller, "yes");
    let transition = choose(&mut controller, "yes");

    let detour = MedicationDetour::begin(transition, &mut navigator).expect("Failed to begin detour");
    let resumed = detour.abandon(&mut navigator, compiled(onboarding()), FlowConfig::default());
    assert_eq!(current_id(&resumed).as_deref(), Some("tracking_goal"));
    assert_eq!(navigator.depth(), 1);
}

#[test]
fn test_begin_rejects_other_transitions() {
    let mut navigator = Navigator::new(Route::Home);
    let err = MedicationDetour::begin(Transition::Stayed, &mut navigator).unwrap_err();
    assert!(matches!(err, HandoffError::NotADetour(_)));
    assert_eq!(navigator.depth(), 1);
}

#[test]
fn test_detour_from_last_step_resumes_in_next_phase() {
    let definition = FlowDefinition::new(
        "detour_last",
        vec![
            PhaseDefinition::new(
                "ask",
                vec![StepDefinition::new("add", "Add now?", StepKind::SingleSelect)
                    .with_options(vec![
                        OptionDefinition::new("yes", "Yes"),
                        OptionDefinition::new("later", "Later"),
                    ])
                    .with_detour("yes", "elsewhere")],
            )
            .with_interstitial(Interstitial::new("Done", "")),
            PhaseDefinition::new(
                "after",
                vec![StepDefinition::new("info", "Thanks", StepKind::Notice)],
            ),
        ],
    );
    let flow = compiled(definition);
    let mut controller = FlowController::start(flow.clone(), FlowConfig::default());

    let Transition::Detour(token) = choose(&mut controller, "yes") else {
        panic!("Expected a detour");
    };
    assert_eq!((token.phase_index, token.question_index), (1, 0));

    let resumed = FlowController::resume(flow, FlowConfig::default(), token);
    assert_eq!(resumed.current_position(), Some(Position::new(1, 0)));
}

#[test]
fn test_token_survives_json_and_binary_encoding() {
    let mut controller = onboarding_at_medications();
    choose(&mut controller, "yes");
    let Transition::Detour(token) = choose(&mut controller, "yes") else {
        panic!("Expected a detour");
    };

    let json = token.to_json().expect("Failed to encode JSON");
    assert!(json.contains("\"phaseIndex\":2"));
    assert!(json.contains("\"questionIndex\":2"));
    assert_eq!(ResumeToken::from_json(&json), Ok(token.clone()));

    let bytes = token.to_bytes().expect("Failed to encode bytes");
    assert_eq!(ResumeToken::from_bytes(&bytes), Ok(token));
}
