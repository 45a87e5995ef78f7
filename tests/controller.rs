//! Tests for the flow controller state machine.
mod common;
use common::*;
use std::time::Duration;
use stepwise::prelude::*;

#[test]
fn test_controller_starts_on_first_step() {
    let controller = start(two_phase_flow());
    assert_eq!(controller.current_position(), Some(Position::new(0, 0)));
    assert_eq!(current_id(&controller).as_deref(), Some("a"));
    assert!(!controller.can_continue());
    assert_eq!(controller.progress(), Progress::new(1, 2));
}

#[test]
fn test_hiding_a_step_changes_the_total() {
    let mut controller = start(two_phase_flow());
    controller.select("y").expect("Failed to select");
    assert_eq!(controller.progress().total, 3);

    controller.select("x").expect("Failed to select");
    assert_eq!(controller.progress().total, 2);
}

#[test]
fn test_interstitial_between_phases() {
    let mut controller = start(two_phase_flow());

    let transition = choose(&mut controller, "x");
    assert_eq!(transition, Transition::Interstitial { phase: 0 });
    assert_eq!(
        controller.current_interstitial().map(|i| i.title.as_str()),
        Some("Nice!")
    );
    assert!(controller.current_step().is_none());
    assert!(controller.can_continue());
    assert_eq!(controller.progress(), Progress::new(1, 2));

    let transition = controller.advance().expect("Failed to leave interstitial");
    assert_eq!(transition, Transition::Moved(Position::new(1, 0)));
    assert_eq!(current_id(&controller).as_deref(), Some("level"));
    assert_eq!(controller.progress(), Progress::new(2, 2));
}

#[test]
fn test_slider_default_is_recorded_on_continue() {
    let mut controller = start(two_phase_flow());
    choose(&mut controller, "x");
    controller.advance().expect("Failed to leave interstitial");

    assert!(controller.can_continue());
    let transition = controller.advance().expect("Failed to advance");
    assert_eq!(transition, Transition::Completed(Completion::Finished));
    assert_eq!(controller.answers().number("level"), Some(5.0));
    assert_eq!(controller.progress(), Progress::new(2, 2));
    assert!(controller.progress().is_done());
}

#[test]
fn test_operations_after_completion_fail() {
    let mut controller = start(two_phase_flow());
    controller.skip().expect("Skip should be allowed on the first step");
    assert!(controller.is_complete());

    assert_eq!(controller.advance(), Err(FlowError::Finished));
    assert_eq!(controller.back(), Err(FlowError::Finished));
    assert_eq!(controller.select("x"), Err(FlowError::Finished));
    assert_eq!(controller.set_number(1.0), Err(FlowError::Finished));
    assert_eq!(controller.skip(), Err(FlowError::Finished));
    assert!(controller.snapshot().is_none());
}

#[test]
fn test_continue_requires_an_answer() {
    let mut controller = start(two_phase_flow());
    assert_eq!(
        controller.advance(),
        Err(FlowError::CannotContinue("a".to_string()))
    );
    assert_eq!(controller.current_position(), Some(Position::new(0, 0)));
}

#[test]
fn test_answer_validation_errors() {
    let mut controller = start(two_phase_flow());

    assert_eq!(
        controller.select("z"),
        Err(FlowError::UnknownOption {
            step_id: "a".to_string(),
            option_id: "z".to_string(),
        })
    );
    assert_eq!(
        controller.set_number(3.0),
        Err(FlowError::KindMismatch {
            step_id: "a".to_string(),
            expected: "numeric",
        })
    );
    assert!(matches!(
        controller.set_text("hello"),
        Err(FlowError::KindMismatch { expected: "text", .. })
    ));

    choose(&mut controller, "x");
    controller.advance().expect("Failed to leave interstitial");
    assert!(matches!(
        controller.set_number(11.0),
        Err(FlowError::OutOfRange { .. })
    ));
    assert!(matches!(
        controller.select("x"),
        Err(FlowError::KindMismatch { expected: "selection", .. })
    ));
}

#[test]
fn test_text_length_is_limited() {
    let definition = FlowDefinition::single_phase(
        "text",
        vec![StepDefinition::new("name", "Name?", StepKind::Text { max_len: 3 })],
    );
    let mut controller = start(definition);
    assert!(!controller.can_continue());
    assert!(matches!(
        controller.set_text("abcd"),
        Err(FlowError::TextTooLong { max_len: 3, .. })
    ));
    controller.set_text("abc").expect("Text within limit");
    assert!(controller.can_continue());
    assert_eq!(controller.answers().text("name"), Some("abc"));
}

#[test]
fn test_back_at_start_requests_exit() {
    let mut controller = start(two_phase_flow());
    assert_eq!(controller.back(), Ok(Transition::ExitRequested));
    assert_eq!(controller.current_position(), Some(Position::new(0, 0)));
}

#[test]
fn test_back_at_start_can_be_ignored() {
    let config = FlowConfig::default().with_back_at_start(BackAtStart::Ignore);
    let mut controller = FlowController::start(compiled(two_phase_flow()), config);
    assert_eq!(controller.back(), Ok(Transition::Stayed));
}

#[test]
fn test_back_from_interstitial_returns_to_last_step_of_phase() {
    let mut controller = start(two_phase_flow());
    controller.select("y").expect("Failed to select");
    controller.advance().expect("Failed to advance");
    assert_eq!(current_id(&controller).as_deref(), Some("b"));
    choose(&mut controller, "x");
    assert!(matches!(controller.state(), FlowState::Interstitial { phase: 0 }));

    let transition = controller.back().expect("Failed to go back");
    assert_eq!(transition, Transition::Moved(Position::new(0, 1)));
}

#[test]
fn test_back_from_next_phase_skips_hidden_steps() {
    let mut controller = start(two_phase_flow());
    choose(&mut controller, "x");
    controller.advance().expect("Failed to leave interstitial");

    let transition = controller.back().expect("Failed to go back");
    assert_eq!(transition, Transition::Moved(Position::new(0, 0)));
    // The earlier answer survives going back.
    assert!(controller.answers().contains("a", "x"));
}

#[test]
fn test_skip_policy() {
    let mut controller = start(two_phase_flow());
    assert!(controller.can_skip());
    choose(&mut controller, "x");
    assert!(!controller.can_skip());
    assert_eq!(controller.skip(), Err(FlowError::SkipNotAllowed));

    let config = FlowConfig::default().with_skip_policy(SkipPolicy::Never);
    let controller = FlowController::start(compiled(two_phase_flow()), config);
    assert!(!controller.can_skip());

    let config = FlowConfig::default().with_skip_policy(SkipPolicy::Anywhere);
    let mut controller = FlowController::start(compiled(two_phase_flow()), config);
    choose(&mut controller, "x");
    assert_eq!(
        controller.skip(),
        Ok(Transition::Completed(Completion::Skipped))
    );
    assert_eq!(controller.state(), &FlowState::Complete(Completion::Skipped));
}

#[test]
fn test_auto_advance_ticket_moves_the_flow() {
    let config = FlowConfig::default().with_auto_advance(Duration::from_millis(400));
    let mut controller = FlowController::start(compiled(medication_phase()), config);

    let ticket = controller
        .select("no")
        .expect("Failed to select")
        .expect("Single-select should hand out a ticket");
    assert_eq!(ticket.delay, Duration::from_millis(400));

    let transition = controller.fire_auto_advance(ticket).expect("Failed to fire");
    assert_eq!(transition, Transition::Moved(Position::new(0, 2)));
}

#[test]
fn test_stale_auto_advance_is_ignored() {
    let config = FlowConfig::default().with_auto_advance(Duration::from_millis(400));
    let mut controller = FlowController::start(compiled(medication_phase()), config);

    let first = controller.select("yes").expect("Failed to select").expect("Ticket");
    let second = controller.select("no").expect("Failed to select").expect("Ticket");
    assert!(second.generation() > first.generation());

    assert_eq!(controller.fire_auto_advance(first), Ok(Transition::Stayed));
    assert_eq!(current_id(&controller).as_deref(), Some("medications"));

    // The user pressed continue before the timer went off.
    controller.advance().expect("Failed to advance");
    assert_eq!(controller.fire_auto_advance(second), Ok(Transition::Stayed));
    assert_eq!(current_id(&controller).as_deref(), Some("tracking_goal"));
}

#[test]
fn test_multi_select_never_auto_advances() {
    let config = FlowConfig::default().with_auto_advance(Duration::from_millis(400));
    let mut controller = FlowController::start(compiled(medication_phase()), config);
    choose(&mut controller, "no");
    assert_eq!(controller.select("mood"), Ok(None));
}

#[test]
fn test_empty_flow_starts_complete() {
    let controller = start(FlowDefinition::single_phase("empty", vec![]));
    assert!(controller.is_complete());
    assert!(controller.current_step().is_none());
    assert!(controller.current_options().is_empty());
    assert_eq!(controller.progress(), Progress::new(0, 0));
    assert_eq!(controller.progress().fraction(), 0.0);
}

#[test]
fn test_phase_without_visible_steps_is_passed_over() {
    let definition = FlowDefinition::new(
        "gaps",
        vec![
            PhaseDefinition::new(
                "first",
                vec![StepDefinition::new("a", "A?", StepKind::SingleSelect).with_options(vec![
                    OptionDefinition::new("x", "X"),
                    OptionDefinition::new("y", "Y"),
                ])],
            ),
            PhaseDefinition::new(
                "conditional",
                vec![StepDefinition::new("b", "B?", StepKind::Notice)
                    .with_condition(Condition::contains("a", "y"))],
            )
            .with_interstitial(Interstitial::new("Hidden", "Never shown")),
            PhaseDefinition::new(
                "last",
                vec![StepDefinition::new("c", "C?", StepKind::Notice)],
            ),
        ],
    );
    let mut controller = start(definition);
    let transition = choose(&mut controller, "x");
    assert_eq!(transition, Transition::Moved(Position::new(2, 0)));
    assert_eq!(controller.progress(), Progress::new(2, 2));
}

#[test]
fn test_progress_is_monotonic_on_a_forward_walk() {
    let mut controller = start_onboarding();
    let mut last = controller.progress();
    assert_eq!(last.current, 1);

    while !controller.is_complete() {
        let before_total = controller.progress().total;
        match controller.current_step().map(|s| (s.kind.clone(), s.options.clone())) {
            Some((StepKind::SingleSelect | StepKind::MultiSelect, options)) => {
                let option = options
                    .iter()
                    .rev()
                    .find(|o| o.id != "yes")
                    .expect("Every step offers a non-detour option");
                controller.select(&option.id).expect("Failed to select");
            }
            _ => {}
        }
        let now = controller.progress();
        if now.total == before_total {
            assert_eq!(now.current, last.current);
        }

        match controller.advance().expect("Failed to advance") {
            Transition::Interstitial { .. } => {
                controller.advance().expect("Failed to leave interstitial");
            }
            Transition::Moved(_) | Transition::Completed(_) => {}
            other => panic!("Unexpected transition {:?}", other),
        }
        let next = controller.progress();
        if !controller.is_complete() {
            assert_eq!(next.current, last.current + 1);
        }
        last = next;
    }
    assert!(last.is_done());
}

#[test]
fn test_snapshot_uses_visible_index() {
    let mut controller = start(medication_phase());
    choose(&mut controller, "no");
    let token = controller.snapshot().expect("Running flow has a snapshot");
    assert_eq!(token.phase_index, 0);
    assert_eq!(token.question_index, 1);
    assert!(token.answers.contains("medications", "no"));

    let resumed = FlowController::resume(compiled(medication_phase()), FlowConfig::default(), token);
    assert_eq!(current_id(&resumed).as_deref(), Some("tracking_goal"));
}

#[test]
fn test_resume_clamps_out_of_range_tokens() {
    let token = ResumeToken::new(0, 9, AnswerMap::new());
    let controller = FlowController::resume(compiled(two_phase_flow()), FlowConfig::default(), token);
    assert_eq!(controller.current_position(), Some(Position::new(1, 0)));

    let token = ResumeToken::new(7, 0, AnswerMap::new());
    let controller = FlowController::resume(compiled(two_phase_flow()), FlowConfig::default(), token);
    assert!(controller.is_complete());
}

#[test]
fn test_detour_and_reentry() {
    let mut controller = start(medication_phase());
    choose(&mut controller, "yes");
    assert_eq!(current_id(&controller).as_deref(), Some("add_medications"));

    let Transition::Detour(token) = choose(&mut controller, "yes") else {
        panic!("Expected a detour");
    };
    assert_eq!((token.phase_index, token.question_index), (0, 2));
    assert!(matches!(controller.state(), FlowState::DetourPending(_)));
    assert!(!controller.can_continue());
    assert!(matches!(
        controller.advance(),
        Err(FlowError::InvalidState { operation: "advance", .. })
    ));
    assert!(matches!(
        controller.back(),
        Err(FlowError::InvalidState { operation: "back", .. })
    ));
    assert_eq!(controller.progress(), Progress::new(3, 3));

    let transition = controller.reenter(token).expect("Failed to re-enter");
    assert_eq!(transition, Transition::Moved(Position::new(0, 2)));
    assert_eq!(current_id(&controller).as_deref(), Some("tracking_goal"));
}

#[test]
fn test_reenter_outside_a_detour_is_rejected() {
    let mut controller = start(medication_phase());
    assert!(matches!(
        controller.reenter(ResumeToken::default()),
        Err(FlowError::InvalidState { operation: "reenter", .. })
    ));
}

#[test]
fn test_options_from_filters_the_displayed_options() {
    let mut controller = start(stepwise::catalog::daily_checkin());
    controller.set_number(6.0).expect("Failed to set slider");
    controller.advance().expect("Failed to advance");
    choose(&mut controller, "movement");

    controller.select("fatigue").expect("Failed to select");
    controller.select("tremor").expect("Failed to select");
    controller.advance().expect("Failed to advance");
    assert_eq!(current_id(&controller).as_deref(), Some("troublesome"));

    let offered: Vec<_> = controller.current_options().iter().map(|o| o.id.clone()).collect();
    assert_eq!(offered, vec!["tremor".to_string(), "fatigue".to_string()]);
    assert!(matches!(
        controller.select("slowness"),
        Err(FlowError::UnknownOption { .. })
    ));
}
