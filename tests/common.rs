//! Common test utilities for building flows and driving controllers.
use stepwise::prelude::*;

/// Onboarding phase "C" on its own:
/// `[medications, add_medications (if medications ∋ yes), tracking_goal]`.
#[allow(dead_code)]
pub fn medication_phase() -> FlowDefinition {
    FlowDefinition::single_phase(
        "phase_c",
        vec![
            StepDefinition::new("medications", "Taking medications?", StepKind::SingleSelect)
                .with_options(vec![
                    OptionDefinition::new("yes", "Yes"),
                    OptionDefinition::new("no", "Not yet"),
                ]),
            StepDefinition::new("add_medications", "Add them now?", StepKind::SingleSelect)
                .with_options(vec![
                    OptionDefinition::new("yes", "Yes"),
                    OptionDefinition::new("later", "Later"),
                ])
                .with_condition(Condition::contains("medications", "yes"))
                .with_detour("yes", "medication_setup"),
            StepDefinition::new("tracking_goal", "What to track?", StepKind::MultiSelect)
                .with_options(vec![
                    OptionDefinition::new("symptoms", "Symptoms"),
                    OptionDefinition::new("mood", "Mood"),
                ]),
        ],
    )
}

/// Two phases with an interstitial between them and a slider in the second.
#[allow(dead_code)]
pub fn two_phase_flow() -> FlowDefinition {
    FlowDefinition::new(
        "two_phase",
        vec![
            PhaseDefinition::new(
                "first",
                vec![
                    StepDefinition::new("a", "A?", StepKind::SingleSelect).with_options(vec![
                        OptionDefinition::new("x", "X"),
                        OptionDefinition::new("y", "Y"),
                    ]),
                    StepDefinition::new("b", "B?", StepKind::SingleSelect)
                        .with_options(vec![OptionDefinition::new("x", "X")])
                        .with_condition(Condition::contains("a", "y")),
                ],
            )
            .with_interstitial(Interstitial::new("Nice!", "Halfway there.")),
            PhaseDefinition::new(
                "second",
                vec![StepDefinition::new(
                    "level",
                    "Level?",
                    StepKind::Slider {
                        min: 0.0,
                        max: 10.0,
                        default: 5.0,
                    },
                )],
            ),
        ],
    )
}

#[allow(dead_code)]
pub fn compiled(definition: FlowDefinition) -> CompiledFlow {
    compile(definition).expect("Failed to compile test flow")
}

#[allow(dead_code)]
pub fn start(definition: FlowDefinition) -> FlowController {
    FlowController::start(compiled(definition), FlowConfig::default())
}

#[allow(dead_code)]
pub fn start_onboarding() -> FlowController {
    start(stepwise::catalog::onboarding())
}

/// Identifier of the step on screen.
#[allow(dead_code)]
pub fn current_id(controller: &FlowController) -> Option<String> {
    controller.current_step().map(|s| s.id.clone())
}

/// Answers the current single-select step and continues.
#[allow(dead_code)]
pub fn choose(controller: &mut FlowController, option: &str) -> Transition {
    controller.select(option).expect("Failed to select option");
    controller.advance().expect("Failed to advance")
}
