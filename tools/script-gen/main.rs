use clap::Parser;
use rand::Rng;
use rand::seq::IndexedRandom;
use std::fs;
use stepwise::flows;
use stepwise::prelude::*;
use stepwise::script::{Script, ScriptAction, apply};

/// A tool to generate random answer scripts for the built-in stepwise flows
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Name of the built-in flow to walk, e.g. `onboarding` or `diary:sleep`
    #[arg(short, long, default_value = "onboarding")]
    flow: String,

    /// Output file path for the generated script
    #[arg(short, long, default_value = "generated_script.json")]
    output: String,

    /// Chance of pressing back instead of continuing, between 0 and 1
    #[arg(long, default_value_t = 0.1)]
    back_chance: f64,

    /// Give up after this many actions
    #[arg(long, default_value_t = 500)]
    max_actions: usize,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if !(0.0..1.0).contains(&cli.back_chance) {
        eprintln!("Error: --back-chance must be at least 0 and below 1.");
        std::process::exit(1);
    }
    let Some(definition) = flows::builtin(&cli.flow) else {
        eprintln!(
            "Error: unknown flow '{}'. Known flows: {}",
            cli.flow,
            flows::builtin_names().join(", ")
        );
        std::process::exit(1);
    };

    let flow = compile(definition)?;
    let mut controller = FlowController::start(flow, FlowConfig::default());
    let mut rng = rand::rng();
    let script = walk(&mut controller, &mut rng, cli.back_chance, cli.max_actions)?;

    fs::write(&cli.output, script.to_json()?)?;

    println!(
        "Successfully generated {} actions for '{}' in '{}' (final state: {})",
        script.actions.len(),
        cli.flow,
        cli.output,
        controller.state()
    );

    Ok(())
}

/// Answers the flow with random choices, recording every action applied.
fn walk(
    controller: &mut FlowController,
    rng: &mut impl Rng,
    back_chance: f64,
    max_actions: usize,
) -> Result<Script, FlowError> {
    let mut script = Script::new(controller.flow().name());

    while !controller.is_complete() && script.actions.len() < max_actions {
        let actions = match (controller.state(), controller.current_step()) {
            (FlowState::DetourPending(_), _) => vec![ScriptAction::Return],
            (_, None) => vec![ScriptAction::Advance],
            (_, Some(step)) => {
                let mut actions = answer(controller, &step.kind, rng);
                if rng.random_bool(back_chance) {
                    actions.push(ScriptAction::Back);
                } else {
                    actions.push(ScriptAction::Advance);
                }
                actions
            }
        };

        for action in actions {
            apply(controller, &action)?;
            script.push(action);
        }
    }

    Ok(script)
}

fn answer(controller: &FlowController, kind: &StepKind, rng: &mut impl Rng) -> Vec<ScriptAction> {
    let select = |id: &str| ScriptAction::Select {
        option: id.to_string(),
    };
    let options: Vec<&str> = controller
        .current_options()
        .iter()
        .map(|o| o.id.as_str())
        .collect();

    match kind {
        StepKind::SingleSelect => options.choose(rng).map(|id| select(*id)).into_iter().collect(),
        StepKind::MultiSelect => {
            let picks = rng.random_range(1..=options.len().clamp(1, 3));
            let mut actions: Vec<_> = options
                .choose_multiple(rng, picks)
                .map(|id| select(*id))
                .collect();
            // Toggling an exclusive option last can empty the selection
            // again, so top it up when nothing would remain.
            if !would_fill(controller, &actions) {
                let top_up = options.iter().map(|id| select(*id)).find(|extra| {
                    would_fill(controller, &[actions.as_slice(), std::slice::from_ref(extra)].concat())
                });
                actions.extend(top_up);
            }
            actions
        }
        StepKind::Slider { min, max, .. } => {
            if rng.random_bool(0.5) {
                vec![ScriptAction::Number {
                    value: rng.random_range(*min..=*max).round(),
                }]
            } else {
                Vec::new()
            }
        }
        StepKind::Text { .. } => {
            let names: Vec<&str> = stepwise::catalog::medication::POPULAR_MEDICATIONS
                .iter()
                .map(|(name, _)| *name)
                .collect();
            names
                .choose(rng)
                .map(|name| ScriptAction::Text {
                    value: name.to_string(),
                })
                .into_iter()
                .collect()
        }
        StepKind::Notice => Vec::new(),
    }
}

/// Dry-runs selection toggles on a copy of the controller.
fn would_fill(controller: &FlowController, actions: &[ScriptAction]) -> bool {
    let mut probe = controller.clone();
    actions.iter().all(|action| apply(&mut probe, action).is_ok()) && probe.can_continue()
}
