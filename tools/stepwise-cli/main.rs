use clap::{Parser, Subcommand};
use std::io::{self, BufRead, Write};
use stepwise::catalog;
use stepwise::flows::medication::setup::NAME as MEDICATION_NAME;
use stepwise::flows::{self, diary::DiaryEntry};
use stepwise::navigation::{MedicationDetour, Navigator, Route};
use stepwise::prelude::*;
use stepwise::script::Script;
use stepwise::sequence::explain_visibility;
use tracing_subscriber::EnvFilter;

/// Runs, replays and inspects stepwise wizard flows
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Optional path to a controller configuration JSON file
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the built-in flows
    List,
    /// Answer a built-in flow interactively
    Run {
        /// Name of the flow, e.g. `onboarding` or `diary:sleep`
        flow: String,
    },
    /// Replay a script of answers and print every transition
    Replay {
        /// Path to the script JSON file
        script: String,
    },
    /// Show why each step of a flow is visible or hidden for a set of answers
    Explain {
        flow: String,
        /// Path to an answers JSON file (a map of step id to answer)
        #[arg(short, long)]
        answers: Option<String>,
    },
    /// Print a built-in flow definition as JSON
    Definition { flow: String },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => FlowConfig::from_file(path).unwrap_or_else(|e| {
            exit_with_error(&format!("Failed to load config '{}': {}", path, e))
        }),
        None => FlowConfig::default(),
    };

    match cli.command {
        Command::List => {
            for name in flows::builtin_names() {
                println!("{}", name);
            }
        }
        Command::Run { flow } => run_interactive(&flow, config),
        Command::Replay { script } => run_replay(&script, config),
        Command::Explain { flow, answers } => run_explain(&flow, answers.as_deref()),
        Command::Definition { flow } => {
            let json = serde_json::to_string_pretty(&load_definition(&flow))
                .unwrap_or_else(|e| exit_with_error(&format!("Failed to serialize flow: {}", e)));
            println!("{}", json);
        }
    }
}

fn load_definition(name: &str) -> FlowDefinition {
    flows::builtin(name).unwrap_or_else(|| {
        exit_with_error(&format!(
            "Unknown flow '{}'. Use `list` to see the built-in flows.",
            name
        ))
    })
}

fn load_flow(name: &str) -> CompiledFlow {
    compile(load_definition(name))
        .unwrap_or_else(|e| exit_with_error(&format!("Flow '{}' is invalid: {}", name, e)))
}

/// Runs a flow in an interactive, human-friendly mode with prompts.
fn run_interactive(name: &str, config: FlowConfig) {
    let flow = load_flow(name);
    println!("--- {} ---", flow.name());
    println!("(enter = continue, b = back, s = skip, q = quit)");
    let mut controller = FlowController::start(flow.clone(), config.clone());

    loop {
        match controller.state().clone() {
            FlowState::Complete(completion) => {
                print_completion(&controller, completion);
                return;
            }
            FlowState::Interstitial { .. } => {
                if let Some(screen) = controller.current_interstitial() {
                    println!("\n*** {} ***\n{}", screen.title, screen.subtitle);
                }
                prompt_for_input("Press enter to continue", None);
                report(controller.advance());
            }
            FlowState::DetourPending(_) => {
                // A detour always follows a `Transition::Detour`, handled below.
                exit_with_error("Unexpected pending detour");
            }
            FlowState::AwaitingAnswer(_) => {
                if let Some(next) = ask_current_step(&mut controller) {
                    controller = match next {
                        Next::Quit => return,
                        Next::Detour(transition) => {
                            run_medication_detour(transition, flow.clone(), config.clone())
                        }
                    };
                }
            }
        }
    }
}

enum Next {
    Quit,
    Detour(Transition),
}

/// Shows the current step, applies one line of input and reports the outcome.
fn ask_current_step(controller: &mut FlowController) -> Option<Next> {
    let step = controller.current_step()?.clone();
    let progress = controller.progress();
    println!(
        "\n[{}/{}] {}",
        progress.current, progress.total, step.prompt
    );
    if let Some(helper) = &step.helper {
        println!("    {}", helper);
    }

    let options: Vec<String> = controller
        .current_options()
        .iter()
        .enumerate()
        .map(|(idx, o)| {
            let marker = if controller.answers().contains(&step.id, &o.id) {
                "x"
            } else {
                " "
            };
            println!(
                "  [{}] {}: {} {}",
                marker,
                idx + 1,
                o.icon.as_deref().unwrap_or(""),
                o.label
            );
            o.id.clone()
        })
        .collect();

    let hint = match &step.kind {
        StepKind::SingleSelect => "Choose a number".to_string(),
        StepKind::MultiSelect => "Toggle numbers (space separated)".to_string(),
        StepKind::Slider { min, max, default } => {
            format!("Value from {} to {} (default {})", min, max, default)
        }
        StepKind::Text { max_len } => format!("Text (up to {} characters)", max_len),
        StepKind::Notice => "Press enter".to_string(),
    };
    let input = prompt_for_input(&hint, None);

    match input.as_str() {
        "q" => return Some(Next::Quit),
        "b" => {
            if report(controller.back()) == Some(Transition::ExitRequested) {
                return Some(Next::Quit);
            }
            return None;
        }
        "s" => {
            report(controller.skip());
            return None;
        }
        "" => {}
        text => {
            let applied = match &step.kind {
                StepKind::SingleSelect | StepKind::MultiSelect => text
                    .split_whitespace()
                    .map(|token| {
                        let option = token
                            .parse::<usize>()
                            .ok()
                            .and_then(|n| options.get(n.wrapping_sub(1)))
                            .ok_or_else(|| format!("'{}' is not an option number", token))?;
                        controller
                            .select(option)
                            .map(|_| ())
                            .map_err(|e| e.to_string())
                    })
                    .collect::<Result<(), String>>(),
                StepKind::Slider { .. } => text
                    .parse::<f64>()
                    .map_err(|e| e.to_string())
                    .and_then(|v| controller.set_number(v).map_err(|e| e.to_string())),
                StepKind::Text { .. } => controller.set_text(text).map_err(|e| e.to_string()),
                StepKind::Notice => Ok(()),
            };
            if let Err(e) = applied {
                println!("  ! {}", e);
                return None;
            }
            // Multi-select answers are toggled one line at a time.
            if step.kind == StepKind::MultiSelect {
                return None;
            }
        }
    }

    match report(controller.advance()) {
        Some(transition @ Transition::Detour(_)) => Some(Next::Detour(transition)),
        _ => None,
    }
}

/// Runs the medication setup for an onboarding detour and resumes onboarding.
fn run_medication_detour(
    transition: Transition,
    onboarding: CompiledFlow,
    config: FlowConfig,
) -> FlowController {
    let mut navigator = Navigator::new(Route::Onboarding { resume: None });
    let mut detour = MedicationDetour::begin(transition, &mut navigator)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to start detour: {}", e)));
    println!("\n--- Medication setup ---");

    let setup = detour.setup_mut();
    let takes = prompt_for_input("Do you take any medications? (y/n)", Some("y"));
    report(setup.answer_gate(takes.starts_with('y')));

    while !setup.is_complete() {
        let Some(entry) = setup.entry() else {
            let more = prompt_for_input("Add another medication? (y/n)", Some("n"));
            report(setup.add_another(more.starts_with('y')));
            continue;
        };
        let Some(step) = entry.current_step().cloned() else {
            break;
        };
        println!("\n{}", setup.entry_prompt().unwrap_or(step.prompt.clone()));
        if let Some(helper) = &step.helper {
            println!("    {}", helper);
        }
        let labels: Vec<(String, String)> = step
            .options
            .iter()
            .map(|o| (o.id.clone(), o.label.clone()))
            .collect();
        for (idx, (_, label)) in labels.iter().enumerate() {
            println!("  {}: {}", idx + 1, label);
        }

        let mut input = prompt_for_input("Answer", None);
        if step.id == MEDICATION_NAME {
            // A prefix of exactly one popular name picks that name.
            if let [name] = catalog::medication::suggest(&input).as_slice() {
                println!("    Using {}", name);
                input = name.to_string();
            }
        }
        let outcome = if labels.is_empty() {
            setup.set_text(&input)
        } else {
            input
                .split_whitespace()
                .filter_map(|t| t.parse::<usize>().ok())
                .filter_map(|n| labels.get(n.wrapping_sub(1)))
                .try_for_each(|(id, _)| setup.select(id).map(|_| ()))
        };
        if let Err(e) = outcome {
            println!("  ! {}", e);
            continue;
        }
        report(setup.advance());
    }

    let screen = detour.setup().completion_screen();
    println!("\n*** {} ***\n{}", screen.title, screen.subtitle);
    let (controller, medications) = detour
        .finish(&mut navigator, onboarding, config)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to return from detour: {}", e)));
    for medication in &medications {
        println!(
            "  {} {} ({}), {}",
            medication.name,
            medication.dosage,
            medication.frequency.label(),
            medication
                .times
                .iter()
                .map(|t| t.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        );
    }
    controller
}

fn print_completion(controller: &FlowController, completion: Completion) {
    match (completion, controller.flow().completion()) {
        (Completion::Finished, Some(screen)) => {
            println!("\n*** {} ***\n{}", screen.title, screen.subtitle)
        }
        (Completion::Finished, None) => println!("\nFlow finished."),
        (Completion::Skipped, _) => println!("\nFlow skipped."),
    }

    println!("\n--- Answers ---");
    for (step, value) in controller.answers().sorted_entries() {
        println!("  {:<16} {}", step, value);
    }

    let category = controller
        .flow()
        .name()
        .strip_prefix("diary:")
        .and_then(catalog::category);
    if let Some(category) = category {
        let entry = DiaryEntry::from_answers(&category, controller.answers());
        match serde_json::to_string_pretty(&entry) {
            Ok(json) => println!("\n--- Diary entry ---\n{}", json),
            Err(e) => eprintln!("Failed to serialize diary entry: {}", e),
        }
    }
}

/// Replays a script against its flow and prints each outcome.
fn run_replay(path: &str, config: FlowConfig) {
    let script = Script::from_file(path)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to load script: {}", e)));
    let mut controller = FlowController::start(load_flow(&script.flow), config);

    println!("Replaying {} actions against '{}'", script.actions.len(), script.flow);
    let replay = script.replay(&mut controller);
    for (idx, step) in replay.steps.iter().enumerate() {
        match &step.outcome {
            Ok(Some(transition)) => println!("{:>3}. {:<20} -> {:?}", idx + 1, step.action.to_string(), transition),
            Ok(None) => println!("{:>3}. {:<20} ok", idx + 1, step.action.to_string()),
            Err(e) => println!("{:>3}. {:<20} ERROR {}", idx + 1, step.action.to_string(), e),
        }
    }

    let progress = controller.progress();
    println!("\n--- Replay Summary ---");
    println!("Final state:  {}", controller.state());
    println!("Progress:     {}/{}", progress.current, progress.total);
    println!("Errors:       {}", replay.errors().count());
    if let Some(token) = controller.snapshot() {
        match token.to_json() {
            Ok(json) => println!("Resume token: {}", json),
            Err(e) => eprintln!("Failed to encode resume token: {}", e),
        }
    }
}

fn run_explain(name: &str, answers_path: Option<&str>) {
    let flow = load_flow(name);
    let answers: AnswerMap = match answers_path {
        Some(path) => {
            let json = std::fs::read_to_string(path).unwrap_or_else(|e| {
                exit_with_error(&format!("Failed to read answers '{}': {}", path, e))
            });
            serde_json::from_str(&json)
                .unwrap_or_else(|e| exit_with_error(&format!("Failed to parse answers: {}", e)))
        }
        None => AnswerMap::new(),
    };

    for entry in explain_visibility(&flow, &answers) {
        println!(
            "{}.{} {:<18} {:<7} {}",
            entry.position.phase,
            entry.position.step,
            entry.step_id,
            if entry.visible { "shown" } else { "hidden" },
            entry.reason()
        );
    }
}

/// Prints a failed call and hands back the value of a successful one.
fn report<T: std::fmt::Debug>(outcome: Result<T, FlowError>) -> Option<T> {
    match outcome {
        Ok(value) => {
            tracing::debug!(outcome = ?value, "navigation");
            Some(value)
        }
        Err(e) => {
            println!("  ! {}", e);
            None
        }
    }
}

/// A helper function to prompt the user and read a line of input.
/// Closed input ends the program, since no answer can follow.
fn prompt_for_input(prompt_text: &str, default: Option<&str>) -> String {
    let default_prompt = default.map_or("".to_string(), |d| format!(" [default: {}]", d));

    print!("> {}{}: ", prompt_text, default_prompt);
    let _ = io::stdout().flush();

    match read_answer(&mut io::stdin().lock(), default) {
        Ok(Some(answer)) => answer,
        Ok(None) => {
            println!();
            exit_with_error("Input closed before the flow finished")
        }
        Err(e) => exit_with_error(&format!("Failed to read line: {}", e)),
    }
}

/// Reads one trimmed line, falling back to `default` for an empty one.
/// `None` at end of input.
fn read_answer(reader: &mut impl BufRead, default: Option<&str>) -> io::Result<Option<String>> {
    let mut line = String::new();
    if reader.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    let trimmed = line.trim();
    Ok(Some(if trimmed.is_empty() {
        default.unwrap_or("").to_string()
    } else {
        trimmed.to_string()
    }))
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
