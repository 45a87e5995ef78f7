use super::choice;
use crate::condition::Condition;
use crate::content::{AutoAnswer, FlowDefinition, Interstitial, StepDefinition, StepKind};

pub const FLOW_NAME: &str = "daily_checkin";

const SYMPTOMS: &str = "symptoms";
const NONE: &str = "none";

/// The short daily check-in.
///
/// The "most troublesome" question follows the diary rules: it is only asked
/// when more than one symptom was picked, and a single symptom answers it.
pub fn daily_checkin() -> FlowDefinition {
    let symptom_options = || {
        vec![
            choice("tremor", "Tremor", "🫨"),
            choice("stiffness", "Stiffness", "🦴"),
            choice("slowness", "Slowness", "🐢"),
            choice("balance", "Balance issues", "⚖️"),
            choice("fatigue", "Fatigue", "😓"),
        ]
    };

    let mut symptoms = symptom_options();
    symptoms.push(choice(NONE, "None today", "🎉").exclusive());

    FlowDefinition::single_phase(
        FLOW_NAME,
        vec![
            StepDefinition::new(
                "overall",
                "How are you feeling overall today?",
                StepKind::Slider {
                    min: 0.0,
                    max: 10.0,
                    default: 5.0,
                },
            )
            .with_helper("Take a moment to reflect."),
            StepDefinition::new(
                "main_area",
                "What area bothered you most today?",
                StepKind::SingleSelect,
            )
            .with_helper("Pick ONE that stood out.")
            .with_options(vec![
                choice("movement", "Movement & tremors", "🏃"),
                choice("sleep", "Sleep issues", "😴"),
                choice("mood", "Mood & motivation", "💭"),
                choice("pain", "Pain or discomfort", "🩹"),
                choice("none", "Nothing major", "✨"),
            ]),
            StepDefinition::new(SYMPTOMS, "Which symptoms did you notice?", StepKind::MultiSelect)
                .with_helper("Select all that apply.")
                .with_options(symptoms),
            StepDefinition::new(
                "troublesome",
                "Which was most troublesome?",
                StepKind::SingleSelect,
            )
            .with_helper("Pick the biggest one.")
            .with_options(symptom_options())
            .with_options_from(SYMPTOMS)
            .with_condition(Condition::count_above(SYMPTOMS, 1, [NONE]))
            .with_auto_answer(AutoAnswer::SoleSelection {
                from: SYMPTOMS.to_string(),
                ignoring: vec![NONE.to_string()],
            }),
            StepDefinition::new(
                "frequency",
                "How often did you notice symptoms?",
                StepKind::SingleSelect,
            )
            .with_options(vec![
                choice("0", "Not at all", "0️⃣"),
                choice("1", "Once or twice", "1️⃣"),
                choice("2", "A few times", "2️⃣"),
                choice("3", "Often", "3️⃣"),
                choice("4", "Most of the day", "4️⃣"),
            ]),
            StepDefinition::new("safety", "Any safety concerns today?", StepKind::SingleSelect)
                .with_helper("Falls, fainting, or choking.")
                .with_options(vec![
                    choice("no", "No, I'm fine", "✅"),
                    choice("fall", "I had a fall", "⚠️"),
                    choice("near_fall", "Almost fell", "😰"),
                    choice("other", "Other concern", "📝"),
                ]),
        ],
    )
    .with_completion(Interstitial::new(
        "Check-in complete! 🎉",
        "You're building healthy habits every day.",
    ))
}
