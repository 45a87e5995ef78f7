use super::choice;
use crate::condition::Condition;
use crate::content::{FlowDefinition, Interstitial, PhaseDefinition, StepDefinition, StepKind};

pub const FLOW_NAME: &str = "onboarding";

/// The step whose "yes" reveals [`ADD_MEDICATIONS`].
pub const MEDICATIONS: &str = "medications";
/// The step that offers the medication setup detour.
pub const ADD_MEDICATIONS: &str = "add_medications";
/// Detour target handed to the host when the user wants to add medications.
pub const MEDICATION_SETUP_TARGET: &str = "medication_setup";

/// The five-phase onboarding questionnaire.
pub fn onboarding() -> FlowDefinition {
    FlowDefinition::new(
        FLOW_NAME,
        vec![
            phase_a().with_interstitial(Interstitial::new(
                "Great start! 🌟",
                "You're building your foundation.",
            )),
            phase_b().with_interstitial(Interstitial::new(
                "Making progress! 📊",
                "We're learning about you.",
            )),
            phase_c().with_interstitial(Interstitial::new(
                "Almost there! 🎯",
                "Just a few more questions.",
            )),
            phase_d().with_interstitial(Interstitial::new(
                "Keep going! 💪",
                "Your personalized plan awaits.",
            )),
            phase_e(),
        ],
    )
    .with_completion(Interstitial::new(
        "Your plan is ready! 🎉",
        "Let's start your personalized journey together.",
    ))
}

fn phase_a() -> PhaseDefinition {
    PhaseDefinition::new(
        "A",
        vec![
            StepDefinition::new("role", "Who are you?", StepKind::SingleSelect)
                .with_helper("This helps us personalize your experience.")
                .with_options(vec![
                    choice("patient", "I am the patient", "🙋"),
                    choice("caregiver", "I'm a caregiver", "💝"),
                    choice("both", "Both", "🤝"),
                ]),
            StepDefinition::new("stage", "Where are you in your journey?", StepKind::SingleSelect)
                .with_helper("Choose what feels closest.")
                .with_options(vec![
                    choice("newly", "Newly diagnosed", "🌱"),
                    choice("few_years", "Living with PD for a few years", "🌿"),
                    choice("long_time", "Long-time warrior", "🌳"),
                    choice("unsure", "Not sure yet", "❓"),
                ]),
        ],
    )
}

fn phase_b() -> PhaseDefinition {
    PhaseDefinition::new(
        "B",
        vec![
            StepDefinition::new(
                "main_concern",
                "What concerns you most right now?",
                StepKind::SingleSelect,
            )
            .with_helper("Pick the biggest one.")
            .with_options(vec![
                choice("movement", "Movement & tremors", "🏃"),
                choice("sleep", "Sleep problems", "😴"),
                choice("mood", "Mood & motivation", "💭"),
                choice("memory", "Memory & focus", "🧠"),
                choice("other", "Something else", "📝"),
            ]),
            StepDefinition::new(
                "energy_level",
                "How's your energy today?",
                StepKind::Slider {
                    min: 0.0,
                    max: 10.0,
                    default: 5.0,
                },
            ),
        ],
    )
}

fn phase_c() -> PhaseDefinition {
    PhaseDefinition::new(
        "C",
        vec![
            StepDefinition::new(
                MEDICATIONS,
                "Are you currently taking PD medications?",
                StepKind::SingleSelect,
            )
            .with_options(vec![
                choice("yes", "Yes", "💊"),
                choice("no", "Not yet", "⏳"),
                choice("unsure", "I'm not sure", "🤔"),
            ]),
            StepDefinition::new(
                ADD_MEDICATIONS,
                "Would you like to add your medications now?",
                StepKind::SingleSelect,
            )
            .with_helper("You can always add them later in Tools.")
            .with_options(vec![
                choice("yes", "Yes, let's add them", "✅"),
                choice("later", "I'll do it later", "⏰"),
            ])
            .with_condition(Condition::contains(MEDICATIONS, "yes"))
            .with_detour("yes", MEDICATION_SETUP_TARGET),
            StepDefinition::new(
                "tracking_goal",
                "What would you like to track?",
                StepKind::MultiSelect,
            )
            .with_helper("Select all that apply.")
            .with_options(vec![
                choice("symptoms", "Daily symptoms", "📊"),
                choice("medications", "Medications", "💊"),
                choice("mood", "Mood changes", "🎭"),
                choice("sleep", "Sleep quality", "🌙"),
                choice("exercise", "Exercise & movement", "🏃"),
            ]),
        ],
    )
}

fn phase_d() -> PhaseDefinition {
    PhaseDefinition::new(
        "D",
        vec![
            StepDefinition::new(
                "reminder_time",
                "When should we remind you?",
                StepKind::SingleSelect,
            )
            .with_helper("For your daily check-in.")
            .with_options(vec![
                choice("morning", "Morning (8-10am)", "🌅"),
                choice("midday", "Midday (12-2pm)", "☀️"),
                choice("evening", "Evening (6-8pm)", "🌆"),
                choice("none", "No reminders", "🔕"),
            ]),
            StepDefinition::new(
                "share_data",
                "Share progress with a caregiver?",
                StepKind::SingleSelect,
            )
            .with_helper("They'll see summaries, not raw data.")
            .with_options(vec![
                choice("yes", "Yes, I'd like that", "👥"),
                choice("later", "Maybe later", "⏰"),
                choice("no", "No, keep it private", "🔒"),
            ]),
        ],
    )
}

fn phase_e() -> PhaseDefinition {
    PhaseDefinition::new(
        "E",
        vec![
            StepDefinition::new(
                "daily_time",
                "How much time can you spend daily?",
                StepKind::SingleSelect,
            )
            .with_options(vec![
                choice("2min", "2-3 minutes", "⚡"),
                choice("5min", "5-10 minutes", "🕐"),
                choice("15min", "15+ minutes", "🕑"),
            ]),
            StepDefinition::new("motivation", "What motivates you most?", StepKind::SingleSelect)
                .with_options(vec![
                    choice("consistency", "Staying consistent", "📅"),
                    choice("progress", "Seeing my progress", "📈"),
                    choice("learning", "Learning new things", "📚"),
                    choice("community", "Helping others", "🤝"),
                ]),
        ],
    )
}
