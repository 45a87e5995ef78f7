use crate::condition::Condition;
use serde::{Deserialize, Serialize};

/// The complete, canonical definition of a wizard flow, ready for compilation.
/// This is the target structure for any custom content conversion.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound(
    serialize = "P: Serialize",
    deserialize = "P: Deserialize<'de> + Default"
))]
pub struct FlowDefinition<P = Condition> {
    pub name: String,
    pub phases: Vec<PhaseDefinition<P>>,
    /// Screen shown by the host once the flow completes.
    #[serde(default)]
    pub completion: Option<Interstitial>,
}

/// A named, ordered group of steps. Flows without phases use a single one.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound(
    serialize = "P: Serialize",
    deserialize = "P: Deserialize<'de> + Default"
))]
pub struct PhaseDefinition<P = Condition> {
    pub name: String,
    pub steps: Vec<StepDefinition<P>>,
    /// Celebration screen shown after the last step of this phase.
    #[serde(default)]
    pub interstitial: Option<Interstitial>,
}

/// A single question (or notice) within a flow.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound(
    serialize = "P: Serialize",
    deserialize = "P: Deserialize<'de> + Default"
))]
pub struct StepDefinition<P = Condition> {
    pub id: String,
    pub prompt: String,
    #[serde(default)]
    pub helper: Option<String>,
    pub kind: StepKind,
    #[serde(default)]
    pub options: Vec<OptionDefinition>,
    /// Inclusion predicate. Steps without one are always visible.
    #[serde(default)]
    pub condition: P,
    #[serde(default)]
    pub auto_answer: Option<AutoAnswer>,
    /// Restricts the displayed options to those selected in another step.
    #[serde(default)]
    pub options_from: Option<String>,
    #[serde(default)]
    pub detour: Option<DetourTrigger>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StepKind {
    SingleSelect,
    MultiSelect,
    Slider { min: f64, max: f64, default: f64 },
    Text { max_len: usize },
    /// An informational screen that records no answer.
    Notice,
}

impl StepKind {
    pub fn is_selection(&self) -> bool {
        matches!(self, StepKind::SingleSelect | StepKind::MultiSelect)
    }

    pub fn label(&self) -> &'static str {
        match self {
            StepKind::SingleSelect => "single-select",
            StepKind::MultiSelect => "multi-select",
            StepKind::Slider { .. } => "slider",
            StepKind::Text { .. } => "text",
            StepKind::Notice => "notice",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionDefinition {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub icon: Option<String>,
    /// An exclusive option cannot be combined with any other selection.
    #[serde(default)]
    pub exclusive: bool,
}

impl OptionDefinition {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            icon: None,
            exclusive: false,
        }
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn exclusive(mut self) -> Self {
        self.exclusive = true;
        self
    }
}

/// A transition screen between phases or at the end of a flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interstitial {
    pub title: String,
    pub subtitle: String,
}

impl Interstitial {
    pub fn new(title: impl Into<String>, subtitle: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            subtitle: subtitle.into(),
        }
    }
}

/// Fills in the answer of a step the user never sees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AutoAnswer {
    /// When `from` holds exactly one selection (after discounting `ignoring`),
    /// that selection becomes this step's answer.
    SoleSelection {
        from: String,
        #[serde(default)]
        ignoring: Vec<String>,
    },
}

/// Marks a step whose affirmative answer sends the user to an external flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetourTrigger {
    /// The option that requests the detour.
    pub option: String,
    /// Name of the external flow, interpreted by the host.
    pub target: String,
}

impl<P: Default> StepDefinition<P> {
    /// Starts a step definition with no condition, options or helper text.
    pub fn new(id: impl Into<String>, prompt: impl Into<String>, kind: StepKind) -> Self {
        Self {
            id: id.into(),
            prompt: prompt.into(),
            helper: None,
            kind,
            options: Vec::new(),
            condition: P::default(),
            auto_answer: None,
            options_from: None,
            detour: None,
        }
    }
}

impl<P> StepDefinition<P> {
    pub fn with_helper(mut self, helper: impl Into<String>) -> Self {
        self.helper = Some(helper.into());
        self
    }

    pub fn with_options(mut self, options: Vec<OptionDefinition>) -> Self {
        self.options = options;
        self
    }

    pub fn with_condition(mut self, condition: P) -> Self {
        self.condition = condition;
        self
    }

    pub fn with_auto_answer(mut self, auto_answer: AutoAnswer) -> Self {
        self.auto_answer = Some(auto_answer);
        self
    }

    pub fn with_options_from(mut self, step_id: impl Into<String>) -> Self {
        self.options_from = Some(step_id.into());
        self
    }

    pub fn with_detour(mut self, option: impl Into<String>, target: impl Into<String>) -> Self {
        self.detour = Some(DetourTrigger {
            option: option.into(),
            target: target.into(),
        });
        self
    }

    pub fn option(&self, option_id: &str) -> Option<&OptionDefinition> {
        self.options.iter().find(|o| o.id == option_id)
    }

    /// Identifiers of the options flagged exclusive.
    pub fn exclusive_options(&self) -> Vec<&str> {
        self.options
            .iter()
            .filter(|o| o.exclusive)
            .map(|o| o.id.as_str())
            .collect()
    }
}

impl<P> PhaseDefinition<P> {
    pub fn new(name: impl Into<String>, steps: Vec<StepDefinition<P>>) -> Self {
        Self {
            name: name.into(),
            steps,
            interstitial: None,
        }
    }

    pub fn with_interstitial(mut self, interstitial: Interstitial) -> Self {
        self.interstitial = Some(interstitial);
        self
    }
}

impl<P> FlowDefinition<P> {
    pub fn new(name: impl Into<String>, phases: Vec<PhaseDefinition<P>>) -> Self {
        Self {
            name: name.into(),
            phases,
            completion: None,
        }
    }

    /// A flow consisting of one unnamed phase.
    pub fn single_phase(name: impl Into<String>, steps: Vec<StepDefinition<P>>) -> Self {
        let name = name.into();
        Self {
            phases: vec![PhaseDefinition::new(name.clone(), steps)],
            name,
            completion: None,
        }
    }

    pub fn with_completion(mut self, completion: Interstitial) -> Self {
        self.completion = Some(completion);
        self
    }

    pub fn step_count(&self) -> usize {
        self.phases.iter().map(|p| p.steps.len()).sum()
    }
}
