use super::Medication;
use crate::catalog::medication::{frequency_options, time_options};
use crate::compiler::{CompiledFlow, compile};
use crate::config::{BackAtStart, FlowConfig, SkipPolicy};
use crate::content::{FlowDefinition, Interstitial, StepDefinition, StepKind};
use crate::controller::{AutoAdvance, Completion, FlowController, Transition};
use crate::error::{DefinitionError, FlowError};
use crate::progress::Progress;
use crate::resume::ResumeToken;
use uuid::Uuid;

pub const ENTRY_FLOW_NAME: &str = "medication_entry";

pub const NAME: &str = "med_name";
pub const DOSAGE: &str = "med_dosage";
pub const FREQUENCY: &str = "med_frequency";
pub const TIMES: &str = "med_times";

/// The fixed stages of the setup, in order. Progress is measured over these.
const STAGES: usize = 6;

/// The per-medication questions asked by the inner wizard.
pub fn entry_definition() -> FlowDefinition {
    FlowDefinition::single_phase(
        ENTRY_FLOW_NAME,
        vec![
            StepDefinition::new(NAME, "What's the medication name?", StepKind::Text { max_len: 80 })
                .with_helper("Enter the medication name"),
            StepDefinition::new(DOSAGE, "What's the dosage?", StepKind::Text { max_len: 40 })
                .with_helper("e.g., 100mg, 1 tablet..."),
            StepDefinition::new(FREQUENCY, "How often?", StepKind::SingleSelect)
                .with_options(frequency_options()),
            StepDefinition::new(TIMES, "When do you take it?", StepKind::MultiSelect)
                .with_helper("Select all that apply")
                .with_options(time_options()),
        ],
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetupStage {
    /// "Do you take any medications?"
    Gate,
    /// The inner wizard is collecting one medication.
    Entry,
    /// "Add another medication?"
    AddAnother,
    Complete,
}

/// The medication setup wizard: a yes/no gate, then one inner
/// [`FlowController`] run per medication, looping until the user is done.
#[derive(Debug)]
pub struct MedicationSetup {
    entry_flow: CompiledFlow,
    entry_config: FlowConfig,
    stage: SetupStage,
    entry: Option<FlowController>,
    medications: Vec<Medication>,
    // Identity of a record re-opened by going back, kept when it is re-saved.
    reopened: Option<Uuid>,
}

impl MedicationSetup {
    /// A setup using the built-in entry questions.
    pub fn standard() -> Result<Self, DefinitionError> {
        Ok(Self::new(compile(entry_definition())?, FlowConfig::default()))
    }

    /// A setup driven by a custom entry flow. The flow must use the step
    /// identifiers exported by this module so records can be built from it.
    pub fn new(entry_flow: CompiledFlow, config: FlowConfig) -> Self {
        let entry_config = config
            .with_back_at_start(BackAtStart::Exit)
            .with_skip_policy(SkipPolicy::Never);
        Self {
            entry_flow,
            entry_config,
            stage: SetupStage::Gate,
            entry: None,
            medications: Vec::new(),
            reopened: None,
        }
    }

    pub fn stage(&self) -> SetupStage {
        self.stage
    }

    pub fn is_complete(&self) -> bool {
        self.stage == SetupStage::Complete
    }

    /// The inner wizard while a medication is being entered.
    pub fn entry(&self) -> Option<&FlowController> {
        self.entry.as_ref()
    }

    pub fn medications(&self) -> &[Medication] {
        &self.medications
    }

    pub fn into_medications(self) -> Vec<Medication> {
        self.medications
    }

    /// Prompt of the current entry step, worded for the first or a further
    /// medication.
    pub fn entry_prompt(&self) -> Option<String> {
        let step = self.entry.as_ref()?.current_step()?;
        if step.id == NAME {
            Some(if self.medications.is_empty() {
                "What's your first medication?".to_string()
            } else {
                "Add another medication".to_string()
            })
        } else {
            Some(step.prompt.clone())
        }
    }

    pub fn answer_gate(&mut self, takes_medications: bool) -> Result<SetupStage, FlowError> {
        self.expect_stage(SetupStage::Gate, "answer_gate")?;
        if takes_medications {
            self.open_entry(None);
        } else {
            self.finish();
        }
        Ok(self.stage)
    }

    pub fn select(&mut self, option_id: &str) -> Result<Option<AutoAdvance>, FlowError> {
        self.entry_mut("select")?.select(option_id)
    }

    pub fn set_text(&mut self, value: &str) -> Result<(), FlowError> {
        self.entry_mut("set_text")?.set_text(value)
    }

    /// Continues the inner wizard. Finishing it records the medication and
    /// moves to [`SetupStage::AddAnother`].
    pub fn advance(&mut self) -> Result<SetupStage, FlowError> {
        let transition = self.entry_mut("advance")?.advance()?;
        self.after_entry(transition)
    }

    pub fn fire_auto_advance(&mut self, ticket: AutoAdvance) -> Result<SetupStage, FlowError> {
        let transition = self.entry_mut("fire_auto_advance")?.fire_auto_advance(ticket)?;
        self.after_entry(transition)
    }

    pub fn add_another(&mut self, more: bool) -> Result<SetupStage, FlowError> {
        self.expect_stage(SetupStage::AddAnother, "add_another")?;
        if more {
            self.open_entry(None);
        } else {
            self.finish();
        }
        Ok(self.stage)
    }

    /// Steps back through the fixed stage order. Returns `None` when the user
    /// backs out of the gate, i.e. leaves the setup.
    pub fn back(&mut self) -> Result<Option<SetupStage>, FlowError> {
        match self.stage {
            SetupStage::Gate => Ok(None),
            SetupStage::Entry => {
                if self.entry_mut("back")?.back()? == Transition::ExitRequested {
                    self.entry = None;
                    self.reopened = None;
                    self.stage = SetupStage::Gate;
                }
                Ok(Some(self.stage))
            }
            SetupStage::AddAnother => {
                // Re-open the last record on its final question.
                if let Some(last) = self.medications.pop() {
                    let token = ResumeToken::new(0, 3, last.to_answers());
                    self.open_entry(Some(token));
                    self.reopened = Some(last.id);
                }
                Ok(Some(self.stage))
            }
            SetupStage::Complete => Err(FlowError::Finished),
        }
    }

    /// Progress over the six fixed stages: gate, the four entry questions and
    /// "add another".
    pub fn progress(&self) -> Progress {
        let current = match self.stage {
            SetupStage::Gate => 1,
            SetupStage::Entry => {
                1 + self
                    .entry
                    .as_ref()
                    .map_or(1, |entry| entry.progress().current.max(1))
            }
            SetupStage::AddAnother | SetupStage::Complete => STAGES,
        };
        Progress::new(current, STAGES)
    }

    /// The closing screen.
    pub fn completion_screen(&self) -> Interstitial {
        match self.medications.len() {
            0 => Interstitial::new("All Set! ✅", "You can add medications anytime"),
            1 => Interstitial::new("Medications Set! 💊", "1 medication ready to track"),
            n => Interstitial::new(
                "Medications Set! 💊",
                format!("{} medications ready to track", n),
            ),
        }
    }

    fn after_entry(&mut self, transition: Transition) -> Result<SetupStage, FlowError> {
        if transition != Transition::Completed(Completion::Finished) {
            return Ok(self.stage);
        }
        let answers = self
            .entry
            .take()
            .map(FlowController::into_answers)
            .unwrap_or_default();
        match Medication::from_answers(&answers, self.medications.len()) {
            Some(mut medication) => {
                if let Some(id) = self.reopened.take() {
                    medication.id = id;
                }
                tracing::info!(name = %medication.name, color = %medication.color, "medication added");
                self.medications.push(medication);
                self.stage = SetupStage::AddAnother;
                Ok(self.stage)
            }
            None => {
                // A custom entry flow finished without the fields a record needs.
                self.open_entry(Some(ResumeToken::new(0, 0, answers)));
                Err(FlowError::CannotContinue(NAME.to_string()))
            }
        }
    }

    fn open_entry(&mut self, resume: Option<ResumeToken>) {
        let flow = self.entry_flow.clone();
        let config = self.entry_config.clone();
        self.entry = Some(match resume {
            Some(token) => FlowController::resume(flow, config, token),
            None => FlowController::start(flow, config),
        });
        self.stage = SetupStage::Entry;
    }

    fn finish(&mut self) {
        self.entry = None;
        self.stage = SetupStage::Complete;
        tracing::info!(count = self.medications.len(), "medication setup complete");
    }

    fn entry_mut(&mut self, operation: &'static str) -> Result<&mut FlowController, FlowError> {
        let stage = self.stage;
        match self.entry.as_mut() {
            Some(entry) if stage == SetupStage::Entry => Ok(entry),
            _ if stage == SetupStage::Complete => Err(FlowError::Finished),
            _ => Err(FlowError::InvalidState {
                operation,
                state: format!("{:?}", stage),
            }),
        }
    }

    fn expect_stage(&self, expected: SetupStage, operation: &'static str) -> Result<(), FlowError> {
        if self.stage == expected {
            Ok(())
        } else if self.stage == SetupStage::Complete {
            Err(FlowError::Finished)
        } else {
            Err(FlowError::InvalidState {
                operation,
                state: format!("{:?}", self.stage),
            })
        }
    }
}
