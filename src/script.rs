//! Scripted answers, replayed against a controller.
//!
//! Scripts are JSON documents naming a built-in flow and a list of actions:
//!
//! ```json
//! { "flow": "diary:movement",
//!   "actions": [ { "action": "select", "option": "falls" },
//!                { "action": "advance" } ] }
//! ```

use crate::condition::Predicate;
use crate::controller::{FlowController, FlowState, Transition};
use crate::error::{ConfigError, FlowError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ScriptAction {
    Select { option: String },
    Number { value: f64 },
    Text { value: String },
    Advance,
    Back,
    Skip,
    /// Returns from a pending detour with the answers unchanged.
    Return,
}

impl fmt::Display for ScriptAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScriptAction::Select { option } => write!(f, "select {}", option),
            ScriptAction::Number { value } => write!(f, "number {}", value),
            ScriptAction::Text { value } => write!(f, "text \"{}\"", value),
            ScriptAction::Advance => write!(f, "advance"),
            ScriptAction::Back => write!(f, "back"),
            ScriptAction::Skip => write!(f, "skip"),
            ScriptAction::Return => write!(f, "return"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Script {
    pub flow: String,
    pub actions: Vec<ScriptAction>,
}

/// The outcome of one replayed action. Answer actions that succeed carry no
/// transition.
#[derive(Debug, Clone, PartialEq)]
pub struct ReplayStep {
    pub action: ScriptAction,
    pub outcome: Result<Option<Transition>, FlowError>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReplayReport {
    pub steps: Vec<ReplayStep>,
}

impl ReplayReport {
    pub fn errors(&self) -> impl Iterator<Item = (usize, &FlowError)> {
        self.steps
            .iter()
            .enumerate()
            .filter_map(|(idx, step)| step.outcome.as_ref().err().map(|e| (idx, e)))
    }

    pub fn is_clean(&self) -> bool {
        self.errors().next().is_none()
    }
}

impl Script {
    pub fn new(flow: impl Into<String>) -> Self {
        Self {
            flow: flow.into(),
            actions: Vec::new(),
        }
    }

    pub fn push(&mut self, action: ScriptAction) {
        self.actions.push(action);
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_string(),
            source,
        })?;
        Self::from_json(&content)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Applies every action in order. Failed actions are recorded and the
    /// replay carries on with the next one.
    pub fn replay<P: Predicate>(&self, controller: &mut FlowController<P>) -> ReplayReport {
        let steps = self
            .actions
            .iter()
            .map(|action| {
                let outcome = apply(controller, action);
                if let Err(e) = &outcome {
                    tracing::warn!(action = %action, error = %e, "scripted action failed");
                }
                ReplayStep {
                    action: action.clone(),
                    outcome,
                }
            })
            .collect();
        ReplayReport { steps }
    }
}

/// Applies a single action to a controller.
pub fn apply<P: Predicate>(
    controller: &mut FlowController<P>,
    action: &ScriptAction,
) -> Result<Option<Transition>, FlowError> {
    match action {
        ScriptAction::Select { option } => controller.select(option).map(|_| None),
        ScriptAction::Number { value } => controller.set_number(*value).map(|_| None),
        ScriptAction::Text { value } => controller.set_text(value).map(|_| None),
        ScriptAction::Advance => controller.advance().map(Some),
        ScriptAction::Back => controller.back().map(Some),
        ScriptAction::Skip => controller.skip().map(Some),
        ScriptAction::Return => match controller.state() {
            FlowState::DetourPending(token) => {
                let token = token.clone();
                controller.reenter(token).map(Some)
            }
            _ => controller.reenter(Default::default()).map(Some),
        },
    }
}
