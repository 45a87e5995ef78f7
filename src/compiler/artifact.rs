use crate::condition::{Condition, Predicate};
use crate::content::{FlowDefinition, Interstitial, PhaseDefinition, StepDefinition};
use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Address of a step inside a flow definition: phase index and the step's
/// index within that phase's *declared* step list (not its visible list).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    pub phase: usize,
    pub step: usize,
}

impl Position {
    pub fn new(phase: usize, step: usize) -> Self {
        Self { phase, step }
    }
}

/// A validated, immutable flow definition with a step index.
///
/// Cloning is cheap: the definition is shared between all controllers that
/// run this flow.
#[derive(Debug)]
pub struct CompiledFlow<P = Condition> {
    definition: Arc<FlowDefinition<P>>,
    index: Arc<AHashMap<String, Position>>,
}

impl<P> Clone for CompiledFlow<P> {
    fn clone(&self) -> Self {
        Self {
            definition: Arc::clone(&self.definition),
            index: Arc::clone(&self.index),
        }
    }
}

impl<P: Predicate> CompiledFlow<P> {
    pub(super) fn new(definition: FlowDefinition<P>) -> Self {
        let mut index = AHashMap::new();
        for (phase_idx, phase) in definition.phases.iter().enumerate() {
            for (step_idx, step) in phase.steps.iter().enumerate() {
                index.insert(step.id.clone(), Position::new(phase_idx, step_idx));
            }
        }
        Self {
            definition: Arc::new(definition),
            index: Arc::new(index),
        }
    }

    pub fn name(&self) -> &str {
        &self.definition.name
    }

    pub fn definition(&self) -> &FlowDefinition<P> {
        &self.definition
    }

    pub fn phases(&self) -> &[PhaseDefinition<P>] {
        &self.definition.phases
    }

    pub fn phase(&self, phase: usize) -> Option<&PhaseDefinition<P>> {
        self.definition.phases.get(phase)
    }

    pub fn phase_count(&self) -> usize {
        self.definition.phases.len()
    }

    pub fn step(&self, position: Position) -> Option<&StepDefinition<P>> {
        self.phase(position.phase)
            .and_then(|phase| phase.steps.get(position.step))
    }

    pub fn step_by_id(&self, step_id: &str) -> Option<&StepDefinition<P>> {
        self.position_of(step_id).and_then(|pos| self.step(pos))
    }

    pub fn position_of(&self, step_id: &str) -> Option<Position> {
        self.index.get(step_id).copied()
    }

    pub fn completion(&self) -> Option<&Interstitial> {
        self.definition.completion.as_ref()
    }

    pub fn interstitial_after(&self, phase: usize) -> Option<&Interstitial> {
        self.phase(phase).and_then(|p| p.interstitial.as_ref())
    }

    /// Every declared position in flow order.
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        self.definition
            .phases
            .iter()
            .enumerate()
            .flat_map(|(phase_idx, phase)| {
                (0..phase.steps.len()).map(move |step_idx| Position::new(phase_idx, step_idx))
            })
    }
}
