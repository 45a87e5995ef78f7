//! Step sequence evaluation: which steps of a flow are currently visible.
//!
//! All functions here are pure. Given the same compiled flow and the same
//! answers they return identical sequences, which is what lets the
//! controller recompute visibility after every mutation instead of caching it.

use crate::answers::AnswerMap;
use crate::compiler::{CompiledFlow, Position};
use crate::condition::Predicate;
use crate::content::StepDefinition;

mod explain;

pub use explain::{StepVisibility, explain_visibility};

/// Whether a single step is visible under `answers`.
pub fn is_visible<P: Predicate>(step: &StepDefinition<P>, answers: &AnswerMap) -> bool {
    step.condition.is_satisfied(answers)
}

/// The visible steps of the whole flow, in order.
pub fn visible_steps<'a, P: Predicate>(
    flow: &'a CompiledFlow<P>,
    answers: &AnswerMap,
) -> Vec<&'a StepDefinition<P>> {
    visible_positions(flow, answers)
        .into_iter()
        .filter_map(|pos| flow.step(pos))
        .collect()
}

/// Positions of the visible steps of the whole flow, in order.
pub fn visible_positions<P: Predicate>(flow: &CompiledFlow<P>, answers: &AnswerMap) -> Vec<Position> {
    flow.positions()
        .filter(|pos| flow.step(*pos).is_some_and(|s| is_visible(s, answers)))
        .collect()
}

/// Declared indices of the visible steps of one phase. Empty when the phase
/// does not exist.
pub fn visible_in_phase<P: Predicate>(
    flow: &CompiledFlow<P>,
    phase: usize,
    answers: &AnswerMap,
) -> Vec<usize> {
    flow.phase(phase)
        .map(|p| {
            p.steps
                .iter()
                .enumerate()
                .filter(|(_, step)| is_visible(step, answers))
                .map(|(idx, _)| idx)
                .collect()
        })
        .unwrap_or_default()
}

/// The first visible position at or after the start of `phase`, scanning
/// forward through later phases. `None` when nothing visible remains.
pub fn first_visible_from_phase<P: Predicate>(
    flow: &CompiledFlow<P>,
    phase: usize,
    answers: &AnswerMap,
) -> Option<Position> {
    (phase..flow.phase_count()).find_map(|p| {
        visible_in_phase(flow, p, answers)
            .first()
            .map(|&step| Position::new(p, step))
    })
}

/// The next visible step after `from` within the same phase.
pub fn next_in_phase<P: Predicate>(
    flow: &CompiledFlow<P>,
    from: Position,
    answers: &AnswerMap,
) -> Option<Position> {
    visible_in_phase(flow, from.phase, answers)
        .into_iter()
        .find(|&idx| idx > from.step)
        .map(|step| Position::new(from.phase, step))
}

/// The closest visible step before `from`, crossing phase boundaries.
pub fn previous_visible<P: Predicate>(
    flow: &CompiledFlow<P>,
    from: Position,
    answers: &AnswerMap,
) -> Option<Position> {
    visible_positions(flow, answers)
        .into_iter()
        .rev()
        .find(|&pos| pos < from)
}

/// The last visible step of `phase`, if any.
pub fn last_in_phase<P: Predicate>(
    flow: &CompiledFlow<P>,
    phase: usize,
    answers: &AnswerMap,
) -> Option<Position> {
    visible_in_phase(flow, phase, answers)
        .last()
        .map(|&step| Position::new(phase, step))
}

/// Index of `position` within its phase's visible list.
pub fn visible_index<P: Predicate>(
    flow: &CompiledFlow<P>,
    position: Position,
    answers: &AnswerMap,
) -> Option<usize> {
    visible_in_phase(flow, position.phase, answers)
        .iter()
        .position(|&idx| idx == position.step)
}
