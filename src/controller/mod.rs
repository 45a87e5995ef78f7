//! The generic wizard state machine.
//!
//! A [`FlowController`] owns the answers and cursor of one running flow. It
//! recomputes visibility from the compiled definition after every mutation, so
//! it never caches a step list that an answer could invalidate.

use crate::answers::{AnswerMap, AnswerValue};
use crate::compiler::{CompiledFlow, Position};
use crate::condition::{Condition, Predicate};
use crate::config::{BackAtStart, FlowConfig, SkipPolicy};
use crate::content::{AutoAnswer, Interstitial, OptionDefinition, StepDefinition, StepKind};
use crate::error::FlowError;
use crate::progress::Progress;
use crate::resume::ResumeToken;
use crate::sequence;
use itertools::Itertools;
use std::collections::BTreeSet;
use std::ops::{Bound, RangeBounds};

mod auto_advance;
mod state;

pub use auto_advance::AutoAdvance;
pub use state::{Completion, FlowState, Transition};

#[derive(Debug)]
pub struct FlowController<P = Condition> {
    flow: CompiledFlow<P>,
    config: FlowConfig,
    answers: AnswerMap,
    state: FlowState,
    // Bumped by every mutation; auto-advance tickets from older generations
    // are ignored.
    generation: u64,
}

impl<P> Clone for FlowController<P> {
    fn clone(&self) -> Self {
        Self {
            flow: self.flow.clone(),
            config: self.config.clone(),
            answers: self.answers.clone(),
            state: self.state.clone(),
            generation: self.generation,
        }
    }
}

impl<P: Predicate> FlowController<P> {
    /// Starts a flow on its first visible step. A flow without visible steps
    /// starts (and stays) complete.
    pub fn start(flow: CompiledFlow<P>, config: FlowConfig) -> Self {
        let answers = AnswerMap::new();
        let state = match sequence::first_visible_from_phase(&flow, 0, &answers) {
            Some(pos) => FlowState::AwaitingAnswer(pos),
            None => FlowState::Complete(Completion::Finished),
        };
        tracing::debug!(flow = %flow.name(), state = %state, "flow started");
        Self {
            flow,
            config,
            answers,
            state,
            generation: 0,
        }
    }

    /// Starts a flow at the position recorded in `token`, seeded with its
    /// answers. Out-of-range indices are clamped forward: to the next phase
    /// with visible steps, or to completion.
    pub fn resume(flow: CompiledFlow<P>, config: FlowConfig, token: ResumeToken) -> Self {
        let state = locate(&flow, &token);
        tracing::debug!(
            flow = %flow.name(),
            phase = token.phase_index,
            question = token.question_index,
            state = %state,
            "flow resumed"
        );
        Self {
            flow,
            config,
            answers: token.answers,
            state,
            generation: 0,
        }
    }

    pub fn flow(&self) -> &CompiledFlow<P> {
        &self.flow
    }

    pub fn config(&self) -> &FlowConfig {
        &self.config
    }

    pub fn state(&self) -> &FlowState {
        &self.state
    }

    pub fn answers(&self) -> &AnswerMap {
        &self.answers
    }

    pub fn into_answers(self) -> AnswerMap {
        self.answers
    }

    pub fn is_complete(&self) -> bool {
        self.state.is_complete()
    }

    pub fn current_position(&self) -> Option<Position> {
        self.state.position()
    }

    /// The step on screen, or `None` outside `AwaitingAnswer`.
    pub fn current_step(&self) -> Option<&StepDefinition<P>> {
        self.current_position().and_then(|pos| self.flow.step(pos))
    }

    /// The options to display for the current step. A step with
    /// `options_from` only offers what was selected in its source step.
    pub fn current_options(&self) -> Vec<&OptionDefinition> {
        self.current_step()
            .map(|step| self.options_of(step))
            .unwrap_or_default()
    }

    /// The interstitial on screen, if any.
    pub fn current_interstitial(&self) -> Option<&Interstitial> {
        match self.state {
            FlowState::Interstitial { phase } => self.flow.interstitial_after(phase),
            _ => None,
        }
    }

    /// Selects (single-select) or toggles (multi-select) an option of the
    /// current step. With auto-advance configured, a single-select answer
    /// returns a ticket for the host to fire later.
    pub fn select(&mut self, option_id: &str) -> Result<Option<AutoAdvance>, FlowError> {
        let pos = self.active("select")?;
        let flow = self.flow.clone();
        let step = self.step_at(&flow, pos, "select")?;

        if !step.kind.is_selection() {
            return Err(FlowError::KindMismatch {
                step_id: step.id.clone(),
                expected: "selection",
            });
        }
        if !self.options_of(step).iter().any(|o| o.id == option_id) {
            return Err(FlowError::UnknownOption {
                step_id: step.id.clone(),
                option_id: option_id.to_string(),
            });
        }

        self.generation += 1;
        let ticket = match step.kind {
            StepKind::MultiSelect => {
                self.answers
                    .toggle(&step.id, option_id, &step.exclusive_options());
                None
            }
            _ => {
                self.answers.replace_single(&step.id, option_id);
                self.config.auto_advance_delay().map(|delay| AutoAdvance {
                    generation: self.generation,
                    delay,
                })
            }
        };
        tracing::trace!(step = %step.id, option = option_id, "selection changed");
        self.settle_cursor();
        Ok(ticket)
    }

    pub fn set_number(&mut self, value: f64) -> Result<(), FlowError> {
        let pos = self.active("set_number")?;
        let flow = self.flow.clone();
        let step = self.step_at(&flow, pos, "set_number")?;

        let StepKind::Slider { min, max, .. } = step.kind else {
            return Err(FlowError::KindMismatch {
                step_id: step.id.clone(),
                expected: "numeric",
            });
        };
        if !(min..=max).contains(&value) {
            return Err(FlowError::OutOfRange {
                step_id: step.id.clone(),
                value,
                min,
                max,
            });
        }

        self.generation += 1;
        self.answers.set_number(&step.id, value);
        self.settle_cursor();
        Ok(())
    }

    pub fn set_text(&mut self, value: &str) -> Result<(), FlowError> {
        let pos = self.active("set_text")?;
        let flow = self.flow.clone();
        let step = self.step_at(&flow, pos, "set_text")?;

        let StepKind::Text { max_len } = step.kind else {
            return Err(FlowError::KindMismatch {
                step_id: step.id.clone(),
                expected: "text",
            });
        };
        if value.chars().count() > max_len {
            return Err(FlowError::TextTooLong {
                step_id: step.id.clone(),
                max_len,
            });
        }

        self.generation += 1;
        self.answers.set_text(&step.id, value);
        self.settle_cursor();
        Ok(())
    }

    /// Whether the "continue" action is enabled. Selection and text steps need
    /// an answer; sliders fall back to their default and notices need nothing.
    pub fn can_continue(&self) -> bool {
        match &self.state {
            FlowState::AwaitingAnswer(pos) => self.flow.step(*pos).is_some_and(|step| match step.kind {
                StepKind::Slider { .. } | StepKind::Notice => true,
                _ => self.answers.is_filled(&step.id) && self.answer_is_offered(step),
            }),
            FlowState::Interstitial { .. } => true,
            FlowState::DetourPending(_) | FlowState::Complete(_) => false,
        }
    }

    pub fn can_skip(&self) -> bool {
        match self.config.skip_policy {
            SkipPolicy::Never => false,
            SkipPolicy::Anywhere => matches!(
                self.state,
                FlowState::AwaitingAnswer(_) | FlowState::Interstitial { .. }
            ),
            SkipPolicy::FirstStep => self.state.position().is_some_and(|pos| {
                sequence::previous_visible(&self.flow, pos, &self.answers).is_none()
            }),
        }
    }

    /// The "continue" action. On a step it moves to the next visible step,
    /// shows the phase interstitial, requests a detour or completes the flow.
    /// On an interstitial it enters the next phase.
    pub fn advance(&mut self) -> Result<Transition, FlowError> {
        match self.state.clone() {
            FlowState::AwaitingAnswer(pos) => self.continue_from(pos),
            FlowState::Interstitial { phase } => {
                self.generation += 1;
                Ok(self.enter_after(phase))
            }
            FlowState::DetourPending(_) => Err(self.invalid("advance")),
            FlowState::Complete(_) => Err(FlowError::Finished),
        }
    }

    pub fn back(&mut self) -> Result<Transition, FlowError> {
        let from = match &self.state {
            FlowState::AwaitingAnswer(pos) => *pos,
            // An interstitial sits between its phase and the next one.
            FlowState::Interstitial { phase } => Position::new(phase + 1, 0),
            FlowState::DetourPending(_) => return Err(self.invalid("back")),
            FlowState::Complete(_) => return Err(FlowError::Finished),
        };

        match sequence::previous_visible(&self.flow, from, &self.answers) {
            Some(prev) => {
                self.generation += 1;
                Ok(self.move_to(prev))
            }
            None => match self.config.back_at_start {
                BackAtStart::Exit => {
                    tracing::debug!(flow = %self.flow.name(), "back on first step, exit requested");
                    Ok(Transition::ExitRequested)
                }
                BackAtStart::Ignore => Ok(Transition::Stayed),
            },
        }
    }

    pub fn skip(&mut self) -> Result<Transition, FlowError> {
        if self.state.is_complete() {
            return Err(FlowError::Finished);
        }
        if !self.can_skip() {
            return Err(FlowError::SkipNotAllowed);
        }
        self.generation += 1;
        Ok(self.complete(Completion::Skipped))
    }

    /// Fires a ticket returned by [`select`](Self::select). Stale tickets are
    /// ignored and report [`Transition::Stayed`].
    pub fn fire_auto_advance(&mut self, ticket: AutoAdvance) -> Result<Transition, FlowError> {
        if ticket.generation != self.generation || self.state.position().is_none() {
            tracing::warn!(
                ticket = ticket.generation,
                current = self.generation,
                "ignoring stale auto-advance"
            );
            return Ok(Transition::Stayed);
        }
        self.advance()
    }

    /// Returns from a detour. The token's answers replace the current ones,
    /// so answers collected by the external flow can be merged in by the host.
    pub fn reenter(&mut self, token: ResumeToken) -> Result<Transition, FlowError> {
        match &self.state {
            FlowState::DetourPending(_) => {}
            FlowState::Complete(_) => return Err(FlowError::Finished),
            _ => return Err(self.invalid("reenter")),
        }

        self.generation += 1;
        self.state = locate(&self.flow, &token);
        self.answers = token.answers;
        tracing::info!(flow = %self.flow.name(), state = %self.state, "returned from detour");

        Ok(match &self.state {
            FlowState::AwaitingAnswer(pos) => Transition::Moved(*pos),
            FlowState::Complete(completion) => Transition::Completed(*completion),
            _ => Transition::Stayed,
        })
    }

    /// A token that resumes the flow where it stands now. `None` once the
    /// flow is complete.
    pub fn snapshot(&self) -> Option<ResumeToken> {
        match &self.state {
            FlowState::AwaitingAnswer(pos) => sequence::visible_index(&self.flow, *pos, &self.answers)
                .map(|idx| ResumeToken::new(pos.phase, idx, self.answers.clone())),
            FlowState::Interstitial { phase } => {
                Some(ResumeToken::new(phase + 1, 0, self.answers.clone()))
            }
            FlowState::DetourPending(token) => Some(token.clone()),
            FlowState::Complete(_) => None,
        }
    }

    pub fn progress(&self) -> Progress {
        let visible = sequence::visible_positions(&self.flow, &self.answers);
        let total = visible.len();
        let current = match &self.state {
            FlowState::AwaitingAnswer(pos) => visible
                .iter()
                .position(|p| p == pos)
                .map_or(0, |idx| idx + 1),
            FlowState::Interstitial { phase } => {
                visible.iter().filter(|p| p.phase <= *phase).count()
            }
            FlowState::DetourPending(_) | FlowState::Complete(_) => total,
        };
        Progress::new(current, total)
    }

    fn continue_from(&mut self, pos: Position) -> Result<Transition, FlowError> {
        let flow = self.flow.clone();
        let step = self.step_at(&flow, pos, "advance")?;
        if !self.can_continue() {
            return Err(FlowError::CannotContinue(step.id.clone()));
        }

        if let StepKind::Slider { default, .. } = step.kind {
            if self.answers.get(&step.id).is_none() {
                self.answers.set_number(&step.id, default);
            }
        }
        self.generation += 1;

        if let Some(detour) = &step.detour {
            if self.answers.contains(&step.id, &detour.option) {
                let token = self.token_after(pos);
                tracing::info!(
                    flow = %flow.name(),
                    step = %step.id,
                    target = %detour.target,
                    phase = token.phase_index,
                    question = token.question_index,
                    "detour requested"
                );
                self.state = FlowState::DetourPending(token.clone());
                return Ok(Transition::Detour(token));
            }
        }

        if let Some(next) = sequence::next_in_phase(&flow, pos, &self.answers) {
            self.apply_auto_answers((Bound::Excluded(pos), Bound::Excluded(next)));
            return Ok(self.move_to(next));
        }

        let phase_end = Position::new(pos.phase + 1, 0);
        match sequence::first_visible_from_phase(&flow, pos.phase + 1, &self.answers) {
            None => {
                self.apply_auto_answers((Bound::Excluded(pos), Bound::Unbounded));
                Ok(self.complete(Completion::Finished))
            }
            Some(_) if flow.interstitial_after(pos.phase).is_some() => {
                self.apply_auto_answers((Bound::Excluded(pos), Bound::Excluded(phase_end)));
                self.state = FlowState::Interstitial { phase: pos.phase };
                tracing::debug!(flow = %flow.name(), phase = pos.phase, "showing interstitial");
                Ok(Transition::Interstitial { phase: pos.phase })
            }
            Some(next) => {
                self.apply_auto_answers((Bound::Excluded(pos), Bound::Excluded(next)));
                Ok(self.move_to(next))
            }
        }
    }

    fn enter_after(&mut self, phase: usize) -> Transition {
        let start = Position::new(phase + 1, 0);
        match sequence::first_visible_from_phase(&self.flow, phase + 1, &self.answers) {
            Some(next) => {
                self.apply_auto_answers(start..next);
                self.move_to(next)
            }
            None => {
                self.apply_auto_answers(start..);
                self.complete(Completion::Finished)
            }
        }
    }

    /// Records the derived answer of every hidden auto-answer step in `range`.
    /// Runs whenever the cursor passes over such a step, so the answer always
    /// reflects the source selection as it was when the user moved on.
    fn apply_auto_answers<R: RangeBounds<Position>>(&mut self, range: R) {
        let flow = self.flow.clone();
        for pos in flow.positions().filter(|p| range.contains(p)) {
            let Some(step) = flow.step(pos) else { continue };
            let Some(AutoAnswer::SoleSelection { from, ignoring }) = &step.auto_answer else {
                continue;
            };
            if sequence::is_visible(step, &self.answers) {
                continue;
            }

            let sole = self.answers.selection(from).and_then(|set| {
                set.iter()
                    .filter(|id| !ignoring.contains(*id))
                    .exactly_one()
                    .ok()
                    .cloned()
            });
            if let Some(only) = sole {
                tracing::debug!(step = %step.id, answer = %only, "auto-answered hidden step");
                self.answers.replace_single(&step.id, &only);
            }
        }
    }

    /// The token a detour from `pos` hands out: the next visible step of the
    /// phase, or the start of the next phase when `pos` is its last step.
    fn token_after(&self, pos: Position) -> ResumeToken {
        let visible = sequence::visible_in_phase(&self.flow, pos.phase, &self.answers);
        let next = sequence::visible_index(&self.flow, pos, &self.answers).map_or(0, |idx| idx + 1);
        if next >= visible.len() {
            ResumeToken::new(pos.phase + 1, 0, self.answers.clone())
        } else {
            ResumeToken::new(pos.phase, next, self.answers.clone())
        }
    }

    /// Keeps the cursor on a visible step after an answer changed. Only
    /// matters for flows compiled with forward references.
    fn settle_cursor(&mut self) {
        let FlowState::AwaitingAnswer(pos) = self.state else {
            return;
        };
        if self
            .flow
            .step(pos)
            .is_some_and(|step| sequence::is_visible(step, &self.answers))
        {
            return;
        }

        let visible = sequence::visible_positions(&self.flow, &self.answers);
        let target = visible
            .iter()
            .find(|p| **p > pos)
            .or_else(|| visible.iter().rev().find(|p| **p < pos))
            .copied();
        tracing::debug!(from_phase = pos.phase, from_step = pos.step, ?target, "cursor step was hidden");
        self.state = match target {
            Some(next) => FlowState::AwaitingAnswer(next),
            None => FlowState::Complete(Completion::Finished),
        };
    }

    fn move_to(&mut self, pos: Position) -> Transition {
        self.drop_unoffered(pos);
        self.state = FlowState::AwaitingAnswer(pos);
        tracing::debug!(
            flow = %self.flow.name(),
            phase = pos.phase,
            step = pos.step,
            "cursor moved"
        );
        Transition::Moved(pos)
    }

    fn complete(&mut self, completion: Completion) -> Transition {
        self.state = FlowState::Complete(completion);
        tracing::info!(flow = %self.flow.name(), ?completion, answers = self.answers.len(), "flow completed");
        Transition::Completed(completion)
    }

    fn options_of<'a>(&'a self, step: &'a StepDefinition<P>) -> Vec<&'a OptionDefinition> {
        match step.options_from.as_deref() {
            Some(source) => step
                .options
                .iter()
                .filter(|o| self.answers.contains(source, &o.id))
                .collect(),
            None => step.options.iter().collect(),
        }
    }

    /// A selection on an `options_from` step only counts while every picked
    /// option is still offered.
    fn answer_is_offered(&self, step: &StepDefinition<P>) -> bool {
        if step.options_from.is_none() {
            return true;
        }
        let offered = self.options_of(step);
        self.answers.selection(&step.id).is_none_or(|set| {
            set.iter().all(|id| offered.iter().any(|o| &o.id == id))
        })
    }

    /// Removes picks that the source step no longer offers, so a revisited
    /// step shows (and keeps) only answers the user can still see.
    fn drop_unoffered(&mut self, pos: Position) {
        let flow = self.flow.clone();
        let Some(step) = flow.step(pos) else { return };
        if self.answer_is_offered(step) {
            return;
        }
        let offered: BTreeSet<String> = self
            .options_of(step)
            .iter()
            .map(|o| o.id.clone())
            .collect();
        let kept: BTreeSet<String> = self
            .answers
            .selection(&step.id)
            .map(|set| set.intersection(&offered).cloned().collect())
            .unwrap_or_default();
        tracing::debug!(step = %step.id, kept = kept.len(), "dropped picks no longer offered");
        self.answers.insert(&step.id, AnswerValue::Selection(kept));
    }

    fn active(&self, operation: &'static str) -> Result<Position, FlowError> {
        match &self.state {
            FlowState::AwaitingAnswer(pos) => Ok(*pos),
            FlowState::Complete(_) => Err(FlowError::Finished),
            _ => Err(self.invalid(operation)),
        }
    }

    fn step_at<'f>(
        &self,
        flow: &'f CompiledFlow<P>,
        pos: Position,
        operation: &'static str,
    ) -> Result<&'f StepDefinition<P>, FlowError> {
        flow.step(pos).ok_or_else(|| self.invalid(operation))
    }

    fn invalid(&self, operation: &'static str) -> FlowError {
        FlowError::InvalidState {
            operation,
            state: self.state.to_string(),
        }
    }
}

/// Maps a resume token onto a state of `flow`, clamping indices that no
/// longer address a visible step.
fn locate<P: Predicate>(flow: &CompiledFlow<P>, token: &ResumeToken) -> FlowState {
    if token.phase_index >= flow.phase_count() {
        return FlowState::Complete(Completion::Finished);
    }
    let visible = sequence::visible_in_phase(flow, token.phase_index, &token.answers);
    let position = match visible.get(token.question_index) {
        Some(&step) => Some(Position::new(token.phase_index, step)),
        None => sequence::first_visible_from_phase(flow, token.phase_index + 1, &token.answers),
    };
    match position {
        Some(pos) => FlowState::AwaitingAnswer(pos),
        None => FlowState::Complete(Completion::Finished),
    }
}
