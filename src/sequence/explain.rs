use crate::answers::AnswerMap;
use crate::compiler::{CompiledFlow, Position};
use crate::condition::ConditionTrace;
use crate::trace::TraceFormatter;

/// Why a step is (or is not) part of the current sequence.
#[derive(Debug, Clone)]
pub struct StepVisibility {
    pub step_id: String,
    pub position: Position,
    pub visible: bool,
    pub trace: ConditionTrace,
}

impl StepVisibility {
    /// A one-line, human-readable explanation of the decision.
    pub fn reason(&self) -> String {
        TraceFormatter::format_trace(&self.trace)
    }
}

/// Evaluates every step of a flow and records the reasoning behind its
/// visibility.
pub fn explain_visibility(flow: &CompiledFlow, answers: &AnswerMap) -> Vec<StepVisibility> {
    flow.positions()
        .filter_map(|pos| flow.step(pos).map(|step| (pos, step)))
        .map(|(position, step)| {
            let trace = step.condition.explain(answers);
            StepVisibility {
                step_id: step.id.clone(),
                position,
                visible: trace.outcome(),
                trace,
            }
        })
        .collect()
}
