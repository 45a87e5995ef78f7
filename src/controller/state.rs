use crate::compiler::Position;
use crate::resume::ResumeToken;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How a flow ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Completion {
    Finished,
    Skipped,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FlowState {
    /// A visible step is on screen. The position is a declared position.
    AwaitingAnswer(Position),
    /// The celebration screen that follows `phase`.
    Interstitial { phase: usize },
    /// The user left for an external flow; re-enter with the token.
    DetourPending(ResumeToken),
    Complete(Completion),
}

impl FlowState {
    pub fn is_complete(&self) -> bool {
        matches!(self, FlowState::Complete(_))
    }

    pub fn position(&self) -> Option<Position> {
        match self {
            FlowState::AwaitingAnswer(pos) => Some(*pos),
            _ => None,
        }
    }
}

impl fmt::Display for FlowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlowState::AwaitingAnswer(pos) => {
                write!(f, "awaiting an answer at {}.{}", pos.phase, pos.step)
            }
            FlowState::Interstitial { phase } => write!(f, "showing the interstitial after phase {}", phase),
            FlowState::DetourPending(_) => write!(f, "waiting for a detour to return"),
            FlowState::Complete(Completion::Finished) => write!(f, "finished"),
            FlowState::Complete(Completion::Skipped) => write!(f, "skipped"),
        }
    }
}

/// What a navigation operation did.
#[derive(Debug, Clone, PartialEq)]
pub enum Transition {
    /// Nothing changed.
    Stayed,
    Moved(Position),
    Interstitial { phase: usize },
    Detour(ResumeToken),
    Completed(Completion),
    /// `back` on the first step; the host should leave the flow.
    ExitRequested,
}
