use std::time::Duration;

/// A pending auto-advance handed to the host after a single-select answer.
///
/// The host waits for `delay` and then passes the ticket back to
/// [`FlowController::fire_auto_advance`](super::FlowController::fire_auto_advance).
/// A ticket is only honoured while the controller's generation still matches,
/// so a timer that outlives its step cannot move the flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AutoAdvance {
    pub(super) generation: u64,
    pub delay: Duration,
}

impl AutoAdvance {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}
