use serde::{Deserialize, Serialize};

/// Display progress of a running flow.
///
/// `total` counts the currently visible steps of all phases and changes only
/// when an answer flips a step's visibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Progress {
    pub current: usize,
    pub total: usize,
}

impl Progress {
    pub fn new(current: usize, total: usize) -> Self {
        Self { current, total }
    }

    /// `current / total`, or `0.0` for a flow without visible steps.
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.current as f64 / self.total as f64
        }
    }

    pub fn percent(&self) -> f64 {
        self.fraction() * 100.0
    }

    pub fn is_done(&self) -> bool {
        self.current >= self.total
    }
}
