/// A record of how a condition was evaluated against a set of answers.
#[derive(Debug, Clone, PartialEq)]
pub enum ConditionTrace {
    /// The step carries no condition.
    Always,
    Leaf {
        description: String,
        /// The answer that was inspected, rendered for display. `None` when
        /// the referenced step has not been answered.
        observed: Option<String>,
        outcome: bool,
    },
    Not {
        child: Box<ConditionTrace>,
        outcome: bool,
    },
    All {
        children: Vec<ConditionTrace>,
        outcome: bool,
    },
    Any {
        children: Vec<ConditionTrace>,
        outcome: bool,
    },
}

impl ConditionTrace {
    pub fn outcome(&self) -> bool {
        match self {
            ConditionTrace::Always => true,
            ConditionTrace::Leaf { outcome, .. }
            | ConditionTrace::Not { outcome, .. }
            | ConditionTrace::All { outcome, .. }
            | ConditionTrace::Any { outcome, .. } => *outcome,
        }
    }

    pub fn precedence(&self) -> u8 {
        match self {
            ConditionTrace::Any { .. } => 1,
            ConditionTrace::All { .. } => 2,
            ConditionTrace::Not { .. } => 3,
            ConditionTrace::Leaf { .. } | ConditionTrace::Always => 4,
        }
    }
}
