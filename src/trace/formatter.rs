use crate::condition::ConditionTrace;
use itertools::Itertools;

/// Formats visibility traces into human-readable strings
pub struct TraceFormatter;

impl TraceFormatter {
    /// Format a condition trace into a human-readable explanation.
    pub fn format_trace(trace: &ConditionTrace) -> String {
        // Start the recursive formatting with the lowest possible parent precedence.
        Self::format_recursive(trace, 0)
    }

    /// Recursively formats the trace, adding parentheses only when necessary.
    fn format_recursive(trace: &ConditionTrace, parent_precedence: u8) -> String {
        let current_precedence = trace.precedence();
        let needs_parens = current_precedence < parent_precedence;

        let body = match trace {
            ConditionTrace::Always => "no condition".to_string(),
            ConditionTrace::Leaf {
                description,
                observed,
                outcome,
            } => format!(
                "{} (was {}) -> {}",
                description,
                observed.as_deref().unwrap_or("unanswered"),
                outcome
            ),
            ConditionTrace::Not { child, .. } => {
                format!("NOT {}", Self::format_recursive(child, current_precedence))
            }
            ConditionTrace::All { children, .. } => children
                .iter()
                .map(|c| Self::format_recursive(c, current_precedence))
                .join(" AND "),
            ConditionTrace::Any { children, .. } => children
                .iter()
                .map(|c| Self::format_recursive(c, current_precedence))
                .join(" OR "),
        };

        if needs_parens {
            format!("({})", body)
        } else {
            body
        }
    }
}
