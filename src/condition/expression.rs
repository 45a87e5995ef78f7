use super::ConditionTrace;
use crate::answers::AnswerMap;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Decides whether a step is currently part of its flow.
///
/// The flow controller is generic over this trait so that content authors can
/// plug in their own rule language; [`Condition`] is the built-in one.
pub trait Predicate {
    /// Evaluates the predicate against a read-only snapshot of the answers.
    /// Must be pure: the same answers always produce the same outcome.
    fn is_satisfied(&self, answers: &AnswerMap) -> bool;

    /// The step identifiers this predicate reads. Used by the compiler to
    /// reject references to unknown or later steps.
    fn referenced_steps(&self) -> Vec<&str>;
}

/// The built-in inclusion predicate attached to each step definition.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    /// No condition: the step is always visible.
    #[default]
    Always,
    /// The answer to `step` contains `value`.
    Contains { step: String, value: String },
    /// The answer to `step` contains at least one of `values`.
    ContainsAny { step: String, values: Vec<String> },
    /// The answer to `step` has more than `threshold` entries once the
    /// `ignoring` options are discounted.
    CountAbove {
        step: String,
        threshold: usize,
        #[serde(default)]
        ignoring: Vec<String>,
    },
    Not(Box<Condition>),
    All(Vec<Condition>),
    Any(Vec<Condition>),
}

impl Condition {
    pub fn contains(step: impl Into<String>, value: impl Into<String>) -> Self {
        Condition::Contains {
            step: step.into(),
            value: value.into(),
        }
    }

    pub fn contains_any<I, S>(step: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Condition::ContainsAny {
            step: step.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    pub fn count_above<I, S>(step: impl Into<String>, threshold: usize, ignoring: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Condition::CountAbove {
            step: step.into(),
            threshold,
            ignoring: ignoring.into_iter().map(Into::into).collect(),
        }
    }

    pub fn negate(condition: Condition) -> Self {
        Condition::Not(Box::new(condition))
    }

    pub fn is_always(&self) -> bool {
        matches!(self, Condition::Always)
    }

    /// Collects the step identifiers referenced by this condition.
    pub fn collect_references<'a>(&'a self, refs: &mut Vec<&'a str>) {
        match self {
            Condition::Always => {}
            Condition::Contains { step, .. }
            | Condition::ContainsAny { step, .. }
            | Condition::CountAbove { step, .. } => {
                if !refs.contains(&step.as_str()) {
                    refs.push(step);
                }
            }
            Condition::Not(inner) => inner.collect_references(refs),
            Condition::All(children) | Condition::Any(children) => {
                for child in children {
                    child.collect_references(refs);
                }
            }
        }
    }

    /// Evaluates the condition and records how each part contributed.
    pub fn explain(&self, answers: &AnswerMap) -> ConditionTrace {
        match self {
            Condition::Always => ConditionTrace::Always,
            Condition::Contains { .. }
            | Condition::ContainsAny { .. }
            | Condition::CountAbove { .. } => ConditionTrace::Leaf {
                description: self.to_string(),
                observed: observed_answer(self, answers),
                outcome: self.evaluate_leaf(answers),
            },
            Condition::Not(inner) => {
                let child = inner.explain(answers);
                let outcome = !child.outcome();
                ConditionTrace::Not {
                    child: Box::new(child),
                    outcome,
                }
            }
            Condition::All(children) => {
                let children: Vec<_> = children.iter().map(|c| c.explain(answers)).collect();
                let outcome = children.iter().all(ConditionTrace::outcome);
                ConditionTrace::All { children, outcome }
            }
            Condition::Any(children) => {
                let children: Vec<_> = children.iter().map(|c| c.explain(answers)).collect();
                let outcome = children.iter().any(ConditionTrace::outcome);
                ConditionTrace::Any { children, outcome }
            }
        }
    }

    fn evaluate_leaf(&self, answers: &AnswerMap) -> bool {
        match self {
            Condition::Contains { step, value } => answers.contains(step, value),
            Condition::ContainsAny { step, values } => answers
                .selection(step)
                .is_some_and(|set| values.iter().any(|v| set.contains(v))),
            Condition::CountAbove {
                step,
                threshold,
                ignoring,
            } => answers.selection(step).is_some_and(|set| {
                set.iter().filter(|v| !ignoring.contains(*v)).count() > *threshold
            }),
            _ => self.is_satisfied(answers),
        }
    }
}

impl Predicate for Condition {
    fn is_satisfied(&self, answers: &AnswerMap) -> bool {
        match self {
            Condition::Always => true,
            Condition::Not(inner) => !inner.is_satisfied(answers),
            Condition::All(children) => children.iter().all(|c| c.is_satisfied(answers)),
            Condition::Any(children) => children.iter().any(|c| c.is_satisfied(answers)),
            leaf => leaf.evaluate_leaf(answers),
        }
    }

    fn referenced_steps(&self) -> Vec<&str> {
        let mut refs = Vec::new();
        self.collect_references(&mut refs);
        refs
    }
}

fn observed_answer(leaf: &Condition, answers: &AnswerMap) -> Option<String> {
    let step = match leaf {
        Condition::Contains { step, .. }
        | Condition::ContainsAny { step, .. }
        | Condition::CountAbove { step, .. } => step,
        _ => return None,
    };
    answers.get(step).map(|value| value.to_string())
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::Always => write!(f, "always"),
            Condition::Contains { step, value } => write!(f, "{} contains \"{}\"", step, value),
            Condition::ContainsAny { step, values } => write!(
                f,
                "{} contains any of [{}]",
                step,
                values.iter().map(|v| format!("\"{}\"", v)).join(", ")
            ),
            Condition::CountAbove {
                step,
                threshold,
                ignoring,
            } => {
                write!(f, "count({}", step)?;
                if !ignoring.is_empty() {
                    write!(f, " without {}", ignoring.iter().join(", "))?;
                }
                write!(f, ") > {}", threshold)
            }
            Condition::Not(inner) => write!(f, "NOT ({})", inner),
            Condition::All(children) => {
                write!(f, "({})", children.iter().map(|c| c.to_string()).join(" AND "))
            }
            Condition::Any(children) => {
                write!(f, "({})", children.iter().map(|c| c.to_string()).join(" OR "))
            }
        }
    }
}
