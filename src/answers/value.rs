use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// The recorded answer to a single step.
///
/// Selections are sets: order is irrelevant and duplicates are impossible.
/// In JSON a selection is a string array, a number is a number and free text
/// is a string, which keeps resume tokens readable by other clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    Selection(BTreeSet<String>),
    Number(f64),
    Text(String),
}

impl AnswerValue {
    /// Creates a selection from any iterator of option identifiers.
    pub fn selection<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        AnswerValue::Selection(ids.into_iter().map(Into::into).collect())
    }

    pub fn as_selection(&self) -> Option<&BTreeSet<String>> {
        match self {
            AnswerValue::Selection(set) => Some(set),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            AnswerValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            AnswerValue::Text(t) => Some(t),
            _ => None,
        }
    }

    /// Whether the answer satisfies a required step: a non-empty selection,
    /// any number, or non-blank text.
    pub fn is_filled(&self) -> bool {
        match self {
            AnswerValue::Selection(set) => !set.is_empty(),
            AnswerValue::Number(_) => true,
            AnswerValue::Text(t) => !t.trim().is_empty(),
        }
    }
}

impl fmt::Display for AnswerValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnswerValue::Selection(set) => write!(f, "{{{}}}", set.iter().join(", ")),
            AnswerValue::Number(n) => {
                if n.fract() == 0.0 {
                    write!(f, "{}", *n as i64)
                } else {
                    write!(f, "{}", n)
                }
            }
            AnswerValue::Text(t) => write!(f, "\"{}\"", t),
        }
    }
}
