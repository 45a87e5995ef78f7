use crate::answers::{AnswerMap, AnswerValue};
use crate::error::TokenError;
use bincode::config::standard;
use bincode::serde::{decode_from_slice, encode_to_vec};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A snapshot of a flow's cursor and answers, taken when the user leaves the
/// flow for an external one.
///
/// `question_index` indexes the *visible* steps of `phase_index`, recomputed
/// from `answers` when the token is used. A token produced by a detour always
/// points at the step after the triggering question.
///
/// The JSON form uses the keys `phaseIndex`, `questionIndex` and `answers`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeToken {
    pub phase_index: usize,
    pub question_index: usize,
    pub answers: AnswerMap,
}

impl ResumeToken {
    pub fn new(phase_index: usize, question_index: usize, answers: AnswerMap) -> Self {
        Self {
            phase_index,
            question_index,
            answers,
        }
    }

    pub fn to_json(&self) -> Result<String, TokenError> {
        serde_json::to_string(self).map_err(|e| TokenError::Encode(e.to_string()))
    }

    pub fn from_json(json: &str) -> Result<Self, TokenError> {
        serde_json::from_str(json).map_err(|e| TokenError::Decode(e.to_string()))
    }

    /// Compact binary encoding, for hosts that persist tokens across restarts.
    pub fn to_bytes(&self) -> Result<Vec<u8>, TokenError> {
        encode_to_vec(WireToken::from(self), standard())
            .map_err(|e| TokenError::Encode(e.to_string()))
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, TokenError> {
        decode_from_slice::<WireToken, _>(bytes, standard())
            .map(|(wire, _)| wire.into())
            .map_err(|e| TokenError::Decode(e.to_string()))
    }
}

// bincode is not self-describing, so the untagged `AnswerValue` cannot be
// decoded directly. The frame carries an explicit variant tag instead.
#[derive(Serialize, Deserialize)]
struct WireToken {
    phase_index: u64,
    question_index: u64,
    answers: Vec<(String, WireAnswer)>,
}

#[derive(Serialize, Deserialize)]
enum WireAnswer {
    Selection(Vec<String>),
    Number(f64),
    Text(String),
}

impl From<&ResumeToken> for WireToken {
    fn from(token: &ResumeToken) -> Self {
        let answers = token
            .answers
            .sorted_entries()
            .into_iter()
            .map(|(id, value)| {
                let wire = match value {
                    AnswerValue::Selection(set) => WireAnswer::Selection(set.iter().cloned().collect()),
                    AnswerValue::Number(n) => WireAnswer::Number(*n),
                    AnswerValue::Text(t) => WireAnswer::Text(t.clone()),
                };
                (id.clone(), wire)
            })
            .collect();
        Self {
            phase_index: token.phase_index as u64,
            question_index: token.question_index as u64,
            answers,
        }
    }
}

impl From<WireToken> for ResumeToken {
    fn from(wire: WireToken) -> Self {
        let answers = wire
            .answers
            .into_iter()
            .map(|(id, value)| {
                let value = match value {
                    WireAnswer::Selection(ids) => {
                        AnswerValue::Selection(ids.into_iter().collect::<BTreeSet<_>>())
                    }
                    WireAnswer::Number(n) => AnswerValue::Number(n),
                    WireAnswer::Text(t) => AnswerValue::Text(t),
                };
                (id, value)
            })
            .collect();
        Self {
            phase_index: wire.phase_index as usize,
            question_index: wire.question_index as usize,
            answers,
        }
    }
}
