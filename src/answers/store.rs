use super::AnswerValue;
use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// The answers accumulated by one running flow, keyed by step identifier.
///
/// Entries are only ever replaced, never removed: un-toggling the last option
/// of a multi-select leaves an empty selection behind.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerMap {
    entries: AHashMap<String, AnswerValue>,
}

impl AnswerMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, step_id: &str) -> Option<&AnswerValue> {
        self.entries.get(step_id)
    }

    /// Returns the selection recorded for `step_id`, if it is a selection.
    pub fn selection(&self, step_id: &str) -> Option<&BTreeSet<String>> {
        self.entries.get(step_id).and_then(AnswerValue::as_selection)
    }

    /// Set-membership test. An absent key or a non-selection answer is `false`.
    pub fn contains(&self, step_id: &str, option_id: &str) -> bool {
        self.selection(step_id)
            .is_some_and(|set| set.contains(option_id))
    }

    pub fn number(&self, step_id: &str) -> Option<f64> {
        self.entries.get(step_id).and_then(AnswerValue::as_number)
    }

    pub fn text(&self, step_id: &str) -> Option<&str> {
        self.entries.get(step_id).and_then(AnswerValue::as_text)
    }

    pub fn is_filled(&self, step_id: &str) -> bool {
        self.entries.get(step_id).is_some_and(AnswerValue::is_filled)
    }

    /// Toggles `option_id` in the multi-select answer of `step_id`.
    ///
    /// `exclusive` lists the options of the step that may not be combined with
    /// any other (for example "none"). Choosing one of them clears the set;
    /// choosing any other option drops them.
    pub fn toggle(&mut self, step_id: &str, option_id: &str, exclusive: &[&str]) {
        let mut set = match self.entries.remove(step_id) {
            Some(AnswerValue::Selection(set)) => set,
            _ => BTreeSet::new(),
        };
        if !set.remove(option_id) {
            if exclusive.contains(&option_id) {
                set.clear();
            } else {
                set.retain(|existing| !exclusive.contains(&existing.as_str()));
            }
            set.insert(option_id.to_string());
        }
        self.insert(step_id, AnswerValue::Selection(set));
    }

    /// Replaces the answer of a single-select step with `{option_id}`.
    pub fn replace_single(&mut self, step_id: &str, option_id: &str) {
        self.insert(step_id, AnswerValue::selection([option_id]));
    }

    pub fn set_number(&mut self, step_id: &str, value: f64) {
        self.insert(step_id, AnswerValue::Number(value));
    }

    pub fn set_text(&mut self, step_id: &str, value: impl Into<String>) {
        self.insert(step_id, AnswerValue::Text(value.into()));
    }

    pub fn insert(&mut self, step_id: &str, value: AnswerValue) {
        self.entries.insert(step_id.to_string(), value);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &AnswerValue)> {
        self.entries.iter()
    }

    /// Entries ordered by step identifier, for stable output.
    pub fn sorted_entries(&self) -> Vec<(&String, &AnswerValue)> {
        let mut entries: Vec<_> = self.entries.iter().collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        entries
    }
}

impl FromIterator<(String, AnswerValue)> for AnswerMap {
    fn from_iter<T: IntoIterator<Item = (String, AnswerValue)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
