use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::ids::QuestionId;

/// Multi-select answers keyed by question.
///
/// A missing key means the question is unanswered. Removing the last option
/// of a question removes its key, so no empty selection is ever stored.
/// Options keep the order in which they were first selected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerSet {
    selections: BTreeMap<QuestionId, Vec<String>>,
}

impl AnswerSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip membership of `option` for `question_id`.
    ///
    /// Returns `true` when the option is selected after the call.
    pub fn toggle(&mut self, question_id: QuestionId, option: &str) -> bool {
        let selected = self.selections.entry(question_id).or_default();
        if let Some(pos) = selected.iter().position(|value| value == option) {
            selected.remove(pos);
            if selected.is_empty() {
                self.selections.remove(&question_id);
            }
            false
        } else {
            selected.push(option.to_string());
            true
        }
    }

    /// Replace the selection with a single free-text entry.
    ///
    /// Blank text clears the answer.
    pub fn replace(&mut self, question_id: QuestionId, text: &str) {
        let text = text.trim();
        if text.is_empty() {
            self.selections.remove(&question_id);
        } else {
            self.selections.insert(question_id, vec![text.to_string()]);
        }
    }

    #[must_use]
    pub fn contains(&self, question_id: QuestionId, option: &str) -> bool {
        self.selections
            .get(&question_id)
            .is_some_and(|selected| selected.iter().any(|value| value == option))
    }

    /// Selected options for a question, empty when unanswered.
    #[must_use]
    pub fn selected(&self, question_id: QuestionId) -> &[String] {
        self.selections
            .get(&question_id)
            .map_or(&[], Vec::as_slice)
    }

    #[must_use]
    pub fn is_answered(&self, question_id: QuestionId) -> bool {
        self.selections.contains_key(&question_id)
    }

    pub fn question_ids(&self) -> impl Iterator<Item = QuestionId> + '_ {
        self.selections.keys().copied()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.selections.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_membership_follows_call_parity() {
        let id = QuestionId::new(1);
        for calls in 1..=7 {
            let mut answers = AnswerSet::new();
            for _ in 0..calls {
                answers.toggle(id, "Happy");
            }
            assert_eq!(answers.contains(id, "Happy"), calls % 2 == 1, "calls={calls}");
        }
    }

    #[test]
    fn removing_last_option_drops_the_key() {
        let id = QuestionId::new(2);
        let mut answers = AnswerSet::new();
        assert!(answers.toggle(id, "Tired"));
        assert!(answers.is_answered(id));
        assert!(!answers.toggle(id, "Tired"));
        assert!(!answers.is_answered(id));
        assert!(answers.is_empty());
    }

    #[test]
    fn replace_sets_single_entry_or_clears() {
        let id = QuestionId::new(5);
        let mut answers = AnswerSet::new();
        answers.toggle(id, "Happy");
        answers.toggle(id, "Excited");
        answers.replace(id, " Calm after a walk ");
        assert_eq!(answers.selected(id), ["Calm after a walk".to_string()]);
        answers.replace(id, "  ");
        assert!(!answers.is_answered(id));
    }
}
