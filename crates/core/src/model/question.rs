use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::QuestionId;

/// Fewest answer options a generated question may carry.
pub const MIN_OPTIONS: usize = 3;
/// Most answer options a generated question may carry.
pub const MAX_OPTIONS: usize = 8;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question text is empty")]
    EmptyText,

    #[error("question has {count} options, expected at least {}", MIN_OPTIONS)]
    TooFewOptions { count: usize },

    #[error("question has {count} options, expected at most {}", MAX_OPTIONS)]
    TooManyOptions { count: usize },

    #[error("option {index} is blank")]
    BlankOption { index: usize },
}

//
// ─── DRAFT ─────────────────────────────────────────────────────────────────────
//

/// A question produced outside the session (generator output) that has passed
/// validation but has no id yet. Deserializing goes through
/// [`QuestionDraft::new`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawDraft")]
pub struct QuestionDraft {
    text: String,
    options: Vec<String>,
}

#[derive(Deserialize)]
struct RawDraft {
    text: String,
    options: Vec<String>,
}

impl TryFrom<RawDraft> for QuestionDraft {
    type Error = QuestionError;

    fn try_from(raw: RawDraft) -> Result<Self, Self::Error> {
        Self::new(raw.text, raw.options)
    }
}

impl QuestionDraft {
    /// Validate generator output.
    ///
    /// Text and options are trimmed. The option count must be within
    /// `MIN_OPTIONS..=MAX_OPTIONS`.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` when the text is empty, an option is blank,
    /// or the option count is out of range.
    pub fn new(
        text: impl Into<String>,
        options: impl IntoIterator<Item = String>,
    ) -> Result<Self, QuestionError> {
        let text = text.into().trim().to_string();
        if text.is_empty() {
            return Err(QuestionError::EmptyText);
        }

        let options: Vec<String> = options
            .into_iter()
            .map(|option| option.trim().to_string())
            .collect();
        if let Some(index) = options.iter().position(String::is_empty) {
            return Err(QuestionError::BlankOption { index });
        }
        if options.len() < MIN_OPTIONS {
            return Err(QuestionError::TooFewOptions {
                count: options.len(),
            });
        }
        if options.len() > MAX_OPTIONS {
            return Err(QuestionError::TooManyOptions {
                count: options.len(),
            });
        }

        Ok(Self { text, options })
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// A question shown to the user. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    id: QuestionId,
    text: String,
    options: Vec<String>,
}

impl Question {
    /// Build a question from trusted content (seed bank, fallback).
    #[must_use]
    pub fn new(id: QuestionId, text: impl Into<String>, options: Vec<String>) -> Self {
        Self {
            id,
            text: text.into(),
            options,
        }
    }

    /// Assign an id to validated generator output.
    #[must_use]
    pub fn from_draft(id: QuestionId, draft: QuestionDraft) -> Self {
        Self {
            id,
            text: draft.text,
            options: draft.options,
        }
    }

    #[must_use]
    pub fn id(&self) -> QuestionId {
        self.id
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    #[must_use]
    pub fn has_option(&self, option: &str) -> bool {
        self.options.iter().any(|candidate| candidate == option)
    }
}
