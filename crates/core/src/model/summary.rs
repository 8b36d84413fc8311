use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Most suggested tasks a summary may carry.
pub const MAX_TASKS: usize = 5;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SummaryError {
    #[error("summary text is empty")]
    EmptyText,

    #[error("summary has no suggested tasks")]
    NoTasks,

    #[error("summary has {count} tasks, expected at most {}", MAX_TASKS)]
    TooManyTasks { count: usize },

    #[error("task {index} is blank")]
    BlankTask { index: usize },
}

/// Closing reflection for a review cycle: free text plus 1..=5 mindful tasks.
///
/// Deserializing goes through [`Summary::new`], so decoded values are
/// validated like generator output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawSummary")]
pub struct Summary {
    text: String,
    tasks: Vec<String>,
}

#[derive(Deserialize)]
struct RawSummary {
    text: String,
    tasks: Vec<String>,
}

impl TryFrom<RawSummary> for Summary {
    type Error = SummaryError;

    fn try_from(raw: RawSummary) -> Result<Self, Self::Error> {
        Self::new(raw.text, raw.tasks)
    }
}

impl Summary {
    /// Validate generator output.
    ///
    /// # Errors
    ///
    /// Returns `SummaryError` when the text is empty, a task is blank, or the
    /// task count is outside `1..=MAX_TASKS`.
    pub fn new(
        text: impl Into<String>,
        tasks: impl IntoIterator<Item = String>,
    ) -> Result<Self, SummaryError> {
        let text = text.into().trim().to_string();
        if text.is_empty() {
            return Err(SummaryError::EmptyText);
        }

        let tasks: Vec<String> = tasks.into_iter().map(|t| t.trim().to_string()).collect();
        if let Some(index) = tasks.iter().position(String::is_empty) {
            return Err(SummaryError::BlankTask { index });
        }
        match tasks.len() {
            0 => return Err(SummaryError::NoTasks),
            count if count > MAX_TASKS => return Err(SummaryError::TooManyTasks { count }),
            _ => {}
        }

        Ok(Self { text, tasks })
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn tasks(&self) -> &[String] {
        &self.tasks
    }

    /// Split the text at sentence boundaries (`.`, `!`, `?` followed by
    /// whitespace) for line-by-line reveal.
    #[must_use]
    pub fn sentences(&self) -> Vec<&str> {
        let mut out = Vec::new();
        let mut start = 0;
        let mut chars = self.text.char_indices().peekable();
        while let Some((idx, ch)) = chars.next() {
            if matches!(ch, '.' | '!' | '?')
                && chars.peek().is_some_and(|(_, next)| next.is_whitespace())
            {
                let end = idx + ch.len_utf8();
                out.push(self.text[start..end].trim());
                start = end;
            }
        }
        let rest = self.text[start..].trim();
        if !rest.is_empty() {
            out.push(rest);
        }
        out
    }
}
