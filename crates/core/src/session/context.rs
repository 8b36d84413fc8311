use serde::{Deserialize, Serialize};

use crate::model::{QuestionDraft, Summary};

/// A question text with whatever the user selected for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnsweredQuestion {
    pub text: String,
    pub answers: Vec<String>,
}

impl AnsweredQuestion {
    #[must_use]
    pub fn new(text: impl Into<String>, answers: Vec<String>) -> Self {
        Self {
            text: text.into(),
            answers,
        }
    }
}

/// Everything a question generator needs: every question asked so far, in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuestionContext {
    pub history: Vec<AnsweredQuestion>,
}

/// Everything a summary generator needs: the answered questions, in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SummaryContext {
    pub answered: Vec<AnsweredQuestion>,
}

/// Tagged result of a question request. The session substitutes the
/// fallback question for `Failed`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuestionOutcome {
    Generated(QuestionDraft),
    Failed { reason: String },
}

/// Tagged result of a summary request. `Failed` becomes a retryable notice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SummaryOutcome {
    Generated(Summary),
    Failed { reason: String },
}

/// Identifies one generation request. A result is only accepted when it
/// carries the ticket of the request the session is still waiting on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Ticket(u64);

impl Ticket {
    pub(crate) const fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl std::fmt::Display for Ticket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl Default for Ticket {
    fn default() -> Self {
        Self(1)
    }
}

/// What the driver must do after an action. Generation requests carry the
/// ticket to hand back with the result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    None,
    GenerateQuestion {
        ticket: Ticket,
        context: QuestionContext,
    },
    GenerateSummary {
        ticket: Ticket,
        context: SummaryContext,
    },
}

/// User-visible message left on the session by a failed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    SummaryFailed { reason: String },
}
