use thiserror::Error;

use crate::model::QuestionId;
use crate::session::ModeKind;

/// Reasons a session rejects an action. A rejected action leaves the session untouched.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionError {
    #[error("{action} is not available while in {mode:?}")]
    NotAllowed {
        action: &'static str,
        mode: ModeKind,
    },

    #[error("a generation request is already in flight")]
    RequestPending,

    #[error("unknown question {0}")]
    UnknownQuestion(QuestionId),

    #[error("question {question_id} has no option {option:?}")]
    UnknownOption {
        question_id: QuestionId,
        option: String,
    },
}
