//! Shared error types for the services crate.

use thiserror::Error;

use calm_core::model::{QuestionError, SummaryError};

/// Errors emitted while producing a question or a summary.
///
/// Transport failures and out-of-range model output are both reported here;
/// callers treat every variant the same way.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GenerationError {
    #[error("text generation is not configured")]
    Disabled,
    #[error("text generation returned an empty response")]
    EmptyResponse,
    #[error("text generation request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error("endpoint answered {status}: {message}")]
    Endpoint {
        status: reqwest::StatusCode,
        message: String,
    },
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("model output does not match the schema: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error(transparent)]
    Question(#[from] QuestionError),
    #[error(transparent)]
    Summary(#[from] SummaryError),
}

/// Errors emitted while building an export document.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ExportError {
    #[error("no summary has been generated for this session")]
    MissingSummary,
    #[error("failed to write pdf: {0}")]
    Pdf(String),
}
