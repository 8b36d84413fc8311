//! Question and summary generation.
//!
//! The session core only sees the two traits; the model-backed
//! implementations live here and the HTTP client in `remote`.

pub mod prompt;
mod question;
mod summary;

pub use question::{ModelQuestionGenerator, QuestionGenerator};
pub use summary::{ModelSummaryGenerator, SummaryGenerator};
