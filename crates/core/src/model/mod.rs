mod answers;
mod ids;
mod question;
mod summary;

pub use answers::AnswerSet;
pub use ids::QuestionId;
pub use question::{MAX_OPTIONS, MIN_OPTIONS, Question, QuestionDraft, QuestionError};
pub use summary::{MAX_TASKS, Summary, SummaryError};
