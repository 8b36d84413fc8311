//! JSON bodies of the generation endpoints, shared by the server and the
//! endpoint client.
//!
//! Answers travel as an object keyed by the 1-based position of the question
//! in the accompanying question list: `{"1": ["Happy"], "3": ["Not sure"]}`.

use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use calm_core::model::{QuestionDraft, Summary};
use calm_core::session::{AnsweredQuestion, QuestionContext, SummaryContext};

use crate::error::GenerationError;
use crate::export::ExportEntry;

/// Answers keyed by 1-based question position.
pub type AnswerMap = BTreeMap<usize, Vec<String>>;

/// A question given either as bare text or as an object with a `text` field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QuestionRef {
    Text(String),
    Object { text: String },
}

impl QuestionRef {
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            QuestionRef::Text(text) | QuestionRef::Object { text } => text,
        }
    }
}

fn pair_up(questions: &[QuestionRef], answers: &AnswerMap) -> Vec<AnsweredQuestion> {
    questions
        .iter()
        .enumerate()
        .map(|(index, question)| {
            AnsweredQuestion::new(
                question.text(),
                answers.get(&(index + 1)).cloned().unwrap_or_default(),
            )
        })
        .collect()
}

fn split(entries: &[AnsweredQuestion]) -> (Vec<QuestionRef>, AnswerMap) {
    let questions = entries
        .iter()
        .map(|entry| QuestionRef::Text(entry.text.clone()))
        .collect();
    let answers = entries
        .iter()
        .enumerate()
        .filter(|(_, entry)| !entry.answers.is_empty())
        .map(|(index, entry)| (index + 1, entry.answers.clone()))
        .collect();
    (questions, answers)
}

//
// ─── GENERATE QUESTION ─────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateQuestionRequest {
    #[serde(default)]
    pub previous_questions: Vec<QuestionRef>,
    #[serde(default)]
    pub previous_answers: AnswerMap,
}

impl GenerateQuestionRequest {
    #[must_use]
    pub fn from_context(context: &QuestionContext) -> Self {
        let (previous_questions, previous_answers) = split(&context.history);
        Self {
            previous_questions,
            previous_answers,
        }
    }

    #[must_use]
    pub fn into_context(self) -> QuestionContext {
        QuestionContext {
            history: pair_up(&self.previous_questions, &self.previous_answers),
        }
    }
}

/// The object the model is constrained to produce for a question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct QuestionBody {
    /// A single question for self-reflection and mindfulness.
    pub question: String,
    /// 3 to 8 answer options for the question, including one neutral choice such as "Not sure".
    #[schemars(length(min = 3, max = 8))]
    pub options: Vec<String>,
}

impl QuestionBody {
    /// # Errors
    ///
    /// Returns `GenerationError::Question` when the body is out of range.
    pub fn into_draft(self) -> Result<QuestionDraft, GenerationError> {
        Ok(QuestionDraft::new(self.question, self.options)?)
    }
}

impl From<&QuestionDraft> for QuestionBody {
    fn from(draft: &QuestionDraft) -> Self {
        Self {
            question: draft.text().to_string(),
            options: draft.options().to_vec(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateQuestionResponse {
    pub question: QuestionBody,
}

//
// ─── GENERATE SUMMARY ──────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateSummaryRequest {
    #[serde(default)]
    pub questions: Vec<QuestionRef>,
    #[serde(default)]
    pub answers: AnswerMap,
}

impl GenerateSummaryRequest {
    #[must_use]
    pub fn from_context(context: &SummaryContext) -> Self {
        let (questions, answers) = split(&context.answered);
        Self { questions, answers }
    }

    #[must_use]
    pub fn into_context(self) -> SummaryContext {
        SummaryContext {
            answered: pair_up(&self.questions, &self.answers),
        }
    }
}

/// The object the model is constrained to produce for a summary; also the
/// success body of the summary endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct SummaryBody {
    /// A concise yet insightful summary of the user's answers.
    pub summary: String,
    /// 1-5 recommended mindful tasks based on the user's answers.
    #[schemars(length(min = 1, max = 5))]
    pub tasks: Vec<String>,
}

impl SummaryBody {
    /// # Errors
    ///
    /// Returns `GenerationError::Summary` when the body is out of range.
    pub fn into_summary(self) -> Result<Summary, GenerationError> {
        Ok(Summary::new(self.summary, self.tasks)?)
    }
}

impl From<&Summary> for SummaryBody {
    fn from(summary: &Summary) -> Self {
        Self {
            summary: summary.text().to_string(),
            tasks: summary.tasks().to_vec(),
        }
    }
}

//
// ─── EXPORT ────────────────────────────────────────────────────────────────────
//

/// Body of the export endpoint: the summary plus answered questions in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportRequest {
    pub summary: SummaryBody,
    #[serde(default)]
    pub entries: Vec<ExportEntry>,
}

/// Failure body shared by all endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    #[must_use]
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
