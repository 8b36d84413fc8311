use async_trait::async_trait;
use tracing::debug;

use calm_core::model::QuestionDraft;
use calm_core::session::QuestionContext;

use crate::ai::ModelClient;
use crate::error::GenerationError;
use crate::generation::prompt::{question_prompt, sample_examples, EXAMPLE_SAMPLE};
use crate::wire::QuestionBody;

/// Produces the next question for a session.
#[async_trait]
pub trait QuestionGenerator: Send + Sync {
    /// # Errors
    ///
    /// Returns `GenerationError` when no valid question could be produced.
    async fn generate_question(
        &self,
        context: &QuestionContext,
    ) -> Result<QuestionDraft, GenerationError>;
}

/// Question generator backed by a chat completions model.
#[derive(Clone)]
pub struct ModelQuestionGenerator {
    client: ModelClient,
}

impl ModelQuestionGenerator {
    #[must_use]
    pub fn new(client: ModelClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl QuestionGenerator for ModelQuestionGenerator {
    async fn generate_question(
        &self,
        context: &QuestionContext,
    ) -> Result<QuestionDraft, GenerationError> {
        let prompt = question_prompt(&context.history, &sample_examples(EXAMPLE_SAMPLE));
        let body: QuestionBody = self.client.generate_object("question", &prompt).await?;
        debug!(question = %body.question, options = body.options.len(), "model produced question");
        body.into_draft()
    }
}
