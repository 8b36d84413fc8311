use async_trait::async_trait;
use tracing::debug;

use calm_core::model::Summary;
use calm_core::session::SummaryContext;

use crate::ai::ModelClient;
use crate::error::GenerationError;
use crate::generation::prompt::summary_prompt;
use crate::wire::SummaryBody;

/// Produces the closing summary for a review.
#[async_trait]
pub trait SummaryGenerator: Send + Sync {
    /// # Errors
    ///
    /// Returns `GenerationError` when no valid summary could be produced.
    async fn generate_summary(&self, context: &SummaryContext) -> Result<Summary, GenerationError>;
}

#[derive(Clone)]
pub struct ModelSummaryGenerator {
    client: ModelClient,
}

impl ModelSummaryGenerator {
    #[must_use]
    pub fn new(client: ModelClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SummaryGenerator for ModelSummaryGenerator {
    async fn generate_summary(&self, context: &SummaryContext) -> Result<Summary, GenerationError> {
        let prompt = summary_prompt(&context.answered);
        let body: SummaryBody = self.client.generate_object("summary", &prompt).await?;
        debug!(tasks = body.tasks.len(), "model produced summary");
        body.into_summary()
    }
}
