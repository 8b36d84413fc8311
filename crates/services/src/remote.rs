use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use calm_core::model::{QuestionDraft, Summary};
use calm_core::session::{QuestionContext, SummaryContext};

use crate::error::GenerationError;
use crate::generation::{QuestionGenerator, SummaryGenerator};
use crate::wire::{
    ErrorBody, GenerateQuestionRequest, GenerateQuestionResponse, GenerateSummaryRequest,
    SummaryBody,
};

/// Generators that call a running calm server over HTTP.
#[derive(Clone)]
pub struct EndpointClient {
    client: Client,
    base_url: String,
}

impl EndpointClient {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, GenerationError>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        let url = format!("{}{path}", self.base_url);
        debug!(%url, "calling generation endpoint");
        let response = self.client.post(url).json(body).send().await?;
        if !response.status().is_success() {
            return Err(endpoint_error(response).await);
        }
        Ok(response.json().await?)
    }
}

async fn endpoint_error(response: Response) -> GenerationError {
    let status = response.status();
    match response.json::<ErrorBody>().await {
        Ok(body) => GenerationError::Endpoint {
            status,
            message: body.error,
        },
        Err(_) => GenerationError::HttpStatus(status),
    }
}

#[async_trait]
impl QuestionGenerator for EndpointClient {
    async fn generate_question(
        &self,
        context: &QuestionContext,
    ) -> Result<QuestionDraft, GenerationError> {
        let request = GenerateQuestionRequest::from_context(context);
        let response: GenerateQuestionResponse =
            self.post("/api/generate-question", &request).await?;
        response.question.into_draft()
    }
}

#[async_trait]
impl SummaryGenerator for EndpointClient {
    async fn generate_summary(&self, context: &SummaryContext) -> Result<Summary, GenerationError> {
        let request = GenerateSummaryRequest::from_context(context);
        let body: SummaryBody = self.post("/api/generate-summary", &request).await?;
        body.into_summary()
    }
}
