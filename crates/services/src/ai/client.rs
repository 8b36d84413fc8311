use std::env;

use reqwest::Client;
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::GenerationError;

/// Connection settings for an OpenAI-compatible chat completions provider.
#[derive(Clone, Debug)]
pub struct ModelConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
}

impl ModelConfig {
    #[must_use]
    pub fn from_env() -> Option<Self> {
        let api_key = env::var("CALM_AI_API_KEY").ok()?;
        if api_key.trim().is_empty() {
            return None;
        }
        let base_url =
            env::var("CALM_AI_BASE_URL").unwrap_or_else(|_| "https://api.openai.com/v1".into());
        let model = env::var("CALM_AI_MODEL").unwrap_or_else(|_| "gpt-4o-mini".into());
        Some(Self {
            base_url,
            api_key,
            model,
        })
    }
}

/// Thin chat completions client that asks for output matching a JSON schema.
#[derive(Clone)]
pub struct ModelClient {
    client: Client,
    config: Option<ModelConfig>,
}

impl ModelClient {
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(ModelConfig::from_env())
    }

    #[must_use]
    pub fn new(config: Option<ModelConfig>) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    #[must_use]
    pub fn enabled(&self) -> bool {
        self.config.is_some()
    }

    #[must_use]
    pub fn model_name(&self) -> Option<&str> {
        self.config.as_ref().map(|config| config.model.as_str())
    }

    /// Send `prompt` and parse the reply as `T`.
    ///
    /// The schema of `T` is attached as `response_format` so the provider
    /// constrains its output. The reply is still parsed strictly on our side.
    ///
    /// # Errors
    ///
    /// Returns `GenerationError` when the client is disabled, the request
    /// fails, the response is empty, or the content does not parse as `T`.
    pub async fn generate_object<T>(
        &self,
        schema_name: &'static str,
        prompt: &str,
    ) -> Result<T, GenerationError>
    where
        T: DeserializeOwned + JsonSchema,
    {
        let config = self.config.as_ref().ok_or(GenerationError::Disabled)?;

        let url = format!(
            "{}/chat/completions",
            config.base_url.trim_end_matches('/')
        );
        let payload = ChatRequest {
            model: config.model.clone(),
            messages: vec![ChatMessage {
                role: "user",
                content: prompt.to_string(),
            }],
            temperature: 0.7,
            response_format: ResponseFormat {
                kind: "json_schema",
                json_schema: JsonSchemaFormat {
                    name: schema_name,
                    schema: serde_json::to_value(schemars::schema_for!(T))?,
                    strict: false,
                },
            },
        };
        debug!(model = %config.model, schema = schema_name, %prompt, "requesting structured output");

        let response = self
            .client
            .post(url)
            .bearer_auth(&config.api_key)
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(GenerationError::HttpStatus(response.status()));
        }

        let body: ChatResponse = response.json().await?;
        let content = body
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(GenerationError::EmptyResponse)?;

        Ok(serde_json::from_str(content.trim())?)
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    response_format: ResponseFormat,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
    json_schema: JsonSchemaFormat,
}

#[derive(Debug, Serialize)]
struct JsonSchemaFormat {
    name: &'static str,
    schema: serde_json::Value,
    strict: bool,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessageResponse,
}

#[derive(Debug, Deserialize)]
struct ChatMessageResponse {
    content: Option<String>,
}
