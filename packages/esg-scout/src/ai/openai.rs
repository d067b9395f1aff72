//! OpenAI implementations of the language model collaborators.
//!
//! # Example
//!
//! ```rust,ignore
//! use esg_scout::ai::{OpenAiExplainer, OpenAiSignalExtractor};
//! use esg_scout::credentials::ModelCredentials;
//!
//! let extractor = OpenAiSignalExtractor::new(ModelCredentials::new(key.clone(), "gpt-4o"));
//! let explainer = OpenAiExplainer::new(ModelCredentials::new(key, "gpt-4.1-mini"));
//! ```

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::credentials::ModelCredentials;
use crate::error::{AiError, AiResult};
use crate::pipeline::prompts::{
    explanation_prompt, extraction_prompt, EXPLAIN_SYSTEM_PROMPT, EXTRACT_SYSTEM_PROMPT,
};
use crate::traits::ai::{Explainer, SignalExtractor};
use crate::types::{scores::EsgScores, signals::EsgSignals};

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

/// Minimal chat-completions client shared by both collaborators.
#[derive(Clone)]
struct ChatClient {
    client: Client,
    credentials: ModelCredentials,
    timeout: Duration,
}

impl ChatClient {
    fn new(credentials: ModelCredentials) -> Self {
        Self {
            client: Client::new(),
            credentials,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    fn endpoint(&self) -> String {
        let base = self
            .credentials
            .base_url
            .as_deref()
            .unwrap_or(DEFAULT_BASE_URL)
            .trim_end_matches('/');
        format!("{base}/chat/completions")
    }

    async fn chat(
        &self,
        system: &str,
        user: &str,
        temperature: f32,
        json_mode: bool,
    ) -> AiResult<String> {
        let request = ChatRequest {
            model: &self.credentials.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
            temperature,
            response_format: json_mode.then_some(ResponseFormat {
                format_type: "json_object",
            }),
        };

        debug!(model = %self.credentials.model, prompt_chars = user.len(), "Chat completion request");

        let response = self
            .client
            .post(self.endpoint())
            .header(
                "Authorization",
                format!("Bearer {}", self.credentials.api_key.expose()),
            )
            .json(&request)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AiError::Network(format!(
                        "OpenAI request timed out after {}s",
                        self.timeout.as_secs()
                    ))
                } else {
                    AiError::Network(e.to_string())
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(AiError::Api(format!("OpenAI API error {status}: {error_text}")));
        }

        let chat_response: ChatResponse = response
            .json()
            .await
            .map_err(|e| AiError::Parse(e.to_string()))?;

        chat_response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|content| content.trim().to_string())
            .ok_or_else(|| AiError::Parse("no content in OpenAI response".into()))
    }
}

/// Signal extractor backed by an OpenAI chat model in JSON mode.
#[derive(Clone)]
pub struct OpenAiSignalExtractor {
    chat: ChatClient,
}

impl OpenAiSignalExtractor {
    pub fn new(credentials: ModelCredentials) -> Self {
        Self {
            chat: ChatClient::new(credentials),
        }
    }

    /// Use a custom HTTP client.
    pub fn with_client(mut self, client: Client) -> Self {
        self.chat.client = client;
        self
    }

    /// Set the per-request timeout (default 120 seconds).
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.chat.timeout = timeout;
        self
    }
}

#[async_trait]
impl SignalExtractor for OpenAiSignalExtractor {
    async fn extract_signals(&self, corpus: &str) -> AiResult<EsgSignals> {
        let raw = self
            .chat
            .chat(EXTRACT_SYSTEM_PROMPT, &extraction_prompt(corpus), 0.1, true)
            .await?;
        Ok(EsgSignals::from_model_output(&raw))
    }
}

/// Explainer backed by an OpenAI chat model.
#[derive(Clone)]
pub struct OpenAiExplainer {
    chat: ChatClient,
}

impl OpenAiExplainer {
    pub fn new(credentials: ModelCredentials) -> Self {
        Self {
            chat: ChatClient::new(credentials),
        }
    }

    /// Use a custom HTTP client.
    pub fn with_client(mut self, client: Client) -> Self {
        self.chat.client = client;
        self
    }

    /// Set the per-request timeout (default 120 seconds).
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.chat.timeout = timeout;
        self
    }
}

#[async_trait]
impl Explainer for OpenAiExplainer {
    async fn explain(
        &self,
        root_url: &str,
        signals: &EsgSignals,
        scores: &EsgScores,
    ) -> AiResult<String> {
        self.chat
            .chat(
                EXPLAIN_SYSTEM_PROMPT,
                &explanation_prompt(root_url, signals, scores),
                0.3,
                false,
            )
            .await
    }
}
