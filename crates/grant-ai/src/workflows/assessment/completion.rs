use std::time::Duration;

use async_trait::async_trait;
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::CompletionConfig;

/// One named prompt execution against the text-completion backend.
///
/// The name exists for logging and `AiStatus` bookkeeping only; the backend
/// never sees it.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionTask {
    pub name: String,
    pub prompt: String,
    pub max_output_tokens: u32,
    pub temperature: f32,
}

impl CompletionTask {
    pub fn new(
        name: impl Into<String>,
        prompt: impl Into<String>,
        max_output_tokens: u32,
        temperature: f32,
    ) -> Self {
        Self {
            name: name.into(),
            prompt: prompt.into(),
            max_output_tokens,
            temperature,
        }
    }
}

/// Failure surfaced by the completion backend or its transport.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CompletionError {
    #[error("completion backend rejected task '{task}': {message}")]
    Backend { task: String, message: String },
    #[error("completion transport failed for task '{task}': {message}")]
    Transport { task: String, message: String },
    #[error("completion response for task '{task}' was empty")]
    EmptyResponse { task: String },
}

/// Boundary to the external text-completion service.
///
/// No retry, backoff, or rate limiting lives here; callers interpret failure
/// and decide whether to fall back.
#[async_trait]
pub trait CompletionGateway: Send + Sync {
    async fn execute_task(&self, task: &CompletionTask) -> Result<String, CompletionError>;

    /// Execute a batch concurrently. Results preserve input order and one
    /// task's failure never aborts its siblings.
    async fn execute_tasks(
        &self,
        tasks: &[CompletionTask],
    ) -> Vec<Result<String, CompletionError>> {
        join_all(tasks.iter().map(|task| self.execute_task(task))).await
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

/// Reqwest-backed gateway speaking an OpenAI-compatible chat-completions
/// protocol. Everything upstream depends only on [`CompletionGateway`], so
/// swapping the provider means swapping this one type.
pub struct HttpCompletionClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    model: String,
}

impl HttpCompletionClient {
    pub fn from_config(config: &CompletionConfig) -> Result<Self, CompletionError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|err| CompletionError::Transport {
                task: "client_init".to_string(),
                message: err.to_string(),
            })?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
        })
    }
}

impl std::fmt::Debug for HttpCompletionClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpCompletionClient")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl CompletionGateway for HttpCompletionClient {
    async fn execute_task(&self, task: &CompletionTask) -> Result<String, CompletionError> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: &task.prompt,
            }],
            max_tokens: task.max_output_tokens,
            temperature: task.temperature,
        };

        debug!(task = %task.name, model = %self.model, "dispatching completion task");

        let mut request = self.http.post(&url).json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|err| CompletionError::Transport {
                task: task.name.clone(),
                message: err.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CompletionError::Backend {
                task: task.name.clone(),
                message: format!("{status}: {body}"),
            });
        }

        let parsed: ChatResponse =
            response
                .json()
                .await
                .map_err(|err| CompletionError::Backend {
                    task: task.name.clone(),
                    message: format!("malformed completion payload: {err}"),
                })?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .unwrap_or_default();

        if content.trim().is_empty() {
            return Err(CompletionError::EmptyResponse {
                task: task.name.clone(),
            });
        }

        Ok(content)
    }
}
