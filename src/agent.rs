//! LLM agent module: one completion call per summary.
//!
//! [`Provider`] picks the variant once, at startup: a live OpenAI client when a
//! credential is configured, otherwise a dry-run stub that never touches the network.

use crate::config::Config;
use crate::prompt::PromptPair;
use crate::summary::{Summary, SummaryResult};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

/// User-Agent string sent to the provider
const USER_AGENT: &str = concat!("insightai/", env!("CARGO_PKG_VERSION"));

/// Sampling temperature, kept low for factual output
pub const TEMPERATURE: f32 = 0.2;

/// Longest slice of an error body kept in [`AgentError::Status`]
const ERROR_BODY_LIMIT: usize = 500;

#[derive(Error, Debug)]
pub enum AgentError {
    #[error("LLM provider returned {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("LLM request timed out after {0}s")]
    Timeout(u64),
    #[error("LLM request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),
    #[error("failed to decode provider response: {0}")]
    Decode(String),
}

/// What a completion produced
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// Model output as text, still to be parsed
    Text(String),
    /// Already-structured data, returned in dry-run mode
    Structured(SummaryResult),
}

/// The single capability the pipeline needs from a model
pub trait Completion {
    fn complete(
        &self,
        prompt: &PromptPair,
        model: &str,
    ) -> impl Future<Output = Result<Reply, AgentError>> + Send;
}

/// Returns the fixed [`Summary::dry_run`] placeholder.
#[derive(Debug, Clone, Copy, Default)]
pub struct DryRunClient;

impl Completion for DryRunClient {
    async fn complete(&self, _prompt: &PromptPair, model: &str) -> Result<Reply, AgentError> {
        debug!(model, "dry run: returning placeholder summary");
        Ok(Reply::Structured(Summary::dry_run().into()))
    }
}

/// Client for the OpenAI Responses API
#[derive(Clone)]
pub struct OpenAiClient {
    http: Client,
    api_key: String,
    endpoint: String,
    timeout_secs: u64,
}

impl OpenAiClient {
    pub fn new(
        api_key: impl Into<String>,
        base_url: &str,
        timeout_secs: u64,
    ) -> Result<Self, AgentError> {
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self {
            http,
            api_key: api_key.into(),
            endpoint: format!("{}/responses", base_url.trim_end_matches('/')),
            timeout_secs,
        })
    }

    fn classify(&self, err: reqwest::Error) -> AgentError {
        if err.is_timeout() {
            AgentError::Timeout(self.timeout_secs)
        } else {
            AgentError::RequestFailed(err)
        }
    }
}

impl fmt::Debug for OpenAiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiClient")
            .field("endpoint", &self.endpoint)
            .field("timeout_secs", &self.timeout_secs)
            .finish_non_exhaustive()
    }
}

impl Completion for OpenAiClient {
    async fn complete(&self, prompt: &PromptPair, model: &str) -> Result<Reply, AgentError> {
        let body = ResponsesRequest {
            model,
            input: [
                InputMessage {
                    role: "system",
                    content: &prompt.system_instruction,
                },
                InputMessage {
                    role: "user",
                    content: &prompt.user_prompt,
                },
            ],
            temperature: TEMPERATURE,
        };

        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        debug!(%status, model, "provider responded");
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AgentError::Status {
                status,
                body: body.chars().take(ERROR_BODY_LIMIT).collect(),
            });
        }

        let bytes = response.bytes().await.map_err(|e| self.classify(e))?;
        let parsed: ResponsesReply =
            serde_json::from_slice(&bytes).map_err(|e| AgentError::Decode(e.to_string()))?;

        Ok(Reply::Text(parsed.output_text()))
    }
}

/// The configured completion backend
#[derive(Debug, Clone)]
pub enum Provider {
    DryRun(DryRunClient),
    OpenAi(OpenAiClient),
}

impl Provider {
    /// Live client when a credential is configured, dry run otherwise
    pub fn from_config(config: &Config) -> Result<Self, AgentError> {
        match config.api_key() {
            Some(key) => {
                info!(base_url = %config.agent.base_url, "using OpenAI provider");
                Ok(Provider::OpenAi(OpenAiClient::new(
                    key,
                    &config.agent.base_url,
                    config.agent.timeout_secs,
                )?))
            }
            None => {
                info!("OPENAI_API_KEY not set, running in dry-run mode");
                Ok(Provider::DryRun(DryRunClient))
            }
        }
    }

    pub fn is_dry_run(&self) -> bool {
        matches!(self, Provider::DryRun(_))
    }
}

impl Completion for Provider {
    async fn complete(&self, prompt: &PromptPair, model: &str) -> Result<Reply, AgentError> {
        match self {
            Provider::DryRun(client) => client.complete(prompt, model).await,
            Provider::OpenAi(client) => client.complete(prompt, model).await,
        }
    }
}

#[derive(Serialize)]
struct ResponsesRequest<'a> {
    model: &'a str,
    input: [InputMessage<'a>; 2],
    temperature: f32,
}

#[derive(Serialize)]
struct InputMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ResponsesReply {
    #[serde(default)]
    output: Vec<OutputItem>,
}

#[derive(Deserialize)]
struct OutputItem {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    text: String,
}

impl ResponsesReply {
    /// Concatenate every `output_text` block, in order
    fn output_text(&self) -> String {
        self.output
            .iter()
            .flat_map(|item| &item.content)
            .filter(|block| block.kind == "output_text")
            .map(|block| block.text.as_str())
            .collect()
    }
}
