//! The summarizer pipeline: text → prompt → completion → parsed result.

use crate::agent::{AgentError, Completion, Reply};
use crate::extract::{self, ExtractError};
use crate::parser::parse_reply;
use crate::prompt::{default_topics, PromptPair};
use crate::summary::SummaryResult;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Extract(#[from] ExtractError),
    #[error(transparent)]
    Agent(#[from] AgentError),
}

/// Canonical summarize request.
///
/// `topics` wins when non-empty, then a non-blank `topic`, then the default topics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SummaryRequest {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub topics: Option<Vec<String>>,
    #[serde(default)]
    pub topic: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
}

impl SummaryRequest {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// Topics to cover, with defaults applied
    pub fn resolved_topics(&self) -> Vec<String> {
        if let Some(topics) = self.topics.as_ref().filter(|t| !t.is_empty()) {
            return topics.clone();
        }
        match self.topic.as_deref().map(str::trim) {
            Some(topic) if !topic.is_empty() => vec![topic.to_string()],
            _ => default_topics(),
        }
    }

    /// Model to call, falling back to `default_model`
    pub fn resolved_model<'a>(&'a self, default_model: &'a str) -> &'a str {
        match self.model.as_deref().map(str::trim) {
            Some(model) if !model.is_empty() => model,
            _ => default_model,
        }
    }
}

/// Summarize already-extracted text
pub async fn summarize<C: Completion>(
    client: &C,
    request: &SummaryRequest,
    default_model: &str,
) -> Result<SummaryResult, PipelineError> {
    let topics = request.resolved_topics();
    let model = request.resolved_model(default_model);
    let prompt = PromptPair::for_summary(&request.text, &topics);

    info!(model, chars = request.text.len(), topics = topics.len(), "summarizing");
    let result = match client.complete(&prompt, model).await? {
        Reply::Text(text) => parse_reply(&text),
        Reply::Structured(result) => result,
    };
    Ok(result)
}

/// Extract a document on the blocking pool, then summarize its text.
///
/// `request.text` is replaced by the extracted text.
pub async fn summarize_document<C: Completion>(
    client: &C,
    bytes: Vec<u8>,
    filename: String,
    mut request: SummaryRequest,
    default_model: &str,
) -> Result<SummaryResult, PipelineError> {
    let extracted = extract::extract_blocking(bytes, filename).await?;
    request.text = extracted.text;
    summarize(client, &request, default_model).await
}
