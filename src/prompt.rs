//! Prompt construction for structured summaries.

use crate::summary::Summary;
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};

/// Source text beyond this many characters is dropped before prompting
pub const MAX_CONTENT_CHARS: usize = 12_000;

/// Topics covered when a request names none
pub const DEFAULT_TOPICS: [&str; 3] = ["key insights", "risks", "next actions"];

lazy_static! {
    /// JSON schema of [`Summary`], rendered once.
    pub static ref SUMMARY_SCHEMA: String =
        serde_json::to_string_pretty(&schemars::schema_for!(Summary))
            .unwrap_or_default();
}

/// The two messages sent to the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptPair {
    pub system_instruction: String,
    pub user_prompt: String,
}

impl PromptPair {
    /// Build the prompt for the standard [`Summary`] schema
    pub fn for_summary(text: &str, topics: &[String]) -> Self {
        build_prompt(text, topics, &SUMMARY_SCHEMA)
    }
}

/// The default topic list, owned
pub fn default_topics() -> Vec<String> {
    DEFAULT_TOPICS.iter().map(|t| t.to_string()).collect()
}

/// Build the system instruction and user prompt.
///
/// Topics are interpolated verbatim; an empty slice falls back to [`DEFAULT_TOPICS`].
pub fn build_prompt(text: &str, topics: &[String], schema: &str) -> PromptPair {
    let system_instruction = format!(
        r#"You are an analyst. Summarize the content you are given.

You MUST respond with a single JSON object using exactly these keys:
  "executive_summary": string - the main takeaway in 2-3 sentences
  "insights": array of strings - specific, non-generic observations
  "decisions": array of strings - decisions made or required
  "actions": array of objects {{"title": string, "owner": string or null, "due": string or null}}
  "risks": array of strings - risks, open issues and blockers

Do not include any markdown formatting, code blocks, or explanations. Only output the raw JSON object.

JSON schema:
{schema}"#
    );

    let topics = if topics.is_empty() {
        DEFAULT_TOPICS.join(", ")
    } else {
        topics.join(", ")
    };

    let user_prompt = format!(
        "Summarize the following content.\n\nTopics to cover: {topics}\n\nCONTENT:\n{}\n",
        truncate_chars(text, MAX_CONTENT_CHARS)
    );

    PromptPair {
        system_instruction,
        user_prompt,
    }
}

/// Cut `text` to at most `max` characters, on a char boundary
pub fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
