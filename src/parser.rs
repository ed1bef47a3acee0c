//! Turns the model's text reply back into a [`SummaryResult`].

use crate::summary::SummaryResult;
use serde_json::{Map, Value};
use tracing::warn;

/// Parse a model reply as a JSON object.
///
/// Keys are returned as-is, without checking them against the requested schema.
/// A reply that is not a JSON object degrades to `{"raw": reply}`; this never fails.
pub fn parse_reply(reply: &str) -> SummaryResult {
    let cleaned = strip_markdown_json(reply);

    match serde_json::from_str::<Map<String, Value>>(cleaned) {
        Ok(fields) => SummaryResult::new(fields),
        Err(e) => {
            warn!(error = %e, len = reply.len(), "model reply is not a JSON object");
            SummaryResult::raw(reply)
        }
    }
}

/// Strip markdown code block wrappers from JSON response
fn strip_markdown_json(text: &str) -> &str {
    let trimmed = text.trim();

    // Remove ```json ... ``` or ``` ... ```
    let Some(without_prefix) = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
    else {
        return trimmed;
    };

    match without_prefix.rfind("```") {
        Some(end_idx) => without_prefix[..end_idx].trim(),
        None => trimmed,
    }
}
