//! Summary types - the structured output returned by the summarizer.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Key under which an unparseable model reply is returned
pub const RAW_KEY: &str = "raw";

/// A follow-up extracted from the document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ActionItem {
    /// What needs to be done
    pub title: String,
    /// Who is responsible, if the content says
    #[serde(default)]
    pub owner: Option<String>,
    /// When it is due, if the content says
    #[serde(default)]
    pub due: Option<String>,
}

/// Structured summary requested from the LLM.
///
/// The JSON schema of this struct is embedded in the system instruction, so field
/// docs double as guidance for the model.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Summary {
    /// Two or three sentences capturing the main takeaway
    #[serde(default)]
    pub executive_summary: String,
    /// Specific, non-generic observations from the content
    #[serde(default)]
    pub insights: Vec<String>,
    /// Decisions that were made or are required
    #[serde(default)]
    pub decisions: Vec<String>,
    /// Concrete next steps
    #[serde(default)]
    pub actions: Vec<ActionItem>,
    /// Risks, open issues and blockers
    #[serde(default)]
    pub risks: Vec<String>,
}

impl Summary {
    /// Check if the summary has any content
    pub fn is_empty(&self) -> bool {
        self.executive_summary.is_empty()
            && self.insights.is_empty()
            && self.decisions.is_empty()
            && self.actions.is_empty()
            && self.risks.is_empty()
    }

    /// Placeholder returned in dry-run mode, when no provider credential is configured.
    pub fn dry_run() -> Self {
        Self {
            executive_summary: "Dry run: no OPENAI_API_KEY configured, so no model was called."
                .to_string(),
            insights: vec!["Set OPENAI_API_KEY to receive a real summary.".to_string()],
            decisions: Vec::new(),
            actions: vec![ActionItem {
                title: "Configure OPENAI_API_KEY".to_string(),
                owner: Some("operator".to_string()),
                due: None,
            }],
            risks: vec!["Results are placeholders until a credential is configured.".to_string()],
        }
    }
}

/// The summarizer's answer: always a JSON object.
///
/// When the model follows the schema this holds its keys verbatim. When it does not,
/// it holds a single `raw` key with the unparsed reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SummaryResult(Map<String, Value>);

impl SummaryResult {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Wrap an unparseable reply
    pub fn raw(text: impl Into<String>) -> Self {
        let mut fields = Map::new();
        fields.insert(RAW_KEY.to_string(), Value::String(text.into()));
        Self(fields)
    }

    /// The unparsed reply, if this result degraded to `{raw}`
    pub fn raw_text(&self) -> Option<&str> {
        if self.0.len() != 1 {
            return None;
        }
        self.0.get(RAW_KEY).and_then(Value::as_str)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Typed view of the result, if the model's keys fit [`Summary`].
    ///
    /// `None` when nothing in the result maps onto a summary field.
    pub fn to_summary(&self) -> Option<Summary> {
        if self.raw_text().is_some() {
            return None;
        }
        serde_json::from_value::<Summary>(Value::Object(self.0.clone()))
            .ok()
            .filter(|summary| !summary.is_empty())
    }
}

impl From<Summary> for SummaryResult {
    fn from(summary: Summary) -> Self {
        match serde_json::to_value(summary) {
            Ok(Value::Object(fields)) => Self(fields),
            _ => Self(Map::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn raw_result_serializes_as_single_key_object() {
        let result = SummaryResult::raw("not json");
        assert_eq!(serde_json::to_value(&result).unwrap(), json!({"raw": "not json"}));
        assert_eq!(result.raw_text(), Some("not json"));
        assert!(result.to_summary().is_none());
    }

    #[test]
    fn dry_run_stub_converts_to_full_mapping() {
        let result = SummaryResult::from(Summary::dry_run());
        for key in ["executive_summary", "insights", "decisions", "actions", "risks"] {
            assert!(result.get(key).is_some(), "missing {key}");
        }
        assert_eq!(result.get("actions").unwrap()[0]["title"], "Configure OPENAI_API_KEY");
        assert_eq!(result.to_summary(), Some(Summary::dry_run()));
    }

    #[test]
    fn partial_model_output_still_has_a_typed_view() {
        let mut fields = Map::new();
        fields.insert("insights".to_string(), json!(["a"]));
        let summary = SummaryResult::new(fields).to_summary().unwrap();
        assert_eq!(summary.insights, vec!["a"]);
        assert!(summary.actions.is_empty());
        assert!(!summary.is_empty());
    }

    #[test]
    fn unrelated_keys_have_no_typed_view() {
        let mut fields = Map::new();
        fields.insert("topics".to_string(), json!({"risks": "low"}));
        assert!(SummaryResult::new(fields).to_summary().is_none());
    }
}
