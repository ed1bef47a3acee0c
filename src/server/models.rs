use serde::{Deserialize, Serialize};

/// Identity probe body for `GET /`
#[derive(Debug, Serialize, Deserialize)]
pub struct IndexResponse {
    pub name: String,
    pub version: String,
    /// "dry-run" or "live"
    pub mode: String,
}

/// Body of `POST /extract`
#[derive(Debug, Serialize, Deserialize)]
pub struct ExtractResponse {
    pub filename: String,
    /// Characters in the full extracted text
    pub chars: usize,
    /// Leading slice of the text
    pub text: String,
}
