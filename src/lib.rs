//! # InsightAI
//!
//! An HTTP service that turns raw text or uploaded PDFs into structured summaries using LLMs.
//!
//! ## Features
//!
//! - **Structured Output**: Returns a JSON mapping of insights, decisions, actions and risks
//! - **Resilient Extraction**: `pdf-extract` with a page-by-page `lopdf` fallback
//! - **Dry-run Mode**: Without `OPENAI_API_KEY` the service answers with a fixed placeholder

pub mod agent;
pub mod config;
pub mod extract;
pub mod parser;
pub mod pipeline;
pub mod prompt;
pub mod server;
pub mod summary;

pub use config::Config;
pub use pipeline::SummaryRequest;
pub use summary::{Summary, SummaryResult};
