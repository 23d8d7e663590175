use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::error::NlpError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredLabel {
    pub label: String,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentResponse {
    #[serde(default)]
    pub scored_labels: Vec<ScoredLabel>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryResponse {
    pub summary_text: String,
}

/// Task calls against a hosted model.
#[async_trait]
pub trait NlpClient: Send + Sync {
    /// Structured entity result, passed through untouched.
    async fn entities(&self, text: &str, searched_entity: &str) -> Result<serde_json::Value, NlpError>;

    async fn summarization(&self, text: &str) -> Result<SummaryResponse, NlpError>;

    async fn sentiment(&self, text: &str) -> Result<SentimentResponse, NlpError>;
}

/// Builds one client per dashboard request.
pub trait NlpClientFactory: Send + Sync {
    fn client(&self) -> Result<Box<dyn NlpClient>, NlpError>;
}
