use std::fmt;

use super::client::{NlpClient, ScoredLabel};
use super::error::NlpError;
use super::task::{NlpRequest, NlpTask};

/// What the dashboard shows after a successful call.
#[derive(Debug, Clone, PartialEq)]
pub enum NlpOutcome {
    Entities(serde_json::Value),
    Summary(String),
    Sentiment(String),
}

impl fmt::Display for NlpOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NlpOutcome::Entities(v) => {
                let pretty = serde_json::to_string_pretty(v).map_err(|_| fmt::Error)?;
                f.write_str(&pretty)
            }
            NlpOutcome::Summary(s) | NlpOutcome::Sentiment(s) => f.write_str(s),
        }
    }
}

/// Forward one request to the provider.
pub async fn run(client: &dyn NlpClient, request: &NlpRequest) -> Result<NlpOutcome, NlpError> {
    match request.task {
        NlpTask::Ner => {
            let entity = request.entity.as_deref().ok_or(NlpError::MissingEntity)?;
            Ok(NlpOutcome::Entities(client.entities(&request.text, entity).await?))
        }
        NlpTask::Summarization => Ok(NlpOutcome::Summary(client.summarization(&request.text).await?.summary_text)),
        NlpTask::Sentiment => {
            let resp = client.sentiment(&request.text).await?;
            Ok(NlpOutcome::Sentiment(top_sentiment(resp.scored_labels)?))
        }
    }
}

/// Highest-scoring label as `"Sentiment: <label>"`. Ties keep provider order.
pub fn top_sentiment(mut labels: Vec<ScoredLabel>) -> Result<String, NlpError> {
    labels.sort_by(|a, b| b.score.total_cmp(&a.score));
    let top = labels.first().ok_or(NlpError::EmptyScores)?;
    Ok(format!("Sentiment: {}", top.label))
}
