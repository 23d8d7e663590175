use reqwest::StatusCode;

#[derive(Debug, thiserror::Error)]
pub enum NlpError {
    #[error("unknown task '{0}'")]
    UnknownTask(String),

    #[error("an entity label is required for named-entity recognition")]
    MissingEntity,

    #[error("NLP Cloud API key is not configured")]
    MissingApiKey,

    #[error("{status}: {message}")]
    Api { status: StatusCode, message: String },

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("no scored labels in sentiment response")]
    EmptyScores,
}

impl NlpError {
    /// Errors raised before any network traffic.
    pub fn is_validation(&self) -> bool {
        matches!(self, NlpError::UnknownTask(_) | NlpError::MissingEntity)
    }
}
