//! Boundary around the hosted NLP provider.
//!
//! Handlers parse form input into an [`NlpRequest`], ask the injected
//! [`NlpClientFactory`] for a fresh client, and hand both to [`run`]. Every
//! failure, local or remote, comes back as an [`NlpError`].

mod adapter;
mod client;
mod error;
mod nlpcloud;
mod task;

pub use adapter::{run, top_sentiment, NlpOutcome};
pub use client::{NlpClient, NlpClientFactory, ScoredLabel, SentimentResponse, SummaryResponse};
pub use error::NlpError;
pub use nlpcloud::{NlpCloudClient, NlpCloudConfig, NlpCloudFactory, DEFAULT_BASE_URL, DEFAULT_MODEL};
pub use task::{NlpRequest, NlpTask};
