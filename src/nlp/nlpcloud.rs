//! NLP Cloud REST client.
//!
//! Endpoints look like `{base}/gpu/{lang}/{model}/{task}`; the `gpu` and `lang`
//! segments are optional. Requests carry `Authorization: Token <key>`.

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::json;
use tracing::debug;

use super::client::{NlpClient, NlpClientFactory, SentimentResponse, SummaryResponse};
use super::error::NlpError;

pub const DEFAULT_BASE_URL: &str = "https://api.nlpcloud.io/v1";
pub const DEFAULT_MODEL: &str = "finetuned-llama-3-70b";

#[derive(Clone)]
pub struct NlpCloudConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub gpu: bool,
    pub lang: Option<String>,
    pub base_url: String,
}

impl std::fmt::Debug for NlpCloudConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NlpCloudConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<set>"))
            .field("model", &self.model)
            .field("gpu", &self.gpu)
            .field("lang", &self.lang)
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl Default for NlpCloudConfig {
    fn default() -> Self {
        Self { api_key: None, model: DEFAULT_MODEL.to_string(), gpu: true, lang: None, base_url: DEFAULT_BASE_URL.to_string() }
    }
}

pub struct NlpCloudClient {
    client: Client,
    api_key: String,
    root: String,
}

impl NlpCloudClient {
    pub fn new(config: &NlpCloudConfig) -> Result<Self, NlpError> {
        let api_key = config.api_key.clone().ok_or(NlpError::MissingApiKey)?;
        let mut root = config.base_url.trim_end_matches('/').to_string();
        if config.gpu { root.push_str("/gpu"); }
        if let Some(lang) = &config.lang { root.push('/'); root.push_str(lang); }
        root.push('/');
        root.push_str(&config.model);
        let client = Client::builder().build()?;
        Ok(Self { client, api_key, root })
    }

    pub fn endpoint(&self, task: &str) -> String { format!("{}/{}", self.root, task) }

    async fn post<B: Serialize + ?Sized>(&self, task: &str, body: &B) -> Result<serde_json::Value, NlpError> {
        let url = self.endpoint(task);
        debug!(target: "nlp", %url, "nlpcloud request");
        let resp = self.client
            .post(&url)
            .header(reqwest::header::AUTHORIZATION, format!("Token {}", self.api_key))
            .json(body)
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(NlpError::Api { status, message: error_detail(&text) });
        }
        let value = resp.json::<serde_json::Value>().await?;
        Ok(value)
    }
}

/// NLP Cloud errors are usually `{"detail": "..."}`; fall back to the raw body.
fn error_detail(body: &str) -> String {
    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(v) => match v.get("detail") {
            Some(serde_json::Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
            None => body.trim().to_string(),
        },
        Err(_) => body.trim().to_string(),
    }
}

fn decode<T: serde::de::DeserializeOwned>(value: serde_json::Value) -> Result<T, NlpError> {
    serde_json::from_value(value).map_err(|e| NlpError::InvalidResponse(e.to_string()))
}

#[async_trait]
impl NlpClient for NlpCloudClient {
    async fn entities(&self, text: &str, searched_entity: &str) -> Result<serde_json::Value, NlpError> {
        self.post("entities", &json!({ "text": text, "searched_entity": searched_entity })).await
    }

    async fn summarization(&self, text: &str) -> Result<SummaryResponse, NlpError> {
        decode(self.post("summarization", &json!({ "text": text })).await?)
    }

    async fn sentiment(&self, text: &str) -> Result<SentimentResponse, NlpError> {
        decode(self.post("sentiment", &json!({ "text": text })).await?)
    }
}

/// Constructs a fresh [`NlpCloudClient`] for every request; nothing is pooled.
#[derive(Debug, Clone, Default)]
pub struct NlpCloudFactory {
    pub config: NlpCloudConfig,
}

impl NlpCloudFactory {
    pub fn new(config: NlpCloudConfig) -> Self { Self { config } }
}

impl NlpClientFactory for NlpCloudFactory {
    fn client(&self) -> Result<Box<dyn NlpClient>, NlpError> {
        Ok(Box::new(NlpCloudClient::new(&self.config)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> NlpCloudConfig { NlpCloudConfig { api_key: Some("k".into()), ..Default::default() } }

    #[test]
    fn endpoint_layout() {
        let c = NlpCloudClient::new(&cfg()).unwrap();
        assert_eq!(c.endpoint("sentiment"), "https://api.nlpcloud.io/v1/gpu/finetuned-llama-3-70b/sentiment");

        let c = NlpCloudClient::new(&NlpCloudConfig { gpu: false, lang: Some("fr".into()), ..cfg() }).unwrap();
        assert_eq!(c.endpoint("entities"), "https://api.nlpcloud.io/v1/fr/finetuned-llama-3-70b/entities");
    }

    #[test]
    fn missing_key_fails_construction() {
        assert!(matches!(NlpCloudClient::new(&NlpCloudConfig::default()), Err(NlpError::MissingApiKey)));
        assert!(NlpCloudFactory::default().client().is_err());
    }

    #[test]
    fn error_detail_prefers_detail_field() {
        assert_eq!(error_detail(r#"{"detail":"Too many requests"}"#), "Too many requests");
        assert_eq!(error_detail("upstream exploded\n"), "upstream exploded");
        assert_eq!(error_detail(r#"{"other":1}"#), r#"{"other":1}"#);
    }

    #[test]
    fn debug_hides_api_key() {
        assert!(!format!("{:?}", cfg()).contains("\"k\""));
    }
}
