//! NLP Cloud client against a wiremock server.

use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use nlpdesk::nlp::{self, NlpClient, NlpClientFactory, NlpCloudClient, NlpCloudConfig, NlpCloudFactory, NlpError, NlpOutcome, NlpRequest};

const MODEL_PATH: &str = "/gpu/finetuned-llama-3-70b";

fn config(server: &MockServer) -> NlpCloudConfig {
    NlpCloudConfig { api_key: Some("test-token".into()), base_url: server.uri(), ..Default::default() }
}

#[tokio::test]
async fn sentiment_posts_text_with_token_header() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(format!("{MODEL_PATH}/sentiment")))
        .and(header("authorization", "Token test-token"))
        .and(body_json(json!({ "text": "What a day" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "scored_labels": [
                { "label": "joy", "score": 0.2 },
                { "label": "anger", "score": 0.7 }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = NlpCloudClient::new(&config(&server)).unwrap();
    let req = NlpRequest::from_form("sentiment", "What a day", None).unwrap();
    let out = nlp::run(&client, &req).await.unwrap();
    assert_eq!(out, NlpOutcome::Sentiment("Sentiment: anger".into()));
}

#[tokio::test]
async fn entities_forward_searched_entity_and_return_body_verbatim() {
    let server = MockServer::start().await;
    let body = json!({ "entities": [{ "start": 0, "end": 4, "type": "city", "text": "Oslo" }] });
    Mock::given(method("POST"))
        .and(path(format!("{MODEL_PATH}/entities")))
        .and(body_json(json!({ "text": "Oslo is cold", "searched_entity": "city" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(body.clone()))
        .mount(&server)
        .await;

    let client = NlpCloudClient::new(&config(&server)).unwrap();
    assert_eq!(client.entities("Oslo is cold", "city").await.unwrap(), body);
}

#[tokio::test]
async fn summarization_returns_summary_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(format!("{MODEL_PATH}/summarization")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "summary_text": "Short." })))
        .mount(&server)
        .await;

    let factory = NlpCloudFactory::new(config(&server));
    let client = factory.client().unwrap();
    assert_eq!(client.summarization("Long text").await.unwrap().summary_text, "Short.");
}

#[tokio::test]
async fn http_errors_become_api_errors() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(format!("{MODEL_PATH}/sentiment")))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "detail": "Invalid token" })))
        .mount(&server)
        .await;

    let client = NlpCloudClient::new(&config(&server)).unwrap();
    let err = client.sentiment("hi").await.unwrap_err();
    match &err {
        NlpError::Api { status, message } => {
            assert_eq!(status.as_u16(), 401);
            assert_eq!(message, "Invalid token");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
    assert!(err.to_string().contains("Invalid token"));
}

#[tokio::test]
async fn malformed_payload_is_invalid_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(format!("{MODEL_PATH}/summarization")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "unexpected": true })))
        .mount(&server)
        .await;

    let client = NlpCloudClient::new(&config(&server)).unwrap();
    assert!(matches!(client.summarization("x").await, Err(NlpError::InvalidResponse(_))));
}

#[tokio::test]
async fn empty_scored_labels_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(format!("{MODEL_PATH}/sentiment")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "scored_labels": [] })))
        .mount(&server)
        .await;

    let client = NlpCloudClient::new(&config(&server)).unwrap();
    let req = NlpRequest::from_form("sentiment", "x", None).unwrap();
    assert!(matches!(nlp::run(&client, &req).await, Err(NlpError::EmptyScores)));
}
