//! Integration tests for the OpenAI-compatible provider against a mock server.

use faq_embeddings::{EmbeddingError, EmbeddingProvider, EmbeddingRequest, OpenAIProvider};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn provider_for(server: &MockServer) -> OpenAIProvider {
    OpenAIProvider::new()
        .with_api_key("test-key")
        .with_base_url(server.uri())
}

#[tokio::test]
async fn test_embed_parses_first_vector() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/embeddings"))
        .and(header("authorization", "Bearer test-key"))
        .and(body_partial_json(json!({
            "input": "How do refunds work?",
            "model": "text-embedding-3-small"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{ "embedding": [0.25, -0.5, 1.0], "index": 0 }],
            "model": "text-embedding-3-small",
            "usage": { "prompt_tokens": 5, "total_tokens": 5 }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let response = provider_for(&server)
        .embed(EmbeddingRequest::new("How do refunds work?"))
        .await
        .unwrap();

    assert_eq!(response.embedding, vec![0.25, -0.5, 1.0]);
    assert_eq!(response.dimension, 3);
    assert_eq!(response.model, "text-embedding-3-small");
}

#[tokio::test]
async fn test_embed_forwards_dimensions_and_model_override() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/embeddings"))
        .and(body_partial_json(json!({
            "model": "custom-model",
            "dimensions": 2
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{ "embedding": [1.0, 0.0], "index": 0 }],
            "model": "custom-model"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let response = provider_for(&server)
        .embed(
            EmbeddingRequest::new("hello")
                .with_model("custom-model")
                .with_dimensions(2),
        )
        .await
        .unwrap();

    assert_eq!(response.dimension, 2);
}

#[tokio::test]
async fn test_rate_limit_reports_retry_after() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/embeddings"))
        .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "7"))
        .mount(&server)
        .await;

    let err = provider_for(&server)
        .embed(EmbeddingRequest::new("hello"))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        EmbeddingError::RateLimited {
            retry_after_secs: 7
        }
    ));
}

#[tokio::test]
async fn test_server_error_is_api_request_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/embeddings"))
        .respond_with(ResponseTemplate::new(500).set_body_string("model overloaded"))
        .mount(&server)
        .await;

    let err = provider_for(&server)
        .embed(EmbeddingRequest::new("hello"))
        .await
        .unwrap_err();

    match err {
        EmbeddingError::ApiRequest(message) => assert!(message.contains("model overloaded")),
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_empty_data_is_invalid_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/embeddings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [],
            "model": "text-embedding-3-small"
        })))
        .mount(&server)
        .await;

    let err = provider_for(&server)
        .embed(EmbeddingRequest::new("hello"))
        .await
        .unwrap_err();

    assert!(matches!(err, EmbeddingError::InvalidResponse(_)));
}

#[tokio::test]
async fn test_missing_api_key_fails_without_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let provider = OpenAIProvider::from_env("FAQ_TEST_KEY_THAT_IS_NEVER_SET")
        .with_base_url(server.uri());
    assert!(!provider.is_available());

    let err = provider
        .embed(EmbeddingRequest::new("hello"))
        .await
        .unwrap_err();
    assert!(matches!(err, EmbeddingError::ProviderNotConfigured));
}
