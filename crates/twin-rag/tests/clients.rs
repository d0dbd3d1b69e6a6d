//! HTTP client behaviour against mocked OpenAI and LangGraph endpoints

mod common;

use axum::http::StatusCode;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{post_json, send};
use twin_rag::config::{
    AssistantConfig, BackendKind, EmbeddingConfig, EmbeddingProviderKind, LlmConfig, TwinConfig,
};
use twin_rag::error::Error;
use twin_rag::generation::{AnswerGenerator, GenerationOutcome};
use twin_rag::providers::hosted::HostedAssistant;
use twin_rag::providers::openai::{OpenAiClient, OpenAiProvider};
use twin_rag::providers::AnswerBackend;
use twin_rag::server::{build_router, state::AppState};
use twin_rag::Audience;

fn llm_config(server: &MockServer) -> LlmConfig {
    LlmConfig {
        base_url: server.uri(),
        api_key: Some("sk-test".to_string()),
        ..LlmConfig::default()
    }
}

fn embedding_config() -> EmbeddingConfig {
    EmbeddingConfig {
        provider: EmbeddingProviderKind::OpenAi,
        model: "text-embedding-ada-002".to_string(),
        dimensions: 3,
    }
}

fn assistant_config(server: &MockServer) -> AssistantConfig {
    AssistantConfig {
        base_url: Some(server.uri()),
        api_key: Some("dr-key".to_string()),
        ..AssistantConfig::default()
    }
}

// OpenAI

#[tokio::test]
async fn embeddings_are_returned_in_input_order() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/embeddings"))
        .and(header("authorization", "Bearer sk-test"))
        .and(body_partial_json(json!({"model": "text-embedding-ada-002"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                {"index": 1, "embedding": [0.0, 1.0, 0.0]},
                {"index": 0, "embedding": [1.0, 0.0, 0.0]}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = OpenAiClient::new(&llm_config(&server), &embedding_config()).unwrap();
    let embeddings = client
        .embed_batch(&["first".to_string(), "second".to_string()])
        .await
        .unwrap();

    assert_eq!(embeddings, vec![vec![1.0, 0.0, 0.0], vec![0.0, 1.0, 0.0]]);
}

#[tokio::test]
async fn embedding_count_mismatch_is_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/embeddings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"index": 0, "embedding": [1.0, 0.0, 0.0]}]
        })))
        .mount(&server)
        .await;

    let client = OpenAiClient::new(&llm_config(&server), &embedding_config()).unwrap();
    let err = client
        .embed_batch(&["a".to_string(), "b".to_string()])
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Embedding(_)));
}

#[tokio::test]
async fn completion_returns_message_content() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer sk-test"))
        .and(body_partial_json(json!({"model": "gpt-4"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"role": "assistant", "content": "GHC is in the Canary Islands."}}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = OpenAiClient::new(&llm_config(&server), &embedding_config()).unwrap();
    let answer = client.complete("You are a twin.", "Where is GHC?").await.unwrap();
    assert_eq!(answer, "GHC is in the Canary Islands.");
}

#[tokio::test]
async fn completion_http_error_is_llm_error_without_retry() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .expect(1)
        .mount(&server)
        .await;

    let client = OpenAiClient::new(&llm_config(&server), &embedding_config()).unwrap();
    let err = client.complete("system", "prompt").await.unwrap_err();

    assert!(matches!(err, Error::Llm(_)));
    assert!(err.to_string().contains("500"));
}

#[tokio::test]
async fn completion_without_content_is_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"role": "assistant", "content": null}}]
        })))
        .mount(&server)
        .await;

    let client = OpenAiClient::new(&llm_config(&server), &embedding_config()).unwrap();
    assert!(client.complete("system", "prompt").await.is_err());
}

#[tokio::test]
async fn completion_timeout_becomes_apology_without_retry() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"choices": [{"message": {"content": "too late"}}]}))
                .set_delay(Duration::from_secs(3)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let config = LlmConfig {
        timeout_secs: 1,
        ..llm_config(&server)
    };
    let (_, llm) = OpenAiProvider::new(&config, &embedding_config()).unwrap().split();
    let generator = AnswerGenerator::new(Arc::new(llm));

    let outcome = generator.generate("What is GHC?", Audience::Public, &[]).await;
    match outcome {
        GenerationOutcome::Apologized { answer, .. } => {
            assert!(answer.starts_with("I apologize"));
            assert!(!answer.contains("too late"));
        }
        other => panic!("expected apology, got {:?}", other),
    }
}

// Hosted assistant

#[tokio::test]
async fn hosted_assistant_posts_run_for_audience() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/runs/wait"))
        .and(header("x-api-key", "dr-key"))
        .and(body_partial_json(json!({
            "assistant_id": "ff7afd85-51e0-4fdd-8ec5-a14508a100f9",
            "input": {"question": "What is the expected IRR?"}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "messages": [
                {"type": "human", "content": "What is the expected IRR?"},
                {"type": "ai", "content": "Around 8% per year."}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let hosted = HostedAssistant::from_config(&assistant_config(&server))
        .unwrap()
        .unwrap();
    let answer = hosted
        .answer("What is the expected IRR?", Audience::Investor)
        .await
        .unwrap();
    assert_eq!(answer, "Around 8% per year.");
}

#[tokio::test]
async fn hosted_assistant_error_status_is_upstream_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/runs/wait"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let hosted = HostedAssistant::from_config(&assistant_config(&server))
        .unwrap()
        .unwrap();
    let err = hosted.answer("Q", Audience::Public).await.unwrap_err();
    assert!(matches!(err, Error::Upstream(_)));
}

#[tokio::test]
async fn hosted_assistant_blank_answer_is_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/runs/wait"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"final_answer": " "})))
        .mount(&server)
        .await;

    let hosted = HostedAssistant::from_config(&assistant_config(&server))
        .unwrap()
        .unwrap();
    assert!(hosted.answer("Q", Audience::Boardroom).await.is_err());
}

// Full stack

#[tokio::test]
async fn ask_falls_back_from_hosted_to_pipeline_end_to_end() {
    let dr = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/runs/wait"))
        .respond_with(ResponseTemplate::new(502))
        .expect(1)
        .mount(&dr)
        .await;

    let openai = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"content": "Answered locally."}}]
        })))
        .expect(1)
        .mount(&openai)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let mut config = TwinConfig::default();
    config.llm = llm_config(&openai);
    config.embeddings.provider = EmbeddingProviderKind::Hash;
    config.embeddings.dimensions = 64;
    config.vector_db.storage_dir = dir.path().to_path_buf();
    config.assistant = assistant_config(&dr);
    config.backends = vec![BackendKind::Hosted, BackendKind::Pipeline];

    let state = AppState::new(config).await.unwrap();
    let router = build_router(state);

    let (status, body) = send(
        &router,
        post_json(
            "/api/ask",
            json!({"audience": "public", "question": "What is GHC?"}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["answer"], "Answered locally.");
    assert_eq!(body["backend"], "pipeline");
    assert_eq!(body["fallbacks"][0]["backend"], "hosted");
}

#[tokio::test]
async fn ask_falls_back_when_hosted_assistant_times_out() {
    let dr = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/runs/wait"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"final_answer": "too late"}))
                .set_delay(Duration::from_secs(3)),
        )
        .expect(1)
        .mount(&dr)
        .await;

    let openai = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"content": "Answered locally."}}]
        })))
        .expect(1)
        .mount(&openai)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let mut config = TwinConfig::default();
    config.llm = llm_config(&openai);
    config.embeddings.provider = EmbeddingProviderKind::Hash;
    config.embeddings.dimensions = 64;
    config.vector_db.storage_dir = dir.path().to_path_buf();
    config.assistant = AssistantConfig {
        timeout_secs: 1,
        ..assistant_config(&dr)
    };
    config.backends = vec![BackendKind::Hosted, BackendKind::Pipeline];

    let router = build_router(AppState::new(config).await.unwrap());
    let (status, body) = send(
        &router,
        post_json(
            "/api/ask",
            json!({"audience": "investor", "question": "What is the expected IRR?"}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["answer"], "Answered locally.");
    assert_eq!(body["backend"], "pipeline");
    assert_eq!(body["fallbacks"][0]["backend"], "hosted");
}
