#![allow(dead_code)]

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use parking_lot::Mutex;
use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

use twin_rag::config::TwinConfig;
use twin_rag::error::{Error, Result};
use twin_rag::pipeline::{PipelineBackend, TwinPipeline};
use twin_rag::providers::hashing::HashEmbedder;
use twin_rag::providers::{AnswerBackend, BackendChain, EmbeddingProvider, LlmProvider};
use twin_rag::retrieval::DocumentStore;
use twin_rag::server::{build_router, state::AppState};
use twin_rag::Audience;

pub const TOKEN: &str = "test-ingest-token";

/// Hash embedder that counts calls
pub struct CountingEmbedder {
    inner: HashEmbedder,
    calls: AtomicUsize,
}

impl CountingEmbedder {
    pub fn new() -> Self {
        Self {
            inner: HashEmbedder::new(128),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EmbeddingProvider for CountingEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.embed(text).await
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.embed_batch(texts).await
    }

    fn dimensions(&self) -> usize {
        self.inner.dimensions()
    }

    fn model(&self) -> &str {
        self.inner.model()
    }

    fn name(&self) -> &str {
        "counting"
    }
}

/// Completion provider with a fixed reply that records prompts
pub struct CountingLlm {
    reply: std::result::Result<String, String>,
    prompts: Mutex<Vec<(String, String)>>,
}

impl CountingLlm {
    pub fn ok(reply: &str) -> Self {
        Self {
            reply: Ok(reply.to_string()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            reply: Err(message.to_string()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().len()
    }

    /// (system, prompt) pairs in call order
    pub fn prompts(&self) -> Vec<(String, String)> {
        self.prompts.lock().clone()
    }
}

#[async_trait]
impl LlmProvider for CountingLlm {
    async fn complete(&self, system: &str, prompt: &str) -> Result<String> {
        self.prompts.lock().push((system.to_string(), prompt.to_string()));
        self.reply.clone().map_err(Error::llm)
    }

    fn name(&self) -> &str {
        "counting"
    }

    fn model(&self) -> &str {
        "counting-1"
    }
}

/// Backend standing in for the hosted assistant
pub struct StubBackend {
    reply: Option<String>,
    audiences: Mutex<Vec<Audience>>,
}

impl StubBackend {
    pub fn answering(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Some(reply.to_string()),
            audiences: Mutex::new(Vec::new()),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            reply: None,
            audiences: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> usize {
        self.audiences.lock().len()
    }

    pub fn audiences(&self) -> Vec<Audience> {
        self.audiences.lock().clone()
    }
}

#[async_trait]
impl AnswerBackend for StubBackend {
    async fn answer(&self, _question: &str, audience: Audience) -> Result<String> {
        self.audiences.lock().push(audience);
        self.reply
            .clone()
            .ok_or_else(|| Error::upstream("Hosted assistant returned HTTP 503"))
    }

    fn name(&self) -> &str {
        "hosted"
    }
}

/// Router over real pipeline components with counting doubles
pub struct TestApp {
    pub router: Router,
    pub store: Arc<DocumentStore>,
    pub embedder: Arc<CountingEmbedder>,
    pub llm: Arc<CountingLlm>,
    _dir: TempDir,
}

pub struct TestAppBuilder {
    token: Option<String>,
    store_available: bool,
    llm: CountingLlm,
    front: Option<Arc<StubBackend>>,
    origins: Vec<String>,
}

impl TestApp {
    pub fn builder() -> TestAppBuilder {
        TestAppBuilder {
            token: Some(TOKEN.to_string()),
            store_available: true,
            llm: CountingLlm::ok("Green Hill Canarias is a sustainable development project."),
            front: None,
            origins: Vec::new(),
        }
    }

    pub fn new() -> Self {
        Self::builder().build()
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        send(&self.router, request).await
    }
}

impl TestAppBuilder {
    pub fn token(mut self, token: Option<&str>) -> Self {
        self.token = token.map(str::to_string);
        self
    }

    pub fn unavailable_store(mut self) -> Self {
        self.store_available = false;
        self
    }

    pub fn llm(mut self, llm: CountingLlm) -> Self {
        self.llm = llm;
        self
    }

    /// Put a backend in front of the local pipeline
    pub fn front(mut self, backend: Arc<StubBackend>) -> Self {
        self.front = Some(backend);
        self
    }

    pub fn origins(mut self, origins: &[&str]) -> Self {
        self.origins = origins.iter().map(|o| o.to_string()).collect();
        self
    }

    pub fn build(self) -> TestApp {
        let dir = tempfile::tempdir().unwrap();

        let mut config = TwinConfig::default();
        config.server.ingest_token = self.token;
        config.server.allowed_origins = self.origins;
        config.vector_db.storage_dir = dir.path().join("vector_store");

        let embedder = Arc::new(CountingEmbedder::new());
        let store = if self.store_available {
            DocumentStore::initialize(&config.vector_db, embedder.clone())
        } else {
            DocumentStore::unavailable("permission denied", embedder.clone())
        };
        let store = Arc::new(store);

        let llm = Arc::new(self.llm);
        let pipeline = Arc::new(TwinPipeline::from_parts(
            store.clone(),
            llm.clone(),
            config.retrieval.top_k,
        ));

        let mut backends: Vec<Arc<dyn AnswerBackend>> = Vec::new();
        if let Some(front) = self.front {
            backends.push(front);
        }
        backends.push(Arc::new(PipelineBackend::new(pipeline.clone())));
        let chain = BackendChain::new(backends).unwrap();

        let state = AppState::from_parts(config, store.clone(), pipeline, chain);

        TestApp {
            router: build_router(state),
            store,
            embedder,
            llm,
            _dir: dir,
        }
    }
}

/// Run one request through the router; empty bodies read as `Null`
pub async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap()
    };
    (status, json)
}

pub fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn ingest_request(token: Option<&str>, body: Value) -> Request<Body> {
    ingest_raw(token, &body.to_string())
}

/// Ingest request with an arbitrary (possibly malformed) body
pub fn ingest_raw(token: Option<&str>, body: &str) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/api/twin/ingest_texts")
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("x-ingest-token", token);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}
