//! Embedding capability — the injected sentence-embedding dependency.
//!
//! The core never loads a model itself; it receives an `Arc<dyn Embedder>`
//! at construction time. When the capability is unavailable the callers
//! degrade to keyword-only extraction and lexical-only similarity.

use std::collections::HashMap;
use std::sync::{Arc, Once};
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::warn;

/// Inputs at or below this length are treated as skill labels and memoized.
/// Full documents are one-shot and bypass the cache.
const CACHEABLE_LEN: usize = 64;

static UNAVAILABLE_LOGGED: Once = Once::new();

#[derive(Debug, Error)]
pub enum EmbedError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("embedding service returned status {0}")]
    Status(u16),

    #[error("embedding response shape invalid: {0}")]
    Shape(String),
}

/// Logs capability unavailability once per process, then stays quiet.
/// Per-call degradation is expected behavior, not a log storm.
pub fn note_unavailable(err: &EmbedError) {
    UNAVAILABLE_LOGGED.call_once(|| {
        warn!("embedding capability unavailable, degrading to keyword/lexical paths: {err}");
    });
}

/// Deterministic fixed-length sentence embedding provider.
#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbedError>;

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbedError> {
        let mut out = Vec::with_capacity(texts.len());
        for text in texts {
            out.push(self.embed(text).await?);
        }
        Ok(out)
    }
}

#[derive(Debug, Serialize)]
struct EmbedRequest<'a> {
    inputs: Vec<&'a str>,
}

#[derive(Debug, Deserialize)]
struct EmbedResponse(Vec<Vec<f32>>);

/// Embedder backed by a text-embeddings inference endpoint
/// (`POST {url}` with `{"inputs": [...]}`, returns an array of vectors).
pub struct HttpEmbedder {
    client: reqwest::Client,
    url: String,
}

impl HttpEmbedder {
    pub fn new(url: String, timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(timeout)
                .build()
                .expect("Failed to build HTTP client"),
            url,
        }
    }

    async fn request(&self, inputs: Vec<&str>) -> Result<Vec<Vec<f32>>, EmbedError> {
        let expected = inputs.len();
        let response = self
            .client
            .post(&self.url)
            .json(&EmbedRequest { inputs })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(EmbedError::Status(status.as_u16()));
        }

        let EmbedResponse(vectors) = response.json().await?;
        if vectors.len() != expected {
            return Err(EmbedError::Shape(format!(
                "expected {expected} vectors, got {}",
                vectors.len()
            )));
        }
        if let Some(dim) = vectors.first().map(Vec::len) {
            if dim == 0 || vectors.iter().any(|v| v.len() != dim) {
                return Err(EmbedError::Shape("inconsistent vector dimensions".into()));
            }
        }
        Ok(vectors)
    }
}

#[async_trait]
impl Embedder for HttpEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbedError> {
        let mut vectors = self.request(vec![text]).await?;
        vectors
            .pop()
            .ok_or_else(|| EmbedError::Shape("empty response".into()))
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbedError> {
        if texts.is_empty() {
            return Ok(vec![]);
        }
        self.request(texts.to_vec()).await
    }
}

/// Wraps an embedder with a concurrent-safe memo for skill-label embeddings.
/// Multiple resume evaluations request the same label embeddings; the map is
/// read-mostly after warm and never invalidated.
pub struct CachedEmbedder {
    inner: Arc<dyn Embedder>,
    labels: RwLock<HashMap<String, Arc<Vec<f32>>>>,
}

impl CachedEmbedder {
    pub fn new(inner: Arc<dyn Embedder>) -> Self {
        Self {
            inner,
            labels: RwLock::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl Embedder for CachedEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbedError> {
        if text.len() > CACHEABLE_LEN {
            return self.inner.embed(text).await;
        }
        if let Some(hit) = self.labels.read().await.get(text) {
            return Ok(hit.as_ref().clone());
        }
        let vector = self.inner.embed(text).await?;
        self.labels
            .write()
            .await
            .insert(text.to_string(), Arc::new(vector.clone()));
        Ok(vector)
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbedError> {
        let mut out = Vec::with_capacity(texts.len());
        for text in texts {
            out.push(self.embed(text).await?);
        }
        Ok(out)
    }
}

#[cfg(test)]
pub mod testing {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Deterministic in-process embedder for tests. Texts registered via
    /// `with_vector` get that vector; everything else gets a character
    /// trigram hash vector, so identical texts always embed identically.
    pub struct StubEmbedder {
        vectors: HashMap<String, Vec<f32>>,
        fail: bool,
        pub calls: AtomicUsize,
    }

    impl StubEmbedder {
        pub fn new() -> Self {
            Self {
                vectors: HashMap::new(),
                fail: false,
                calls: AtomicUsize::new(0),
            }
        }

        pub fn failing() -> Self {
            Self {
                fail: true,
                ..Self::new()
            }
        }

        pub fn with_vector(mut self, text: &str, vector: Vec<f32>) -> Self {
            self.vectors.insert(text.to_string(), vector);
            self
        }

        fn trigram_vector(text: &str) -> Vec<f32> {
            let mut v = vec![0.0f32; 32];
            let bytes = text.as_bytes();
            for window in bytes.windows(3) {
                let mut h: u32 = 2166136261;
                for &b in window {
                    h = (h ^ b as u32).wrapping_mul(16777619);
                }
                v[(h % 32) as usize] += 1.0;
            }
            v
        }
    }

    #[async_trait]
    impl Embedder for StubEmbedder {
        async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbedError> {
            self.calls.fetch_add(1, Ordering::Relaxed);
            if self.fail {
                return Err(EmbedError::Shape("stub failure".into()));
            }
            Ok(self
                .vectors
                .get(text)
                .cloned()
                .unwrap_or_else(|| Self::trigram_vector(text)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::StubEmbedder;
    use super::*;
    use std::sync::atomic::Ordering;

    #[tokio::test]
    async fn test_stub_embedder_is_deterministic() {
        let stub = StubEmbedder::new();
        let a = stub.embed("python developer").await.unwrap();
        let b = stub.embed("python developer").await.unwrap();
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn test_cached_embedder_memoizes_short_inputs() {
        let stub = Arc::new(StubEmbedder::new());
        let cached = CachedEmbedder::new(stub.clone());

        cached.embed("python").await.unwrap();
        cached.embed("python").await.unwrap();
        assert_eq!(stub.calls.load(Ordering::Relaxed), 1);
    }

    #[tokio::test]
    async fn test_cached_embedder_bypasses_cache_for_documents() {
        let stub = Arc::new(StubEmbedder::new());
        let cached = CachedEmbedder::new(stub.clone());
        let doc = "x".repeat(CACHEABLE_LEN + 1);

        cached.embed(&doc).await.unwrap();
        cached.embed(&doc).await.unwrap();
        assert_eq!(stub.calls.load(Ordering::Relaxed), 2);
    }

    #[tokio::test]
    async fn test_default_batch_propagates_failure() {
        let stub = StubEmbedder::failing();
        assert!(stub.embed_batch(&["a", "b"]).await.is_err());
    }

    #[test]
    fn test_http_embedder_builds_with_timeout() {
        let _ = HttpEmbedder::new(
            "http://localhost:8080/embed".to_string(),
            Duration::from_secs(5),
        );
    }
}
