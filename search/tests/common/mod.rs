//! Shared fixtures for search integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use faq_embeddings::{
    EmbeddingError, EmbeddingProvider, EmbeddingRequest, EmbeddingResponse, Result,
};
use faq_search::{Article, Corpus, Topic};

/// Provider returning fixed vectors for known texts.
pub struct LookupProvider {
    vectors: HashMap<String, Vec<f32>>,
    calls: AtomicUsize,
    delay: Option<Duration>,
}

impl LookupProvider {
    pub fn new<I, K>(vectors: I) -> Self
    where
        I: IntoIterator<Item = (K, Vec<f32>)>,
        K: Into<String>,
    {
        Self {
            vectors: vectors.into_iter().map(|(k, v)| (k.into(), v)).collect(),
            calls: AtomicUsize::new(0),
            delay: None,
        }
    }

    /// Sleep before answering every call.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EmbeddingProvider for LookupProvider {
    fn name(&self) -> &str {
        "lookup"
    }

    fn default_model(&self) -> &str {
        "lookup"
    }

    fn default_dimension(&self) -> usize {
        self.vectors.values().next().map_or(0, Vec::len)
    }

    async fn embed(&self, request: EmbeddingRequest) -> Result<EmbeddingResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let embedding = self
            .vectors
            .get(&request.text)
            .cloned()
            .ok_or_else(|| EmbeddingError::ApiRequest(format!("unknown text: {}", request.text)))?;
        Ok(EmbeddingResponse {
            dimension: embedding.len(),
            embedding,
            model: "lookup".to_string(),
        })
    }

    fn is_available(&self) -> bool {
        true
    }
}

/// One topic, articles `(id, title, body)` in order.
pub fn single_topic(articles: &[(&str, &str, &str)]) -> Corpus {
    let topic = articles
        .iter()
        .fold(Topic::new("general", "General"), |topic, (id, title, body)| {
            topic.with_article(Article::new(*id, "general", *title, *body))
        });
    Corpus::new(vec![topic]).unwrap()
}
