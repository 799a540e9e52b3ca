//! Search service: startup sequencing, readiness and request handling.

use std::path::Path;
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use faq_embeddings::{
    Embedding, EmbeddingCache, EmbeddingError, EmbeddingProvider, EmbeddingRequest,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::SearchConfig;
use crate::corpus::Corpus;
use crate::error::{Result, SearchError};
use crate::ranking::{ScoredArticle, rank};

/// A fully initialized FAQ search service.
///
/// Owns the corpus and the embedding cache. Both are immutable once the
/// service exists, so concurrent searches need no locking.
pub struct SearchService {
    /// Configuration.
    config: SearchConfig,

    /// Corpus being searched.
    corpus: Corpus,

    /// Article embeddings, keyed by article id.
    cache: EmbeddingCache,

    /// Provider used for query embeddings.
    provider: Arc<dyn EmbeddingProvider>,
}

impl SearchService {
    /// Run the full startup chain: provider, corpus, cache.
    ///
    /// Fails fast on the first error; the caller decides whether to retry
    /// the whole chain.
    pub async fn bootstrap(config: SearchConfig, corpus_path: impl AsRef<Path>) -> Result<Self> {
        config.validate()?;

        let provider = config.embedding.build_provider();
        if !provider.is_available() {
            return Err(SearchError::Startup(EmbeddingError::ProviderNotConfigured));
        }
        info!(
            "Using {} embedding provider (model {})",
            provider.name(),
            provider.default_model()
        );

        let corpus = Corpus::load(corpus_path).await?;
        Self::initialize(config, provider, corpus).await
    }

    /// Embed every article and return a service ready to answer searches.
    pub async fn initialize(
        config: SearchConfig,
        provider: Arc<dyn EmbeddingProvider>,
        corpus: Corpus,
    ) -> Result<Self> {
        config.validate()?;

        info!(
            "Populating embedding cache for {} articles",
            corpus.article_count()
        );

        let mode = config.article_text;
        let items = corpus
            .articles()
            .map(|article| (article.id.as_str(), article.embedding_text(mode)));
        let cache = EmbeddingCache::build(provider.as_ref(), items)
            .await
            .map_err(SearchError::Startup)?;

        Ok(Self::from_parts(config, provider, corpus, cache))
    }

    /// Assemble a service from an already built cache.
    ///
    /// The cache is trusted as-is; articles without an entry make every
    /// search fail with [`SearchError::MissingEmbedding`].
    pub fn from_parts(
        config: SearchConfig,
        provider: Arc<dyn EmbeddingProvider>,
        corpus: Corpus,
        cache: EmbeddingCache,
    ) -> Self {
        Self {
            config,
            corpus,
            cache,
            provider,
        }
    }

    /// Answer a free-text question with the best matching articles.
    pub async fn search(&self, question: &str) -> Result<Vec<ScoredArticle>> {
        let question = question.trim();
        if question.is_empty() {
            return Err(SearchError::EmptyQuery);
        }

        debug!("Processing query: {question}");

        let query = self.embed_query(question).await?;
        rank(
            &query,
            &self.corpus,
            &self.cache,
            self.config.threshold,
            self.config.limit,
        )
    }

    async fn embed_query(&self, question: &str) -> Result<Embedding> {
        let timeout_ms = self.config.embedding.request_timeout_ms;
        let request = self.provider.embed(EmbeddingRequest::new(question));

        match tokio::time::timeout(Duration::from_millis(timeout_ms), request).await {
            Ok(Ok(response)) => Ok(response.embedding),
            Ok(Err(err)) => Err(SearchError::Provider(err)),
            Err(_) => Err(SearchError::ProviderTimeout { timeout_ms }),
        }
    }

    /// Get the configuration.
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Get the corpus.
    pub fn corpus(&self) -> &Corpus {
        &self.corpus
    }

    /// Get service statistics.
    pub fn stats(&self) -> ServiceStats {
        ServiceStats {
            topics: self.corpus.topics().len(),
            articles: self.corpus.article_count(),
            cached_embeddings: self.cache.len(),
            dimension: self.cache.dimension(),
            provider: self.provider.name().to_string(),
        }
    }
}

/// Statistics about a running search service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceStats {
    /// Number of topics.
    pub topics: usize,

    /// Number of articles.
    pub articles: usize,

    /// Number of cached article embeddings.
    pub cached_embeddings: usize,

    /// Embedding dimension.
    pub dimension: Option<usize>,

    /// Provider name.
    pub provider: String,
}

/// Readiness gate shared between the startup task and request handlers.
///
/// Empty until a service is installed; searches before then fail with
/// [`SearchError::NotReady`]. A service can be installed only once.
#[derive(Clone, Default)]
pub struct SearchHandle {
    service: Arc<OnceLock<SearchService>>,
}

impl SearchHandle {
    /// Create an empty handle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a handle that is ready immediately.
    pub fn ready(service: SearchService) -> Self {
        Self {
            service: Arc::new(OnceLock::from(service)),
        }
    }

    /// Make the service available to searches.
    pub fn install(&self, service: SearchService) -> Result<()> {
        self.service
            .set(service)
            .map_err(|_| SearchError::AlreadyInitialized)?;
        info!("Search service ready");
        Ok(())
    }

    /// Whether a service has been installed.
    pub fn is_ready(&self) -> bool {
        self.service.get().is_some()
    }

    /// Get the installed service.
    pub fn get(&self) -> Option<&SearchService> {
        self.service.get()
    }

    /// Search, or fail with [`SearchError::NotReady`] before startup completes.
    pub async fn search(&self, question: &str) -> Result<Vec<ScoredArticle>> {
        let service = self.service.get().ok_or(SearchError::NotReady)?;
        service.search(question).await
    }
}
