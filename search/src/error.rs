//! Error types for the FAQ search service.

use std::path::PathBuf;

use faq_embeddings::EmbeddingError;
use thiserror::Error;

/// Result type alias for search operations.
pub type Result<T> = std::result::Result<T, SearchError>;

/// Errors that can occur in the search service.
#[derive(Error, Debug)]
pub enum SearchError {
    /// Corpus could not be loaded or failed validation.
    #[error("corpus error: {0}")]
    Corpus(#[from] CorpusError),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Populating the embedding cache failed; the service never became ready.
    #[error("startup failed: {0}")]
    Startup(#[source] EmbeddingError),

    /// A search arrived before the service finished starting.
    #[error("service not ready")]
    NotReady,

    /// A ready service was installed twice.
    #[error("service already initialized")]
    AlreadyInitialized,

    /// The question was empty after trimming.
    #[error("question is empty")]
    EmptyQuery,

    /// Embedding the query failed.
    #[error("embedding provider failed: {0}")]
    Provider(#[source] EmbeddingError),

    /// Embedding the query took too long.
    #[error("embedding provider timed out after {timeout_ms}ms")]
    ProviderTimeout { timeout_ms: u64 },

    /// An article in the corpus has no cached embedding.
    #[error("no cached embedding for article {article_id}")]
    MissingEmbedding { article_id: String },

    /// Cached and query vectors disagree on length.
    #[error(
        "dimension mismatch for article {article_id}: cached {expected}, query {actual}"
    )]
    DimensionMismatch {
        article_id: String,
        expected: usize,
        actual: usize,
    },

    /// Any other embedding error.
    #[error("embedding error: {0}")]
    Embedding(#[from] EmbeddingError),
}

impl SearchError {
    /// Whether the caller may retry the same request unchanged.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::NotReady | Self::Provider(_) | Self::ProviderTimeout { .. }
        )
    }
}

/// Corpus loading and validation errors.
#[derive(Error, Debug)]
pub enum CorpusError {
    /// Failed to read the corpus file.
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The corpus is not valid JSON of the expected shape.
    #[error("invalid corpus format: {0}")]
    Parse(#[from] serde_json::Error),

    /// Two articles share an id.
    #[error("duplicate article id: {0}")]
    DuplicateArticleId(String),

    /// An article names a topic other than the one containing it.
    #[error("article {article_id} belongs to topic {expected} but names {actual}")]
    TopicMismatch {
        article_id: String,
        expected: String,
        actual: String,
    },

    /// An article has neither a title nor a body, so there is nothing to embed.
    #[error("article {0} has an empty title and body")]
    EmptyArticle(String),
}
