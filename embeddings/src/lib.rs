//! # Embeddings
//!
//! This crate turns text into dense vectors and compares them for the FAQ
//! search service.
//!
//! ## Features
//!
//! - **Embedding Providers**: OpenAI-compatible HTTP API or an offline hashing embedder
//! - **Call Serialization**: Wrap a non-reentrant model so only one call is in flight
//! - **Similarity**: Cosine similarity with a defined zero-vector policy
//! - **Startup Cache**: Immutable id → vector map built once before serving
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    Embeddings System                            │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  EmbeddingProvider ──► Embedding ──► EmbeddingCache            │
//! │       │                    │              │                     │
//! │       ▼                    ▼              ▼                     │
//! │  OpenAI/Hashing     cosine_similarity  read-only lookups        │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod cache;
pub mod error;
pub mod provider;
pub mod similarity;

pub use cache::{CacheStats, EmbeddingCache};
pub use error::{EmbeddingError, Result};
pub use provider::{
    EmbeddingProvider, EmbeddingRequest, EmbeddingResponse, HashingProvider, OpenAIProvider,
    SerializedProvider,
};
pub use similarity::{cosine_similarity, normalize};

/// A dense vector embedding.
pub type Embedding = Vec<f32>;

/// Dimension used by the hashing provider when none is configured.
pub const DEFAULT_DIMENSION: usize = 384;
