//! # FAQ Search
//!
//! Semantic retrieval over a small, static FAQ corpus.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                       FAQ Search                                │
//! ├─────────────────────────────────────────────────────────────────┤
//! │                                                                 │
//! │  startup:  provider ──► Corpus::load ──► EmbeddingCache::build  │
//! │                                               │                 │
//! │                                               ▼                 │
//! │                                        SearchService            │
//! │                                               │                 │
//! │  request:  question ──► embed ──► rank ◄──────┘                 │
//! │                                    │                            │
//! │                                    ▼                            │
//! │                     filter > threshold, sort, take limit        │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use faq_search::{SearchConfig, SearchService};
//!
//! let service = SearchService::bootstrap(SearchConfig::default(), "data/faq.json").await?;
//! let results = service.search("How do I reset my password?").await?;
//! ```

pub mod config;
pub mod corpus;
pub mod error;
pub mod ranking;
pub mod service;

pub use config::{ArticleText, EmbeddingConfig, EmbeddingProviderType, SearchConfig};
pub use corpus::{Article, Corpus, Topic};
pub use error::{CorpusError, Result, SearchError};
pub use ranking::{ScoredArticle, rank};
pub use service::{SearchHandle, SearchService, ServiceStats};

// Re-export from dependencies for convenience
pub use faq_embeddings::{EmbeddingCache, EmbeddingProvider};
