//! Startup embedding cache.
//!
//! The cache is populated exactly once, before the service takes traffic,
//! and is read-only afterwards. There is no insert or evict API: a cache is
//! either fully built or not built at all.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::Embedding;
use crate::error::{EmbeddingError, Result};
use crate::provider::{EmbeddingProvider, EmbeddingRequest};

/// Immutable map from item id to its precomputed embedding.
#[derive(Debug, Clone, Default)]
pub struct EmbeddingCache {
    entries: HashMap<String, Embedding>,

    /// Length shared by every cached vector (None while empty).
    dimension: Option<usize>,

    /// Model reported by the provider that populated the cache.
    model: Option<String>,
}

impl EmbeddingCache {
    /// Embed every `(id, text)` pair and collect the results.
    ///
    /// Items are embedded one at a time in iteration order. The first
    /// provider failure aborts the build and is reported with the offending
    /// id; nothing is retried.
    pub async fn build<P, I, K, T>(provider: &P, items: I) -> Result<Self>
    where
        P: EmbeddingProvider + ?Sized,
        I: IntoIterator<Item = (K, T)>,
        K: Into<String>,
        T: Into<String>,
    {
        let mut cache = Self::default();

        for (id, text) in items {
            let id = id.into();
            if cache.entries.contains_key(&id) {
                return Err(EmbeddingError::DuplicateKey(id));
            }

            let response = provider
                .embed(EmbeddingRequest::new(text))
                .await
                .map_err(|e| e.for_item(id.as_str()))?;

            debug!(
                "Embedded {id} ({} dimensions, model {})",
                response.dimension, response.model
            );

            if cache.model.is_none() {
                cache.model = Some(response.model);
            }
            cache
                .insert(id.clone(), response.embedding)
                .map_err(|e| e.for_item(id))?;
        }

        info!(
            "Embedding cache ready: {} entries via {}",
            cache.len(),
            provider.name()
        );

        Ok(cache)
    }

    /// Build a cache from precomputed vectors.
    pub fn from_entries<I, K>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, Embedding)>,
        K: Into<String>,
    {
        let mut cache = Self::default();
        for (id, embedding) in entries {
            let id = id.into();
            if cache.entries.contains_key(&id) {
                return Err(EmbeddingError::DuplicateKey(id));
            }
            cache.insert(id, embedding)?;
        }
        Ok(cache)
    }

    fn insert(&mut self, id: String, embedding: Embedding) -> Result<()> {
        match self.dimension {
            Some(expected) if expected != embedding.len() => {
                return Err(EmbeddingError::DimensionMismatch {
                    expected,
                    actual: embedding.len(),
                });
            }
            Some(_) => {}
            None => self.dimension = Some(embedding.len()),
        }
        self.entries.insert(id, embedding);
        Ok(())
    }

    /// Get the embedding for an id.
    pub fn get(&self, id: &str) -> Option<&[f32]> {
        self.entries.get(id).map(Vec::as_slice)
    }

    /// Check if an id is cached.
    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    /// Number of cached embeddings.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Length of every cached vector, if any are cached.
    pub fn dimension(&self) -> Option<usize> {
        self.dimension
    }

    /// Get cache statistics.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.entries.len(),
            dimension: self.dimension,
            model: self.model.clone(),
        }
    }
}

/// Statistics about the embedding cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    /// Number of entries in cache.
    pub entries: usize,

    /// Dimension of the cached vectors.
    pub dimension: Option<usize>,

    /// Model that produced the cached vectors.
    pub model: Option<String>,
}
