//! Exhaustive cosine ranking over the cached corpus.

use std::cmp::Reverse;

use faq_embeddings::{EmbeddingCache, cosine_similarity};
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::corpus::{Article, Corpus};
use crate::error::{Result, SearchError};

/// An article together with its similarity to the query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredArticle {
    pub topic_id: String,
    pub article_id: String,
    pub title: String,
    pub body: String,
    pub similarity: f32,
}

impl ScoredArticle {
    fn new(article: &Article, similarity: f32) -> Self {
        Self {
            topic_id: article.topic_id.clone(),
            article_id: article.id.clone(),
            title: article.title.clone(),
            body: article.body.clone(),
            similarity,
        }
    }
}

/// Score every article against `query` and return the best matches.
///
/// Only articles scoring strictly above `threshold` are kept. Results are
/// ordered by descending similarity; equal scores keep corpus order. At most
/// `limit` results are returned.
///
/// Every article must have a cached embedding of the query's length. A
/// missing entry or a length mismatch fails the whole ranking.
pub fn rank(
    query: &[f32],
    corpus: &Corpus,
    cache: &EmbeddingCache,
    threshold: f32,
    limit: usize,
) -> Result<Vec<ScoredArticle>> {
    let mut matches: Vec<(&Article, f32)> = Vec::new();
    let mut scored = 0usize;

    for article in corpus.articles() {
        let embedding = cache
            .get(&article.id)
            .ok_or_else(|| SearchError::MissingEmbedding {
                article_id: article.id.clone(),
            })?;

        if embedding.len() != query.len() {
            return Err(SearchError::DimensionMismatch {
                article_id: article.id.clone(),
                expected: embedding.len(),
                actual: query.len(),
            });
        }

        let similarity = cosine_similarity(query, embedding)?;
        scored += 1;

        if similarity > threshold {
            matches.push((article, similarity));
        }
    }

    // Stable, so ties stay in corpus order.
    matches.sort_by_key(|(_, similarity)| Reverse(OrderedFloat(*similarity)));
    matches.truncate(limit);

    debug!(
        "Scored {scored} articles, returning {} above {threshold}",
        matches.len()
    );

    Ok(matches
        .into_iter()
        .map(|(article, similarity)| ScoredArticle::new(article, similarity))
        .collect())
}
