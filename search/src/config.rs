//! Configuration for the FAQ search service.

use std::sync::Arc;

use faq_embeddings::{
    DEFAULT_DIMENSION, EmbeddingProvider, HashingProvider, OpenAIProvider, SerializedProvider,
};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SearchError};

/// Configuration for ranking and query embedding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Results must score strictly above this similarity.
    pub threshold: f32,

    /// Maximum number of results to return.
    pub limit: usize,

    /// Which article fields are embedded.
    pub article_text: ArticleText,

    /// Embedding provider configuration.
    pub embedding: EmbeddingConfig,
}

impl SearchConfig {
    /// Set the similarity threshold.
    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold;
        self
    }

    /// Set the result limit.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Set the article text policy.
    pub fn with_article_text(mut self, article_text: ArticleText) -> Self {
        self.article_text = article_text;
        self
    }

    /// Set the embedding configuration.
    pub fn with_embedding(mut self, config: EmbeddingConfig) -> Self {
        self.embedding = config;
        self
    }

    /// Reject settings that would make every search meaningless.
    pub fn validate(&self) -> Result<()> {
        if !(-1.0..=1.0).contains(&self.threshold) {
            return Err(SearchError::Config(format!(
                "threshold must be within [-1, 1], got {}",
                self.threshold
            )));
        }
        if self.embedding.request_timeout_ms == 0 {
            return Err(SearchError::Config(
                "embedding.request_timeout_ms must be positive".to_string(),
            ));
        }
        if self.embedding.provider == EmbeddingProviderType::Hashing
            && self.embedding.dimension == 0
        {
            return Err(SearchError::Config(
                "embedding.dimension must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            threshold: 0.15,
            limit: 5,
            article_text: ArticleText::default(),
            embedding: EmbeddingConfig::default(),
        }
    }
}

/// Which parts of an article are fed to the embedding provider.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArticleText {
    /// `title + " " + body`.
    #[default]
    TitleAndBody,
    /// The title alone.
    TitleOnly,
}

/// Configuration for the embedding provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    /// Which provider to use.
    pub provider: EmbeddingProviderType,

    /// Model to use for embeddings.
    pub model: Option<String>,

    /// Override for the provider's API base URL.
    pub base_url: Option<String>,

    /// Environment variable holding the API key.
    pub api_key_env: String,

    /// Vector length for the hashing provider.
    pub dimension: usize,

    /// Upper bound on a single query embedding call.
    pub request_timeout_ms: u64,

    /// Allow only one embedding call in flight at a time.
    pub serialize_calls: bool,
}

impl EmbeddingConfig {
    /// Construct the configured provider.
    pub fn build_provider(&self) -> Arc<dyn EmbeddingProvider> {
        let provider: Arc<dyn EmbeddingProvider> = match self.provider {
            EmbeddingProviderType::OpenAI => {
                let mut provider = OpenAIProvider::from_env(&self.api_key_env);
                if let Some(url) = &self.base_url {
                    provider = provider.with_base_url(url.as_str());
                }
                if let Some(model) = &self.model {
                    provider = provider.with_model(model.as_str());
                }
                Arc::new(provider)
            }
            EmbeddingProviderType::Hashing => Arc::new(HashingProvider::new(self.dimension)),
        };

        if self.serialize_calls {
            Arc::new(SerializedProvider::new(provider))
        } else {
            provider
        }
    }
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: EmbeddingProviderType::OpenAI,
            model: None,
            base_url: None,
            api_key_env: "OPENAI_API_KEY".to_string(),
            dimension: DEFAULT_DIMENSION,
            request_timeout_ms: 10_000,
            serialize_calls: true,
        }
    }
}

/// Type of embedding provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmbeddingProviderType {
    /// OpenAI-compatible embeddings API.
    #[serde(rename = "openai")]
    OpenAI,
    /// Offline feature-hashing embedder.
    Hashing,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let config = SearchConfig::default();
        assert_eq!(config.threshold, 0.15);
        assert_eq!(config.limit, 5);
        assert_eq!(config.article_text, ArticleText::TitleAndBody);
        assert!(config.embedding.serialize_calls);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: SearchConfig = toml::from_str(
            r#"
            limit = 3
            article_text = "title_only"

            [embedding]
            provider = "hashing"
            dimension = 64
            "#,
        )
        .unwrap();

        assert_eq!(config.limit, 3);
        assert_eq!(config.threshold, 0.15);
        assert_eq!(config.article_text, ArticleText::TitleOnly);
        assert_eq!(config.embedding.provider, EmbeddingProviderType::Hashing);
        assert_eq!(config.embedding.dimension, 64);
        assert_eq!(config.embedding.request_timeout_ms, 10_000);
    }

    #[test]
    fn test_validate_rejects_out_of_range_threshold() {
        assert!(SearchConfig::default().with_threshold(1.5).validate().is_err());
        assert!(SearchConfig::default().with_threshold(f32::NAN).validate().is_err());
        assert!(SearchConfig::default().with_threshold(-1.0).validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let mut config = SearchConfig::default();
        config.embedding.request_timeout_ms = 0;
        assert!(matches!(config.validate(), Err(SearchError::Config(_))));
    }

    #[test]
    fn test_build_hashing_provider() {
        let config = EmbeddingConfig {
            provider: EmbeddingProviderType::Hashing,
            dimension: 32,
            ..EmbeddingConfig::default()
        };
        let provider = config.build_provider();
        assert_eq!(provider.name(), "hashing");
        assert_eq!(provider.default_dimension(), 32);
        assert!(provider.is_available());
    }

    #[test]
    fn test_build_openai_provider_uses_model_override() {
        let config = EmbeddingConfig {
            model: Some("text-embedding-3-large".to_string()),
            api_key_env: "FAQ_TEST_KEY_THAT_IS_NEVER_SET".to_string(),
            serialize_calls: false,
            ..EmbeddingConfig::default()
        };
        let provider = config.build_provider();
        assert_eq!(provider.name(), "openai");
        assert_eq!(provider.default_model(), "text-embedding-3-large");
        assert!(!provider.is_available());
    }
}
