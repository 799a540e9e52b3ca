//! FAQ corpus: topics and their articles, loaded once and never mutated.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::ArticleText;
use crate::error::CorpusError;

/// A single FAQ entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    /// Identifier, unique across the whole corpus.
    pub id: String,

    /// Id of the containing topic. Inherited from the topic when omitted.
    #[serde(default)]
    pub topic_id: String,

    /// Short question-style title.
    pub title: String,

    /// Answer text.
    pub body: String,
}

impl Article {
    /// Create a new article.
    pub fn new(
        id: impl Into<String>,
        topic_id: impl Into<String>,
        title: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            topic_id: topic_id.into(),
            title: title.into(),
            body: body.into(),
        }
    }

    /// Text handed to the embedding provider for this article.
    pub fn embedding_text(&self, mode: ArticleText) -> String {
        match mode {
            ArticleText::TitleAndBody => format!("{} {}", self.title, self.body),
            ArticleText::TitleOnly => self.title.clone(),
        }
    }
}

/// A named group of articles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topic {
    /// Topic identifier.
    pub id: String,

    /// Display name.
    pub name: String,

    /// Articles in display order.
    #[serde(default)]
    pub articles: Vec<Article>,
}

impl Topic {
    /// Create an empty topic.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            articles: Vec::new(),
        }
    }

    /// Append an article.
    pub fn with_article(mut self, article: Article) -> Self {
        self.articles.push(article);
        self
    }
}

/// On-disk shapes accepted by [`Corpus::from_json_str`].
#[derive(Deserialize)]
#[serde(untagged)]
enum CorpusFile {
    Topics(Vec<Topic>),
    Wrapped { topics: Vec<Topic> },
}

/// Validated, ordered collection of topics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Corpus {
    topics: Vec<Topic>,
}

impl Corpus {
    /// Validate topics into a corpus.
    ///
    /// Article ids must be unique across all topics. An article with an
    /// empty `topic_id` inherits its parent's; a non-empty one must match.
    /// Articles with a blank title and body are rejected.
    pub fn new(mut topics: Vec<Topic>) -> Result<Self, CorpusError> {
        let mut seen = HashSet::new();

        for topic in &mut topics {
            for article in &mut topic.articles {
                if article.topic_id.is_empty() {
                    article.topic_id.clone_from(&topic.id);
                } else if article.topic_id != topic.id {
                    return Err(CorpusError::TopicMismatch {
                        article_id: article.id.clone(),
                        expected: topic.id.clone(),
                        actual: article.topic_id.clone(),
                    });
                }

                if !seen.insert(article.id.clone()) {
                    return Err(CorpusError::DuplicateArticleId(article.id.clone()));
                }

                if article.title.trim().is_empty() && article.body.trim().is_empty() {
                    return Err(CorpusError::EmptyArticle(article.id.clone()));
                }
            }
        }

        Ok(Self { topics })
    }

    /// Parse a JSON array of topics, or an object with a `topics` array.
    pub fn from_json_str(json: &str) -> Result<Self, CorpusError> {
        let topics = match serde_json::from_str(json)? {
            CorpusFile::Topics(topics) | CorpusFile::Wrapped { topics } => topics,
        };
        Self::new(topics)
    }

    /// Load and validate a corpus file.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, CorpusError> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| CorpusError::Read {
                path: path.to_path_buf(),
                source,
            })?;

        let corpus = Self::from_json_str(&content)?;
        info!(
            "Loaded {} topics / {} articles from {}",
            corpus.topics.len(),
            corpus.article_count(),
            path.display()
        );
        Ok(corpus)
    }

    /// Topics in corpus order.
    pub fn topics(&self) -> &[Topic] {
        &self.topics
    }

    /// All articles, flattened in corpus order.
    pub fn articles(&self) -> impl Iterator<Item = &Article> + '_ {
        self.topics.iter().flat_map(|topic| topic.articles.iter())
    }

    /// Look up an article by id.
    pub fn article(&self, id: &str) -> Option<&Article> {
        self.articles().find(|article| article.id == id)
    }

    /// Total number of articles.
    pub fn article_count(&self) -> usize {
        self.topics.iter().map(|topic| topic.articles.len()).sum()
    }

    /// Check if the corpus has no articles.
    pub fn is_empty(&self) -> bool {
        self.article_count() == 0
    }
}
