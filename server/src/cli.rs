//! Command-line interface.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use faq_search::EmbeddingProviderType;

use crate::config::ServerConfig;

/// Answer FAQ questions over HTTP using semantic search.
#[derive(Debug, Parser)]
#[command(name = "faq-server", version, about)]
pub struct Cli {
    /// TOML configuration file.
    #[arg(long, short = 'c', env = "FAQ_CONFIG")]
    pub config: Option<PathBuf>,

    /// Address to listen on.
    #[arg(long, env = "FAQ_BIND")]
    pub bind: Option<SocketAddr>,

    /// FAQ corpus JSON file.
    #[arg(long, env = "FAQ_CORPUS")]
    pub corpus: Option<PathBuf>,

    /// Minimum similarity a result must exceed.
    #[arg(long)]
    pub threshold: Option<f32>,

    /// Maximum number of results per question.
    #[arg(long)]
    pub limit: Option<usize>,

    /// Embedding provider.
    #[arg(long, value_enum, env = "FAQ_PROVIDER")]
    pub provider: Option<ProviderArg>,
}

/// Embedding provider selectable on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ProviderArg {
    Openai,
    Hashing,
}

impl From<ProviderArg> for EmbeddingProviderType {
    fn from(arg: ProviderArg) -> Self {
        match arg {
            ProviderArg::Openai => Self::OpenAI,
            ProviderArg::Hashing => Self::Hashing,
        }
    }
}

impl Cli {
    /// Load the config file (if any) and apply command-line overrides.
    pub fn resolve(&self) -> anyhow::Result<ServerConfig> {
        let base = match &self.config {
            Some(path) => ServerConfig::load(path)?,
            None => ServerConfig::default(),
        };
        Ok(self.apply(base))
    }

    /// Apply command-line overrides to a config.
    pub fn apply(&self, mut config: ServerConfig) -> ServerConfig {
        if let Some(bind) = self.bind {
            config.bind = bind;
        }
        if let Some(corpus) = &self.corpus {
            config.corpus_path.clone_from(corpus);
        }
        if let Some(threshold) = self.threshold {
            config.search.threshold = threshold;
        }
        if let Some(limit) = self.limit {
            config.search.limit = limit;
        }
        if let Some(provider) = self.provider {
            config.search.embedding.provider = provider.into();
        }
        config
    }
}
