//! Server configuration, loaded from an optional TOML file.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use anyhow::Context;
use faq_search::SearchConfig;
use serde::{Deserialize, Serialize};

/// Top-level configuration for `faq-server`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address the HTTP listener binds to.
    pub bind: SocketAddr,

    /// JSON file holding the FAQ topics.
    pub corpus_path: PathBuf,

    /// How many times the startup chain is attempted before giving up.
    pub startup_attempts: u32,

    /// Pause between startup attempts.
    pub startup_retry_delay_ms: u64,

    /// Ranking and embedding settings.
    pub search: SearchConfig,
}

impl ServerConfig {
    /// Read a TOML config file. Missing keys fall back to defaults.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("failed to parse config file {}", path.display()))
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 3000)),
            corpus_path: PathBuf::from("data/faq.json"),
            startup_attempts: 1,
            startup_retry_delay_ms: 2_000,
            search: SearchConfig::default(),
        }
    }
}
