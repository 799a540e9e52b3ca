//! Background startup: build the search service and flip the handle to ready.

use std::time::Duration;

use faq_search::{SearchHandle, SearchService};
use tracing::{error, info, warn};

use crate::config::ServerConfig;

/// Run the startup chain until it succeeds or attempts run out.
///
/// Each attempt starts from scratch; a partially populated cache is never
/// installed. On success the service is installed into `handle`.
pub async fn populate(handle: SearchHandle, config: ServerConfig) -> faq_search::Result<()> {
    let attempts = config.startup_attempts.max(1);
    let delay = Duration::from_millis(config.startup_retry_delay_ms);

    let mut attempt = 1;
    loop {
        match SearchService::bootstrap(config.search.clone(), &config.corpus_path).await {
            Ok(service) => {
                let stats = service.stats();
                info!(
                    "Cached {} embeddings for {} articles in {} topics",
                    stats.cached_embeddings, stats.articles, stats.topics
                );
                return handle.install(service);
            }
            Err(err) if attempt < attempts => {
                warn!("Startup attempt {attempt}/{attempts} failed: {err}");
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(err) => {
                error!("Startup failed after {attempts} attempt(s): {err}");
                return Err(err);
            }
        }
    }
}
