use anyhow::Context;
use clap::Parser;
use faq_search::SearchHandle;
use faq_server::{Cli, router, startup};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = Cli::parse().resolve()?;
    let handle = SearchHandle::new();

    let listener = TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("failed to bind {}", config.bind))?;
    info!("Server is running at http://{}", config.bind);

    let app = router(handle.clone());
    let server = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
    });

    // A service that never becomes ready must not keep serving 503s forever.
    if let Err(err) = startup::populate(handle, config).await {
        server.abort();
        return Err(err).context("search service failed to start");
    }

    server.await??;
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutdown signal received");
    }
}
