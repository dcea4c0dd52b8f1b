use crate::api::routes::router;
use crate::config::ServerConfig;
use crate::directory::CandidateDirectory;
use crate::dynamo::Table;
use crate::s3::Storage;
use anyhow::{Context, Result};
use tracing::info;

/// Bind the configured address and serve the API until the process stops
pub async fn serve<T, S>(config: &ServerConfig, directory: CandidateDirectory<T, S>) -> Result<()>
where
    T: Table,
    S: Storage,
{
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("Recruitment backend listening on {}", addr);

    axum::serve(listener, router(directory))
        .await
        .context("HTTP server failed")?;
    Ok(())
}
