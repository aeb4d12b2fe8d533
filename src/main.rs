use axum::routing::{delete, get, post};
use axum::Router;
use tracing_subscriber::EnvFilter;

use doc_rag::api;
use doc_rag::config::Config;
use doc_rag::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env();
    if let Err(e) = config.validate() {
        anyhow::bail!("invalid configuration: {e}");
    }
    tracing::info!("Data directory: {}", config.data_dir.display());
    tracing::info!(
        "Embedding provider: {} ({}, dim {})",
        config.embedding.model,
        config.embedding.base_url,
        config.embedding.dimension
    );
    tracing::info!(
        "Generative provider: {} ({})",
        config.generative.model,
        config.generative.base_url
    );

    let state = AppState::new(config.clone())?;

    let app = Router::new()
        .route("/", get(status))
        .route("/api/search", post(api::search::search))
        .route("/api/upload-text", post(api::documents::upload_text))
        .route("/api/documents", get(api::documents::list_documents))
        .route("/api/documents/{id}", delete(api::documents::delete_document))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;
    Ok(())
}

async fn status() -> &'static str {
    "doc-rag is running"
}
