use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use common::storage::FilesystemImageStore;
use tracing::{Level, info};

use server::config::AppConfig;
use server::extraction::build_extractor;
use server::recognition::CommandRecognizer;
use server::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .with_target(false)
        .init();

    let config = AppConfig::load().context("Failed to load config")?;

    let db = server::database::init_db(&config.database.url)
        .await
        .context("Failed to initialize database")?;

    let images = FilesystemImageStore::new(
        PathBuf::from(&config.storage.upload_dir),
        config.storage.max_image_size,
    )
    .await
    .context("Failed to initialize image store")?;

    let extractor = build_extractor(&config.extractor).context("Failed to build extractor")?;
    info!(
        provider = ?config.extractor.provider,
        ocr = %config.ocr.command,
        upload_dir = %config.storage.upload_dir,
        "Intake pipeline ready"
    );

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("Invalid server.host/server.port")?;

    let state = AppState {
        db,
        images: Arc::new(images),
        recognizer: Arc::new(CommandRecognizer::tesseract(&config.ocr)),
        extractor,
        config,
    };

    let app = server::build_router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Server running at http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}
