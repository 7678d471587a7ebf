use chrono::Utc;
use clap::Parser;
use lexdoc_server::{cors_layer, create_router, print_routes, AppState, ServerConfig};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let app_version = env!("CARGO_PKG_VERSION");

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer())
        .init();

    let config = ServerConfig::parse();
    let state = AppState::from_config(&config)?;
    let app = create_router(
        state,
        cors_layer(&config.frontend_url),
        config.max_body_bytes(),
    );

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address).await?;
    info!(
        version = app_version,
        address = %address,
        upload_dir = %config.upload_dir.display(),
        started_at = %Utc::now().to_rfc3339(),
        "lexdoc-server boot"
    );
    print_routes();

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("lexdoc-server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::error!(%error, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
