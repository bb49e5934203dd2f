use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use herd_etl::config::Config;

pub mod api;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "herd_server=debug,herd_etl=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Herd ETL API...");

    let config = Config::load().context("Failed to load configuration")?;
    tracing::info!("Source API at {}", config.base_url);

    let addr = config.bind_addr.clone();

    // Build router with all API endpoints
    let app = api::create_router(config);

    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    axum::serve(listener, app)
        .await
        .context("Failed to start server")?;

    Ok(())
}
