use std::net::SocketAddr;
use std::sync::Arc;

use practice_api::{app, AppState};
use practice_store::{app_config::Config, seed, InMemoryOfferRepository, InMemoryPatientDirectory};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_LOG_FILTER: &str =
    "practice_api=debug,practice_store=debug,tower_http=debug,axum::rejection=trace";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load()?;
    tracing::info!("Starting practice API on port {}", config.server.port);

    let offers = if config.store.seed_demo_data {
        let repo = InMemoryOfferRepository::with_seed(seed::demo_offers()).await?;
        tracing::info!("Loaded demo offers");
        repo
    } else {
        InMemoryOfferRepository::new()
    };

    let app_state = AppState::new(
        Arc::new(offers),
        Arc::new(InMemoryPatientDirectory::demo()),
        &config,
    );

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app(app_state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
