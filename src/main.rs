use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use checkout_core::store::InMemoryOrderStore;
use checkout_core::{config::Config, create_app, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Required secrets abort startup here, before anything is served.
    let config = Config::from_env()?;

    // Setup logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting checkout-core");
    tracing::info!("Processor base URL: {}", config.processor_base_url);
    tracing::info!("Currency: {}", config.currency);

    let store = Arc::new(InMemoryOrderStore::new());
    let state = AppState::new(config.clone(), store);
    let app = create_app(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    tracing::info!("listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
