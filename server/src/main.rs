use dotenvy::dotenv;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use eventify_server::config::Config;
use eventify_server::routes::create_routes;
use eventify_server::services::SimulatedGateway;
use eventify_server::state::{AppState, ServiceOptions};
use eventify_server::storage;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env()?;

    let storage = storage::connect(&config.storage).await?;
    let gateway = Arc::new(SimulatedGateway::new(config.payment_success_rate));
    let state = AppState::build(storage, gateway, ServiceOptions::from(&config)).await?;

    let app = create_routes(state, &config);

    tracing::info!("🚀 Server running at http://{}", config.bind_addr);

    let listener = TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
