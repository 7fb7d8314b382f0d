//! Kassenwart API Server
//!
//! Main entry point for the voucher ledger service.

use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use kassenwart_api::{AppState, create_router};
use kassenwart_shared::AppConfig;
use kassenwart_store::Store;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "kassenwart=debug,tower_http=debug".into());
    let registry = tracing_subscriber::registry().with(filter);
    if config.logging.json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    let store = Store::new(&config);
    info!(
        scheme = ?config.ledger.classification_scheme,
        locked_until = ?config.ledger.locked_until,
        overdraft_policy = ?config.cash_advance.overdraft_policy,
        "Ledger store initialized"
    );

    let app = create_router(AppState::new(store));

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
