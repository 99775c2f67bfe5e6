// Wallet Gateway - HTTP entry point of the custodial wallet platform

use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;
use wallet_core::{
    BitcoinService, CoinGeckoClient, Config, RepositoryFactory, TransactionService, UserService,
    WalletService,
};

mod api;
mod models;

use api::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    info!("Starting wallet gateway");

    // Load configuration from environment
    let config = Config::from_env()?;

    if let Some(parent) = config.db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let repo = Arc::new(RepositoryFactory::open(&config.db_path).await?);
    let rates = Arc::new(CoinGeckoClient::new(&config.rates)?);

    let service = Arc::new(BitcoinService::new(
        UserService::new(repo.clone()),
        WalletService::new(repo.clone(), config.ledger),
        TransactionService::new(repo.clone()),
        rates,
        config.ledger,
        config.admin_api_key.clone(),
    ));

    let app = api::router(AppState {
        service,
        repo: repo.clone(),
    });

    let listener = tokio::net::TcpListener::bind(&config.listen_addr).await?;
    info!("Gateway listening on: {}", config.listen_addr);
    info!("   POST /users                          - Register a user");
    info!("   POST /wallets                        - Create a wallet");
    info!("   GET  /wallets/:address               - Wallet balance");
    info!("   POST /transactions                   - Send a transfer");
    info!("   GET  /transactions                   - Transfer history");
    info!("   GET  /wallets/:address/transactions  - Wallet history");
    info!("   GET  /statistics                     - Platform totals (admin)");
    info!("   GET  /health                         - Health check");

    axum::serve(listener, app).await?;

    Ok(())
}
