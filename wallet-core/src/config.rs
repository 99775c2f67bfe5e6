//! Configuration for the wallet ledger

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Ledger configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path of the SQLite database file
    pub db_path: PathBuf,

    /// HTTP listen address
    pub listen_addr: String,

    /// Administrator secret for the statistics endpoint
    pub admin_api_key: String,

    /// Business rules of the ledger
    pub ledger: LedgerRules,

    /// External rate source configuration
    pub rates: RateSourceConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from("./data/wallet.db"),
            listen_addr: "127.0.0.1:8080".to_string(),
            admin_api_key: "admin".to_string(),
            ledger: LedgerRules::default(),
            rates: RateSourceConfig::default(),
        }
    }
}

/// Business rules: wallet limits, funding, fees
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LedgerRules {
    /// Maximum wallets a single user may own
    pub max_wallets_per_user: u32,

    /// Balance granted to every new wallet, in satoshi
    pub initial_wallet_balance: i64,

    /// Platform fee on inter-user transfers, in percent
    pub fee_percent: f64,
}

impl Default for LedgerRules {
    fn default() -> Self {
        Self {
            max_wallets_per_user: 3,
            initial_wallet_balance: 100_000_000, // 1 BTC
            fee_percent: 1.5,
        }
    }
}

/// External rate source configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateSourceConfig {
    /// Base URL of the price endpoint
    pub base_url: String,

    /// How long a fetched rate stays fresh (seconds)
    pub cache_ttl_secs: u64,

    /// Request timeout (seconds)
    pub timeout_secs: u64,
}

impl Default for RateSourceConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.coingecko.com/api/v3/simple/price".to_string(),
            cache_ttl_secs: 300,
            timeout_secs: 10,
        }
    }
}

impl Config {
    /// Load from file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| crate::Error::Config(format!("Failed to parse config: {}", e)))?;
        Ok(config)
    }

    /// Load from environment variables
    pub fn from_env() -> crate::Result<Self> {
        let mut config = Config::default();

        if let Ok(db_path) = std::env::var("WALLET_DB_PATH") {
            config.db_path = PathBuf::from(db_path);
        }

        if let Ok(addr) = std::env::var("WALLET_LISTEN_ADDR") {
            config.listen_addr = addr;
        }

        if let Ok(key) = std::env::var("WALLET_ADMIN_API_KEY") {
            config.admin_api_key = key;
        }

        if let Ok(url) = std::env::var("WALLET_RATE_URL") {
            config.rates.base_url = url;
        }

        Ok(config)
    }
}
