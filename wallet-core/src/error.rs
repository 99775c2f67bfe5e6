//! Error types for the wallet ledger

use thiserror::Error;

/// Result type for ledger operations
pub type Result<T> = std::result::Result<T, Error>;

/// Coarse failure categories consumed by the HTTP boundary.
///
/// The boundary maps a kind to a wire status; the core only defines the
/// kind and a human-readable message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Referenced user or wallet does not exist
    NotFound,
    /// Authenticated actor lacks rights on the target resource
    Forbidden,
    /// Structurally invalid request parameter
    InvalidInput,
    /// External rate source has no usable rate
    Unavailable,
    /// Storage or configuration failure, not meant for end users
    Internal,
}

/// Ledger errors
#[derive(Error, Debug)]
pub enum Error {
    /// No user row for the given api key
    #[error("User with api_key: {api_key} doesn't exist")]
    UserNotFound {
        /// The unknown credential
        api_key: String,
    },

    /// No wallet row for the given address
    #[error("Wallet with address: {address} not found")]
    WalletNotFound {
        /// The unknown address
        address: String,
    },

    /// Caller is not the owner of the wallet
    #[error("User with api_key: {api_key} has no rights on wallet address: {address}")]
    NoRightOnWallet {
        /// The requesting credential
        api_key: String,
        /// The target wallet
        address: String,
    },

    /// Per-user wallet limit reached
    #[error("User with api_key: {api_key} has reached the wallet limit")]
    WalletLimitExceeded {
        /// The owning credential
        api_key: String,
    },

    /// Source wallet balance is below the requested debit
    #[error("Wallet with address: {address} does not have enough balance")]
    NotEnoughBalance {
        /// The source wallet
        address: String,
    },

    /// Negative or otherwise malformed amount
    #[error("Invalid amount: {amount}")]
    InvalidAmount {
        /// The offending amount, in satoshi
        amount: i64,
    },

    /// Admin credential mismatch
    #[error("Invalid admin api_key")]
    InvalidAdminKey,

    /// Rate source failed and no previously fetched rate exists
    #[error("Exchange rate unavailable: {0}")]
    RateUnavailable(String),

    /// Storage error (SQLite)
    #[error("Storage error: {0}")]
    Storage(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Classify this error for boundary-layer mapping.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::UserNotFound { .. } | Error::WalletNotFound { .. } => ErrorKind::NotFound,
            Error::NoRightOnWallet { .. }
            | Error::WalletLimitExceeded { .. }
            | Error::NotEnoughBalance { .. }
            | Error::InvalidAdminKey => ErrorKind::Forbidden,
            Error::InvalidAmount { .. } => ErrorKind::InvalidInput,
            Error::RateUnavailable(_) => ErrorKind::Unavailable,
            Error::Storage(_) | Error::Config(_) | Error::Io(_) => ErrorKind::Internal,
        }
    }
}

impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Self {
        Error::Storage(err.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::RateUnavailable(err.to_string())
    }
}
