//! Ledger services
//!
//! Each service owns one slice of ledger behavior over the shared
//! repository factory; [`bitcoin::BitcoinService`] composes them into the
//! public platform surface.

pub mod bitcoin;
pub mod transaction;
pub mod user;
pub mod wallet;

pub use bitcoin::BitcoinService;
pub use transaction::TransactionService;
pub use user::UserService;
pub use wallet::WalletService;
