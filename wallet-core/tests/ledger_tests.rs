//! End-to-end ledger behavior through the orchestrator

use std::sync::Arc;
use tempfile::TempDir;
use wallet_core::{
    BitcoinService, Config, ErrorKind, FixedRate, RepositoryFactory, TransactionService,
    UserService, WalletService,
};

const RATE: f64 = 50_000.0;

async fn platform() -> (TempDir, BitcoinService) {
    let dir = TempDir::new().unwrap();
    let config = Config::default();
    let repo = Arc::new(
        RepositoryFactory::open(dir.path().join("ledger.db"))
            .await
            .unwrap(),
    );

    let service = BitcoinService::new(
        UserService::new(repo.clone()),
        WalletService::new(repo.clone(), config.ledger),
        TransactionService::new(repo),
        Arc::new(FixedRate(RATE)),
        config.ledger,
        config.admin_api_key.clone(),
    );
    (dir, service)
}

#[tokio::test]
async fn test_create_user_and_validate() {
    let (_dir, platform) = platform().await;

    let api_key = platform.create_user().await.unwrap();
    assert!(platform.user_valid(&api_key).await.unwrap());
    assert!(!platform.user_valid("nobody").await.unwrap());
}

#[tokio::test]
async fn test_new_wallet_funded_with_one_btc() {
    let (_dir, platform) = platform().await;

    let api_key = platform.create_user().await.unwrap();
    let wallet = platform.create_wallet(&api_key).await.unwrap();

    assert_eq!(wallet.balance_btc, 1.0);
    assert_eq!(wallet.balance_usd, RATE);

    let balance = platform
        .get_wallet_balance(&api_key, &wallet.wallet_address)
        .await
        .unwrap();
    assert_eq!(balance.btc_balance, 1.0);
    assert_eq!(balance.usd_balance, RATE);
}

#[tokio::test]
async fn test_wallet_limit_enforced() {
    let (_dir, platform) = platform().await;

    let api_key = platform.create_user().await.unwrap();
    for _ in 0..3 {
        platform.create_wallet(&api_key).await.unwrap();
    }

    let err = platform.create_wallet(&api_key).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Forbidden);
}

#[tokio::test]
async fn test_wallet_for_unknown_user_fails() {
    let (_dir, platform) = platform().await;

    let err = platform.create_wallet("nobody").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn test_cross_user_transfer_charges_fee() {
    let (_dir, platform) = platform().await;

    let alice = platform.create_user().await.unwrap();
    let bob = platform.create_user().await.unwrap();
    let source = platform.create_wallet(&alice).await.unwrap().wallet_address;
    let dest = platform.create_wallet(&bob).await.unwrap().wallet_address;

    // 0.2 BTC transferred; 1.5% fee on 20_000_000 sat is 300_000 sat.
    // The summary reports both in BTC.
    let (_id, summary) = platform
        .send_transaction(&alice, &source, &dest, 0.2)
        .await
        .unwrap();
    assert_eq!(summary.amount, 0.2);
    assert_eq!(summary.fee, 0.003);

    let source_balance = platform.get_wallet_balance(&alice, &source).await.unwrap();
    let dest_balance = platform.get_wallet_balance(&bob, &dest).await.unwrap();
    assert_eq!((source_balance.btc_balance * 1e8).round() as i64, 79_700_000);
    assert_eq!((dest_balance.btc_balance * 1e8).round() as i64, 120_000_000);
}

#[tokio::test]
async fn test_intra_user_transfer_is_free() {
    let (_dir, platform) = platform().await;

    let alice = platform.create_user().await.unwrap();
    let w1 = platform.create_wallet(&alice).await.unwrap().wallet_address;
    let w2 = platform.create_wallet(&alice).await.unwrap().wallet_address;

    let (_id, summary) = platform
        .send_transaction(&alice, &w1, &w2, 0.5)
        .await
        .unwrap();
    assert_eq!(summary.fee, 0.0);

    let b1 = platform.get_wallet_balance(&alice, &w1).await.unwrap();
    let b2 = platform.get_wallet_balance(&alice, &w2).await.unwrap();
    assert_eq!((b1.btc_balance * 1e8).round() as i64, 50_000_000);
    assert_eq!((b2.btc_balance * 1e8).round() as i64, 150_000_000);
}

#[tokio::test]
async fn test_transfer_requires_funds_including_fee() {
    let (_dir, platform) = platform().await;

    let alice = platform.create_user().await.unwrap();
    let bob = platform.create_user().await.unwrap();
    let source = platform.create_wallet(&alice).await.unwrap().wallet_address;
    let dest = platform.create_wallet(&bob).await.unwrap().wallet_address;

    // The full 1 BTC balance cannot move cross-user: the fee does not fit.
    let err = platform
        .send_transaction(&alice, &source, &dest, 1.0)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Forbidden);

    // Balances untouched after the failed attempt.
    let balance = platform.get_wallet_balance(&alice, &source).await.unwrap();
    assert_eq!(balance.btc_balance, 1.0);
}

#[tokio::test]
async fn test_transfer_from_foreign_wallet_forbidden() {
    let (_dir, platform) = platform().await;

    let alice = platform.create_user().await.unwrap();
    let bob = platform.create_user().await.unwrap();
    let source = platform.create_wallet(&alice).await.unwrap().wallet_address;
    let dest = platform.create_wallet(&bob).await.unwrap().wallet_address;

    let err = platform
        .send_transaction(&bob, &source, &dest, 0.1)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Forbidden);
}

#[tokio::test]
async fn test_negative_amount_rejected() {
    let (_dir, platform) = platform().await;

    let alice = platform.create_user().await.unwrap();
    let bob = platform.create_user().await.unwrap();
    let source = platform.create_wallet(&alice).await.unwrap().wallet_address;
    let dest = platform.create_wallet(&bob).await.unwrap().wallet_address;

    let err = platform
        .send_transaction(&alice, &source, &dest, -0.1)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);
}

#[tokio::test]
async fn test_history_visible_only_to_owner() {
    let (_dir, platform) = platform().await;

    let alice = platform.create_user().await.unwrap();
    let bob = platform.create_user().await.unwrap();
    let source = platform.create_wallet(&alice).await.unwrap().wallet_address;
    let dest = platform.create_wallet(&bob).await.unwrap().wallet_address;

    platform
        .send_transaction(&alice, &source, &dest, 0.1)
        .await
        .unwrap();

    let history = platform
        .get_addr_transactions(&alice, &source)
        .await
        .unwrap();
    assert_eq!(history.len(), 1);
    // History reports display units, not satoshi.
    assert_eq!(history[0].amount, 0.1);

    // Bob sees the same transfer on his own wallet but not on Alice's.
    let bob_history = platform.get_addr_transactions(&bob, &dest).await.unwrap();
    assert_eq!(bob_history.len(), 1);

    let err = platform
        .get_addr_transactions(&bob, &source)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Forbidden);
}

#[tokio::test]
async fn test_user_history_spans_all_wallets() {
    let (_dir, platform) = platform().await;

    let alice = platform.create_user().await.unwrap();
    let bob = platform.create_user().await.unwrap();
    let w1 = platform.create_wallet(&alice).await.unwrap().wallet_address;
    let w2 = platform.create_wallet(&alice).await.unwrap().wallet_address;
    let dest = platform.create_wallet(&bob).await.unwrap().wallet_address;

    platform
        .send_transaction(&alice, &w1, &dest, 0.1)
        .await
        .unwrap();
    platform
        .send_transaction(&alice, &w2, &dest, 0.1)
        .await
        .unwrap();

    let history = platform.get_transactions(&alice).await.unwrap();
    assert_eq!(history.len(), 2);

    // A transfer between two of the user's wallets is reported once per
    // involved wallet.
    platform
        .send_transaction(&alice, &w1, &w2, 0.05)
        .await
        .unwrap();
    let history = platform.get_transactions(&alice).await.unwrap();
    assert_eq!(history.len(), 4);
}

#[tokio::test]
async fn test_statistics_count_fees_only() {
    let (_dir, platform) = platform().await;

    let alice = platform.create_user().await.unwrap();
    let bob = platform.create_user().await.unwrap();
    let w1 = platform.create_wallet(&alice).await.unwrap().wallet_address;
    let w2 = platform.create_wallet(&alice).await.unwrap().wallet_address;
    let dest = platform.create_wallet(&bob).await.unwrap().wallet_address;

    // One fee-paying transfer, one free internal one.
    platform
        .send_transaction(&alice, &w1, &dest, 0.2)
        .await
        .unwrap();
    platform
        .send_transaction(&alice, &w1, &w2, 0.2)
        .await
        .unwrap();

    let stats = platform.get_statistics("admin").await.unwrap();
    assert_eq!(stats.transactions_num, 2);
    // 300_000 sat of fees, reported in BTC.
    assert_eq!((stats.platform_profit * 1e8).round() as i64, 300_000);
}

#[tokio::test]
async fn test_statistics_require_admin_key() {
    let (_dir, platform) = platform().await;

    let err = platform.get_statistics("wrong").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Forbidden);
    assert!(platform.admin_valid("admin"));
    assert!(!platform.admin_valid("wrong"));
}

#[tokio::test]
async fn test_oversized_amount_rejected() {
    let (_dir, platform) = platform().await;

    let alice = platform.create_user().await.unwrap();
    let bob = platform.create_user().await.unwrap();
    let source = platform.create_wallet(&alice).await.unwrap().wallet_address;
    let dest = platform.create_wallet(&bob).await.unwrap().wallet_address;

    // An amount past the satoshi range fails as invalid input instead of
    // wrapping the debit.
    let err = platform
        .send_transaction(&alice, &source, &dest, 1e12)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);

    let balance = platform.get_wallet_balance(&alice, &source).await.unwrap();
    assert_eq!(balance.btc_balance, 1.0);
}

async fn wallet_backend() -> (TempDir, UserService, WalletService) {
    let dir = TempDir::new().unwrap();
    let repo = Arc::new(
        RepositoryFactory::open(dir.path().join("ledger.db"))
            .await
            .unwrap(),
    );
    let users = UserService::new(repo.clone());
    let wallets = WalletService::new(repo, Config::default().ledger);
    (dir, users, wallets)
}

#[tokio::test]
async fn test_withdraw_checks_ownership_first() {
    let (_dir, users, wallets) = wallet_backend().await;

    let owner = users.create_user().await.unwrap();
    let other = users.create_user().await.unwrap();
    let wallet = wallets.create_wallet(&owner).await.unwrap();

    let err = wallets
        .withdraw(&other, &wallet.address, 10)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Forbidden);

    // Ownership outranks the amount check for foreign callers.
    let err = wallets
        .withdraw(&other, &wallet.address, -10)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Forbidden);

    let balance = wallets
        .get_wallet_balance(&owner, &wallet.address)
        .await
        .unwrap();
    assert_eq!(balance, 100_000_000);
}

#[tokio::test]
async fn test_withdraw_rejects_negative_amount() {
    let (_dir, users, wallets) = wallet_backend().await;

    let owner = users.create_user().await.unwrap();
    let wallet = wallets.create_wallet(&owner).await.unwrap();

    let err = wallets
        .withdraw(&owner, &wallet.address, -1)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);

    let balance = wallets
        .get_wallet_balance(&owner, &wallet.address)
        .await
        .unwrap();
    assert_eq!(balance, 100_000_000);
}

#[tokio::test]
async fn test_deposit_rejects_negative_amount() {
    let (_dir, users, wallets) = wallet_backend().await;

    let owner = users.create_user().await.unwrap();
    let wallet = wallets.create_wallet(&owner).await.unwrap();

    let err = wallets.deposit(&wallet.address, -1).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);

    let balance = wallets
        .get_wallet_balance(&owner, &wallet.address)
        .await
        .unwrap();
    assert_eq!(balance, 100_000_000);
}

#[tokio::test]
async fn test_balance_of_foreign_wallet_forbidden() {
    let (_dir, platform) = platform().await;

    let alice = platform.create_user().await.unwrap();
    let bob = platform.create_user().await.unwrap();
    let wallet = platform.create_wallet(&alice).await.unwrap().wallet_address;

    let err = platform
        .get_wallet_balance(&bob, &wallet)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Forbidden);

    let err = platform
        .get_wallet_balance(&alice, "no-such-wallet")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}
