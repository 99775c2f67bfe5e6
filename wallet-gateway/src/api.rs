// HTTP surface of the wallet platform

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use tracing::error;
use wallet_core::{BitcoinService, Error, ErrorKind, RepositoryFactory};

use crate::models::{
    CreateTransactionRequest, CreateTransactionResponse, CreateUserResponse,
    CreateWalletResponse, HealthResponse, ListTransactionsResponse, StatisticsResponse,
    TransactionModel, WalletBalanceResponse,
};

const API_KEY_HEADER: &str = "x-api-key";
const ADMIN_API_KEY_HEADER: &str = "x-admin-api-key";

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<BitcoinService>,
    pub repo: Arc<RepositoryFactory>,
}

// Error handling
pub enum ApiError {
    Ledger(Error),
    MissingHeader(&'static str),
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        ApiError::Ledger(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Ledger(err) => {
                let status = match err.kind() {
                    ErrorKind::NotFound => StatusCode::NOT_FOUND,
                    ErrorKind::Forbidden => StatusCode::FORBIDDEN,
                    ErrorKind::InvalidInput => StatusCode::UNPROCESSABLE_ENTITY,
                    ErrorKind::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
                    ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
                };
                if status == StatusCode::INTERNAL_SERVER_ERROR {
                    error!(error = %err, "internal error");
                    (status, "Internal server error".to_string())
                } else {
                    (status, err.to_string())
                }
            }
            ApiError::MissingHeader(header) => (
                StatusCode::FORBIDDEN,
                format!("Missing {} header", header),
            ),
        };

        (
            status,
            Json(serde_json::json!({
                "error": { "message": message },
            })),
        )
            .into_response()
    }
}

fn api_key(headers: &HeaderMap) -> Result<String, ApiError> {
    headers
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .ok_or(ApiError::MissingHeader("X-API-KEY"))
}

fn admin_api_key(headers: &HeaderMap) -> Result<String, ApiError> {
    headers
        .get(ADMIN_API_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .ok_or(ApiError::MissingHeader("X-ADMIN-API-KEY"))
}

async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_connected = state.repo.ping().await;
    Json(HealthResponse {
        status: if db_connected { "healthy" } else { "degraded" },
        service: "wallet-gateway",
        version: env!("CARGO_PKG_VERSION"),
        db_connected,
    })
}

async fn create_user(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<CreateUserResponse>), ApiError> {
    let api_key = state.service.create_user().await?;
    Ok((StatusCode::CREATED, Json(CreateUserResponse { api_key })))
}

async fn create_wallet(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<(StatusCode, Json<CreateWalletResponse>), ApiError> {
    let key = api_key(&headers)?;
    let wallet = state.service.create_wallet(&key).await?;
    Ok((
        StatusCode::CREATED,
        Json(CreateWalletResponse {
            wallet_address: wallet.wallet_address,
            balance_btc: wallet.balance_btc,
            balance_usd: wallet.balance_usd,
        }),
    ))
}

async fn get_wallet_balance(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(address): Path<String>,
) -> Result<Json<WalletBalanceResponse>, ApiError> {
    let key = api_key(&headers)?;
    let balance = state.service.get_wallet_balance(&key, &address).await?;
    Ok(Json(WalletBalanceResponse {
        btc_balance: balance.btc_balance,
        usd_balance: balance.usd_balance,
    }))
}

async fn create_transaction(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<CreateTransactionRequest>,
) -> Result<(StatusCode, Json<CreateTransactionResponse>), ApiError> {
    let key = api_key(&headers)?;
    let (transaction_id, summary) = state
        .service
        .send_transaction(
            &key,
            &request.from_wallet_address,
            &request.to_wallet_address,
            request.amount,
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateTransactionResponse {
            transaction_id,
            transaction: summary.into(),
        }),
    ))
}

async fn list_transactions(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<ListTransactionsResponse>, ApiError> {
    let key = api_key(&headers)?;
    let transactions = state.service.get_transactions(&key).await?;
    Ok(Json(ListTransactionsResponse {
        transactions: transactions.into_iter().map(TransactionModel::from).collect(),
    }))
}

async fn list_wallet_transactions(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(address): Path<String>,
) -> Result<Json<ListTransactionsResponse>, ApiError> {
    let key = api_key(&headers)?;
    let transactions = state.service.get_addr_transactions(&key, &address).await?;
    Ok(Json(ListTransactionsResponse {
        transactions: transactions.into_iter().map(TransactionModel::from).collect(),
    }))
}

async fn get_statistics(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<StatisticsResponse>, ApiError> {
    let key = admin_api_key(&headers)?;
    let stats = state.service.get_statistics(&key).await?;
    Ok(Json(StatisticsResponse {
        transactions_num: stats.transactions_num,
        platform_profit: stats.platform_profit,
    }))
}

pub fn router(state: AppState) -> Router {
    use tower_http::cors::{Any, CorsLayer};
    use tower_http::trace::TraceLayer;

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_check))
        .route("/users", post(create_user))
        .route("/wallets", post(create_wallet))
        .route("/wallets/:address", get(get_wallet_balance))
        .route("/wallets/:address/transactions", get(list_wallet_transactions))
        .route("/transactions", post(create_transaction).get(list_transactions))
        .route("/statistics", get(get_statistics))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
