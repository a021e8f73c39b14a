//! Memepad API Server — token gallery, details and purchase quotes over HTTP.

use alloy::primitives::Address;
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use memepad_core::{AppError, Settings, telemetry};
use memepad_factory::{FactoryClient, MemeToken, token};
use memepad_indexer::IndexerClient;
use memepad_purchase::{AmountSelector, ErrorKind, PREDEFINED_SHORTCUTS, PricingError, QuoteEngine};
use serde::{Deserialize, Serialize};
use std::{net::SocketAddr, sync::Arc};

/// Shared application state.
struct AppState {
    factory: Arc<FactoryClient>,
    indexer: IndexerClient,
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    telemetry::init();
    let settings = Settings::from_env()?;

    tracing::info!(rpc = %settings.rpc_url, factory = %settings.factory_address, "Starting Memepad API Server");

    let factory = FactoryClient::connect(&settings.rpc_url, &settings.factory_address)?;
    let indexer = memepad_indexer::connect_with(&settings)?;

    let state = Arc::new(AppState {
        factory: Arc::new(factory),
        indexer,
    });

    let addr = SocketAddr::from(([0, 0, 0, 0], settings.api_port));
    tracing::info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router(state)).await?;
    Ok(())
}

fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/v1/tokens", get(list_tokens))
        .route("/api/v1/tokens/:address", get(get_token))
        .route("/api/v1/tokens/:address/holders", get(get_holders))
        .route("/api/v1/tokens/:address/transfers", get(get_token_transfers))
        .route("/api/v1/tokens/:address/quote", get(get_quote))
        .route(
            "/api/v1/tokens/:address/shortcuts/:index",
            get(get_shortcut_amount),
        )
        .route("/api/v1/shortcuts", get(list_shortcuts))
        .route("/health", get(health))
        .with_state(state)
}

// ─── Query Params ───────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct SearchParams {
    q: Option<String>,
}

#[derive(Debug, Deserialize)]
struct QuoteParams {
    amount: String,
}

// ─── Response Types ─────────────────────────────────────────────────────────

#[derive(Serialize)]
struct ApiResponse<T: Serialize> {
    success: bool,
    data: T,
}

#[derive(Serialize)]
struct QuoteResponse {
    amount: String,
    total_supply: String,
    cost: String,
    cost_wei: String,
}

#[derive(Serialize)]
struct ShortcutEntry {
    index: usize,
    label: &'static str,
    value_wei: String,
}

#[derive(Serialize)]
struct ShortcutAmountResponse {
    label: &'static str,
    amount: String,
    quote: QuoteResponse,
}

type ApiError = (StatusCode, Json<ApiResponse<String>>);

fn json_ok<T: Serialize>(data: T) -> Json<ApiResponse<T>> {
    Json(ApiResponse {
        success: true,
        data,
    })
}

fn json_err(status: StatusCode, msg: &str) -> ApiError {
    (
        status,
        Json(ApiResponse {
            success: false,
            data: msg.to_string(),
        }),
    )
}

fn app_err(e: AppError) -> ApiError {
    match e {
        AppError::NotFound(_) => json_err(StatusCode::NOT_FOUND, "Token not found"),
        other => json_err(StatusCode::INTERNAL_SERVER_ERROR, &other.to_string()),
    }
}

fn pricing_err(e: PricingError) -> ApiError {
    tracing::warn!(error = %e, "Pricing lookup failed");
    let status = match e {
        PricingError::Unusable(_) => StatusCode::BAD_REQUEST,
        PricingError::Call(_) => StatusCode::BAD_GATEWAY,
    };
    json_err(status, ErrorKind::Pricing.user_message())
}

fn parse_address(raw: &str) -> Result<Address, ApiError> {
    raw.parse()
        .map_err(|_| json_err(StatusCode::BAD_REQUEST, "Invalid token address"))
}

// ─── Handlers ───────────────────────────────────────────────────────────────

async fn health() -> &'static str {
    "ok"
}

/// GET /api/v1/tokens?q= — the token gallery, optionally filtered.
async fn list_tokens(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Result<Json<ApiResponse<Vec<MemeToken>>>, ApiError> {
    let tokens = state.factory.list_tokens().await.map_err(app_err)?;
    let query = params.q.unwrap_or_default();
    Ok(json_ok(token::search(tokens, &query)))
}

/// GET /api/v1/tokens/:address — single token details.
async fn get_token(
    State(state): State<Arc<AppState>>,
    Path(address): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let address = parse_address(&address)?;
    let token = state.factory.token_details(address).await.map_err(app_err)?;
    Ok(json_ok(token))
}

/// GET /api/v1/tokens/:address/holders — holders reported by the indexer.
async fn get_holders(
    State(state): State<Arc<AppState>>,
    Path(address): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let address = parse_address(&address)?;
    let owners = state
        .indexer
        .get_owners(&format!("{address:#x}"))
        .await
        .map_err(app_err)?;
    Ok(json_ok(owners))
}

/// GET /api/v1/tokens/:address/transfers — transfer history from the indexer.
async fn get_token_transfers(
    State(state): State<Arc<AppState>>,
    Path(address): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let address = parse_address(&address)?;
    let transfers = state
        .indexer
        .get_transfers(&format!("{address:#x}"))
        .await
        .map_err(app_err)?;
    Ok(json_ok(transfers))
}

/// GET /api/v1/tokens/:address/quote?amount= — cost of buying `amount` tokens now.
async fn get_quote(
    State(state): State<Arc<AppState>>,
    Path(address): Path<String>,
    Query(params): Query<QuoteParams>,
) -> Result<impl IntoResponse, ApiError> {
    let address = parse_address(&address)?;
    let supply = state.factory.supply_snapshot(address).await.map_err(app_err)?;
    let quote = QuoteEngine::new(Arc::clone(&state.factory))
        .get_cost(&params.amount, supply)
        .await
        .map_err(pricing_err)?;

    Ok(json_ok(QuoteResponse {
        amount: quote.amount.to_string(),
        total_supply: quote.total_supply.to_string(),
        cost: quote.cost,
        cost_wei: quote.cost_wei.to_string(),
    }))
}

/// GET /api/v1/shortcuts — predefined purchase sizes.
async fn list_shortcuts() -> Json<ApiResponse<Vec<ShortcutEntry>>> {
    let entries = PREDEFINED_SHORTCUTS
        .iter()
        .enumerate()
        .map(|(index, s)| ShortcutEntry {
            index,
            label: s.label,
            value_wei: s.value().to_string(),
        })
        .collect();
    json_ok(entries)
}

/// GET /api/v1/tokens/:address/shortcuts/:index — token amount (and its quote) for a shortcut.
async fn get_shortcut_amount(
    State(state): State<Arc<AppState>>,
    Path((address, index)): Path<(String, usize)>,
) -> Result<impl IntoResponse, ApiError> {
    let address = parse_address(&address)?;
    let engine = QuoteEngine::new(Arc::clone(&state.factory));
    let selector = AmountSelector::new(engine.clone());
    let shortcut = selector
        .shortcut(index)
        .ok_or_else(|| json_err(StatusCode::NOT_FOUND, "Unknown shortcut"))?;

    let supply = state.factory.supply_snapshot(address).await.map_err(app_err)?;
    let amount = selector
        .select_shortcut(shortcut, supply)
        .await
        .map_err(pricing_err)?;
    let quote = engine.get_cost(&amount, supply).await.map_err(pricing_err)?;

    Ok(json_ok(ShortcutAmountResponse {
        label: shortcut.label,
        amount,
        quote: QuoteResponse {
            amount: quote.amount.to_string(),
            total_supply: quote.total_supply.to_string(),
            cost: quote.cost,
            cost_wei: quote.cost_wei.to_string(),
        },
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{Body, to_bytes};
    use axum::http::Request;
    use tower::ServiceExt;

    fn test_router() -> Router {
        // Nothing here touches the network unless a handler calls out.
        let factory = FactoryClient::connect(
            "http://127.0.0.1:1",
            "0x5FbDB2315678afecb367f032d93F642f64180aa3",
        )
        .unwrap();
        let indexer = memepad_indexer::connect("http://127.0.0.1:1", "", "sepolia").unwrap();
        router(Arc::new(AppState {
            factory: Arc::new(factory),
            indexer,
        }))
    }

    async fn get_json(uri: &str) -> (StatusCode, serde_json::Value) {
        let response = test_router()
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_shortcuts_listed() {
        let (status, body) = get_json("/api/v1/shortcuts").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"][1]["label"], "0.03 ETH");
        assert_eq!(body["data"][1]["value_wei"], "30000000000000000");
    }

    #[tokio::test]
    async fn test_bad_address_rejected() {
        let (status, body) = get_json("/api/v1/tokens/not-an-address/quote?amount=200").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert_eq!(body["data"], "Invalid token address");
    }

    #[tokio::test]
    async fn test_unknown_shortcut() {
        let (status, _) = get_json(
            "/api/v1/tokens/0x5FbDB2315678afecb367f032d93F642f64180aa3/shortcuts/9",
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_missing_token_is_404() {
        let (status, Json(body)) = app_err(AppError::NotFound("token 0x01".into()));
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body.data, "Token not found");

        let (status, _) = app_err(AppError::Decode("Token not found in payload".into()));
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_pricing_errors_use_user_message() {
        let (status, Json(body)) = pricing_err(PricingError::Unusable("abc".into()));
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.data, "Failed to calculate cost. Please try again.");
    }
}
