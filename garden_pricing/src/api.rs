//! HTTP API for the pricing engine.
//!
//! This module exposes the engine as a small JSON API using
//! [`axum`](https://crates.io/crates/axum).  The booking UI posts its
//! current selection and receives a fresh pricing snapshot; the
//! checkout endpoint additionally settles credits and returns the
//! payment record that would be stored for the booking.

use crate::config::PricingConfig;
use crate::credits::CreditsSettlement;
use crate::engine::PricingEngine;
use crate::error::PricingError;
use crate::extension::{ExtensionInput, ExtensionPricing};
use crate::models::{FoodContributionRange, PricingDetails, PricingInput};
use crate::record::PaymentRecord;
use crate::weeks::validate_selection;
use anyhow::Result;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

/// Application state shared across requests.
pub struct AppState {
    pub engine: PricingEngine,
}

#[derive(Debug)]
pub enum ApiError {
    InvalidInput(PricingError),
    Internal(anyhow::Error),
}

impl From<PricingError> for ApiError {
    fn from(err: PricingError) -> Self {
        ApiError::InvalidInput(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::InvalidInput(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            ApiError::Internal(err) => {
                tracing::error!("internal error: {err:#}");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal error".to_string())
            }
        };
        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

type ApiResult<T> = std::result::Result<Json<T>, ApiError>;

#[derive(Debug, Deserialize)]
pub struct FoodRangeRequest {
    pub total_nights: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CheckoutRequest {
    Booking {
        #[serde(flatten)]
        input: PricingInput,
        #[serde(default)]
        available_credits: f64,
        #[serde(default)]
        credits_to_use: Option<f64>,
    },
    Extension {
        #[serde(flatten)]
        input: ExtensionInput,
        #[serde(default)]
        available_credits: f64,
        #[serde(default)]
        credits_to_use: Option<f64>,
    },
}

#[derive(Debug, Serialize)]
pub struct CheckoutResponse {
    pub pricing: PricingDetails,
    pub settlement: CreditsSettlement,
    pub record: PaymentRecord,
}

/// Build the API router around an engine built from `config`.
pub fn build_router(config: PricingConfig) -> Result<(Router, Arc<AppState>)> {
    let engine = PricingEngine::new(config)?;
    let state = Arc::new(AppState { engine });
    let router = Router::new()
        .route("/api/quote", post(quote_handler))
        .route("/api/quote/batch", post(batch_handler))
        .route("/api/extension", post(extension_handler))
        .route("/api/food-range", post(food_range_handler))
        .route("/api/checkout", post(checkout_handler))
        .with_state(state.clone());
    Ok((router, state))
}

/// Handler for POST /api/quote
pub async fn quote_handler(
    State(state): State<Arc<AppState>>,
    Json(input): Json<PricingInput>,
) -> ApiResult<PricingDetails> {
    validate_selection(&input.weeks)?;
    Ok(Json(state.engine.price_booking(&input)))
}

/// Handler for POST /api/quote/batch
pub async fn batch_handler(
    State(state): State<Arc<AppState>>,
    Json(inputs): Json<Vec<PricingInput>>,
) -> ApiResult<Vec<PricingDetails>> {
    for input in &inputs {
        validate_selection(&input.weeks)?;
    }
    let priced = tokio::task::spawn_blocking(move || state.engine.price_batch(&inputs))
        .await
        .map_err(|err| ApiError::Internal(err.into()))?;
    Ok(Json(priced))
}

/// Handler for POST /api/extension
pub async fn extension_handler(
    State(state): State<Arc<AppState>>,
    Json(input): Json<ExtensionInput>,
) -> ApiResult<ExtensionPricing> {
    input.validate()?;
    Ok(Json(state.engine.price_extension(&input)))
}

/// Handler for POST /api/food-range
pub async fn food_range_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<FoodRangeRequest>,
) -> ApiResult<FoodContributionRange> {
    Ok(Json(state.engine.food_contribution_range(request.total_nights)))
}

/// Handler for POST /api/checkout
pub async fn checkout_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CheckoutRequest>,
) -> ApiResult<CheckoutResponse> {
    let engine = &state.engine;
    let now = chrono::Utc::now();
    let response = match request {
        CheckoutRequest::Booking {
            input,
            available_credits,
            credits_to_use,
        } => {
            validate_selection(&input.weeks)?;
            let pricing = engine.price_booking(&input);
            let settlement =
                engine
                    .credits()
                    .settle(pricing.total_amount, available_credits, credits_to_use, now)?;
            let record = PaymentRecord::initial(&input, &pricing, &settlement);
            CheckoutResponse {
                pricing,
                settlement,
                record,
            }
        }
        CheckoutRequest::Extension {
            input,
            available_credits,
            credits_to_use,
        } => {
            input.validate()?;
            let priced = engine.price_extension(&input);
            let settlement = engine.credits().settle(
                priced.pricing.total_amount,
                available_credits,
                credits_to_use,
                now,
            )?;
            let record = PaymentRecord::extension(&input, &priced, &settlement);
            CheckoutResponse {
                pricing: priced.pricing,
                settlement,
                record,
            }
        }
    };
    tracing::info!(
        payment_type = ?response.record.payment_type,
        total = response.pricing.total_amount,
        amount_due = response.settlement.amount_due,
        "checkout priced"
    );
    Ok(Json(response))
}

/// Launch the API server.  This function builds the router from the
/// pricing config at `config_path` and binds to the supplied address.
/// It blocks until the server terminates.
pub async fn serve(addr: &str, config_path: &Path) -> Result<()> {
    let config = PricingConfig::load(config_path)?;
    let (router, _state) = build_router(config)?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("pricing API listening on {}", listener.local_addr()?);
    axum::serve(listener, router).await?;
    Ok(())
}
