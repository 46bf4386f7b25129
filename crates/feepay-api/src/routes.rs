use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::{
        HeaderMap, HeaderName, Method,
        header::{AUTHORIZATION, CONTENT_TYPE},
    },
    routing::{get, post},
};
use feepay_platform::{
    IssueOrderResponse, PaymentStatusResponse, VerifyPaymentRequest, VerifyPaymentResponse,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::debug;

use crate::error::ApiError;
use crate::service::PaymentService;

#[derive(Clone)]
pub struct AppState {
    pub payments: Arc<PaymentService>,
}

impl AppState {
    pub fn new(payments: PaymentService) -> Self {
        Self {
            payments: Arc::new(payments),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/payments/orders", post(create_order))
        .route("/payments/verify", post(verify_payment))
        .route("/payments/status", get(payment_status))
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            AUTHORIZATION,
            CONTENT_TYPE,
            HeaderName::from_static("x-client-info"),
            HeaderName::from_static("apikey"),
        ])
}

/// Token from `Authorization: Bearer <token>`, if any.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

async fn healthz() -> &'static str {
    "ok"
}

async fn create_order(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<IssueOrderResponse>, ApiError> {
    state
        .payments
        .issue_order(bearer_token(&headers))
        .await
        .map(Json)
        .map_err(ApiError::from)
}

async fn verify_payment(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<VerifyPaymentRequest>, JsonRejection>,
) -> Result<Json<VerifyPaymentResponse>, ApiError> {
    // An unreadable body is treated as one with no fields, so the caller is
    // still authenticated before being told what is missing.
    let callback = match payload {
        Ok(Json(callback)) => callback,
        Err(rejection) => {
            debug!("unreadable verification payload: {rejection}");
            VerifyPaymentRequest::default()
        }
    };

    state
        .payments
        .verify_payment(bearer_token(&headers), callback)
        .await
        .map(Json)
        .map_err(ApiError::from)
}

async fn payment_status(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<PaymentStatusResponse>, ApiError> {
    state
        .payments
        .payment_status(bearer_token(&headers))
        .await
        .map(Json)
        .map_err(ApiError::from)
}
