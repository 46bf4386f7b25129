#![allow(dead_code)]

use std::sync::{
    Arc, Mutex,
    atomic::{AtomicUsize, Ordering},
};

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
    routing::post,
};
use base64::{Engine, engine::general_purpose::STANDARD};
use chrono::{Duration, Utc};
use feepay_api::{AppState, PaymentService, router};
use feepay_core::CallbackVerifier;
use feepay_platform::{Claims, JwtConfig, JwtIdentityResolver, RazorpayClient, RazorpayConfig};
use feepay_store::InMemoryPaymentStore;
use jsonwebtoken::{EncodingKey, Header, encode};
use serde_json::{Value, json};
use uuid::Uuid;

pub const KEY_ID: &str = "rzp_test_key";
pub const KEY_SECRET: &str = "s3cret";
pub const JWT_SECRET: &str = "test-jwt-secret";

/// Stand-in for the Razorpay Orders API. Issues `order_1`, `order_2`, ...
#[derive(Clone, Default)]
pub struct FakeRazorpay {
    pub requests: Arc<Mutex<Vec<Value>>>,
    issued: Arc<AtomicUsize>,
}

impl FakeRazorpay {
    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn last_request(&self) -> Option<Value> {
        self.requests.lock().unwrap().last().cloned()
    }
}

async fn fake_create_order(
    State(fake): State<FakeRazorpay>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let expected = format!("Basic {}", STANDARD.encode(format!("{KEY_ID}:{KEY_SECRET}")));
    let supplied = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    if supplied != Some(expected.as_str()) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({
                "error": {
                    "code": "BAD_REQUEST_ERROR",
                    "description": "Authentication failed"
                }
            })),
        );
    }

    fake.requests.lock().unwrap().push(body.clone());
    let n = fake.issued.fetch_add(1, Ordering::SeqCst) + 1;

    (
        StatusCode::OK,
        Json(json!({
            "id": format!("order_{n}"),
            "entity": "order",
            "amount": body["amount"],
            "amount_paid": 0,
            "amount_due": body["amount"],
            "currency": body["currency"],
            "receipt": body["receipt"],
            "status": "created",
            "attempts": 0,
            "notes": body["notes"],
        })),
    )
}

async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

pub async fn start_fake_razorpay() -> (String, FakeRazorpay) {
    let fake = FakeRazorpay::default();
    let app = Router::new()
        .route("/v1/orders", post(fake_create_order))
        .with_state(fake.clone());
    (serve(app).await, fake)
}

pub struct TestApi {
    pub base: String,
    pub store: Arc<InMemoryPaymentStore>,
    pub razorpay: FakeRazorpay,
    pub client: reqwest::Client,
}

/// Payments API wired to a fresh in-memory store and a fake Razorpay.
/// `gateway_secret` is what the API presents to Razorpay.
pub async fn start_api_with_gateway_secret(gateway_secret: &str) -> TestApi {
    let (razorpay_base, razorpay) = start_fake_razorpay().await;
    let store = Arc::new(InMemoryPaymentStore::new());

    let gateway = RazorpayClient::new(&RazorpayConfig {
        key_id: KEY_ID.to_string(),
        key_secret: gateway_secret.to_string(),
        api_base: razorpay_base,
        timeout_secs: 5,
    })
    .unwrap();
    let identities = JwtIdentityResolver::new(&JwtConfig {
        secret: JWT_SECRET.to_string(),
        audience: None,
    });

    let payments = PaymentService::new(
        store.clone(),
        Arc::new(gateway),
        Arc::new(identities),
        CallbackVerifier::new(KEY_SECRET),
    );
    let base = serve(router(AppState::new(payments))).await;

    TestApi {
        base,
        store,
        razorpay,
        client: reqwest::Client::new(),
    }
}

pub async fn start_api() -> TestApi {
    start_api_with_gateway_secret(KEY_SECRET).await
}

pub fn mint_token(user: Uuid) -> String {
    let claims = Claims {
        sub: user.to_string(),
        exp: (Utc::now() + Duration::hours(1)).timestamp() as usize,
        email: Some(format!("{user}@example.com")),
        aud: Some("authenticated".to_string()),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(JWT_SECRET.as_bytes()),
    )
    .unwrap()
}

impl TestApi {
    pub async fn create_order(&self, token: Option<&str>) -> reqwest::Response {
        let mut request = self.client.post(format!("{}/payments/orders", self.base));
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        request.send().await.unwrap()
    }

    pub async fn verify(&self, token: Option<&str>, body: Value) -> reqwest::Response {
        let mut request = self
            .client
            .post(format!("{}/payments/verify", self.base))
            .json(&body);
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        request.send().await.unwrap()
    }

    pub async fn status(&self, token: &str) -> Value {
        self.client
            .get(format!("{}/payments/status", self.base))
            .bearer_auth(token)
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap()
    }
}
