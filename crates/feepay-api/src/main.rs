use std::{net::SocketAddr, sync::Arc};

use anyhow::{Context, Result as AnyResult};
use feepay_api::{AppState, PaymentService, router};
use feepay_core::CallbackVerifier;
use feepay_platform::{JwtIdentityResolver, RazorpayClient, ServiceConfig, connect_database};
use feepay_store::PgPaymentStore;
use tracing::info;

#[tokio::main]
async fn main() -> AnyResult<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "feepay_api=info,tower_http=info".to_string()),
        )
        .init();

    let config = ServiceConfig::from_env("0.0.0.0:8080")?;
    let pool = connect_database(&config.database_url).await?;

    let store = PgPaymentStore::new(pool);
    store
        .migrate()
        .await
        .context("failed to run payment migrations")?;

    let gateway = RazorpayClient::new(&config.razorpay)?;
    let identities = JwtIdentityResolver::new(&config.jwt);
    let verifier = CallbackVerifier::new(config.razorpay.key_secret.clone());

    let payments = PaymentService::new(
        Arc::new(store),
        Arc::new(gateway),
        Arc::new(identities),
        verifier,
    );
    let router = router(AppState::new(payments));

    let addr: SocketAddr = config.http_addr.parse()?;
    info!("payments api listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
