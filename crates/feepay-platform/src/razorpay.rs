// Razorpay Orders API client. Auth is HTTP Basic with `key_id:key_secret`.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use feepay_core::{GatewayError, GatewayOrder, GatewayOrderRequest, OrderGateway};
use tracing::{debug, error};

use crate::config::RazorpayConfig;

#[derive(Clone)]
pub struct RazorpayClient {
    http: reqwest::Client,
    api_base: String,
    key_id: String,
    key_secret: String,
}

impl RazorpayClient {
    pub fn new(config: &RazorpayConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("failed to build razorpay http client")?;

        Ok(Self {
            http,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            key_id: config.key_id.clone(),
            key_secret: config.key_secret.clone(),
        })
    }

    fn orders_url(&self) -> String {
        format!("{}/v1/orders", self.api_base)
    }
}

#[async_trait]
impl OrderGateway for RazorpayClient {
    fn key_id(&self) -> &str {
        &self.key_id
    }

    async fn create_order(&self, request: &GatewayOrderRequest) -> Result<GatewayOrder, GatewayError> {
        debug!("razorpay create order receipt={}", request.receipt);

        let resp = self
            .http
            .post(self.orders_url())
            .basic_auth(&self.key_id, Some(&self.key_secret))
            .json(request)
            .send()
            .await
            .map_err(|err| GatewayError::Http(err.to_string()))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|err| GatewayError::Http(err.to_string()))?;

        if !status.is_success() {
            error!("razorpay order creation failed status={} body={}", status, body);
            return Err(GatewayError::Api {
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str::<GatewayOrder>(&body)
            .map_err(|err| GatewayError::InvalidResponse(format!("{err}; body={body}")))
    }
}

impl std::fmt::Debug for RazorpayClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RazorpayClient")
            .field("api_base", &self.api_base)
            .field("key_id", &self.key_id)
            .finish_non_exhaustive()
    }
}
