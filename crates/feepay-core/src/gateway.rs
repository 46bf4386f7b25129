use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::GatewayError;
use crate::models::FeeSchedule;

/// Razorpay caps `receipt` at 40 characters.
pub const MAX_RECEIPT_LEN: usize = 40;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GatewayOrderRequest {
    pub amount: i64,
    pub currency: String,
    pub receipt: String,
    pub notes: BTreeMap<String, String>,
}

impl GatewayOrderRequest {
    pub fn for_identity(identity_id: Uuid, fee: &FeeSchedule, now: DateTime<Utc>) -> Self {
        let mut notes = BTreeMap::new();
        notes.insert("user_id".to_string(), identity_id.to_string());

        Self {
            amount: fee.amount_minor,
            currency: fee.currency.clone(),
            receipt: receipt_for(identity_id, now),
            notes,
        }
    }
}

/// `r_<first 12 hex digits of the identity>_<epoch millis>`.
///
/// The identity is shortened to fit the receipt limit; the millisecond
/// timestamp is what keeps receipts for the same identity distinct.
pub fn receipt_for(identity_id: Uuid, now: DateTime<Utc>) -> String {
    let simple = identity_id.simple().to_string();
    format!("r_{}_{}", &simple[..12], now.timestamp_millis())
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GatewayOrder {
    pub id: String,
    pub amount: i64,
    pub currency: String,
    #[serde(default)]
    pub receipt: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

/// Order-creation side of the payment gateway.
#[async_trait]
pub trait OrderGateway: Send + Sync {
    /// Public key id handed to the checkout widget.
    fn key_id(&self) -> &str;

    async fn create_order(&self, request: &GatewayOrderRequest) -> Result<GatewayOrder, GatewayError>;
}
