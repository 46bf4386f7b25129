use std::sync::Arc;

use chrono::Utc;
use feepay_core::{
    CallbackVerifier, FeeSchedule, GatewayOrderRequest, Identity, IdentityResolver, OrderGateway,
    PaymentCompletion, PaymentError, PaymentStore,
};
use feepay_platform::{
    IssueOrderResponse, PaymentStatusResponse, VerifyPaymentRequest, VerifyPaymentResponse,
};
use tracing::{error, info, warn};

const ALREADY_COMPLETED: &str = "Payment already completed";
const MISSING_DETAILS: &str = "Missing payment details";
const RECORD_NOT_FOUND: &str = "Payment record not found";
const VERIFIED: &str = "Payment verified successfully";

/// Order issuance and callback verification for the lifetime-access fee.
///
/// Every collaborator and secret is injected here at startup; handlers only
/// hand over the bearer token and the request payload.
pub struct PaymentService {
    store: Arc<dyn PaymentStore>,
    gateway: Arc<dyn OrderGateway>,
    identities: Arc<dyn IdentityResolver>,
    verifier: CallbackVerifier,
    fee: FeeSchedule,
}

impl PaymentService {
    pub fn new(
        store: Arc<dyn PaymentStore>,
        gateway: Arc<dyn OrderGateway>,
        identities: Arc<dyn IdentityResolver>,
        verifier: CallbackVerifier,
    ) -> Self {
        Self {
            store,
            gateway,
            identities,
            verifier,
            fee: FeeSchedule::lifetime_access(),
        }
    }

    async fn authenticate(&self, bearer_token: Option<&str>) -> Result<Identity, PaymentError> {
        let Some(token) = bearer_token else {
            return Err(PaymentError::Unauthenticated);
        };

        self.identities.resolve(token).await.map_err(|err| {
            warn!("rejected bearer token: {err}");
            PaymentError::from(err)
        })
    }

    /// Phase one: create a gateway order and record it as pending.
    pub async fn issue_order(
        &self,
        bearer_token: Option<&str>,
    ) -> Result<IssueOrderResponse, PaymentError> {
        let identity = self.authenticate(bearer_token).await?;
        info!("creating razorpay order for user {}", identity.id);

        if let Some(existing) = self.store.find_by_identity(identity.id).await? {
            if existing.is_completed() {
                info!("user {} already has a completed payment", identity.id);
                return Err(PaymentError::Conflict(ALREADY_COMPLETED.to_string()));
            }
        }

        let request = GatewayOrderRequest::for_identity(identity.id, &self.fee, Utc::now());
        let order = self.gateway.create_order(&request).await.map_err(|err| {
            error!("razorpay order creation failed for user {}: {err}", identity.id);
            PaymentError::from(err)
        })?;
        info!("razorpay order {} created for user {}", order.id, identity.id);

        let stored = self
            .store
            .upsert_pending(identity.id, &order.id, &self.fee)
            .await
            .map_err(|err| {
                error!(
                    "failed to save pending payment for user {} order {}: {err}",
                    identity.id, order.id
                );
                PaymentError::from(err)
            })?;

        if stored.is_none() {
            info!(
                "user {} completed a payment while order {} was being created",
                identity.id, order.id
            );
            return Err(PaymentError::Conflict(ALREADY_COMPLETED.to_string()));
        }

        Ok(IssueOrderResponse {
            order_id: order.id,
            amount: order.amount,
            currency: order.currency,
            key_id: self.gateway.key_id().to_string(),
        })
    }

    /// Phase two: check the callback signature, then mark the matching
    /// pending record completed. Safe to repeat.
    pub async fn verify_payment(
        &self,
        bearer_token: Option<&str>,
        callback: VerifyPaymentRequest,
    ) -> Result<VerifyPaymentResponse, PaymentError> {
        let identity = self.authenticate(bearer_token).await?;

        let (Some(order_id), Some(payment_id), Some(signature)) = (
            non_blank(callback.razorpay_order_id),
            non_blank(callback.razorpay_payment_id),
            non_blank(callback.razorpay_signature),
        ) else {
            return Err(PaymentError::Validation(MISSING_DETAILS.to_string()));
        };

        info!(
            "verifying payment for user {} order {} payment {}",
            identity.id, order_id, payment_id
        );

        if let Err(err) = self.verifier.verify(&order_id, &payment_id, &signature) {
            warn!(
                "signature verification failed for user {} order {} payment {}",
                identity.id, order_id, payment_id
            );
            return Err(err);
        }

        let record = self
            .store
            .find_by_identity_and_order(identity.id, &order_id)
            .await?
            .ok_or_else(|| {
                warn!("no payment record for user {} order {}", identity.id, order_id);
                PaymentError::NotFound(RECORD_NOT_FOUND.to_string())
            })?;

        if record.is_completed() {
            info!("order {} for user {} was already verified", order_id, identity.id);
            return Ok(verified());
        }

        let completion = PaymentCompletion {
            payment_id,
            signature,
            paid_at: Utc::now(),
        };

        let updated = self
            .store
            .mark_completed(identity.id, &order_id, &completion)
            .await
            .map_err(|err| {
                error!(
                    "failed to mark order {} completed for user {}: {err}",
                    order_id, identity.id
                );
                PaymentError::from(err)
            })?;

        if updated.is_none() {
            // A concurrent verification may have completed it first.
            let current = self
                .store
                .find_by_identity_and_order(identity.id, &order_id)
                .await?;
            if !current.is_some_and(|record| record.is_completed()) {
                return Err(PaymentError::NotFound(RECORD_NOT_FOUND.to_string()));
            }
        }

        info!("payment verified for user {} order {}", identity.id, order_id);
        Ok(verified())
    }

    pub async fn payment_status(
        &self,
        bearer_token: Option<&str>,
    ) -> Result<PaymentStatusResponse, PaymentError> {
        let identity = self.authenticate(bearer_token).await?;

        let response = match self.store.find_by_identity(identity.id).await? {
            Some(record) => PaymentStatusResponse {
                has_paid: record.is_completed(),
                status: Some(record.status),
                order_id: Some(record.gateway_order_id),
                paid_at: record.paid_at,
            },
            None => PaymentStatusResponse {
                has_paid: false,
                status: None,
                order_id: None,
                paid_at: None,
            },
        };

        Ok(response)
    }
}

/// Drops absent or blank fields. Present values pass through unchanged so
/// the signed message is exactly what the caller sent.
fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}

fn verified() -> VerifyPaymentResponse {
    VerifyPaymentResponse {
        success: true,
        message: VERIFIED.to_string(),
    }
}
