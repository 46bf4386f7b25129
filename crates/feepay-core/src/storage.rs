use async_trait::async_trait;
use uuid::Uuid;

use crate::errors::StoreError;
use crate::models::{FeeSchedule, PaymentCompletion, PaymentRecord};

/// Persistence for payment records, one row per identity.
#[async_trait]
pub trait PaymentStore: Send + Sync {
    async fn find_by_identity(&self, identity_id: Uuid) -> Result<Option<PaymentRecord>, StoreError>;

    async fn find_by_identity_and_order(
        &self,
        identity_id: Uuid,
        gateway_order_id: &str,
    ) -> Result<Option<PaymentRecord>, StoreError>;

    /// Creates or replaces the identity's pending record. Must be atomic per
    /// identity and must not touch a completed record, in which case
    /// `Ok(None)` is returned.
    async fn upsert_pending(
        &self,
        identity_id: Uuid,
        gateway_order_id: &str,
        fee: &FeeSchedule,
    ) -> Result<Option<PaymentRecord>, StoreError>;

    /// Moves the record matching both identity and order from pending to
    /// completed. `Ok(None)` when no pending record matched.
    async fn mark_completed(
        &self,
        identity_id: Uuid,
        gateway_order_id: &str,
        completion: &PaymentCompletion,
    ) -> Result<Option<PaymentRecord>, StoreError>;
}
