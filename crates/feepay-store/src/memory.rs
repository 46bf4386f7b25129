use std::collections::HashMap;
use std::collections::hash_map::Entry;

use async_trait::async_trait;
use chrono::Utc;
use feepay_core::{FeeSchedule, PaymentCompletion, PaymentRecord, PaymentStore, StoreError};
use tokio::sync::RwLock;
use uuid::Uuid;

/// Process-local store keyed by identity. The write lock makes each upsert
/// and completion atomic per identity.
#[derive(Default)]
pub struct InMemoryPaymentStore {
    records: RwLock<HashMap<Uuid, PaymentRecord>>,
}

impl InMemoryPaymentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, record: PaymentRecord) {
        let mut records = self.records.write().await;
        records.insert(record.identity_id, record);
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl PaymentStore for InMemoryPaymentStore {
    async fn find_by_identity(&self, identity_id: Uuid) -> Result<Option<PaymentRecord>, StoreError> {
        let records = self.records.read().await;
        Ok(records.get(&identity_id).cloned())
    }

    async fn find_by_identity_and_order(
        &self,
        identity_id: Uuid,
        gateway_order_id: &str,
    ) -> Result<Option<PaymentRecord>, StoreError> {
        let records = self.records.read().await;
        Ok(records
            .get(&identity_id)
            .filter(|record| record.gateway_order_id == gateway_order_id)
            .cloned())
    }

    async fn upsert_pending(
        &self,
        identity_id: Uuid,
        gateway_order_id: &str,
        fee: &FeeSchedule,
    ) -> Result<Option<PaymentRecord>, StoreError> {
        let now = Utc::now();
        let mut records = self.records.write().await;

        match records.entry(identity_id) {
            Entry::Occupied(mut entry) => {
                let existing = entry.get_mut();
                if !existing.reissue(gateway_order_id, fee, now) {
                    return Ok(None);
                }
                Ok(Some(existing.clone()))
            }
            Entry::Vacant(entry) => {
                let record = PaymentRecord::pending(identity_id, gateway_order_id, fee, now);
                entry.insert(record.clone());
                Ok(Some(record))
            }
        }
    }

    async fn mark_completed(
        &self,
        identity_id: Uuid,
        gateway_order_id: &str,
        completion: &PaymentCompletion,
    ) -> Result<Option<PaymentRecord>, StoreError> {
        let mut records = self.records.write().await;

        let Some(record) = records
            .get_mut(&identity_id)
            .filter(|record| record.gateway_order_id == gateway_order_id)
        else {
            return Ok(None);
        };

        if !record.complete(completion) {
            return Ok(None);
        }
        Ok(Some(record.clone()))
    }
}
