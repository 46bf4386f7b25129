use anyhow::{Result, bail};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Completed,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Completed => "completed",
        }
    }

    pub fn parse(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(PaymentStatus::Pending),
            "completed" => Ok(PaymentStatus::Completed),
            other => bail!("unknown payment status '{other}'"),
        }
    }
}

/// The one-time lifetime-access fee.
///
/// Amounts are held in the gateway's minor unit (paise for INR) so the order
/// request never goes through a decimal conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeeSchedule {
    pub amount_minor: i64,
    pub currency: String,
    pub payment_method: String,
}

impl FeeSchedule {
    pub fn lifetime_access() -> Self {
        Self {
            amount_minor: 9900,
            currency: "INR".to_string(),
            payment_method: "razorpay".to_string(),
        }
    }

    /// Amount in major units, as stored on the payment record.
    pub fn amount(&self) -> Decimal {
        Decimal::new(self.amount_minor, 2).normalize()
    }
}

impl Default for FeeSchedule {
    fn default() -> Self {
        Self::lifetime_access()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PaymentRecord {
    pub id: Uuid,
    pub identity_id: Uuid,
    pub amount: Decimal,
    pub currency: String,
    pub status: PaymentStatus,
    pub payment_method: String,
    pub gateway_order_id: String,
    pub gateway_payment_id: Option<String>,
    pub gateway_signature: Option<String>,
    pub paid_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Proof of payment carried from a verified gateway callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentCompletion {
    pub payment_id: String,
    pub signature: String,
    pub paid_at: DateTime<Utc>,
}

impl PaymentRecord {
    pub fn pending(
        identity_id: Uuid,
        gateway_order_id: impl Into<String>,
        fee: &FeeSchedule,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            identity_id,
            amount: fee.amount(),
            currency: fee.currency.clone(),
            status: PaymentStatus::Pending,
            payment_method: fee.payment_method.clone(),
            gateway_order_id: gateway_order_id.into(),
            gateway_payment_id: None,
            gateway_signature: None,
            paid_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.status == PaymentStatus::Completed
    }

    /// Points a pending record at a freshly issued order. Completed records
    /// are left untouched and `false` is returned.
    pub fn reissue(
        &mut self,
        gateway_order_id: impl Into<String>,
        fee: &FeeSchedule,
        now: DateTime<Utc>,
    ) -> bool {
        if self.is_completed() {
            return false;
        }

        self.amount = fee.amount();
        self.currency = fee.currency.clone();
        self.payment_method = fee.payment_method.clone();
        self.gateway_order_id = gateway_order_id.into();
        self.gateway_payment_id = None;
        self.gateway_signature = None;
        self.paid_at = None;
        self.updated_at = now;
        true
    }

    /// pending -> completed. Returns `false` when the record was already
    /// completed; the stored proof is never overwritten.
    pub fn complete(&mut self, completion: &PaymentCompletion) -> bool {
        if self.is_completed() {
            return false;
        }

        self.status = PaymentStatus::Completed;
        self.gateway_payment_id = Some(completion.payment_id.clone());
        self.gateway_signature = Some(completion.signature.clone());
        self.paid_at = Some(completion.paid_at);
        self.updated_at = completion.paid_at;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn completion() -> PaymentCompletion {
        PaymentCompletion {
            payment_id: "pay_7".to_string(),
            signature: "abc123".to_string(),
            paid_at: Utc::now(),
        }
    }

    #[test]
    fn lifetime_fee_is_99_rupees() {
        let fee = FeeSchedule::lifetime_access();
        assert_eq!(fee.amount_minor, 9900);
        assert_eq!(fee.amount(), Decimal::from(99));
        assert_eq!(fee.currency, "INR");
    }

    #[test]
    fn status_round_trips_through_text() {
        assert_eq!(PaymentStatus::parse("Completed").unwrap(), PaymentStatus::Completed);
        assert_eq!(PaymentStatus::parse(PaymentStatus::Pending.as_str()).unwrap(), PaymentStatus::Pending);
        assert!(PaymentStatus::parse("refunded").is_err());
    }

    #[test]
    fn completing_sets_every_proof_field() {
        let mut record =
            PaymentRecord::pending(Uuid::new_v4(), "order_9", &FeeSchedule::default(), Utc::now());
        let proof = completion();

        assert!(record.complete(&proof));
        assert!(record.is_completed());
        assert_eq!(record.gateway_payment_id.as_deref(), Some("pay_7"));
        assert_eq!(record.gateway_signature.as_deref(), Some("abc123"));
        assert_eq!(record.paid_at, Some(proof.paid_at));
        assert_eq!(record.gateway_order_id, "order_9");
    }

    #[test]
    fn completed_record_is_never_rewritten() {
        let mut record =
            PaymentRecord::pending(Uuid::new_v4(), "order_9", &FeeSchedule::default(), Utc::now());
        record.complete(&completion());
        let snapshot = record.clone();

        let second = PaymentCompletion {
            payment_id: "pay_other".to_string(),
            signature: "ffff".to_string(),
            paid_at: Utc::now(),
        };
        assert!(!record.complete(&second));
        assert!(!record.reissue("order_10", &FeeSchedule::default(), Utc::now()));
        assert_eq!(record, snapshot);
    }

    #[test]
    fn reissue_replaces_pending_order() {
        let mut record =
            PaymentRecord::pending(Uuid::new_v4(), "order_1", &FeeSchedule::default(), Utc::now());
        let id = record.id;

        assert!(record.reissue("order_2", &FeeSchedule::default(), Utc::now()));
        assert_eq!(record.id, id);
        assert_eq!(record.gateway_order_id, "order_2");
        assert_eq!(record.status, PaymentStatus::Pending);
    }
}
