use async_trait::async_trait;
use chrono::Utc;
use feepay_core::{
    FeeSchedule, PaymentCompletion, PaymentRecord, PaymentStatus, PaymentStore, StoreError,
};
use sqlx::{PgPool, Row, postgres::PgRow};
use tracing::error;
use uuid::Uuid;

const RECORD_COLUMNS: &str = r#"
    id,
    user_id,
    amount,
    currency,
    payment_status,
    payment_method,
    razorpay_order_id,
    payment_id,
    razorpay_signature,
    paid_at,
    created_at,
    updated_at
"#;

/// `freelancer_payments` table backed by Postgres.
#[derive(Clone)]
pub struct PgPaymentStore {
    pool: PgPool,
}

impl PgPaymentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::migrate!("../../migrations")
            .run(&self.pool)
            .await
            .map_err(|err| StoreError::Backend(err.to_string()))
    }
}

#[async_trait]
impl PaymentStore for PgPaymentStore {
    async fn find_by_identity(&self, identity_id: Uuid) -> Result<Option<PaymentRecord>, StoreError> {
        let row = sqlx::query(&format!(
            "SELECT {RECORD_COLUMNS} FROM freelancer_payments WHERE user_id = $1"
        ))
        .bind(identity_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(backend_error)?;

        row.map(|row| record_from_row(&row)).transpose()
    }

    async fn find_by_identity_and_order(
        &self,
        identity_id: Uuid,
        gateway_order_id: &str,
    ) -> Result<Option<PaymentRecord>, StoreError> {
        let row = sqlx::query(&format!(
            "SELECT {RECORD_COLUMNS} FROM freelancer_payments WHERE user_id = $1 AND razorpay_order_id = $2"
        ))
        .bind(identity_id)
        .bind(gateway_order_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(backend_error)?;

        row.map(|row| record_from_row(&row)).transpose()
    }

    async fn upsert_pending(
        &self,
        identity_id: Uuid,
        gateway_order_id: &str,
        fee: &FeeSchedule,
    ) -> Result<Option<PaymentRecord>, StoreError> {
        let now = Utc::now();

        let row = sqlx::query(&format!(
            r#"
            INSERT INTO freelancer_payments (
                id,
                user_id,
                amount,
                currency,
                payment_status,
                payment_method,
                razorpay_order_id,
                created_at,
                updated_at
            )
            VALUES ($1, $2, $3, $4, 'pending', $5, $6, $7, $7)
            ON CONFLICT (user_id)
            DO UPDATE SET
                amount = EXCLUDED.amount,
                currency = EXCLUDED.currency,
                payment_status = 'pending',
                payment_method = EXCLUDED.payment_method,
                razorpay_order_id = EXCLUDED.razorpay_order_id,
                payment_id = NULL,
                razorpay_signature = NULL,
                paid_at = NULL,
                updated_at = EXCLUDED.updated_at
            WHERE freelancer_payments.payment_status <> 'completed'
            RETURNING {RECORD_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(identity_id)
        .bind(fee.amount())
        .bind(&fee.currency)
        .bind(&fee.payment_method)
        .bind(gateway_order_id)
        .bind(now)
        .fetch_optional(&self.pool)
        .await
        .map_err(|err| {
            error!("failed to upsert pending payment for {identity_id}: {err}");
            backend_error(err)
        })?;

        row.map(|row| record_from_row(&row)).transpose()
    }

    async fn mark_completed(
        &self,
        identity_id: Uuid,
        gateway_order_id: &str,
        completion: &PaymentCompletion,
    ) -> Result<Option<PaymentRecord>, StoreError> {
        let row = sqlx::query(&format!(
            r#"
            UPDATE freelancer_payments
            SET
                payment_status = 'completed',
                payment_id = $3,
                razorpay_signature = $4,
                paid_at = $5,
                updated_at = $5
            WHERE user_id = $1
              AND razorpay_order_id = $2
              AND payment_status = 'pending'
            RETURNING {RECORD_COLUMNS}
            "#
        ))
        .bind(identity_id)
        .bind(gateway_order_id)
        .bind(&completion.payment_id)
        .bind(&completion.signature)
        .bind(completion.paid_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(|err| {
            error!("failed to complete payment {gateway_order_id} for {identity_id}: {err}");
            backend_error(err)
        })?;

        row.map(|row| record_from_row(&row)).transpose()
    }
}

fn record_from_row(row: &PgRow) -> Result<PaymentRecord, StoreError> {
    let status: String = row.try_get("payment_status").map_err(invalid_data)?;

    Ok(PaymentRecord {
        id: row.try_get("id").map_err(invalid_data)?,
        identity_id: row.try_get("user_id").map_err(invalid_data)?,
        amount: row.try_get("amount").map_err(invalid_data)?,
        currency: row.try_get("currency").map_err(invalid_data)?,
        status: PaymentStatus::parse(&status).map_err(invalid_data)?,
        payment_method: row.try_get("payment_method").map_err(invalid_data)?,
        gateway_order_id: row.try_get("razorpay_order_id").map_err(invalid_data)?,
        gateway_payment_id: row.try_get("payment_id").map_err(invalid_data)?,
        gateway_signature: row.try_get("razorpay_signature").map_err(invalid_data)?,
        paid_at: row.try_get("paid_at").map_err(invalid_data)?,
        created_at: row.try_get("created_at").map_err(invalid_data)?,
        updated_at: row.try_get("updated_at").map_err(invalid_data)?,
    })
}

fn backend_error(err: sqlx::Error) -> StoreError {
    StoreError::Backend(err.to_string())
}

fn invalid_data<E: std::fmt::Display>(err: E) -> StoreError {
    StoreError::InvalidData(err.to_string())
}
