use chrono::{DateTime, Utc};
use log::{debug, error};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};

// Payment row statuses. The progression is linear:
// pending -> processing -> succeeded | failed.
pub const PAYMENT_STATUS_PROCESSING: &str = "processing";
pub const PAYMENT_STATUS_SUCCEEDED: &str = "succeeded";
pub const PAYMENT_STATUS_FAILED: &str = "failed";

/// A row of the `payments` table. The row is created by the web application
/// when checkout starts; this service only transitions its state.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Payment {
    pub id: Uuid,
    pub form_submission_id: Option<Uuid>,
    pub stripe_session_id: Option<String>,
    pub stripe_payment_intent_id: Option<String>,
    pub stripe_customer_id: Option<String>,
    pub amount: i64,
    pub status: String,
    pub payment_method_type: Option<String>,
    pub card_brand: Option<String>,
    pub card_last4: Option<String>,
    pub receipt_url: Option<String>,
    pub paid_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Card/payment-method details attached to a payment on success. All fields
/// are optional: enrichment is best-effort and may be unavailable.
#[derive(Debug, Clone, Default)]
pub struct PaymentEnrichment {
    pub payment_method_type: Option<String>,
    pub card_brand: Option<String>,
    pub card_last4: Option<String>,
    pub receipt_url: Option<String>,
}

pub struct PaymentRepository {
    pool: PgPool,
}

impl PaymentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Mark the payment matched by checkout-session id as processing and
    /// attach the Stripe customer id.
    ///
    /// Rows already in a terminal or later state are left alone; the status
    /// guard makes a late or duplicate delivery match zero rows. Returns the
    /// number of rows updated.
    pub async fn mark_processing(
        &self,
        session_id: &str,
        customer_id: Option<&str>,
    ) -> AppResult<u64> {
        debug!("Marking payment processing for session {}", session_id);

        let result = sqlx::query(
            "UPDATE payments
             SET status = $2,
                 stripe_customer_id = COALESCE($3, stripe_customer_id),
                 updated_at = NOW()
             WHERE stripe_session_id = $1
               AND status NOT IN ($4, $5)",
        )
        .bind(session_id)
        .bind(PAYMENT_STATUS_PROCESSING)
        .bind(customer_id)
        .bind(PAYMENT_STATUS_SUCCEEDED)
        .bind(PAYMENT_STATUS_FAILED)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Failed to mark payment processing for session {}: {}",
                session_id, e
            );
            AppError::Database(format!("Failed to mark payment processing: {}", e))
        })?;

        Ok(result.rows_affected())
    }

    /// Mark the payment matched by payment-intent id as succeeded, attaching
    /// enrichment fields and the paid-at timestamp.
    ///
    /// Returns the updated row when one was matched, so the caller can
    /// propagate paid status to the linked form submission. `succeeded` is
    /// terminal; a duplicate delivery matches zero rows and returns `None`.
    /// A previously `failed` row may still succeed, because Stripe re-uses
    /// the payment intent across customer retry attempts.
    pub async fn mark_succeeded(
        &self,
        payment_intent_id: &str,
        enrichment: &PaymentEnrichment,
    ) -> AppResult<Option<Payment>> {
        debug!("Marking payment succeeded for intent {}", payment_intent_id);

        let payment = sqlx::query_as::<_, Payment>(
            "UPDATE payments
             SET status = $2,
                 payment_method_type = $3,
                 card_brand = $4,
                 card_last4 = $5,
                 receipt_url = $6,
                 paid_at = NOW(),
                 updated_at = NOW()
             WHERE stripe_payment_intent_id = $1
               AND status <> $2
             RETURNING id, form_submission_id, stripe_session_id,
                       stripe_payment_intent_id, stripe_customer_id, amount,
                       status, payment_method_type, card_brand, card_last4,
                       receipt_url, paid_at, created_at, updated_at",
        )
        .bind(payment_intent_id)
        .bind(PAYMENT_STATUS_SUCCEEDED)
        .bind(enrichment.payment_method_type.as_deref())
        .bind(enrichment.card_brand.as_deref())
        .bind(enrichment.card_last4.as_deref())
        .bind(enrichment.receipt_url.as_deref())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Failed to mark payment succeeded for intent {}: {}",
                payment_intent_id, e
            );
            AppError::Database(format!("Failed to mark payment succeeded: {}", e))
        })?;

        Ok(payment)
    }

    /// Mark the payment matched by payment-intent id as failed.
    ///
    /// A row that already reached `succeeded` stays `succeeded`: a `failed`
    /// event arriving after a `succeeded` one is a stale delivery. Returns
    /// the number of rows updated.
    pub async fn mark_failed(&self, payment_intent_id: &str) -> AppResult<u64> {
        debug!("Marking payment failed for intent {}", payment_intent_id);

        let result = sqlx::query(
            "UPDATE payments
             SET status = $2,
                 updated_at = NOW()
             WHERE stripe_payment_intent_id = $1
               AND status <> $3",
        )
        .bind(payment_intent_id)
        .bind(PAYMENT_STATUS_FAILED)
        .bind(PAYMENT_STATUS_SUCCEEDED)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Failed to mark payment failed for intent {}: {}",
                payment_intent_id, e
            );
            AppError::Database(format!("Failed to mark payment failed: {}", e))
        })?;

        Ok(result.rows_affected())
    }
}
