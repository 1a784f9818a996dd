use log::{debug, error};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};

// Form-submission payment statuses mutated by this service.
pub const FORM_PAYMENT_STATUS_PENDING: &str = "pending";
pub const FORM_PAYMENT_STATUS_PAID: &str = "paid";

/// Repository over the `form_submissions` table (a veteran's intake form,
/// owned by the main application). Only payment-related columns are touched
/// here; the row is created and deleted elsewhere.
pub struct FormSubmissionRepository {
    pool: PgPool,
}

impl FormSubmissionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Set `payment_status = 'pending'` once the customer has completed the
    /// checkout UI. Returns the number of rows updated.
    pub async fn mark_payment_pending(&self, form_submission_id: Uuid) -> AppResult<u64> {
        debug!(
            "Marking form submission {} payment_status=pending",
            form_submission_id
        );

        let result = sqlx::query(
            "UPDATE form_submissions
             SET payment_status = $2,
                 updated_at = NOW()
             WHERE id = $1",
        )
        .bind(form_submission_id)
        .bind(FORM_PAYMENT_STATUS_PENDING)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Failed to mark form submission {} payment pending: {}",
                form_submission_id, e
            );
            AppError::Database(format!("Failed to mark form submission pending: {}", e))
        })?;

        Ok(result.rows_affected())
    }

    /// Set `payment_status = 'paid'` with the amount and payment back-reference
    /// once funds are confirmed captured. Returns the number of rows updated.
    pub async fn mark_paid(
        &self,
        form_submission_id: Uuid,
        payment_amount: i64,
        payment_id: Uuid,
    ) -> AppResult<u64> {
        debug!(
            "Marking form submission {} payment_status=paid (payment {})",
            form_submission_id, payment_id
        );

        let result = sqlx::query(
            "UPDATE form_submissions
             SET payment_status = $2,
                 payment_amount = $3,
                 payment_id = $4,
                 updated_at = NOW()
             WHERE id = $1",
        )
        .bind(form_submission_id)
        .bind(FORM_PAYMENT_STATUS_PAID)
        .bind(payment_amount)
        .bind(payment_id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Failed to mark form submission {} paid: {}",
                form_submission_id, e
            );
            AppError::Database(format!("Failed to mark form submission paid: {}", e))
        })?;

        Ok(result.rows_affected())
    }
}
