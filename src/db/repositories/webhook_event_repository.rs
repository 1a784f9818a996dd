use log::debug;
use sqlx::PgPool;

use crate::error::{AppError, AppResult};

/// Repository over the `webhook_events` table, the one table this service
/// owns. Each verified Stripe event id is recorded once; a second delivery
/// of the same id is detected by the unique key and never dispatched.
pub struct WebhookEventRepository {
    pool: PgPool,
}

impl WebhookEventRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Record a verified event id before dispatch.
    ///
    /// Returns `true` when the event is new and `false` when the id was
    /// already recorded (duplicate delivery; Stripe permits these).
    pub async fn record(&self, stripe_event_id: &str, event_type: &str) -> AppResult<bool> {
        let result = sqlx::query(
            "INSERT INTO webhook_events (stripe_event_id, event_type, received_at)
             VALUES ($1, $2, NOW())
             ON CONFLICT (stripe_event_id) DO NOTHING",
        )
        .bind(stripe_event_id)
        .bind(event_type)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(format!("Failed to record webhook event: {}", e)))?;

        let is_new = result.rows_affected() > 0;
        if !is_new {
            debug!("Webhook event {} already recorded", stripe_event_id);
        }
        Ok(is_new)
    }
}
