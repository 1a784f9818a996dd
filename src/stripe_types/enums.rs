// Stripe string constants used across the webhook flow.

// Webhook Event Types
pub const EVENT_CHECKOUT_SESSION_COMPLETED: &str = "checkout.session.completed";
pub const EVENT_PAYMENT_INTENT_SUCCEEDED: &str = "payment_intent.succeeded";
pub const EVENT_PAYMENT_INTENT_PAYMENT_FAILED: &str = "payment_intent.payment_failed";

// Metadata keys set by the web application at session-creation time
pub const METADATA_FORM_SUBMISSION_ID: &str = "formSubmissionId";
