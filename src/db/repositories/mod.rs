pub mod form_submission_repository;
pub mod payment_repository;
pub mod webhook_event_repository;

pub use form_submission_repository::FormSubmissionRepository;
pub use payment_repository::{Payment, PaymentRepository};
pub use webhook_event_repository::WebhookEventRepository;
