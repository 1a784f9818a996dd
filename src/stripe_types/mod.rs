//! Custom Stripe types module
//!
//! Hand-rolled serde structs for the slice of the Stripe API this service
//! consumes. Only the fields the webhook flow reads are modeled; everything
//! else in a payload is ignored on deserialization.

pub mod charge;
pub mod checkout_session;
pub mod enums;
pub mod event;
pub mod payment_intent;
pub mod payment_method;

// Re-export all types for convenience
pub use charge::{Charge, ChargeList};
pub use checkout_session::CheckoutSession;
pub use enums::*;
pub use event::Event;
pub use payment_intent::PaymentIntent;
pub use payment_method::{PaymentMethod, PaymentMethodCard};
