pub mod stripe_service;

pub use stripe_service::StripeService;
