use hmac::{Hmac, Mac};
use log::info;
use sha2::Sha256;
use subtle::ConstantTimeEq;

use crate::stripe_types::{Event, PaymentMethod};

const STRIPE_API_BASE: &str = "https://api.stripe.com";

#[derive(Debug, thiserror::Error)]
pub enum StripeServiceError {
    #[error("Stripe API error: {0}")]
    Api(String),
    #[error("Webhook verification failed: {0}")]
    WebhookVerification(String),
    #[error("Invalid configuration: {0}")]
    Configuration(String),
}

type HmacSha256 = Hmac<Sha256>;

/// Client for the slice of the Stripe API this service touches: webhook
/// signature verification and the payment-method enrichment fetch.
///
/// Constructed once at startup and injected into handlers via `web::Data`;
/// tests substitute a fake by pointing `api_base` at a local mock server.
#[derive(Clone)]
pub struct StripeService {
    http: reqwest::Client,
    secret_key: String,
    webhook_secret: String,
    api_base: String,
}

impl StripeService {
    pub fn new(secret_key: String, webhook_secret: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            secret_key,
            webhook_secret,
            api_base: STRIPE_API_BASE.to_string(),
        }
    }

    /// Override the API base URL (tests only use this with mockito).
    pub fn with_api_base(mut self, api_base: &str) -> Self {
        self.api_base = api_base.trim_end_matches('/').to_string();
        self
    }

    /// Verify a webhook signature header against the raw request body.
    ///
    /// The header carries `t=<timestamp>,v1=<hex hmac>[,v1=...]`; the
    /// signature is HMAC-SHA256 over `"{timestamp}.{raw body}"`, keyed by the
    /// webhook signing secret. Verification must run over the exact bytes
    /// received; re-serializing the JSON first would invalidate it.
    pub fn verify_signature(
        &self,
        payload: &[u8],
        signature_header: &str,
    ) -> Result<(), StripeServiceError> {
        if self.webhook_secret.is_empty() {
            return Err(StripeServiceError::Configuration(
                "Webhook secret is not configured".to_string(),
            ));
        }

        let mut timestamp = "";
        let mut signatures = Vec::new();

        for element in signature_header.split(',') {
            let element = element.trim();
            if let Some(t) = element.strip_prefix("t=") {
                timestamp = t;
            } else if let Some(s) = element.strip_prefix("v1=") {
                signatures.push(s);
            }
        }

        if timestamp.is_empty() || signatures.is_empty() {
            return Err(StripeServiceError::WebhookVerification(
                "Invalid signature format".to_string(),
            ));
        }

        let mut mac = HmacSha256::new_from_slice(self.webhook_secret.as_bytes())
            .map_err(|e| StripeServiceError::WebhookVerification(format!("HMAC error: {}", e)))?;

        mac.update(timestamp.as_bytes());
        mac.update(b".");
        mac.update(payload);
        let expected = hex::encode(mac.finalize().into_bytes());

        for signature in signatures {
            if expected.as_bytes().ct_eq(signature.as_bytes()).into() {
                return Ok(());
            }
        }

        Err(StripeServiceError::WebhookVerification(
            "Signature verification failed".to_string(),
        ))
    }

    /// Verify the signature and parse the payload into a typed event.
    pub fn construct_event(
        &self,
        payload: &[u8],
        signature_header: &str,
    ) -> Result<Event, StripeServiceError> {
        self.verify_signature(payload, signature_header)?;

        let event: Event = serde_json::from_slice(payload).map_err(|e| {
            StripeServiceError::WebhookVerification(format!("Failed to parse event: {}", e))
        })?;
        Ok(event)
    }

    /// Retrieve a payment method's details (type, card brand, last four).
    ///
    /// Used only for best-effort enrichment of a succeeded payment; callers
    /// treat any error here as "enrichment unavailable".
    pub async fn get_payment_method(
        &self,
        payment_method_id: &str,
    ) -> Result<PaymentMethod, StripeServiceError> {
        let url = format!("{}/v1/payment_methods/{}", self.api_base, payment_method_id);

        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.secret_key)
            .send()
            .await
            .map_err(|e| StripeServiceError::Api(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(StripeServiceError::Api(format!(
                "Payment method retrieve returned {}: {}",
                status, body
            )));
        }

        let payment_method = response
            .json::<PaymentMethod>()
            .await
            .map_err(|e| StripeServiceError::Api(format!("Invalid response body: {}", e)))?;

        info!("Retrieved payment method {}", payment_method.id);
        Ok(payment_method)
    }
}

/// Produce a valid `stripe-signature` header for a payload, the same way
/// Stripe computes one. Test helper shared by the handler tests.
#[cfg(test)]
pub fn sign_payload(secret: &str, timestamp: &str, payload: &[u8]) -> String {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).unwrap();
    mac.update(timestamp.as_bytes());
    mac.update(b".");
    mac.update(payload);
    format!(
        "t={},v1={}",
        timestamp,
        hex::encode(mac.finalize().into_bytes())
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service_with_secret(secret: &str) -> StripeService {
        StripeService::new("sk_test_123".to_string(), secret.to_string())
    }

    fn sign(secret: &str, timestamp: &str, payload: &[u8]) -> String {
        sign_payload(secret, timestamp, payload)
    }

    #[test]
    fn test_valid_signature_passes() {
        let service = service_with_secret("whsec_abc");
        let body = br#"{"id":"evt_1","type":"payment_intent.succeeded"}"#;
        let header = sign("whsec_abc", "1700000000", body);

        assert!(service.verify_signature(body, &header).is_ok());
    }

    #[test]
    fn test_wrong_secret_fails() {
        let service = service_with_secret("whsec_abc");
        let body = br#"{"id":"evt_1"}"#;
        let header = sign("whsec_other", "1700000000", body);

        let err = service.verify_signature(body, &header).unwrap_err();
        assert!(matches!(err, StripeServiceError::WebhookVerification(_)));
    }

    #[test]
    fn test_signature_over_different_body_fails() {
        let service = service_with_secret("whsec_abc");
        let header = sign("whsec_abc", "1700000000", br#"{"id":"evt_1"}"#);

        let err = service
            .verify_signature(br#"{"id":"evt_2"}"#, &header)
            .unwrap_err();
        assert!(matches!(err, StripeServiceError::WebhookVerification(_)));
    }

    #[test]
    fn test_header_missing_timestamp_fails() {
        let service = service_with_secret("whsec_abc");
        let err = service
            .verify_signature(b"{}", "v1=deadbeef")
            .unwrap_err();
        assert!(matches!(err, StripeServiceError::WebhookVerification(_)));
    }

    #[test]
    fn test_header_missing_signature_fails() {
        let service = service_with_secret("whsec_abc");
        let err = service
            .verify_signature(b"{}", "t=1700000000")
            .unwrap_err();
        assert!(matches!(err, StripeServiceError::WebhookVerification(_)));
    }

    #[test]
    fn test_empty_secret_is_configuration_error() {
        let service = service_with_secret("");
        let err = service
            .verify_signature(b"{}", "t=1,v1=deadbeef")
            .unwrap_err();
        assert!(matches!(err, StripeServiceError::Configuration(_)));
    }

    #[test]
    fn test_second_v1_signature_is_accepted() {
        // Stripe sends multiple v1 entries during secret rollover.
        let service = service_with_secret("whsec_new");
        let body = br#"{"id":"evt_1"}"#;
        let valid = sign("whsec_new", "1700000000", body);
        let valid_sig = valid.split("v1=").nth(1).unwrap();
        let header = format!("t=1700000000,v1=deadbeef,v1={}", valid_sig);

        assert!(service.verify_signature(body, &header).is_ok());
    }

    #[test]
    fn test_construct_event_parses_verified_payload() {
        let service = service_with_secret("whsec_abc");
        let body = serde_json::json!({
            "id": "evt_1",
            "type": "checkout.session.completed",
            "created": 1_700_000_000,
            "data": { "object": { "id": "cs_1", "object": "checkout.session" } }
        })
        .to_string();
        let header = sign("whsec_abc", "1700000000", body.as_bytes());

        let event = service.construct_event(body.as_bytes(), &header).unwrap();
        assert_eq!(event.id, "evt_1");
        assert_eq!(event.type_, "checkout.session.completed");
    }

    #[test]
    fn test_construct_event_rejects_malformed_json() {
        let service = service_with_secret("whsec_abc");
        let body = b"not json";
        let header = sign("whsec_abc", "1700000000", body);

        let err = service.construct_event(body, &header).unwrap_err();
        assert!(matches!(err, StripeServiceError::WebhookVerification(_)));
    }

    #[tokio::test]
    async fn test_get_payment_method_fetches_card_details() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/v1/payment_methods/pm_123")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                serde_json::json!({
                    "id": "pm_123",
                    "object": "payment_method",
                    "type": "card",
                    "card": {
                        "brand": "visa",
                        "exp_month": 4,
                        "exp_year": 2030,
                        "last4": "4242"
                    }
                })
                .to_string(),
            )
            .create_async()
            .await;

        let service = service_with_secret("whsec_abc").with_api_base(&server.url());
        let pm = service.get_payment_method("pm_123").await.unwrap();

        mock.assert_async().await;
        assert_eq!(pm.type_, "card");
        assert_eq!(pm.card.unwrap().last4, "4242");
    }

    #[tokio::test]
    async fn test_get_payment_method_non_2xx_is_api_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/v1/payment_methods/pm_missing")
            .with_status(404)
            .with_body(r#"{"error":{"message":"No such payment_method"}}"#)
            .create_async()
            .await;

        let service = service_with_secret("whsec_abc").with_api_base(&server.url());
        let err = service.get_payment_method("pm_missing").await.unwrap_err();
        assert!(matches!(err, StripeServiceError::Api(_)));
    }
}
