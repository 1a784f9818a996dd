use crate::stripe_types::ChargeList;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct PaymentIntent {
    pub id: String,
    pub object: String,
    pub amount: i64,
    pub currency: String,
    pub customer: Option<String>,
    pub description: Option<String>,
    pub metadata: Option<HashMap<String, String>>,
    pub status: Option<String>,
    pub payment_method: Option<String>,
    // The API version this flow targets embeds the charge list on the
    // intent; newer versions expose only `latest_charge`.
    pub charges: Option<ChargeList>,
}

impl PaymentIntent {
    /// Receipt URL of the first charge, when one is present.
    pub fn receipt_url(&self) -> Option<&str> {
        self.charges
            .as_ref()
            .and_then(|c| c.data.first())
            .and_then(|charge| charge.receipt_url.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_receipt_url_from_first_charge() {
        let intent: PaymentIntent = serde_json::from_value(serde_json::json!({
            "id": "pi_123",
            "object": "payment_intent",
            "amount": 14900,
            "currency": "usd",
            "payment_method": "pm_123",
            "charges": {
                "object": "list",
                "data": [
                    { "id": "ch_1", "object": "charge", "amount": 14900,
                      "currency": "usd", "receipt_url": "https://pay.stripe.com/receipts/r1" },
                    { "id": "ch_2", "object": "charge", "amount": 14900,
                      "currency": "usd", "receipt_url": "https://pay.stripe.com/receipts/r2" }
                ]
            }
        }))
        .unwrap();

        assert_eq!(
            intent.receipt_url(),
            Some("https://pay.stripe.com/receipts/r1")
        );
    }

    #[test]
    fn test_receipt_url_absent_when_no_charges() {
        let intent: PaymentIntent = serde_json::from_value(serde_json::json!({
            "id": "pi_456",
            "object": "payment_intent",
            "amount": 14900,
            "currency": "usd"
        }))
        .unwrap();

        assert_eq!(intent.receipt_url(), None);
    }
}
