use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct CheckoutSession {
    pub id: String,
    pub object: String,
    pub customer: Option<String>,
    pub customer_email: Option<String>,
    pub payment_intent: Option<String>,
    pub status: Option<String>,
    pub currency: Option<String>,
    pub amount_total: Option<i64>,
    pub metadata: Option<HashMap<String, String>>,
    pub payment_status: Option<String>,
}

impl CheckoutSession {
    /// The application-supplied form-submission id, if the web application
    /// set it when the session was created.
    pub fn form_submission_id(&self) -> Option<&str> {
        self.metadata
            .as_ref()
            .and_then(|m| m.get(crate::stripe_types::enums::METADATA_FORM_SUBMISSION_ID))
            .map(|s| s.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_submission_id_from_metadata() {
        let session: CheckoutSession = serde_json::from_value(serde_json::json!({
            "id": "cs_test_abc",
            "object": "checkout.session",
            "customer": "cus_123",
            "metadata": { "formSubmissionId": "5f8a1c44-9d3e-4a0b-8a3f-2f1f9a4f6b7c" }
        }))
        .unwrap();

        assert_eq!(
            session.form_submission_id(),
            Some("5f8a1c44-9d3e-4a0b-8a3f-2f1f9a4f6b7c")
        );
    }

    #[test]
    fn test_form_submission_id_absent() {
        let session: CheckoutSession = serde_json::from_value(serde_json::json!({
            "id": "cs_test_abc",
            "object": "checkout.session",
            "metadata": {}
        }))
        .unwrap();

        assert_eq!(session.form_submission_id(), None);
    }
}
