use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct PaymentMethod {
    pub id: String,
    pub object: String,
    // Kept as a string rather than an enum: Stripe adds payment-method types
    // over time and an unknown type must not fail enrichment.
    #[serde(rename = "type")]
    pub type_: String,
    pub card: Option<PaymentMethodCard>,
    pub customer: Option<String>,
    pub metadata: Option<HashMap<String, String>>,
    #[serde(default)]
    pub livemode: bool,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct PaymentMethodCard {
    pub brand: String,
    pub country: Option<String>,
    pub exp_month: i64,
    pub exp_year: i64,
    pub funding: Option<String>,
    pub last4: String,
}
