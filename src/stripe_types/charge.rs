use serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct Charge {
    pub id: String,
    pub object: String,
    pub amount: i64,
    pub currency: String,
    pub customer: Option<String>,
    pub payment_intent: Option<String>,
    pub receipt_url: Option<String>,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct ChargeList {
    pub object: String,
    pub data: Vec<Charge>,
}
