use serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct Event {
    pub id: String,
    #[serde(rename = "type")]
    pub type_: String,
    pub created: i64,
    pub data: serde_json::Value,
    #[serde(default)]
    pub livemode: bool,
    pub api_version: Option<String>,
}

impl Event {
    /// The event payload (`data.object`), or `Null` when absent.
    pub fn object(&self) -> serde_json::Value {
        self.data
            .get("object")
            .cloned()
            .unwrap_or(serde_json::Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_event_parses_type_and_object() {
        let payload = serde_json::json!({
            "id": "evt_123",
            "type": "payment_intent.succeeded",
            "created": 1_700_000_000,
            "livemode": false,
            "api_version": "2023-10-16",
            "data": { "object": { "id": "pi_123", "object": "payment_intent" } }
        });

        let event: Event = serde_json::from_value(payload).unwrap();
        assert_eq!(event.type_, "payment_intent.succeeded");
        assert_eq!(event.object()["id"], "pi_123");
    }

    #[test]
    fn test_event_object_missing_is_null() {
        let payload = serde_json::json!({
            "id": "evt_456",
            "type": "checkout.session.completed",
            "created": 1_700_000_000,
            "data": {}
        });

        let event: Event = serde_json::from_value(payload).unwrap();
        assert!(event.object().is_null());
    }
}
