//! Firm and organization-level models

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Address;

/// Accounting firm registered under the organization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Firm {
    pub id: Uuid,
    pub label: String,
    /// French company registration number
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub siren: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

/// Subscription attached to the organization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subscription {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_on: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ends_on: Option<NaiveDate>,
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

/// Organization-level quota counters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Structure {
    pub remaining_customers: i64,
    pub remaining_users: i64,
    pub remaining_validators: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subscription: Option<Subscription>,
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn structure_counters_are_mandatory() {
        let ok: Structure = serde_json::from_value(json!({
            "remaining_customers": 42,
            "remaining_users": 3,
            "remaining_validators": 1
        }))
        .unwrap();
        assert_eq!(ok.remaining_customers, 42);
        assert!(ok.subscription.is_none());

        let missing = json!({"remaining_customers": 42, "remaining_users": 3});
        assert!(serde_json::from_value::<Structure>(missing).is_err());
    }

    #[test]
    fn firm_address_reuses_the_graded_address_shape() {
        let firm: Firm = serde_json::from_value(json!({
            "id": "c2a8f4e6-1b3d-4c5a-8e7f-9a0b1c2d3e4f",
            "label": "Cabinet Durand",
            "siren": "842561907",
            "address": {"city": "Lyon", "country": "FR"}
        }))
        .unwrap();
        let address = firm.address.unwrap();
        assert_eq!(address.city.as_deref(), Some("Lyon"));
        assert!(address.risk_level.is_none());
    }
}
