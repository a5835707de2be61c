//! Natural-person models
//!
//! People appear twice in the platform: embedded in a dossier with their
//! role flags, and standalone with the list of dossiers they touch.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Address;

/// Country reference graded by the risk engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountryRisk {
    /// ISO 3166-1 alpha-2 code
    pub code: String,
    pub risk_level: super::RiskLevel,
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

/// Person embedded in a dossier, with their role on that dossier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssociatedPerson {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    pub firstname: String,
    pub lastname: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth_city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth_country: Option<CountryRisk>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nationality: Option<CountryRisk>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub addresses: Option<Vec<Address>>,
    /// Defaults to false when the platform omits the flag
    #[serde(default)]
    pub acting_on_behalf: bool,
    #[serde(default)]
    pub beneficial_owner: bool,
    #[serde(default)]
    pub legal_representative: bool,
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

/// Dossier reference seen from a person's side
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkedCustomer {
    pub id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(default)]
    pub acting_on_behalf: bool,
    #[serde(default)]
    pub beneficial_owner: bool,
    #[serde(default)]
    pub legal_representative: bool,
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

/// Standalone person record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Person {
    pub id: Uuid,
    pub firstname: String,
    pub lastname: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth_city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth_country: Option<CountryRisk>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nationality: Option<CountryRisk>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub addresses: Option<Vec<Address>>,
    /// Politically exposed person flag from the screening engine
    #[serde(default)]
    pub politically_exposed: bool,
    #[serde(default)]
    pub integrity_doubts: bool,
    #[serde(default)]
    pub assets_frozen: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customers: Option<Vec<LinkedCustomer>>,
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn screening_flags_default_to_false() {
        let person: Person = serde_json::from_value(json!({
            "id": "a7c3f1d9-2e5b-4c8a-9d1f-3b6e8a0c2d55",
            "firstname": "Claire",
            "lastname": "Moreau"
        }))
        .unwrap();
        assert!(!person.politically_exposed);
        assert!(!person.integrity_doubts);
        assert!(!person.assets_frozen);
        assert!(person.customers.is_none());
    }

    #[test]
    fn nationality_carries_its_own_grade() {
        let person: Person = serde_json::from_value(json!({
            "id": "a7c3f1d9-2e5b-4c8a-9d1f-3b6e8a0c2d55",
            "firstname": "Claire",
            "lastname": "Moreau",
            "nationality": {"code": "IR", "risk_level": "reinforced"},
            "politically_exposed": true
        }))
        .unwrap();
        let nationality = person.nationality.unwrap();
        assert_eq!(nationality.code, "IR");
        assert_eq!(nationality.risk_level, crate::schema::RiskLevel::Enhanced);
    }

    #[test]
    fn person_addresses_use_the_graded_shape() {
        let person: Person = serde_json::from_value(json!({
            "id": "a7c3f1d9-2e5b-4c8a-9d1f-3b6e8a0c2d55",
            "firstname": "Claire",
            "lastname": "Moreau",
            "addresses": [
                {"city": "Nantes", "country": "FR", "risk_level": "low"}
            ]
        }))
        .unwrap();
        let addresses = person.addresses.unwrap();
        assert_eq!(addresses[0].city.as_deref(), Some("Nantes"));
        assert_eq!(
            addresses[0].risk_level,
            Some(crate::schema::RiskLevel::Low)
        );
    }
}
