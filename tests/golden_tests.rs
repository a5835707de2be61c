//! Golden tests - fixture-based tests that lock expected behavior
//!
//! These tests pin the schema layer to real-looking platform payloads:
//! what parses, what is preserved through a round trip, and how legacy
//! risk tokens are normalized.
//!
//! Run with: cargo test --test golden_tests

use std::fs;

use serde_json::Value;

fn fixture(name: &str) -> String {
    let path = format!("{}/tests/fixtures/{}", env!("CARGO_MANIFEST_DIR"), name);
    fs::read_to_string(&path).unwrap_or_else(|e| panic!("failed to read {path}: {e}"))
}

// ============================================================================
// CUSTOMER DOSSIER GOLDEN TESTS
// ============================================================================

mod customer_golden {
    use super::*;
    use pretty_assertions::assert_eq;
    use vigilia::schema::{Customer, CustomerState, CustomerSummary, RiskLevel};

    #[test]
    fn full_dossier_round_trips_without_loss() {
        let raw = fixture("customer.json");
        let original: Value = serde_json::from_str(&raw).unwrap();

        let customer: Customer = serde_json::from_str(&raw).unwrap();
        let back = serde_json::to_value(&customer).unwrap();

        assert_eq!(back, original);
    }

    #[test]
    fn unmodeled_fields_land_in_extra() {
        let customer: Customer = serde_json::from_str(&fixture("customer.json")).unwrap();
        assert_eq!(
            customer.extra.get("beneficial_owners_verified"),
            Some(&Value::Bool(true))
        );
        assert!(customer.extra.contains_key("internal_score"));
    }

    #[test]
    fn unmodeled_fields_inside_nested_objects_are_kept() {
        let customer: Customer = serde_json::from_str(&fixture("customer.json")).unwrap();
        let back = serde_json::to_value(&customer).unwrap();

        assert_eq!(back["activities"][0]["main"], Value::Bool(true));
        assert_eq!(back["addresses"][0]["insee_code"], Value::String("69382".into()));
        assert_eq!(back["persons"][0]["share_percentage"], serde_json::json!(35.0));
        assert_eq!(
            back["persons"][0]["nationality"]["label"],
            Value::String("France".into())
        );
        assert_eq!(back["affectations"][0]["assigned_on"], Value::String("2024-03-12".into()));
        assert_eq!(back["documents"][0]["pages"], serde_json::json!(4));
    }

    #[test]
    fn nested_collections_are_typed() {
        let customer: Customer = serde_json::from_str(&fixture("customer.json")).unwrap();

        let persons = customer.persons.as_deref().unwrap();
        assert_eq!(persons[0].lastname, "Moreau");
        assert!(persons[0].beneficial_owner);

        let documents = customer.documents.as_deref().unwrap();
        assert_eq!(documents[0].doc_type.as_deref(), Some("kbis"));
        assert_eq!(documents[0].file_ids.as_ref().map(|f| f.len()), Some(1));

        let affectations = customer.affectations.as_deref().unwrap();
        assert_eq!(
            affectations[0].role,
            vigilia::schema::AffectationRole::Supervisor
        );
    }

    #[test]
    fn legacy_risk_tokens_are_normalized_once_parsed() {
        let customer: Customer =
            serde_json::from_str(&fixture("customer_legacy_levels.json")).unwrap();

        assert_eq!(customer.vigilance_level, RiskLevel::Enhanced);
        assert_eq!(customer.risk_summary.location, RiskLevel::Standard);
        assert_eq!(customer.risk_summary.activity, RiskLevel::Enhanced);
        assert_eq!(customer.risk_summary.mission, RiskLevel::NotEstablished);
        assert_eq!(customer.risk_summary.customer, RiskLevel::NotEstablished);

        let back = serde_json::to_value(&customer).unwrap();
        assert_eq!(back["vigilance_level"], Value::String("enhanced".into()));
        assert_eq!(
            back["risk_summary"],
            serde_json::json!({
                "location": "standard",
                "activity": "enhanced",
                "mission": "not_established",
                "customer": "not_established"
            })
        );
    }

    #[test]
    fn summary_projection_keeps_the_roster_fields() {
        let customer: Customer = serde_json::from_str(&fixture("customer.json")).unwrap();
        let summary = CustomerSummary::from(&customer);

        assert_eq!(summary.id, customer.id);
        assert_eq!(summary.state, CustomerState::InProgress);
        assert_eq!(summary.vigilance_level, RiskLevel::High);
        assert_eq!(summary.code.as_deref(), Some("NEX-042"));

        // serde_json maps iterate in key order
        let value = serde_json::to_value(&summary).unwrap();
        let keys: Vec<&str> = value.as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(
            keys,
            vec!["code", "company_name", "created_at", "id", "state", "vigilance_level"]
        );
    }
}

// ============================================================================
// LISTING GOLDEN TESTS
// ============================================================================

mod listing_golden {
    use super::*;
    use pretty_assertions::assert_eq;
    use vigilia::schema::{Customer, Paginated, Structure, User, UserRole};

    #[test]
    fn customer_page_parses_with_counters() {
        let page: Paginated<Customer> =
            serde_json::from_str(&fixture("customers_page.json")).unwrap();
        assert_eq!(page.data.len(), 3);
        assert_eq!(page.total, Some(3));
        assert_eq!(page.total_pages, Some(1));
        assert_eq!(page.data[1].company_name.as_deref(), Some("Atelier Roux"));
    }

    #[test]
    fn spaced_accountant_role_is_normalized() {
        let page: Paginated<User> = serde_json::from_str(&fixture("users_page.json")).unwrap();
        assert_eq!(page.data[0].role, UserRole::CertifiedAccountant);

        let back = serde_json::to_value(&page.data[0]).unwrap();
        assert_eq!(back["role"], Value::String("certified_accountant".into()));
        // Unmodeled key carried through
        assert!(back.get("last_login_at").is_some());
    }

    #[test]
    fn structure_counters_and_extras_parse() {
        let structure: Structure = serde_json::from_str(&fixture("structure.json")).unwrap();
        assert_eq!(structure.remaining_customers, 17);
        let subscription = structure.subscription.as_ref().unwrap();
        assert_eq!(subscription.plan.as_deref(), Some("cabinet"));
        assert_eq!(subscription.extra.get("seats"), Some(&serde_json::json!(5)));
        assert_eq!(structure.extra.get("trial"), Some(&Value::Bool(false)));
    }
}
