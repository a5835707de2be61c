//! Customer models and tool arguments
//!
//! A customer is a vigilance dossier: the company under review plus its
//! activities, people, missions and documents, graded by the platform's
//! risk engine.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{
    check_date, check_page_bounds, check_uuid, double_option, person::AssociatedPerson, Validate,
};
use crate::error::Violations;

/// Lifecycle state of a vigilance dossier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CustomerState {
    Draft,
    InProgress,
    Valid,
    Ended,
    ToValidate,
}

impl CustomerState {
    pub fn as_str(&self) -> &'static str {
        match self {
            CustomerState::Draft => "draft",
            CustomerState::InProgress => "in_progress",
            CustomerState::Valid => "valid",
            CustomerState::Ended => "ended",
            CustomerState::ToValidate => "to_validate",
        }
    }
}

impl std::fmt::Display for CustomerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Risk breakdown along the four assessment axes
///
/// The platform always grades all four; a missing or extra axis means the
/// payload is malformed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RiskSummary {
    pub location: super::RiskLevel,
    pub activity: super::RiskLevel,
    pub mission: super::RiskLevel,
    pub customer: super::RiskLevel,
}

/// Declared business activity, graded by the risk engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Activity {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk_level: Option<super::RiskLevel>,
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

/// Postal address with the platform's location grade
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Address {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zip_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk_level: Option<super::RiskLevel>,
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

/// Engagement carried out for the customer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Mission {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk_level: Option<super::RiskLevel>,
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

/// Due-diligence step recorded on the dossier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Diligence {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub performed_on: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

/// Role a user holds on a dossier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AffectationRole {
    Supervisor,
    Contributor,
}

/// Assignment of a user to a dossier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Affectation {
    pub user_id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub firstname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lastname: Option<String>,
    pub role: AffectationRole,
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

/// Supporting document attached to the dossier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub doc_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issued_on: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_on: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_ids: Option<Vec<Uuid>>,
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

/// A vigilance dossier as returned by the platform
///
/// Fields the platform omits stay absent; fields it sends that we do not
/// model are carried through `extra` untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    pub id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    pub company_number: String,
    /// Internal file reference used by cabinets, distinct from `id`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legal_form: Option<String>,
    pub state: CustomerState,
    /// Overall grade derived from the four risk axes
    pub vigilance_level: super::RiskLevel,
    pub risk_summary: RiskSummary,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub turnover: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fiscal_year_end_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub firm_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activities: Option<Vec<Activity>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub addresses: Option<Vec<Address>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub persons: Option<Vec<AssociatedPerson>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub missions: Option<Vec<Mission>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diligences: Option<Vec<Diligence>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub affectations: Option<Vec<Affectation>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documents: Option<Vec<Document>>,
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

/// Compact roster line for the customer summary resource
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerSummary {
    pub id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    pub state: CustomerState,
    pub vigilance_level: super::RiskLevel,
    pub created_at: DateTime<Utc>,
}

impl From<&Customer> for CustomerSummary {
    fn from(customer: &Customer) -> Self {
        Self {
            id: customer.id,
            company_name: customer.company_name.clone(),
            code: customer.code.clone(),
            state: customer.state,
            vigilance_level: customer.vigilance_level,
            created_at: customer.created_at,
        }
    }
}

/// Risk breakdown endpoint payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskSummaryReport {
    pub customer_id: Uuid,
    pub vigilance_level: super::RiskLevel,
    pub risk_summary: RiskSummary,
}

/// Outcome of a bulk assignment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignmentResult {
    /// Dossiers the platform reports as updated
    pub customers: Vec<Uuid>,
}

fn default_true() -> bool {
    true
}

/// Arguments for `create_customer`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateCustomerArgs {
    pub company_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legal_form: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supervisor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contributors: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub firm_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fiscal_year_end_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub turnover: Option<f64>,
    /// Registry duplicate check is skipped unless the caller opts in
    #[serde(default = "default_true")]
    pub bypass_duplicates: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fetch_documents: Option<bool>,
}

impl Validate for CreateCustomerArgs {
    fn check(&self, violations: &mut Violations) {
        if self.company_number.trim().is_empty() {
            violations.push("company_number", "must not be empty");
        }
        if let Some(supervisor) = &self.supervisor {
            check_uuid("supervisor", supervisor, violations);
        }
        if let Some(contributors) = &self.contributors {
            for (i, contributor) in contributors.iter().enumerate() {
                check_uuid(&format!("contributors[{i}]"), contributor, violations);
            }
        }
        if let Some(firm_id) = &self.firm_id {
            check_uuid("firm_id", firm_id, violations);
        }
        if let Some(date) = &self.fiscal_year_end_date {
            check_date("fiscal_year_end_date", date, violations);
        }
        if let Some(turnover) = self.turnover {
            if !turnover.is_finite() || turnover < 0.0 {
                violations.push("turnover", "must be a non-negative number");
            }
        }
    }
}

/// Arguments for `update_customer`
///
/// The identifier routes the request; everything else is the PATCH body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateCustomerArgs {
    #[serde(skip_serializing)]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legal_form: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<CustomerState>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vigilance_level: Option<super::RiskLevel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fiscal_year_end_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub turnover: Option<f64>,
}

impl Validate for UpdateCustomerArgs {
    fn check(&self, violations: &mut Violations) {
        check_uuid("id", &self.id, violations);
        if let Some(date) = &self.fiscal_year_end_date {
            check_date("fiscal_year_end_date", date, violations);
        }
        if let Some(turnover) = self.turnover {
            if !turnover.is_finite() || turnover < 0.0 {
                violations.push("turnover", "must be a non-negative number");
            }
        }
    }
}

/// Arguments for `search_customers`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SearchCustomersArgs {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing)]
    pub page: Option<u32>,
    #[serde(default, skip_serializing)]
    pub per_page: Option<u32>,
}

impl SearchCustomersArgs {
    pub fn query(&self) -> Vec<(String, String)> {
        super::page_query(self.page, self.per_page)
    }
}

impl Validate for SearchCustomersArgs {
    fn check(&self, violations: &mut Violations) {
        let no_criterion = self.company_number.as_deref().map_or(true, str::is_empty)
            && self.company_name.as_deref().map_or(true, str::is_empty)
            && self.code.as_deref().map_or(true, str::is_empty);
        if no_criterion {
            violations.push(
                "arguments",
                "at least one of company_number, company_name or code is required",
            );
        }
        check_page_bounds(self.page, self.per_page, violations);
    }
}

/// Arguments for `assign_customers`
///
/// Assignment fields distinguish three intents: an absent key leaves the
/// current assignment untouched, an explicit `null` (or empty contributor
/// list) clears it, and a value replaces it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AssignCustomersArgs {
    pub customers: Vec<String>,
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub supervisor: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contributors: Option<Vec<String>>,
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub firm_id: Option<Option<String>>,
}

impl Validate for AssignCustomersArgs {
    fn check(&self, violations: &mut Violations) {
        if self.customers.is_empty() {
            violations.push("customers", "must contain at least one customer id");
        }
        for (i, id) in self.customers.iter().enumerate() {
            check_uuid(&format!("customers[{i}]"), id, violations);
        }
        if let Some(Some(supervisor)) = &self.supervisor {
            check_uuid("supervisor", supervisor, violations);
        }
        if let Some(contributors) = &self.contributors {
            for (i, contributor) in contributors.iter().enumerate() {
                check_uuid(&format!("contributors[{i}]"), contributor, violations);
            }
        }
        if let Some(Some(firm_id)) = &self.firm_id {
            check_uuid("firm_id", firm_id, violations);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::parse_args;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    const CUSTOMER_ID: &str = "7b1e9b5e-4d3a-4f21-9c2e-6f5a2d8b1c44";
    const USER_ID: &str = "f3d2a6c1-8b4e-4a7d-b1c9-2e5f7a8d9b10";

    #[test]
    fn unmodeled_customer_fields_survive_a_round_trip() {
        let payload = json!({
            "id": CUSTOMER_ID,
            "company_number": "842561907",
            "state": "in_progress",
            "vigilance_level": "high",
            "risk_summary": {
                "location": "low",
                "activity": "high",
                "mission": "medium",
                "customer": "high"
            },
            "created_at": "2024-03-11T09:30:00Z",
            "internal_score": 0.87,
            "labels": ["priority"]
        });

        let customer: Customer = serde_json::from_value(payload.clone()).unwrap();
        assert_eq!(customer.extra.len(), 2);

        let back = serde_json::to_value(&customer).unwrap();
        assert_eq!(back, payload);
    }

    #[test]
    fn risk_summary_requires_exactly_four_axes() {
        let missing_axis = json!({"location": "low", "activity": "low", "mission": "low"});
        assert!(serde_json::from_value::<RiskSummary>(missing_axis).is_err());

        let extra_axis = json!({
            "location": "low", "activity": "low", "mission": "low",
            "customer": "low", "weather": "high"
        });
        assert!(serde_json::from_value::<RiskSummary>(extra_axis).is_err());
    }

    #[test]
    fn create_args_default_the_duplicate_bypass() {
        let args: CreateCustomerArgs =
            parse_args(json!({"company_number": "842561907"})).unwrap();
        assert!(args.bypass_duplicates);

        let body = serde_json::to_value(&args).unwrap();
        assert_eq!(body, json!({"company_number": "842561907", "bypass_duplicates": true}));
    }

    #[test]
    fn create_args_collect_every_violation() {
        let err = parse_args::<CreateCustomerArgs>(json!({
            "company_number": "  ",
            "supervisor": "nope",
            "fiscal_year_end_date": "31/12/2024",
            "turnover": -5.0
        }))
        .unwrap_err();
        let violations = err.violations().unwrap();
        assert_eq!(violations.len(), 4);
    }

    #[test]
    fn update_body_never_contains_the_id() {
        let args: UpdateCustomerArgs = parse_args(json!({
            "id": CUSTOMER_ID,
            "state": "valid",
            "vigilance_level": "reinforced"
        }))
        .unwrap();

        let body = serde_json::to_value(&args).unwrap();
        assert_eq!(body, json!({"state": "valid", "vigilance_level": "enhanced"}));
    }

    #[test]
    fn search_requires_a_criterion() {
        let err = parse_args::<SearchCustomersArgs>(json!({"page": 1})).unwrap_err();
        assert_eq!(err.code(), -32602);

        let args: SearchCustomersArgs =
            parse_args(json!({"company_name": "Acme", "per_page": 10})).unwrap();
        let body = serde_json::to_value(&args).unwrap();
        assert_eq!(body, json!({"company_name": "Acme"}));
        assert_eq!(args.query(), vec![("per_page".to_string(), "10".to_string())]);
    }

    #[test]
    fn assignment_body_distinguishes_unchanged_from_cleared() {
        let untouched: AssignCustomersArgs =
            parse_args(json!({"customers": [CUSTOMER_ID]})).unwrap();
        let body = serde_json::to_value(&untouched).unwrap();
        assert_eq!(body, json!({"customers": [CUSTOMER_ID]}));

        let cleared: AssignCustomersArgs = parse_args(json!({
            "customers": [CUSTOMER_ID],
            "supervisor": null,
            "contributors": []
        }))
        .unwrap();
        let body = serde_json::to_value(&cleared).unwrap();
        assert_eq!(
            body,
            json!({"customers": [CUSTOMER_ID], "supervisor": null, "contributors": []})
        );

        let replaced: AssignCustomersArgs = parse_args(json!({
            "customers": [CUSTOMER_ID],
            "supervisor": USER_ID
        }))
        .unwrap();
        let body = serde_json::to_value(&replaced).unwrap();
        assert_eq!(body, json!({"customers": [CUSTOMER_ID], "supervisor": USER_ID}));
    }

    #[test]
    fn assignment_violations_carry_item_paths() {
        let err = parse_args::<AssignCustomersArgs>(json!({
            "customers": [CUSTOMER_ID, "bad-id"],
            "supervisor": "also-bad"
        }))
        .unwrap_err();
        let violations = err.violations().unwrap();
        let paths: Vec<&str> = violations.iter().map(|v| v.path.as_str()).collect();
        assert_eq!(paths, vec!["customers[1]", "supervisor"]);
    }

    #[test]
    fn empty_customer_list_is_rejected_before_any_call() {
        let err = parse_args::<AssignCustomersArgs>(json!({"customers": []})).unwrap_err();
        assert_eq!(err.code(), -32602);
    }
}
