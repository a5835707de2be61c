//! Schema and validation layer
//!
//! Typed models for everything that crosses the wire: tool arguments on the
//! way in, vigilance platform payloads on the way out. Arguments reject
//! unknown fields and collect every violation before failing; platform
//! payloads tolerate unknown fields and carry them through untouched.

mod customer;
mod firm;
mod person;
mod user;

pub use customer::*;
pub use firm::*;
pub use person::*;
pub use user::*;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{Result, VigiliaError, Violations};

/// Hyphenated 8-4-4-4-12 form only; bare hex is not accepted.
static UUID_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$")
        .unwrap()
});

static DATE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap());

/// Shape check only; deliverability is the platform's problem.
static EMAIL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

/// Highest page size the platform accepts
pub const MAX_PER_PAGE: u32 = 100;

/// Argument payloads that know their own constraints.
pub trait Validate {
    /// Record every violated constraint; an untouched accumulator means valid.
    fn check(&self, violations: &mut Violations);
}

/// Deserialize tool arguments and run their semantic checks.
///
/// Shape problems (wrong types, unknown fields, missing required fields) are
/// reported with serde's message; a well-shaped payload then has all of its
/// field-level violations collected into a single parameter error.
pub fn parse_args<T>(value: serde_json::Value) -> Result<T>
where
    T: DeserializeOwned + Validate,
{
    let args: T = serde_json::from_value(value)
        .map_err(|e| VigiliaError::Parameter(Violations::of("arguments", e.to_string())))?;
    let mut violations = Violations::new();
    args.check(&mut violations);
    violations.into_result()?;
    Ok(args)
}

pub fn check_uuid(path: &str, value: &str, violations: &mut Violations) {
    if !UUID_RE.is_match(value) {
        violations.push(path, "must be a UUID in 8-4-4-4-12 form");
    }
}

pub fn check_date(path: &str, value: &str, violations: &mut Violations) {
    if !DATE_RE.is_match(value)
        || chrono::NaiveDate::parse_from_str(value, "%Y-%m-%d").is_err()
    {
        violations.push(path, "must be a calendar date in YYYY-MM-DD form");
    }
}

pub fn check_email(path: &str, value: &str, violations: &mut Violations) {
    if !EMAIL_RE.is_match(value) {
        violations.push(path, "must be an email address");
    }
}

pub fn check_page_bounds(page: Option<u32>, per_page: Option<u32>, violations: &mut Violations) {
    if let Some(page) = page {
        if page < 1 {
            violations.push("page", "must be at least 1");
        }
    }
    if let Some(per_page) = per_page {
        if !(1..=MAX_PER_PAGE).contains(&per_page) {
            violations.push("per_page", "must be between 1 and 100");
        }
    }
}

/// Query fragment for paginated listings; omitted values stay omitted so the
/// platform applies its own defaults.
pub fn page_query(page: Option<u32>, per_page: Option<u32>) -> Vec<(String, String)> {
    let mut query = Vec::new();
    if let Some(page) = page {
        query.push(("page".to_string(), page.to_string()));
    }
    if let Some(per_page) = per_page {
        query.push(("per_page".to_string(), per_page.to_string()));
    }
    query
}

/// Field deserializer distinguishing an absent key from an explicit `null`.
///
/// Pair with `#[serde(default)]`: a missing key stays `None`, `null` becomes
/// `Some(None)`, a value becomes `Some(Some(v))`.
pub fn double_option<'de, T, D>(deserializer: D) -> std::result::Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

/// One page of a platform listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub per_page: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_pages: Option<u64>,
}

/// Arguments carrying a single entity identifier
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IdArgs {
    pub id: String,
}

impl Validate for IdArgs {
    fn check(&self, violations: &mut Violations) {
        check_uuid("id", &self.id, violations);
    }
}

/// Arguments for tools that take no input; extra keys are still rejected.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EmptyArgs {}

impl Validate for EmptyArgs {
    fn check(&self, _violations: &mut Violations) {}
}

/// Plain paginated listing arguments
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ListArgs {
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub per_page: Option<u32>,
}

impl Validate for ListArgs {
    fn check(&self, violations: &mut Violations) {
        check_page_bounds(self.page, self.per_page, violations);
    }
}

impl ListArgs {
    pub fn query(&self) -> Vec<(String, String)> {
        page_query(self.page, self.per_page)
    }
}

/// Risk grade used across the platform
///
/// The platform emits a handful of historical spellings; all of them fold
/// into this canonical set at deserialization time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Standard,
    Enhanced,
    NotEstablished,
}

/// Unrecognized risk grade token
#[derive(Debug, thiserror::Error)]
#[error("unknown risk level {0:?}")]
pub struct RiskLevelError(pub String);

impl RiskLevel {
    /// Fold a wire token into the canonical set.
    ///
    /// The synonym table is fixed; anything outside it is an error rather
    /// than a guess.
    pub fn parse(raw: &str) -> std::result::Result<Self, RiskLevelError> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(RiskLevel::Low),
            "medium" => Ok(RiskLevel::Medium),
            "high" => Ok(RiskLevel::High),
            "standard" | "normal" => Ok(RiskLevel::Standard),
            "enhanced" | "reinforced" | "strengthened" => Ok(RiskLevel::Enhanced),
            "not_established" | "not-established" | "not established" | "unknown" => {
                Ok(RiskLevel::NotEstablished)
            }
            _ => Err(RiskLevelError(raw.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
            RiskLevel::Standard => "standard",
            RiskLevel::Enhanced => "enhanced",
            RiskLevel::NotEstablished => "not_established",
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RiskLevel {
    type Err = RiskLevelError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        RiskLevel::parse(s)
    }
}

impl Serialize for RiskLevel {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for RiskLevel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        RiskLevel::parse(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn uuid_check_accepts_hyphenated_form_only() {
        let mut v = Violations::new();
        check_uuid("id", "0d4907fa-1d6c-4b57-a96c-1a0e0b6a7c11", &mut v);
        assert!(v.is_empty());

        check_uuid("id", "0d4907fa1d6c4b57a96c1a0e0b6a7c11", &mut v);
        check_uuid("id", "not-a-uuid", &mut v);
        assert_eq!(v.len(), 2);
    }

    #[test]
    fn date_check_rejects_impossible_dates() {
        let mut v = Violations::new();
        check_date("issued_on", "2024-02-29", &mut v);
        assert!(v.is_empty());

        check_date("issued_on", "2024-13-01", &mut v);
        check_date("issued_on", "2024-1-5", &mut v);
        check_date("issued_on", "15/01/2024", &mut v);
        assert_eq!(v.len(), 3);
    }

    #[test]
    fn email_check_is_a_shape_check() {
        let mut v = Violations::new();
        check_email("email", "analyst@cabinet.fr", &mut v);
        assert!(v.is_empty());

        check_email("email", "analyst", &mut v);
        check_email("email", "analyst@cabinet", &mut v);
        check_email("email", "a b@cabinet.fr", &mut v);
        assert_eq!(v.len(), 3);
    }

    #[test]
    fn page_bounds_reject_out_of_range_values() {
        let mut v = Violations::new();
        check_page_bounds(Some(1), Some(100), &mut v);
        assert!(v.is_empty());

        check_page_bounds(Some(0), Some(0), &mut v);
        assert_eq!(v.len(), 2);

        let mut v = Violations::new();
        check_page_bounds(None, Some(101), &mut v);
        assert_eq!(v.len(), 1);
    }

    #[test]
    fn risk_level_synonyms_fold_to_canonical_tokens() {
        assert_eq!(RiskLevel::parse("Normal").unwrap(), RiskLevel::Standard);
        assert_eq!(RiskLevel::parse("REINFORCED").unwrap(), RiskLevel::Enhanced);
        assert_eq!(
            RiskLevel::parse("strengthened").unwrap(),
            RiskLevel::Enhanced
        );
        assert_eq!(
            RiskLevel::parse("not established").unwrap(),
            RiskLevel::NotEstablished
        );
        assert_eq!(
            RiskLevel::parse("unknown").unwrap(),
            RiskLevel::NotEstablished
        );
        assert!(RiskLevel::parse("catastrophic").is_err());
    }

    #[test]
    fn risk_level_normalization_is_idempotent() {
        for raw in ["Low", "normal", "reinforced", "not established", "HIGH"] {
            let once = RiskLevel::parse(raw).unwrap();
            let twice = RiskLevel::parse(once.as_str()).unwrap();
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn unknown_argument_fields_are_rejected() {
        let err = parse_args::<IdArgs>(serde_json::json!({
            "id": "0d4907fa-1d6c-4b57-a96c-1a0e0b6a7c11",
            "verbose": true
        }))
        .unwrap_err();
        assert_eq!(err.code(), -32602);
    }

    #[test]
    fn empty_args_accept_only_an_empty_object() {
        assert!(parse_args::<EmptyArgs>(serde_json::json!({})).is_ok());
        assert!(parse_args::<EmptyArgs>(serde_json::json!({"page": 1})).is_err());
    }

    #[test]
    fn double_option_separates_missing_from_null() {
        #[derive(Deserialize)]
        struct Wrapper {
            #[serde(default, deserialize_with = "double_option")]
            supervisor: Option<Option<String>>,
        }

        let missing: Wrapper = serde_json::from_value(serde_json::json!({})).unwrap();
        assert_eq!(missing.supervisor, None);

        let null: Wrapper = serde_json::from_value(serde_json::json!({"supervisor": null})).unwrap();
        assert_eq!(null.supervisor, Some(None));

        let set: Wrapper = serde_json::from_value(serde_json::json!({"supervisor": "u-1"})).unwrap();
        assert_eq!(set.supervisor, Some(Some("u-1".to_string())));
    }

    #[test]
    fn paginated_envelope_tolerates_missing_counters() {
        let page: Paginated<serde_json::Value> =
            serde_json::from_value(serde_json::json!({"data": []})).unwrap();
        assert!(page.data.is_empty());
        assert_eq!(page.total, None);
    }
}
