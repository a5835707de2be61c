//! Cabinet user models and tool arguments

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{check_email, Validate};
use crate::error::Violations;

/// Role a user holds inside the cabinet
///
/// The wire token is `certified_accountant`; the historical spaced spelling
/// is accepted on input only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    #[serde(alias = "certified accountant")]
    CertifiedAccountant,
    Controller,
    Collaborator,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::CertifiedAccountant => "certified_accountant",
            UserRole::Controller => "controller",
            UserRole::Collaborator => "collaborator",
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Member of the cabinet on the vigilance platform
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    pub role: UserRole,
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

/// Arguments for `create_user`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateUserArgs {
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    pub role: UserRole,
}

impl Validate for CreateUserArgs {
    fn check(&self, violations: &mut Violations) {
        if self.firstname.trim().is_empty() {
            violations.push("firstname", "must not be empty");
        }
        if self.lastname.trim().is_empty() {
            violations.push("lastname", "must not be empty");
        }
        check_email("email", &self.email, violations);
    }
}
