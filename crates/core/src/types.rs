//! Records exchanged with the partner backend

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

/// Fallback shown when the backend rejects a request without a message
pub const GENERIC_FAILURE_MESSAGE: &str = "Something went wrong. Please try again later.";

/// Cached snapshot of the partner account returned by `/login`
///
/// Only the fields the guard reads are typed; everything else is kept in
/// `extra` so the record survives a storage round-trip unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_verify: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_verified: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_details: Option<CompanyDetails>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_access: Option<Vec<String>>,

    #[serde(flatten)]
    pub extra: Map<String, JsonValue>,
}

impl UserRecord {
    /// Company details count as complete once the registered name is filled in
    pub fn has_company_details(&self) -> bool {
        self.company_details
            .as_ref()
            .and_then(|details| details.registered_company_name.as_deref())
            .is_some_and(|name| !name.trim().is_empty())
    }

    /// Capability strings granted to this partner
    pub fn capabilities(&self) -> &[String] {
        self.user_access.as_deref().unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompanyDetails {
    #[serde(
        rename = "RegisteredCompanyName",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub registered_company_name: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, JsonValue>,
}

/// Credentials posted to `/login`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Body returned by `/login`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub user: Option<UserRecord>,
    #[serde(default)]
    pub token: Option<String>,
}

/// Account summary from `/getUserById`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub user_id: String,

    #[serde(flatten)]
    pub extra: Map<String, JsonValue>,
}

/// An insurance product owned by the partner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsurancePlan {
    #[serde(rename = "_id")]
    pub id: String,

    #[serde(default)]
    pub plan_name: String,

    #[serde(default)]
    pub policy_type: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub premium: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coverage_amount: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, JsonValue>,
}

/// Reference from an application to its plan
///
/// The backend sends either the bare id or the populated plan document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PlanRef {
    Id(String),
    Populated {
        #[serde(rename = "_id")]
        id: String,
        #[serde(flatten)]
        rest: Map<String, JsonValue>,
    },
}

impl PlanRef {
    pub fn id(&self) -> &str {
        match self {
            Self::Id(id) | Self::Populated { id, .. } => id,
        }
    }
}

/// A customer's submission against an insurance plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsuranceApplication {
    #[serde(rename = "_id")]
    pub id: String,

    #[serde(
        rename = "planId",
        alias = "insurancePlanId",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub plan: Option<PlanRef>,

    #[serde(default)]
    pub applicant_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub applicant_email: Option<String>,

    #[serde(default = "default_application_status")]
    pub status: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, JsonValue>,
}

fn default_application_status() -> String {
    "pending".to_string()
}

impl InsuranceApplication {
    /// Id of the plan this application was filed against, if any
    pub fn plan_id(&self) -> Option<&str> {
        self.plan.as_ref().map(PlanRef::id)
    }
}

/// Standard `{ success, message?, data? }` response body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct ApiEnvelope<T> {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Option<T>,
}

impl<T> ApiEnvelope<T> {
    /// Convert a body that must carry `data`
    pub fn into_outcome(self) -> ApiOutcome<T> {
        match (self.success, self.data) {
            (true, Some(data)) => ApiOutcome::Success(data),
            (_, _) => ApiOutcome::failure(self.message),
        }
    }

    /// Convert a body where only `success` matters
    pub fn into_ack(self) -> ApiOutcome<()> {
        if self.success {
            ApiOutcome::Success(())
        } else {
            ApiOutcome::failure(self.message)
        }
    }
}

/// Result of a backend call once transport errors are ruled out
#[derive(Debug, Clone, PartialEq)]
pub enum ApiOutcome<T> {
    Success(T),
    NotFound,
    Failure { message: String },
}

impl<T> ApiOutcome<T> {
    /// Failure carrying the backend message, or the generic fallback
    pub fn failure(message: Option<String>) -> Self {
        let message = message
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| GENERIC_FAILURE_MESSAGE.to_string());
        Self::Failure { message }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ApiOutcome<U> {
        match self {
            Self::Success(value) => ApiOutcome::Success(f(value)),
            Self::NotFound => ApiOutcome::NotFound,
            Self::Failure { message } => ApiOutcome::Failure { message },
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}
