use crate::commission::CommissionConfig;
use crate::types::{
    ApiOutcome, InsuranceApplication, InsurancePlan, LoginRequest, LoginResponse, UserProfile,
};
use async_trait::async_trait;
use thiserror::Error;

/// Transport-level failure talking to the backend
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The request never produced a response
    #[error("Network error: {0}")]
    Network(String),

    /// The backend refused the credentials (HTTP 401)
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Any other non-success status
    #[error("Request rejected ({status:?}): {message}")]
    Rejected {
        status: Option<u16>,
        message: String,
    },

    /// The response body did not have the expected shape
    #[error("Unexpected response: {0}")]
    Decode(String),

    /// The client could not be built
    #[error("Client configuration error: {0}")]
    Configuration(String),
}

/// Backend operations the portal views depend on
///
/// 404 responses surface as [`ApiOutcome::NotFound`], `success: false`
/// bodies as [`ApiOutcome::Failure`]; only transport problems are `Err`.
#[async_trait(?Send)]
pub trait PortalApi {
    async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ApiError>;

    async fn current_user(&self) -> Result<ApiOutcome<UserProfile>, ApiError>;

    async fn insurance_applications(
        &self,
    ) -> Result<ApiOutcome<Vec<InsuranceApplication>>, ApiError>;

    async fn insurance_plans(&self) -> Result<ApiOutcome<Vec<InsurancePlan>>, ApiError>;

    async fn delete_insurance_plan(&self, plan_id: &str) -> Result<ApiOutcome<()>, ApiError>;

    async fn commission_rules(&self) -> Result<ApiOutcome<CommissionConfig>, ApiError>;

    async fn create_commission_rules(
        &self,
        config: &CommissionConfig,
    ) -> Result<ApiOutcome<()>, ApiError>;

    async fn update_commission_rules(
        &self,
        config: &CommissionConfig,
    ) -> Result<ApiOutcome<()>, ApiError>;
}
