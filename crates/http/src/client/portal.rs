//! [`PortalApi`] over HTTP

use super::endpoints;
use super::error::ClientError;
use super::typed::{AuthenticatedPortalClient, PublicPortalClient};
use async_trait::async_trait;
use portal_core::{
    ApiEnvelope, ApiError, ApiOutcome, CommissionConfig, InsuranceApplication, InsurancePlan,
    LoginRequest, LoginResponse, PortalApi, UserProfile,
};
use reqwest::Method;

impl PublicPortalClient {
    /// Exchange credentials for a session token
    pub async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ClientError> {
        let req = self.request(Method::POST, endpoints::LOGIN).json(request);
        self.execute(req).await
    }
}

#[async_trait(?Send)]
impl PortalApi for AuthenticatedPortalClient {
    async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ApiError> {
        Ok(self.to_public().login(request).await?)
    }

    async fn current_user(&self) -> Result<ApiOutcome<UserProfile>, ApiError> {
        // This route answers `{ data }` without a `success` flag
        let req = self.request(Method::GET, endpoints::CURRENT_USER);
        let envelope: ApiEnvelope<UserProfile> = self.execute(req).await?;
        Ok(match envelope.data {
            Some(profile) => ApiOutcome::Success(profile),
            None => ApiOutcome::failure(envelope.message),
        })
    }

    async fn insurance_applications(
        &self,
    ) -> Result<ApiOutcome<Vec<InsuranceApplication>>, ApiError> {
        let req = self.request(Method::GET, endpoints::INSURANCE_APPLICATIONS);
        Ok(self.fetch(req).await?)
    }

    async fn insurance_plans(&self) -> Result<ApiOutcome<Vec<InsurancePlan>>, ApiError> {
        let req = self.request(Method::GET, endpoints::INSURANCE_PLANS);
        Ok(self.fetch(req).await?)
    }

    async fn delete_insurance_plan(&self, plan_id: &str) -> Result<ApiOutcome<()>, ApiError> {
        let req = self.request(Method::DELETE, &endpoints::delete_insurance_plan(plan_id));
        Ok(self.acknowledge(req).await?)
    }

    async fn commission_rules(&self) -> Result<ApiOutcome<CommissionConfig>, ApiError> {
        let req = self.request(Method::GET, endpoints::COMMISSION_RULES);
        Ok(self.fetch(req).await?)
    }

    async fn create_commission_rules(
        &self,
        config: &CommissionConfig,
    ) -> Result<ApiOutcome<()>, ApiError> {
        let req = self
            .request(Method::POST, endpoints::CREATE_COMMISSION_RULES)
            .json(config);
        Ok(self.acknowledge(req).await?)
    }

    async fn update_commission_rules(
        &self,
        config: &CommissionConfig,
    ) -> Result<ApiOutcome<()>, ApiError> {
        let req = self
            .request(Method::PUT, endpoints::UPDATE_COMMISSION_RULES)
            .json(config);
        Ok(self.acknowledge(req).await?)
    }
}
