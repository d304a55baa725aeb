use super::{ViewError, ViewState, settle};
use crate::aggregate::{self, ListFilter, PlanRow};
use crate::api::PortalApi;
use crate::clock::Clock;
use crate::session::SessionStore;
use crate::storage::KeyValueStorage;
use crate::types::{InsuranceApplication, InsurancePlan};
use tracing::{debug, info};

/// "My insurance plans" page
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InsuranceListController {
    pub state: ViewState,
    plans: Vec<InsurancePlan>,
    applications: Vec<InsuranceApplication>,
}

impl InsuranceListController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn plans(&self) -> &[InsurancePlan] {
        &self.plans
    }

    pub fn applications(&self) -> &[InsuranceApplication] {
        &self.applications
    }

    /// Fetch plans and the applications used for per-plan counts
    pub async fn load<A, S, C>(&mut self, api: &A, session: &SessionStore<S, C>)
    where
        A: PortalApi + ?Sized,
        S: KeyValueStorage,
        C: Clock,
    {
        self.state.begin();
        let result = fetch(api, session).await;

        match self.state.finish(result) {
            Some((plans, applications)) => {
                debug!(
                    plans = plans.len(),
                    applications = applications.len(),
                    "Loaded insurance plans"
                );
                self.plans = plans;
                self.applications = applications;
            }
            None => {
                self.plans.clear();
                self.applications.clear();
            }
        }
    }

    pub fn rows(&self, filter: &ListFilter) -> Vec<PlanRow<'_>> {
        aggregate::filter_plans(&self.plans, &self.applications, filter)
    }

    pub fn policy_types(&self) -> Vec<String> {
        aggregate::distinct_policy_types(&self.plans)
    }

    /// Delete a plan; the local list changes only once the backend agrees
    pub async fn delete_plan<A, S, C>(
        &mut self,
        api: &A,
        session: &SessionStore<S, C>,
        plan_id: &str,
    ) -> bool
    where
        A: PortalApi + ?Sized,
        S: KeyValueStorage,
        C: Clock,
    {
        self.state.begin();
        let result = settle(session, api.delete_insurance_plan(plan_id).await)
            .and_then(|deleted| deleted.ok_or_else(|| ViewError::rejected(None)));

        if self.state.finish(result).is_none() {
            return false;
        }

        info!(plan_id, "Insurance plan deleted");
        self.plans.retain(|plan| plan.id != plan_id);
        true
    }
}

async fn fetch<A, S, C>(
    api: &A,
    session: &SessionStore<S, C>,
) -> Result<(Vec<InsurancePlan>, Vec<InsuranceApplication>), ViewError>
where
    A: PortalApi + ?Sized,
    S: KeyValueStorage,
    C: Clock,
{
    let plans = settle(session, api.insurance_plans().await)?.unwrap_or_default();
    let applications = settle(session, api.insurance_applications().await)?.unwrap_or_default();
    Ok((plans, applications))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiError;
    use crate::api::mock::MockPortalApi;
    use crate::storage::MemoryStorage;
    use crate::types::{ApiOutcome, UserRecord};
    use serde_json::json;

    fn session() -> SessionStore<MemoryStorage> {
        SessionStore::new(MemoryStorage::new())
    }

    fn plans() -> Vec<InsurancePlan> {
        serde_json::from_value(json!([
            { "_id": "p1", "planName": "Health Plus", "policyType": "Health", "status": "active" },
            { "_id": "p2", "planName": "Motor Shield", "policyType": "Motor", "status": "active" }
        ]))
        .unwrap()
    }

    fn applications() -> Vec<InsuranceApplication> {
        serde_json::from_value(json!([
            { "_id": "a1", "planId": "p1", "applicantName": "Asha Rao" },
            { "_id": "a2", "planId": "p1", "applicantName": "Ben Ortiz" }
        ]))
        .unwrap()
    }

    fn loaded_api() -> MockPortalApi {
        let mut api = MockPortalApi::new();
        api.expect_insurance_plans()
            .returning(|| Ok(ApiOutcome::Success(plans())));
        api.expect_insurance_applications()
            .returning(|| Ok(ApiOutcome::Success(applications())));
        api
    }

    #[tokio::test]
    async fn load_counts_applications_per_plan() {
        let api = loaded_api();
        let mut controller = InsuranceListController::new();
        controller.load(&api, &session()).await;

        assert!(!controller.state.loading);
        let rows = controller.rows(&ListFilter::default());
        let counts: Vec<(&str, usize)> = rows
            .iter()
            .map(|row| (row.plan.id.as_str(), row.application_count))
            .collect();
        assert_eq!(counts, [("p1", 2), ("p2", 0)]);
        assert_eq!(controller.policy_types(), ["Health", "Motor"]);

        let rows = controller.rows(&ListFilter::search("motor"));
        assert_eq!(rows.len(), 1);
    }

    #[tokio::test]
    async fn missing_applications_count_as_none() {
        let mut api = MockPortalApi::new();
        api.expect_insurance_plans()
            .returning(|| Ok(ApiOutcome::Success(plans())));
        api.expect_insurance_applications()
            .returning(|| Ok(ApiOutcome::NotFound));
        let mut controller = InsuranceListController::new();
        controller.load(&api, &session()).await;

        assert!(controller.state.error.is_none());
        assert!(
            controller
                .rows(&ListFilter::default())
                .iter()
                .all(|row| row.application_count == 0)
        );
    }

    #[tokio::test]
    async fn expired_token_clears_session_and_lists() {
        let mut api = MockPortalApi::new();
        api.expect_insurance_plans()
            .returning(|| Err(ApiError::Unauthorized("jwt expired".into())));
        let session = session();
        session.save("tok", &UserRecord::default());
        let mut controller = InsuranceListController::new();

        controller.load(&api, &session).await;
        assert!(!controller.state.loading);
        assert_eq!(controller.state.error, Some(ViewError::SessionExpired));
        assert!(controller.plans().is_empty());
        assert!(!session.is_authenticated());
    }

    #[tokio::test]
    async fn delete_removes_plan_only_on_success() {
        let mut api = loaded_api();
        api.expect_delete_insurance_plan()
            .withf(|id| id == "p2")
            .times(1)
            .returning(|_| Ok(ApiOutcome::Success(())));
        api.expect_delete_insurance_plan()
            .withf(|id| id == "p1")
            .returning(|_| {
                Ok(ApiOutcome::Failure {
                    message: "Plan has open applications".into(),
                })
            });
        let session = session();
        let mut controller = InsuranceListController::new();
        controller.load(&api, &session).await;

        assert!(!controller.delete_plan(&api, &session, "p1").await);
        assert_eq!(controller.plans().len(), 2);
        assert_eq!(
            controller.state.error.as_ref().map(ToString::to_string),
            Some("Plan has open applications".to_string())
        );

        assert!(controller.delete_plan(&api, &session, "p2").await);
        assert!(controller.state.error.is_none());
        let ids: Vec<&str> = controller.plans().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["p1"]);
    }
}
