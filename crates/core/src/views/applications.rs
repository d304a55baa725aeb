use super::{ViewError, ViewState, settle};
use crate::aggregate::{self, ApplicationRow, ListFilter};
use crate::api::PortalApi;
use crate::clock::Clock;
use crate::session::SessionStore;
use crate::storage::KeyValueStorage;
use crate::types::{InsuranceApplication, InsurancePlan};
use std::collections::BTreeMap;
use tracing::debug;

/// Applications received against the partner's plans
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InsuranceApplicationsController {
    pub state: ViewState,
    applications: Vec<InsuranceApplication>,
    plans: Vec<InsurancePlan>,
}

impl InsuranceApplicationsController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn applications(&self) -> &[InsuranceApplication] {
        &self.applications
    }

    pub async fn load<A, S, C>(&mut self, api: &A, session: &SessionStore<S, C>)
    where
        A: PortalApi + ?Sized,
        S: KeyValueStorage,
        C: Clock,
    {
        self.state.begin();
        let result = fetch(api, session).await;

        match self.state.finish(result) {
            Some((applications, plans)) => {
                debug!(
                    applications = applications.len(),
                    plans = plans.len(),
                    "Loaded insurance applications"
                );
                self.applications = applications;
                self.plans = plans;
            }
            None => {
                self.applications.clear();
                self.plans.clear();
            }
        }
    }

    pub fn rows(&self, filter: &ListFilter) -> Vec<ApplicationRow<'_>> {
        aggregate::filter_applications(
            aggregate::join_applications(&self.applications, &self.plans),
            filter,
        )
    }

    pub fn policy_types(&self) -> Vec<String> {
        aggregate::distinct_policy_types(&self.plans)
    }

    pub fn status_counts(&self) -> BTreeMap<String, usize> {
        aggregate::status_counts(&self.applications)
    }
}

async fn fetch<A, S, C>(
    api: &A,
    session: &SessionStore<S, C>,
) -> Result<(Vec<InsuranceApplication>, Vec<InsurancePlan>), ViewError>
where
    A: PortalApi + ?Sized,
    S: KeyValueStorage,
    C: Clock,
{
    let applications = settle(session, api.insurance_applications().await)?.unwrap_or_default();
    let plans = settle(session, api.insurance_plans().await)?.unwrap_or_default();
    Ok((applications, plans))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiError;
    use crate::api::mock::MockPortalApi;
    use crate::storage::MemoryStorage;
    use crate::types::ApiOutcome;
    use serde_json::json;

    fn session() -> SessionStore<MemoryStorage> {
        SessionStore::new(MemoryStorage::new())
    }

    fn api() -> MockPortalApi {
        let mut api = MockPortalApi::new();
        api.expect_insurance_applications().returning(|| {
            Ok(ApiOutcome::Success(
                serde_json::from_value(json!([
                    { "_id": "a1", "planId": "p1", "applicantName": "Asha Rao", "status": "pending" },
                    { "_id": "a2", "insurancePlanId": "p2", "applicantName": "Ben Ortiz", "status": "approved" },
                    { "_id": "a3", "planId": "p9", "applicantName": "Chen Li", "status": "Pending" }
                ]))
                .unwrap(),
            ))
        });
        api.expect_insurance_plans().returning(|| {
            Ok(ApiOutcome::Success(
                serde_json::from_value(json!([
                    { "_id": "p1", "planName": "Health Plus", "policyType": "Health" },
                    { "_id": "p2", "planName": "Motor Shield", "policyType": "Motor" }
                ]))
                .unwrap(),
            ))
        });
        api
    }

    #[tokio::test]
    async fn rows_join_and_filter() {
        let api = api();
        let mut controller = InsuranceApplicationsController::new();
        controller.load(&api, &session()).await;
        assert!(!controller.state.loading);

        let rows = controller.rows(&ListFilter::default());
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1].plan.map(|p| p.plan_name.as_str()), Some("Motor Shield"));
        assert!(rows[2].plan.is_none());

        let rows = controller.rows(&ListFilter::search("health"));
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].application.id, "a1");

        let rows = controller.rows(&ListFilter::default().with_status("pending"));
        assert_eq!(rows.len(), 2);
    }

    #[tokio::test]
    async fn status_counts_are_case_insensitive() {
        let api = api();
        let mut controller = InsuranceApplicationsController::new();
        controller.load(&api, &session()).await;

        let counts = controller.status_counts();
        assert_eq!(counts["pending"], 2);
        assert_eq!(counts["approved"], 1);
        assert_eq!(controller.policy_types(), ["Health", "Motor"]);
    }

    #[tokio::test]
    async fn failure_leaves_empty_page() {
        let mut api = MockPortalApi::new();
        api.expect_insurance_applications()
            .returning(|| Err(ApiError::Network("dns".into())));
        let mut controller = InsuranceApplicationsController::new();
        controller.load(&api, &session()).await;

        assert!(!controller.state.loading);
        assert_eq!(controller.state.error, Some(ViewError::NetworkFailure));
        assert!(controller.applications().is_empty());
        assert!(controller.status_counts().is_empty());
    }
}
