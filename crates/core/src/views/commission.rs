use super::{ViewError, ViewState, settle};
use crate::api::PortalApi;
use crate::clock::Clock;
use crate::commission::CommissionConfig;
use crate::session::SessionStore;
use crate::storage::KeyValueStorage;
use tracing::{debug, info};

/// Commission rules page
#[derive(Debug, Clone, PartialEq)]
pub struct CommissionConfigController {
    pub state: ViewState,
    config: CommissionConfig,
    exists: bool,
}

impl Default for CommissionConfigController {
    fn default() -> Self {
        Self {
            state: ViewState::default(),
            config: CommissionConfig::blank(),
            exists: false,
        }
    }
}

impl CommissionConfigController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config(&self) -> &CommissionConfig {
        &self.config
    }

    /// Whether the backend already holds a configuration for this partner
    pub fn exists(&self) -> bool {
        self.exists
    }

    /// Fetch the stored rules; a partner without rules gets a blank form
    pub async fn load<A, S, C>(&mut self, api: &A, session: &SessionStore<S, C>)
    where
        A: PortalApi + ?Sized,
        S: KeyValueStorage,
        C: Clock,
    {
        self.state.begin();
        let result = settle(session, api.commission_rules().await);

        match self.state.finish(result) {
            Some(Some(config)) => {
                debug!(rules = config.rules.len(), "Loaded commission rules");
                self.config = config;
                self.exists = true;
            }
            Some(None) => {
                debug!("No commission rules configured yet");
                self.config = CommissionConfig::blank();
                self.exists = false;
            }
            None => {}
        }
    }

    /// Validate and submit `config`, creating or updating as appropriate
    pub async fn save<A, S, C>(
        &mut self,
        api: &A,
        session: &SessionStore<S, C>,
        config: CommissionConfig,
    ) -> bool
    where
        A: PortalApi + ?Sized,
        S: KeyValueStorage,
        C: Clock,
    {
        if let Err(err) = config.validate() {
            self.state.fail(err.into());
            return false;
        }

        self.state.begin();
        let result = if self.exists {
            api.update_commission_rules(&config).await
        } else {
            api.create_commission_rules(&config).await
        };
        let result = settle(session, result)
            .and_then(|saved| saved.ok_or_else(|| ViewError::rejected(None)));

        if self.state.finish(result).is_none() {
            return false;
        }

        info!(created = !self.exists, "Commission rules saved");
        self.config = config;
        self.exists = true;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiError;
    use crate::api::mock::MockPortalApi;
    use crate::commission::{CommissionRule, CommissionType, TransactionType};
    use crate::storage::MemoryStorage;
    use crate::types::ApiOutcome;

    fn session() -> SessionStore<MemoryStorage> {
        SessionStore::new(MemoryStorage::new())
    }

    fn insurance_rule(value: f64) -> CommissionConfig {
        let mut config = CommissionConfig::default();
        config.upsert(CommissionRule {
            transaction_type: TransactionType::Insurance,
            commission_type: CommissionType::Percentage,
            value,
            min_transaction_amount: None,
            max_commission: None,
            enabled: true,
        });
        config
    }

    #[tokio::test]
    async fn missing_rules_yield_blank_form() {
        let mut api = MockPortalApi::new();
        api.expect_commission_rules()
            .returning(|| Ok(ApiOutcome::NotFound));
        let mut controller = CommissionConfigController::new();

        controller.load(&api, &session()).await;
        assert!(!controller.exists());
        assert!(controller.state.error.is_none());
        assert!(!controller.state.loading);
        assert_eq!(controller.config(), &CommissionConfig::blank());
    }

    #[tokio::test]
    async fn first_save_creates_then_updates() {
        let mut api = MockPortalApi::new();
        api.expect_commission_rules()
            .returning(|| Ok(ApiOutcome::NotFound));
        api.expect_create_commission_rules()
            .times(1)
            .returning(|_| Ok(ApiOutcome::Success(())));
        api.expect_update_commission_rules()
            .withf(|config| config.rules[0].value == 9.0)
            .times(1)
            .returning(|_| Ok(ApiOutcome::Success(())));
        let session = session();
        let mut controller = CommissionConfigController::new();

        controller.load(&api, &session).await;
        assert!(controller.save(&api, &session, insurance_rule(7.5)).await);
        assert!(controller.exists());
        assert_eq!(controller.config(), &insurance_rule(7.5));

        assert!(controller.save(&api, &session, insurance_rule(9.0)).await);
        assert_eq!(controller.config(), &insurance_rule(9.0));
    }

    #[tokio::test]
    async fn invalid_rules_never_reach_backend() {
        let api = MockPortalApi::new();
        let mut controller = CommissionConfigController::new();

        assert!(!controller.save(&api, &session(), insurance_rule(150.0)).await);
        assert!(matches!(
            controller.state.error,
            Some(ViewError::Validation { .. })
        ));
        assert_eq!(controller.config(), &CommissionConfig::blank());
    }

    #[tokio::test]
    async fn load_failure_keeps_existing_state() {
        let mut api = MockPortalApi::new();
        api.expect_commission_rules()
            .returning(|| Err(ApiError::Network("timeout".into())));
        let mut controller = CommissionConfigController::new();

        controller.load(&api, &session()).await;
        assert!(!controller.state.loading);
        assert_eq!(controller.state.error, Some(ViewError::NetworkFailure));
        assert!(!controller.exists());
    }

    #[tokio::test]
    async fn rejected_save_reports_backend_message() {
        let mut api = MockPortalApi::new();
        api.expect_create_commission_rules().returning(|_| {
            Ok(ApiOutcome::Failure {
                message: "Rules are locked".into(),
            })
        });
        let mut controller = CommissionConfigController::new();

        assert!(!controller.save(&api, &session(), insurance_rule(5.0)).await);
        assert!(!controller.exists());
        assert_eq!(
            controller.state.error.map(|err| err.to_string()).as_deref(),
            Some("Rules are locked")
        );
    }
}
