use super::{ViewError, ViewState};
use crate::api::{ApiError, PortalApi};
use crate::clock::Clock;
use crate::guard::LoginRoute;
use crate::session::SessionStore;
use crate::storage::KeyValueStorage;
use crate::types::{LoginRequest, LoginResponse};
use crate::validation::validators;
use tracing::{info, warn};

pub const LOGIN_FAILED_MESSAGE: &str = "Login failed. Please check your credentials.";

/// Login form state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginController {
    pub state: ViewState,
    route: Option<LoginRoute>,
}

impl LoginController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Route chosen by the last successful login
    pub fn route(&self) -> Option<LoginRoute> {
        self.route
    }

    /// Authenticate and persist the session
    ///
    /// Returns the post-login route on success. Blank credentials are refused
    /// without contacting the backend.
    pub async fn submit<A, S, C>(
        &mut self,
        api: &A,
        session: &SessionStore<S, C>,
        email: &str,
        password: &str,
    ) -> Option<LoginRoute>
    where
        A: PortalApi + ?Sized,
        S: KeyValueStorage,
        C: Clock,
    {
        self.route = None;

        if let Err(err) = validators::validate_required(email, "Email")
            .and_then(|()| validators::validate_required(password, "Password"))
        {
            self.state.fail(err.into());
            return None;
        }

        self.state.begin();
        let request = LoginRequest {
            email: email.trim().to_string(),
            password: password.to_string(),
        };
        let result = api.login(&request).await;
        let route = self.state.finish(accept(session, result))?;

        if route == LoginRoute::Ambiguous {
            warn!("Login succeeded but the account status is ambiguous");
            self.state.error = Some(ViewError::AmbiguousVerificationState);
        }
        self.route = Some(route);
        Some(route)
    }

    pub fn logout<S: KeyValueStorage, C: Clock>(&mut self, session: &SessionStore<S, C>) {
        session.clear();
        self.route = None;
        self.state = ViewState::default();
        info!("Logged out");
    }
}

fn accept<S: KeyValueStorage, C: Clock>(
    session: &SessionStore<S, C>,
    result: Result<LoginResponse, ApiError>,
) -> Result<LoginRoute, ViewError> {
    let response = match result {
        Ok(response) => response,
        Err(ApiError::Unauthorized(message) | ApiError::Rejected { message, .. }) => {
            return Err(login_failed(Some(message)));
        }
        Err(err) => return Err(err.into()),
    };

    match response {
        LoginResponse {
            success: true,
            token: Some(token),
            user: Some(user),
            ..
        } if !token.is_empty() => {
            session.save(&token, &user);
            let route = LoginRoute::for_user(&user);
            info!(route = ?route, "Login succeeded");
            Ok(route)
        }
        LoginResponse { message, .. } => Err(login_failed(message)),
    }
}

fn login_failed(message: Option<String>) -> ViewError {
    ViewError::BackendRejection {
        message: message
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| LOGIN_FAILED_MESSAGE.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::MockPortalApi;
    use crate::storage::MemoryStorage;
    use crate::types::UserRecord;
    use serde_json::json;

    fn approved_user() -> UserRecord {
        serde_json::from_value(json!({
            "_id": "u1",
            "email": "ops@acme.test",
            "emailVerify": true,
            "isVerified": true,
            "companyDetails": { "RegisteredCompanyName": "Acme" }
        }))
        .unwrap()
    }

    fn session() -> SessionStore<MemoryStorage> {
        SessionStore::new(MemoryStorage::new())
    }

    #[tokio::test]
    async fn blank_credentials_skip_the_backend() {
        let api = MockPortalApi::new();
        let session = session();
        let mut controller = LoginController::new();

        let route = controller.submit(&api, &session, "  ", "secret").await;
        assert_eq!(route, None);
        assert!(!controller.state.loading);
        assert_eq!(
            controller.state.error,
            Some(ViewError::Validation {
                message: "Email is required".into()
            })
        );
    }

    #[tokio::test]
    async fn successful_login_saves_session() {
        let mut api = MockPortalApi::new();
        api.expect_login()
            .withf(|request| request.email == "ops@acme.test" && request.password == "pw")
            .times(1)
            .returning(|_| {
                Ok(LoginResponse {
                    success: true,
                    message: None,
                    user: Some(approved_user()),
                    token: Some("tok-1".into()),
                })
            });
        let session = session();
        let mut controller = LoginController::new();

        let route = controller
            .submit(&api, &session, " ops@acme.test ", "pw")
            .await;
        assert_eq!(route, Some(LoginRoute::Granted));
        assert_eq!(controller.route(), Some(LoginRoute::Granted));
        assert!(controller.state.error.is_none());
        assert!(!controller.state.loading);
        assert_eq!(session.token().as_deref(), Some("tok-1"));
        assert_eq!(session.user(), Some(approved_user()));
        assert!(session.is_authenticated());
    }

    #[tokio::test]
    async fn ambiguous_account_shows_support_message() {
        let mut api = MockPortalApi::new();
        api.expect_login().returning(|_| {
            Ok(LoginResponse {
                success: true,
                message: None,
                user: Some(UserRecord::default()),
                token: Some("tok".into()),
            })
        });
        let session = session();
        let mut controller = LoginController::new();

        let route = controller.submit(&api, &session, "a@b.test", "pw").await;
        assert_eq!(route, Some(LoginRoute::Ambiguous));
        assert_eq!(
            controller.state.error,
            Some(ViewError::AmbiguousVerificationState)
        );
    }

    #[tokio::test]
    async fn rejected_login_uses_backend_message_or_fallback() {
        let mut api = MockPortalApi::new();
        let mut calls = 0;
        api.expect_login().times(2).returning(move |_| {
            calls += 1;
            if calls == 1 {
                Err(ApiError::Unauthorized("Invalid password".into()))
            } else {
                Ok(LoginResponse::default())
            }
        });
        let session = session();
        let mut controller = LoginController::new();

        assert_eq!(controller.submit(&api, &session, "a@b.test", "x").await, None);
        assert_eq!(
            controller.state.error.as_ref().map(ToString::to_string),
            Some("Invalid password".to_string())
        );

        assert_eq!(controller.submit(&api, &session, "a@b.test", "x").await, None);
        assert_eq!(
            controller.state.error.as_ref().map(ToString::to_string),
            Some(LOGIN_FAILED_MESSAGE.to_string())
        );
        assert!(!session.is_authenticated());
    }

    #[tokio::test]
    async fn network_failure_and_logout() {
        let mut api = MockPortalApi::new();
        api.expect_login()
            .returning(|_| Err(ApiError::Network("connection refused".into())));
        let session = session();
        session.save("old", &approved_user());
        let mut controller = LoginController::new();

        assert_eq!(controller.submit(&api, &session, "a@b.test", "x").await, None);
        assert_eq!(controller.state.error, Some(ViewError::NetworkFailure));
        assert!(!controller.state.loading);

        controller.logout(&session);
        assert!(session.token().is_none());
        assert!(controller.state.error.is_none());
    }
}
