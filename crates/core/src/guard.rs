//! Access decisions derived from the stored session

use crate::clock::{Clock, SystemClock};
use crate::session::{RemainingTime, SessionStore};
use crate::storage::KeyValueStorage;
use crate::types::UserRecord;
use serde::{Deserialize, Serialize};

/// Where a freshly authenticated partner is sent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LoginRoute {
    RequireEmailVerification,
    RequireProfileCompletion,
    RequireAdminApproval,
    Granted,
    Ambiguous,
}

impl LoginRoute {
    /// Evaluate the post-login decision table for `user`
    pub fn for_user(user: &UserRecord) -> Self {
        if user.email_verify == Some(false) {
            return Self::RequireEmailVerification;
        }

        let has_company_details = user.has_company_details();

        match (user.email_verify, user.is_verified) {
            (Some(true), Some(false)) if !has_company_details => Self::RequireProfileCompletion,
            (Some(true), Some(false)) => Self::RequireAdminApproval,
            (Some(true), Some(true)) if !has_company_details => Self::RequireProfileCompletion,
            (Some(true), Some(true)) => Self::Granted,
            _ => Self::Ambiguous,
        }
    }

    /// Page the route leads to; `None` for the ambiguous state
    pub fn destination(self) -> Option<&'static str> {
        match self {
            Self::RequireEmailVerification => Some("/verify-email"),
            Self::RequireProfileCompletion => Some("/complete-profile"),
            Self::RequireAdminApproval => Some("/pending-approval"),
            Self::Granted => Some("/dashboard"),
            Self::Ambiguous => None,
        }
    }

    /// Message shown alongside the redirect
    pub fn message(self) -> &'static str {
        match self {
            Self::RequireEmailVerification => "Please verify your email address to continue.",
            Self::RequireProfileCompletion => "Please complete your company profile to continue.",
            Self::RequireAdminApproval => {
                "Your profile is under review. You will be notified once an administrator approves it."
            }
            Self::Granted => "Login successful.",
            Self::Ambiguous => {
                "We could not determine your account status. Please contact support for assistance."
            }
        }
    }
}

/// Headers attached to every backend call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthHeaders {
    pub content_type: &'static str,
    pub authorization: String,
}

impl AuthHeaders {
    pub const CONTENT_TYPE: &'static str = "application/json";

    /// Headers for `token`; an empty token yields a bare `Bearer ` value
    pub fn bearer(token: &str) -> Self {
        Self {
            content_type: Self::CONTENT_TYPE,
            authorization: format!("Bearer {token}"),
        }
    }

    /// Header name/value pairs
    pub fn pairs(&self) -> [(&'static str, &str); 2] {
        [
            ("Content-Type", self.content_type),
            ("Authorization", self.authorization.as_str()),
        ]
    }
}

/// Read-only view over the session used by pages to decide what to show
#[derive(Debug)]
pub struct AuthGuard<S, C = SystemClock> {
    session: SessionStore<S, C>,
}

impl<S: KeyValueStorage, C: Clock> AuthGuard<S, C> {
    pub fn new(session: SessionStore<S, C>) -> Self {
        Self { session }
    }

    pub fn session(&self) -> &SessionStore<S, C> {
        &self.session
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    pub fn remaining_time(&self) -> RemainingTime {
        self.session.remaining_time()
    }

    /// Whether the cached user holds `capability`
    pub fn has_access(&self, capability: &str) -> bool {
        self.session
            .user()
            .is_some_and(|user| user.capabilities().iter().any(|c| c == capability))
    }

    /// JSON content type plus the bearer token, empty when logged out
    pub fn auth_headers(&self) -> AuthHeaders {
        AuthHeaders::bearer(&self.session.token().unwrap_or_default())
    }

    pub fn route_after_login(&self, user: &UserRecord) -> LoginRoute {
        LoginRoute::for_user(user)
    }

    /// Route for the cached user; pages render only on [`LoginRoute::Granted`]
    ///
    /// A missing or unreadable user record is ambiguous.
    pub fn current_route(&self) -> LoginRoute {
        self.session
            .user()
            .map_or(LoginRoute::Ambiguous, |user| LoginRoute::for_user(&user))
    }
}
