//! Controllers backing the portal pages
//!
//! Each controller owns the data shown on one page plus a [`ViewState`]. The
//! UI layer renders from the controller and forwards user actions to it.

mod applications;
mod commission;
mod insurance_list;
mod login;
mod profile;

pub use applications::InsuranceApplicationsController;
pub use commission::CommissionConfigController;
pub use insurance_list::InsuranceListController;
pub use login::{LOGIN_FAILED_MESSAGE, LoginController};
pub use profile::ProfileController;

use crate::api::ApiError;
use crate::clock::Clock;
use crate::session::SessionStore;
use crate::storage::KeyValueStorage;
use crate::types::{ApiOutcome, GENERIC_FAILURE_MESSAGE};
use crate::validation::ValidationError;
use thiserror::Error;
use tracing::{error, warn};

/// What a page shows in its error banner
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ViewError {
    #[error("Unable to reach the server. Please check your connection and try again.")]
    NetworkFailure,

    #[error("{message}")]
    BackendRejection { message: String },

    #[error("Your session has expired. Please log in again.")]
    SessionExpired,

    #[error(
        "We could not determine your account status. Please contact support for assistance."
    )]
    AmbiguousVerificationState,

    #[error("{message}")]
    Validation { message: String },
}

impl ViewError {
    /// Backend rejection carrying `message`, or the generic fallback
    pub fn rejected(message: Option<String>) -> Self {
        let message = message
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| GENERIC_FAILURE_MESSAGE.to_string());
        Self::BackendRejection { message }
    }

    /// Whether the page should send the user back to the login screen
    pub fn requires_login(&self) -> bool {
        matches!(self, Self::SessionExpired)
    }
}

impl From<ApiError> for ViewError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Network(_) | ApiError::Configuration(_) => Self::NetworkFailure,
            ApiError::Unauthorized(_) => Self::SessionExpired,
            ApiError::Rejected { message, .. } => Self::rejected(Some(message)),
            ApiError::Decode(_) => Self::rejected(None),
        }
    }
}

impl From<ValidationError> for ViewError {
    fn from(err: ValidationError) -> Self {
        Self::Validation {
            message: err.to_string(),
        }
    }
}

/// Loading flag and error banner shared by every page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
    pub loading: bool,
    pub error: Option<ViewError>,
}

impl ViewState {
    /// Mark a request as in flight and clear the previous banner
    pub fn begin(&mut self) {
        self.loading = true;
        self.error = None;
    }

    /// Settle the in-flight request, recording the error if any
    pub fn finish<T>(&mut self, result: Result<T, ViewError>) -> Option<T> {
        self.loading = false;
        match result {
            Ok(value) => Some(value),
            Err(err) => {
                self.error = Some(err);
                None
            }
        }
    }

    pub fn fail(&mut self, err: ViewError) {
        self.loading = false;
        self.error = Some(err);
    }
}

/// Resolve an authenticated call. `NotFound` becomes `Ok(None)`; a 401 drops
/// the stored session so the guard sends the user back to login.
pub(crate) fn settle<T, S, C>(
    session: &SessionStore<S, C>,
    result: Result<ApiOutcome<T>, ApiError>,
) -> Result<Option<T>, ViewError>
where
    S: KeyValueStorage,
    C: Clock,
{
    match result {
        Ok(ApiOutcome::Success(value)) => Ok(Some(value)),
        Ok(ApiOutcome::NotFound) => Ok(None),
        Ok(ApiOutcome::Failure { message }) => Err(ViewError::rejected(Some(message))),
        Err(err) => {
            let view_error = ViewError::from(err.clone());
            match &view_error {
                ViewError::SessionExpired => {
                    warn!("Backend rejected the session token, clearing session");
                    session.clear();
                }
                ViewError::NetworkFailure => warn!(error = %err, "Backend unreachable"),
                _ => error!(error = %err, "Unexpected backend response"),
            }
            Err(view_error)
        }
    }
}
