mod applications;
mod commission;
mod login;
mod plans;

pub use applications::ApplicationsPage;
pub use commission::CommissionPage;
pub use login::LoginPage;
pub use plans::PlansPage;

use crate::client::portal_client;
use crate::session::{SessionAction, SessionContext};
use crate::storage::{BrowserSession, browser_session};
use portal_core::{AuthGuard, ViewError, ViewState};
use portal_http::AuthenticatedPortalClient;
use tracing::error;

/// Client and session for one page action
///
/// A client that cannot be built is reported on `state` as a network failure.
fn page_backend(state: &mut ViewState) -> Option<(AuthenticatedPortalClient, BrowserSession)> {
    let guard = AuthGuard::new(browser_session());
    match portal_client(guard.auth_headers()) {
        Ok(client) => Some((client, browser_session())),
        Err(err) => {
            error!(error = %err, "Failed to build backend client");
            state.fail(ViewError::NetworkFailure);
            None
        }
    }
}

/// Send the user back to the login form if the last call found the token dead
fn sync_session(state: &ViewState, session: Option<&SessionContext>) {
    if state.error.as_ref().is_some_and(ViewError::requires_login) {
        if let Some(session) = session {
            session.dispatch(SessionAction::Refresh);
        }
    }
}
