//! Backend client construction

use portal_core::AuthHeaders;
use portal_http::{AuthenticatedPortalClient, ClientError, TypedClientBuilder};

use crate::config::FrontendConfig;

/// Client carrying the current session headers
///
/// Built per action so a fresh login or logout takes effect immediately.
pub fn portal_client(headers: AuthHeaders) -> Result<AuthenticatedPortalClient, ClientError> {
    TypedClientBuilder::from_config(&FrontendConfig::portal().api).build_with_headers(headers)
}
