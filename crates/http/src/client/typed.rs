//! Type-safe API clients that enforce authentication requirements at compile time

use super::ClientError;
use portal_core::config::ApiConfig;
use portal_core::{ApiEnvelope, ApiOutcome, AuthHeaders};
use reqwest::{Client, ClientBuilder, StatusCode, header};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

const USER_AGENT: &str = concat!("portal-client/", env!("CARGO_PKG_VERSION"));

/// Client for public endpoints that don't require authentication
#[derive(Debug, Clone)]
pub struct PublicPortalClient {
    client: Client,
    base_url: String,
}

/// Client that sends the session's bearer token on every request
#[derive(Debug, Clone)]
pub struct AuthenticatedPortalClient {
    client: Client,
    base_url: String,
    headers: AuthHeaders,
}

fn build_client(timeout: Option<Duration>) -> Result<Client, ClientError> {
    #[cfg(not(target_arch = "wasm32"))]
    let client = {
        let mut builder = ClientBuilder::new().user_agent(USER_AGENT);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        builder.build()?
    };

    #[cfg(target_arch = "wasm32")]
    let client = {
        let _ = timeout; // Timeouts not supported on WASM
        ClientBuilder::new().user_agent(USER_AGENT).build()?
    };

    Ok(client)
}

/// Send `request`, decoding a 2xx body as `T`
async fn execute<T: DeserializeOwned>(
    request: reqwest::RequestBuilder,
) -> Result<T, ClientError> {
    let response = request.send().await?;
    let status = response.status();

    if status.is_success() {
        Ok(response.json().await?)
    } else {
        let body = response.text().await.unwrap_or_default();
        Err(ClientError::from_status(status, body))
    }
}

/// Send `request`, decoding a `{ success, message, data }` envelope
///
/// 404 is reported as [`ApiOutcome::NotFound`] rather than an error.
async fn execute_envelope<T, U>(
    request: reqwest::RequestBuilder,
    convert: impl FnOnce(ApiEnvelope<T>) -> ApiOutcome<U>,
) -> Result<ApiOutcome<U>, ClientError>
where
    T: DeserializeOwned,
{
    let response = request.send().await?;
    let status = response.status();

    if status == StatusCode::NOT_FOUND {
        debug!("Backend reported no data");
        return Ok(ApiOutcome::NotFound);
    }
    if status.is_success() {
        let envelope: ApiEnvelope<T> = response.json().await?;
        Ok(convert(envelope))
    } else {
        let body = response.text().await.unwrap_or_default();
        Err(ClientError::from_status(status, body))
    }
}

impl PublicPortalClient {
    /// Create a new public client
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        Self::new_with_timeout(base_url, None)
    }

    fn new_with_timeout(
        base_url: impl Into<String>,
        timeout: Option<Duration>,
    ) -> Result<Self, ClientError> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let client = build_client(timeout)?;
        Ok(Self { client, base_url })
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Create a request builder without authentication
    pub fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        debug!(%method, %url, "Backend request");
        self.client
            .request(method, url)
            .header(header::CONTENT_TYPE, AuthHeaders::CONTENT_TYPE)
    }

    /// Execute a request and handle common errors
    pub async fn execute<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ClientError> {
        execute(request).await
    }

    /// Attach a session token to get an authenticated client
    pub fn authenticate(self, token: &str) -> AuthenticatedPortalClient {
        self.with_headers(AuthHeaders::bearer(token))
    }

    fn with_headers(self, headers: AuthHeaders) -> AuthenticatedPortalClient {
        AuthenticatedPortalClient {
            client: self.client,
            base_url: self.base_url,
            headers,
        }
    }
}

impl AuthenticatedPortalClient {
    /// Create a new authenticated client
    pub fn new(base_url: impl Into<String>, token: &str) -> Result<Self, ClientError> {
        Self::new_with_headers(base_url, AuthHeaders::bearer(token), None)
    }

    fn new_with_headers(
        base_url: impl Into<String>,
        headers: AuthHeaders,
        timeout: Option<Duration>,
    ) -> Result<Self, ClientError> {
        Ok(PublicPortalClient::new_with_timeout(base_url, timeout)?.with_headers(headers))
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn headers(&self) -> &AuthHeaders {
        &self.headers
    }

    /// Create a request builder with the session headers
    pub fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        debug!(%method, %url, "Authenticated backend request");
        let [(_, content_type), (_, authorization)] = self.headers.pairs();
        self.client
            .request(method, url)
            .header(header::CONTENT_TYPE, content_type)
            .header(header::AUTHORIZATION, authorization)
    }

    /// Execute a request and handle common errors
    pub async fn execute<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ClientError> {
        execute(request).await
    }

    /// Execute a request whose body is a standard envelope carrying `data`
    pub async fn fetch<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<ApiOutcome<T>, ClientError> {
        execute_envelope(request, ApiEnvelope::into_outcome).await
    }

    /// Execute a request where only the envelope's `success` flag matters
    pub async fn acknowledge(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<ApiOutcome<()>, ClientError> {
        execute_envelope::<serde_json::Value, _>(request, ApiEnvelope::into_ack).await
    }

    /// Create a public client (useful for calling public endpoints)
    pub fn to_public(&self) -> PublicPortalClient {
        PublicPortalClient {
            client: self.client.clone(),
            base_url: self.base_url.clone(),
        }
    }
}

/// Type-safe builder that creates the appropriate client type
pub struct TypedClientBuilder {
    base_url: Option<String>,
    timeout: Option<Duration>,
}

impl TypedClientBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self {
            base_url: None,
            timeout: None,
        }
    }

    /// Builder pre-filled from the `api` section of the portal config
    pub fn from_config(config: &ApiConfig) -> Self {
        let builder = Self::new().base_url(config.base_url.clone());
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder.timeout(Duration::from_secs(config.timeout_secs));
        builder
    }

    /// Set the base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the request timeout
    #[cfg(not(target_arch = "wasm32"))]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    fn require_base_url(&self) -> Result<String, ClientError> {
        self.base_url
            .clone()
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| ClientError::Configuration("base_url is required".into()))
    }

    /// Build a public client
    pub fn build_public(self) -> Result<PublicPortalClient, ClientError> {
        let base_url = self.require_base_url()?;
        PublicPortalClient::new_with_timeout(base_url, self.timeout)
    }

    /// Build an authenticated client for `token`
    pub fn build_authenticated(
        self,
        token: &str,
    ) -> Result<AuthenticatedPortalClient, ClientError> {
        self.build_with_headers(AuthHeaders::bearer(token))
    }

    /// Build an authenticated client from headers produced by the auth guard
    pub fn build_with_headers(
        self,
        headers: AuthHeaders,
    ) -> Result<AuthenticatedPortalClient, ClientError> {
        let base_url = self.require_base_url()?;
        AuthenticatedPortalClient::new_with_headers(base_url, headers, self.timeout)
    }
}

impl Default for TypedClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
