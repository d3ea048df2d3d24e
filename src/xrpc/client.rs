//! The XRPC HTTP client

use super::rate_limit::{RateLimiter, RateLimiterConfig};
use super::types::ErrorResponse;
use crate::error::{Error, Result};
use crate::session::Session;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::debug;
use url::Url;

/// The session shared between the client, the agent, and the refresh chain.
///
/// A successful refresh replaces the whole session, so every request reads
/// the store at send time rather than caching a token.
pub type SessionStore = Arc<RwLock<Option<Session>>>;

/// Configuration for the XRPC client
#[derive(Debug, Clone)]
pub struct XrpcConfig {
    /// Request timeout
    pub timeout: Duration,
    /// User agent string
    pub user_agent: String,
    /// Rate limiter configuration; `None` disables pacing
    pub rate_limit: Option<RateLimiterConfig>,
}

impl Default for XrpcConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            user_agent: format!("skylark/{}", env!("CARGO_PKG_VERSION")),
            rate_limit: Some(RateLimiterConfig::default()),
        }
    }
}

/// HTTP client for a single XRPC service.
///
/// Queries go out as GETs, procedures as JSON POSTs, both under
/// `/xrpc/{nsid}`. The access token is read from the shared [`SessionStore`]
/// per request; endpoints that authenticate with the refresh token instead
/// use the `*_with_token` calls. Failed calls are decoded into the protocol's
/// structured error body and never retried.
pub struct XrpcClient {
    http: Client,
    base: Url,
    session: SessionStore,
    rate_limiter: Option<RateLimiter>,
}

impl XrpcClient {
    /// Create a client for `service` (e.g. `https://bsky.social`) with the
    /// default configuration.
    pub fn new(service: &str) -> Result<Self> {
        Self::with_config(service, XrpcConfig::default())
    }

    /// Create a client with a custom configuration
    pub fn with_config(service: &str, config: XrpcConfig) -> Result<Self> {
        let base = Url::parse(service)?;
        let http = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()?;

        Ok(Self {
            http,
            base,
            session: Arc::new(RwLock::new(None)),
            rate_limiter: config.rate_limit.as_ref().map(RateLimiter::new),
        })
    }

    /// The session store shared with this client
    pub fn session_store(&self) -> SessionStore {
        Arc::clone(&self.session)
    }

    /// Base URL of the service this client talks to
    pub fn service(&self) -> &Url {
        &self.base
    }

    /// Call a query endpoint (GET)
    pub async fn query<O>(&self, nsid: &str, params: &[(&str, String)]) -> Result<O>
    where
        O: DeserializeOwned,
    {
        let mut request = self.http.get(self.endpoint_url(nsid)?).query(params);
        request = self.bearer(request).await;
        let response = self.send(nsid, request).await?;
        Ok(response.json().await?)
    }

    /// Call a procedure endpoint (POST) with a JSON input
    pub async fn procedure<I, O>(&self, nsid: &str, input: &I) -> Result<O>
    where
        I: Serialize + ?Sized,
        O: DeserializeOwned,
    {
        let mut request = self.http.post(self.endpoint_url(nsid)?).json(input);
        request = self.bearer(request).await;
        let response = self.send(nsid, request).await?;
        Ok(response.json().await?)
    }

    /// Call a procedure endpoint and discard its output
    pub async fn procedure_unit<I>(&self, nsid: &str, input: &I) -> Result<()>
    where
        I: Serialize + ?Sized,
    {
        let mut request = self.http.post(self.endpoint_url(nsid)?).json(input);
        request = self.bearer(request).await;
        self.send(nsid, request).await?;
        Ok(())
    }

    /// Call an input-less procedure authenticating with an explicit token.
    ///
    /// `refreshSession` authenticates with the refresh token rather than the
    /// (possibly already expired) access token, so the session store cannot
    /// supply the credential.
    pub async fn procedure_with_token<O>(&self, nsid: &str, token: &str) -> Result<O>
    where
        O: DeserializeOwned,
    {
        let request = self
            .http
            .post(self.endpoint_url(nsid)?)
            .bearer_auth(token);
        let response = self.send(nsid, request).await?;
        Ok(response.json().await?)
    }

    /// Like [`procedure_with_token`](Self::procedure_with_token), discarding
    /// the output (`deleteSession`).
    pub async fn procedure_with_token_unit(&self, nsid: &str, token: &str) -> Result<()> {
        let request = self
            .http
            .post(self.endpoint_url(nsid)?)
            .bearer_auth(token);
        self.send(nsid, request).await?;
        Ok(())
    }

    /// Upload raw bytes as a blob (POST with the blob's MIME type)
    pub async fn upload<O>(&self, nsid: &str, bytes: Vec<u8>, mime_type: &str) -> Result<O>
    where
        O: DeserializeOwned,
    {
        let mut request = self
            .http
            .post(self.endpoint_url(nsid)?)
            .header(reqwest::header::CONTENT_TYPE, mime_type)
            .body(bytes);
        request = self.bearer(request).await;
        let response = self.send(nsid, request).await?;
        Ok(response.json().await?)
    }

    fn endpoint_url(&self, nsid: &str) -> Result<Url> {
        Ok(self.base.join(&format!("/xrpc/{nsid}"))?)
    }

    /// Attach the current access token, when a session is live
    async fn bearer(&self, request: RequestBuilder) -> RequestBuilder {
        match self.session.read().await.as_ref() {
            Some(session) => request.bearer_auth(&session.access_jwt),
            None => request,
        }
    }

    async fn send(&self, nsid: &str, request: RequestBuilder) -> Result<Response> {
        if let Some(limiter) = &self.rate_limiter {
            limiter.wait().await;
        }

        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            debug!(%nsid, status = status.as_u16(), "xrpc call succeeded");
            return Ok(response);
        }

        // Failure bodies are structured; fall back to blanks when they are not.
        let body: ErrorResponse = response.json().await.unwrap_or_default();
        debug!(%nsid, status = status.as_u16(), code = %body.error, "xrpc call failed");
        Err(Error::protocol(status.as_u16(), body.error, body.message))
    }
}

impl std::fmt::Debug for XrpcClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("XrpcClient")
            .field("base", &self.base.as_str())
            .field("has_rate_limiter", &self.rate_limiter.is_some())
            .finish_non_exhaustive()
    }
}
