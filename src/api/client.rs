use anyhow::{Context, Result};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use tracing::{debug, error};
use url::Url;

use super::types::ApiError;

/// Default version (from Cargo.toml)
const DEFAULT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build the User-Agent string sent to every service.
fn build_user_agent() -> String {
    std::env::var("COLABHUB_USER_AGENT")
        .unwrap_or_else(|_| format!("colabhub/{}", DEFAULT_VERSION))
}

/// Shared HTTP plumbing for the service clients.
///
/// Requests are sent once; there is no retry and no timeout beyond the
/// transport defaults.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
}

impl ApiClient {
    pub fn new(user_agent: Option<String>) -> Result<Self> {
        let user_agent = user_agent.unwrap_or_else(build_user_agent);
        let client = Client::builder()
            .user_agent(user_agent)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self { client })
    }

    pub(super) fn build_url(base_url: &str, endpoint: &str) -> Result<Url> {
        let base =
            Url::parse(base_url).with_context(|| format!("Invalid base URL: {}", base_url))?;
        base.join(endpoint)
            .with_context(|| format!("Failed to build URL for endpoint: {}", endpoint))
    }

    pub(super) fn http(&self) -> &Client {
        &self.client
    }

    /// Send the request; non-success statuses become an [`ApiError`].
    pub(super) async fn send(&self, request: RequestBuilder) -> Result<reqwest::Response> {
        let request = request
            .build()
            .context("Failed to build HTTP request")?;
        let method = request.method().clone();
        let url = request.url().clone();

        debug!("=== API Request ===");
        debug!("{} {}", method, redact(&url));

        let response = self
            .client
            .execute(request)
            .await
            .map_err(reqwest::Error::without_url)
            .with_context(|| format!("Failed to send request to {}", redact(&url)))?;

        let status = response.status();
        debug!("=== API Response ===");
        debug!("Status: {}", status);

        if status.is_success() {
            return Ok(response);
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        let api_error = ApiError::from_http_response(status.as_u16(), &body);
        if let Some(hint) = api_error.user_hint() {
            error!("❌ {}", api_error.message);
            error!("   {}", hint);
        } else if !api_error.is_not_found() {
            error!("API request failed: {}", api_error.message);
        }
        Err(api_error.into())
    }

    pub(super) async fn send_json<R>(&self, request: RequestBuilder) -> Result<R>
    where
        R: DeserializeOwned,
    {
        let response = self.send(request).await?;
        let text = response
            .text()
            .await
            .map_err(reqwest::Error::without_url)
            .context("Failed to read response body")?;
        serde_json::from_str(&text).context("Failed to parse API response")
    }

    /// Like [`send_json`](Self::send_json), but a 404 yields `None`.
    pub(super) async fn send_json_opt<R>(&self, request: RequestBuilder) -> Result<Option<R>>
    where
        R: DeserializeOwned,
    {
        match self.send_json(request).await {
            Ok(value) => Ok(Some(value)),
            Err(e) if is_not_found(&e) => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub(super) async fn send_bytes(&self, request: RequestBuilder) -> Result<Vec<u8>> {
        let response = self.send(request).await?;
        let bytes = response
            .bytes()
            .await
            .map_err(reqwest::Error::without_url)
            .context("Failed to read response body")?;
        Ok(bytes.to_vec())
    }

    pub(super) async fn send_empty(&self, request: RequestBuilder) -> Result<()> {
        let response = self.send(request).await?;
        // The status already reports success; an unreadable body does not change that.
        if let Err(e) = response.bytes().await {
            debug!("Ignoring unreadable response body: {}", e.without_url());
        }
        Ok(())
    }
}

pub(super) fn is_not_found(err: &anyhow::Error) -> bool {
    err.downcast_ref::<ApiError>()
        .is_some_and(ApiError::is_not_found)
}

/// The URL without query parameters that carry secrets.
fn redact(url: &Url) -> String {
    let mut url = url.clone();
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| {
            let v = if k == "key" { "***".to_string() } else { v.into_owned() };
            (k.into_owned(), v)
        })
        .collect();
    if pairs.is_empty() {
        return url.to_string();
    }
    url.query_pairs_mut().clear().extend_pairs(pairs);
    url.to_string()
}
