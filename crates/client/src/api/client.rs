use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use parking_lot::RwLock;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use sha2::{Digest, Sha256};
use url::Url;

use super::error::ApiError;
use super::ApiRequest;

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Wrapper for HTTP calls shared by every handle.
///
/// Holds only the server base URL and the connection pool; cloning is
/// cheap and clones share the cached access token.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: Url,
    http: Client,
    api_token: Option<String>,
    access_token: Arc<RwLock<Option<String>>>,
}

impl ApiClient {
    pub fn new(
        base_url: Url,
        api_token: Option<String>,
        timeout: Option<Duration>,
    ) -> Result<Self, ApiError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build()?;

        Ok(Self {
            base_url,
            http,
            api_token,
            access_token: Arc::new(RwLock::new(None)),
        })
    }

    /// Get the base URL for API requests
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Issue a request and deserialize the JSON response body.
    pub async fn call<T: ApiRequest>(&self, request: &T) -> Result<T::Response, ApiError> {
        let response = self.execute(request).await?;
        Ok(response.json::<T::Response>().await?)
    }

    /// Issue a request, discarding the response body.
    pub async fn send<T: ApiRequest>(&self, request: &T) -> Result<(), ApiError> {
        self.execute(request).await?;
        Ok(())
    }

    /// Issue a request and return the raw response body.
    pub async fn fetch_bytes<T: ApiRequest>(&self, request: &T) -> Result<Bytes, ApiError> {
        let response = self.execute(request).await?;
        Ok(response.bytes().await?)
    }

    async fn execute<T: ApiRequest>(&self, request: &T) -> Result<reqwest::Response, ApiError> {
        let response = self.dispatch(request).await?;

        // A 401 with a configured API token means the access token is
        // missing or expired: refresh it and replay the request once.
        if response.status() == StatusCode::UNAUTHORIZED {
            if let Some(api_token) = self.api_token.clone() {
                self.refresh_access_token(&api_token).await?;
                let response = self.dispatch(request).await?;
                return Self::check(response).await;
            }
        }

        Self::check(response).await
    }

    async fn dispatch<T: ApiRequest>(&self, request: &T) -> Result<reqwest::Response, ApiError> {
        let mut builder = request.build_request(&self.base_url, &self.http);
        if let Some(token) = self.access_token.read().clone() {
            builder = builder.bearer_auth(token);
        }

        let request = builder.build()?;
        tracing::debug!(method = %request.method(), url = %request.url(), "sending request");
        let response = self.http.execute(request).await?;
        tracing::debug!(status = %response.status(), "received response");
        Ok(response)
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            let body = response.bytes().await?;
            Err(ApiError::from_status(status, &body))
        }
    }

    /// Exchange the configured API token for a short-lived access token.
    async fn refresh_access_token(&self, api_token: &str) -> Result<(), ApiError> {
        let hash = format!("{:x}", Sha256::digest(api_token.as_bytes()));
        let url = self.base_url.join("/auth/refresh").unwrap();

        let response = self.http.post(url).bearer_auth(hash).send().await?;
        let response = Self::check(response).await?;
        let token: TokenResponse = response.json().await?;

        tracing::debug!("refreshed access token");
        *self.access_token.write() = Some(token.access_token);
        Ok(())
    }
}
