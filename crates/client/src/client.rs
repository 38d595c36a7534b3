use std::time::Duration;

use url::Url;

use crate::api::bucket::{CreateBucketRequest, GetBucketRequest, RemoveBucketRequest};
use crate::api::server::{ListBucketsRequest, ServerInfoRequest};
use crate::api::{ApiClient, ApiError};
use crate::bucket::Bucket;
use crate::model::{BucketInfo, BucketSettings, ServerInfo};

/// Entry point to a storage server.
///
/// A stateless handle around the shared transport; cloning is cheap
/// and clones may be used concurrently.
#[derive(Debug, Clone)]
pub struct Client {
    api: ApiClient,
}

impl Client {
    /// Connect to the server at `url` with default options.
    pub fn new(url: &str) -> Result<Self, ApiError> {
        Self::builder(url).build()
    }

    pub fn builder(url: &str) -> ClientBuilder {
        ClientBuilder {
            url: url.to_string(),
            api_token: None,
            timeout: None,
        }
    }

    /// Information about the server.
    pub async fn info(&self) -> Result<ServerInfo, ApiError> {
        self.api.call(&ServerInfoRequest).await
    }

    /// Statistics for every bucket, in the server's order.
    pub async fn list_buckets(&self) -> Result<Vec<BucketInfo>, ApiError> {
        self.api.call(&ListBucketsRequest).await
    }

    /// Create a bucket and return a handle to it.
    ///
    /// Fails with a [`Conflict`](crate::ErrorKind::Conflict)-kind error
    /// if a bucket with this name already exists; it never silently
    /// hands back a handle to pre-existing data.
    pub async fn create_bucket(
        &self,
        name: &str,
        settings: Option<BucketSettings>,
    ) -> Result<Bucket, ApiError> {
        self.api
            .send(&CreateBucketRequest {
                name: name.to_string(),
                settings,
            })
            .await?;
        Ok(Bucket::new(name, self.api.clone()))
    }

    /// Fetch a handle to an existing bucket.
    ///
    /// Fails with a [`NotFound`](crate::ErrorKind::NotFound)-kind error
    /// if the bucket does not exist.
    pub async fn get_bucket(&self, name: &str) -> Result<Bucket, ApiError> {
        self.api
            .send(&GetBucketRequest {
                name: name.to_string(),
            })
            .await?;
        Ok(Bucket::new(name, self.api.clone()))
    }

    /// Delete a bucket and all its records.
    pub async fn delete_bucket(&self, name: &str) -> Result<(), ApiError> {
        self.api
            .send(&RemoveBucketRequest {
                name: name.to_string(),
            })
            .await
    }
}

/// Builder for [`Client`].
#[derive(Debug, Clone)]
pub struct ClientBuilder {
    url: String,
    api_token: Option<String>,
    timeout: Option<Duration>,
}

impl ClientBuilder {
    /// API token used to obtain an access token when the server answers
    /// 401.
    pub fn api_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(token.into());
        self
    }

    /// Per-request timeout. Without it requests have no client-side
    /// deadline.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn build(self) -> Result<Client, ApiError> {
        let base_url = Url::parse(&self.url)?;
        let api = ApiClient::new(base_url, self.api_token, self.timeout)?;
        Ok(Client { api })
    }
}
