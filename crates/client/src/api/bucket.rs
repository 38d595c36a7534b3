use reqwest::{Client, RequestBuilder, Url};

use crate::model::{BucketFullInfo, BucketSettings};

use super::ApiRequest;

/// POST /b/{name}
#[derive(Debug, Clone)]
pub struct CreateBucketRequest {
    pub name: String,
    /// Settings to create the bucket with; `None` leaves the body empty
    /// and the server applies its defaults.
    pub settings: Option<BucketSettings>,
}

impl ApiRequest for CreateBucketRequest {
    type Response = ();

    fn build_request(&self, base_url: &Url, client: &Client) -> RequestBuilder {
        let url = base_url.join(&format!("/b/{}", self.name)).unwrap();
        match &self.settings {
            Some(settings) => client.post(url).json(settings),
            None => client.post(url),
        }
    }
}

/// GET /b/{name}
#[derive(Debug, Clone)]
pub struct GetBucketRequest {
    pub name: String,
}

impl ApiRequest for GetBucketRequest {
    type Response = BucketFullInfo;

    fn build_request(&self, base_url: &Url, client: &Client) -> RequestBuilder {
        client.get(base_url.join(&format!("/b/{}", self.name)).unwrap())
    }
}

/// PUT /b/{name}
#[derive(Debug, Clone)]
pub struct UpdateSettingsRequest {
    pub name: String,
    pub settings: BucketSettings,
}

impl ApiRequest for UpdateSettingsRequest {
    type Response = ();

    fn build_request(&self, base_url: &Url, client: &Client) -> RequestBuilder {
        let url = base_url.join(&format!("/b/{}", self.name)).unwrap();
        client.put(url).json(&self.settings)
    }
}

/// DELETE /b/{name}
#[derive(Debug, Clone)]
pub struct RemoveBucketRequest {
    pub name: String,
}

impl ApiRequest for RemoveBucketRequest {
    type Response = ();

    fn build_request(&self, base_url: &Url, client: &Client) -> RequestBuilder {
        client.delete(base_url.join(&format!("/b/{}", self.name)).unwrap())
    }
}
