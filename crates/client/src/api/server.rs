use reqwest::{Client, RequestBuilder, Url};

use crate::model::{BucketInfo, ServerInfo};

use super::ApiRequest;

/// GET /info
#[derive(Debug, Clone, Default)]
pub struct ServerInfoRequest;

impl ApiRequest for ServerInfoRequest {
    type Response = ServerInfo;

    fn build_request(&self, base_url: &Url, client: &Client) -> RequestBuilder {
        client.get(base_url.join("/info").unwrap())
    }
}

/// GET /list
#[derive(Debug, Clone, Default)]
pub struct ListBucketsRequest;

impl ApiRequest for ListBucketsRequest {
    type Response = Vec<BucketInfo>;

    fn build_request(&self, base_url: &Url, client: &Client) -> RequestBuilder {
        client.get(base_url.join("/list").unwrap())
    }
}
