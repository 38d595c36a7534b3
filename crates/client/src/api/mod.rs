#[allow(clippy::module_inception)]
mod client;
mod error;

pub mod bucket;
pub mod entry;
pub mod server;

pub use client::ApiClient;
pub use error::{ApiError, ErrorKind};

use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;

/// A single HTTP operation against the storage server.
///
/// Each request type knows how to build its own HTTP request; the
/// [`ApiClient`] decides how the response body is interpreted
/// (JSON, raw bytes or discarded).
pub trait ApiRequest {
    type Response: DeserializeOwned;

    fn build_request(&self, base_url: &Url, client: &Client) -> RequestBuilder;
}
