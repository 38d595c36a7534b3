use bytes::Bytes;
use reqwest::{Client, RequestBuilder, Url};
use serde::Deserialize;

use crate::model::RecordInfo;

use super::ApiRequest;

/// POST /b/{bucket}/{entry}?ts=microseconds
#[derive(Debug, Clone)]
pub struct WriteRecordRequest {
    pub bucket: String,
    pub entry: String,
    /// UNIX timestamp in microseconds.
    pub ts: u64,
    pub data: Bytes,
}

impl ApiRequest for WriteRecordRequest {
    type Response = ();

    fn build_request(&self, base_url: &Url, client: &Client) -> RequestBuilder {
        let url = base_url
            .join(&format!("/b/{}/{}", self.bucket, self.entry))
            .unwrap();
        client
            .post(url)
            .query(&[("ts", self.ts)])
            .body(self.data.clone())
    }
}

/// GET /b/{bucket}/{entry}?ts=microseconds
#[derive(Debug, Clone)]
pub struct ReadRecordRequest {
    pub bucket: String,
    pub entry: String,
    /// UNIX timestamp in microseconds.
    pub ts: u64,
}

impl ApiRequest for ReadRecordRequest {
    type Response = ();

    fn build_request(&self, base_url: &Url, client: &Client) -> RequestBuilder {
        let url = base_url
            .join(&format!("/b/{}/{}", self.bucket, self.entry))
            .unwrap();
        client.get(url).query(&[("ts", self.ts)])
    }
}

/// GET /b/{bucket}/{entry}/list?start=..&stop=..
#[derive(Debug, Clone)]
pub struct ListRecordsRequest {
    pub bucket: String,
    pub entry: String,
    /// Inclusive start of the range, microseconds.
    pub start: u64,
    /// Exclusive end of the range, microseconds.
    pub stop: u64,
}

/// Wire shape of a record listing.
#[derive(Debug, Clone, Deserialize)]
pub struct RecordPage {
    pub records: Vec<RecordInfo>,
}

impl ApiRequest for ListRecordsRequest {
    type Response = RecordPage;

    fn build_request(&self, base_url: &Url, client: &Client) -> RequestBuilder {
        let url = base_url
            .join(&format!("/b/{}/{}/list", self.bucket, self.entry))
            .unwrap();
        client
            .get(url)
            .query(&[("start", self.start), ("stop", self.stop)])
    }
}
