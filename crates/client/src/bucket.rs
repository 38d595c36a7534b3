use std::collections::VecDeque;

use bytes::Bytes;
use futures::Stream;

use crate::api::bucket::{GetBucketRequest, RemoveBucketRequest, UpdateSettingsRequest};
use crate::api::entry::{ListRecordsRequest, ReadRecordRequest, WriteRecordRequest};
use crate::api::{ApiClient, ApiError};
use crate::micros;
use crate::model::{BucketFullInfo, BucketInfo, BucketSettings, EntryInfo, RecordInfo};

/// Handle to a single bucket on the server.
///
/// Holds only the bucket name and the shared transport; there is no
/// cached server state, so every read performs a fresh network call.
/// Cloning is cheap and handles are safe to share between tasks.
#[derive(Debug, Clone)]
pub struct Bucket {
    name: String,
    api: ApiClient,
}

impl Bucket {
    pub(crate) fn new(name: impl Into<String>, api: ApiClient) -> Self {
        Self {
            name: name.into(),
            api,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fetch the full bucket description: statistics, settings and the
    /// entry list in one call.
    pub async fn full_info(&self) -> Result<BucketFullInfo, ApiError> {
        self.api
            .call(&GetBucketRequest {
                name: self.name.clone(),
            })
            .await
    }

    /// Current settings of the bucket.
    pub async fn settings(&self) -> Result<BucketSettings, ApiError> {
        Ok(self.full_info().await?.settings)
    }

    /// Statistics about the bucket.
    pub async fn info(&self) -> Result<BucketInfo, ApiError> {
        Ok(self.full_info().await?.info)
    }

    /// Entries of the bucket with their statistics.
    pub async fn entries(&self) -> Result<Vec<EntryInfo>, ApiError> {
        Ok(self.full_info().await?.entries)
    }

    /// Update bucket settings. Fields left as `None` keep their current
    /// value on the server.
    pub async fn set_settings(&self, settings: &BucketSettings) -> Result<(), ApiError> {
        self.api
            .send(&UpdateSettingsRequest {
                name: self.name.clone(),
                settings: settings.clone(),
            })
            .await
    }

    /// Remove the bucket and all its records.
    pub async fn remove(&self) -> Result<(), ApiError> {
        self.api
            .send(&RemoveBucketRequest {
                name: self.name.clone(),
            })
            .await
    }

    /// Write a record to an entry. `ts` is fractional seconds; `None`
    /// stamps the record with the current time, computed at the moment
    /// of the call.
    pub async fn write(
        &self,
        entry: &str,
        data: impl Into<Bytes>,
        ts: Option<f64>,
    ) -> Result<(), ApiError> {
        let ts = ts.map(micros::to_micros).unwrap_or_else(micros::now);
        self.write_us(entry, data, ts).await
    }

    /// Write a record at an exact wire timestamp in microseconds.
    pub async fn write_us(
        &self,
        entry: &str,
        data: impl Into<Bytes>,
        ts: u64,
    ) -> Result<(), ApiError> {
        self.api
            .send(&WriteRecordRequest {
                bucket: self.name.clone(),
                entry: entry.to_string(),
                ts,
                data: data.into(),
            })
            .await
    }

    /// Read the record payload at `ts` (fractional seconds).
    pub async fn read(&self, entry: &str, ts: f64) -> Result<Bytes, ApiError> {
        self.read_us(entry, micros::to_micros(ts)).await
    }

    /// Read the record payload at an exact wire timestamp in
    /// microseconds, e.g. one returned by [`Bucket::list`].
    pub async fn read_us(&self, entry: &str, ts: u64) -> Result<Bytes, ApiError> {
        self.api
            .fetch_bytes(&ReadRecordRequest {
                bucket: self.name.clone(),
                entry: entry.to_string(),
                ts,
            })
            .await
    }

    /// List records with `start <= ts < stop`, both bounds in
    /// fractional seconds, in the server's chronological order.
    pub async fn list(
        &self,
        entry: &str,
        start: f64,
        stop: f64,
    ) -> Result<Vec<RecordInfo>, ApiError> {
        self.list_us(entry, micros::to_micros(start), micros::to_micros(stop))
            .await
    }

    /// List records over an exact microsecond range.
    pub async fn list_us(
        &self,
        entry: &str,
        start: u64,
        stop: u64,
    ) -> Result<Vec<RecordInfo>, ApiError> {
        let page = self
            .api
            .call(&ListRecordsRequest {
                bucket: self.name.clone(),
                entry: entry.to_string(),
                start,
                stop,
            })
            .await?;
        Ok(page.records)
    }

    /// Stream record payloads in `[start, stop)` in timestamp order.
    ///
    /// Performs one list call followed by one read per record,
    /// sequentially; an error ends the stream at the failing record.
    /// Re-invoke with the same arguments to restart from the beginning.
    pub fn walk(
        &self,
        entry: &str,
        start: f64,
        stop: f64,
    ) -> impl Stream<Item = Result<Bytes, ApiError>> {
        let bucket = self.clone();
        let entry = entry.to_string();
        let start = micros::to_micros(start);
        let stop = micros::to_micros(stop);

        futures::stream::unfold(WalkState::Start, move |state| {
            let bucket = bucket.clone();
            let entry = entry.clone();
            async move {
                let mut pending = match state {
                    WalkState::Start => match bucket.list_us(&entry, start, stop).await {
                        Ok(records) => records.into_iter().map(|r| r.ts).collect::<VecDeque<_>>(),
                        Err(err) => return Some((Err(err), WalkState::Done)),
                    },
                    WalkState::Reading(pending) => pending,
                    WalkState::Done => return None,
                };

                let ts = pending.pop_front()?;
                match bucket.read_us(&entry, ts).await {
                    Ok(data) => Some((Ok(data), WalkState::Reading(pending))),
                    Err(err) => Some((Err(err), WalkState::Done)),
                }
            }
        })
    }
}

enum WalkState {
    Start,
    Reading(VecDeque<u64>),
    Done,
}
