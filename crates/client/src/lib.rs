/**
 * HTTP transport layer: the `ApiClient`, the per-operation
 *  request types it dispatches, and the typed error every
 *  operation raises.
 */
pub mod api;
/**
 * Handle to a single bucket: settings, statistics and
 *  record-level reads/writes.
 */
pub mod bucket;
/**
 * Entry point to a server: bucket lifecycle and
 *  server-wide queries.
 */
pub mod client;
/**
 * Timestamp conversion between API seconds and
 *  wire microseconds.
 */
pub mod micros;
/**
 * Value objects parsed from server JSON: bucket settings,
 *  bucket/entry statistics and record listings.
 */
pub mod model;

pub use api::{ApiError, ErrorKind};
pub use bucket::Bucket;
pub use client::{Client, ClientBuilder};
pub use model::{
    BucketFullInfo, BucketInfo, BucketSettings, EntryInfo, QuotaType, RecordInfo, ServerInfo,
};
