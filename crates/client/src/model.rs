use serde::{Deserialize, Serialize};

/// Whether a bucket's storage is unbounded or capped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum QuotaType {
    /// Unbounded storage.
    None,
    /// Capped storage, oldest records evicted first.
    Fifo,
}

/// Configuration for a bucket.
///
/// Fields left as `None` are omitted on the wire and the server keeps
/// (or defaults) its own value for them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketSettings {
    /// Max block size in bytes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_block_size: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quota_type: Option<QuotaType>,
    /// Quota size in bytes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quota_size: Option<u64>,
}

/// Server-computed statistics about a bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketInfo {
    /// Name of the bucket, unique within the server.
    pub name: String,
    pub entry_count: u64,
    /// Size of bucket data in bytes.
    pub size: u64,
    /// UNIX timestamp of the oldest record in microseconds.
    pub oldest_record: u64,
    /// UNIX timestamp of the latest record in microseconds.
    pub latest_record: u64,
}

/// Server-computed statistics about an entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryInfo {
    /// Name of the entry, unique within its bucket.
    pub name: String,
    /// Size of stored data in bytes.
    pub size: u64,
    pub block_count: u64,
    pub record_count: u64,
    /// UNIX timestamp of the oldest record in microseconds.
    pub oldest_record: u64,
    /// UNIX timestamp of the latest record in microseconds.
    pub latest_record: u64,
}

/// Everything the server knows about a bucket, returned by a single
/// describe-bucket call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketFullInfo {
    pub info: BucketInfo,
    pub settings: BucketSettings,
    pub entries: Vec<EntryInfo>,
}

/// Information about the server as a whole.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerInfo {
    pub version: String,
    pub bucket_count: u64,
    /// Uptime in seconds.
    #[serde(default)]
    pub uptime: u64,
    /// Total stored data in bytes.
    #[serde(default)]
    pub usage: u64,
    /// UNIX timestamp of the oldest record on the server in microseconds.
    #[serde(default)]
    pub oldest_record: u64,
    /// UNIX timestamp of the latest record on the server in microseconds.
    #[serde(default)]
    pub latest_record: u64,
}

/// A single (timestamp, size) pair from a record listing. Payloads are
/// not included; fetch them with a record read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordInfo {
    /// UNIX timestamp in microseconds.
    pub ts: u64,
    /// Payload size in bytes.
    pub size: u64,
}
