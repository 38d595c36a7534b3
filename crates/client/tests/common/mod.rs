//! In-process mock of the storage server HTTP API, backed by an
//! in-memory bucket map. Bound to an ephemeral localhost port.

// not every test binary uses every helper
#![allow(dead_code)]

use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use axum::extract::{Path, Query, Request, State};
use axum::http::header::AUTHORIZATION;
use axum::http::StatusCode;
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use bytes::Bytes;
use parking_lot::Mutex;
use serde::Deserialize;
use serde_json::{json, Value};
use sha2::{Digest, Sha256};

use tidestore_client::{Bucket, Client};

pub const SERVER_VERSION: &str = "0.4.0";
pub const DEFAULT_MAX_BLOCK_SIZE: u64 = 67_108_864;

const ACCESS_TOKEN: &str = "test-access-token";

struct BucketState {
    max_block_size: u64,
    quota_type: String,
    quota_size: u64,
    // entry name -> ts (microseconds) -> payload
    entries: BTreeMap<String, BTreeMap<u64, Vec<u8>>>,
}

impl BucketState {
    fn new() -> Self {
        Self {
            max_block_size: DEFAULT_MAX_BLOCK_SIZE,
            quota_type: "NONE".to_string(),
            quota_size: 0,
            entries: BTreeMap::new(),
        }
    }

    fn apply_settings(&mut self, patch: &Value) {
        if let Some(size) = patch.get("max_block_size").and_then(Value::as_u64) {
            self.max_block_size = size;
        }
        if let Some(quota) = patch.get("quota_type").and_then(Value::as_str) {
            self.quota_type = quota.to_string();
        }
        if let Some(size) = patch.get("quota_size").and_then(Value::as_u64) {
            self.quota_size = size;
        }
    }

    fn settings_json(&self) -> Value {
        json!({
            "max_block_size": self.max_block_size,
            "quota_type": self.quota_type,
            "quota_size": self.quota_size,
        })
    }

    fn info_json(&self, name: &str) -> Value {
        let mut size = 0u64;
        let mut oldest = u64::MAX;
        let mut latest = 0u64;
        for records in self.entries.values() {
            for (ts, data) in records {
                size += data.len() as u64;
                oldest = oldest.min(*ts);
                latest = latest.max(*ts);
            }
        }
        json!({
            "name": name,
            "entry_count": self.entries.len(),
            "size": size,
            "oldest_record": if oldest == u64::MAX { 0 } else { oldest },
            "latest_record": latest,
        })
    }
}

struct ServerState {
    started: Instant,
    api_token: Option<String>,
    // creation order matters for /list
    buckets: Vec<(String, BucketState)>,
}

impl ServerState {
    fn bucket(&self, name: &str) -> Option<&BucketState> {
        self.buckets.iter().find(|(n, _)| n == name).map(|(_, b)| b)
    }

    fn bucket_mut(&mut self, name: &str) -> Option<&mut BucketState> {
        self.buckets
            .iter_mut()
            .find(|(n, _)| n == name)
            .map(|(_, b)| b)
    }
}

type Shared = Arc<Mutex<ServerState>>;

pub struct MockServer {
    addr: SocketAddr,
    state: Shared,
}

impl MockServer {
    pub async fn spawn() -> Self {
        Self::spawn_with_token(None).await
    }

    pub async fn spawn_with_token(api_token: Option<&str>) -> Self {
        init_tracing();

        let state: Shared = Arc::new(Mutex::new(ServerState {
            started: Instant::now(),
            api_token: api_token.map(String::from),
            buckets: Vec::new(),
        }));

        let app = Router::new()
            .route("/info", get(server_info))
            .route("/list", get(list_buckets))
            .route(
                "/b/:name",
                get(get_bucket)
                    .post(create_bucket)
                    .put(update_settings)
                    .delete(delete_bucket),
            )
            .route("/b/:name/:entry", get(read_record).post(write_record))
            .route("/b/:name/:entry/list", get(list_records))
            .route_layer(middleware::from_fn_with_state(state.clone(), require_auth))
            .route("/auth/refresh", post(refresh_token))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { addr, state }
    }

    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Wipe all server-side state, as if the server lost its storage.
    pub fn drop_all_buckets(&self) {
        self.state.lock().buckets.clear();
    }
}

/// Shared fixture: "bucket-1" with two entries (44 bytes total),
/// "bucket-2" with one entry (22 bytes total).
pub async fn seed_two_buckets(client: &Client) -> (Bucket, Bucket) {
    let bucket_1 = client.create_bucket("bucket-1", None).await.unwrap();
    bucket_1
        .write("entry-1", Bytes::from_static(b"some-data-1"), Some(1.0))
        .await
        .unwrap();
    bucket_1
        .write("entry-1", Bytes::from_static(b"some-data-2"), Some(2.0))
        .await
        .unwrap();
    bucket_1
        .write("entry-2", Bytes::from_static(b"some-data-3"), Some(3.0))
        .await
        .unwrap();
    bucket_1
        .write("entry-2", Bytes::from_static(b"some-data-4"), Some(4.0))
        .await
        .unwrap();

    let bucket_2 = client.create_bucket("bucket-2", None).await.unwrap();
    bucket_2
        .write("entry-1", Bytes::from_static(b"some-data-1"), Some(5.0))
        .await
        .unwrap();
    bucket_2
        .write("entry-1", Bytes::from_static(b"some-data-2"), Some(6.0))
        .await
        .unwrap();

    (bucket_1, bucket_2)
}

fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn detail(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "detail": message }))).into_response()
}

async fn require_auth(State(state): State<Shared>, req: Request, next: Next) -> Response {
    if state.lock().api_token.is_none() {
        return next.run(req).await;
    }

    let authorized = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(|value| value == format!("Bearer {ACCESS_TOKEN}"))
        .unwrap_or(false);

    if authorized {
        next.run(req).await
    } else {
        detail(StatusCode::UNAUTHORIZED, "invalid or missing access token")
    }
}

async fn refresh_token(State(state): State<Shared>, req: Request) -> Response {
    let Some(api_token) = state.lock().api_token.clone() else {
        return detail(StatusCode::BAD_REQUEST, "authentication disabled");
    };

    let expected = format!("Bearer {:x}", Sha256::digest(api_token.as_bytes()));
    let ok = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(|value| value == expected)
        .unwrap_or(false);

    if ok {
        Json(json!({ "access_token": ACCESS_TOKEN })).into_response()
    } else {
        detail(StatusCode::UNAUTHORIZED, "bad api token")
    }
}

async fn server_info(State(state): State<Shared>) -> Response {
    let state = state.lock();
    let mut usage = 0u64;
    let mut oldest = u64::MAX;
    let mut latest = 0u64;
    for (_, bucket) in &state.buckets {
        for records in bucket.entries.values() {
            for (ts, data) in records {
                usage += data.len() as u64;
                oldest = oldest.min(*ts);
                latest = latest.max(*ts);
            }
        }
    }

    Json(json!({
        "version": SERVER_VERSION,
        "bucket_count": state.buckets.len(),
        "uptime": state.started.elapsed().as_secs(),
        "usage": usage,
        "oldest_record": if oldest == u64::MAX { 0 } else { oldest },
        "latest_record": latest,
    }))
    .into_response()
}

async fn list_buckets(State(state): State<Shared>) -> Response {
    let state = state.lock();
    let buckets: Vec<Value> = state
        .buckets
        .iter()
        .map(|(name, bucket)| bucket.info_json(name))
        .collect();
    Json(buckets).into_response()
}

async fn create_bucket(
    Path(name): Path<String>,
    State(state): State<Shared>,
    body: Bytes,
) -> Response {
    let mut state = state.lock();
    if state.bucket(&name).is_some() {
        return detail(StatusCode::CONFLICT, "bucket already exists");
    }

    let mut bucket = BucketState::new();
    if !body.is_empty() {
        match serde_json::from_slice::<Value>(&body) {
            Ok(patch) => bucket.apply_settings(&patch),
            Err(_) => return detail(StatusCode::UNPROCESSABLE_ENTITY, "malformed settings"),
        }
    }

    state.buckets.push((name, bucket));
    StatusCode::OK.into_response()
}

async fn get_bucket(Path(name): Path<String>, State(state): State<Shared>) -> Response {
    let state = state.lock();
    let Some(bucket) = state.bucket(&name) else {
        return detail(StatusCode::NOT_FOUND, "bucket not found");
    };

    let entries: Vec<Value> = bucket
        .entries
        .iter()
        .map(|(entry, records)| {
            let size: u64 = records.values().map(|data| data.len() as u64).sum();
            json!({
                "name": entry,
                "size": size,
                "block_count": 1,
                "record_count": records.len(),
                "oldest_record": records.keys().next().copied().unwrap_or(0),
                "latest_record": records.keys().next_back().copied().unwrap_or(0),
            })
        })
        .collect();

    Json(json!({
        "info": bucket.info_json(&name),
        "settings": bucket.settings_json(),
        "entries": entries,
    }))
    .into_response()
}

async fn update_settings(
    Path(name): Path<String>,
    State(state): State<Shared>,
    Json(patch): Json<Value>,
) -> Response {
    let mut state = state.lock();
    match state.bucket_mut(&name) {
        Some(bucket) => {
            bucket.apply_settings(&patch);
            StatusCode::OK.into_response()
        }
        None => detail(StatusCode::NOT_FOUND, "bucket not found"),
    }
}

async fn delete_bucket(Path(name): Path<String>, State(state): State<Shared>) -> Response {
    let mut state = state.lock();
    let before = state.buckets.len();
    state.buckets.retain(|(n, _)| n != &name);
    if state.buckets.len() == before {
        detail(StatusCode::NOT_FOUND, "bucket not found")
    } else {
        StatusCode::OK.into_response()
    }
}

#[derive(Deserialize)]
struct TsQuery {
    ts: u64,
}

#[derive(Deserialize)]
struct RangeQuery {
    start: u64,
    stop: u64,
}

async fn write_record(
    Path((name, entry)): Path<(String, String)>,
    Query(query): Query<TsQuery>,
    State(state): State<Shared>,
    body: Bytes,
) -> Response {
    let mut state = state.lock();
    match state.bucket_mut(&name) {
        Some(bucket) => {
            bucket
                .entries
                .entry(entry)
                .or_default()
                .insert(query.ts, body.to_vec());
            StatusCode::OK.into_response()
        }
        None => detail(StatusCode::NOT_FOUND, "bucket not found"),
    }
}

async fn read_record(
    Path((name, entry)): Path<(String, String)>,
    Query(query): Query<TsQuery>,
    State(state): State<Shared>,
) -> Response {
    let state = state.lock();
    let Some(bucket) = state.bucket(&name) else {
        return detail(StatusCode::NOT_FOUND, "bucket not found");
    };
    let Some(records) = bucket.entries.get(&entry) else {
        return detail(StatusCode::NOT_FOUND, "entry not found");
    };
    match records.get(&query.ts) {
        Some(data) => data.clone().into_response(),
        None => detail(StatusCode::NOT_FOUND, "no record for this timestamp"),
    }
}

async fn list_records(
    Path((name, entry)): Path<(String, String)>,
    Query(query): Query<RangeQuery>,
    State(state): State<Shared>,
) -> Response {
    if query.start > query.stop {
        return detail(StatusCode::UNPROCESSABLE_ENTITY, "start is after stop");
    }

    let state = state.lock();
    let Some(bucket) = state.bucket(&name) else {
        return detail(StatusCode::NOT_FOUND, "bucket not found");
    };
    let Some(records) = bucket.entries.get(&entry) else {
        return detail(StatusCode::NOT_FOUND, "entry not found");
    };

    // start inclusive, stop exclusive; BTreeMap keeps chronological order
    let records: Vec<Value> = records
        .range(query.start..query.stop)
        .map(|(ts, data)| json!({ "ts": ts, "size": data.len() }))
        .collect();

    Json(json!({ "records": records })).into_response()
}
