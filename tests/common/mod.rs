// Shared test helpers: an in-process fake Engine API on an ephemeral port

#![allow(dead_code)]

use axum::{
    Router,
    body::Bytes,
    extract::State,
    http::{HeaderMap, Method, StatusCode, Uri, header},
    response::{IntoResponse, Response},
};
use harborpilot::config::AppConfig;
use harborpilot::engine::EngineClient;
use serde_json::{Value, json};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Canned Engine payloads plus knobs for failures, latency and request capture.
#[derive(Default)]
pub struct FakeState {
    pub containers: Mutex<Value>,
    pub inspect: Mutex<HashMap<String, Value>>,
    pub stats: Mutex<HashMap<String, Value>>,
    pub images: Mutex<Value>,
    pub volumes: Mutex<Value>,
    pub networks: Mutex<Value>,
    pub info: Mutex<Value>,
    pub disk_usage: Mutex<Value>,
    pub events: Mutex<String>,
    pub logs: Mutex<Vec<u8>>,
    pub pull_stream: Mutex<String>,

    pub failing_stats: Mutex<HashSet<String>>,
    pub fail_info: AtomicBool,
    pub fail_events: AtomicBool,
    pub fail_containers: AtomicBool,
    pub stats_delay_ms: AtomicU64,

    pub stats_in_flight: AtomicUsize,
    pub stats_max_in_flight: AtomicUsize,
    /// Authorization header of every request (`None` when absent).
    pub authorization: Mutex<Vec<Option<String>>>,
    /// `METHOD /path?query` of every request.
    pub requests: Mutex<Vec<String>>,
    /// JSON bodies of create calls, keyed by path.
    pub bodies: Mutex<Vec<(String, Value)>>,
}

pub const GIB: u64 = 1024 * 1024 * 1024;

impl FakeState {
    /// Three containers (web running, db exited, worker restarting), one tagged and one
    /// dangling image, one volume used by web, one network.
    pub fn with_defaults() -> Arc<Self> {
        let now = chrono::Utc::now().timestamp();
        let state = FakeState::default();
        *state.containers.lock().unwrap() = json!([
            {
                "Id": "c1aaaaaaaaaaaaaaaa",
                "Names": ["/web"],
                "Image": "nginx:latest",
                "State": "running",
                "Status": "Up 1 hour",
                "Ports": [{ "IP": "0.0.0.0", "PrivatePort": 80, "PublicPort": 8080, "Type": "tcp" }],
                "Created": now - 3600,
                "Mounts": [{ "Type": "volume", "Name": "data", "Destination": "/data" }]
            },
            {
                "Id": "c2bbbbbbbbbbbbbbbb",
                "Names": ["/db"],
                "Image": "postgres:16",
                "State": "exited",
                "Status": "Exited (0) 2 hours ago",
                "Ports": [],
                "Created": now - 7200,
                "Mounts": []
            },
            {
                "Id": "c3cccccccccccccccc",
                "Names": ["/worker"],
                "Image": "worker:dev",
                "State": "restarting",
                "Status": "Restarting (1) 5 seconds ago",
                "Ports": null,
                "Created": now - 60,
                "Mounts": null
            }
        ]);
        state.stats.lock().unwrap().insert(
            "c1aaaaaaaaaaaaaaaa".into(),
            json!({
                "read": "2024-01-01T00:00:02Z",
                "preread": "2024-01-01T00:00:00Z",
                "cpu_stats": {
                    "cpu_usage": { "total_usage": 400_000_000u64 },
                    "system_cpu_usage": 2_000_000_000u64,
                    "online_cpus": 2
                },
                "precpu_stats": {
                    "cpu_usage": { "total_usage": 200_000_000u64 },
                    "system_cpu_usage": 1_000_000_000u64
                },
                "memory_stats": { "usage": 104_857_600u64, "limit": GIB },
                "networks": { "eth0": { "rx_bytes": 2_097_152u64, "tx_bytes": 1_048_576u64 } }
            }),
        );
        state.inspect.lock().unwrap().insert(
            "c1aaaaaaaaaaaaaaaa".into(),
            json!({
                "Id": "c1aaaaaaaaaaaaaaaa",
                "Name": "/web",
                "Created": "2024-01-01T00:00:00Z",
                "Config": { "Image": "nginx:latest", "Env": ["PATH=/usr/bin", "MODE=a=b"] },
                "State": { "Status": "running" },
                "HostConfig": { "RestartPolicy": { "Name": "unless-stopped" } },
                "Mounts": [{ "Type": "volume", "Name": "data", "Source": "/var/lib/docker/volumes/data/_data", "Destination": "/data" }],
                "NetworkSettings": {
                    "IPAddress": "",
                    "Ports": { "80/tcp": [{ "HostIp": "0.0.0.0", "HostPort": "8080" }] },
                    "Networks": { "bridge": { "IPAddress": "172.17.0.2", "Gateway": "172.17.0.1", "MacAddress": "02:42:ac:11:00:02" } }
                }
            }),
        );
        *state.images.lock().unwrap() = json!([
            image("sha256:1111111111111111", &["nginx:latest"], GIB, now - 2 * 86_400),
            image("sha256:2222222222222222", &[], 1024, now - 3600)
        ]);
        *state.volumes.lock().unwrap() = json!({
            "Volumes": [volume("data", 1_048_576)],
            "Warnings": null
        });
        *state.networks.lock().unwrap() = json!([
            { "Id": "abcdef0123456789", "Name": "bridge", "Driver": "bridge", "Scope": "local" }
        ]);
        *state.info.lock().unwrap() = json!({
            "Name": "harbor-host",
            "OperatingSystem": "Ubuntu 22.04.3 LTS",
            "ServerVersion": "24.0.7",
            "SystemTime": "2024-01-01T00:00:00.000000000Z",
            "Driver": "overlay2",
            "MemTotal": 8 * GIB
        });
        *state.disk_usage.lock().unwrap() = json!({
            "LayersSize": 3 * GIB,
            "Volumes": [volume("data", GIB)]
        });
        *state.events.lock().unwrap() = [
            json!({
                "Type": "container", "Action": "start", "status": "start", "id": "c1aaaaaaaaaaaaaaaa",
                "Actor": { "ID": "c1aaaaaaaaaaaaaaaa", "Attributes": { "name": "web", "image": "nginx:latest" } },
                "time": now - 120, "timeNano": (now - 120) * 1_000_000_000
            }),
            json!({
                "Type": "image", "Action": "pull", "id": "nginx:latest",
                "Actor": { "ID": "nginx:latest", "Attributes": { "name": "nginx" } },
                "time": now - 60, "timeNano": (now - 60) * 1_000_000_000
            }),
        ]
        .iter()
        .map(Value::to_string)
        .collect::<Vec<_>>()
        .join("\n");
        *state.logs.lock().unwrap() = frame(1, "2024-01-01T00:00:00.500000000Z server started\n");
        *state.pull_stream.lock().unwrap() = [
            r#"{"status":"Pulling from library/redis","id":"7"}"#,
            r#"{"status":"Status: Downloaded newer image for redis:7"}"#,
        ]
        .join("\n");
        Arc::new(state)
    }

    pub fn requests_matching(&self, prefix: &str) -> Vec<String> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.starts_with(prefix))
            .cloned()
            .collect()
    }
}

/// `GET /images/json` entry with every field the Engine always sends.
pub fn image(id: &str, tags: &[&str], size: u64, created: i64) -> Value {
    json!({
        "Id": id,
        "ParentId": "",
        "RepoTags": tags,
        "RepoDigests": [],
        "Created": created,
        "Size": size,
        "SharedSize": -1,
        "Labels": {},
        "Containers": -1
    })
}

/// Volume record as listed by `GET /volumes` and `GET /system/df`.
pub fn volume(name: &str, size: u64) -> Value {
    json!({
        "Name": name,
        "Driver": "local",
        "Mountpoint": format!("/var/lib/docker/volumes/{}/_data", name),
        "Labels": {},
        "Scope": "local",
        "Options": {},
        "UsageData": { "Size": size, "RefCount": 1 }
    })
}

/// One stdout/stderr frame of the Engine's multiplexed log format.
pub fn frame(stream: u8, body: &str) -> Vec<u8> {
    let mut out = vec![stream, 0, 0, 0];
    out.extend_from_slice(&(body.len() as u32).to_be_bytes());
    out.extend_from_slice(body.as_bytes());
    out
}

fn json_response(status: StatusCode, value: Value) -> Response {
    (status, axum::Json(value)).into_response()
}

fn engine_error(status: StatusCode, message: &str) -> Response {
    json_response(status, json!({ "message": message }))
}

fn raw_stream(body: Vec<u8>) -> Response {
    (
        [(header::CONTENT_TYPE, "application/vnd.docker.raw-stream")],
        body,
    )
        .into_response()
}

async fn handle(
    State(state): State<Arc<FakeState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let query = uri.query().map(|q| format!("?{}", q)).unwrap_or_default();
    state
        .requests
        .lock()
        .unwrap()
        .push(format!("{} {}{}", method, uri.path(), query));
    state.authorization.lock().unwrap().push(
        headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
    );
    if let Ok(value) = serde_json::from_slice::<Value>(&body) {
        state
            .bodies
            .lock()
            .unwrap()
            .push((uri.path().to_string(), value));
    }

    let segments: Vec<&str> = uri.path().trim_start_matches('/').split('/').collect();
    match (method.as_str(), segments.as_slice()) {
        ("GET", ["containers", "json"]) => {
            if state.fail_containers.load(Ordering::SeqCst) {
                return engine_error(StatusCode::INTERNAL_SERVER_ERROR, "daemon unavailable");
            }
            json_response(StatusCode::OK, state.containers.lock().unwrap().clone())
        }
        ("POST", ["containers", "create"]) => json_response(
            StatusCode::CREATED,
            json!({ "Id": "created0123456789", "Warnings": [] }),
        ),
        ("POST", ["containers", "prune"]) => json_response(
            StatusCode::OK,
            json!({ "ContainersDeleted": ["c2bbbbbbbbbbbbbbbb"], "SpaceReclaimed": 1024 }),
        ),
        ("GET", ["containers", id, "json"]) => match state.inspect.lock().unwrap().get(*id) {
            Some(doc) => json_response(StatusCode::OK, doc.clone()),
            None => engine_error(StatusCode::NOT_FOUND, &format!("No such container: {}", id)),
        },
        ("GET", ["containers", id, "stats"]) => {
            let now = state.stats_in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            state.stats_max_in_flight.fetch_max(now, Ordering::SeqCst);
            let delay = state.stats_delay_ms.load(Ordering::SeqCst);
            if delay > 0 {
                tokio::time::sleep(Duration::from_millis(delay)).await;
            }
            state.stats_in_flight.fetch_sub(1, Ordering::SeqCst);
            if state.failing_stats.lock().unwrap().contains(*id) {
                return engine_error(StatusCode::INTERNAL_SERVER_ERROR, "stats unavailable");
            }
            let stats = state.stats.lock().unwrap().get(*id).cloned();
            json_response(StatusCode::OK, stats.unwrap_or_else(|| json!({})))
        }
        ("GET", ["containers", _, "logs"]) => raw_stream(state.logs.lock().unwrap().clone()),
        ("POST", ["containers", _, "start" | "stop" | "restart"]) => {
            StatusCode::NO_CONTENT.into_response()
        }
        ("POST", ["containers", _, "exec"]) => {
            json_response(StatusCode::CREATED, json!({ "Id": "exec0123456789" }))
        }
        ("DELETE", ["containers", _]) => StatusCode::NO_CONTENT.into_response(),
        ("POST", ["exec", _, "start"]) => raw_stream(b"total 0\r\nbin\r\n".to_vec()),
        ("GET", ["images", "json"]) => {
            json_response(StatusCode::OK, state.images.lock().unwrap().clone())
        }
        ("POST", ["images", "create"]) => (
            [(header::CONTENT_TYPE, "application/json")],
            state.pull_stream.lock().unwrap().clone(),
        )
            .into_response(),
        ("POST", ["images", "prune"]) => json_response(
            StatusCode::OK,
            json!({
                "ImagesDeleted": [{ "Untagged": "old:1" }, { "Deleted": "sha256:2222222222222222" }],
                "SpaceReclaimed": 2048
            }),
        ),
        ("DELETE", ["images", _]) => json_response(StatusCode::OK, json!([{ "Deleted": "x" }])),
        ("GET", ["volumes"]) => json_response(StatusCode::OK, state.volumes.lock().unwrap().clone()),
        ("POST", ["volumes", "create"]) => {
            let request: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
            json_response(
                StatusCode::CREATED,
                json!({ "Name": request["Name"], "Driver": request["Driver"], "Mountpoint": "/var/lib/docker/volumes" }),
            )
        }
        ("DELETE", ["volumes", _]) => StatusCode::NO_CONTENT.into_response(),
        ("GET", ["networks"]) => {
            json_response(StatusCode::OK, state.networks.lock().unwrap().clone())
        }
        ("POST", ["networks", "create"]) => {
            json_response(StatusCode::CREATED, json!({ "Id": "net0123456789", "Warning": "" }))
        }
        ("POST", ["networks", "prune"]) => {
            json_response(StatusCode::OK, json!({ "NetworksDeleted": ["frontend"] }))
        }
        ("DELETE", ["networks", _]) => StatusCode::NO_CONTENT.into_response(),
        ("GET", ["info"]) => {
            if state.fail_info.load(Ordering::SeqCst) {
                return engine_error(StatusCode::INTERNAL_SERVER_ERROR, "info unavailable");
            }
            json_response(StatusCode::OK, state.info.lock().unwrap().clone())
        }
        ("GET", ["system", "df"]) => {
            json_response(StatusCode::OK, state.disk_usage.lock().unwrap().clone())
        }
        ("GET", ["events"]) => {
            if state.fail_events.load(Ordering::SeqCst) {
                return engine_error(StatusCode::INTERNAL_SERVER_ERROR, "events unavailable");
            }
            (
                [(header::CONTENT_TYPE, "application/json")],
                state.events.lock().unwrap().clone(),
            )
                .into_response()
        }
        _ => engine_error(StatusCode::NOT_FOUND, "page not found"),
    }
}

pub struct FakeEngine {
    pub base_url: String,
    pub state: Arc<FakeState>,
}

impl FakeEngine {
    pub async fn start(state: Arc<FakeState>) -> Self {
        let app = Router::new().fallback(handle).with_state(state.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        Self {
            base_url: format!("http://{}", addr),
            state,
        }
    }

    pub async fn with_defaults() -> Self {
        Self::start(FakeState::with_defaults()).await
    }

    /// Config pointing at this engine; `extra` is appended to the `[engine]` section.
    pub fn config(&self, extra: &str) -> AppConfig {
        AppConfig::load_from_str(&format!(
            "[engine]\nbase_url = \"{}\"\n{}\n",
            self.base_url, extra
        ))
        .unwrap()
    }

    pub fn client(&self, extra: &str) -> EngineClient {
        EngineClient::new(&self.config(extra).engine).unwrap()
    }
}
