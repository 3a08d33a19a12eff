// Docker Engine API client over HTTP(S) via reqwest

mod auth;
pub mod options;
pub mod raw;

pub use auth::EngineAuth;

use bytes::Bytes;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap};
use reqwest::{Method, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, instrument};

use crate::config::EngineConfig;
use crate::error::EngineError;
use options::*;
use raw::*;

/// Request body for an Engine call.
#[derive(Debug, Clone, Default)]
pub enum RequestBody {
    #[default]
    Empty,
    /// Serialized as JSON with `Content-Type: application/json`.
    Json(serde_json::Value),
    /// Sent as-is (tar archives, pre-encoded payloads).
    Bytes(Bytes),
}

/// Decoded response: JSON when the Engine says so, otherwise text.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineResponse {
    Json(serde_json::Value),
    Text(String),
}

impl EngineResponse {
    pub fn into_typed<T: DeserializeOwned>(self) -> Result<T, EngineError> {
        match self {
            EngineResponse::Json(v) => Ok(serde_json::from_value(v)?),
            EngineResponse::Text(t) => Ok(serde_json::from_str(&t)?),
        }
    }

    pub fn into_value(self) -> serde_json::Value {
        match self {
            EngineResponse::Json(v) => v,
            EngineResponse::Text(t) if t.trim().is_empty() => serde_json::Value::Null,
            EngineResponse::Text(t) => serde_json::from_str(&t).unwrap_or(serde_json::Value::String(t)),
        }
    }
}

/// Parsed inspect record plus the untouched document.
#[derive(Debug, Clone)]
pub struct InspectedContainer {
    pub parsed: ContainerInspectResponse,
    pub document: serde_json::Value,
}

/// Combined result of the individual prune endpoints.
#[derive(Debug, Clone, Default)]
pub struct PruneTotals {
    pub containers_deleted: Vec<String>,
    pub images_deleted: Vec<String>,
    pub networks_deleted: Vec<String>,
    pub space_reclaimed: u64,
}

pub struct EngineClient {
    http: reqwest::Client,
    base_url: Url,
    auth: Option<EngineAuth>,
}

impl EngineClient {
    pub fn new(config: &EngineConfig) -> Result<Self, EngineError> {
        let trimmed = config.base_url.trim_end_matches('/');
        let base_url =
            Url::parse(trimmed).map_err(|e| EngineError::InvalidUrl(format!("{}: {}", trimmed, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(EngineError::InvalidUrl(trimmed.to_string()));
        }
        let http = reqwest::Client::builder()
            .danger_accept_invalid_certs(config.allow_insecure)
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        let auth = config.auth();
        tracing::info!(
            base_url = %base_url,
            auth = auth.as_ref().map_or("none", EngineAuth::mode),
            allow_insecure = config.allow_insecure,
            "Engine client configured"
        );
        Ok(Self {
            http,
            base_url,
            auth,
        })
    }

    fn url(&self, segments: &[&str]) -> Result<Url, EngineError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| EngineError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn send<Q: Serialize + ?Sized>(
        &self,
        method: Method,
        segments: &[&str],
        query: &Q,
        body: RequestBody,
        headers: HeaderMap,
    ) -> Result<reqwest::Response, EngineError> {
        let url = self.url(segments)?;
        let caller_auth = headers.contains_key(AUTHORIZATION);
        let mut builder = self
            .http
            .request(method.clone(), url)
            .query(query)
            .headers(headers);
        if !caller_auth && let Some(auth) = &self.auth {
            builder = auth.apply(builder);
        }
        builder = match body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(&value),
            RequestBody::Bytes(bytes) => builder.body(bytes),
        };

        let response = builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            debug!(%method, path = %segments.join("/"), status = status.as_u16(), "Engine API error");
            return Err(EngineError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    /// Issue a request; JSON content types are parsed, anything else is returned as text.
    pub async fn request<Q: Serialize + ?Sized>(
        &self,
        method: Method,
        segments: &[&str],
        query: &Q,
        body: RequestBody,
        headers: HeaderMap,
    ) -> Result<EngineResponse, EngineError> {
        let response = self.send(method, segments, query, body, headers).await?;
        let is_json = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.contains("application/json"));
        let text = response.text().await?;
        if is_json && !text.trim().is_empty() {
            Ok(EngineResponse::Json(serde_json::from_str(&text)?))
        } else {
            Ok(EngineResponse::Text(text))
        }
    }

    /// Issue a request and return the body untouched (logs, events, pull progress, exec output).
    pub async fn request_raw<Q: Serialize + ?Sized>(
        &self,
        method: Method,
        segments: &[&str],
        query: &Q,
        body: RequestBody,
    ) -> Result<Bytes, EngineError> {
        let response = self
            .send(method, segments, query, body, HeaderMap::new())
            .await?;
        Ok(response.bytes().await?)
    }

    async fn get<T: DeserializeOwned, Q: Serialize + ?Sized>(
        &self,
        segments: &[&str],
        query: &Q,
    ) -> Result<T, EngineError> {
        self.request(Method::GET, segments, query, RequestBody::Empty, HeaderMap::new())
            .await?
            .into_typed()
    }

    async fn call<Q: Serialize + ?Sized>(
        &self,
        method: Method,
        segments: &[&str],
        query: &Q,
        body: RequestBody,
    ) -> Result<EngineResponse, EngineError> {
        self.request(method, segments, query, body, HeaderMap::new())
            .await
    }

    // --- containers ---

    #[instrument(skip(self), fields(operation = "list_containers"))]
    pub async fn list_containers(&self, all: bool) -> Result<Vec<ContainerSummary>, EngineError> {
        let options = ListContainersOptions {
            all,
            ..Default::default()
        };
        self.get(&["containers", "json"], &options).await
    }

    #[instrument(skip(self), fields(operation = "inspect_container"))]
    pub async fn inspect_container(&self, id: &str) -> Result<InspectedContainer, EngineError> {
        let document: serde_json::Value = self.get(&["containers", id, "json"], NO_QUERY).await?;
        let parsed = serde_json::from_value(document.clone())?;
        Ok(InspectedContainer { parsed, document })
    }

    /// One-shot stats sample (the Engine fills `precpu_stats` from its previous read).
    #[instrument(skip(self), fields(operation = "container_stats"))]
    pub async fn container_stats(&self, id: &str) -> Result<StatsSample, EngineError> {
        let options = StatsOptions {
            stream: false,
            ..Default::default()
        };
        let document: serde_json::Value =
            self.get(&["containers", id, "stats"], &options).await?;
        Ok(StatsSample::from_document(document)?)
    }

    pub async fn container_logs(&self, id: &str, options: &LogsOptions) -> Result<Bytes, EngineError> {
        self.request_raw(
            Method::GET,
            &["containers", id, "logs"],
            options,
            RequestBody::Empty,
        )
        .await
    }

    pub async fn start_container(&self, id: &str) -> Result<(), EngineError> {
        self.call(Method::POST, &["containers", id, "start"], NO_QUERY, RequestBody::Empty)
            .await?;
        Ok(())
    }

    pub async fn stop_container(&self, id: &str) -> Result<(), EngineError> {
        self.call(Method::POST, &["containers", id, "stop"], NO_QUERY, RequestBody::Empty)
            .await?;
        Ok(())
    }

    pub async fn restart_container(&self, id: &str) -> Result<(), EngineError> {
        self.call(Method::POST, &["containers", id, "restart"], NO_QUERY, RequestBody::Empty)
            .await?;
        Ok(())
    }

    pub async fn remove_container(&self, id: &str, force: bool) -> Result<(), EngineError> {
        self.call(
            Method::DELETE,
            &["containers", id],
            &RemoveContainerOptions {
                force,
                ..Default::default()
            },
            RequestBody::Empty,
        )
        .await?;
        Ok(())
    }

    pub async fn create_container(
        &self,
        payload: serde_json::Value,
        name: Option<&str>,
    ) -> Result<IdResponse, EngineError> {
        let options = CreateContainerOptions {
            name: name.map(str::to_string),
            ..Default::default()
        };
        self.call(
            Method::POST,
            &["containers", "create"],
            &options,
            RequestBody::Json(payload),
        )
        .await?
        .into_typed()
    }

    pub async fn prune_containers(&self) -> Result<ContainerPruneResponse, EngineError> {
        self.call(Method::POST, &["containers", "prune"], NO_QUERY, RequestBody::Empty)
            .await?
            .into_typed()
    }

    // --- exec ---

    pub async fn create_exec(
        &self,
        container_id: &str,
        payload: serde_json::Value,
    ) -> Result<IdResponse, EngineError> {
        self.call(
            Method::POST,
            &["containers", container_id, "exec"],
            NO_QUERY,
            RequestBody::Json(payload),
        )
        .await?
        .into_typed()
    }

    /// Start an exec attached with a TTY and return its combined output.
    pub async fn start_exec(&self, exec_id: &str) -> Result<String, EngineError> {
        let bytes = self
            .request_raw(
                Method::POST,
                &["exec", exec_id, "start"],
                NO_QUERY,
                RequestBody::Json(serde_json::json!({ "Detach": false, "Tty": true })),
            )
            .await?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    // --- images ---

    #[instrument(skip(self), fields(operation = "list_images"))]
    pub async fn list_images(&self) -> Result<Vec<ImageSummary>, EngineError> {
        self.get(&["images", "json"], &ListImagesOptions::default())
            .await
    }

    pub async fn remove_image(&self, id: &str, force: bool) -> Result<(), EngineError> {
        self.call(
            Method::DELETE,
            &["images", id],
            &RemoveImageOptions {
                force,
                ..Default::default()
            },
            RequestBody::Empty,
        )
        .await?;
        Ok(())
    }

    /// Pull an image; returns the raw NDJSON progress stream. The Engine answers 200 even
    /// when the pull fails, so an `error` line in the stream is turned into `Stream`.
    #[instrument(skip(self), fields(operation = "pull_image"))]
    pub async fn pull_image(&self, image: &str, tag: Option<&str>) -> Result<String, EngineError> {
        let options = CreateImageOptions {
            from_image: Some(image.to_string()),
            tag: tag.map(str::to_string),
            ..Default::default()
        };
        let bytes = self
            .request_raw(Method::POST, &["images", "create"], &options, RequestBody::Empty)
            .await?;
        let progress = String::from_utf8_lossy(&bytes).into_owned();
        match stream_error(&progress) {
            Some(message) => Err(EngineError::Stream(message)),
            None => Ok(progress),
        }
    }

    pub async fn prune_images(&self) -> Result<serde_json::Value, EngineError> {
        Ok(self
            .call(Method::POST, &["images", "prune"], NO_QUERY, RequestBody::Empty)
            .await?
            .into_value())
    }

    // --- volumes ---

    #[instrument(skip(self), fields(operation = "list_volumes"))]
    pub async fn list_volumes(&self) -> Result<VolumeListResponse, EngineError> {
        self.get(&["volumes"], NO_QUERY).await
    }

    pub async fn create_volume(
        &self,
        payload: serde_json::Value,
    ) -> Result<serde_json::Value, EngineError> {
        Ok(self
            .call(
                Method::POST,
                &["volumes", "create"],
                NO_QUERY,
                RequestBody::Json(payload),
            )
            .await?
            .into_value())
    }

    pub async fn remove_volume(&self, name: &str, force: bool) -> Result<(), EngineError> {
        self.call(
            Method::DELETE,
            &["volumes", name],
            &RemoveVolumeOptions {
                force,
                ..Default::default()
            },
            RequestBody::Empty,
        )
        .await?;
        Ok(())
    }

    // --- networks ---

    #[instrument(skip(self), fields(operation = "list_networks"))]
    pub async fn list_networks(&self) -> Result<Vec<Network>, EngineError> {
        self.get(&["networks"], NO_QUERY).await
    }

    pub async fn create_network(
        &self,
        payload: serde_json::Value,
    ) -> Result<serde_json::Value, EngineError> {
        Ok(self
            .call(
                Method::POST,
                &["networks", "create"],
                NO_QUERY,
                RequestBody::Json(payload),
            )
            .await?
            .into_value())
    }

    pub async fn remove_network(&self, id: &str) -> Result<(), EngineError> {
        self.call(Method::DELETE, &["networks", id], NO_QUERY, RequestBody::Empty)
            .await?;
        Ok(())
    }

    pub async fn prune_networks(&self) -> Result<NetworkPruneResponse, EngineError> {
        self.call(Method::POST, &["networks", "prune"], NO_QUERY, RequestBody::Empty)
            .await?
            .into_typed()
    }

    // --- system ---

    /// Stopped containers, unused networks and dangling images, pruned in that order.
    /// The Engine has no single endpoint for this; the first failure aborts.
    #[instrument(skip(self), fields(operation = "system_prune"))]
    pub async fn system_prune(&self) -> Result<PruneTotals, EngineError> {
        let containers = self.prune_containers().await?;
        let networks = self.prune_networks().await?;
        let images: ImagePruneResponse = self
            .call(Method::POST, &["images", "prune"], NO_QUERY, RequestBody::Empty)
            .await?
            .into_typed()?;

        let images_deleted = images
            .images_deleted
            .unwrap_or_default()
            .into_iter()
            .filter_map(|item| item.deleted.or(item.untagged))
            .collect();
        let reclaimed = |bytes: Option<i64>| bytes.unwrap_or(0).max(0) as u64;
        Ok(PruneTotals {
            containers_deleted: containers.containers_deleted.unwrap_or_default(),
            images_deleted,
            networks_deleted: networks.networks_deleted.unwrap_or_default(),
            space_reclaimed: reclaimed(containers.space_reclaimed) + reclaimed(images.space_reclaimed),
        })
    }

    #[instrument(skip(self), fields(operation = "disk_usage"))]
    pub async fn disk_usage(&self) -> Result<SystemDataUsageResponse, EngineError> {
        self.get(&["system", "df"], NO_QUERY).await
    }

    #[instrument(skip(self), fields(operation = "info"))]
    pub async fn info(&self) -> Result<SystemInfo, EngineError> {
        self.get(&["info"], NO_QUERY).await
    }

    /// Event stream between `since` and `until`, as NDJSON text.
    #[instrument(skip(self), fields(operation = "events"))]
    pub async fn events(&self, options: &EventsOptions) -> Result<String, EngineError> {
        let bytes = self
            .request_raw(Method::GET, &["events"], options, RequestBody::Empty)
            .await?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

/// First `{"error": ...}` line of an NDJSON progress stream.
pub fn stream_error(progress: &str) -> Option<String> {
    progress
        .lines()
        .filter_map(|line| serde_json::from_str::<serde_json::Value>(line).ok())
        .find_map(|v| v.get("error").and_then(|e| e.as_str()).map(str::to_string))
}
