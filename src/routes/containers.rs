// Container listing, details, lifecycle, exec, logs and event history

use axum::{
    Json,
    extract::{Path, Query, State, rejection::{JsonRejection, QueryRejection}},
};
use chrono::{Duration, Utc};
use serde_json::{Value, json};

use super::{ApiResult, AppState, ok, required};
use crate::aggregator::gather_containers_with_stats;
use crate::engine::options::{container_events_between, timestamped_logs};
use crate::error::ApiError;
use crate::events::parse_container_events;
use crate::logs::parse_log_entries;
use crate::models::{
    Container, ContainerDetails, ContainerEvent, CreateContainerRequest, ExecRequest, LogEntry,
    LogsQuery,
};
use crate::transform::{build_container_details, build_create_payload, build_exec_payload};

const DEFAULT_LOG_TAIL: u32 = 200;
const EVENT_HISTORY_DAYS: i64 = 7;

pub(super) async fn list(State(state): State<AppState>) -> ApiResult<Vec<Container>> {
    let snapshot = gather_containers_with_stats(&state.engine).await?;
    ok(snapshot.containers)
}

/// Inspect is required; a stats failure only zeroes the live figures.
pub(super) async fn details(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<ContainerDetails> {
    let (inspected, stats) = tokio::join!(
        state.engine.inspect_container(&id),
        state.engine.container_stats(&id)
    );
    let inspected = inspected?;
    let stats = stats
        .inspect_err(|e| tracing::warn!(container_id = %id, error = %e, "Failed to fetch container stats"))
        .ok();
    ok(build_container_details(
        inspected,
        stats.as_ref().map(|s| &s.stats),
        Utc::now(),
    ))
}

pub(super) async fn create(
    State(state): State<AppState>,
    body: Result<Json<CreateContainerRequest>, JsonRejection>,
) -> ApiResult<Value> {
    let Json(request) = body?;
    let image = required(&request.image, "Image is required")?;
    let name = request.name.as_deref().filter(|n| !n.trim().is_empty());

    let payload = build_create_payload(&request, image);
    let created = state.engine.create_container(payload, name).await?;
    if request.should_start() {
        state.engine.start_container(&created.id).await?;
    }
    tracing::info!(container_id = %created.id, image, "container created");
    ok(json!({ "id": created.id }))
}

pub(super) async fn lifecycle(
    State(state): State<AppState>,
    Path((id, action)): Path<(String, String)>,
) -> ApiResult<Value> {
    match action.as_str() {
        "start" => state.engine.start_container(&id).await?,
        "stop" => state.engine.stop_container(&id).await?,
        "restart" => state.engine.restart_container(&id).await?,
        _ => return Err(ApiError::bad_request("Unsupported action")),
    }
    ok(json!({ "id": id, "action": action }))
}

pub(super) async fn remove(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Value> {
    state.engine.remove_container(&id, true).await?;
    ok(json!({ "id": id }))
}

pub(super) async fn exec(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<ExecRequest>, JsonRejection>,
) -> ApiResult<Value> {
    let Json(request) = body?;
    let command = required(&request.command, "Command is required")?;
    let instance = state
        .engine
        .create_exec(&id, build_exec_payload(command))
        .await?;
    let output = state.engine.start_exec(&instance.id).await?;
    ok(json!({ "output": output }))
}

pub(super) async fn logs(
    State(state): State<AppState>,
    Path(id): Path<String>,
    query: Result<Query<LogsQuery>, QueryRejection>,
) -> ApiResult<Vec<LogEntry>> {
    let Query(query) = query?;
    let options = timestamped_logs(query.tail.unwrap_or(DEFAULT_LOG_TAIL), query.since);
    let bytes = state.engine.container_logs(&id, &options).await?;
    ok(parse_log_entries(&bytes))
}

pub(super) async fn events(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Vec<ContainerEvent>> {
    let now = Utc::now();
    let since = now - Duration::days(EVENT_HISTORY_DAYS);
    let options = container_events_between(&id, since.timestamp(), now.timestamp());
    let payload = state.engine.events(&options).await?;
    ok(parse_container_events(&payload, now))
}
