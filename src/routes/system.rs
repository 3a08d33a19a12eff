// Health, overview, system prune and client error reports

use axum::extract::State;
use axum::Json;
use serde_json::{Value, json};

use super::{ApiResult, AppState, ok};
use crate::metrics::human_file_size;
use crate::models::{OverviewPayload, PruneReport};
use crate::overview::compose_overview;
use crate::version::Health;

/// GET /api/health: service name and version (from Cargo.toml at build time).
pub(super) async fn health() -> ApiResult<Health> {
    ok(Health::ok())
}

pub(super) async fn overview(State(state): State<AppState>) -> ApiResult<OverviewPayload> {
    let payload = compose_overview(&state.engine, state.config.overview.disk_total_gb).await?;
    ok(payload)
}

pub(super) async fn prune(State(state): State<AppState>) -> ApiResult<PruneReport> {
    let totals = state.engine.system_prune().await?;
    tracing::info!(
        containers = totals.containers_deleted.len(),
        images = totals.images_deleted.len(),
        networks = totals.networks_deleted.len(),
        space_reclaimed = totals.space_reclaimed,
        "system prune finished"
    );
    ok(PruneReport {
        space_reclaimed_human: human_file_size(totals.space_reclaimed as f64),
        containers_deleted: totals.containers_deleted,
        images_deleted: totals.images_deleted,
        networks_deleted: totals.networks_deleted,
        space_reclaimed: totals.space_reclaimed,
    })
}

/// POST /api/client-errors: the dashboard reports its own failures here; any JSON is accepted.
pub(super) async fn client_error(body: Option<Json<Value>>) -> ApiResult<Value> {
    let report = body.map(|Json(v)| v).unwrap_or(Value::Null);
    tracing::error!(report = %report, "client error");
    ok(json!({ "logged": true }))
}
