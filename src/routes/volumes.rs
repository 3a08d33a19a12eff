// Volume listing, creation and removal

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
};
use serde_json::{Value, json};

use super::{ApiResult, AppState, ok, required};
use crate::models::{CreateResourceRequest, DockerVolume};
use crate::transform::build_volumes;

/// Volumes with the containers that mount them; both lists are fetched together.
pub(super) async fn list(State(state): State<AppState>) -> ApiResult<Vec<DockerVolume>> {
    let (volumes, containers) = tokio::try_join!(
        state.engine.list_volumes(),
        state.engine.list_containers(true)
    )?;
    ok(build_volumes(
        volumes.volumes.as_deref().unwrap_or_default(),
        &containers,
    ))
}

pub(super) async fn create(
    State(state): State<AppState>,
    body: Result<Json<CreateResourceRequest>, JsonRejection>,
) -> ApiResult<Value> {
    let Json(request) = body?;
    let name = required(&request.name, "name is required")?;
    let driver = request.driver.as_deref().unwrap_or("local");
    let result = state
        .engine
        .create_volume(json!({ "Name": name, "Driver": driver }))
        .await?;
    ok(result)
}

pub(super) async fn remove(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> ApiResult<Value> {
    state.engine.remove_volume(&name, true).await?;
    ok(json!({ "name": name }))
}
