// Network listing, creation and removal

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
};
use serde_json::{Value, json};

use super::{ApiResult, AppState, ok, required};
use crate::models::{CreateResourceRequest, DockerNetwork};
use crate::transform::build_networks;

pub(super) async fn list(State(state): State<AppState>) -> ApiResult<Vec<DockerNetwork>> {
    let raw = state.engine.list_networks().await?;
    ok(build_networks(&raw))
}

pub(super) async fn create(
    State(state): State<AppState>,
    body: Result<Json<CreateResourceRequest>, JsonRejection>,
) -> ApiResult<Value> {
    let Json(request) = body?;
    let name = required(&request.name, "name is required")?;
    let driver = request.driver.as_deref().unwrap_or("bridge");
    let result = state
        .engine
        .create_network(json!({ "Name": name, "Driver": driver }))
        .await?;
    ok(result)
}

pub(super) async fn remove(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Value> {
    state.engine.remove_network(&id).await?;
    ok(json!({ "id": id }))
}
