// Image listing, pull, prune and removal

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
};
use chrono::Utc;
use serde_json::{Value, json};

use super::{ApiResult, AppState, ok, required};
use crate::models::{DockerImage, PullRequest};
use crate::transform::{build_images, split_reference};

pub(super) async fn list(State(state): State<AppState>) -> ApiResult<Vec<DockerImage>> {
    let raw = state.engine.list_images().await?;
    ok(build_images(&raw, Utc::now()))
}

/// Last non-empty line of the pull progress stream, as the Engine sent it.
fn pull_summary(progress: &str) -> String {
    progress
        .lines()
        .map(str::trim)
        .rfind(|line| !line.is_empty())
        .unwrap_or("pulled")
        .to_string()
}

pub(super) async fn pull(
    State(state): State<AppState>,
    body: Result<Json<PullRequest>, JsonRejection>,
) -> ApiResult<Value> {
    let Json(request) = body?;
    let reference = required(&request.reference, "reference is required")?;
    let (image, tag) = split_reference(reference);
    let progress = state.engine.pull_image(image, Some(tag)).await?;
    tracing::info!(image, tag, "image pulled");
    ok(json!({ "message": pull_summary(&progress) }))
}

pub(super) async fn prune(State(state): State<AppState>) -> ApiResult<Value> {
    ok(state.engine.prune_images().await?)
}

pub(super) async fn remove(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Value> {
    state.engine.remove_image(&id, true).await?;
    ok(json!({ "id": id }))
}
