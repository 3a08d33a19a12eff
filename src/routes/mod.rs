// HTTP routes, all nested under /api and answering with the JSON envelope

mod containers;
mod images;
mod networks;
mod system;
mod volumes;

use axum::{
    Json, Router,
    routing::{delete, get, post},
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::AppConfig;
use crate::engine::EngineClient;
use crate::error::ApiError;
use crate::models::ApiResponse;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) engine: Arc<EngineClient>,
    pub(crate) config: Arc<AppConfig>,
}

type ApiResult<T> = Result<Json<ApiResponse<T>>, ApiError>;

fn ok<T>(data: T) -> ApiResult<T> {
    Ok(Json(ApiResponse::ok(data)))
}

/// Trimmed, non-empty text field of a request body.
fn required<'a>(value: &'a Option<String>, message: &str) -> Result<&'a str, ApiError> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::bad_request(message))
}

pub fn app(engine: Arc<EngineClient>, config: AppConfig) -> Router {
    let state = AppState {
        engine,
        config: Arc::new(config),
    };
    let api = Router::new()
        .route("/health", get(system::health)) // GET /api/health
        .route("/overview", get(system::overview)) // GET /api/overview
        .route("/system/prune", post(system::prune)) // POST /api/system/prune
        .route("/client-errors", post(system::client_error)) // POST /api/client-errors
        .route("/containers", get(containers::list).post(containers::create))
        .route(
            "/containers/{id}",
            get(containers::details).delete(containers::remove),
        )
        .route("/containers/{id}/exec", post(containers::exec))
        .route("/containers/{id}/logs", get(containers::logs))
        .route("/containers/{id}/events", get(containers::events))
        .route("/containers/{id}/{action}", post(containers::lifecycle))
        .route("/images", get(images::list))
        .route("/images/pull", post(images::pull))
        .route("/images/prune", post(images::prune))
        .route("/images/{id}", delete(images::remove))
        .route("/volumes", get(volumes::list).post(volumes::create))
        .route("/volumes/{name}", delete(volumes::remove))
        .route("/networks", get(networks::list).post(networks::create))
        .route("/networks/{id}", delete(networks::remove));

    Router::new()
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::new().allow_origin(Any).allow_headers(Any).allow_methods(Any))
        .with_state(state)
}
