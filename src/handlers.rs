use std::sync::Arc;

use axum::extract::{MatchedPath, Request, State};
use axum::http::{header, HeaderName, HeaderValue, StatusCode};
use axum::middleware::{self, Next};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use tower_http::set_header::SetResponseHeaderLayer;

use crate::config::Config;
use crate::error::AppError;
use crate::metrics;
use crate::pipeline::Pipeline;
use crate::types::IsAliveResponse;

pub const ALLOW_METHODS: &str = "POST, GET, OPTIONS, PUT, DELETE";
pub const ALLOW_HEADERS: &str =
    "Accept, Content-Type, Content-Length, Accept-Encoding, X-CSRF-Token, Authorization";

pub struct AppState {
    pub config: Arc<Config>,
    pub pipeline: Pipeline,
}

pub async fn send_payload(
    State(state): State<Arc<AppState>>,
    req: Request,
) -> impl IntoResponse {
    state.pipeline.handle(Some(req.into_body())).await
}

pub async fn preflight() -> StatusCode {
    StatusCode::OK
}

pub async fn is_alive(State(state): State<Arc<AppState>>) -> Json<IsAliveResponse> {
    Json(IsAliveResponse {
        version: state.config.version.clone(),
        name: state.config.name.clone(),
    })
}

pub async fn export_metrics() -> Result<impl IntoResponse, AppError> {
    let body = metrics::render()?;
    Ok(([(header::CONTENT_TYPE, "text/plain; version=0.0.4")], body))
}

async fn track_duration(req: Request, next: Next) -> impl IntoResponse {
    let path = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| req.uri().path().to_string());

    let timer = metrics::HTTP_DURATION
        .with_label_values(&[path.as_str()])
        .start_timer();
    let response = next.run(req).await;
    timer.observe_duration();
    response
}

fn header_layer(name: HeaderName, value: &'static str) -> SetResponseHeaderLayer<HeaderValue> {
    SetResponseHeaderLayer::overriding(name, HeaderValue::from_static(value))
}

// `/metrics` keeps its own text content type.
fn content_type_layer() -> SetResponseHeaderLayer<HeaderValue> {
    SetResponseHeaderLayer::if_not_present(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    )
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/v1/publish", post(send_payload).options(preflight))
        .route("/api/v1/isalive", get(is_alive))
        .route("/metrics", get(export_metrics))
        .route_layer(middleware::from_fn(track_duration))
        .layer(content_type_layer())
        .layer(header_layer(header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"))
        .layer(header_layer(header::ACCESS_CONTROL_ALLOW_METHODS, ALLOW_METHODS))
        .layer(header_layer(header::ACCESS_CONTROL_ALLOW_HEADERS, ALLOW_HEADERS))
        .with_state(state)
}
