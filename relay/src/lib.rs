//! HTTP read API and stream adapter for the carstate relay.
//!
//! The relay subscribes to the TeslaMate MQTT topics, keeps the latest value
//! of every whitelisted field per car, and serves those snapshots as JSON:
//!
//! - `GET /cars` — `{ "<id>": "<display name>" }`
//! - `GET /car/{id}` — the car's snapshot plus `"response": null`
//!
//! When an API key is configured every route requires `?api_key=<key>`.

pub mod config;
pub mod stream;

use axum::{
    Router,
    extract::{Path, Query, Request, State, rejection::QueryRejection},
    http::{StatusCode, header},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
};
use carstate_store::SnapshotStore;
use carstate_types::Snapshot;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info};

pub use config::{Args, BrokerConfig, RelayConfig};
pub use stream::{StreamError, StreamSubscriber};

const JSON_CONTENT_TYPE: &str = "application/json; charset=UTF-8";

/// Body of `GET /car/{id}`: the snapshot with a `response: null` sentinel.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct CarResponse {
    pub response: Option<String>,
    #[serde(flatten)]
    pub snapshot: Snapshot,
}

/// Body of error responses.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct MessageResponse {
    pub response: String,
}

impl MessageResponse {
    fn new(message: &str) -> Self {
        Self {
            response: message.to_string(),
        }
    }
}

#[derive(Deserialize)]
struct ApiKeyQuery {
    api_key: Option<String>,
}

fn json_response<T: Serialize>(status: StatusCode, body: &T) -> Response {
    match serde_json::to_vec(body) {
        Ok(bytes) => (status, [(header::CONTENT_TYPE, JSON_CONTENT_TYPE)], bytes).into_response(),
        Err(e) => {
            error!("Failed to encode response: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

async fn cars_handler(State(store): State<Arc<SnapshotStore>>) -> Response {
    let names = store.display_names().await;
    json_response(StatusCode::OK, &names)
}

async fn car_handler(
    State(store): State<Arc<SnapshotStore>>,
    Path(id): Path<String>,
) -> Response {
    match store.get(&id).await {
        Some(snapshot) => json_response(
            StatusCode::OK,
            &CarResponse {
                response: None,
                snapshot,
            },
        ),
        None => json_response(StatusCode::NOT_FOUND, &MessageResponse::new("invalid id")),
    }
}

async fn require_api_key(
    State(expected): State<Arc<str>>,
    query: Result<Query<ApiKeyQuery>, QueryRejection>,
    request: Request,
    next: Next,
) -> Response {
    let provided = query.ok().and_then(|Query(q)| q.api_key);
    if provided.as_deref() != Some(&*expected) {
        return json_response(
            StatusCode::UNAUTHORIZED,
            &MessageResponse::new("invalid or missing api_key"),
        );
    }
    next.run(request).await
}

async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let started = Instant::now();

    let response = next.run(request).await;

    info!(
        "{} {} {} in {:?}",
        method,
        path,
        response.status().as_u16(),
        started.elapsed()
    );
    response
}

/// Build the HTTP API router over the given store.
///
/// `api_key` of `None` (or empty) serves without authentication.
pub fn build_router(store: Arc<SnapshotStore>, api_key: Option<&str>) -> Router {
    let mut router = Router::new()
        .route("/cars", get(cars_handler))
        .route("/car/{id}", get(car_handler))
        .with_state(store);

    if let Some(key) = api_key.filter(|key| !key.is_empty()) {
        let key: Arc<str> = Arc::from(key);
        router = router.layer(middleware::from_fn_with_state(key, require_api_key));
    }

    router.layer(middleware::from_fn(log_request))
}
