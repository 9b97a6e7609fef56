//! HTTP surface of the captive portal API.
//!
//! | Method & Path                          | Handler                |
//! |----------------------------------------|------------------------|
//! | `GET /captive-portal/api/{identifier}` | `get_client_status`    |
//! | `POST /operation/release/`             | `release_client`       |
//! | `POST /operation/holdCaptive/`         | `hold_client_captive`  |
//! | `GET /health`                          | `health`               |

use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    http::header,
    response::IntoResponse,
    routing::{get, post},
};
use lib_captive::{Registry, ValidationError};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tower_http::trace::TraceLayer;
use tracing::debug;

use super::error::AppError;

/// RFC 8908 media type for the API state response.
pub const CAPTIVE_JSON: &str = "application/captive+json";

const CLIENT_IDENTIFIER_FIELD: &str = "client_identifier";

/// Body of the release and hold-captive operations.
#[derive(Debug, Deserialize)]
pub struct ReleaseRequest {
    #[serde(rename = "client_identifier", default)]
    pub identifier: Option<String>,
}

impl ReleaseRequest {
    fn identifier(&self) -> Result<&str, ValidationError> {
        self.identifier
            .as_deref()
            .ok_or(ValidationError::MissingField(CLIENT_IDENTIFIER_FIELD))
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct OperationResult {
    pub result: bool,
}

pub fn router(registry: Registry) -> Router {
    Router::new()
        .route("/captive-portal/api/{identifier}", get(get_client_status))
        .route("/captive-portal/api/", get(empty_identifier))
        .route("/captive-portal/api", get(empty_identifier))
        .route("/operation/release/", post(release_client))
        .route("/operation/holdCaptive/", post(hold_client_captive))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(registry)
}

async fn get_client_status(
    State(registry): State<Registry>,
    Path(identifier): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let view = registry.status(&identifier).await?;
    Ok((
        [
            (header::CONTENT_TYPE, CAPTIVE_JSON),
            (header::CACHE_CONTROL, "private"),
        ],
        Json(view),
    ))
}

async fn empty_identifier() -> AppError {
    ValidationError::EmptyIdentifier.into()
}

fn read_request(
    payload: Result<Json<ReleaseRequest>, JsonRejection>,
) -> Result<ReleaseRequest, ValidationError> {
    match payload {
        Ok(Json(request)) => Ok(request),
        Err(rejection) => {
            debug!("Unreadable operation body: {}", rejection.body_text());
            Err(ValidationError::MalformedBody(rejection.body_text()))
        }
    }
}

async fn release_client(
    State(registry): State<Registry>,
    payload: Result<Json<ReleaseRequest>, JsonRejection>,
) -> Result<Json<OperationResult>, AppError> {
    let request = read_request(payload)?;
    registry.release(request.identifier()?).await?;
    Ok(Json(OperationResult { result: true }))
}

async fn hold_client_captive(
    State(registry): State<Registry>,
    payload: Result<Json<ReleaseRequest>, JsonRejection>,
) -> Result<Json<OperationResult>, AppError> {
    let request = read_request(payload)?;
    registry.hold(request.identifier()?).await?;
    Ok(Json(OperationResult { result: true }))
}

async fn health(State(registry): State<Registry>) -> Result<impl IntoResponse, AppError> {
    registry.health().await.map_err(AppError::Unavailable)?;
    Ok(Json(json!({ "status": "ok" })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{Body, to_bytes},
        http::{Request, Response, StatusCode},
    };
    use lib_captive::{CaptiveConfig, ClientStore, MemoryClientStore, PgClientStore, UrlToggle};
    use serde_json::Value;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn app(portal: bool, allow_unknown: bool) -> (Router, Arc<MemoryClientStore>) {
        let config = CaptiveConfig {
            portal: UrlToggle {
                url: "https://p.example/".to_string(),
                enabled: portal,
            },
            allow_unknown_clients: allow_unknown,
            ..CaptiveConfig::default()
        };
        let store = Arc::new(MemoryClientStore::new());
        let registry = Registry::new(store.clone(), Arc::new(config));
        (router(registry), store)
    }

    async fn body_json(resp: Response<Body>) -> Value {
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn get_status(id: &str) -> Request<Body> {
        Request::builder()
            .uri(format!("/captive-portal/api/{id}"))
            .body(Body::empty())
            .unwrap()
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn status_of_unseen_client_is_captive() {
        let (app, store) = app(true, false);
        let resp = app.oneshot(get_status("dev-1")).await.unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()[header::CONTENT_TYPE], CAPTIVE_JSON);
        assert_eq!(
            body_json(resp).await,
            json!({"captive": true, "user-portal-url": "https://p.example/"})
        );
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn allow_unknown_without_portal_is_bare() {
        let (app, _) = app(false, true);
        let resp = app.oneshot(get_status("aa:bb:cc")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_json(resp).await, json!({"captive": false}));
    }

    #[tokio::test]
    async fn empty_identifier_is_bad_request() {
        let (app, store) = app(false, false);
        let resp = app
            .oneshot(
                Request::builder()
                    .uri("/captive-portal/api/")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(resp).await["error_type"], "ValidationError");
        assert_eq!(store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn blank_identifier_is_bad_request() {
        let (app, _) = app(false, false);
        let resp = app.oneshot(get_status("%20%20")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn release_then_hold() {
        let (app, _) = app(false, false);
        let resp = app.clone().oneshot(get_status("dev-1")).await.unwrap();
        assert_eq!(body_json(resp).await, json!({"captive": true}));

        let resp = app
            .clone()
            .oneshot(post_json("/operation/release/", r#"{"client_identifier": "dev-1"}"#))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_json(resp).await, json!({"result": true}));

        let resp = app.clone().oneshot(get_status("dev-1")).await.unwrap();
        assert_eq!(body_json(resp).await, json!({"captive": false}));

        let resp = app
            .clone()
            .oneshot(post_json("/operation/holdCaptive/", r#"{"client_identifier": "dev-1"}"#))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let resp = app.oneshot(get_status("dev-1")).await.unwrap();
        assert_eq!(body_json(resp).await, json!({"captive": true}));
    }

    #[tokio::test]
    async fn operations_on_unknown_client_are_not_found() {
        let (app, _) = app(false, false);
        for uri in ["/operation/release/", "/operation/holdCaptive/"] {
            let resp = app
                .clone()
                .oneshot(post_json(uri, r#"{"client_identifier": "ghost"}"#))
                .await
                .unwrap();
            assert_eq!(resp.status(), StatusCode::NOT_FOUND);
            assert_eq!(body_json(resp).await["error_type"], "NotFoundError");
        }
    }

    #[tokio::test]
    async fn missing_field_is_bad_request() {
        let (app, _) = app(false, false);
        let resp = app
            .clone()
            .oneshot(post_json("/operation/release/", "{}"))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body = body_json(resp).await;
        assert!(body["detail"].as_str().unwrap().contains("client_identifier"));

        let resp = app
            .oneshot(post_json("/operation/holdCaptive/", "not json"))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn empty_identifier_in_body_is_bad_request() {
        let (app, _) = app(false, false);
        let resp = app
            .oneshot(post_json("/operation/release/", r#"{"client_identifier": ""}"#))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn health_is_ok_without_counting_clients() {
        let (app, _) = app(false, false);
        app.clone().oneshot(get_status("dev-1")).await.unwrap();
        let resp = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_json(resp).await, json!({"status": "ok"}));
    }

    #[tokio::test]
    async fn health_is_unavailable_when_store_is_unreachable() {
        // Nothing listens on port 1, so the first pooled connection fails.
        let store = PgClientStore::from_url("postgres://captive@127.0.0.1:1/captive", 1).unwrap();
        let registry = Registry::new(Arc::new(store), Arc::new(CaptiveConfig::default()));
        let resp = router(registry)
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body_json(resp).await["error_type"], "StorageUnavailable");
    }
}
