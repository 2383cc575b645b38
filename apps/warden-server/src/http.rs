//! Process-level HTTP stack: health endpoint, request ids, tracing, timeout.

use std::time::Duration;

use axum::{
    body::Body,
    http::{HeaderName, Request},
    middleware::{from_fn, Next},
    response::{Json, Response},
    routing::get,
    Router,
};
use serde_json::{json, Value};
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::field::Empty;

const BODY_LIMIT: usize = 1024 * 1024;

pub fn request_id_header() -> HeaderName {
    HeaderName::from_static("x-request-id")
}

#[derive(Clone, Debug)]
pub struct XRequestId(pub String);

#[derive(Clone, Default)]
pub struct MakeReqId;

impl MakeRequestId for MakeReqId {
    fn make_request_id<B>(&mut self, _req: &Request<B>) -> Option<RequestId> {
        let id = uuid::Uuid::new_v4().to_string();
        Some(RequestId::new(id.parse().ok()?))
    }
}

fn request_id_of<B>(req: &Request<B>) -> &str {
    req.headers()
        .get(request_id_header())
        .and_then(|v| v.to_str().ok())
        .unwrap_or("n/a")
}

/// Stores the request id in extensions and records it on the current span.
async fn push_req_id_to_extensions(mut req: Request<Body>, next: Next) -> Response {
    let rid = request_id_of(&req).to_owned();
    tracing::Span::current().record("request_id", tracing::field::display(&rid));
    req.extensions_mut().insert(XRequestId(rid));
    next.run(req).await
}

pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// Wrap module routes with the shared middleware.
///
/// Outermost to innermost: SetRequestId, PropagateRequestId, request id
/// extension, Trace, Timeout, BodyLimit.
pub fn build_router(api: Router, request_timeout: Duration) -> Router {
    let x_request_id = request_id_header();

    let trace = TraceLayer::new_for_http().make_span_with(|req: &Request<Body>| {
        tracing::info_span!(
            "http_request",
            method = %req.method(),
            uri = %req.uri().path(),
            request_id = %request_id_of(req),
            status = Empty,
            latency_ms = Empty
        )
    });

    Router::new()
        .route("/health", get(health_check))
        .merge(api)
        .layer(RequestBodyLimitLayer::new(BODY_LIMIT))
        .layer(TimeoutLayer::new(request_timeout))
        .layer(trace)
        .layer(from_fn(push_req_id_to_extensions))
        .layer(PropagateRequestIdLayer::new(x_request_id.clone()))
        .layer(SetRequestIdLayer::new(x_request_id, MakeReqId))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use axum::http::StatusCode;
    use tower::ServiceExt;

    #[tokio::test]
    async fn health_is_served_with_a_request_id() {
        let router = build_router(Router::new(), Duration::from_secs(5));
        let resp = router
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(resp.headers().contains_key("x-request-id"));

        let body = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let v: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(v["status"], "healthy");
    }

    #[tokio::test]
    async fn client_request_id_is_propagated() {
        let router = build_router(Router::new(), Duration::from_secs(5));
        let resp = router
            .oneshot(
                Request::get("/health")
                    .header("x-request-id", "abc-123")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.headers()["x-request-id"], "abc-123");
    }
}
