//! Edge emulator server.
//!
//! # Responsibilities
//! - Run the interceptor on every request, as the CDN's viewer-request hook would
//! - Answer redirects directly; forward pass-through requests to the origin
//! - Expose the raw JSON invocation contract on `/_edge/invoke`
//! - Swap the interceptor when a new config arrives
//! - Wire up middleware (tracing, timeout, request ID)

use std::sync::Arc;
use std::time::{Duration, Instant};

use arc_swap::ArcSwap;
use axum::{
    body::Body,
    extract::State,
    http::{
        uri::{Authority, PathAndQuery, Scheme},
        Request, StatusCode, Uri, Version,
    },
    response::{IntoResponse, Response},
    routing::{any, post},
    Json, Router,
};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use serde_json::Value;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::EdgeConfig;
use crate::http::request::{request_id, request_id_header, viewer_request, MakeEdgeRequestId};
use crate::http::response::redirect_response;
use crate::interceptor::{Decision, Interceptor};
use crate::lifecycle::ShutdownSignal;
use crate::observability::metrics;
use crate::routing::TargetError;

/// Path of the raw invocation endpoint.
pub const INVOKE_PATH: &str = "/_edge/invoke";

/// Everything a request needs that a reload may replace.
#[derive(Debug)]
pub struct Snapshot {
    pub interceptor: Interceptor,
    pub origin: Option<String>,
}

impl Snapshot {
    pub fn from_config(config: &EdgeConfig) -> Result<Self, TargetError> {
        Ok(Self {
            interceptor: Interceptor::from_config(&config.redirect)?,
            origin: config.origin.address.clone(),
        })
    }
}

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub snapshot: Arc<ArcSwap<Snapshot>>,
    pub client: Client<HttpConnector, Body>,
}

/// HTTP server emulating the edge in front of an origin.
pub struct HttpServer {
    router: Router,
    config: EdgeConfig,
    snapshot: Arc<ArcSwap<Snapshot>>,
}

impl HttpServer {
    /// Create a new server. Fails if the redirect target is invalid.
    pub fn new(config: EdgeConfig) -> Result<Self, TargetError> {
        let snapshot = Arc::new(ArcSwap::from_pointee(Snapshot::from_config(&config)?));

        let client = Client::builder(TokioExecutor::new()).build(HttpConnector::new());

        let state = AppState {
            snapshot: snapshot.clone(),
            client,
        };

        let router = Self::build_router(&config, state);
        Ok(Self {
            router,
            config,
            snapshot,
        })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &EdgeConfig, state: AppState) -> Router {
        Router::new()
            // Only POST is the invocation contract; other methods on this
            // path are ordinary viewer requests.
            .route(INVOKE_PATH, post(invoke_handler).fallback(edge_handler))
            .route("/{*path}", any(edge_handler))
            .route("/", any(edge_handler))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(PropagateRequestIdLayer::new(request_id_header()))
            .layer(SetRequestIdLayer::new(request_id_header(), MakeEdgeRequestId))
            .layer(TraceLayer::new_for_http())
    }

    /// Run the server until `shutdown` fires.
    ///
    /// Configs received on `config_updates` replace the live interceptor;
    /// a config whose target cannot be built is rejected and logged.
    pub async fn run(
        self,
        listener: TcpListener,
        mut config_updates: mpsc::UnboundedReceiver<EdgeConfig>,
        shutdown: ShutdownSignal,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            origin = ?self.config.origin.address,
            "Edge server starting"
        );

        let snapshot = self.snapshot.clone();
        let reload = tokio::spawn(async move {
            while let Some(config) = config_updates.recv().await {
                match Snapshot::from_config(&config) {
                    Ok(next) => {
                        snapshot.store(Arc::new(next));
                        tracing::info!(
                            endpoint = %config.redirect.endpoint,
                            "Interceptor reloaded"
                        );
                    }
                    Err(e) => {
                        tracing::error!(
                            error = %e,
                            "Rejected config update. Keeping current interceptor."
                        );
                    }
                }
            }
        });

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown.wait())
            .await?;

        reload.abort();
        tracing::info!("Edge server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &EdgeConfig {
        &self.config
    }
}

/// Raw invocation: `{ "request": {...} }` in, decision out.
async fn invoke_handler(State(state): State<AppState>, Json(event): Json<Value>) -> Response {
    let start = Instant::now();
    let snapshot = state.snapshot.load_full();

    match snapshot.interceptor.evaluate_event(event) {
        Ok((output, outcome)) => {
            metrics::record_decision(outcome);
            metrics::record_request("POST", 200, outcome, start);
            Json(output).into_response()
        }
        Err(e) => {
            tracing::warn!(error = %e, "Malformed invocation event");
            metrics::record_request("POST", 400, "invoke", start);
            (StatusCode::BAD_REQUEST, e.to_string()).into_response()
        }
    }
}

/// Run the interceptor, then redirect or forward.
async fn edge_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start = Instant::now();
    let (parts, body) = request.into_parts();
    let request_id = request_id(&parts);
    let method = parts.method.to_string();
    let snapshot = state.snapshot.load_full();

    let decision = snapshot.interceptor.intercept(viewer_request(&parts));
    let outcome = decision.outcome();
    metrics::record_decision(outcome);

    let response = match decision {
        Decision::Redirect(redirect) => {
            tracing::info!(
                request_id = %request_id,
                path = %parts.uri.path(),
                location = redirect.location().unwrap_or_default(),
                "Redirecting"
            );
            redirect_response(&redirect)
        }
        Decision::PassThrough(_) => {
            forward(&state.client, snapshot.origin.as_deref(), parts, body, &request_id).await
        }
    };

    metrics::record_request(&method, response.status().as_u16(), outcome, start);
    response
}

/// Forward a passed-through request to the origin.
async fn forward(
    client: &Client<HttpConnector, Body>,
    origin: Option<&str>,
    mut parts: axum::http::request::Parts,
    body: Body,
    request_id: &str,
) -> Response {
    let origin = match origin {
        Some(origin) => origin,
        None => {
            tracing::debug!(
                request_id = %request_id,
                path = %parts.uri.path(),
                "No origin configured"
            );
            return (StatusCode::NOT_FOUND, "No origin configured").into_response();
        }
    };

    let authority = match origin.parse::<Authority>() {
        Ok(authority) => authority,
        Err(e) => {
            tracing::error!(
                request_id = %request_id,
                origin = %origin,
                error = %e,
                "Invalid origin address"
            );
            return (StatusCode::BAD_GATEWAY, "Invalid origin address").into_response();
        }
    };

    let mut uri_parts = parts.uri.clone().into_parts();
    uri_parts.scheme = Some(Scheme::HTTP);
    uri_parts.authority = Some(authority);
    if uri_parts.path_and_query.is_none() {
        uri_parts.path_and_query = Some(PathAndQuery::from_static("/"));
    }
    parts.uri = Uri::from_parts(uri_parts).unwrap_or(parts.uri);
    parts.version = Version::HTTP_11;

    tracing::debug!(request_id = %request_id, uri = %parts.uri, "Forwarding to origin");

    match client.request(Request::from_parts(parts, body)).await {
        Ok(response) => {
            let (parts, body) = response.into_parts();
            Response::from_parts(parts, Body::new(body))
        }
        Err(e) => {
            tracing::error!(request_id = %request_id, error = %e, "Origin request failed");
            (StatusCode::BAD_GATEWAY, "Origin request failed").into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header::LOCATION;
    use tower::ServiceExt;

    fn router(config: &EdgeConfig) -> Router {
        let state = AppState {
            snapshot: Arc::new(ArcSwap::from_pointee(Snapshot::from_config(config).unwrap())),
            client: Client::builder(TokioExecutor::new()).build(HttpConnector::new()),
        };
        HttpServer::build_router(config, state)
    }

    #[tokio::test]
    async fn test_redirect_through_router() {
        let response = router(&EdgeConfig::default())
            .oneshot(Request::builder().uri("/api/v1/ws").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::MOVED_PERMANENTLY);
        assert_eq!(response.headers()[LOCATION], "ws://localhost:5000/api/v1/ws");
    }

    #[tokio::test]
    async fn test_pass_through_without_origin_is_not_found() {
        let response = router(&EdgeConfig::default())
            .oneshot(Request::builder().uri("/api/v1/ws/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(response.headers().get(LOCATION).is_none());
    }

    #[tokio::test]
    async fn test_invoke_rejects_event_without_request() {
        let response = router(&EdgeConfig::default())
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(INVOKE_PATH)
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"uri":"/api/v1/ws"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_invoke_path_other_methods_are_viewer_requests() {
        let response = router(&EdgeConfig::default())
            .oneshot(Request::builder().uri(INVOKE_PATH).body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_invalid_target_rejected() {
        let mut config = EdgeConfig::default();
        config.redirect.scheme = "https".into();
        assert!(HttpServer::new(config).is_err());
    }
}
