//! Request handling.
//!
//! # Responsibilities
//! - Generate a unique request ID (UUID v4) for every incoming request
//! - Convert an HTTP request into the edge runtime's viewer-request shape
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing
//! - `uri` carries the path only; the query string travels separately

use axum::http::{request::Parts, HeaderName, HeaderValue, Request};
use serde_json::{json, Map, Value};
use tower_http::request_id::{MakeRequestId, RequestId};
use uuid::Uuid;

use crate::interceptor::ViewerRequest;

/// Header carrying the request ID.
pub const X_REQUEST_ID: &str = "x-request-id";

pub fn request_id_header() -> HeaderName {
    HeaderName::from_static(X_REQUEST_ID)
}

/// Generates UUID v4 request IDs.
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeEdgeRequestId;

impl MakeRequestId for MakeEdgeRequestId {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// Read the request ID set by the request-id layer.
pub fn request_id(parts: &Parts) -> String {
    parts
        .headers
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string()
}

/// Describe an HTTP request the way the edge runtime would.
///
/// Headers become `{ name: { "value": ... } }`; when a header repeats, the
/// first value wins.
pub fn viewer_request(parts: &Parts) -> ViewerRequest {
    let mut headers = Map::new();
    for (name, value) in parts.headers.iter() {
        if headers.contains_key(name.as_str()) {
            continue;
        }
        if let Ok(value) = value.to_str() {
            headers.insert(name.as_str().to_string(), json!({ "value": value }));
        }
    }

    ViewerRequest::new(parts.uri.path())
        .with_field("method", parts.method.as_str())
        .with_field("querystring", parts.uri.query().unwrap_or_default())
        .with_field("headers", Value::Object(headers))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    #[test]
    fn test_viewer_request_from_parts() {
        let (parts, _) = Request::builder()
            .method("GET")
            .uri("http://edge.example/api/v1/ws?token=abc")
            .header("Host", "edge.example")
            .header("Sec-WebSocket-Version", "13")
            .body(Body::empty())
            .unwrap()
            .into_parts();

        let request = viewer_request(&parts);
        assert_eq!(request.uri, "/api/v1/ws");
        assert_eq!(request.extra["method"], "GET");
        assert_eq!(request.extra["querystring"], "token=abc");
        assert_eq!(request.extra["headers"]["host"]["value"], "edge.example");
        assert_eq!(request.extra["headers"]["sec-websocket-version"]["value"], "13");
    }

    #[test]
    fn test_request_id() {
        let (parts, _) = Request::builder()
            .header(X_REQUEST_ID, "abc-123")
            .body(Body::empty())
            .unwrap()
            .into_parts();
        assert_eq!(request_id(&parts), "abc-123");

        let (parts, _) = Request::builder().body(Body::empty()).unwrap().into_parts();
        assert_eq!(request_id(&parts), "unknown");
    }

    #[test]
    fn test_make_request_id_is_uuid() {
        let request = Request::builder().body(Body::empty()).unwrap();
        let id = MakeEdgeRequestId.make_request_id(&request).unwrap();
        let id = id.header_value().to_str().unwrap();
        assert!(Uuid::parse_str(id).is_ok());
    }
}
