//! Edge runtime event shapes.
//!
//! These mirror the objects the CDN hands to a viewer-request function and
//! the objects it accepts back: either the request itself (continue to the
//! origin) or a synthesized response.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// HTTP status used for the WebSocket redirect.
pub const MOVED_PERMANENTLY: u16 = 301;

/// Reason phrase paired with [`MOVED_PERMANENTLY`].
pub const MOVED_PERMANENTLY_DESCRIPTION: &str = "Moved Permanently";

/// Incoming viewer request.
///
/// Only `uri` is interpreted. Every other field is carried in `extra` and
/// written back verbatim when the request passes through.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewerRequest {
    /// Path component only: no host, no query string.
    pub uri: String,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ViewerRequest {
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            extra: Map::new(),
        }
    }

    /// Attach an extra field, e.g. `method`.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }
}

/// Single-value header wrapper (`{ "value": "..." }`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeHeader {
    pub value: String,
}

/// Response synthesized at the edge instead of fetching the origin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RedirectResponse {
    pub status_code: u16,
    pub status_description: String,
    /// Lower-case header name to value.
    pub headers: BTreeMap<String, EdgeHeader>,
}

impl RedirectResponse {
    /// `301 Moved Permanently` with a single `location` header.
    pub fn moved_permanently(location: impl Into<String>) -> Self {
        let mut headers = BTreeMap::new();
        headers.insert(
            "location".to_string(),
            EdgeHeader {
                value: location.into(),
            },
        );

        Self {
            status_code: MOVED_PERMANENTLY,
            status_description: MOVED_PERMANENTLY_DESCRIPTION.to_string(),
            headers,
        }
    }

    pub fn location(&self) -> Option<&str> {
        self.headers.get("location").map(|h| h.value.as_str())
    }
}

/// Outcome of one interception.
///
/// Serializes untagged: the wire form is exactly the response object or
/// exactly the original request object.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Decision {
    Redirect(RedirectResponse),
    PassThrough(ViewerRequest),
}

impl Decision {
    pub fn is_redirect(&self) -> bool {
        matches!(self, Decision::Redirect(_))
    }

    /// Label used in logs and metrics.
    pub fn outcome(&self) -> &'static str {
        match self {
            Decision::Redirect(_) => "redirect",
            Decision::PassThrough(_) => "pass_through",
        }
    }
}

/// Errors for events that do not carry a request at all.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EventError {
    #[error("event is not a JSON object")]
    NotAnObject,

    #[error("event has no 'request' object")]
    MissingRequest,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_keeps_unknown_fields() {
        let raw = json!({
            "uri": "/health",
            "method": "GET",
            "querystring": { "a": { "value": "1" } },
        });
        let request: ViewerRequest = serde_json::from_value(raw.clone()).unwrap();

        assert_eq!(request.uri, "/health");
        assert_eq!(request.extra["method"], "GET");
        assert_eq!(serde_json::to_value(&request).unwrap(), raw);
    }

    #[test]
    fn test_redirect_wire_shape() {
        let response = RedirectResponse::moved_permanently("ws://backend:5000/api/v1/ws");

        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({
                "statusCode": 301,
                "statusDescription": "Moved Permanently",
                "headers": { "location": { "value": "ws://backend:5000/api/v1/ws" } }
            })
        );
        assert_eq!(response.location(), Some("ws://backend:5000/api/v1/ws"));
    }

    #[test]
    fn test_decision_serializes_untagged() {
        let pass = Decision::PassThrough(ViewerRequest::new("/").with_field("method", "GET"));
        assert_eq!(
            serde_json::to_value(&pass).unwrap(),
            json!({ "uri": "/", "method": "GET" })
        );
        assert_eq!(pass.outcome(), "pass_through");
        assert!(!pass.is_redirect());
    }
}
