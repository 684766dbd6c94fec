//! Response handling.
//!
//! Turns a synthesized edge response into a real HTTP response.

use axum::{
    body::Body,
    http::{HeaderName, HeaderValue, StatusCode},
    response::Response,
};

use crate::interceptor::RedirectResponse;

/// Render a redirect as an HTTP response with an empty body.
///
/// Headers that are not valid HTTP are skipped with a warning.
pub fn redirect_response(redirect: &RedirectResponse) -> Response {
    let status =
        StatusCode::from_u16(redirect.status_code).unwrap_or(StatusCode::MOVED_PERMANENTLY);
    let mut response = Response::new(Body::empty());
    *response.status_mut() = status;

    for (name, header) in &redirect.headers {
        match (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(&header.value),
        ) {
            (Ok(name), Ok(value)) => {
                response.headers_mut().insert(name, value);
            }
            _ => tracing::warn!(header = %name, "Skipping invalid redirect header"),
        }
    }

    response
}
