//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (request ID, viewer-request conversion)
//!     → interceptor (redirect or pass-through)
//!     → response.rs (301 + Location) | origin forward
//!     → Send to client
//!
//! Redirected client
//!     → websocket.rs (echo backend)
//! ```

pub mod request;
pub mod response;
pub mod server;
pub mod websocket;

pub use request::{MakeEdgeRequestId, X_REQUEST_ID};
pub use server::{HttpServer, INVOKE_PATH};
pub use websocket::EchoServer;
