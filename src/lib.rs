//! Edge request interceptor that redirects WebSocket traffic to a backend.

pub mod config;
pub mod http;
pub mod interceptor;
pub mod lifecycle;
pub mod observability;
pub mod routing;

pub use config::EdgeConfig;
pub use http::{EchoServer, HttpServer};
pub use interceptor::{Decision, Interceptor, ViewerRequest};
pub use lifecycle::Shutdown;
