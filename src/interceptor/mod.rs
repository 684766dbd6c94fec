//! Viewer-request interceptor.
//!
//! # Data Flow
//! ```text
//! Edge runtime event { request: { uri, ... } }
//!     → event.rs (ViewerRequest, open remainder kept verbatim)
//!     → engine.rs (rule lookup on uri)
//!     → Decision::Redirect(301 + location) | Decision::PassThrough(request)
//! ```
//!
//! # Design Decisions
//! - Pure and synchronous: no I/O, no logging, no shared mutable state
//! - Fails open: a request that cannot be read passes through
//! - Redirect target injected at construction, never derived from the request

pub mod engine;
pub mod event;

pub use engine::{Interceptor, WEBSOCKET_PATH};
pub use event::{Decision, EdgeHeader, EventError, RedirectResponse, ViewerRequest};
