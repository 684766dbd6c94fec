//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! HTTP layer produces:
//!     → logging.rs (structured log events)
//!     → metrics.rs (decision counters, latency histograms)
//!
//! Consumers:
//!     → stdout (tracing-subscriber fmt layer)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - The interceptor itself never logs or records; only its callers do
//! - Request ID flows through every log line of a request
//! - Metrics are cheap (atomic increments)

pub mod logging;
pub mod metrics;
