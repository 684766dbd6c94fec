//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the edge
//! emulator and the WebSocket backend. All types derive Serde traits for
//! deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct EdgeConfig {
    /// Edge emulator listener.
    pub listener: ListenerConfig,

    /// The redirect rule and its deployment-time target.
    pub redirect: RedirectConfig,

    /// Origin that passed-through requests are forwarded to.
    pub origin: OriginConfig,

    /// WebSocket echo backend (the redirect target).
    pub backend: BackendConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Redirect target configuration.
///
/// Only the target is configurable; the matched path is always
/// `/api/v1/ws`. Unknown keys are rejected so a stale `path` entry fails
/// loudly instead of being ignored.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct RedirectConfig {
    /// Target scheme, `ws` or `wss`.
    pub scheme: String,

    /// Backend host, optionally with port
    /// (e.g., "ec2-1-2-3-4.compute-1.amazonaws.com:5000").
    pub endpoint: String,

    /// Path on the backend.
    pub target_path: String,
}

impl Default for RedirectConfig {
    fn default() -> Self {
        Self {
            scheme: "ws".to_string(),
            endpoint: "localhost:5000".to_string(),
            target_path: "/api/v1/ws".to_string(),
        }
    }
}

/// Origin configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct OriginConfig {
    /// Origin address (e.g., "127.0.0.1:3000"). Without one, pass-through
    /// requests are answered with 404.
    pub address: Option<String>,
}

/// WebSocket echo backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct BackendConfig {
    /// Bind address.
    pub bind_address: String,

    /// Upgrade path.
    pub path: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:5000".to_string(),
            path: "/api/v1/ws".to_string(),
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
