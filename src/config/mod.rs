//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → EdgeConfig (validated, immutable)
//!
//! On file change:
//!     watcher.rs detects change
//!     → loader.rs loads new config, re-applies CLI overrides
//!     → validation.rs validates
//!     → skipped if identical to the last config sent
//!     → sent to the HTTP server, which swaps its interceptor
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require full reload
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use loader::{load_config, load_with_overrides, parse_config, ConfigError, Overrides};
pub use schema::{
    BackendConfig, EdgeConfig, ListenerConfig, ObservabilityConfig, OriginConfig, RedirectConfig,
    TimeoutConfig,
};
pub use validation::{validate_config, ValidationError};
pub use watcher::ConfigWatcher;
