//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check the redirect target builds into a valid ws:// URI
//! - Validate value ranges and addresses
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: EdgeConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::EdgeConfig;
use crate::routing::{RedirectTarget, TargetError};

/// A single semantic problem in a config.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{field}: '{value}' is not a socket address")]
    Address { field: &'static str, value: String },

    #[error("{field}: '{value}' must start with '/'")]
    Path { field: &'static str, value: String },

    #[error("redirect target: {0}")]
    Target(#[from] TargetError),

    #[error("timeouts.request_secs must be greater than zero")]
    ZeroTimeout,
}

/// Validate a parsed config.
pub fn validate_config(config: &EdgeConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    check_address(&mut errors, "listener.bind_address", &config.listener.bind_address);
    check_address(&mut errors, "backend.bind_address", &config.backend.bind_address);
    if config.observability.metrics_enabled {
        let metrics_address = &config.observability.metrics_address;
        check_address(&mut errors, "observability.metrics_address", metrics_address);
    }
    if let Some(origin) = &config.origin.address {
        check_address(&mut errors, "origin.address", origin);
    }

    check_path(&mut errors, "redirect.target_path", &config.redirect.target_path);
    check_path(&mut errors, "backend.path", &config.backend.path);

    let redirect = &config.redirect;
    if let Err(e) =
        RedirectTarget::from_endpoint(&redirect.scheme, &redirect.endpoint, &redirect.target_path)
    {
        errors.push(e.into());
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_address(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    if value.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::Address {
            field,
            value: value.to_string(),
        });
    }
}

fn check_path(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    if !value.starts_with('/') {
        errors.push(ValidationError::Path {
            field,
            value: value.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert_eq!(validate_config(&EdgeConfig::default()), Ok(()));
    }

    #[test]
    fn test_collects_every_error() {
        let mut config = EdgeConfig::default();
        config.listener.bind_address = "not-an-address".into();
        config.backend.path = "api/v1/ws".into();
        config.redirect.scheme = "https".into();
        config.timeouts.request_secs = 0;

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 4);
        assert!(errors.contains(&ValidationError::ZeroTimeout));
        assert!(errors
            .iter()
            .any(|e| matches!(e, ValidationError::Target(TargetError::Scheme { .. }))));
        assert!(errors
            .iter()
            .any(|e| matches!(e, ValidationError::Address { field: "listener.bind_address", .. })));
    }

    #[test]
    fn test_endpoint_must_be_bare_host() {
        let mut config = EdgeConfig::default();
        for endpoint in ["ws://backend:5000", "backend?x", "backend#frag", "evil@backend:5000"] {
            config.redirect.endpoint = endpoint.into();
            assert_eq!(
                validate_config(&config),
                Err(vec![ValidationError::Target(TargetError::Endpoint(endpoint.into()))]),
                "endpoint {:?}",
                endpoint
            );
        }

        config.redirect.target_path = "/api/v1/ws#frag".into();
        config.redirect.endpoint = "backend:5000".into();
        assert!(matches!(
            validate_config(&config).unwrap_err()[0],
            ValidationError::Target(TargetError::ExtraPart { part: "fragment", .. })
        ));
        config.redirect.target_path = "/api/v1/ws".into();

        config.redirect.endpoint = String::new();
        let errors = validate_config(&config).unwrap_err();
        assert!(matches!(errors[0], ValidationError::Target(TargetError::MissingHost(_))));
    }

    #[test]
    fn test_origin_checked_only_when_set() {
        let mut config = EdgeConfig::default();
        config.origin.address = Some("127.0.0.1:3000".into());
        assert!(validate_config(&config).is_ok());

        config.origin.address = Some("origin".into());
        assert!(validate_config(&config).is_err());
    }
}
