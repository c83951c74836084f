//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, addresses parse, status codes exist)
//! - Flag duplicate routes after normalization
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: RouterConfig → Result<(), Vec<ValidationError>>
//! - Duplicate patterns are allowed (last one wins) and only logged

use std::collections::HashSet;
use std::net::SocketAddr;

use axum::http::{HeaderValue, StatusCode};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

use crate::config::schema::RouterConfig;
use crate::routing::normalize_route;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} is not a socket address: {value:?}")]
    InvalidAddress { field: &'static str, value: String },

    #[error("timeouts.request_secs must be greater than zero")]
    ZeroRequestTimeout,

    #[error("limits.max_body_bytes must be greater than zero")]
    ZeroBodyLimit,

    #[error("unknown log format {0:?} (expected \"pretty\" or \"json\")")]
    UnknownLogFormat(String),

    #[error("invalid log level {0:?}")]
    InvalidLogLevel(String),

    #[error("route {pattern:?} has invalid status {status}")]
    InvalidStatus { pattern: String, status: u16 },

    #[error("route {pattern:?} has invalid content type {content_type:?}")]
    InvalidContentType { pattern: String, content_type: String },
}

/// Check a parsed configuration, collecting every error found.
pub fn validate_config(config: &RouterConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    check_address("listener.bind_address", &config.listener.bind_address, &mut errors);
    if config.observability.metrics_enabled {
        check_address(
            "observability.metrics_address",
            &config.observability.metrics_address,
            &mut errors,
        );
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroRequestTimeout);
    }
    if config.limits.max_body_bytes == 0 {
        errors.push(ValidationError::ZeroBodyLimit);
    }

    match config.observability.log_format.as_str() {
        "pretty" | "json" => {}
        other => errors.push(ValidationError::UnknownLogFormat(other.to_string())),
    }
    if !is_valid_log_level(&config.observability.log_level) {
        errors.push(ValidationError::InvalidLogLevel(
            config.observability.log_level.clone(),
        ));
    }

    let mut seen = HashSet::new();
    for route in &config.routes {
        if StatusCode::from_u16(route.status).is_err() {
            errors.push(ValidationError::InvalidStatus {
                pattern: route.pattern.clone(),
                status: route.status,
            });
        }
        if HeaderValue::from_str(&route.content_type).is_err() {
            errors.push(ValidationError::InvalidContentType {
                pattern: route.pattern.clone(),
                content_type: route.content_type.clone(),
            });
        }

        let normalized = normalize_route(&route.pattern);
        if !seen.insert(normalized.clone()) {
            tracing::warn!(pattern = %normalized, "Duplicate route pattern; the later entry wins");
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Level names accepted as bare filter directives.
const LEVEL_NAMES: &[&str] = &["trace", "debug", "info", "warn", "error", "off"];

/// `EnvFilter` reads a bare word as a target name, so `"verbose"` parses.
/// Bare directives must name a level; `target=level` forms go to `EnvFilter`.
fn is_valid_log_level(level: &str) -> bool {
    let bare_ok = level
        .split(',')
        .map(str::trim)
        .filter(|d| !d.is_empty() && !d.contains('=') && !d.contains('['))
        .all(|d| LEVEL_NAMES.iter().any(|name| name.eq_ignore_ascii_case(d)));
    bare_ok && EnvFilter::try_new(level).is_ok()
}

fn check_address(field: &'static str, value: &str, errors: &mut Vec<ValidationError>) {
    if value.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field,
            value: value.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::RouteConfig;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&RouterConfig::default()).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = RouterConfig::default();
        config.listener.bind_address = "not-an-address".into();
        config.timeouts.request_secs = 0;
        config.observability.log_format = "xml".into();
        let mut route = RouteConfig::new("/x", "x");
        route.status = 42;
        config.routes.push(route);

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 4);
        assert!(errors.contains(&ValidationError::ZeroRequestTimeout));
        assert!(errors.contains(&ValidationError::UnknownLogFormat("xml".into())));
        assert!(errors.contains(&ValidationError::InvalidStatus {
            pattern: "/x".into(),
            status: 42,
        }));
    }

    #[test]
    fn test_metrics_address_checked_only_when_enabled() {
        let mut config = RouterConfig::default();
        config.observability.metrics_address = "bogus".into();
        assert!(validate_config(&config).is_ok());

        config.observability.metrics_enabled = true;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![ValidationError::InvalidAddress {
                field: "observability.metrics_address",
                value: "bogus".into(),
            }]
        );
    }

    #[test]
    fn test_log_level_must_name_a_level() {
        let mut config = RouterConfig::default();
        config.observability.log_level = "verbose".into();
        assert_eq!(
            validate_config(&config).unwrap_err(),
            vec![ValidationError::InvalidLogLevel("verbose".into())]
        );

        config.observability.log_level = "info,segment_router=debug".into();
        assert!(validate_config(&config).is_ok());

        config.observability.log_level = "WARN".into();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_invalid_content_type() {
        let mut config = RouterConfig::default();
        let mut route = RouteConfig::new("/x", "x");
        route.content_type = "text/plain\nX-Injected: 1".into();
        config.routes.push(route);

        assert_eq!(
            validate_config(&config).unwrap_err(),
            vec![ValidationError::InvalidContentType {
                pattern: "/x".into(),
                content_type: "text/plain\nX-Injected: 1".into(),
            }]
        );
    }

    #[test]
    fn test_duplicate_patterns_are_not_errors() {
        let mut config = RouterConfig::default();
        config.routes.push(RouteConfig::new("/same", "a"));
        config.routes.push(RouteConfig::new("same/", "b"));
        assert!(validate_config(&config).is_ok());
    }
}
