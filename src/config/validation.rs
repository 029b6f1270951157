//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate addresses and value ranges (timeouts > 0)
//! - Detect conflicting proxy prefixes
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: PortalConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;
use std::net::SocketAddr;

use crate::config::schema::PortalConfig;

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("invalid bind address {0:?}")]
    BindAddress(String),

    #[error("{0} must be greater than zero")]
    ZeroTimeout(&'static str),

    #[error("invalid metrics address {0:?}")]
    MetricsAddress(String),

    #[error("proxy prefix {0:?} must start with '/' and not end with '/'")]
    ProxyPrefix(String),

    #[error("proxy prefix {0:?} is declared more than once")]
    DuplicatePrefix(String),

    #[error("proxy target {target:?} for {prefix:?} is not an http(s) URL")]
    ProxyTarget { prefix: String, target: String },
}

/// Validate a parsed configuration, collecting every problem.
pub fn validate_config(config: &PortalConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(config.listener.bind_address.clone()));
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("timeouts.request_secs"));
    }
    if config.timeouts.upstream_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("timeouts.upstream_secs"));
    }
    if config.session.token_ttl_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("session.token_ttl_secs"));
    }
    if config.session.sweep_interval_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("session.sweep_interval_secs"));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::MetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    let mut seen = HashSet::new();
    for rule in &config.proxy {
        if !rule.prefix.starts_with('/') || rule.prefix.len() < 2 || rule.prefix.ends_with('/') {
            errors.push(ValidationError::ProxyPrefix(rule.prefix.clone()));
        }
        if !seen.insert(rule.prefix.as_str()) {
            errors.push(ValidationError::DuplicatePrefix(rule.prefix.clone()));
        }
        let target_ok = url::Url::parse(&rule.target)
            .map(|u| matches!(u.scheme(), "http" | "https") && u.host().is_some())
            .unwrap_or(false);
        if !target_ok {
            errors.push(ValidationError::ProxyTarget {
                prefix: rule.prefix.clone(),
                target: rule.target.clone(),
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
