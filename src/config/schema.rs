//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the portal.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the parking portal.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PortalConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Where view documents are loaded from.
    pub views: ViewsConfig,

    /// Session cookie settings.
    pub session: SessionConfig,

    /// Static file directory served under `/files`.
    pub files: FilesConfig,

    /// Development proxy rules, matched in declaration order.
    pub proxy: Vec<ProxyRuleConfig>,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            listener: ListenerConfig::default(),
            timeouts: TimeoutConfig::default(),
            observability: ObservabilityConfig::default(),
            views: ViewsConfig::default(),
            session: SessionConfig::default(),
            files: FilesConfig::default(),
            proxy: default_proxy_rules(),
        }
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "127.0.0.1:5173").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:5173".to_string(),
        }
    }
}

/// Timeout configuration for various operations.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,

    /// Timeout for a single upstream round trip in seconds.
    pub upstream_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            request_secs: 30,
            upstream_secs: 20,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
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
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}

/// View document source.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ViewsConfig {
    /// Directory holding `<component>.html` documents. When unset every view
    /// resolves to a placeholder document.
    pub dir: Option<String>,
}

/// Session cookie configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Mark session cookies `Secure` (HTTPS only).
    pub secure_cookies: bool,

    /// Lifetime of an issued credential in seconds.
    pub token_ttl_secs: u64,

    /// How often expired credentials are purged, in seconds.
    pub sweep_interval_secs: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            secure_cookies: false,
            token_ttl_secs: 12 * 60 * 60,
            sweep_interval_secs: 5 * 60,
        }
    }
}

/// Uploaded and generated files.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct FilesConfig {
    /// Directory mapped to `/files/**`. Nothing is served when unset.
    pub dir: Option<String>,
}

/// A development proxy rule: requests under `prefix` are forwarded to
/// `target` with the prefix stripped.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct ProxyRuleConfig {
    /// Local path prefix, e.g. "/gdex".
    pub prefix: String,

    /// Upstream base URL, e.g. "https://nominatim.openstreetmap.org".
    pub target: String,

    /// Rewrite the Host header to the upstream authority.
    #[serde(default = "default_true")]
    pub change_origin: bool,

    /// Verify upstream TLS certificates.
    #[serde(default = "default_true")]
    pub secure: bool,
}

fn default_true() -> bool {
    true
}

impl ProxyRuleConfig {
    pub fn new(prefix: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            target: target.into(),
            change_origin: true,
            secure: true,
        }
    }
}

/// The four upstream data sources the portal talks to during development.
pub fn default_proxy_rules() -> Vec<ProxyRuleConfig> {
    vec![
        ProxyRuleConfig::new("/gdex", "https://www.geelongdataexchange.com.au"),
        ProxyRuleConfig::new("/nominatim", "https://nominatim.openstreetmap.org"),
        ProxyRuleConfig::new("/datavic", "https://discover.data.vic.gov.au"),
        ProxyRuleConfig::new("/gmaps", "https://maps.googleapis.com"),
    ]
}
