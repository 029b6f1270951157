//! Development reverse proxy for the portal's upstream data sources.
//!
//! # Data Flow
//! ```text
//! Request "/gdex/api/x?q=1"
//!     → rules.rs (first rule whose prefix starts the path)
//!     → strip prefix → "https://www.geelongdataexchange.com.au/api/x?q=1"
//!     → forward.rs (drop hop-by-hop headers, rewrite Host, send)
//!     → upstream response streamed back, or 502 / 504
//! ```
//!
//! # Design Decisions
//! - Rules live in an `ArcSwap` owned by the server and are replaced on reload
//! - No retries; a failed upstream is reported to the client as-is
//! - Upstream redirects are passed through, not followed

pub mod forward;
pub mod rules;

use std::time::Duration;

use axum::http::StatusCode;

pub use forward::Forwarder;
pub use rules::{ProxyRule, ProxyTable};

/// Error type for proxying.
#[derive(Debug, thiserror::Error)]
pub enum ProxyError {
    #[error("proxy rule {prefix:?} has an invalid target: {source}")]
    InvalidTarget {
        prefix: String,
        #[source]
        source: url::ParseError,
    },

    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("request body exceeds {0} bytes")]
    TooLarge(usize),

    #[error("failed to read request body: {0}")]
    Body(#[source] axum::Error),

    #[error("upstream request failed: {0}")]
    Upstream(#[source] reqwest::Error),

    #[error("upstream did not answer within {0:?}")]
    Timeout(Duration),
}

impl ProxyError {
    /// Status reported to the client.
    pub fn status(&self) -> StatusCode {
        match self {
            ProxyError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            ProxyError::TooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ProxyError::Body(_) => StatusCode::BAD_REQUEST,
            ProxyError::InvalidTarget { .. } | ProxyError::Client(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ProxyError::Upstream(_) => StatusCode::BAD_GATEWAY,
        }
    }
}
