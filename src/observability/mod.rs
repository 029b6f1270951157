//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (tracing subscriber, structured events)
//!     → metrics.rs (navigation and proxy counters, proxy latency)
//!
//! Consumers:
//!     → stdout (fmt layer)
//!     → Metrics endpoint (Prometheus scrape, optional)
//! ```
//!
//! # Design Decisions
//! - `RUST_LOG` wins over the configured level
//! - Request ID is attached by the HTTP layer and appears in every span
//! - Metric calls are no-ops until a recorder is installed

pub mod logging;
pub mod metrics;
