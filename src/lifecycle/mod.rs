//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Shutdown::trigger
//!
//! Shutdown (shutdown.rs):
//!     trigger → axum stops accepting → in-flight requests drain
//!             → config reload task exits
//! ```
//!
//! # Design Decisions
//! - One broadcast channel; every long-running task subscribes
//! - Triggering twice is harmless

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
