//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, trace, timeout)
//!     → /api/*        → auth_api.rs → response.rs (JSON envelope)
//!     → /_shell/*     → pages.rs (route listing, health)
//!     → proxy prefix  → server.rs → proxy::Forwarder → upstream
//!     → anything else → pages.rs → routing::Navigator → HTML / 302 / 404
//! ```

pub mod auth_api;
pub mod pages;
pub mod request;
pub mod response;
pub mod server;

pub use request::X_REQUEST_ID;
pub use response::Envelope;
pub use server::{AppState, HttpServer, ServerError};
