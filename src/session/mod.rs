//! Session subsystem.
//!
//! # Data Flow
//! ```text
//! Login (accounts API)
//!     → tokens.rs (issue credential)
//!     → cookie.rs (session cookies saToken / role)
//!
//! Every navigation:
//!     Cookie header
//!     → cookie.rs (CookieSession)
//!     → storage.rs (SessionStorage, read-only)
//!     → navigation guard
//! ```
//!
//! # Design Decisions
//! - The guard only ever sees the `SessionStorage` trait, never cookies
//! - Credential presence is what counts; the token store backs logout

pub mod cookie;
pub mod storage;
pub mod tokens;

pub use cookie::CookieSession;
pub use storage::{get_role, get_token, keys, MemorySession, SessionStorage};
pub use tokens::{TokenInfo, TokenStore};
