//! User accounts behind the login/register page.
//!
//! # Data Flow
//! ```text
//! POST /api/register → AccountStore::register (bcrypt hash, unique username)
//! POST /api/login    → AccountStore::authenticate
//!                    → TokenStore::issue → saToken / role cookies
//! POST /api/logout   → TokenStore::revoke → cookies expired
//! ```
//!
//! Accounts live in memory for the lifetime of the process.

pub mod store;

pub use store::{Account, AccountError, AccountStore, DEFAULT_ROLE};
