//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Requested path ("/data-insights?x=1")
//!     → table.rs (match, static redirects, matched chain)
//!     → navigator.rs (guard, guard redirects)
//!     → views.rs (eager handles, lazy resolve + cache)
//!     → Outcome: Committed | NotFound | Aborted
//!
//! Table Compilation (at startup):
//!     RouteDescriptor[] (parking.rs)
//!     → Flatten children under their layout
//!     → Check names and redirect targets
//!     → Freeze as immutable RouteTable
//! ```
//!
//! # Design Decisions
//! - Table is immutable at runtime
//! - Matching is case-insensitive and ignores a trailing slash
//! - First declared route wins
//! - Static redirects apply before the guard sees the destination

pub mod matcher;
pub mod navigator;
pub mod parking;
pub mod route;
pub mod table;
pub mod views;

pub use navigator::{Navigation, NavigationError, Navigator, Outcome, MAX_REDIRECTS};
pub use route::{Loading, RouteDescriptor, RouteLocation, RouteMeta, RouteRecord, RouteTarget};
pub use table::{RouteError, RouteTable};
pub use views::{ViewError, ViewHandle, ViewLoader, ViewRegistry};
