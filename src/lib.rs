//! Parking portal application shell: route table, authentication guard,
//! session storage, accounts API and the development reverse proxy.

pub mod accounts;
pub mod config;
pub mod guard;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod proxy;
pub mod routing;
pub mod session;

pub use config::PortalConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
