//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router with all handlers
//! - Wire up middleware (request ID, tracing, timeout)
//! - Dispatch unclaimed paths to the dev proxy or the navigator
//! - Serve `/files/**` from the configured directory
//! - Swap proxy rules when a new configuration arrives
//! - Purge expired session credentials in the background
//! - Serve until the shutdown signal fires

use std::sync::Arc;
use std::time::{Duration, Instant};

use arc_swap::ArcSwap;
use axum::body::Body;
use axum::extract::{Request, State};
use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};
use tower_http::services::ServeDir;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::accounts::AccountStore;
use crate::config::PortalConfig;
use crate::guard::AuthGuard;
use crate::http::request::{propagate_request_id_layer, request_id, set_request_id_layer};
use crate::http::{auth_api, pages};
use crate::lifecycle::Shutdown;
use crate::observability::metrics;
use crate::proxy::{Forwarder, ProxyError, ProxyRule, ProxyTable};
use crate::routing::{Navigator, RouteError, RouteTable, ViewError, ViewLoader, ViewRegistry};
use crate::session::TokenStore;

/// Error type for server construction.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("invalid route table: {0}")]
    Routes(#[from] RouteError),

    #[error(transparent)]
    Views(#[from] ViewError),

    #[error(transparent)]
    Proxy(#[from] ProxyError),
}

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub navigator: Arc<Navigator>,
    pub accounts: Arc<AccountStore>,
    pub tokens: TokenStore,
    pub proxy: Arc<ArcSwap<ProxyTable>>,
    pub forwarder: Forwarder,
    pub secure_cookies: bool,
}

impl AppState {
    /// Build state for `config` with the portal route table.
    pub fn new(config: &PortalConfig) -> Result<Self, ServerError> {
        let table = RouteTable::parking()?;
        let views = ViewRegistry::for_table(&table, ViewLoader::new(config.views.dir.as_deref()))?;
        let navigator = Navigator::new(table, views, AuthGuard);

        Ok(Self {
            navigator: Arc::new(navigator),
            accounts: Arc::new(AccountStore::new()),
            tokens: TokenStore::with_ttl(Duration::from_secs(config.session.token_ttl_secs)),
            proxy: Arc::new(ArcSwap::from_pointee(ProxyTable::from_config(&config.proxy)?)),
            forwarder: Forwarder::new(Duration::from_secs(config.timeouts.upstream_secs))?,
            secure_cookies: config.session.secure_cookies,
        })
    }

    /// Replace the proxy rules with those of `config`.
    pub fn reload(&self, config: &PortalConfig) -> Result<(), ProxyError> {
        let table = ProxyTable::from_config(&config.proxy)?;
        tracing::info!(rules = table.len(), "Proxy rules reloaded");
        self.proxy.store(Arc::new(table));
        Ok(())
    }
}

/// HTTP server for the portal.
pub struct HttpServer {
    router: Router,
    state: AppState,
    config: PortalConfig,
}

impl HttpServer {
    pub fn new(config: PortalConfig) -> Result<Self, ServerError> {
        let state = AppState::new(&config)?;
        Ok(Self::with_state(config, state))
    }

    /// Server over prepared state (tests swap in a cheaper account store).
    pub fn with_state(config: PortalConfig, state: AppState) -> Self {
        let router = Self::build_router(&config, state.clone());
        Self { router, state, config }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &PortalConfig, state: AppState) -> Router {
        let mut router = Router::new()
            .route("/api/register", post(auth_api::register))
            .route("/api/login", post(auth_api::login))
            .route("/api/logout", post(auth_api::logout))
            .route("/_shell/routes", get(pages::list_routes))
            .route("/_shell/health", get(pages::health));

        if let Some(dir) = &config.files.dir {
            tracing::info!(dir = %dir, "Serving static files under /files");
            router = router.nest_service("/files", ServeDir::new(dir));
        }

        router
            .fallback(dispatch)
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                tracing::info_span!(
                    "request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = %request_id(request.headers()),
                )
            }))
            .layer(propagate_request_id_layer())
            .layer(set_request_id_layer())
    }

    /// A clone of the router, for driving requests without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn config(&self) -> &PortalConfig {
        &self.config
    }

    /// Serve on `listener` until `shutdown` fires. New configurations from
    /// `config_updates` replace the proxy rules in place.
    pub async fn run(
        self,
        listener: TcpListener,
        config_updates: Option<mpsc::UnboundedReceiver<PortalConfig>>,
        shutdown: Shutdown,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        if let Some(updates) = config_updates {
            tokio::spawn(apply_updates(self.state.clone(), updates, shutdown.subscribe()));
        }
        tokio::spawn(sweep_tokens(
            self.state.tokens.clone(),
            Duration::from_secs(self.config.session.sweep_interval_secs),
            shutdown.subscribe(),
        ));

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown.wait())
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

async fn apply_updates(
    state: AppState,
    mut updates: mpsc::UnboundedReceiver<PortalConfig>,
    mut stop: broadcast::Receiver<()>,
) {
    loop {
        tokio::select! {
            update = updates.recv() => match update {
                Some(config) => {
                    if let Err(e) = state.reload(&config) {
                        tracing::error!(error = %e, "Failed to apply config; keeping current proxy rules");
                    }
                }
                None => break,
            },
            _ = stop.recv() => break,
        }
    }
    tracing::debug!("Config update task stopped");
}

/// Periodically drop credentials whose browser session ended without a logout.
async fn sweep_tokens(tokens: TokenStore, every: Duration, mut stop: broadcast::Receiver<()>) {
    let mut ticker = tokio::time::interval(every);
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                tokens.purge_expired();
            }
            _ = stop.recv() => break,
        }
    }
    tracing::debug!("Token sweep task stopped");
}

/// Everything not claimed by an explicit route: proxy prefixes first, then
/// page navigation for GET/HEAD.
async fn dispatch(State(state): State<AppState>, request: Request) -> Response {
    let rule = state.proxy.load().find(request.uri().path()).cloned();
    if let Some(rule) = rule {
        return proxy_handler(&state, rule, request).await;
    }

    if request.method() != Method::GET && request.method() != Method::HEAD {
        return StatusCode::METHOD_NOT_ALLOWED.into_response();
    }

    let (parts, _) = request.into_parts();
    pages::navigate(State(state), parts.headers, parts.uri).await
}

async fn proxy_handler(state: &AppState, rule: ProxyRule, request: Request) -> Response {
    let start_time = Instant::now();
    let request_id = request_id(request.headers()).to_string();
    let upstream = rule.upstream_url(request.uri().path(), request.uri().query());

    tracing::debug!(
        request_id = %request_id,
        method = %request.method(),
        prefix = %rule.prefix,
        upstream = %upstream,
        "Proxying request"
    );

    match state.forwarder.forward(&rule, upstream, request).await {
        Ok(response) => {
            metrics::record_proxy(&rule.prefix, response.status().as_u16(), start_time);
            response
        }
        Err(e) => {
            let status = e.status();
            tracing::error!(request_id = %request_id, prefix = %rule.prefix, error = %e, "Upstream error");
            metrics::record_proxy(&rule.prefix, status.as_u16(), start_time);
            (status, e.to_string()).into_response()
        }
    }
}
