//! Page navigation over HTTP, plus the `/_shell` introspection endpoints.
//!
//! # Responses
//! - `200 text/html`: the leaf view document
//! - `302 Location`: static or guard redirect
//! - `204`: the guard cancelled the navigation
//! - `404`: no route matched and the guard let it through
//! - `500`: navigation or view resolution failed

use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode, Uri};
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::http::request::request_id;
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::routing::{Loading, Navigation, Outcome, RouteLocation};
use crate::session::CookieSession;

/// Entry of `GET /_shell/routes`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteSummary {
    pub path: String,
    pub name: String,
    pub component: String,
    pub lazy: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
}

/// `GET /_shell/routes`
pub async fn list_routes(State(state): State<AppState>) -> Json<Vec<RouteSummary>> {
    let records = state.navigator.table().records();
    let summaries = records
        .iter()
        .map(|record| RouteSummary {
            path: record.path.clone(),
            name: record.name.clone(),
            component: record.component.clone(),
            lazy: record.loading == Loading::Lazy,
            redirect: record.redirect.clone(),
            parent: record.parent.map(|i| records[i].name.clone()),
        })
        .collect();
    Json(summaries)
}

/// `GET /_shell/health`
pub async fn health() -> &'static str {
    "ok"
}

/// Navigate to the request path and render the result.
pub async fn navigate(State(state): State<AppState>, headers: HeaderMap, uri: Uri) -> Response {
    let target = uri.path_and_query().map(|pq| pq.as_str()).unwrap_or("/").to_string();
    let session = CookieSession::from_headers(&headers);
    let from = referer_path(&headers)
        .map(|path| state.navigator.locate(&path))
        .filter(RouteLocation::is_matched);

    // Lazy views may be read from disk on first use.
    let navigator = state.navigator.clone();
    let path = target.clone();
    let result = tokio::task::spawn_blocking(move || navigator.navigate(&path, from.as_ref(), &session)).await;
    let target = target.as_str();

    let result = match result {
        Ok(result) => result,
        Err(e) => {
            metrics::record_navigation("error");
            tracing::error!(request_id = %request_id(&headers), path = target, error = %e, "Navigation task failed");
            return (StatusCode::INTERNAL_SERVER_ERROR, "Navigation failed").into_response();
        }
    };

    match result {
        Ok(outcome) => {
            metrics::record_navigation(outcome.label());
            tracing::debug!(
                request_id = %request_id(&headers),
                path = target,
                outcome = outcome.label(),
                "Navigation finished"
            );
            render(outcome)
        }
        Err(e) => {
            metrics::record_navigation("error");
            tracing::error!(request_id = %request_id(&headers), path = target, error = %e, "Navigation failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "Navigation failed").into_response()
        }
    }
}

fn render(outcome: Outcome) -> Response {
    match outcome {
        Outcome::Committed(nav) if nav.was_redirected() => redirect_to(&nav),
        Outcome::Committed(nav) => match nav.leaf_view() {
            Some(view) => Html(view.document.to_string()).into_response(),
            None => StatusCode::NOT_FOUND.into_response(),
        },
        Outcome::NotFound(_) => (StatusCode::NOT_FOUND, "Not Found").into_response(),
        Outcome::Aborted(_) => StatusCode::NO_CONTENT.into_response(),
    }
}

fn redirect_to(nav: &Navigation) -> Response {
    let location = match &nav.location.query {
        Some(query) => format!("{}?{}", nav.location.path, query),
        None => nav.location.path.clone(),
    };
    (StatusCode::FOUND, [(header::LOCATION, location)]).into_response()
}

/// Path named by the `Referer` header, absolute URL or bare path.
fn referer_path(headers: &HeaderMap) -> Option<String> {
    let referer = headers.get(header::REFERER)?.to_str().ok()?;
    if referer.starts_with('/') {
        return Some(referer.to_string());
    }
    Url::parse(referer).ok().map(|url| url.path().to_string())
}
