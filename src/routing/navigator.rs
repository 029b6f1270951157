//! The routing runtime: resolve, guard, redirect, load views.
//!
//! # Responsibilities
//! - Resolve a requested path against the route table
//! - Run the navigation guard before committing
//! - Follow guard redirects (bounded)
//! - Resolve the matched view chain through the registry

use crate::guard::{self, Decision, NavigationGuard};
use crate::routing::route::{RouteLocation, RouteTarget};
use crate::routing::table::RouteTable;
use crate::routing::views::{ViewError, ViewHandle, ViewRegistry};
use crate::session::SessionStorage;

/// Upper bound on guard redirects within one navigation.
pub const MAX_REDIRECTS: usize = 10;

/// Error type for navigation.
#[derive(Debug, thiserror::Error)]
pub enum NavigationError {
    #[error("guard redirected to {0}, which matches no route")]
    UnknownTarget(RouteTarget),

    #[error("navigation to {0:?} redirected more than {max} times", max = MAX_REDIRECTS)]
    RedirectLoop(String),

    #[error(transparent)]
    View(#[from] ViewError),
}

/// A committed navigation.
#[derive(Debug, Clone)]
pub struct Navigation {
    pub location: RouteLocation,
    /// One view per matched record, outermost layout first.
    pub views: Vec<ViewHandle>,
    /// Guard redirects taken, in order.
    pub redirects: Vec<RouteTarget>,
    /// Path originally requested.
    pub requested: String,
}

impl Navigation {
    /// True when the final location differs from what was asked for, either
    /// through a static redirect or a guard redirect.
    pub fn was_redirected(&self) -> bool {
        !self.redirects.is_empty() || self.location.redirected_from.is_some()
    }

    /// The innermost view.
    pub fn leaf_view(&self) -> Option<&ViewHandle> {
        self.views.last()
    }
}

/// Result of a navigation attempt.
#[derive(Debug, Clone)]
pub enum Outcome {
    Committed(Navigation),
    /// The guard let the navigation through but no route matched.
    NotFound(RouteLocation),
    Aborted(RouteLocation),
}

impl Outcome {
    pub fn label(&self) -> &'static str {
        match self {
            Outcome::Committed(nav) if nav.was_redirected() => "redirected",
            Outcome::Committed(_) => "committed",
            Outcome::NotFound(_) => "not_found",
            Outcome::Aborted(_) => "aborted",
        }
    }
}

/// Route table + guard + view registry.
pub struct Navigator {
    table: RouteTable,
    views: ViewRegistry,
    guard: Box<dyn NavigationGuard>,
}

impl Navigator {
    pub fn new(table: RouteTable, views: ViewRegistry, guard: impl NavigationGuard + 'static) -> Self {
        Self {
            table,
            views,
            guard: Box::new(guard),
        }
    }

    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    pub fn views(&self) -> &ViewRegistry {
        &self.views
    }

    /// Resolve a path without guarding it (e.g. the origin of a navigation).
    pub fn locate(&self, path: &str) -> RouteLocation {
        self.table.resolve(path)
    }

    /// Navigate to `path` coming from `from`.
    pub fn navigate(
        &self,
        path: &str,
        from: Option<&RouteLocation>,
        session: &dyn SessionStorage,
    ) -> Result<Outcome, NavigationError> {
        let mut to = self.table.resolve(path);
        let mut redirects = Vec::new();

        loop {
            match guard::invoke(self.guard.as_ref(), &to, from, session) {
                Decision::Proceed => break,
                Decision::Abort => {
                    tracing::debug!(path = %to.path, "Navigation aborted by guard");
                    return Ok(Outcome::Aborted(to));
                }
                Decision::Redirect(target) => {
                    if redirects.len() >= MAX_REDIRECTS {
                        return Err(NavigationError::RedirectLoop(path.to_string()));
                    }
                    tracing::debug!(from = %to.path, to = %target, "Guard redirect");
                    to = self
                        .table
                        .resolve_target(&target)
                        .ok_or_else(|| NavigationError::UnknownTarget(target.clone()))?;
                    redirects.push(target);
                }
            }
        }

        if !to.is_matched() {
            return Ok(Outcome::NotFound(to));
        }

        let views = to
            .matched
            .iter()
            .map(|record| self.views.resolve(&record.name))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Outcome::Committed(Navigation {
            location: to,
            views,
            redirects,
            requested: path.to_string(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::guard::{AuthGuard, Next, Verdict};
    use crate::routing::parking::{DEFAULT_PATH, LOGIN_AND_REGISTER, PARKING_DISCOVERY_NEW};
    use crate::routing::views::ViewLoader;
    use crate::session::MemorySession;

    fn parking_navigator() -> Navigator {
        let table = RouteTable::parking().unwrap();
        let views = ViewRegistry::for_table(&table, ViewLoader::placeholder()).unwrap();
        Navigator::new(table, views, AuthGuard)
    }

    fn committed(outcome: Outcome) -> Navigation {
        match outcome {
            Outcome::Committed(nav) => nav,
            other => panic!("expected committed navigation, got {:?}", other),
        }
    }

    #[test]
    fn test_anonymous_redirected_to_login_once() {
        let nav = committed(
            parking_navigator()
                .navigate("/parking-discovery-new", None, &MemorySession::anonymous())
                .unwrap(),
        );
        assert_eq!(nav.location.name.as_deref(), Some(LOGIN_AND_REGISTER));
        assert_eq!(nav.location.path, "/LoginAndRegister");
        assert_eq!(nav.redirects, vec![RouteTarget::name(LOGIN_AND_REGISTER)]);
    }

    #[test]
    fn test_authenticated_root_lands_on_primary_child() {
        let nav = committed(
            parking_navigator()
                .navigate("/", None, &MemorySession::with_token("tok123"))
                .unwrap(),
        );
        assert_eq!(nav.location.name.as_deref(), Some(PARKING_DISCOVERY_NEW));
        assert_eq!(nav.location.path, DEFAULT_PATH);
        assert!(nav.redirects.is_empty());
        assert!(nav.was_redirected());

        let components: Vec<_> = nav.views.iter().map(|v| v.component.as_str()).collect();
        assert_eq!(components, vec!["layout/layout", "Parking/ParkingDiscoveryNew"]);
    }

    #[test]
    fn test_lazy_layout_resolved_on_first_navigation() {
        let navigator = parking_navigator();
        assert!(!navigator.views().is_resolved("layout"));
        assert!(navigator.views().is_resolved(PARKING_DISCOVERY_NEW));

        let session = MemorySession::with_token("tok");
        navigator.navigate("/data-insights", None, &session).unwrap();
        navigator.navigate("/parking-discovery-new", None, &session).unwrap();

        assert!(navigator.views().is_resolved("layout"));
        assert_eq!(navigator.views().resolution_count("layout"), 1);
    }

    #[test]
    fn test_unknown_path() {
        let navigator = parking_navigator();

        let outcome = navigator
            .navigate("/nowhere", None, &MemorySession::with_token("tok"))
            .unwrap();
        assert!(matches!(outcome, Outcome::NotFound(ref l) if l.path == "/nowhere"));

        let nav = committed(
            navigator
                .navigate("/nowhere", None, &MemorySession::anonymous())
                .unwrap(),
        );
        assert_eq!(nav.location.name.as_deref(), Some(LOGIN_AND_REGISTER));
    }

    #[test]
    fn test_redirect_loop_is_bounded() {
        let table = RouteTable::parking().unwrap();
        let views = ViewRegistry::for_table(&table, ViewLoader::placeholder()).unwrap();
        let always_redirect = |_: &RouteLocation, _: Option<&RouteLocation>, _: &dyn SessionStorage, next: Next| -> Verdict {
            next.redirect(RouteTarget::name(LOGIN_AND_REGISTER))
        };
        let navigator = Navigator::new(table, views, always_redirect);

        let err = navigator
            .navigate("/", None, &MemorySession::anonymous())
            .unwrap_err();
        assert!(matches!(err, NavigationError::RedirectLoop(_)));
    }

    #[test]
    fn test_unknown_redirect_target() {
        let table = RouteTable::parking().unwrap();
        let views = ViewRegistry::for_table(&table, ViewLoader::placeholder()).unwrap();
        let to_nowhere = |_: &RouteLocation, _: Option<&RouteLocation>, _: &dyn SessionStorage, next: Next| -> Verdict {
            next.redirect(RouteTarget::name("passwordRecovery"))
        };
        let navigator = Navigator::new(table, views, to_nowhere);

        let err = navigator
            .navigate("/data-insights", None, &MemorySession::anonymous())
            .unwrap_err();
        assert!(matches!(err, NavigationError::UnknownTarget(_)));
    }

    #[test]
    fn test_abort() {
        let table = RouteTable::parking().unwrap();
        let views = ViewRegistry::for_table(&table, ViewLoader::placeholder()).unwrap();
        let abort = |_: &RouteLocation, _: Option<&RouteLocation>, _: &dyn SessionStorage, next: Next| -> Verdict {
            next.abort()
        };
        let navigator = Navigator::new(table, views, abort);

        let outcome = navigator
            .navigate("/data-insights", None, &MemorySession::anonymous())
            .unwrap();
        assert_eq!(outcome.label(), "aborted");
    }

    #[test]
    fn test_origin_is_passed_to_guard() {
        let table = RouteTable::parking().unwrap();
        let views = ViewRegistry::for_table(&table, ViewLoader::placeholder()).unwrap();
        let requires_origin = |_: &RouteLocation, from: Option<&RouteLocation>, _: &dyn SessionStorage, next: Next| -> Verdict {
            match from.and_then(|f| f.name.as_deref()) {
                Some("DataInsights") => next.proceed(),
                _ => next.abort(),
            }
        };
        let navigator = Navigator::new(table, views, requires_origin);
        let from = navigator.locate("/data-insights");

        let outcome = navigator
            .navigate("/parking-discovery-new", Some(&from), &MemorySession::anonymous())
            .unwrap();
        assert_eq!(outcome.label(), "committed");
    }
}
