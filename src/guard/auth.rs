//! Authentication gate run before every navigation.

use tracing::debug;

use crate::guard::next::{Next, Verdict};
use crate::guard::NavigationGuard;
use crate::routing::parking::LOGIN_AND_REGISTER;
use crate::routing::route::{RouteLocation, RouteTarget};
use crate::session::{get_role, get_token, SessionStorage};

/// Route names reachable without a session credential.
pub const PUBLIC_ROUTES: [&str; 3] = [LOGIN_AND_REGISTER, "passwordRecovery", "wsChart"];

/// Lets authenticated sessions through and sends anonymous ones to the login
/// page, unless the destination is public.
///
/// `role` and `requireAdmin` are read for the diagnostic line only; no route
/// is restricted by role.
#[derive(Debug, Clone, Copy, Default)]
pub struct AuthGuard;

impl AuthGuard {
    pub fn new() -> Self {
        Self
    }

    pub fn is_public(name: Option<&str>) -> bool {
        name.is_some_and(|name| PUBLIC_ROUTES.contains(&name))
    }
}

impl NavigationGuard for AuthGuard {
    fn name(&self) -> &str {
        "auth"
    }

    fn before_each(
        &self,
        to: &RouteLocation,
        from: Option<&RouteLocation>,
        session: &dyn SessionStorage,
        next: Next,
    ) -> Verdict {
        let token = get_token(session);
        let role = get_role(session);
        debug!(
            to = ?to.name,
            from = ?from.and_then(|f| f.name.as_deref()),
            authenticated = token.is_some(),
            role = ?role,
            require_admin = to.meta.require_admin,
            "Auth guard invoked"
        );

        if token.is_some() {
            return next.proceed();
        }

        if Self::is_public(to.name.as_deref()) {
            next.proceed()
        } else {
            next.redirect(RouteTarget::name(LOGIN_AND_REGISTER))
        }
    }
}
