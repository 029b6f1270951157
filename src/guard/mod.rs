//! Navigation guards.
//!
//! # Data Flow
//! ```text
//! Navigator resolves destination
//!     → invoke() builds a fresh Next
//!     → NavigationGuard::before_each(to, from, session, next)
//!     → Verdict (Proceed | Redirect | Abort)
//!     → Navigator commits, restarts, or cancels
//! ```
//!
//! # Design Decisions
//! - Guards are synchronous and perform no I/O
//! - Session state is injected read-only; guards never touch cookies
//! - `Next` is move-only, so the continuation runs exactly once

pub mod auth;
pub mod next;

use tracing::trace;

use crate::routing::route::RouteLocation;
use crate::session::SessionStorage;

pub use auth::{AuthGuard, PUBLIC_ROUTES};
pub use next::{Decision, Next, Verdict};

/// A hook run before a navigation is committed.
pub trait NavigationGuard: Send + Sync {
    /// Name used in logs.
    fn name(&self) -> &str {
        "guard"
    }

    fn before_each(
        &self,
        to: &RouteLocation,
        from: Option<&RouteLocation>,
        session: &dyn SessionStorage,
        next: Next,
    ) -> Verdict;
}

impl<F> NavigationGuard for F
where
    F: Fn(&RouteLocation, Option<&RouteLocation>, &dyn SessionStorage, Next) -> Verdict + Send + Sync,
{
    fn before_each(
        &self,
        to: &RouteLocation,
        from: Option<&RouteLocation>,
        session: &dyn SessionStorage,
        next: Next,
    ) -> Verdict {
        self(to, from, session, next)
    }
}

/// Run `guard` once for a navigation and return its decision.
pub fn invoke(
    guard: &dyn NavigationGuard,
    to: &RouteLocation,
    from: Option<&RouteLocation>,
    session: &dyn SessionStorage,
) -> Decision {
    let decision = guard.before_each(to, from, session, Next::new()).into_decision();
    trace!(guard = guard.name(), to = %to.path, decision = ?decision, "Guard decided");
    decision
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::route::RouteTarget;
    use crate::session::MemorySession;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_closure_guard() {
        let calls = AtomicUsize::new(0);
        let guard = |_: &RouteLocation, _: Option<&RouteLocation>, _: &dyn SessionStorage, next: Next| {
            calls.fetch_add(1, Ordering::SeqCst);
            next.redirect(RouteTarget::path("/elsewhere"))
        };

        let to = RouteLocation::unmatched("/x", None);
        let decision = invoke(&guard, &to, None, &MemorySession::anonymous());

        assert_eq!(decision, Decision::Redirect(RouteTarget::path("/elsewhere")));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
