//! The continuation handed to navigation guards.

use crate::routing::route::RouteTarget;

/// What a guard decided for one navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Commit the navigation.
    Proceed,
    /// Abandon this navigation and start a new one towards the target.
    Redirect(RouteTarget),
    /// Cancel the navigation.
    Abort,
}

/// Proof that a guard called its continuation.
///
/// Only [`Next`] can produce a `Verdict`, and `Next` is consumed by doing so,
/// so a guard returning a `Verdict` has called its continuation exactly once.
#[derive(Debug, PartialEq, Eq)]
#[must_use]
pub struct Verdict(Decision);

impl Verdict {
    pub fn decision(&self) -> &Decision {
        &self.0
    }

    pub fn into_decision(self) -> Decision {
        self.0
    }
}

/// Continuation for a single guard invocation.
#[derive(Debug)]
pub struct Next {
    _private: (),
}

impl Next {
    pub(crate) fn new() -> Self {
        Self { _private: () }
    }

    /// `next()`
    pub fn proceed(self) -> Verdict {
        Verdict(Decision::Proceed)
    }

    /// `next({ name })` / `next(path)`
    pub fn redirect(self, target: RouteTarget) -> Verdict {
        Verdict(Decision::Redirect(target))
    }

    /// `next(false)`
    pub fn abort(self) -> Verdict {
        Verdict(Decision::Abort)
    }
}
