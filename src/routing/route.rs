//! Route descriptors: the static, declarative half of routing.

use std::sync::Arc;

/// How a route's view component is loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Loading {
    /// Resolved when the registry is built.
    Eager,
    /// Resolved on first navigation to the route, then cached.
    Lazy,
}

/// Optional per-route metadata.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RouteMeta {
    /// Declared for an admin-only area. Nothing enforces it yet.
    pub require_admin: bool,
}

/// A navigable path bound to a view component, possibly owning children.
#[derive(Debug, Clone)]
pub struct RouteDescriptor {
    /// Absolute for top-level routes, relative for children.
    pub path: String,
    pub name: String,
    /// Component identifier, e.g. "Parking/DataInsights".
    pub component: String,
    pub loading: Loading,
    pub meta: RouteMeta,
    /// Static redirect applied before the guard runs.
    pub redirect: Option<String>,
    pub children: Vec<RouteDescriptor>,
}

impl RouteDescriptor {
    /// An eagerly loaded route.
    pub fn new(path: impl Into<String>, name: impl Into<String>, component: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
            component: component.into(),
            loading: Loading::Eager,
            meta: RouteMeta::default(),
            redirect: None,
            children: Vec::new(),
        }
    }

    /// A lazily loaded route.
    pub fn lazy(path: impl Into<String>, name: impl Into<String>, component: impl Into<String>) -> Self {
        Self {
            loading: Loading::Lazy,
            ..Self::new(path, name, component)
        }
    }

    pub fn with_redirect(mut self, target: impl Into<String>) -> Self {
        self.redirect = Some(target.into());
        self
    }

    pub fn with_meta(mut self, meta: RouteMeta) -> Self {
        self.meta = meta;
        self
    }

    pub fn with_children(mut self, children: Vec<RouteDescriptor>) -> Self {
        self.children = children;
        self
    }
}

/// A flattened route with its absolute path, as stored in the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteRecord {
    pub path: String,
    pub name: String,
    pub component: String,
    pub loading: Loading,
    pub meta: RouteMeta,
    pub redirect: Option<String>,
    /// Index of the owning layout record.
    pub parent: Option<usize>,
}

/// Where a navigation is heading, in the form handed to guards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteLocation {
    /// `None` when no route matched the path.
    pub name: Option<String>,
    /// Absolute path of the matched route, or the requested path when nothing matched.
    pub path: String,
    /// Query string without the leading '?'.
    pub query: Option<String>,
    /// Matched records from the outermost layout to the leaf.
    pub matched: Vec<Arc<RouteRecord>>,
    /// Merged metadata of the matched chain.
    pub meta: RouteMeta,
    /// Path originally requested when a static redirect was applied.
    pub redirected_from: Option<String>,
}

impl RouteLocation {
    /// A location that matched no route.
    pub fn unmatched(path: impl Into<String>, query: Option<String>) -> Self {
        Self {
            name: None,
            path: path.into(),
            query,
            matched: Vec::new(),
            meta: RouteMeta::default(),
            redirected_from: None,
        }
    }

    pub fn is_matched(&self) -> bool {
        !self.matched.is_empty()
    }

    /// The innermost matched record.
    pub fn leaf(&self) -> Option<&RouteRecord> {
        self.matched.last().map(Arc::as_ref)
    }
}

/// Target of a guard redirect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteTarget {
    Name(String),
    Path(String),
}

impl RouteTarget {
    pub fn name(name: impl Into<String>) -> Self {
        RouteTarget::Name(name.into())
    }

    pub fn path(path: impl Into<String>) -> Self {
        RouteTarget::Path(path.into())
    }
}

impl std::fmt::Display for RouteTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RouteTarget::Name(name) => write!(f, "{{name: {}}}", name),
            RouteTarget::Path(path) => write!(f, "{}", path),
        }
    }
}
