//! Route lookup.
//!
//! # Responsibilities
//! - Flatten nested descriptors into records with absolute paths
//! - Resolve a requested path to a matched chain (layout → leaf)
//! - Apply static redirects before guards run
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - Redirect targets and name uniqueness are checked at construction
//! - Explicit unmatched location rather than a silent default

use std::collections::HashSet;
use std::sync::Arc;

use crate::routing::matcher;
use crate::routing::route::{RouteDescriptor, RouteLocation, RouteMeta, RouteRecord, RouteTarget};

/// Upper bound on chained static redirects.
const MAX_STATIC_REDIRECTS: usize = 8;

/// Error type for route table construction.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RouteError {
    #[error("route name {0:?} is declared more than once")]
    DuplicateName(String),

    #[error("route {route:?} redirects to {target:?}, which matches no route")]
    DanglingRedirect { route: String, target: String },

    #[error("static redirects starting at {0:?} never settle")]
    RedirectCycle(String),
}

/// Immutable, compiled route table.
#[derive(Debug, Clone)]
pub struct RouteTable {
    records: Vec<Arc<RouteRecord>>,
}

impl RouteTable {
    /// Compile a table from nested descriptors.
    pub fn new(routes: Vec<RouteDescriptor>) -> Result<Self, RouteError> {
        let mut records = Vec::new();
        for route in routes {
            flatten(route, None, "/", &mut records);
        }

        let mut names = HashSet::new();
        for record in &records {
            if !names.insert(record.name.as_str()) {
                return Err(RouteError::DuplicateName(record.name.clone()));
            }
        }

        let table = Self {
            records: records.into_iter().map(Arc::new).collect(),
        };
        table.check_redirects()?;
        Ok(table)
    }

    fn check_redirects(&self) -> Result<(), RouteError> {
        for record in &self.records {
            let Some(target) = &record.redirect else { continue };
            if self.find_record(target).is_none() {
                return Err(RouteError::DanglingRedirect {
                    route: record.name.clone(),
                    target: target.clone(),
                });
            }
        }
        // Every target exists, so an unmatched result means the chain never settled.
        for record in self.records.iter().filter(|r| r.redirect.is_some()) {
            if !self.resolve(&record.path).is_matched() {
                return Err(RouteError::RedirectCycle(record.path.clone()));
            }
        }
        Ok(())
    }

    fn find_record(&self, path: &str) -> Option<usize> {
        self.records
            .iter()
            .position(|record| matcher::matches(&record.path, path))
    }

    fn chain(&self, index: usize) -> Vec<Arc<RouteRecord>> {
        let mut chain = Vec::new();
        let mut cursor = Some(index);
        while let Some(i) = cursor {
            chain.push(self.records[i].clone());
            cursor = self.records[i].parent;
        }
        chain.reverse();
        chain
    }

    /// Resolve a requested path ("path?query") to a location.
    ///
    /// Static redirects are followed; a path matching nothing yields an
    /// unmatched location rather than an error.
    pub fn resolve(&self, raw: &str) -> RouteLocation {
        let (requested, query) = matcher::split_query(raw);
        let query = query.map(str::to_owned);
        let mut path = requested.to_string();
        let mut redirected_from = None;

        for _ in 0..=MAX_STATIC_REDIRECTS {
            let Some(index) = self.find_record(&path) else {
                let mut location = RouteLocation::unmatched(path, query);
                location.redirected_from = redirected_from;
                return location;
            };

            let record = &self.records[index];
            if let Some(target) = &record.redirect {
                tracing::trace!(from = %path, to = %target, "Static redirect");
                redirected_from.get_or_insert_with(|| requested.to_string());
                path = target.clone();
                continue;
            }

            let matched = self.chain(index);
            let meta = RouteMeta {
                require_admin: matched.iter().any(|r| r.meta.require_admin),
            };
            return RouteLocation {
                name: Some(record.name.clone()),
                path: record.path.clone(),
                query,
                matched,
                meta,
                redirected_from,
            };
        }

        tracing::warn!(path = %requested, "Static redirect chain too long");
        RouteLocation::unmatched(requested, query)
    }

    /// Resolve a guard redirect target.
    pub fn resolve_target(&self, target: &RouteTarget) -> Option<RouteLocation> {
        match target {
            RouteTarget::Name(name) => {
                let record = self.records.iter().find(|r| &r.name == name)?;
                Some(self.resolve(&record.path))
            }
            RouteTarget::Path(path) => Some(self.resolve(path)),
        }
    }

    /// Absolute path of the route called `name`.
    pub fn path_of(&self, name: &str) -> Option<&str> {
        self.records
            .iter()
            .find(|r| r.name == name)
            .map(|r| r.path.as_str())
    }

    /// All records in declaration order (parents before children).
    pub fn records(&self) -> &[Arc<RouteRecord>] {
        &self.records
    }

    /// `(absolute path, name)` pairs, for listings.
    pub fn routes(&self) -> Vec<(String, String)> {
        self.records
            .iter()
            .map(|r| (r.path.clone(), r.name.clone()))
            .collect()
    }
}

fn flatten(route: RouteDescriptor, parent: Option<usize>, base: &str, out: &mut Vec<RouteRecord>) {
    let path = if parent.is_some() {
        matcher::join(base, &route.path)
    } else {
        route.path.clone()
    };
    let index = out.len();
    out.push(RouteRecord {
        path: path.clone(),
        name: route.name,
        component: route.component,
        loading: route.loading,
        meta: route.meta,
        redirect: route.redirect,
        parent,
    });
    for child in route.children {
        flatten(child, Some(index), &path, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> RouteTable {
        RouteTable::new(vec![
            RouteDescriptor::lazy("/login", "login", "System/Login"),
            RouteDescriptor::lazy("/", "layout", "layout/layout")
                .with_redirect("/home")
                .with_children(vec![
                    RouteDescriptor::new("home", "Home", "Home"),
                    RouteDescriptor::new("admin", "Admin", "Admin")
                        .with_meta(RouteMeta { require_admin: true }),
                ]),
        ])
        .unwrap()
    }

    #[test]
    fn test_children_get_absolute_paths() {
        let table = sample();
        assert_eq!(table.path_of("Home"), Some("/home"));
        assert_eq!(table.path_of("Admin"), Some("/admin"));
    }

    #[test]
    fn test_resolve_child_includes_layout() {
        let location = sample().resolve("/home");
        assert_eq!(location.name.as_deref(), Some("Home"));
        let names: Vec<_> = location.matched.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["layout", "Home"]);
    }

    #[test]
    fn test_root_redirects() {
        let location = sample().resolve("/");
        assert_eq!(location.path, "/home");
        assert_eq!(location.redirected_from.as_deref(), Some("/"));
    }

    #[test]
    fn test_meta_is_merged() {
        assert!(sample().resolve("/admin").meta.require_admin);
        assert!(!sample().resolve("/home").meta.require_admin);
    }

    #[test]
    fn test_unmatched_keeps_query() {
        let location = sample().resolve("/nope?x=1");
        assert!(!location.is_matched());
        assert_eq!(location.name, None);
        assert_eq!(location.path, "/nope");
        assert_eq!(location.query.as_deref(), Some("x=1"));
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let err = RouteTable::new(vec![
            RouteDescriptor::new("/a", "same", "A"),
            RouteDescriptor::new("/b", "same", "B"),
        ])
        .unwrap_err();
        assert_eq!(err, RouteError::DuplicateName("same".into()));
    }

    #[test]
    fn test_dangling_redirect_rejected() {
        let err = RouteTable::new(vec![RouteDescriptor::new("/", "root", "Root").with_redirect("/gone")])
            .unwrap_err();
        assert!(matches!(err, RouteError::DanglingRedirect { .. }));
    }

    #[test]
    fn test_redirect_cycle_rejected() {
        let err = RouteTable::new(vec![
            RouteDescriptor::new("/a", "a", "A").with_redirect("/b"),
            RouteDescriptor::new("/b", "b", "B").with_redirect("/a"),
        ])
        .unwrap_err();
        assert!(matches!(err, RouteError::RedirectCycle(_)));
    }

    #[test]
    fn test_resolve_target_by_name() {
        let location = sample().resolve_target(&RouteTarget::name("login")).unwrap();
        assert_eq!(location.path, "/login");
        assert!(sample().resolve_target(&RouteTarget::name("missing")).is_none());
    }
}
