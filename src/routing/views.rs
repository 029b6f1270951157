//! View registry with lazy, cached resolution.
//!
//! # Responsibilities
//! - Map route names to view resolvers
//! - Resolve eager views when the registry is built
//! - Resolve lazy views on first navigation and cache the handle
//!
//! # Design Decisions
//! - Failed resolutions are not cached; the next navigation retries
//! - Handles are cheap to clone (`Arc<str>` document)

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use crate::routing::route::Loading;
use crate::routing::table::RouteTable;

/// A resolved view component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewHandle {
    pub component: String,
    pub document: Arc<str>,
}

impl ViewHandle {
    pub fn new(component: impl Into<String>, document: impl Into<Arc<str>>) -> Self {
        Self {
            component: component.into(),
            document: document.into(),
        }
    }
}

/// Error type for view resolution.
#[derive(Debug, thiserror::Error)]
pub enum ViewError {
    #[error("no view registered for route {0:?}")]
    Unregistered(String),

    #[error("failed to load view {component:?} from {path}: {source}")]
    Load {
        component: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

type Resolver = Box<dyn Fn() -> Result<ViewHandle, ViewError> + Send + Sync>;

enum Entry {
    Eager(ViewHandle),
    Lazy {
        resolver: Resolver,
        cached: Mutex<Option<ViewHandle>>,
        resolutions: AtomicUsize,
    },
}

/// Route name → view resolver.
#[derive(Default)]
pub struct ViewRegistry {
    entries: HashMap<String, Entry>,
}

impl std::fmt::Debug for ViewRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewRegistry")
            .field("routes", &self.entries.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl ViewRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry for every route in `table`, loading documents with `loader`.
    ///
    /// Eager views are loaded here; a missing eager document fails the build.
    pub fn for_table(table: &RouteTable, loader: ViewLoader) -> Result<Self, ViewError> {
        let loader = Arc::new(loader);
        let mut registry = Self::new();
        for record in table.records() {
            match record.loading {
                Loading::Eager => {
                    registry.register_eager(record.name.clone(), loader.load(&record.component)?);
                }
                Loading::Lazy => {
                    let loader = loader.clone();
                    let component = record.component.clone();
                    registry.register_lazy(record.name.clone(), move || loader.load(&component));
                }
            }
        }
        tracing::debug!(views = registry.entries.len(), "View registry built");
        Ok(registry)
    }

    pub fn register_eager(&mut self, route: impl Into<String>, handle: ViewHandle) {
        self.entries.insert(route.into(), Entry::Eager(handle));
    }

    pub fn register_lazy<F>(&mut self, route: impl Into<String>, resolver: F)
    where
        F: Fn() -> Result<ViewHandle, ViewError> + Send + Sync + 'static,
    {
        self.entries.insert(
            route.into(),
            Entry::Lazy {
                resolver: Box::new(resolver),
                cached: Mutex::new(None),
                resolutions: AtomicUsize::new(0),
            },
        );
    }

    /// Resolve the view bound to `route`.
    pub fn resolve(&self, route: &str) -> Result<ViewHandle, ViewError> {
        match self.entries.get(route) {
            None => Err(ViewError::Unregistered(route.to_string())),
            Some(Entry::Eager(handle)) => Ok(handle.clone()),
            Some(Entry::Lazy {
                resolver,
                cached,
                resolutions,
            }) => {
                let mut slot = cached.lock().unwrap_or_else(PoisonError::into_inner);
                if let Some(handle) = slot.as_ref() {
                    return Ok(handle.clone());
                }
                let handle = resolver()?;
                resolutions.fetch_add(1, Ordering::Relaxed);
                tracing::debug!(route, component = %handle.component, "Lazy view resolved");
                *slot = Some(handle.clone());
                Ok(handle)
            }
        }
    }

    /// Whether the view for `route` is available without running a resolver.
    pub fn is_resolved(&self, route: &str) -> bool {
        match self.entries.get(route) {
            Some(Entry::Eager(_)) => true,
            Some(Entry::Lazy { cached, .. }) => cached
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .is_some(),
            None => false,
        }
    }

    /// Successful resolver runs for a lazy route (0 for eager routes).
    pub fn resolution_count(&self, route: &str) -> usize {
        match self.entries.get(route) {
            Some(Entry::Lazy { resolutions, .. }) => resolutions.load(Ordering::Relaxed),
            _ => 0,
        }
    }
}

/// Loads view documents from `<dir>/<component>.html`.
#[derive(Debug, Clone, Default)]
pub struct ViewLoader {
    dir: Option<PathBuf>,
}

impl ViewLoader {
    /// Loader that reads documents from disk.
    pub fn from_dir(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: Some(dir.as_ref().to_path_buf()),
        }
    }

    /// Loader that returns a placeholder document per component.
    pub fn placeholder() -> Self {
        Self { dir: None }
    }

    pub fn new(dir: Option<&str>) -> Self {
        match dir {
            Some(dir) => Self::from_dir(dir),
            None => Self::placeholder(),
        }
    }

    pub fn load(&self, component: &str) -> Result<ViewHandle, ViewError> {
        let Some(dir) = &self.dir else {
            let document = format!(
                "<!doctype html><div id=\"app\" data-view=\"{}\"></div>\n",
                component
            );
            return Ok(ViewHandle::new(component, document));
        };

        let path = dir.join(format!("{}.html", component));
        let document = std::fs::read_to_string(&path).map_err(|source| ViewError::Load {
            component: component.to_string(),
            path: path.clone(),
            source,
        })?;
        Ok(ViewHandle::new(component, document))
    }
}
