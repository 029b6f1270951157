//! Path normalization and matching.
//!
//! # Design Decisions
//! - Matching is case-insensitive, as in the browser router this replaces
//! - A single trailing slash is ignored ("/data-insights/" == "/data-insights")
//! - Static segments only; no parameters or regex

/// Normalizes a path for comparison.
pub fn normalize(path: &str) -> String {
    let trimmed = match path.strip_suffix('/') {
        Some(rest) if !rest.is_empty() => rest,
        _ => path,
    };
    let trimmed = if trimmed.is_empty() { "/" } else { trimmed };
    trimmed.to_lowercase()
}

/// Joins a child path onto its parent's absolute path.
pub fn join(parent: &str, child: &str) -> String {
    if child.starts_with('/') {
        return child.to_string();
    }
    if parent.ends_with('/') {
        format!("{}{}", parent, child)
    } else {
        format!("{}/{}", parent, child)
    }
}

/// Splits "path?query" into its parts. An empty query reads as `None`.
pub fn split_query(raw: &str) -> (&str, Option<&str>) {
    match raw.split_once('?') {
        Some((path, query)) if !query.is_empty() => (path, Some(query)),
        Some((path, _)) => (path, None),
        None => (raw, None),
    }
}

/// True when `requested` names the route at `route_path`.
pub fn matches(route_path: &str, requested: &str) -> bool {
    normalize(route_path) == normalize(requested)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_insensitive() {
        assert!(matches("/LoginAndRegister", "/loginandregister"));
        assert!(matches("/LoginAndRegister", "/LOGINANDREGISTER"));
    }

    #[test]
    fn test_trailing_slash() {
        assert!(matches("/data-insights", "/data-insights/"));
        assert!(matches("/", "/"));
        assert!(!matches("/", "/data-insights"));
    }

    #[test]
    fn test_join() {
        assert_eq!(join("/", "parking-discovery-new"), "/parking-discovery-new");
        assert_eq!(join("/admin", "users"), "/admin/users");
        assert_eq!(join("/admin", "/absolute"), "/absolute");
    }

    #[test]
    fn test_split_query() {
        assert_eq!(split_query("/a?x=1"), ("/a", Some("x=1")));
        assert_eq!(split_query("/a?"), ("/a", None));
        assert_eq!(split_query("/a"), ("/a", None));
    }
}
