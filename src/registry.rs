use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// RouteAccess
///
/// What the registry says about a single path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteAccess {
    /// Unknown or switched off. Renders the not-found page.
    Disabled,
    /// Enabled and open to everyone.
    Public,
    /// Enabled, but requires a valid session cookie.
    Protected,
}

/// RouteRegistry
///
/// Immutable table of the site's pages. Built once (see [`RouteRegistry::builder`]) and
/// injected into the gate; nothing mutates it after construction.
///
/// Lookup rules:
/// - an exact entry decides, even when it is `false`;
/// - otherwise a prefix root (e.g. `/blog`) covers its sub-paths, provided the root's
///   own exact entry is enabled;
/// - anything else is disabled.
///
/// Prefix roots match on a path-segment boundary: `/work` covers `/work/x` but not
/// `/workshop`. This is deliberately stricter than a plain string `starts_with`, which
/// is what the site's earlier client-side guard did.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteRegistry {
    routes: BTreeMap<String, bool>,
    #[serde(default)]
    prefixes: Vec<String>,
    #[serde(default)]
    protected: BTreeMap<String, bool>,
}

impl RouteRegistry {
    pub fn builder() -> RouteRegistryBuilder {
        RouteRegistryBuilder::default()
    }

    /// The route table of the portfolio site.
    pub fn portfolio() -> Self {
        Self::builder()
            .route("/", true)
            .route("/about", true)
            .route("/work", true)
            .route("/blog", true)
            .route("/gallery", true)
            .route("/world", true)
            .route("/gravebornblog", true)
            .route("/gravebornGallery", true)
            .route("/gravebornFAQ", true)
            .route("/gravebornTeam", true)
            .route("/contact", true)
            .prefix("/blog")
            .prefix("/work")
            .protect("/work/automate-design-handovers-with-a-figma-to-code-pipeline")
            .build()
    }

    /// is_enabled
    ///
    /// Whether `path` resolves to content at all.
    pub fn is_enabled(&self, path: &str) -> bool {
        if path.is_empty() {
            return false;
        }

        if let Some(&enabled) = self.routes.get(path) {
            return enabled;
        }

        self.prefixes.iter().any(|root| {
            covers(root, path) && self.routes.get(root.as_str()).copied().unwrap_or(false)
        })
    }

    /// Whether `path` is listed as requiring a session. Exact match only.
    pub fn is_protected(&self, path: &str) -> bool {
        self.protected.get(path).copied().unwrap_or(false)
    }

    /// resolve
    ///
    /// Combines both lookups. A disabled path is `Disabled` whatever its protection entry says.
    pub fn resolve(&self, path: &str) -> RouteAccess {
        if !self.is_enabled(path) {
            RouteAccess::Disabled
        } else if self.is_protected(path) {
            RouteAccess::Protected
        } else {
            RouteAccess::Public
        }
    }
}

// `/work` covers `/work` and `/work/...`, never `/workshop`.
fn covers(root: &str, path: &str) -> bool {
    match path.strip_prefix(root) {
        Some(rest) => rest.is_empty() || rest.starts_with('/') || root.ends_with('/'),
        None => false,
    }
}

/// RouteRegistryBuilder
///
/// Collects entries before the registry is frozen.
#[derive(Debug, Default)]
pub struct RouteRegistryBuilder {
    inner: RouteRegistry,
}

impl RouteRegistryBuilder {
    pub fn route(mut self, path: impl Into<String>, enabled: bool) -> Self {
        self.inner.routes.insert(path.into(), enabled);
        self
    }

    /// Registers a catch-all section root.
    pub fn prefix(mut self, root: impl Into<String>) -> Self {
        let root = root.into();
        if !self.inner.prefixes.contains(&root) {
            self.inner.prefixes.push(root);
        }
        self
    }

    pub fn protect(mut self, path: impl Into<String>) -> Self {
        self.inner.protected.insert(path.into(), true);
        self
    }

    pub fn build(self) -> RouteRegistry {
        self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CASE_STUDY: &str = "/work/automate-design-handovers-with-a-figma-to-code-pipeline";

    #[test]
    fn exact_entries_resolve() {
        let registry = RouteRegistry::portfolio();
        assert_eq!(registry.resolve("/"), RouteAccess::Public);
        assert_eq!(registry.resolve("/gravebornFAQ"), RouteAccess::Public);
        assert_eq!(registry.resolve("/contact"), RouteAccess::Public);
    }

    #[test]
    fn unknown_paths_are_disabled() {
        let registry = RouteRegistry::portfolio();
        assert_eq!(registry.resolve("/nope"), RouteAccess::Disabled);
        assert_eq!(registry.resolve(""), RouteAccess::Disabled);
        // Case matters, like the router it mirrors.
        assert_eq!(registry.resolve("/About"), RouteAccess::Disabled);
    }

    #[test]
    fn prefix_roots_cover_sub_paths_only() {
        let registry = RouteRegistry::portfolio();
        assert_eq!(registry.resolve("/blog/first-post"), RouteAccess::Public);
        assert_eq!(registry.resolve("/work/some-project"), RouteAccess::Public);
        assert_eq!(registry.resolve("/workshop"), RouteAccess::Disabled);
        assert_eq!(registry.resolve("/gallery/item"), RouteAccess::Disabled);
    }

    #[test]
    fn prefix_requires_enabled_root() {
        let registry = RouteRegistry::builder()
            .route("/blog", false)
            .prefix("/blog")
            .build();
        assert!(!registry.is_enabled("/blog/post"));
    }

    #[test]
    fn exact_false_beats_prefix() {
        let registry = RouteRegistry::builder()
            .route("/blog", true)
            .route("/blog/draft", false)
            .prefix("/blog")
            .build();
        assert!(registry.is_enabled("/blog/published"));
        assert!(!registry.is_enabled("/blog/draft"));
    }

    #[test]
    fn protected_case_study() {
        let registry = RouteRegistry::portfolio();
        assert_eq!(registry.resolve(CASE_STUDY), RouteAccess::Protected);
        // Protection is exact; sub-paths of the protected page are not covered.
        assert_eq!(
            registry.resolve(&format!("{CASE_STUDY}/extra")),
            RouteAccess::Public
        );
    }

    #[test]
    fn protection_on_disabled_path_is_not_found() {
        let registry = RouteRegistry::builder().protect("/secret").build();
        assert_eq!(registry.resolve("/secret"), RouteAccess::Disabled);
    }

    #[test]
    fn registry_loads_from_json() {
        let registry: RouteRegistry = serde_json::from_value(serde_json::json!({
            "routes": { "/": true, "/blog": true },
            "prefixes": ["/blog"],
            "protected": { "/blog/private": true }
        }))
        .unwrap();
        assert_eq!(registry.resolve("/blog/private"), RouteAccess::Protected);
        assert_eq!(registry.resolve("/blog/public"), RouteAccess::Public);
    }
}
