//! Path helpers and the protected-page allow-list.
//!
//! Protection is decided on exact, normalized paths. A link to
//! `/blog/createreport.html` does not match a protected `/createreport.html`.

/// Join a deployment base and a page path into a root-anchored path.
#[must_use]
pub fn join_base(base: &str, relative: &str) -> String {
    let base = base.trim().trim_end_matches('/');
    let rel = relative.trim_start_matches('/');

    if base.is_empty() {
        format!("/{rel}")
    } else if base.starts_with('/') {
        format!("{base}/{rel}")
    } else {
        format!("/{base}/{rel}")
    }
}

/// Strip query and fragment, resolve `.` and `..` segments, and anchor at `/`.
#[must_use]
pub fn normalize_path(path: &str) -> String {
    let path = path
        .split(['?', '#'])
        .next()
        .unwrap_or_default();
    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }
    let mut normalized = format!("/{}", segments.join("/"));
    if path.ends_with('/') && normalized.len() > 1 {
        normalized.push('/');
    }
    normalized
}

/// Exact-path allow-list of pages that need a credential marker.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProtectedRoutes {
    paths: Vec<String>,
}

impl ProtectedRoutes {
    /// Build the list from page paths relative to the deployment base.
    pub fn new<I, P>(base_path: &str, pages: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<str>,
    {
        let paths = pages
            .into_iter()
            .map(|page| normalize_path(&join_base(base_path, page.as_ref())))
            .collect();
        Self { paths }
    }

    #[must_use]
    pub fn from_config(config: &crate::SiteConfig) -> Self {
        Self::new(&config.base_path, &config.protected_paths)
    }

    /// Whether a resolved pathname is on the list.
    #[must_use]
    pub fn is_protected(&self, pathname: &str) -> bool {
        let pathname = normalize_path(pathname);
        self.paths.iter().any(|p| *p == pathname)
    }

    #[must_use]
    pub fn paths(&self) -> &[String] {
        &self.paths
    }
}
