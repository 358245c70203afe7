//! Static route table and path resolution

use std::sync::LazyLock;

const MAX_REDIRECTS: usize = 8;

#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct RouteMeta {
    pub(crate) title: &'static str,
    pub(crate) requires_auth: bool,
    pub(crate) requires_admin: bool,
}

#[derive(Debug)]
pub(crate) struct Route {
    pub(crate) path: &'static str,
    pub(crate) name: Option<&'static str>,
    pub(crate) redirect: Option<&'static str>,
    pub(crate) meta: RouteMeta,
    pub(crate) children: Vec<Route>,
}

impl Route {
    fn page(path: &'static str, name: &'static str, meta: RouteMeta) -> Self {
        Self {
            path,
            name: Some(name),
            redirect: None,
            meta,
            children: Vec::new(),
        }
    }
}

const PUBLIC: RouteMeta = RouteMeta {
    title: "",
    requires_auth: false,
    requires_admin: false,
};

const fn public(title: &'static str) -> RouteMeta {
    RouteMeta { title, ..PUBLIC }
}

const fn signed_in(title: &'static str) -> RouteMeta {
    RouteMeta {
        title,
        requires_auth: true,
        requires_admin: false,
    }
}

const fn admin(title: &'static str) -> RouteMeta {
    RouteMeta {
        title,
        requires_auth: true,
        requires_admin: true,
    }
}

static ROUTES: LazyLock<Vec<Route>> = LazyLock::new(|| {
    vec![
        Route {
            path: "/",
            name: None,
            redirect: Some("/home"),
            meta: PUBLIC,
            children: Vec::new(),
        },
        Route::page("/home", "Home", public("Home")),
        Route::page("/chat", "Chat", public("Legal Q&A")),
        Route::page("/knowledge", "Knowledge", public("Knowledge Base")),
        Route::page("/profile", "Profile", signed_in("Profile")),
        Route::page("/login", "Login", public("Sign in")),
        // Everything under /admin is gated, including paths with no page
        Route {
            path: "/admin",
            name: None,
            redirect: Some("/admin/dashboard"),
            meta: admin("Administration"),
            children: vec![
                Route::page("dashboard", "AdminDashboard", admin("Dashboard")),
                Route::page("knowledge", "AdminKnowledge", admin("Knowledge Management")),
                Route::page("qa", "AdminQA", admin("Q&A Management")),
            ],
        },
    ]
});

pub(crate) fn routes() -> &'static [Route] {
    &ROUTES
}

/// Result of resolving a navigation target
#[derive(Debug)]
pub(crate) struct Resolved {
    /// Final path and query after following redirects
    pub(crate) full_path: String,
    /// Matched records, outermost first. Empty for unknown paths.
    pub(crate) matched: Vec<&'static Route>,
}

impl Resolved {
    pub(crate) fn leaf(&self) -> Option<&'static Route> {
        self.matched.last().copied()
    }
}

pub(crate) fn resolve(target: &str) -> Resolved {
    let (mut path, query) = split_target(target);
    let mut found = match_path(&path);

    for _ in 0..MAX_REDIRECTS {
        // A parent matched only by prefix keeps the requested path
        let Some(redirect) = found
            .exact
            .then(|| found.matched.last().and_then(|r| r.redirect))
            .flatten()
        else {
            break;
        };
        path = redirect.to_string();
        found = match_path(&path);
    }
    let matched = found.matched;

    let full_path = match query {
        Some(q) => format!("{path}?{q}"),
        None => path,
    };
    Resolved { full_path, matched }
}

fn split_target(target: &str) -> (String, Option<String>) {
    let (path, query) = match target.split_once('?') {
        Some((p, q)) => (p, Some(q.to_string()).filter(|q| !q.is_empty())),
        None => (target, None),
    };
    let trimmed = path.trim().trim_end_matches('/');
    let path = if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{trimmed}")
    };
    (path, query)
}

struct PathMatch {
    matched: Vec<&'static Route>,
    /// The last record's full path equals the looked-up path
    exact: bool,
}

fn match_path(path: &str) -> PathMatch {
    for route in routes() {
        if route.path == path {
            return PathMatch {
                matched: vec![route],
                exact: true,
            };
        }
        if route.children.is_empty() || route.path == "/" {
            continue;
        }
        let Some(rest) = path
            .strip_prefix(route.path)
            .and_then(|r| r.strip_prefix('/'))
        else {
            continue;
        };
        return match route.children.iter().find(|c| c.path == rest) {
            Some(child) => PathMatch {
                matched: vec![route, child],
                exact: true,
            },
            None => PathMatch {
                matched: vec![route],
                exact: false,
            },
        };
    }
    PathMatch {
        matched: Vec::new(),
        exact: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(resolved: &Resolved) -> Vec<&'static str> {
        resolved.matched.iter().map(|r| r.path).collect()
    }

    #[test]
    fn root_redirects_home() {
        let r = resolve("/");
        assert_eq!(r.full_path, "/home");
        assert_eq!(r.leaf().and_then(|r| r.name), Some("Home"));
    }

    #[test]
    fn admin_redirects_to_dashboard() {
        let r = resolve("/admin");
        assert_eq!(r.full_path, "/admin/dashboard");
        assert_eq!(names(&r), vec!["/admin", "dashboard"]);
    }

    #[test]
    fn nested_child_matches_parent_first() {
        let r = resolve("/admin/qa");
        assert_eq!(names(&r), vec!["/admin", "qa"]);
        assert_eq!(r.leaf().map(|r| r.meta.title), Some("Q&A Management"));
    }

    #[test]
    fn unknown_admin_page_still_matches_parent() {
        let r = resolve("/admin/reports");
        assert_eq!(names(&r), vec!["/admin"]);
        assert_eq!(r.full_path, "/admin/reports");
    }

    #[test]
    fn unknown_admin_page_keeps_query() {
        let r = resolve("/admin/reports?year=2024");
        assert_eq!(r.full_path, "/admin/reports?year=2024");
        assert!(r.leaf().is_some_and(|leaf| leaf.meta.requires_admin));
    }

    #[test]
    fn query_and_trailing_slash() {
        let r = resolve("profile/?tab=security");
        assert_eq!(r.full_path, "/profile?tab=security");
        assert_eq!(names(&r), vec!["/profile"]);
    }

    #[test]
    fn unknown_path_matches_nothing() {
        let r = resolve("/nowhere");
        assert!(r.matched.is_empty());
        assert_eq!(r.full_path, "/nowhere");
    }
}
