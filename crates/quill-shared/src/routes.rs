//! Route table and access guard.

use std::fmt;

/// Post identifier as it appears in route paths.
pub type PostId = i64;

/// A resolved application route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Root,
    Login,
    Register,
    Dashboard,
    NewPost,
    EditPost(PostId),
    ViewPost(PostId),
}

impl Route {
    /// Parse a path such as `/posts/edit/42`. A trailing slash is tolerated.
    pub fn parse(path: &str) -> Option<Self> {
        let trimmed = path.trim();
        if trimmed == "/" {
            return Some(Route::Root);
        }

        let segments: Vec<&str> = trimmed
            .strip_prefix('/')?
            .trim_end_matches('/')
            .split('/')
            .collect();

        match segments.as_slice() {
            ["login"] => Some(Route::Login),
            ["register"] => Some(Route::Register),
            ["dashboard"] => Some(Route::Dashboard),
            ["posts", "new"] => Some(Route::NewPost),
            ["posts", "edit", id] => id.parse().ok().map(Route::EditPost),
            ["posts", id] => id.parse().ok().map(Route::ViewPost),
            _ => None,
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Root => "/".to_string(),
            Route::Login => "/login".to_string(),
            Route::Register => "/register".to_string(),
            Route::Dashboard => "/dashboard".to_string(),
            Route::NewPost => "/posts/new".to_string(),
            Route::EditPost(id) => format!("/posts/edit/{id}"),
            Route::ViewPost(id) => format!("/posts/{id}"),
        }
    }

    /// Routes that mutate posts are only reachable with a session.
    pub fn requires_auth(&self) -> bool {
        matches!(self, Route::NewPost | Route::EditPost(_))
    }

    /// Apply redirects: `/` goes to the dashboard or login page, and guarded
    /// routes send anonymous visitors to `/login`.
    pub fn resolve(self, authenticated: bool) -> Route {
        match self {
            Route::Root if authenticated => Route::Dashboard,
            Route::Root => Route::Login,
            route if route.requires_auth() && !authenticated => Route::Login,
            route => route,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}
