//! Screen routing. Paths mirror the web client's (`/dashboard?cat=1`) so the
//! same addresses can be typed on the command line or navigated to in-app.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Login,
    Signup,
    Dashboard { category: Option<String> },
    Categories,
    Calendar,
}

impl Route {
    pub fn dashboard() -> Route {
        Route::Dashboard { category: None }
    }

    /// Screens that need a signed-in user.
    pub fn is_protected(&self) -> bool {
        !matches!(self, Route::Login | Route::Signup)
    }

    pub fn title(&self) -> &'static str {
        match self {
            Route::Login => "Sign In",
            Route::Signup => "Sign Up",
            Route::Dashboard { .. } => "Dashboard",
            Route::Categories => "Categories",
            Route::Calendar => "Calendar",
        }
    }

    /// Parses a known path. `/` is an alias for the dashboard; anything else
    /// unknown gives `None`.
    pub fn parse(path: &str) -> Option<Route> {
        let (path, query) = match path.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (path, None),
        };
        let path = path.trim_end_matches('/');
        match path {
            "" | "/dashboard" => Some(Route::Dashboard {
                category: query.and_then(|q| query_param(q, "cat")),
            }),
            "/login" => Some(Route::Login),
            "/signup" => Some(Route::Signup),
            "/categories" => Some(Route::Categories),
            "/calendar" => Some(Route::Calendar),
            _ => None,
        }
    }

    /// Where a request for `path` ends up: unknown paths fall back to the
    /// dashboard, and protected screens send signed-out users to `/login`.
    pub fn resolve(path: &str, authenticated: bool) -> Route {
        let route = Route::parse(path).unwrap_or_else(Route::dashboard);
        if route.is_protected() && !authenticated {
            Route::Login
        } else {
            route
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Route::Login => f.write_str("/login"),
            Route::Signup => f.write_str("/signup"),
            Route::Dashboard { category: None } => f.write_str("/dashboard"),
            Route::Dashboard {
                category: Some(cat),
            } => write!(f, "/dashboard?cat={cat}"),
            Route::Categories => f.write_str("/categories"),
            Route::Calendar => f.write_str("/calendar"),
        }
    }
}

fn query_param(query: &str, key: &str) -> Option<String> {
    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(k, _)| *k == key)
        .map(|(_, v)| v.to_string())
        .filter(|v| !v.is_empty())
}
