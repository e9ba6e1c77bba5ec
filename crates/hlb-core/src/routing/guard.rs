//! Route guarding.
//!
//! `guard` decides what to do with a requested path before anything is
//! drawn. It is a pure function of the path and the auth status; callers
//! re-run it whenever either changes and apply redirects by replacing the
//! current history entry.

use crate::auth::AuthStatus;

use super::Route;

/// Paths viewable without a session
pub const PUBLIC_PATHS: [&str; 3] = ["/", "/login", "/register"];

pub const LOGIN_PATH: &str = "/login";
pub const HOME_PATH: &str = "/home";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteDecision {
    /// Auth status not settled yet; show a splash and do not redirect.
    Pending,
    /// Show the view on its own, without navigation.
    Render(Route),
    /// Show the view inside the application shell.
    Shell(Route),
    /// Go to `to`, replacing the current history entry.
    Redirect { to: &'static str },
}

pub fn is_public(path: &str) -> bool {
    PUBLIC_PATHS.contains(&path)
}

pub fn guard(path: &str, status: AuthStatus) -> RouteDecision {
    match status {
        AuthStatus::Unknown => RouteDecision::Pending,
        AuthStatus::Unauthenticated => {
            if is_public(path) {
                RouteDecision::Render(Route::parse(path))
            } else {
                RouteDecision::Redirect { to: LOGIN_PATH }
            }
        }
        AuthStatus::Authenticated => {
            let route = Route::parse(path);
            if route.is_auth_entry() || route == Route::Landing {
                RouteDecision::Redirect { to: HOME_PATH }
            } else {
                RouteDecision::Shell(route)
            }
        }
    }
}
