//! Routes, navigation history and the route guard.
//!
//! - `Route`: the fixed route table (`/`, `/login`, `/herds/:id`, ...)
//! - `Navigator`: history with push / replace / back
//! - `guard`: decides render, shell or redirect for a path and auth status

pub mod guard;
pub mod history;
pub mod route;

pub use guard::{guard, is_public, RouteDecision, HOME_PATH, LOGIN_PATH, PUBLIC_PATHS};
pub use history::Navigator;
pub use route::Route;
