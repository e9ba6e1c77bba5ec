/// Every view the client knows how to show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Landing,
    Login,
    Register,
    Home,
    CreateReflection,
    History,
    Reflection(String),
    Herds,
    Herd(String),
    CreateHerd,
    Profile,
    Friends,
    Notifications,
    Settings,
    NotFound(String),
}

impl Route {
    /// Map a path to its route. Unknown paths become `NotFound`.
    pub fn parse(path: &str) -> Self {
        match path {
            "/" => return Route::Landing,
            "/login" => return Route::Login,
            "/register" => return Route::Register,
            "/home" => return Route::Home,
            "/create-reflection" => return Route::CreateReflection,
            "/history" => return Route::History,
            "/herds" => return Route::Herds,
            "/create-herd" => return Route::CreateHerd,
            "/profile" => return Route::Profile,
            "/friends" => return Route::Friends,
            "/notifications" => return Route::Notifications,
            "/settings" => return Route::Settings,
            _ => {}
        }

        if let Some(id) = single_segment(path, "/reflections/") {
            return Route::Reflection(id.to_string());
        }
        if let Some(id) = single_segment(path, "/herds/") {
            return Route::Herd(id.to_string());
        }
        Route::NotFound(path.to_string())
    }

    /// Canonical path for this route
    pub fn path(&self) -> String {
        match self {
            Route::Landing => "/".to_string(),
            Route::Login => "/login".to_string(),
            Route::Register => "/register".to_string(),
            Route::Home => "/home".to_string(),
            Route::CreateReflection => "/create-reflection".to_string(),
            Route::History => "/history".to_string(),
            Route::Reflection(id) => format!("/reflections/{}", id),
            Route::Herds => "/herds".to_string(),
            Route::Herd(id) => format!("/herds/{}", id),
            Route::CreateHerd => "/create-herd".to_string(),
            Route::Profile => "/profile".to_string(),
            Route::Friends => "/friends".to_string(),
            Route::Notifications => "/notifications".to_string(),
            Route::Settings => "/settings".to_string(),
            Route::NotFound(path) => path.clone(),
        }
    }

    /// Display title for this route
    pub fn title(&self) -> &'static str {
        match self {
            Route::Landing => "Welcome",
            Route::Login => "Login",
            Route::Register => "Register",
            Route::Home => "Home",
            Route::CreateReflection => "New Reflection",
            Route::History => "History",
            Route::Reflection(_) => "Reflection",
            Route::Herds => "Herds",
            Route::Herd(_) => "Herd",
            Route::CreateHerd => "New Herd",
            Route::Profile => "Profile",
            Route::Friends => "Friends",
            Route::Notifications => "Notifications",
            Route::Settings => "Settings",
            Route::NotFound(_) => "Not Found",
        }
    }

    /// Views that are entry points to authentication
    pub fn is_auth_entry(&self) -> bool {
        matches!(self, Route::Login | Route::Register)
    }
}

/// `/herds/abc` with prefix `/herds/` yields `abc`; nested or empty ids yield `None`.
fn single_segment<'a>(path: &'a str, prefix: &str) -> Option<&'a str> {
    let id = path.strip_prefix(prefix)?;
    if id.is_empty() || id.contains('/') {
        None
    } else {
        Some(id)
    }
}
