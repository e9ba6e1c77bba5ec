//! Application state management for the HLB terminal client.
//!
//! This module contains the core `App` struct that owns the session store,
//! the navigation history and the current routing decision, plus the login
//! form, toasts and the background notification poll.

use std::collections::VecDeque;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Result;
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tracing::{debug, info, warn};

use hlb_core::api::{ApiClient, ApiError, AuthApi};
use hlb_core::auth::{SessionStore, TokenStore};
use hlb_core::config::Config;
use hlb_core::models::{unread_count, UserProfile};
use hlb_core::notify::{Notice, Notifier};
use hlb_core::routing::{guard, Navigator, Route, RouteDecision, HOME_PATH, LOGIN_PATH};

// ============================================================================
// Constants
// ============================================================================

/// Buffer size for the background task message channel.
const CHANNEL_BUFFER_SIZE: usize = 8;

/// Upper bound on redirects followed for a single navigation.
const MAX_REDIRECT_HOPS: usize = 4;

/// How long a toast stays in the status bar.
pub const TOAST_DURATION: Duration = Duration::from_secs(4);

/// Maximum length for email input.
const MAX_EMAIL_LENGTH: usize = 254;

/// Maximum length for display name input.
const MAX_DISPLAY_NAME_LENGTH: usize = 50;

/// Maximum length for password input.
/// 128 chars accommodates password managers and passphrases.
const MAX_PASSWORD_LENGTH: usize = 128;

/// Environment variable pre-filling the email field
const EMAIL_ENV: &str = "HLB_EMAIL";

// ============================================================================
// UI State Types
// ============================================================================

/// Overall application state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Normal,
    ShowingHelp,
    ConfirmingQuit,
    Quitting,
}

/// Auth form focus state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    DisplayName,
    Email,
    Password,
    Submit,
}

const LOGIN_FIELDS: [FormField; 3] = [FormField::Email, FormField::Password, FormField::Submit];
const REGISTER_FIELDS: [FormField; 4] = [
    FormField::DisplayName,
    FormField::Email,
    FormField::Password,
    FormField::Submit,
];

/// Login / registration form shown on the public views
#[derive(Debug, Clone)]
pub struct AuthForm {
    pub email: String,
    pub display_name: String,
    pub password: String,
    pub focus: FormField,
}

impl AuthForm {
    pub fn new(email: String) -> Self {
        let focus = if email.is_empty() {
            FormField::Email
        } else {
            FormField::Password
        };
        Self {
            email,
            display_name: String::new(),
            password: String::new(),
            focus,
        }
    }

    pub fn fields(register: bool) -> &'static [FormField] {
        if register {
            &REGISTER_FIELDS
        } else {
            &LOGIN_FIELDS
        }
    }

    /// Move focus to the next field (wrapping around)
    pub fn next_field(&mut self, register: bool) {
        let fields = Self::fields(register);
        let pos = fields.iter().position(|f| *f == self.focus).unwrap_or(0);
        self.focus = fields[(pos + 1) % fields.len()];
    }

    /// Move focus to the previous field (wrapping around)
    pub fn prev_field(&mut self, register: bool) {
        let fields = Self::fields(register);
        let pos = fields.iter().position(|f| *f == self.focus).unwrap_or(0);
        self.focus = fields[(pos + fields.len() - 1) % fields.len()];
    }

    /// Keep focus on a field that exists in the current mode
    pub fn reset_focus(&mut self, register: bool) {
        if !Self::fields(register).contains(&self.focus) {
            self.focus = Self::fields(register)[0];
        }
    }

    /// Type a character into the focused field
    pub fn push_char(&mut self, c: char) {
        match self.focus {
            FormField::DisplayName => {
                if can_add_char(self.display_name.chars().count(), MAX_DISPLAY_NAME_LENGTH, c) {
                    self.display_name.push(c);
                }
            }
            FormField::Email => {
                if can_add_char(self.email.chars().count(), MAX_EMAIL_LENGTH, c) {
                    self.email.push(c);
                }
            }
            FormField::Password => {
                if can_add_char(self.password.chars().count(), MAX_PASSWORD_LENGTH, c) {
                    self.password.push(c);
                }
            }
            FormField::Submit => {}
        }
    }

    pub fn pop_char(&mut self) {
        match self.focus {
            FormField::DisplayName => {
                self.display_name.pop();
            }
            FormField::Email => {
                self.email.pop();
            }
            FormField::Password => {
                self.password.pop();
            }
            FormField::Submit => {}
        }
    }

    pub fn is_complete(&self, register: bool) -> bool {
        !self.email.trim().is_empty()
            && !self.password.is_empty()
            && (!register || !self.display_name.trim().is_empty())
    }
}

/// Reject control characters and input past the field limit
pub fn can_add_char(current_len: usize, max_len: usize, c: char) -> bool {
    current_len < max_len && !c.is_control()
}

/// Sidebar entries of the application shell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavItem {
    Home,
    NewReflection,
    History,
    Herds,
    Settings,
    Friends,
    Notifications,
}

pub const NAV_ITEMS: [NavItem; 7] = [
    NavItem::Home,
    NavItem::NewReflection,
    NavItem::History,
    NavItem::Herds,
    NavItem::Settings,
    NavItem::Friends,
    NavItem::Notifications,
];

impl NavItem {
    pub fn label(&self) -> &'static str {
        match self {
            NavItem::Home => "Home",
            NavItem::NewReflection => "New Reflection",
            NavItem::History => "History",
            NavItem::Herds => "Herds",
            NavItem::Settings => "Settings",
            NavItem::Friends => "Friends",
            NavItem::Notifications => "Notifications",
        }
    }

    pub fn path(&self) -> &'static str {
        match self {
            NavItem::Home => "/home",
            NavItem::NewReflection => "/create-reflection",
            NavItem::History => "/history",
            NavItem::Herds => "/herds",
            NavItem::Settings => "/settings",
            NavItem::Friends => "/friends",
            NavItem::Notifications => "/notifications",
        }
    }

    /// Sidebar entry highlighted for a route, if any
    pub fn for_route(route: &Route) -> Option<Self> {
        match route {
            Route::Home => Some(NavItem::Home),
            Route::CreateReflection | Route::Reflection(_) => Some(NavItem::NewReflection),
            Route::History => Some(NavItem::History),
            Route::Herds | Route::Herd(_) | Route::CreateHerd => Some(NavItem::Herds),
            Route::Settings => Some(NavItem::Settings),
            Route::Friends => Some(NavItem::Friends),
            Route::Notifications => Some(NavItem::Notifications),
            _ => None,
        }
    }

    pub fn index(&self) -> usize {
        NAV_ITEMS.iter().position(|item| item == self).unwrap_or(0)
    }
}

/// A notice on screen and when it appeared
#[derive(Debug, Clone)]
pub struct Toast {
    pub notice: Notice,
    shown_at: Instant,
}

impl Toast {
    fn new(notice: Notice) -> Self {
        Self {
            notice,
            shown_at: Instant::now(),
        }
    }

    fn is_expired(&self) -> bool {
        self.shown_at.elapsed() >= TOAST_DURATION
    }
}

// ============================================================================
// Background Task Results
// ============================================================================

/// Results sent back from the notification poll task. Each carries the
/// session generation it was started under so stale results can be dropped.
enum PollResult {
    Unread { generation: u64, count: usize },
    Failed { generation: u64, error: ApiError },
}

// ============================================================================
// Main Application Struct
// ============================================================================

/// The session store talks to `A`; the notification poll always uses the
/// HTTP client.
pub struct App<A = ApiClient> {
    // Core services
    pub config: Config,
    config_path: Option<PathBuf>,
    pub session: SessionStore<A, Box<dyn TokenStore>>,
    api: ApiClient,
    notifier: Notifier,

    // Routing
    pub navigator: Navigator,
    pub decision: RouteDecision,

    // UI State
    pub state: AppState,
    pub form: AuthForm,
    pub nav_selection: usize,
    pub unread_notifications: usize,
    pub toast: Option<Toast>,
    pending_toasts: VecDeque<Notice>,
    notices_rx: UnboundedReceiver<Notice>,

    // Background notification poll
    poll_tx: mpsc::Sender<PollResult>,
    poll_rx: mpsc::Receiver<PollResult>,
    last_poll: Option<Instant>,
    poll_in_flight: bool,
    session_generation: u64,
}

impl App {
    /// Create a new application instance for the given configuration
    pub fn new(config: Config, start_path: &str) -> Result<Self> {
        let base_url = config.api_base_url();
        debug!(%base_url, backend = ?config.token_backend, "Config loaded");

        let api = ApiClient::new(&base_url, config.request_timeout())?;
        let tokens = config.token_store()?;
        let mut app = Self::with_parts(config, api.clone(), api, tokens, start_path);
        app.config_path = Config::config_path().ok();
        Ok(app)
    }
}

impl<A: AuthApi> App<A> {
    /// Assemble an app from its parts. The config is never written back to
    /// disk unless a config path is set.
    pub fn with_parts(
        config: Config,
        auth: A,
        api: ApiClient,
        tokens: Box<dyn TokenStore>,
        start_path: &str,
    ) -> Self {
        let (notifier, notices_rx) = Notifier::channel();
        let session = SessionStore::new(auth, tokens, notifier.clone());
        let (poll_tx, poll_rx) = mpsc::channel(CHANNEL_BUFFER_SIZE);

        let email = std::env::var(EMAIL_ENV)
            .ok()
            .or_else(|| config.last_email.clone())
            .unwrap_or_default();

        Self {
            config,
            config_path: None,
            session,
            api,
            notifier,

            navigator: Navigator::new(start_path),
            decision: RouteDecision::Pending,

            state: AppState::Normal,
            form: AuthForm::new(email),
            nav_selection: 0,
            unread_notifications: 0,
            toast: None,
            pending_toasts: VecDeque::new(),
            notices_rx,

            poll_tx,
            poll_rx,
            last_poll: None,
            poll_in_flight: false,
            session_generation: 0,
        }
    }

    // =========================================================================
    // Routing
    // =========================================================================

    /// Restore the persisted session, then route accordingly.
    pub async fn initialize(&mut self) {
        self.session.initialize().await;
        self.sync_route();
    }

    /// Re-run the guard for the current path and auth status, following
    /// redirects by replacing history entries.
    pub fn sync_route(&mut self) {
        for _ in 0..MAX_REDIRECT_HOPS {
            match guard(self.navigator.current(), self.session.status()) {
                RouteDecision::Redirect { to } => self.navigator.replace(to),
                decision => {
                    self.apply_decision(decision);
                    return;
                }
            }
        }
        warn!(path = %self.navigator.current(), "Too many redirects");
        self.decision = RouteDecision::Pending;
    }

    fn apply_decision(&mut self, decision: RouteDecision) {
        match &decision {
            RouteDecision::Shell(route) => {
                if let Some(item) = NavItem::for_route(route) {
                    self.nav_selection = item.index();
                }
            }
            RouteDecision::Render(route) => {
                self.form.reset_focus(*route == Route::Register);
            }
            _ => {}
        }
        self.decision = decision;
    }

    /// Navigate to `path` as a new history entry
    pub fn navigate(&mut self, path: &str) {
        self.navigator.push(path);
        self.sync_route();
    }

    /// Step back in history; the guard still applies to where we land
    pub fn go_back(&mut self) {
        if self.navigator.back() {
            self.sync_route();
        }
    }

    pub fn is_register_view(&self) -> bool {
        matches!(self.decision, RouteDecision::Render(Route::Register))
    }

    /// Switch between the login and registration views
    pub fn toggle_auth_view(&mut self) {
        let target = if self.is_register_view() {
            "/login"
        } else {
            "/register"
        };
        self.navigate(target);
    }

    pub fn user(&self) -> Option<&UserProfile> {
        self.session.user()
    }

    // =========================================================================
    // Authentication
    // =========================================================================

    /// Submit the login or registration form
    pub async fn submit_auth_form(&mut self) {
        let register = self.is_register_view();
        if !self.form.is_complete(register) {
            self.notifier.error("Please fill in all fields.");
            return;
        }

        let email = self.form.email.trim().to_string();
        let password = std::mem::take(&mut self.form.password);

        let success = if register {
            let display_name = self.form.display_name.trim().to_string();
            self.session.register(&email, &display_name, &password).await
        } else {
            self.session.login(&email, &password).await
        };

        if success {
            self.remember_email(email);
            self.start_new_session_generation();
            self.navigator.replace(HOME_PATH);
        } else {
            self.form.focus = FormField::Password;
        }
        self.sync_route();
    }

    /// Log out and land on the login view
    pub fn logout(&mut self) {
        self.session.logout();
        self.start_new_session_generation();
        self.navigator.replace(LOGIN_PATH);
        self.sync_route();
        info!("Returned to login");
    }

    /// Re-validate the session against the API
    pub async fn refresh_profile(&mut self) {
        if self.session.refresh_profile().await {
            self.notifier.info("Profile refreshed.");
        }
        if !self.session.is_authenticated() {
            self.start_new_session_generation();
        }
        self.sync_route();
    }

    fn remember_email(&mut self, email: String) {
        if self.config.last_email.as_deref() == Some(email.as_str()) {
            return;
        }
        self.config.last_email = Some(email);
        let Some(path) = &self.config_path else {
            return;
        };
        if let Err(e) = self.config.save_to(path) {
            warn!(error = %e, "Failed to save config");
        }
    }

    fn start_new_session_generation(&mut self) {
        self.session_generation += 1;
        self.unread_notifications = 0;
        self.last_poll = None;
        self.poll_in_flight = false;
    }

    // =========================================================================
    // Background work
    // =========================================================================

    /// Drain notices and poll results, expire toasts and start a poll if due.
    pub fn check_background_tasks(&mut self) {
        while let Ok(notice) = self.notices_rx.try_recv() {
            self.pending_toasts.push_back(notice);
        }
        self.advance_toasts();

        // Collect all pending results first to avoid borrow conflicts
        let mut results = Vec::new();
        while let Ok(result) = self.poll_rx.try_recv() {
            results.push(result);
        }
        for result in results {
            self.process_poll_result(result);
        }

        if self.poll_due() {
            self.spawn_notification_poll();
        }
    }

    fn advance_toasts(&mut self) {
        if self.toast.as_ref().is_some_and(Toast::is_expired) {
            self.toast = None;
        }
        if self.toast.is_none() {
            self.toast = self.pending_toasts.pop_front().map(Toast::new);
        }
    }

    fn poll_due(&self) -> bool {
        if !self.session.is_authenticated() || self.poll_in_flight {
            return false;
        }
        self.last_poll
            .map(|at| at.elapsed() >= self.config.notification_poll_interval())
            .unwrap_or(true)
    }

    /// Ask for a notification poll on the next tick
    pub fn request_notification_poll(&mut self) {
        if !self.poll_in_flight {
            self.last_poll = None;
        }
    }

    fn spawn_notification_poll(&mut self) {
        let Some(token) = self.session.token().map(str::to_string) else {
            return;
        };
        let api = self.api.clone();
        let tx = self.poll_tx.clone();
        let generation = self.session_generation;

        self.poll_in_flight = true;
        self.last_poll = Some(Instant::now());

        tokio::spawn(async move {
            let result = match api.fetch_notifications(&token).await {
                Ok(notifications) => PollResult::Unread {
                    generation,
                    count: unread_count(&notifications),
                },
                Err(error) => PollResult::Failed { generation, error },
            };
            if tx.send(result).await.is_err() {
                debug!("Poll result dropped, app shutting down");
            }
        });
    }

    fn process_poll_result(&mut self, result: PollResult) {
        match result {
            PollResult::Unread { generation, count } => {
                if generation != self.session_generation {
                    debug!("Discarding stale notification count");
                    return;
                }
                self.poll_in_flight = false;
                self.unread_notifications = count;
            }
            PollResult::Failed { generation, error } => {
                if generation != self.session_generation {
                    return;
                }
                self.poll_in_flight = false;
                if error.is_transport() {
                    debug!(error = %error, "Notification poll could not reach the API");
                } else {
                    warn!(error = %error, "Failed to fetch notifications");
                }
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
