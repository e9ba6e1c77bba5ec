//! The session store: single writer of "who is logged in".
//!
//! Every operation reports failures through the [`Notifier`] and a
//! `false` return (or a degraded, logged-out state) rather than an error.

use tracing::{debug, info, warn};

use crate::api::{ApiError, AuthApi};
use crate::models::{LoginRequest, SignupRequest, UserProfile};
use crate::notify::Notifier;

use super::session::{AuthStatus, Session};
use super::token::TokenStore;

// ============================================================================
// User-facing messages
// ============================================================================

const LOGIN_REJECTED: &str = "Invalid email or password.";
const LOGIN_FAILED: &str = "Login failed.";
const LOGIN_SUCCEEDED: &str = "Logged in successfully!";
const REGISTRATION_FAILED: &str = "Registration failed.";
const REGISTRATION_SUCCEEDED: &str = "Account created successfully!";
const LOGGED_OUT: &str = "Logged out successfully!";
const PROFILE_FAILED: &str = "Could not load your profile. Please try again.";
const SESSION_EXPIRED: &str = "Your session has expired. Please log in again.";

/// Which auth endpoint an attempt went to, for messages and logs.
#[derive(Debug, Clone, Copy)]
enum AuthAttempt {
    Login,
    Register,
}

impl AuthAttempt {
    fn rejected_fallback(self) -> &'static str {
        match self {
            AuthAttempt::Login => LOGIN_REJECTED,
            AuthAttempt::Register => REGISTRATION_FAILED,
        }
    }

    fn failed_fallback(self) -> &'static str {
        match self {
            AuthAttempt::Login => LOGIN_FAILED,
            AuthAttempt::Register => REGISTRATION_FAILED,
        }
    }

    fn success_message(self) -> &'static str {
        match self {
            AuthAttempt::Login => LOGIN_SUCCEEDED,
            AuthAttempt::Register => REGISTRATION_SUCCEEDED,
        }
    }
}

/// Message for a failed attempt: the server's detail when it sent one,
/// otherwise a fallback chosen by whether the server refused the request
/// or the request never completed properly.
fn failure_message(err: &ApiError, attempt: AuthAttempt) -> String {
    let fallback = match err {
        ApiError::Unauthorized(_)
        | ApiError::AccessDenied(_)
        | ApiError::NotFound(_)
        | ApiError::Rejected { .. } => attempt.rejected_fallback(),
        _ => attempt.failed_fallback(),
    };
    err.user_message(fallback)
}

pub struct SessionStore<A, T> {
    api: A,
    tokens: T,
    notifier: Notifier,
    session: Option<Session>,
    status: AuthStatus,
    initialized: bool,
}

impl<A: AuthApi, T: TokenStore> SessionStore<A, T> {
    pub fn new(api: A, tokens: T, notifier: Notifier) -> Self {
        Self {
            api,
            tokens,
            notifier,
            session: None,
            status: AuthStatus::Unknown,
            initialized: false,
        }
    }

    // =========================================================================
    // Readers
    // =========================================================================

    pub fn status(&self) -> AuthStatus {
        self.status
    }

    /// True only for a validated identity; a persisted token alone is not enough.
    pub fn is_authenticated(&self) -> bool {
        self.status == AuthStatus::Authenticated
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn user(&self) -> Option<&UserProfile> {
        self.session.as_ref().map(Session::user)
    }

    pub fn token(&self) -> Option<&str> {
        self.session.as_ref().map(Session::token)
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn tokens(&self) -> &T {
        &self.tokens
    }

    // =========================================================================
    // Operations
    // =========================================================================

    /// Restore the session from the persisted token, once per store.
    ///
    /// A token the API rejects (or that cannot be checked) is discarded and
    /// the store settles on `Unauthenticated`. Nothing is retried.
    pub async fn initialize(&mut self) {
        if self.initialized {
            warn!("Session store already initialized, ignoring");
            return;
        }
        self.initialized = true;

        let token = match self.tokens.load() {
            Ok(token) => token,
            Err(e) => {
                warn!(error = %e, "Failed to read persisted token");
                None
            }
        };

        let Some(token) = token else {
            debug!("No persisted token");
            self.status = AuthStatus::Unauthenticated;
            return;
        };

        match self.establish(token).await {
            Ok(()) => info!(user_id = %self.user_id(), "Session restored"),
            Err(e) => {
                warn!(error = %e, "Persisted token rejected, clearing it");
                self.discard();
            }
        }
    }

    /// Log in with email and password. Returns whether a session was established.
    pub async fn login(&mut self, email: &str, password: &str) -> bool {
        let request = LoginRequest { email, password };
        let result = self.api.login(&request).await;
        self.complete(AuthAttempt::Login, result).await
    }

    /// Create an account and log into it. Returns whether a session was established.
    pub async fn register(&mut self, email: &str, display_name: &str, password: &str) -> bool {
        let request = SignupRequest {
            email,
            display_name,
            password,
        };
        let result = self.api.signup(&request).await;
        self.complete(AuthAttempt::Register, result).await
    }

    /// Forget the session and the persisted token. Never fails.
    pub fn logout(&mut self) {
        self.discard();
        info!("Logged out");
        self.notifier.success(LOGGED_OUT);
    }

    /// Re-fetch the profile for the current session.
    ///
    /// A token the API now refuses (401/403) ends the session. Any other
    /// failure leaves the session untouched. Returns whether the profile was
    /// refreshed.
    pub async fn refresh_profile(&mut self) -> bool {
        let Some(token) = self.token().map(str::to_string) else {
            return false;
        };

        match self.establish(token).await {
            Ok(()) => {
                debug!(user_id = %self.user_id(), "Profile refreshed");
                true
            }
            Err(e @ (ApiError::Unauthorized(_) | ApiError::AccessDenied(_))) => {
                warn!(error = %e, "Token no longer accepted, ending session");
                self.discard();
                self.notifier.error(SESSION_EXPIRED);
                false
            }
            Err(e) => {
                warn!(error = %e, "Profile refresh failed, keeping session");
                false
            }
        }
    }

    // =========================================================================
    // Internals
    // =========================================================================

    async fn complete(&mut self, attempt: AuthAttempt, result: Result<String, ApiError>) -> bool {
        let token = match result {
            Ok(token) => token,
            Err(e) => {
                warn!(?attempt, error = %e, "Authentication failed");
                self.notifier.error(failure_message(&e, attempt));
                return false;
            }
        };

        if let Err(e) = self.tokens.save(&token) {
            // The in-memory session still works for this run
            warn!(error = %e, "Failed to persist token");
        }

        match self.establish(token).await {
            Ok(()) => {
                info!(?attempt, user_id = %self.user_id(), "Authenticated");
                self.notifier.success(attempt.success_message());
                true
            }
            Err(e) => {
                warn!(?attempt, error = %e, "Profile fetch after authentication failed");
                self.discard();
                self.notifier.error(e.user_message(PROFILE_FAILED));
                false
            }
        }
    }

    /// Validate `token` against the API and adopt the returned identity.
    async fn establish(&mut self, token: String) -> Result<(), ApiError> {
        let user = self.api.me(&token).await?;
        self.session = Some(Session::new(user, token));
        self.status = AuthStatus::Authenticated;
        Ok(())
    }

    fn discard(&mut self) {
        self.session = None;
        self.status = AuthStatus::Unauthenticated;
        if let Err(e) = self.tokens.clear() {
            warn!(error = %e, "Failed to clear persisted token");
        }
    }

    fn user_id(&self) -> &str {
        self.session.as_ref().map(Session::user_id).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use reqwest::StatusCode;
    use tokio::sync::mpsc::UnboundedReceiver;

    use super::*;
    use crate::auth::token::MemoryTokenStore;
    use crate::notify::{Notice, NoticeLevel};

    // -------------------------------------------------------------------------
    // Scripted API
    // -------------------------------------------------------------------------

    #[derive(Clone)]
    enum Reply<V> {
        Ok(V),
        Status(u16, &'static str),
        Network,
    }

    impl<V: Clone> Reply<V> {
        fn result(&self) -> Result<V, ApiError> {
            match self {
                Reply::Ok(v) => Ok(v.clone()),
                Reply::Status(code, body) => Err(ApiError::from_status(
                    StatusCode::from_u16(*code).expect("valid status"),
                    body,
                )),
                Reply::Network => Err(ApiError::NetworkError("connection refused".to_string())),
            }
        }
    }

    struct FakeApi {
        login: Reply<String>,
        signup: Reply<String>,
        me: Reply<UserProfile>,
        me_calls: AtomicUsize,
        me_tokens: Mutex<Vec<String>>,
    }

    impl FakeApi {
        fn new() -> Self {
            Self {
                login: Reply::Network,
                signup: Reply::Network,
                me: Reply::Status(401, r#"{"detail":"Could not validate credentials"}"#),
                me_calls: AtomicUsize::new(0),
                me_tokens: Mutex::new(Vec::new()),
            }
        }

        fn with_login(mut self, reply: Reply<String>) -> Self {
            self.login = reply;
            self
        }

        fn with_signup(mut self, reply: Reply<String>) -> Self {
            self.signup = reply;
            self
        }

        fn with_me(mut self, reply: Reply<UserProfile>) -> Self {
            self.me = reply;
            self
        }

        fn me_calls(&self) -> usize {
            self.me_calls.load(Ordering::SeqCst)
        }
    }

    impl AuthApi for FakeApi {
        async fn login(&self, _request: &LoginRequest<'_>) -> Result<String, ApiError> {
            self.login.result()
        }

        async fn signup(&self, _request: &SignupRequest<'_>) -> Result<String, ApiError> {
            self.signup.result()
        }

        async fn me(&self, token: &str) -> Result<UserProfile, ApiError> {
            self.me_calls.fetch_add(1, Ordering::SeqCst);
            self.me_tokens
                .lock()
                .expect("lock")
                .push(token.to_string());
            self.me.result()
        }
    }

    struct BrokenTokenStore;

    impl TokenStore for BrokenTokenStore {
        fn load(&self) -> anyhow::Result<Option<String>> {
            Err(anyhow::anyhow!("disk on fire"))
        }

        fn save(&self, _token: &str) -> anyhow::Result<()> {
            Err(anyhow::anyhow!("disk on fire"))
        }

        fn clear(&self) -> anyhow::Result<()> {
            Err(anyhow::anyhow!("disk on fire"))
        }
    }

    fn user_a() -> UserProfile {
        UserProfile {
            id: "u1".to_string(),
            email: "a@x.com".to_string(),
            display_name: "A".to_string(),
            created_at: None,
        }
    }

    fn new_store(
        api: FakeApi,
        tokens: MemoryTokenStore,
    ) -> (SessionStore<FakeApi, MemoryTokenStore>, UnboundedReceiver<Notice>) {
        let (notifier, rx) = Notifier::channel();
        (SessionStore::new(api, tokens, notifier), rx)
    }

    fn drain(rx: &mut UnboundedReceiver<Notice>) -> Vec<Notice> {
        let mut notices = Vec::new();
        while let Ok(notice) = rx.try_recv() {
            notices.push(notice);
        }
        notices
    }

    fn persisted(store: &SessionStore<FakeApi, MemoryTokenStore>) -> Option<String> {
        store.tokens().load().expect("load")
    }

    // -------------------------------------------------------------------------
    // initialize
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_status_unknown_before_initialize() {
        let (store, _rx) = new_store(FakeApi::new(), MemoryTokenStore::new());
        assert_eq!(store.status(), AuthStatus::Unknown);
        assert!(!store.is_authenticated());
    }

    #[tokio::test]
    async fn test_initialize_restores_persisted_token() {
        let api = FakeApi::new().with_me(Reply::Ok(user_a()));
        let (mut store, mut rx) = new_store(api, MemoryTokenStore::with_token("abc123"));

        store.initialize().await;

        assert_eq!(store.status(), AuthStatus::Authenticated);
        assert!(store.is_authenticated());
        let session = store.session().expect("session");
        assert_eq!(session.user_id(), "u1");
        assert_eq!(session.email(), "a@x.com");
        assert_eq!(session.display_name(), "A");
        assert_eq!(store.token(), Some("abc123"));
        assert_eq!(
            store.api().me_tokens.lock().expect("lock").as_slice(),
            ["abc123".to_string()]
        );
        assert!(drain(&mut rx).is_empty());
    }

    #[tokio::test]
    async fn test_initialize_rejected_token_clears_slot() {
        let (mut store, mut rx) = new_store(FakeApi::new(), MemoryTokenStore::with_token("stale"));

        store.initialize().await;

        assert_eq!(store.status(), AuthStatus::Unauthenticated);
        assert!(store.session().is_none());
        assert_eq!(persisted(&store), None);
        assert_eq!(store.api().me_calls(), 1);
        assert!(drain(&mut rx).is_empty());
    }

    #[tokio::test]
    async fn test_initialize_network_failure_clears_slot() {
        let api = FakeApi::new().with_me(Reply::Network);
        let (mut store, _rx) = new_store(api, MemoryTokenStore::with_token("abc123"));

        store.initialize().await;

        assert!(!store.is_authenticated());
        assert_eq!(persisted(&store), None);
        assert_eq!(store.api().me_calls(), 1);
    }

    #[tokio::test]
    async fn test_initialize_without_token_skips_api() {
        let (mut store, _rx) = new_store(FakeApi::new(), MemoryTokenStore::new());

        store.initialize().await;

        assert_eq!(store.status(), AuthStatus::Unauthenticated);
        assert_eq!(store.api().me_calls(), 0);
    }

    #[tokio::test]
    async fn test_initialize_runs_once() {
        let api = FakeApi::new().with_me(Reply::Ok(user_a()));
        let (mut store, _rx) = new_store(api, MemoryTokenStore::with_token("abc123"));

        store.initialize().await;
        store.initialize().await;

        assert_eq!(store.api().me_calls(), 1);
    }

    #[tokio::test]
    async fn test_initialize_unreadable_slot_is_logged_out() {
        let (notifier, _rx) = Notifier::channel();
        let mut store = SessionStore::new(FakeApi::new(), BrokenTokenStore, notifier);

        store.initialize().await;

        assert_eq!(store.status(), AuthStatus::Unauthenticated);
        assert_eq!(store.api().me_calls(), 0);
    }

    // -------------------------------------------------------------------------
    // login / register
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_login_success() {
        let api = FakeApi::new()
            .with_login(Reply::Ok("jwt-1".to_string()))
            .with_me(Reply::Ok(user_a()));
        let (mut store, mut rx) = new_store(api, MemoryTokenStore::new());
        store.initialize().await;

        assert!(store.login("a@x.com", "secret").await);

        assert!(store.is_authenticated());
        assert_eq!(store.user().map(|u| u.id.as_str()), Some("u1"));
        assert_eq!(persisted(&store).as_deref(), Some("jwt-1"));
        let notices = drain(&mut rx);
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].level, NoticeLevel::Success);
        assert_eq!(notices[0].message, LOGIN_SUCCEEDED);
    }

    #[tokio::test]
    async fn test_login_wrong_password() {
        let api = FakeApi::new().with_login(Reply::Status(401, r#"{"detail":"Invalid email or password."}"#));
        let (mut store, mut rx) = new_store(api, MemoryTokenStore::new());
        store.initialize().await;

        assert!(!store.login("a@x.com", "wrong").await);

        assert!(!store.is_authenticated());
        assert!(store.session().is_none());
        assert_eq!(persisted(&store), None);
        let notices = drain(&mut rx);
        assert_eq!(
            notices,
            vec![Notice {
                level: NoticeLevel::Error,
                message: "Invalid email or password.".to_string(),
            }]
        );
    }

    #[tokio::test]
    async fn test_login_uses_server_detail() {
        let api = FakeApi::new().with_login(Reply::Status(404, r#"{"detail":"User not found"}"#));
        let (mut store, mut rx) = new_store(api, MemoryTokenStore::new());

        assert!(!store.login("nobody@x.com", "pw").await);
        assert_eq!(drain(&mut rx)[0].message, "User not found");
    }

    #[tokio::test]
    async fn test_login_rejected_without_detail_uses_fallback() {
        let api = FakeApi::new().with_login(Reply::Status(401, ""));
        let (mut store, mut rx) = new_store(api, MemoryTokenStore::new());

        assert!(!store.login("a@x.com", "wrong").await);
        assert_eq!(drain(&mut rx)[0].message, LOGIN_REJECTED);
    }

    #[tokio::test]
    async fn test_login_network_failure() {
        let api = FakeApi::new().with_login(Reply::Network);
        let (mut store, mut rx) = new_store(api, MemoryTokenStore::new());

        assert!(!store.login("a@x.com", "secret").await);
        assert_eq!(drain(&mut rx)[0].message, LOGIN_FAILED);
        assert_eq!(store.api().me_calls(), 0);
    }

    #[tokio::test]
    async fn test_login_server_error_uses_generic_fallback() {
        let api = FakeApi::new().with_login(Reply::Status(500, "Internal Server Error"));
        let (mut store, mut rx) = new_store(api, MemoryTokenStore::new());

        assert!(!store.login("a@x.com", "secret").await);
        assert_eq!(drain(&mut rx)[0].message, LOGIN_FAILED);
    }

    #[tokio::test]
    async fn test_login_server_error_shows_server_detail() {
        let api = FakeApi::new().with_login(Reply::Status(500, r#"{"detail":"Database unavailable"}"#));
        let (mut store, mut rx) = new_store(api, MemoryTokenStore::new());

        assert!(!store.login("a@x.com", "secret").await);
        assert_eq!(drain(&mut rx)[0].message, "Database unavailable");

        store.api.login = Reply::Status(503, r#"{"detail":"Maintenance"}"#);
        assert!(!store.login("a@x.com", "secret").await);
        assert_eq!(drain(&mut rx)[0].message, "Maintenance");
    }

    #[tokio::test]
    async fn test_login_rate_limited() {
        let api = FakeApi::new()
            .with_login(Reply::Status(429, r#"{"detail":"Too many attempts, wait 60s"}"#));
        let (mut store, mut rx) = new_store(api, MemoryTokenStore::new());

        assert!(!store.login("a@x.com", "secret").await);
        assert_eq!(drain(&mut rx)[0].message, "Too many attempts, wait 60s");

        // Without a detail it is a failure, not a credential rejection
        store.api.login = Reply::Status(429, "");
        assert!(!store.login("a@x.com", "secret").await);
        assert_eq!(drain(&mut rx)[0].message, LOGIN_FAILED);
        assert!(!store.is_authenticated());
    }

    #[tokio::test]
    async fn test_login_profile_failure_rolls_back() {
        let api = FakeApi::new()
            .with_login(Reply::Ok("jwt-1".to_string()))
            .with_me(Reply::Network);
        let (mut store, mut rx) = new_store(api, MemoryTokenStore::new());

        assert!(!store.login("a@x.com", "secret").await);

        assert!(!store.is_authenticated());
        assert_eq!(persisted(&store), None);
        let notices = drain(&mut rx);
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].level, NoticeLevel::Error);
        assert_eq!(notices[0].message, PROFILE_FAILED);
    }

    #[tokio::test]
    async fn test_login_succeeds_when_token_cannot_be_persisted() {
        let api = FakeApi::new()
            .with_login(Reply::Ok("jwt-1".to_string()))
            .with_me(Reply::Ok(user_a()));
        let (notifier, _rx) = Notifier::channel();
        let mut store = SessionStore::new(api, BrokenTokenStore, notifier);

        assert!(store.login("a@x.com", "secret").await);
        assert!(store.is_authenticated());
        assert_eq!(store.token(), Some("jwt-1"));
    }

    #[tokio::test]
    async fn test_register_success() {
        let api = FakeApi::new()
            .with_signup(Reply::Ok("jwt-new".to_string()))
            .with_me(Reply::Ok(user_a()));
        let (mut store, mut rx) = new_store(api, MemoryTokenStore::new());

        assert!(store.register("a@x.com", "A", "secret").await);

        assert!(store.is_authenticated());
        assert_eq!(persisted(&store).as_deref(), Some("jwt-new"));
        assert_eq!(drain(&mut rx)[0].message, REGISTRATION_SUCCEEDED);
    }

    #[tokio::test]
    async fn test_register_duplicate_email() {
        let api = FakeApi::new().with_signup(Reply::Status(400, r#"{"detail":"Email already registered"}"#));
        let (mut store, mut rx) = new_store(api, MemoryTokenStore::new());

        assert!(!store.register("a@x.com", "A", "secret").await);
        assert!(!store.is_authenticated());
        assert_eq!(drain(&mut rx)[0].message, "Email already registered");
    }

    #[tokio::test]
    async fn test_register_rejected_without_detail_uses_fallback() {
        let api = FakeApi::new().with_signup(Reply::Status(400, ""));
        let (mut store, mut rx) = new_store(api, MemoryTokenStore::new());

        assert!(!store.register("a@x.com", "A", "secret").await);
        let notices = drain(&mut rx);
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].level, NoticeLevel::Error);
        assert_eq!(notices[0].message, REGISTRATION_FAILED);
    }

    #[tokio::test]
    async fn test_register_server_error_shows_server_detail() {
        let api = FakeApi::new().with_signup(Reply::Status(500, r#"{"detail":"Database unavailable"}"#));
        let (mut store, mut rx) = new_store(api, MemoryTokenStore::new());

        assert!(!store.register("a@x.com", "A", "secret").await);
        assert_eq!(drain(&mut rx)[0].message, "Database unavailable");
    }

    #[tokio::test]
    async fn test_register_profile_failure_rolls_back() {
        let api = FakeApi::new()
            .with_signup(Reply::Ok("jwt-new".to_string()))
            .with_me(Reply::Status(500, ""));
        let (mut store, mut rx) = new_store(api, MemoryTokenStore::new());
        store.initialize().await;

        assert!(!store.register("a@x.com", "A", "secret").await);

        assert!(!store.is_authenticated());
        assert_eq!(store.status(), AuthStatus::Unauthenticated);
        assert!(store.session().is_none());
        assert_eq!(persisted(&store), None);
        assert_eq!(store.api().me_calls(), 1);
        let notices = drain(&mut rx);
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].level, NoticeLevel::Error);
        assert_eq!(notices[0].message, PROFILE_FAILED);
    }

    #[tokio::test]
    async fn test_register_network_failure() {
        let api = FakeApi::new().with_signup(Reply::Network);
        let (mut store, mut rx) = new_store(api, MemoryTokenStore::new());

        assert!(!store.register("a@x.com", "A", "secret").await);
        assert_eq!(drain(&mut rx)[0].message, REGISTRATION_FAILED);
    }

    // -------------------------------------------------------------------------
    // logout / refresh
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_logout_clears_everything() {
        let api = FakeApi::new().with_me(Reply::Ok(user_a()));
        let (mut store, mut rx) = new_store(api, MemoryTokenStore::with_token("abc123"));
        store.initialize().await;
        assert!(store.is_authenticated());

        store.logout();

        assert!(!store.is_authenticated());
        assert_eq!(store.status(), AuthStatus::Unauthenticated);
        assert!(store.user().is_none());
        assert_eq!(persisted(&store), None);
        assert_eq!(drain(&mut rx)[0].message, LOGGED_OUT);
    }

    #[tokio::test]
    async fn test_logout_when_logged_out() {
        let (mut store, _rx) = new_store(FakeApi::new(), MemoryTokenStore::new());
        store.logout();
        assert!(!store.is_authenticated());
        assert_eq!(persisted(&store), None);
    }

    #[tokio::test]
    async fn test_logout_ignores_storage_failure() {
        let (notifier, mut rx) = Notifier::channel();
        let mut store = SessionStore::new(FakeApi::new(), BrokenTokenStore, notifier);

        store.logout();

        assert_eq!(store.status(), AuthStatus::Unauthenticated);
        assert_eq!(drain(&mut rx)[0].message, LOGGED_OUT);
    }

    #[tokio::test]
    async fn test_refresh_without_session() {
        let (mut store, _rx) = new_store(FakeApi::new(), MemoryTokenStore::new());
        assert!(!store.refresh_profile().await);
        assert_eq!(store.api().me_calls(), 0);
    }

    #[tokio::test]
    async fn test_refresh_expired_token_ends_session() {
        let api = FakeApi::new()
            .with_login(Reply::Ok("jwt-1".to_string()))
            .with_me(Reply::Ok(user_a()));
        let (mut store, mut rx) = new_store(api, MemoryTokenStore::new());
        assert!(store.login("a@x.com", "secret").await);
        drain(&mut rx);

        store.api.me = Reply::Status(401, r#"{"detail":"Could not validate credentials"}"#);
        assert!(!store.refresh_profile().await);

        assert!(!store.is_authenticated());
        assert_eq!(persisted(&store), None);
        assert_eq!(drain(&mut rx)[0].message, SESSION_EXPIRED);
    }

    #[tokio::test]
    async fn test_refresh_network_failure_keeps_session() {
        let api = FakeApi::new()
            .with_login(Reply::Ok("jwt-1".to_string()))
            .with_me(Reply::Ok(user_a()));
        let (mut store, _rx) = new_store(api, MemoryTokenStore::new());
        assert!(store.login("a@x.com", "secret").await);

        store.api.me = Reply::Network;
        assert!(!store.refresh_profile().await);

        assert!(store.is_authenticated());
        assert_eq!(persisted(&store).as_deref(), Some("jwt-1"));
    }
}
