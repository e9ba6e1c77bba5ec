use crate::models::UserProfile;

/// Where the client stands with respect to authentication.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthStatus {
    /// Startup validation has not finished yet.
    Unknown,
    Unauthenticated,
    Authenticated,
}

/// A token that `/auth/me` accepted, together with the profile it returned.
///
/// Only the session store builds these, and only after validation, so
/// holding a `Session` means holding a validated identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    user: UserProfile,
    token: String,
}

impl Session {
    pub(crate) fn new(user: UserProfile, token: String) -> Self {
        Self { user, token }
    }

    pub fn user(&self) -> &UserProfile {
        &self.user
    }

    pub fn user_id(&self) -> &str {
        &self.user.id
    }

    pub fn email(&self) -> &str {
        &self.user.email
    }

    pub fn display_name(&self) -> &str {
        &self.user.display_name
    }

    /// The bearer token for authenticated requests
    pub fn token(&self) -> &str {
        &self.token
    }
}
