use serde::{Deserialize, Serialize};

use crate::utils::format_date;

/// Profile of the signed-in user as returned by `GET /auth/me`.
///
/// The server serializes the whole user document, including the password
/// hash; only the fields below are kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(alias = "_id")]
    pub id: String,
    pub email: String,
    #[serde(rename = "displayName")]
    pub display_name: String,
    #[serde(rename = "createdAt", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl UserProfile {
    /// "Member since" text for the profile view.
    pub fn member_since(&self) -> Option<String> {
        self.created_at.as_deref().map(format_date)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub struct SignupRequest<'a> {
    pub email: &'a str,
    #[serde(rename = "displayName")]
    pub display_name: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TokenResponse {
    pub token: String,
}
