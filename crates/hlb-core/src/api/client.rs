//! API client for communicating with the HLB REST API.
//!
//! This module provides the `ApiClient` struct for the auth endpoints and
//! the `AuthApi` trait the session store is written against.

use std::time::Duration;

use anyhow::Result;
use reqwest::{header, Client};
use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;

use crate::models::{AppNotification, LoginRequest, SignupRequest, TokenResponse, UserProfile};

use super::ApiError;

// ============================================================================
// Constants
// ============================================================================

const LOGIN_PATH: &str = "/auth/login";
const SIGNUP_PATH: &str = "/auth/signup";
const ME_PATH: &str = "/auth/me";
const NOTIFICATIONS_PATH: &str = "/notifications";

/// The authentication endpoints the session store depends on.
///
/// `ApiClient` is the production implementation; tests substitute a
/// scripted fake.
#[allow(async_fn_in_trait)]
pub trait AuthApi {
    /// Exchange credentials for a bearer token.
    async fn login(&self, request: &LoginRequest<'_>) -> Result<String, ApiError>;

    /// Create an account and return its bearer token.
    async fn signup(&self, request: &SignupRequest<'_>) -> Result<String, ApiError>;

    /// Fetch the profile the token belongs to.
    async fn me(&self, token: &str) -> Result<UserProfile, ApiError>;
}

/// API client for the HLB backend.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Create a new API client rooted at `base_url` (e.g. `http://localhost:8000/api/v1`).
    ///
    /// Requests carry no timeout unless one is given.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body))
        }
    }

    async fn post_json<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let url = self.url(path);
        debug!(url = %url, "POST");

        let response = self
            .client
            .post(&url)
            .header(header::ACCEPT, "application/json")
            .json(body)
            .send()
            .await?;

        let response = Self::check_response(response).await?;
        Ok(response.json().await?)
    }

    async fn get_authed<T: DeserializeOwned>(&self, path: &str, token: &str) -> Result<T, ApiError> {
        let url = self.url(path);
        debug!(url = %url, "GET");

        let response = self
            .client
            .get(&url)
            .header(header::ACCEPT, "application/json")
            .bearer_auth(token)
            .send()
            .await?;

        let response = Self::check_response(response).await?;
        Ok(response.json().await?)
    }

    /// Fetch the signed-in user's notification inbox
    pub async fn fetch_notifications(&self, token: &str) -> Result<Vec<AppNotification>, ApiError> {
        self.get_authed(NOTIFICATIONS_PATH, token).await
    }
}

impl AuthApi for ApiClient {
    async fn login(&self, request: &LoginRequest<'_>) -> Result<String, ApiError> {
        let response: TokenResponse = self.post_json(LOGIN_PATH, request).await?;
        Ok(response.token)
    }

    async fn signup(&self, request: &SignupRequest<'_>) -> Result<String, ApiError> {
        let response: TokenResponse = self.post_json(SIGNUP_PATH, request).await?;
        Ok(response.token)
    }

    async fn me(&self, token: &str) -> Result<UserProfile, ApiError> {
        self.get_authed(ME_PATH, token).await
    }
}
