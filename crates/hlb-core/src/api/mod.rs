//! REST API client module for the HLB backend.
//!
//! This module provides the `ApiClient` for the auth endpoints
//! (`/auth/login`, `/auth/signup`, `/auth/me`) and the notifications inbox.
//!
//! Authenticated requests carry an `Authorization: Bearer <token>` header.

pub mod client;
pub mod error;

pub use client::{ApiClient, AuthApi};
pub use error::ApiError;
